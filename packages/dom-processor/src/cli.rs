//! Command-line interface for the processor.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use console::style;

use crate::config::{check_input_size, parse_rename, validate_tag_name};
use crate::dom::{xml, Dom, NodeId, TreeModel};
use crate::error::Result;
use crate::registry::Rule;
use crate::text::{skip_element, TextProcessor};
use crate::tree::{drop_element, unwrap_element, TreeProcessor};

/// Rule-driven XML transformer - flatten documents to text or rebuild them.
#[derive(Parser)]
#[command(name = "domproc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Flatten an XML document to its text content.
    Text {
        /// XML input file
        file: PathBuf,

        /// Leave out elements with this tag (repeatable)
        #[arg(short, long)]
        skip: Vec<String>,
    },

    /// Rebuild an XML document and print it.
    Tree {
        /// XML input file
        file: PathBuf,

        /// Remove elements with this tag, including their content (repeatable)
        #[arg(short, long)]
        drop: Vec<String>,

        /// Replace elements with this tag by their content (repeatable)
        #[arg(short, long)]
        unwrap: Vec<String>,

        /// Rename elements, given as FROM=TO (repeatable)
        #[arg(short, long)]
        rename: Vec<String>,
    },
}

/// Run the CLI.
pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Text { file, skip } => text_command(&file, &skip),
        Commands::Tree {
            file,
            drop,
            unwrap,
            rename,
        } => tree_command(&file, &drop, &unwrap, &rename),
    }
}

/// Read and parse the input file into a fresh arena.
fn load_file(path: &Path) -> Result<(Dom, NodeId)> {
    let size = std::fs::metadata(path)?.len();
    check_input_size(usize::try_from(size).unwrap_or(usize::MAX))?;
    let content = std::fs::read_to_string(path)?;

    let mut dom = Dom::new();
    let document = xml::load(&mut dom, &content)?;
    tracing::debug!(path = %path.display(), nodes = dom.len(), "loaded input");
    Ok((dom, document))
}

/// Execute the text command.
fn text_command(file: &Path, skip: &[String]) -> Result<()> {
    for tag in skip {
        validate_tag_name(tag)?;
    }
    let (mut dom, document) = load_file(file)?;

    let processor =
        TextProcessor::with_basic_rules(skip.iter().map(|tag| skip_element::<Dom>(tag)));
    let text = processor.process(&mut dom, Some(document))?.unwrap_or_default();

    println!("{text}");
    eprintln!(
        "{} {} ({} characters)",
        style("Flattened").green().bold(),
        file.display(),
        text.chars().count()
    );
    Ok(())
}

/// Execute the tree command.
fn tree_command(file: &Path, drop: &[String], unwrap: &[String], rename: &[String]) -> Result<()> {
    let mut rules = Vec::new();
    for tag in drop {
        validate_tag_name(tag)?;
        rules.push(drop_element::<Dom>(tag));
    }
    for tag in unwrap {
        validate_tag_name(tag)?;
        rules.push(unwrap_element::<Dom>(tag));
    }
    for arg in rename {
        let (from, to) = parse_rename(arg)?;
        rules.push(rename_element(&from, to));
    }
    let (mut dom, document) = load_file(file)?;

    let processor = TreeProcessor::with_basic_rules(rules);
    let output = processor.process(&mut dom, Some(document))?;

    if let Some(output) = output {
        println!("{}", xml::to_xml(&dom, output));
    }
    eprintln!(
        "{} {} ({} rules)",
        style("Rebuilt").green().bold(),
        file.display(),
        processor.rules().len()
    );
    Ok(())
}

/// Rule that rebuilds matching elements under a new tag name, keeping
/// attributes and transformed children.
fn rename_element(from: &str, to: String) -> Rule<Dom, NodeId> {
    Rule::element(from, move |processor, tree: &mut Dom, node| {
        let renamed = tree.create_element(&to);
        let attributes = tree.attributes(node).to_vec();
        for (name, value) in &attributes {
            tree.set_attribute(renamed, name, value);
        }
        if let Some(fragment) = processor.process_children(tree, Some(node))? {
            tree.append_child(renamed, fragment);
        }
        Ok(renamed)
    })
    .named(format!("rename {from}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_text() {
        let cli = Cli::parse_from(["domproc", "text", "in.xml", "--skip", "kop", "-s", "noot"]);

        let Commands::Text { file, skip } = cli.command else {
            panic!("expected text command");
        };
        assert_eq!(file, PathBuf::from("in.xml"));
        assert_eq!(skip, vec!["kop".to_string(), "noot".to_string()]);
    }

    #[test]
    fn test_cli_parse_tree() {
        let cli = Cli::parse_from([
            "domproc",
            "tree",
            "in.xml",
            "--drop",
            "meta-data",
            "--unwrap",
            "span",
            "--rename",
            "nadruk=em",
        ]);

        let Commands::Tree {
            file,
            drop,
            unwrap,
            rename,
        } = cli.command
        else {
            panic!("expected tree command");
        };
        assert_eq!(file, PathBuf::from("in.xml"));
        assert_eq!(drop, vec!["meta-data".to_string()]);
        assert_eq!(unwrap, vec!["span".to_string()]);
        assert_eq!(rename, vec!["nadruk=em".to_string()]);
    }

    #[test]
    fn test_rename_element_keeps_attributes_and_children() {
        let mut dom = Dom::new();
        let doc = xml::load(&mut dom, r#"<p><nadruk type="vet">x</nadruk></p>"#).unwrap();
        let processor =
            TreeProcessor::with_basic_rules([rename_element("nadruk", "em".to_string())]);

        let output = processor.process(&mut dom, Some(doc)).unwrap().unwrap();

        assert_eq!(xml::to_xml(&dom, output), r#"<p><em type="vet">x</em></p>"#);
    }
}
