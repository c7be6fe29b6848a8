//! Tree-to-text processor.

use crate::dom::TreeModel;
use crate::engine::Processor;
use crate::error::Result;
use crate::registry::{Rule, RuleTable};

/// Whether the text consists only of whitespace. The empty string counts.
///
/// Besides Unicode whitespace this accepts U+FEFF, which editors leave
/// behind as a byte order mark. U+0085 (next line) also counts, being Unicode
/// whitespace, although an ECMAScript `\s` would not match it.
///
/// # Examples
/// ```
/// use dom_processor::text::is_blank;
///
/// assert!(is_blank(""));
/// assert!(is_blank("   \n\t  "));
/// assert!(!is_blank("  hi  "));
/// ```
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| c.is_whitespace() || c == '\u{feff}')
}

/// Processor flattening a tree into a string.
///
/// Sibling results are concatenated; an empty buffer yields `""`.
pub struct TextProcessor<M: TreeModel> {
    engine: Processor<M, String>,
}

impl<M: TreeModel + 'static> TextProcessor<M> {
    /// Create a processor without rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: Processor::concatenating(),
        }
    }

    /// Create a processor with the given rules, in order.
    #[must_use]
    pub fn with_rules(rules: impl IntoIterator<Item = Rule<M, String>>) -> Self {
        let mut processor = Self::new();
        processor.add_rules(rules);
        processor
    }

    /// Create a processor whose custom rules take precedence over
    /// [`basic_rules`](Self::basic_rules).
    #[must_use]
    pub fn with_basic_rules(rules: impl IntoIterator<Item = Rule<M, String>>) -> Self {
        let mut processor = Self::with_rules(rules);
        processor.add_rules(Self::basic_rules());
        processor
    }

    /// Default rules.
    ///
    /// Text nodes contribute their content, or `""` when blank. Elements
    /// contribute the flattened text of their children, each child matched
    /// against the full rule table again.
    #[must_use]
    pub fn basic_rules() -> Vec<Rule<M, String>> {
        vec![
            Rule::when(
                |tree: &M, node| tree.is_text(node),
                |_, tree: &mut M, node| {
                    let text = tree.text_content(node).unwrap_or_default();
                    if is_blank(&text) {
                        return Ok(String::new());
                    }
                    Ok(text)
                },
            )
            .named("text"),
            Rule::element("*", |processor, tree: &mut M, node| {
                Ok(processor
                    .process_children(tree, Some(node))?
                    .unwrap_or_default())
            }),
        ]
    }
}

impl<M: TreeModel> TextProcessor<M> {
    /// Append rules after the ones already registered.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule<M, String>>) {
        self.engine.add_rules(rules);
    }

    /// Get a reference to the rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleTable<M, String> {
        self.engine.rules()
    }

    /// Get a reference to the underlying engine.
    #[must_use]
    pub fn engine(&self) -> &Processor<M, String> {
        &self.engine
    }

    /// Flatten a node.
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process(&self, tree: &mut M, node: Option<M::Node>) -> Result<Option<String>> {
        self.engine.process(tree, node)
    }

    /// Flatten the children of a node.
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process_children(&self, tree: &mut M, node: Option<M::Node>) -> Result<Option<String>> {
        self.engine.process_children(tree, node)
    }

    /// Flatten a sibling chain.
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process_siblings(&self, tree: &mut M, first: Option<M::Node>) -> Result<Option<String>> {
        self.engine.process_siblings(tree, first)
    }
}

impl<M: TreeModel + 'static> Default for TextProcessor<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TreeModel> std::fmt::Debug for TextProcessor<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextProcessor")
            .field("engine", &self.engine)
            .finish()
    }
}

/// Rule that makes matching elements contribute nothing.
#[must_use]
pub fn skip_element<M: TreeModel + 'static>(specifier: &str) -> Rule<M, String> {
    Rule::element(specifier, |_, _, _| Ok(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::xml::load;
    use crate::dom::{Dom, NodeId};
    use crate::error::ProcessorError;
    use pretty_assertions::assert_eq;

    fn parse(xml: &str) -> (Dom, NodeId) {
        let mut dom = Dom::new();
        let doc = load(&mut dom, xml).unwrap();
        (dom, doc)
    }

    fn flatten(processor: &TextProcessor<Dom>, xml: &str) -> Option<String> {
        let (mut dom, doc) = parse(xml);
        processor.process(&mut dom, Some(doc)).unwrap()
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank(" \u{a0}\u{2003}\r\n"));
        assert!(is_blank("\u{feff}"));
        assert!(is_blank("\u{85}"));
        assert!(!is_blank("."));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_whitespace_collapse() {
        let mut dom = Dom::new();
        let blank = dom.create_text("   \n\t  ");
        let padded = dom.create_text("  hi  ");
        let processor = TextProcessor::<Dom>::with_basic_rules([]);

        assert_eq!(
            processor.process(&mut dom, Some(blank)).unwrap().as_deref(),
            Some("")
        );
        assert_eq!(
            processor.process(&mut dom, Some(padded)).unwrap().as_deref(),
            Some("  hi  ")
        );
    }

    #[test]
    fn test_flatten_document() {
        let processor = TextProcessor::<Dom>::with_basic_rules([]);
        let xml = "<article>\n  <p>Hello <b>big</b> world</p>\n  <p>again</p>\n</article>";

        assert_eq!(
            flatten(&processor, xml).as_deref(),
            Some("Hello big worldagain")
        );
    }

    #[test]
    fn test_fragment_flattening() {
        let mut dom = Dom::new();
        let fragment = dom.create_fragment();
        dom.append_text(fragment, "a");
        let b = dom.append_element(fragment, "b");
        dom.append_text(b, "c");
        let processor = TextProcessor::<Dom>::with_basic_rules([]);

        let b_alone = processor.process(&mut dom, Some(b)).unwrap().unwrap();
        let result = processor.process(&mut dom, Some(fragment)).unwrap();

        assert_eq!(b_alone, "c");
        assert_eq!(result, Some(format!("a{b_alone}")));
    }

    #[test]
    fn test_custom_rules_fire_on_descendants() {
        let bold: Rule<Dom, String> = Rule::element("b", |p, tree, node| {
            let inner = p.process_children(tree, Some(node))?.unwrap_or_default();
            Ok(format!("**{inner}**"))
        });
        let processor = TextProcessor::with_basic_rules([bold, skip_element("note")]);
        let xml = "<doc><p>x <b>y</b><note>hidden</note></p><div><p><b>z</b></p></div></doc>";

        assert_eq!(flatten(&processor, xml).as_deref(), Some("x **y****z**"));
    }

    #[test]
    fn test_root_rule() {
        let root: Rule<Dom, String> = Rule::element("/", |p, tree, node| {
            let inner = p.process_children(tree, Some(node))?.unwrap_or_default();
            Ok(format!("[{inner}]"))
        });
        let processor = TextProcessor::with_basic_rules([root]);

        assert_eq!(
            flatten(&processor, "<div>a<div>b</div></div>").as_deref(),
            Some("[ab]")
        );
    }

    #[test]
    fn test_empty_children_versus_empty_buffer() {
        let (mut dom, doc) = parse("<root><empty/><full><!-- comment --></full></root>");
        let processor = TextProcessor::<Dom>::with_basic_rules([]);
        let root = dom.document_element(doc).unwrap();
        let empty = dom.first_child(root);
        let full = dom.next_sibling(empty.unwrap());

        assert_eq!(processor.process_children(&mut dom, empty).unwrap(), None);
        assert_eq!(
            processor.process_children(&mut dom, full).unwrap(),
            Some(String::new())
        );
        assert_eq!(
            processor.process(&mut dom, empty).unwrap(),
            Some(String::new())
        );
    }

    #[test]
    fn test_without_rules_nothing_matches() {
        let processor = TextProcessor::<Dom>::new();
        assert_eq!(flatten(&processor, "<a>text</a>"), None);
        assert!(processor.rules().is_empty());
    }

    #[test]
    fn test_action_error_propagates() {
        let bad: Rule<Dom, String> = Rule::element("bad", |_, _, _| {
            Err(ProcessorError::action("bad", "malformed input"))
        });
        let processor = TextProcessor::with_basic_rules([bad]);
        let (mut dom, doc) = parse("<doc><p>fine</p><p><bad/></p></doc>");

        let err = processor.process(&mut dom, Some(doc)).unwrap_err();
        assert_eq!(err.to_string(), "Rule 'bad' failed: malformed input");
    }
}
