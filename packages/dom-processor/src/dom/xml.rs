//! Loading XML into a [`Dom`] and writing nodes back out as XML.

use roxmltree::NodeType;

use super::{Dom, NodeId, NodeKind, TreeModel};
use crate::config::check_input_size;
use crate::error::Result;

/// Parse an XML string into a new document in the arena.
///
/// Text, including whitespace between elements, is kept as text nodes.
/// Comments become [`NodeKind::Other`] nodes; processing instructions are
/// dropped. Namespace prefixes are not kept in tag names.
///
/// # Errors
/// Returns `InputTooLarge` for oversized input and `XmlParse` for
/// malformed XML.
///
/// # Examples
/// ```
/// use dom_processor::dom::{xml, Dom, TreeModel};
///
/// let mut dom = Dom::new();
/// let doc = xml::load(&mut dom, "<p>hello</p>").unwrap();
/// let root = dom.document_element(doc).unwrap();
/// assert_eq!(dom.tag_name(root), Some("p"));
/// ```
pub fn load(dom: &mut Dom, xml: &str) -> Result<NodeId> {
    check_input_size(xml.len())?;
    let parsed = roxmltree::Document::parse(xml)?;

    let document = dom.create_document();
    for child in parsed.root().children() {
        import_node(dom, document, child);
    }
    Ok(document)
}

fn import_node(dom: &mut Dom, parent: NodeId, node: roxmltree::Node<'_, '_>) {
    match node.node_type() {
        NodeType::Element => {
            let element = dom.append_element(parent, node.tag_name().name());
            for attribute in node.attributes() {
                dom.set_attribute(element, attribute.name(), attribute.value());
            }
            for child in node.children() {
                import_node(dom, element, child);
            }
        }
        NodeType::Text => {
            dom.append_text(parent, node.text().unwrap_or_default());
        }
        NodeType::Comment => {
            let comment = dom.create_comment(node.text().unwrap_or_default());
            dom.append_child(parent, comment);
        }
        NodeType::Root | NodeType::PI => {}
    }
}

/// Serialize a node and its subtree.
///
/// Documents and fragments serialize as their children. Empty elements use
/// the self-closing form.
///
/// # Examples
/// ```
/// use dom_processor::dom::{xml, Dom};
///
/// let mut dom = Dom::new();
/// let doc = xml::load(&mut dom, "<a x='1'><b></b>&amp;</a>").unwrap();
/// assert_eq!(xml::to_xml(&dom, doc), r#"<a x="1"><b/>&amp;</a>"#);
/// ```
#[must_use]
pub fn to_xml(dom: &Dom, node: NodeId) -> String {
    let mut out = String::new();
    write_node(dom, node, &mut out);
    out
}

fn write_node(dom: &Dom, node: NodeId, out: &mut String) {
    match dom.kind(node) {
        NodeKind::Document | NodeKind::Fragment => {
            for child in dom.children(node) {
                write_node(dom, child, out);
            }
        }
        NodeKind::Element => {
            let tag = dom.tag_name(node).unwrap_or_default();
            out.push('<');
            out.push_str(tag);
            for (name, value) in dom.attributes(node) {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            if dom.first_child(node).is_none() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in dom.children(node) {
                write_node(dom, child, out);
            }
            out.push_str("</");
            out.push_str(tag);
            out.push('>');
        }
        NodeKind::Text => {
            if let Some(text) = dom.text_content(node) {
                escape_into(&text, false, out);
            }
        }
        NodeKind::Other => {
            out.push_str("<!--");
            out.push_str(&dom.text_content(node).unwrap_or_default());
            out.push_str("-->");
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
