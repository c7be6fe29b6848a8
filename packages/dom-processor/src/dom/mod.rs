//! Tree model abstraction consumed by the processors.
//!
//! The engine never owns a tree. It navigates and builds nodes through the
//! [`TreeModel`] capability set, so any document representation can be
//! transformed once it implements this trait. [`Dom`] is the arena-backed
//! implementation shipped with the crate.

mod arena;
pub mod xml;

pub use arena::{Dom, NodeId};

use std::fmt::Debug;

/// Closed set of node kinds the engine distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Document node; its single element child is the document element.
    Document,
    /// Document fragment; a parentless container whose children move on append.
    Fragment,
    /// Element with a tag name and attributes.
    Element,
    /// Text node.
    Text,
    /// Anything else (comments, processing instructions).
    Other,
}

impl NodeKind {
    /// Lowercase name, used in log output.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::Fragment => "fragment",
            NodeKind::Element => "element",
            NodeKind::Text => "text",
            NodeKind::Other => "other",
        }
    }
}

/// Navigation, inspection and construction capabilities of a tree.
///
/// Node handles are cheap `Copy` values; all access goes through the model.
/// `append_child` follows DOM semantics: the child is detached from its
/// previous parent first, and appending a fragment moves the fragment's
/// children instead of the fragment itself.
pub trait TreeModel {
    /// Handle to a node in this tree.
    type Node: Copy + Eq + Debug;

    /// Kind of the node.
    fn kind(&self, node: Self::Node) -> NodeKind;

    /// Whether the handle refers to a live node of this model.
    fn is_node(&self, node: Self::Node) -> bool;

    /// Parent of the node, if attached.
    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// First child of the node.
    fn first_child(&self, node: Self::Node) -> Option<Self::Node>;

    /// Next sibling of the node.
    fn next_sibling(&self, node: Self::Node) -> Option<Self::Node>;

    /// Document the node belongs to. `None` for documents and detached nodes.
    fn owner_document(&self, node: Self::Node) -> Option<Self::Node>;

    /// Root element of a document.
    fn document_element(&self, document: Self::Node) -> Option<Self::Node>;

    /// Tag name of an element. `None` for every other kind.
    fn tag_name(&self, node: Self::Node) -> Option<&str>;

    /// Text content. For text nodes this is the node's own text, for
    /// containers the concatenated text of all descendant text nodes.
    fn text_content(&self, node: Self::Node) -> Option<String>;

    /// Attribute value of an element.
    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    /// Set an attribute on an element. Ignored for other kinds.
    fn set_attribute(&mut self, node: Self::Node, name: &str, value: &str);

    /// Create a new, empty document.
    fn create_document(&mut self) -> Self::Node;

    /// Create a new, empty document fragment.
    fn create_fragment(&mut self) -> Self::Node;

    /// Create a detached element.
    fn create_element(&mut self, tag_name: &str) -> Self::Node;

    /// Create a detached text node.
    fn create_text(&mut self, text: &str) -> Self::Node;

    /// Shallow copy: same kind, tag name, attributes and text, no children.
    fn clone_node(&mut self, node: Self::Node) -> Self::Node;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Detach `child` from `parent`. No-op if it is not a child of `parent`.
    fn remove_child(&mut self, parent: Self::Node, child: Self::Node);

    /// Detach every child of the node and return the node.
    fn clear_children(&mut self, node: Self::Node) -> Self::Node;

    /// Whether the node is a document.
    fn is_document(&self, node: Self::Node) -> bool {
        self.kind(node) == NodeKind::Document
    }

    /// Whether the node is a document fragment.
    fn is_fragment(&self, node: Self::Node) -> bool {
        self.kind(node) == NodeKind::Fragment
    }

    /// Whether the node is an element.
    fn is_element(&self, node: Self::Node) -> bool {
        self.kind(node) == NodeKind::Element
    }

    /// Whether the node is a text node.
    fn is_text(&self, node: Self::Node) -> bool {
        self.kind(node) == NodeKind::Text
    }

    /// Deep copy: the node and all of its descendants, detached.
    fn clone_subtree(&mut self, node: Self::Node) -> Self::Node
    where
        Self: Sized,
    {
        let copy = self.clone_node(node);
        let children: Vec<Self::Node> = self.children(node).collect();
        for child in children {
            let child_copy = self.clone_subtree(child);
            self.append_child(copy, child_copy);
        }
        copy
    }

    /// Iterate over the children of a node, in order.
    fn children(&self, node: Self::Node) -> Children<'_, Self>
    where
        Self: Sized,
    {
        Children {
            tree: self,
            next: self.first_child(node),
        }
    }
}

/// Iterator over the children of a node.
pub struct Children<'a, M: TreeModel> {
    tree: &'a M,
    next: Option<M::Node>,
}

impl<M: TreeModel> Iterator for Children<'_, M> {
    type Item = M::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.next_sibling(current);
        Some(current)
    }
}
