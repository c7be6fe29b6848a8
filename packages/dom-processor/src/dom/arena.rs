//! Arena-backed document tree.

use super::{NodeKind, TreeModel};

/// Handle to a node stored in a [`Dom`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    tag_name: Option<String>,
    text: Option<String>,
    attributes: Vec<(String, String)>,
    parent: Option<NodeId>,
    first_child: Option<NodeId>,
    last_child: Option<NodeId>,
    prev_sibling: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            tag_name: None,
            text: None,
            attributes: Vec::new(),
            parent: None,
            first_child: None,
            last_child: None,
            prev_sibling: None,
            next_sibling: None,
        }
    }
}

/// Arena holding any number of documents, fragments and detached nodes.
///
/// Nodes are never freed; detached nodes simply become unreachable from
/// their former document. Output trees built by the tree processor live in
/// the same arena as their input.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    nodes: Vec<NodeData>,
}

impl Dom {
    /// Create an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of nodes ever allocated in this arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Create an element and append it to `parent`.
    pub fn append_element(&mut self, parent: NodeId, tag_name: &str) -> NodeId {
        let element = self.create_element(tag_name);
        self.append_child(parent, element);
        element
    }

    /// Create a text node and append it to `parent`.
    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Create a detached comment, which the engine sees as [`NodeKind::Other`].
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Other);
        data.text = Some(text.to_string());
        self.alloc(data)
    }

    /// Attributes of an element in document order.
    #[must_use]
    pub fn attributes(&self, node: NodeId) -> &[(String, String)] {
        self.get(node).map(|n| n.attributes.as_slice()).unwrap_or_default()
    }

    fn get(&self, node: NodeId) -> Option<&NodeData> {
        self.nodes.get(node.0)
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(data);
        NodeId(self.nodes.len() - 1)
    }

    /// Whether `candidate` is `node` or one of its ancestors.
    fn is_inclusive_ancestor(&self, candidate: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.get(id).and_then(|n| n.parent);
        }
        false
    }

    fn detach(&mut self, child: NodeId) {
        let (parent, prev, next) = match self.get(child) {
            Some(data) => (data.parent, data.prev_sibling, data.next_sibling),
            None => return,
        };
        let Some(parent) = parent else {
            return;
        };

        match prev {
            Some(prev) => self.nodes[prev.0].next_sibling = next,
            None => self.nodes[parent.0].first_child = next,
        }
        match next {
            Some(next) => self.nodes[next.0].prev_sibling = prev,
            None => self.nodes[parent.0].last_child = prev,
        }

        let data = &mut self.nodes[child.0];
        data.parent = None;
        data.prev_sibling = None;
        data.next_sibling = None;
    }

    fn link_last(&mut self, parent: NodeId, child: NodeId) {
        let last = self.nodes[parent.0].last_child;
        {
            let data = &mut self.nodes[child.0];
            data.parent = Some(parent);
            data.prev_sibling = last;
            data.next_sibling = None;
        }
        match last {
            Some(last) => self.nodes[last.0].next_sibling = Some(child),
            None => self.nodes[parent.0].first_child = Some(child),
        }
        self.nodes[parent.0].last_child = Some(child);
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        for child in self.children(node) {
            match self.kind(child) {
                NodeKind::Text => {
                    if let Some(text) = self.get(child).and_then(|n| n.text.as_deref()) {
                        out.push_str(text);
                    }
                }
                NodeKind::Element | NodeKind::Fragment => self.collect_text(child, out),
                NodeKind::Document | NodeKind::Other => {}
            }
        }
    }
}

impl TreeModel for Dom {
    type Node = NodeId;

    fn kind(&self, node: NodeId) -> NodeKind {
        self.get(node).map_or(NodeKind::Other, |n| n.kind)
    }

    fn is_node(&self, node: NodeId) -> bool {
        node.0 < self.nodes.len()
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.parent
    }

    fn first_child(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.first_child
    }

    fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.get(node)?.next_sibling
    }

    fn owner_document(&self, node: NodeId) -> Option<NodeId> {
        let mut top = node;
        while let Some(parent) = self.parent(top) {
            top = parent;
        }
        (top != node && self.is_document(top)).then_some(top)
    }

    fn document_element(&self, document: NodeId) -> Option<NodeId> {
        if !self.is_document(document) {
            return None;
        }
        self.children(document).find(|&c| self.is_element(c))
    }

    fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.tag_name.as_deref()
    }

    fn text_content(&self, node: NodeId) -> Option<String> {
        let data = self.get(node)?;
        match data.kind {
            NodeKind::Text | NodeKind::Other => data.text.clone(),
            NodeKind::Element | NodeKind::Fragment | NodeKind::Document => {
                let mut out = String::new();
                self.collect_text(node, &mut out);
                Some(out)
            }
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.get(node)?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(data) = self.nodes.get_mut(node.0) else {
            return;
        };
        if data.kind != NodeKind::Element {
            return;
        }
        match data.attributes.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => data.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn create_document(&mut self) -> NodeId {
        self.alloc(NodeData::new(NodeKind::Document))
    }

    fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeData::new(NodeKind::Fragment))
    }

    fn create_element(&mut self, tag_name: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Element);
        data.tag_name = Some(tag_name.to_string());
        self.alloc(data)
    }

    fn create_text(&mut self, text: &str) -> NodeId {
        let mut data = NodeData::new(NodeKind::Text);
        data.text = Some(text.to_string());
        self.alloc(data)
    }

    fn clone_node(&mut self, node: NodeId) -> NodeId {
        let Some(source) = self.get(node) else {
            return self.alloc(NodeData::new(NodeKind::Other));
        };
        let mut data = NodeData::new(source.kind);
        data.tag_name = source.tag_name.clone();
        data.text = source.text.clone();
        data.attributes = source.attributes.clone();
        self.alloc(data)
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if !self.is_node(parent) || !self.is_node(child) {
            tracing::warn!(?parent, ?child, "append_child with unknown node handle");
            return;
        }
        match self.kind(parent) {
            NodeKind::Document | NodeKind::Fragment | NodeKind::Element => {}
            kind => {
                tracing::warn!(?parent, kind = kind.as_str(), "node cannot have children");
                return;
            }
        }
        match self.kind(child) {
            NodeKind::Document => {
                tracing::warn!(?parent, ?child, "a document cannot be appended");
            }
            NodeKind::Fragment => {
                let moved: Vec<NodeId> = self.children(child).collect();
                for node in moved {
                    self.append_child(parent, node);
                }
            }
            _ => {
                if self.is_inclusive_ancestor(child, parent) {
                    tracing::warn!(?parent, ?child, "append would create a cycle");
                    return;
                }
                self.detach(child);
                self.link_last(parent, child);
            }
        }
    }

    fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if self.parent(child) == Some(parent) {
            self.detach(child);
        }
    }

    fn clear_children(&mut self, node: NodeId) -> NodeId {
        while let Some(child) = self.first_child(node) {
            self.detach(child);
        }
        node
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Dom, NodeId, NodeId) {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let root = dom.append_element(doc, "root");
        let p = dom.append_element(root, "p");
        dom.append_text(p, "hello");
        dom.append_text(root, " world");
        (dom, doc, root)
    }

    #[test]
    fn test_navigation() {
        let (dom, doc, root) = sample();
        assert_eq!(dom.document_element(doc), Some(root));
        let p = dom.first_child(root).unwrap();
        assert_eq!(dom.tag_name(p), Some("p"));
        let tail = dom.next_sibling(p).unwrap();
        assert!(dom.is_text(tail));
        assert_eq!(dom.next_sibling(tail), None);
        assert_eq!(dom.parent(p), Some(root));
    }

    #[test]
    fn test_owner_document() {
        let (mut dom, doc, root) = sample();
        let p = dom.first_child(root).unwrap();
        assert_eq!(dom.owner_document(p), Some(doc));
        assert_eq!(dom.owner_document(root), Some(doc));
        assert_eq!(dom.owner_document(doc), None);

        let detached = dom.create_element("x");
        assert_eq!(dom.owner_document(detached), None);
    }

    #[test]
    fn test_text_content() {
        let (dom, doc, root) = sample();
        assert_eq!(dom.text_content(root).as_deref(), Some("hello world"));
        assert_eq!(dom.text_content(doc).as_deref(), Some("hello world"));
    }

    #[test]
    fn test_append_moves_node() {
        let (mut dom, _doc, root) = sample();
        let p = dom.first_child(root).unwrap();
        let other = dom.create_element("other");
        dom.append_child(other, p);

        assert_eq!(dom.parent(p), Some(other));
        assert_eq!(dom.children(root).count(), 1);
        assert_eq!(dom.text_content(root).as_deref(), Some(" world"));
    }

    #[test]
    fn test_append_fragment_moves_children() {
        let mut dom = Dom::new();
        let fragment = dom.create_fragment();
        dom.append_text(fragment, "a");
        dom.append_element(fragment, "b");
        let target = dom.create_element("div");

        dom.append_child(target, fragment);

        assert_eq!(dom.children(target).count(), 2);
        assert_eq!(dom.first_child(fragment), None);
    }

    #[test]
    fn test_append_rejects_cycle_and_document() {
        let (mut dom, doc, root) = sample();
        let p = dom.first_child(root).unwrap();

        dom.append_child(p, root);
        assert_eq!(dom.parent(root), Some(doc));

        let other_doc = dom.create_document();
        dom.append_child(root, other_doc);
        assert_eq!(dom.parent(other_doc), None);
    }

    #[test]
    fn test_clear_and_remove() {
        let (mut dom, _doc, root) = sample();
        let p = dom.first_child(root).unwrap();
        dom.remove_child(root, p);
        assert_eq!(dom.parent(p), None);
        assert_eq!(dom.children(root).count(), 1);

        assert_eq!(dom.clear_children(root), root);
        assert_eq!(dom.first_child(root), None);
    }

    #[test]
    fn test_clone_node_is_shallow() {
        let (mut dom, _doc, root) = sample();
        dom.set_attribute(root, "id", "r1");
        let copy = dom.clone_node(root);

        assert_ne!(copy, root);
        assert_eq!(dom.tag_name(copy), Some("root"));
        assert_eq!(dom.attribute(copy, "id"), Some("r1"));
        assert_eq!(dom.first_child(copy), None);
    }

    #[test]
    fn test_clone_subtree_is_deep_and_detached() {
        let (mut dom, doc, root) = sample();
        let copy = dom.clone_subtree(root);

        assert_ne!(copy, root);
        assert_eq!(dom.parent(copy), None);
        assert_eq!(dom.text_content(copy).as_deref(), Some("hello world"));
        let p_copy = dom.first_child(copy).unwrap();
        assert_ne!(Some(p_copy), dom.first_child(root));
        assert_eq!(dom.document_element(doc), Some(root));
        assert_eq!(dom.text_content(root).as_deref(), Some("hello world"));
    }

    #[test]
    fn test_set_attribute_ignored_on_text() {
        let mut dom = Dom::new();
        let text = dom.create_text("t");
        dom.set_attribute(text, "id", "x");
        assert_eq!(dom.attribute(text, "id"), None);
    }
}
