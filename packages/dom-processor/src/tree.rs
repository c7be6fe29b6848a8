//! Tree-to-tree processor.
//!
//! Builds a new tree in the same model. Sibling results are collected into
//! a fresh fragment, and a document input yields a brand-new document
//! wrapping the transformed document element. The input tree is left
//! untouched: the bundled rules copy nodes, and a produced node that is still
//! attached (a rule returning its input node as is) is deep-copied before it
//! is collected.

use crate::dom::TreeModel;
use crate::engine::{Processor, ProcessorProps};
use crate::error::Result;
use crate::registry::{Rule, RuleTable};

/// Processor producing nodes of the tree it reads.
///
/// Output is allocated in the same model as the input. Every collected
/// sibling chain costs one fragment, which is emptied once its children are
/// appended to their new parent; with [`Dom`](crate::dom::Dom) those
/// fragments stay allocated until the arena is dropped, so long-running
/// callers should process each input in its own arena.
pub struct TreeProcessor<M: TreeModel> {
    engine: Processor<M, M::Node>,
}

impl<M: TreeModel + 'static> TreeProcessor<M> {
    /// Create a processor without rules.
    #[must_use]
    pub fn new() -> Self {
        Self {
            engine: Processor::new(ProcessorProps::new(collect_into_fragment::<M>)),
        }
    }

    /// Create a processor with the given rules, in order.
    #[must_use]
    pub fn with_rules(rules: impl IntoIterator<Item = Rule<M, M::Node>>) -> Self {
        let mut processor = Self::new();
        processor.add_rules(rules);
        processor
    }

    /// Create a processor whose custom rules take precedence over
    /// [`basic_rules`](Self::basic_rules).
    #[must_use]
    pub fn with_basic_rules(rules: impl IntoIterator<Item = Rule<M, M::Node>>) -> Self {
        let mut processor = Self::with_rules(rules);
        processor.add_rules(Self::basic_rules());
        processor
    }

    /// Default rules: copy text nodes, and rebuild every element as a
    /// shallow copy holding its transformed children.
    #[must_use]
    pub fn basic_rules() -> Vec<Rule<M, M::Node>> {
        vec![
            Rule::when(
                |tree: &M, node| tree.is_text(node),
                |_, tree: &mut M, node| Ok(tree.clone_node(node)),
            )
            .named("text"),
            Rule::element("*", |processor, tree: &mut M, node| {
                let copy = tree.clone_node(node);
                if let Some(fragment) = processor.process_children(tree, Some(node))? {
                    if tree.first_child(fragment).is_some() {
                        tree.append_child(copy, fragment);
                    }
                }
                Ok(copy)
            }),
        ]
    }
}

impl<M: TreeModel> TreeProcessor<M> {
    /// Append rules after the ones already registered.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule<M, M::Node>>) {
        self.engine.add_rules(rules);
    }

    /// Get a reference to the rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleTable<M, M::Node> {
        self.engine.rules()
    }

    /// Get a reference to the underlying engine.
    #[must_use]
    pub fn engine(&self) -> &Processor<M, M::Node> {
        &self.engine
    }

    /// Transform a node.
    ///
    /// - a fragment yields a new fragment of its transformed children
    ///   (`None` when it has no children)
    /// - a document yields a new document holding the transformed document
    ///   element, if any
    /// - any other node yields its matched rule's result
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process(&self, tree: &mut M, node: Option<M::Node>) -> Result<Option<M::Node>> {
        let Some(node) = node else {
            return Ok(None);
        };

        if tree.is_fragment(node) {
            return self.engine.process_children(tree, Some(node));
        }
        if tree.is_document(node) {
            let document = tree.create_document();
            let document = tree.clear_children(document);
            let root = tree.document_element(node);
            if let Some(result) = self.process(tree, root)? {
                let result = detached(tree, result);
                tree.append_child(document, result);
            }
            return Ok(Some(document));
        }

        self.engine.process(tree, Some(node))
    }

    /// Transform the children of a node into a fragment.
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process_children(&self, tree: &mut M, node: Option<M::Node>) -> Result<Option<M::Node>> {
        self.engine.process_children(tree, node)
    }

    /// Transform a sibling chain into a fragment.
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process_siblings(&self, tree: &mut M, first: Option<M::Node>) -> Result<Option<M::Node>> {
        self.engine.process_siblings(tree, first)
    }
}

impl<M: TreeModel + 'static> Default for TreeProcessor<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TreeModel> std::fmt::Debug for TreeProcessor<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeProcessor")
            .field("engine", &self.engine)
            .finish()
    }
}

/// Combinator: append every produced node to a new fragment.
///
/// Handles that do not resolve in the model, and documents, cannot be
/// children and are discarded.
fn collect_into_fragment<M: TreeModel>(tree: &mut M, buffer: Vec<M::Node>) -> M::Node {
    let fragment = tree.create_fragment();
    for node in buffer {
        if tree.is_node(node) && !tree.is_document(node) {
            let node = detached(tree, node);
            tree.append_child(fragment, node);
        } else {
            tracing::debug!(?node, "discarding produced value that is not a child node");
        }
    }
    fragment
}

/// The node itself when it has no parent, otherwise a deep copy, so that
/// appending the result never moves a node out of another tree.
fn detached<M: TreeModel>(tree: &mut M, node: M::Node) -> M::Node {
    if tree.parent(node).is_some() {
        tracing::trace!(?node, "copying attached output node");
        tree.clone_subtree(node)
    } else {
        node
    }
}

/// Rule that removes matching elements and their subtree from the output.
#[must_use]
pub fn drop_element<M: TreeModel + 'static>(specifier: &str) -> Rule<M, M::Node> {
    Rule::element(specifier, |_, tree: &mut M, _| Ok(tree.create_fragment()))
}

/// Rule that replaces matching elements by their transformed children.
#[must_use]
pub fn unwrap_element<M: TreeModel + 'static>(specifier: &str) -> Rule<M, M::Node> {
    Rule::element(specifier, |processor, tree: &mut M, node| {
        match processor.process_children(tree, Some(node))? {
            Some(fragment) => Ok(fragment),
            None => Ok(tree.create_fragment()),
        }
    })
}
