//! Traversal engine that dispatches nodes to rules and folds the results.

use std::fmt;

use crate::dom::TreeModel;
use crate::error::Result;
use crate::registry::{Rule, RuleTable};

/// Output combinator folding the ordered sibling results into one value.
pub type OutputFn<M, T> = dyn Fn(&mut M, Vec<T>) -> T + Send + Sync;

/// Construction parameters for a [`Processor`].
pub struct ProcessorProps<M: TreeModel, T> {
    /// Combinator applied to every sibling buffer.
    pub output: Box<OutputFn<M, T>>,
}

impl<M: TreeModel, T> ProcessorProps<M, T> {
    /// Props with the given combinator.
    pub fn new<F>(output: F) -> Self
    where
        F: Fn(&mut M, Vec<T>) -> T + Send + Sync + 'static,
    {
        Self {
            output: Box::new(output),
        }
    }
}

/// Engine that walks a tree and dispatches nodes to their first matching rule.
///
/// Documents and fragments are never matched: a document forwards to its
/// document element and a fragment to the chain of its children. Nodes
/// that match no rule are dropped from the output. Errors raised by actions
/// propagate to the caller untouched and abort the walk.
///
/// The rule table and combinator are fixed once processing starts; the
/// processor keeps no per-call state.
pub struct Processor<M: TreeModel, T> {
    rules: RuleTable<M, T>,
    output: Box<OutputFn<M, T>>,
}

impl<M: TreeModel, T> Processor<M, T> {
    /// Create a processor without rules.
    #[must_use]
    pub fn new(props: ProcessorProps<M, T>) -> Self {
        Self {
            rules: RuleTable::new(),
            output: props.output,
        }
    }

    /// Append rules after the ones already registered.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule<M, T>>) {
        self.rules.add_rules(rules);
    }

    /// Get a reference to the rule table.
    #[must_use]
    pub fn rules(&self) -> &RuleTable<M, T> {
        &self.rules
    }

    /// First rule matching the node, if any.
    pub fn find_match(&self, tree: &M, node: M::Node) -> Option<&Rule<M, T>> {
        self.rules.find_match(tree, node)
    }

    /// Run the combinator on a finished buffer.
    pub fn output(&self, tree: &mut M, buffer: Vec<T>) -> T {
        (self.output)(tree, buffer)
    }

    /// Transform a single node.
    ///
    /// # Returns
    /// - `None` for `None`, for an unmatched node, and for a document without
    ///   a document element
    /// - the result for the document element when given a document
    /// - the folded children when given a fragment
    /// - otherwise the matched rule's action result
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process(&self, tree: &mut M, node: Option<M::Node>) -> Result<Option<T>> {
        let Some(node) = node else {
            return Ok(None);
        };

        if tree.is_document(node) {
            let root = tree.document_element(node);
            return self.process(tree, root);
        }
        if tree.is_fragment(node) {
            let first = tree.first_child(node);
            return self.process_siblings(tree, first);
        }

        match self.rules.find_match(tree, node) {
            Some(rule) => {
                tracing::trace!(rule = rule.name(), ?node, "rule matched");
                rule.apply(self, tree, node).map(Some)
            }
            None => {
                tracing::debug!(
                    ?node,
                    kind = tree.kind(node).as_str(),
                    tag = tree.tag_name(node).unwrap_or_default(),
                    "no rule matched, node dropped"
                );
                Ok(None)
            }
        }
    }

    /// Transform a node and all its following siblings, folding the results.
    ///
    /// Unmatched siblings contribute nothing to the buffer. The combinator
    /// runs even when no sibling matched, so only a `None` start yields
    /// `None`.
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process_siblings(&self, tree: &mut M, first: Option<M::Node>) -> Result<Option<T>> {
        let Some(first) = first else {
            return Ok(None);
        };

        let mut buffer = Vec::new();
        let mut current = Some(first);
        while let Some(node) = current {
            // Read ahead so an action detaching `node` does not end the walk.
            current = tree.next_sibling(node);
            match self.rules.find_match(tree, node) {
                Some(rule) => {
                    tracing::trace!(rule = rule.name(), ?node, "rule matched");
                    buffer.push(rule.apply(self, tree, node)?);
                }
                None => {
                    tracing::debug!(
                        ?node,
                        kind = tree.kind(node).as_str(),
                        tag = tree.tag_name(node).unwrap_or_default(),
                        "no rule matched, sibling skipped"
                    );
                }
            }
        }

        Ok(Some(self.output(tree, buffer)))
    }

    /// Transform the children of a node.
    ///
    /// A node without children yields `None`, which is distinct from the
    /// combinator's result on an empty buffer (children present, none
    /// matched).
    ///
    /// # Errors
    /// Propagates the first error returned by any action.
    pub fn process_children(&self, tree: &mut M, node: Option<M::Node>) -> Result<Option<T>> {
        let Some(node) = node else {
            return Ok(None);
        };
        let first = tree.first_child(node);
        self.process_siblings(tree, first)
    }
}

impl<M: TreeModel + 'static> Processor<M, String> {
    /// Processor whose combinator joins the items into one string.
    #[must_use]
    pub fn concatenating() -> Self {
        Self::new(ProcessorProps::new(|_: &mut M, buffer: Vec<String>| {
            buffer.concat()
        }))
    }
}

impl<M: TreeModel, T> fmt::Debug for Processor<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Processor")
            .field("rules", &self.rules)
            .finish_non_exhaustive()
    }
}
