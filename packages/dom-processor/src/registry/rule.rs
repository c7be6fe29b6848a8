//! Rule and matcher definitions.

use std::fmt;

use crate::config::{ROOT_SPECIFIER, WILDCARD_SPECIFIER};
use crate::dom::TreeModel;
use crate::engine::Processor;
use crate::error::Result;

/// Predicate deciding whether a rule applies to a node.
pub type Predicate<M> = dyn Fn(&M, <M as TreeModel>::Node) -> bool + Send + Sync;

/// Action producing the output item for a matched node.
///
/// The action receives the processor so it can recurse into the node's
/// children through the same rule table.
pub type Action<M, T> =
    dyn Fn(&Processor<M, T>, &mut M, <M as TreeModel>::Node) -> Result<T> + Send + Sync;

/// Compiled form of a tag specifier string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagSpecifier {
    /// `*` (or an empty specifier): any element.
    AnyElement,
    /// `/`: the document element of the node's owner document.
    Root,
    /// Exact tag name.
    Name(String),
}

impl TagSpecifier {
    /// Compile a specifier string.
    ///
    /// Whitespace around `*` and `/` is ignored; literal tag names are taken
    /// as given.
    ///
    /// # Examples
    /// ```
    /// use dom_processor::registry::TagSpecifier;
    ///
    /// assert_eq!(TagSpecifier::parse(" * "), TagSpecifier::AnyElement);
    /// assert_eq!(TagSpecifier::parse(""), TagSpecifier::AnyElement);
    /// assert_eq!(TagSpecifier::parse("/"), TagSpecifier::Root);
    /// assert_eq!(TagSpecifier::parse("p"), TagSpecifier::Name("p".to_string()));
    /// ```
    #[must_use]
    pub fn parse(specifier: &str) -> Self {
        match specifier.trim() {
            "" | WILDCARD_SPECIFIER => TagSpecifier::AnyElement,
            ROOT_SPECIFIER => TagSpecifier::Root,
            _ => TagSpecifier::Name(specifier.to_string()),
        }
    }

    /// Whether the node is an element selected by this specifier.
    pub fn matches<M: TreeModel>(&self, tree: &M, node: M::Node) -> bool {
        if !tree.is_element(node) {
            return false;
        }
        match self {
            TagSpecifier::AnyElement => true,
            TagSpecifier::Root => is_root(tree, node),
            TagSpecifier::Name(name) => tree.tag_name(node) == Some(name.as_str()),
        }
    }
}

impl fmt::Display for TagSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagSpecifier::AnyElement => f.write_str(WILDCARD_SPECIFIER),
            TagSpecifier::Root => f.write_str(ROOT_SPECIFIER),
            TagSpecifier::Name(name) => f.write_str(name),
        }
    }
}

/// Whether the node is the document element of its owner document.
pub fn is_root<M: TreeModel>(tree: &M, node: M::Node) -> bool {
    tree.is_element(node)
        && tree
            .owner_document(node)
            .and_then(|doc| tree.document_element(doc))
            == Some(node)
}

/// Whether the node is an element selected by the specifier string.
///
/// `None` selects any element.
pub fn is_element_matching<M: TreeModel>(tree: &M, node: M::Node, specifier: Option<&str>) -> bool {
    specifier
        .map_or(TagSpecifier::AnyElement, TagSpecifier::parse)
        .matches(tree, node)
}

/// How a rule selects nodes.
pub enum Matcher<M: TreeModel> {
    /// Compiled tag specifier.
    Tag(TagSpecifier),
    /// Caller supplied predicate.
    When(Box<Predicate<M>>),
}

impl<M: TreeModel> Matcher<M> {
    /// Evaluate the matcher against a node.
    pub fn matches(&self, tree: &M, node: M::Node) -> bool {
        match self {
            Matcher::Tag(specifier) => specifier.matches(tree, node),
            Matcher::When(predicate) => predicate(tree, node),
        }
    }
}

/// A matcher paired with the action to run on matching nodes.
pub struct Rule<M: TreeModel, T> {
    name: String,
    matcher: Matcher<M>,
    action: Box<Action<M, T>>,
}

impl<M: TreeModel, T> Rule<M, T> {
    /// Build a rule from an explicit predicate.
    pub fn when<P, A>(predicate: P, action: A) -> Self
    where
        P: Fn(&M, M::Node) -> bool + Send + Sync + 'static,
        A: Fn(&Processor<M, T>, &mut M, M::Node) -> Result<T> + Send + Sync + 'static,
    {
        Self {
            name: "predicate".to_string(),
            matcher: Matcher::When(Box::new(predicate)),
            action: Box::new(action),
        }
    }

    /// Build a rule from a tag specifier (`*`, `/` or a tag name).
    pub fn element<A>(specifier: &str, action: A) -> Self
    where
        A: Fn(&Processor<M, T>, &mut M, M::Node) -> Result<T> + Send + Sync + 'static,
    {
        let specifier = TagSpecifier::parse(specifier);
        Self {
            name: specifier.to_string(),
            matcher: Matcher::Tag(specifier),
            action: Box::new(action),
        }
    }

    /// Replace the name used in logs and action errors.
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Name of the rule: its tag specifier, `predicate`, or a custom name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The rule's matcher.
    #[must_use]
    pub fn matcher(&self) -> &Matcher<M> {
        &self.matcher
    }

    /// Whether the rule applies to the node.
    pub fn matches(&self, tree: &M, node: M::Node) -> bool {
        self.matcher.matches(tree, node)
    }

    /// Run the action on a node.
    ///
    /// # Errors
    /// Whatever the action returns; nothing is caught here.
    pub fn apply(&self, processor: &Processor<M, T>, tree: &mut M, node: M::Node) -> Result<T> {
        (self.action)(processor, tree, node)
    }
}

impl<M: TreeModel, T> fmt::Debug for Rule<M, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let matcher = match &self.matcher {
            Matcher::Tag(specifier) => format!("tag({specifier})"),
            Matcher::When(_) => "when(..)".to_string(),
        };
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("matcher", &matcher)
            .finish()
    }
}
