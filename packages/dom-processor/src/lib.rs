//! DOM Processor - rule-driven tree transformation.
//!
//! A processor walks a document tree, dispatches every node to the first
//! registered rule that matches it, and folds the results of each sibling
//! chain with an output combinator. The same traversal produces either a
//! rebuilt tree or flattened text, depending on the combinator.
//!
//! # Example
//!
//! ```
//! use dom_processor::dom::{xml, Dom};
//! use dom_processor::registry::Rule;
//! use dom_processor::TextProcessor;
//!
//! let mut dom = Dom::new();
//! let doc = xml::load(&mut dom, "<p>Hello <b>world</b></p>").unwrap();
//!
//! let shout: Rule<Dom, String> = Rule::element("b", |p, tree, node| {
//!     let inner: String = p.process_children(tree, Some(node))?.unwrap_or_default();
//!     Ok(inner.to_uppercase())
//! });
//! let processor = TextProcessor::with_basic_rules([shout]);
//!
//! let text = processor.process(&mut dom, Some(doc)).unwrap();
//! assert_eq!(text.as_deref(), Some("Hello WORLD"));
//! ```
//!
//! # Architecture
//!
//! - [`dom`]: Tree model trait, arena implementation and XML loading
//! - [`registry`]: Rules, tag specifiers and the ordered rule table
//! - [`engine`]: Generic traversal engine
//! - [`tree`]: Tree-to-tree specialization
//! - [`text`]: Tree-to-text specialization
//! - [`config`]: Constants and argument validation
//! - [`error`]: Error types and Result alias
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod dom;
pub mod engine;
pub mod error;
pub mod registry;
pub mod text;
pub mod tree;

// Re-export commonly used items
pub use dom::{Dom, NodeId, NodeKind, TreeModel};
pub use engine::{Processor, ProcessorProps};
pub use error::{ProcessorError, Result};
pub use registry::{Rule, RuleTable, TagSpecifier};
pub use text::TextProcessor;
pub use tree::TreeProcessor;
