//! Rule table for node dispatch.
//!
//! A rule pairs a matcher with an action. Matchers are explicit predicates
//! or tag specifiers (`*`, `/`, or a literal tag name). Rules are kept in
//! registration order and the first matching rule wins, however specific a
//! later rule may be.

mod core;
mod rule;

pub use core::RuleTable;
pub use rule::{is_element_matching, is_root, Action, Matcher, Predicate, Rule, TagSpecifier};
