//! Ordered rule table.

use super::rule::Rule;
use crate::dom::TreeModel;

/// Rules in registration order.
///
/// Rules are only ever appended. A rule shadowed by an earlier one is kept
/// and simply never fires.
pub struct RuleTable<M: TreeModel, T> {
    rules: Vec<Rule<M, T>>,
}

impl<M: TreeModel, T> RuleTable<M, T> {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append rules, keeping their relative order.
    pub fn add_rules(&mut self, rules: impl IntoIterator<Item = Rule<M, T>>) {
        self.rules.extend(rules);
    }

    /// Append a single rule.
    pub fn add_rule(&mut self, rule: Rule<M, T>) {
        self.rules.push(rule);
    }

    /// Find the first rule matching the node.
    ///
    /// Returns `None` when nothing matches; callers drop such nodes.
    pub fn find_match(&self, tree: &M, node: M::Node) -> Option<&Rule<M, T>> {
        self.rules.iter().find(|rule| rule.matches(tree, node))
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Iterate over the rules in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Rule<M, T>> {
        self.rules.iter()
    }

    /// Names of all rules in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(Rule::name).collect()
    }
}

impl<M: TreeModel, T> Default for RuleTable<M, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: TreeModel, T> std::fmt::Debug for RuleTable<M, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, TreeModel};

    fn constant(name: &'static str) -> Rule<Dom, String> {
        Rule::element(name, move |_, _, _| Ok(name.to_string()))
    }

    #[test]
    fn test_table_add_preserves_order() {
        let mut table = RuleTable::new();
        table.add_rules([constant("p"), constant("*")]);
        table.add_rule(constant("/"));

        assert_eq!(table.len(), 3);
        assert_eq!(table.names(), vec!["p", "*", "/"]);
    }

    #[test]
    fn test_find_match_first_wins() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let root = dom.append_element(doc, "body");
        let p = dom.append_element(root, "p");

        let mut table = RuleTable::new();
        table.add_rules([constant("*"), constant("p")]);

        let rule = table.find_match(&dom, p).unwrap();
        assert_eq!(rule.name(), "*");
    }

    #[test]
    fn test_find_match_none() {
        let mut dom = Dom::new();
        let text = dom.create_text("hello");

        let mut table = RuleTable::new();
        table.add_rule(constant("*"));

        assert!(table.find_match(&dom, text).is_none());
        assert!(RuleTable::<Dom, String>::new().is_empty());
    }
}
