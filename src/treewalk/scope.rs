use std::collections::{HashMap, HashSet};

use crate::treewalk::TreewalkValue;

/// The names bound in one scope, plus the `global` and `nonlocal` declarations made inside it.
///
/// Insertion order is kept so namespaces list names in the order the source defined them.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    names: Vec<String>,
    symbol_table: HashMap<String, TreewalkValue>,

    /// Used to hold directives such as `global x` which will expire with this scope.
    global_vars: HashSet<String>,

    /// Used to hold directives such as `nonlocal x` which will expire with this scope.
    nonlocal_vars: HashSet<String>,
}

impl Scope {
    pub fn get(&self, name: &str) -> Option<TreewalkValue> {
        self.symbol_table.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.symbol_table.contains_key(name)
    }

    /// All bound names, in definition order.
    pub fn symbols(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn insert(&mut self, name: &str, value: TreewalkValue) -> &mut Self {
        if self
            .symbol_table
            .insert(name.to_string(), value)
            .is_none()
        {
            self.names.push(name.to_string());
        }
        self
    }

    pub fn delete(&mut self, name: &str) -> Option<TreewalkValue> {
        let removed = self.symbol_table.remove(name);
        if removed.is_some() {
            self.names.retain(|n| n != name);
        }
        removed
    }

    /// Given a variable `var`, indicate that `var` should refer to the variable in the
    /// global/module scope for the duration of _this_ local scope.
    pub fn mark_global(&mut self, name: &str) {
        self.global_vars.insert(name.to_string());
    }

    /// Given a variable `var`, indicate that `var` should refer to the variable in the
    /// enclosing scope for the duration of _this_ local scope.
    pub fn mark_nonlocal(&mut self, name: &str) {
        self.nonlocal_vars.insert(name.to_string());
    }

    pub fn has_global(&self, name: &str) -> bool {
        self.global_vars.contains(name)
    }

    pub fn has_nonlocal(&self, name: &str) -> bool {
        self.nonlocal_vars.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TreewalkValue)> {
        self.names
            .iter()
            .filter_map(|name| self.symbol_table.get(name).map(|v| (name.as_str(), v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_definition_order() {
        let mut scope = Scope::default();
        scope
            .insert("b", TreewalkValue::Int(1))
            .insert("a", TreewalkValue::Int(2))
            .insert("b", TreewalkValue::Int(3));

        assert_eq!(scope.symbols(), &["b".to_string(), "a".to_string()]);
        assert_eq!(scope.get("b"), Some(TreewalkValue::Int(3)));

        scope.delete("b");
        assert_eq!(scope.symbols(), &["a".to_string()]);
        assert!(!scope.contains("b"));
    }

    #[test]
    fn declarations() {
        let mut scope = Scope::default();
        scope.mark_global("x");
        scope.mark_nonlocal("y");
        assert!(scope.has_global("x"));
        assert!(!scope.has_global("y"));
        assert!(scope.has_nonlocal("y"));
    }
}
