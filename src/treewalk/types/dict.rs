use std::collections::HashMap;

use crate::treewalk::{utils::HashKey, DomainResult, TreewalkValue};

/// An insertion-ordered mapping.
#[derive(Debug, Clone, Default)]
pub struct Dict {
    entries: Vec<(TreewalkValue, TreewalkValue)>,
    index: HashMap<HashKey, usize>,
}

impl Dict {
    pub fn from_items(items: Vec<(TreewalkValue, TreewalkValue)>) -> DomainResult<Self> {
        let mut dict = Self::default();
        for (key, value) in items {
            dict.insert(key, value)?;
        }
        Ok(dict)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &TreewalkValue) -> DomainResult<Option<TreewalkValue>> {
        let hash_key = key.as_hash_key()?;
        Ok(self.index.get(&hash_key).map(|i| self.entries[*i].1.clone()))
    }

    pub fn contains_key(&self, key: &TreewalkValue) -> DomainResult<bool> {
        Ok(self.index.contains_key(&key.as_hash_key()?))
    }

    /// Insert or overwrite. An existing key keeps its original position and its original key
    /// object, as in Python.
    pub fn insert(&mut self, key: TreewalkValue, value: TreewalkValue) -> DomainResult<()> {
        let hash_key = key.as_hash_key()?;
        match self.index.get(&hash_key) {
            Some(i) => self.entries[*i].1 = value,
            None => {
                self.index.insert(hash_key, self.entries.len());
                self.entries.push((key, value));
            }
        }
        Ok(())
    }

    pub fn remove(&mut self, key: &TreewalkValue) -> DomainResult<Option<TreewalkValue>> {
        let Some(position) = self.index.remove(&key.as_hash_key()?) else {
            return Ok(None);
        };

        let (_, value) = self.entries.remove(position);
        for i in self.index.values_mut() {
            if *i > position {
                *i -= 1;
            }
        }
        Ok(Some(value))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    pub fn entries(&self) -> &[(TreewalkValue, TreewalkValue)] {
        &self.entries
    }

    pub fn keys(&self) -> Vec<TreewalkValue> {
        self.entries.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn values(&self) -> Vec<TreewalkValue> {
        self.entries.iter().map(|(_, v)| v.clone()).collect()
    }
}

impl PartialEq for Dict {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| matches!(other.get(k), Ok(Some(ref o)) if o == v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(value: &str) -> TreewalkValue {
        TreewalkValue::Str(value.to_string())
    }

    #[test]
    fn keeps_insertion_order() {
        let mut dict = Dict::default();
        dict.insert(s("b"), TreewalkValue::Int(1)).unwrap();
        dict.insert(s("a"), TreewalkValue::Int(2)).unwrap();
        dict.insert(s("b"), TreewalkValue::Int(3)).unwrap();

        assert_eq!(dict.keys(), vec![s("b"), s("a")]);
        assert_eq!(dict.get(&s("b")).unwrap(), Some(TreewalkValue::Int(3)));
    }

    #[test]
    fn remove_reindexes() {
        let mut dict = Dict::from_items(vec![
            (s("a"), TreewalkValue::Int(1)),
            (s("b"), TreewalkValue::Int(2)),
            (s("c"), TreewalkValue::Int(3)),
        ])
        .unwrap();

        assert_eq!(dict.remove(&s("a")).unwrap(), Some(TreewalkValue::Int(1)));
        assert_eq!(dict.remove(&s("a")).unwrap(), None);
        assert_eq!(dict.get(&s("c")).unwrap(), Some(TreewalkValue::Int(3)));
        assert_eq!(dict.values(), vec![TreewalkValue::Int(2), TreewalkValue::Int(3)]);
    }

    #[test]
    fn numeric_keys_unify() {
        let mut dict = Dict::default();
        dict.insert(TreewalkValue::Int(1), s("int")).unwrap();
        dict.insert(TreewalkValue::Float(1.0), s("float")).unwrap();
        dict.insert(TreewalkValue::Bool(true), s("bool")).unwrap();

        assert_eq!(dict.len(), 1);
        assert_eq!(dict.keys(), vec![TreewalkValue::Int(1)]);
        assert_eq!(dict.get(&TreewalkValue::Int(1)).unwrap(), Some(s("bool")));
    }

    #[test]
    fn unhashable_keys() {
        let mut dict = Dict::default();
        let key = TreewalkValue::List(Default::default());
        assert_eq!(
            dict.insert(key, TreewalkValue::None).unwrap_err().message(),
            "unhashable type: 'list'"
        );
    }
}
