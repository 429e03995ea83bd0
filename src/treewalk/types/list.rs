use crate::{
    domain::utils::normalize_index,
    treewalk::{types::Exception, DomainResult, TreewalkValue},
};

#[derive(Default, Debug, PartialEq, Clone)]
pub struct List {
    items: Vec<TreewalkValue>,
}

impl List {
    pub fn new(items: Vec<TreewalkValue>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[TreewalkValue] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn append(&mut self, item: TreewalkValue) {
        self.items.push(item)
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = TreewalkValue>) {
        self.items.extend(items)
    }

    pub fn insert(&mut self, index: i64, item: TreewalkValue) {
        let len = self.items.len() as i64;
        let index = if index < 0 { index + len } else { index };
        self.items.insert(index.clamp(0, len) as usize, item);
    }

    pub fn getitem(&self, index: i64) -> DomainResult<TreewalkValue> {
        normalize_index(index, self.len())
            .map(|i| self.items[i].clone())
            .ok_or_else(|| Exception::index_error("list index out of range"))
    }

    pub fn setitem(&mut self, index: i64, value: TreewalkValue) -> DomainResult<()> {
        let i = normalize_index(index, self.len())
            .ok_or_else(|| Exception::index_error("list assignment index out of range"))?;
        self.items[i] = value;
        Ok(())
    }

    pub fn delitem(&mut self, index: i64) -> DomainResult<()> {
        let i = normalize_index(index, self.len())
            .ok_or_else(|| Exception::index_error("list assignment index out of range"))?;
        self.items.remove(i);
        Ok(())
    }

    /// Remove and return the item at `index`, the last one by default.
    pub fn pop(&mut self, index: Option<i64>) -> DomainResult<TreewalkValue> {
        if self.items.is_empty() {
            return Err(Exception::index_error("pop from empty list"));
        }
        let i = normalize_index(index.unwrap_or(-1), self.len())
            .ok_or_else(|| Exception::index_error("pop index out of range"))?;
        Ok(self.items.remove(i))
    }

    /// Replace the contiguous run `start..stop` with `items`.
    pub fn splice(&mut self, start: usize, stop: usize, items: Vec<TreewalkValue>) {
        let start = start.min(self.items.len());
        let stop = stop.clamp(start, self.items.len());
        self.items.splice(start..stop, items);
    }

    pub fn reverse(&mut self) {
        self.items.reverse();
    }

    pub fn set_items(&mut self, items: Vec<TreewalkValue>) {
        self.items = items;
    }
}
