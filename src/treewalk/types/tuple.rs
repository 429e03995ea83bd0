use std::sync::Arc;

use crate::{
    domain::utils::normalize_index,
    treewalk::{types::Exception, DomainResult, TreewalkValue},
};

/// An immutable sequence. Clones share their items, which gives tuples an identity for `is`.
#[derive(Default, Debug, PartialEq, Clone)]
pub struct Tuple(Arc<Vec<TreewalkValue>>);

impl Tuple {
    pub fn new(items: Vec<TreewalkValue>) -> Self {
        Self(Arc::new(items))
    }

    pub fn items(&self) -> &[TreewalkValue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn getitem(&self, index: i64) -> DomainResult<TreewalkValue> {
        normalize_index(index, self.len())
            .map(|i| self.0[i].clone())
            .ok_or_else(|| Exception::index_error("tuple index out of range"))
    }

    pub fn same_identity(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}
