use crate::{
    core::Container,
    treewalk::{types::Class, TreewalkValue},
};

/// The proxy returned by `super()`: attribute lookups start after `class` in the MRO of the
/// receiver's class.
#[derive(Debug, Clone)]
pub struct Super {
    pub class: Container<Class>,
    pub receiver: TreewalkValue,
}

impl Super {
    pub fn new(class: Container<Class>, receiver: TreewalkValue) -> Self {
        Self { class, receiver }
    }
}
