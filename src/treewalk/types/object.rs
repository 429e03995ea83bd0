use std::fmt::{Debug, Error, Formatter};

use crate::{
    core::Container,
    treewalk::{types::Class, Scope},
};

/// An instance of a class.
pub struct Object {
    pub class: Container<Class>,
    pub attrs: Scope,
}

impl Object {
    pub fn new(class: Container<Class>) -> Self {
        Self {
            class,
            attrs: Scope::default(),
        }
    }

    pub fn class_name(&self) -> String {
        self.class.borrow().name.clone()
    }
}

impl Debug for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), Error> {
        write!(f, "<{} object>", self.class_name())
    }
}
