use crate::treewalk::TreewalkValue;

/// A callable bound to its receiver, which is passed as the first argument.
#[derive(Debug, Clone)]
pub struct Method {
    pub receiver: TreewalkValue,
    pub function: TreewalkValue,
}

impl Method {
    pub fn new(receiver: TreewalkValue, function: TreewalkValue) -> Self {
        Self { receiver, function }
    }

    pub fn name(&self) -> String {
        match &self.function {
            TreewalkValue::Function(f) => f.borrow().name.clone(),
            TreewalkValue::BuiltinFunction(b) => b.name().to_string(),
            other => other.type_name(),
        }
    }
}
