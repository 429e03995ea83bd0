use crate::{domain::DebugCallStack, treewalk::types::Exception};

/// An [`Exception`] in flight, together with the call stack at the point it was raised.
#[derive(Debug, PartialEq, Clone)]
pub struct RaisedException {
    pub debug_call_stack: DebugCallStack,
    pub exception: Exception,
}

impl RaisedException {
    pub fn new(debug_call_stack: DebugCallStack, exception: Exception) -> Self {
        Self {
            debug_call_stack,
            exception,
        }
    }
}
