mod context;
mod helpers;

pub use context::*;
pub(crate) use helpers::*;
