mod assert;
mod errors;
mod helpers;

pub(crate) use assert::*;
pub(crate) use errors::*;
pub(crate) use helpers::*;
