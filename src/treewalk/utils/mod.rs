mod args;
mod bind_args;
mod hash_key;

pub use args::{check_args, no_keywords, Args};
pub use bind_args::bind_args;
pub use hash_key::HashKey;
