mod container;
pub mod log;
mod stack;
mod utils;

pub use container::Container;
pub use stack::ensure_sufficient_stack;
pub use utils::floats_equal;
