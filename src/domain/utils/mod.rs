mod comma_separated;
mod indices;

pub use comma_separated::{
    format_comma_separated, format_comma_separated_with, format_float, quote_str,
};
pub use indices::{normalize_index, slice_indices, wrap_negative};
