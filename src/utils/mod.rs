pub mod string_util;

pub use string_util::{StripCodeBlock, join_list, parse_to_list};
