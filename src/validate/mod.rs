pub mod contract;
pub mod draft;
pub mod rows;

pub use contract::{ContractWarning, check_contract};
pub use draft::parse_draft;
pub use rows::{coerce_int, validate_rows, validate_table};
