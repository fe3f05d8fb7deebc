pub mod csv;

pub use self::csv::{export_csv, export_file, import_csv, import_file};
