pub mod merge;

pub use merge::{DraftEdits, FieldEdit, merge_draft};
