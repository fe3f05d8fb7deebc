pub mod catalog;
pub mod model;

pub use catalog::TagCatalog;
pub use model::{DEFAULT_WORKER_COUNT, RawTaskInput, TaskDescription};
