pub mod client;
pub mod draft;
pub mod error;
pub mod export;
pub mod extract;
pub mod input;
pub mod message;
pub mod models;
pub mod pipeline;
pub mod prompt;
pub mod render;
pub mod shared;
pub mod utils;
pub mod validate;

pub use error::{Error, PipelineError, Result};
pub use pipeline::RiskPipeline;
