pub mod config;
pub mod session;

pub use config::{PipelineConfig, Provider};
pub use session::Session;
