pub mod pipeline_error;

use std::io;

use thiserror::Error as ThisError;

pub use pipeline_error::{GenerationError, PipelineError, SchemaError, SchemaErrorKind};

#[derive(ThisError, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("serde_json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),

    #[error("config parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("csv error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),
}

pub type Result<T> = core::result::Result<T, Error>;
