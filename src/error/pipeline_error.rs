use std::borrow::Borrow;

/// Failures surfaced at the boundary of one generation + parse cycle.
///
/// None of these terminate the session; the previous risk table stays
/// usable until a new generation succeeds.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("API 키가 없습니다. 설정 파일, 환경 변수 또는 직접 입력으로 키를 제공하세요")]
    MissingCredential,

    #[error("생성 요청 실패: {0}")]
    Generation(#[from] GenerationError),

    #[error("응답에서 JSON을 찾을 수 없습니다")]
    MalformedResponse { raw: String },

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl PipelineError {
    /// Raw model output attached to a malformed response, for diagnostics.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            PipelineError::MalformedResponse { raw } => Some(raw),
            _ => None,
        }
    }
}

/// Transport, quota and model errors reported by a generation client.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service returned status {code}: {body}")]
    Status { code: u16, body: String },

    #[error("rate limited (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("service returned no text")]
    EmptyResponse,

    #[error("client setup failed: {0}")]
    Client(String),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        GenerationError::Transport(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorKind {
    Missing,
    InvalidType,
    NotAnArray,
    NotAnObject,
}

impl SchemaErrorKind {
    fn describe(&self, row: impl Borrow<usize>, field: impl AsRef<str>) -> String {
        let row = *row.borrow();
        match self {
            SchemaErrorKind::Missing => {
                format!("row {row} is missing field `{}`", field.as_ref())
            }
            SchemaErrorKind::InvalidType => {
                format!("row {row} has an invalid value for `{}`", field.as_ref())
            }
            SchemaErrorKind::NotAnArray => "expected a JSON array of rows".to_owned(),
            SchemaErrorKind::NotAnObject if row == 0 => "expected a JSON object".to_owned(),
            SchemaErrorKind::NotAnObject => format!("row {row} is not a JSON object"),
        }
    }
}

/// A parsed response that does not match the expected shape.
///
/// `row` is 1-based; 0 refers to the document root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("schema error: {}", .kind.describe(.row, .field))]
pub struct SchemaError {
    pub row: usize,
    pub field: String,
    pub kind: SchemaErrorKind,
}

impl SchemaError {
    pub fn missing(row: usize, field: &str) -> Self {
        Self {
            row,
            field: field.to_owned(),
            kind: SchemaErrorKind::Missing,
        }
    }

    pub fn invalid_type(row: usize, field: &str) -> Self {
        Self {
            row,
            field: field.to_owned(),
            kind: SchemaErrorKind::InvalidType,
        }
    }

    pub fn not_an_array() -> Self {
        Self {
            row: 0,
            field: "<root>".to_owned(),
            kind: SchemaErrorKind::NotAnArray,
        }
    }

    pub fn not_an_object(row: usize) -> Self {
        let field = if row == 0 { "<root>" } else { "<row>" };
        Self {
            row,
            field: field.to_owned(),
            kind: SchemaErrorKind::NotAnObject,
        }
    }
}
