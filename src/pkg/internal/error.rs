use axum::http::StatusCode;
use standard_error::{Interpolate, StandardError, Status};
use thiserror::Error;

/// Failures raised by the job record layer.
///
/// Database errors are carried through untouched; the outer layer decides
/// how to report them.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("duplicate job: {0}")]
    Duplicate(String),
    #[error("no job: {0}")]
    NotFound(i32),
    #[error(transparent)]
    Persistence(#[from] sqlx::Error),
}

pub type RecordResult<T> = core::result::Result<T, RecordError>;

impl From<RecordError> for StandardError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::InvalidInput(msg) => StandardError::new("ERR-JOB-001")
                .code(StatusCode::BAD_REQUEST)
                .interpolate_err(msg),
            RecordError::Duplicate(title) => StandardError::new("ERR-JOB-002")
                .code(StatusCode::BAD_REQUEST)
                .interpolate_err(title),
            RecordError::NotFound(id) => StandardError::new("ERR-JOB-404")
                .code(StatusCode::NOT_FOUND)
                .interpolate_err(id.to_string()),
            RecordError::Persistence(e) => StandardError::new("ERR-DB-001")
                .code(StatusCode::INTERNAL_SERVER_ERROR)
                .interpolate_err(e.to_string()),
        }
    }
}
