use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("Request timed out after {0} s")]
    Timeout(u64),

    #[error("Server unreachable: {0}")]
    Unreachable(String),

    #[error("Server returned HTTP {0}")]
    Http(u16),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unexpected data format: {0}")]
    UnexpectedFormat(String),

    #[error("A request for this report is already in progress")]
    Busy,

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

impl ReportError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
