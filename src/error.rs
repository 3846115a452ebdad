use thiserror::Error;

/// Errors surfaced by the library. Row-level problems never show up here:
/// bad numbers and missing categories are absorbed by the normalizer.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("failed to read CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to decode JSON input: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid input data: {0}")]
    InvalidInput(String),

    #[error("view parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, DashboardError>;
