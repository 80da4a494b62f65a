// crates/citysuggest-core/src/error.rs
use thiserror::Error;

/// Failures while loading a [`Catalog`](crate::Catalog) or setting up logging.
///
/// Query validation never produces one of these: rejected requests are
/// reported as [`FieldErrors`](crate::query::FieldErrors) data. Once a
/// catalog is loaded, the suggestion pipeline is infallible.
#[derive(Error, Debug)]
pub enum CitySuggestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[cfg(feature = "json")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary cache error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Invalid record at line {line}: {reason}")]
    InvalidRecord { line: usize, reason: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    #[error("Init logging error: {0}")]
    InitLogging(#[from] tracing_subscriber::filter::ParseError),
}

pub type Result<T> = std::result::Result<T, CitySuggestError>;
