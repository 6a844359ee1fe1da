//! Error types for snapshot loading and report export.
//!
//! The analytic stages themselves never fail: bad rows are dropped and
//! undefined metrics are carried as `None`. Only the I/O edges return errors.

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
