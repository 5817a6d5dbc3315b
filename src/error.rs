//! Error types for fatigue evaluations.

use thiserror::Error;

/// Result type alias using the fatigue error.
pub type Result<T> = std::result::Result<T, FatigueError>;

/// Errors that can abort an evaluation sweep.
#[derive(Error, Debug)]
pub enum FatigueError {
    /// Unknown or inconsistent analysis settings.
    #[error("configuration error: {0}")]
    Config(String),

    /// Missing or ambiguous material data.
    #[error("material error: {0}")]
    Material(String),

    /// Mesh lookups that could not be satisfied.
    #[error("mesh error: {0}")]
    Mesh(String),

    /// Result set lookups that could not be satisfied.
    #[error("result error: {0}")]
    Results(String),

    /// Values that cannot be used in a calculation.
    #[error("numerical error: {0}")]
    Numerical(String),

    /// Writing or reading a result table.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed job file.
    #[error("job file error: {0}")]
    Json(#[from] serde_json::Error),
}
