use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by configuration setters and the scenario boundary.
///
/// Nothing in the simulation core is fatal to the process: invalid
/// configuration is rejected at the setter without touching running state,
/// and scenario errors abort only the load/save in question.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or API parameter.
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed scenario data.
    #[error("scenario format error: {0}")]
    Format(#[from] serde_json::Error),

    /// Propagated I/O errors from the scenario boundary.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
