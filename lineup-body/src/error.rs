use thiserror::Error;

/// Error raised when reading or changing body options.
#[derive(Debug, Error)]
pub enum OptionsError {
    #[error("unknown option: {0}")]
    UnknownKey(String),

    #[error("invalid option value: {0}")]
    Json(#[from] serde_json::Error),
}
