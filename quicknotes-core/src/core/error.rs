//! Error types for the Quicknotes core library.

use thiserror::Error;

/// All errors that can occur within the Quicknotes core library.
#[derive(Debug, Error)]
pub enum QuicknotesError {
    /// A SQLite operation on the key-value backend failed.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A note was rejected before any state changed.
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// The opened file is not a valid Quicknotes store.
    #[error("Invalid store: {0}")]
    InvalidStore(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Note data could not be serialized or an import could not be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`QuicknotesError`].
pub type Result<T> = std::result::Result<T, QuicknotesError>;

impl QuicknotesError {
    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Database(e) => format!("Failed to save: {e}"),
            Self::ValidationFailed(msg) => msg.clone(),
            Self::InvalidStore(_) => "Could not open notes store".to_string(),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
