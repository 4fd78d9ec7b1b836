//! Error kinds produced by the core.
//!
//! The four domain kinds map one-to-one onto the caller-visible failure
//! shapes (400/401/404/403); everything else is an opaque internal failure
//! that the transport layer logs and reports generically.

use thiserror::Error;

/// Errors produced by the record managers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Malformed or out-of-range input, or a uniqueness violation.
    /// User-correctable; the message carries field-level detail.
    #[error("{0}")]
    Validation(String),

    /// Unauthenticated caller or not-the-owner. Reported generically so the
    /// caller cannot tell which check failed.
    #[error("{0}")]
    Auth(String),

    /// Entity missing, or masked for visibility reasons. Callers cannot
    /// distinguish the two causes.
    #[error("{0}")]
    NotFound(String),

    /// Profile visibility restriction.
    #[error("{0}")]
    Privacy(String),

    /// SQLite failure.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O failure, e.g. creating the database directory.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document failed to decode.
    #[error("document decode error: {0}")]
    Document(#[from] serde_json::Error),

    /// Password hashing failure.
    #[error("password hash error: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

impl CoreError {
    /// Build a [`CoreError::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Build a [`CoreError::Auth`].
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth(message.into())
    }

    /// Build a [`CoreError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Build a [`CoreError::Privacy`].
    pub fn privacy(message: impl Into<String>) -> Self {
        Self::Privacy(message.into())
    }
}

/// Convenience alias used throughout the core.
pub type Result<T> = std::result::Result<T, CoreError>;
