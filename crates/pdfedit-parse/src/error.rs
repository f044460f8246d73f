//! Error types for the document backend.
//!
//! Uses [`thiserror`] for ergonomic error derivation. [`BackendError`]
//! converts into [`EditError`] at the engine boundary.

use pdfedit_core::EditError;
use thiserror::Error;

/// Error type for document backend operations.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving or embedding a font.
    #[error("font error: {0}")]
    Font(String),

    /// Error rewriting a page content stream.
    #[error("content stream error: {0}")]
    Content(String),

    /// Error serializing the edited document.
    #[error("write error: {0}")]
    Write(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] EditError),
}

impl From<lopdf::Error> for BackendError {
    fn from(err: lopdf::Error) -> Self {
        BackendError::Parse(err.to_string())
    }
}

impl From<BackendError> for EditError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) | BackendError::Content(msg) => EditError::ParseError(msg),
            BackendError::Io(e) => EditError::IoError(e.to_string()),
            BackendError::Font(msg) => EditError::FontError(msg),
            BackendError::Write(msg) => EditError::WriteError(msg),
            BackendError::Core(e) => e,
        }
    }
}
