//! Error types for the parsing and interpreter layers.
//!
//! Uses [`thiserror`] for ergonomic error derivation. Provides [`BackendError`]
//! that wraps backend-specific errors and converts them to [`PdfError`].

use tablers_core::PdfError;
use thiserror::Error;

/// Error type for PDF parsing backend operations.
///
/// Wraps backend-specific errors and provides conversion to [`PdfError`]
/// for unified error handling across the library.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Error from PDF parsing (structure, syntax, object resolution).
    #[error("PDF parse error: {0}")]
    Parse(String),

    /// Error reading PDF data.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error resolving font or encoding information.
    #[error("font error: {0}")]
    Font(String),

    /// Error during content stream interpretation.
    #[error("interpreter error: {0}")]
    Interpreter(String),

    /// The document is encrypted and requires a password, or the password given was wrong.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// A core library error.
    #[error(transparent)]
    Core(#[from] PdfError),
}

impl From<BackendError> for PdfError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Parse(msg) => PdfError::BackendError(msg),
            BackendError::Io(e) => PdfError::BackendError(e.to_string()),
            BackendError::Font(msg) => PdfError::BackendError(format!("font error: {msg}")),
            BackendError::Interpreter(msg) => PdfError::BackendError(msg),
            BackendError::Auth(msg) => PdfError::AuthFailed(msg),
            BackendError::Core(e) => e,
        }
    }
}
