//! Error and warning types for pdfedit-rs.
//!
//! [`EditError`] is fatal and aborts a job: the document cannot be opened,
//! the page filter is invalid, or the result cannot be written.
//! [`EditWarning`] records per-match problems that are skipped so the rest
//! of the batch can continue.

use std::fmt;

/// Fatal error types for document editing.
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// The input document does not exist.
    DocumentNotFound(String),
    /// A page filter or page range is malformed or names pages that do not exist.
    InvalidPageRange(String),
    /// Error parsing PDF structure or syntax.
    ParseError(String),
    /// I/O error reading or writing PDF data.
    IoError(String),
    /// Error resolving or embedding a font.
    FontError(String),
    /// The mutated document could not be serialized.
    WriteError(String),
    /// The document is encrypted and cannot be edited.
    EncryptedDocument,
    /// Any other error not covered by specific variants.
    Other(String),
}

impl fmt::Display for EditError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditError::DocumentNotFound(path) => write!(f, "document not found: {path}"),
            EditError::InvalidPageRange(msg) => write!(f, "invalid page range: {msg}"),
            EditError::ParseError(msg) => write!(f, "parse error: {msg}"),
            EditError::IoError(msg) => write!(f, "I/O error: {msg}"),
            EditError::FontError(msg) => write!(f, "font error: {msg}"),
            EditError::WriteError(msg) => write!(f, "write error: {msg}"),
            EditError::EncryptedDocument => write!(f, "PDF is encrypted and cannot be edited"),
            EditError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EditError {}

impl From<std::io::Error> for EditError {
    fn from(err: std::io::Error) -> Self {
        EditError::IoError(err.to_string())
    }
}

/// Machine-readable category of a non-fatal editing issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditWarningCode {
    /// The phrase is on the page but its boundaries could not be located.
    NoMatchFound,
    /// A match rectangle did not land on any reconstructed line.
    LineDetectionFailed,
    /// Redrawn text runs past the erased area or the page boundary.
    Overflow,
    /// Content below a rebuilt selection moved down.
    ContentShifted,
    /// The job's time budget ran out before every page was processed.
    TimedOut,
    /// Anything else, e.g. a failed redraw of a single match.
    Other,
}

impl EditWarningCode {
    /// Returns the string tag for this warning code.
    pub fn as_str(&self) -> &'static str {
        match self {
            EditWarningCode::NoMatchFound => "NO_MATCH_FOUND",
            EditWarningCode::LineDetectionFailed => "LINE_DETECTION_FAILED",
            EditWarningCode::Overflow => "OVERFLOW",
            EditWarningCode::ContentShifted => "CONTENT_SHIFTED",
            EditWarningCode::TimedOut => "TIMED_OUT",
            EditWarningCode::Other => "OTHER",
        }
    }
}

impl fmt::Display for EditWarningCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-fatal issue recorded while editing.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EditWarning {
    pub code: EditWarningCode,
    /// Human-readable description.
    pub description: String,
    /// Page index (0-based), if the issue is tied to a page.
    pub page: Option<usize>,
}

impl EditWarning {
    /// Create a warning with a specific code and description.
    pub fn with_code(code: EditWarningCode, description: impl Into<String>) -> Self {
        Self {
            code,
            description: description.into(),
            page: None,
        }
    }

    /// Create a warning tied to a page.
    pub fn on_page(code: EditWarningCode, description: impl Into<String>, page: usize) -> Self {
        Self {
            code,
            description: description.into(),
            page: Some(page),
        }
    }
}

impl fmt::Display for EditWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.description)?;
        if let Some(page) = self.page {
            write!(f, " (page {})", page + 1)?;
        }
        Ok(())
    }
}
