//! Error types for slide conversion.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while converting page text into slides.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read or write a file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// A decoder dump or profile was not valid JSON.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The decoder output as a whole is unusable.
    #[error("Invalid decoder output: {0}")]
    InvalidDocument(String),

    /// A single text fragment was malformed. The fragment is skipped and the
    /// page continues.
    #[error("Malformed text fragment: {0}")]
    DecodeFragmentError(String),

    /// A whole page could not be decoded.
    #[error("Failed to decode page {page}: {reason}")]
    PageDecodeError { page: usize, reason: String },

    /// The style profile lacks an entry required to map a page.
    #[error("Missing style profile entry '{entry}' (page {page})")]
    ConfigurationError { page: usize, entry: String },

    /// The style profile could not be loaded.
    #[error("Invalid style profile: {0}")]
    ProfileError(String),

    /// ZIP archive error (for PPTX).
    #[error("ZIP error: {0}")]
    ZipError(String),

    /// XML writing error (for PPTX).
    #[error("XML error: {0}")]
    XmlError(String),
}

impl Error {
    /// Whether this error invalidates the whole document rather than one page.
    pub fn is_document_fatal(&self) -> bool {
        !matches!(
            self,
            Error::DecodeFragmentError(_) | Error::PageDecodeError { .. }
        )
    }
}
