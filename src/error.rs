use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all fatal failure modes.
///
/// Per-element problems are never errors; they are reported as
/// [`crate::error_reporter::ExtractionWarning`] events.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Path is not a file: {path}")]
    NotAFile { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parsing failed: {source_name} - {details}")]
    ParseFailure {
        source_name: String,
        details: String,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LibXML2 internal error: {details}")]
    LibXml2Internal { details: String },

    #[error("Output error: {details}")]
    Output { details: String },
}

/// Coarse classification of [`ExtractError`] used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    InputAccess,
    Parse,
    Configuration,
    Output,
}

impl ExtractError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExtractError::FileNotFound { .. }
            | ExtractError::NotAFile { .. }
            | ExtractError::Read { .. } => ErrorCategory::InputAccess,
            ExtractError::ParseFailure { .. } | ExtractError::LibXml2Internal { .. } => {
                ErrorCategory::Parse
            }
            ExtractError::Config(_) => ErrorCategory::Configuration,
            ExtractError::Output { .. } => ErrorCategory::Output,
        }
    }

    pub fn is_input_access(&self) -> bool {
        self.category() == ErrorCategory::InputAccess
    }
}

/// LibXML2-specific error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LibXml2Error {
    #[error("Parser context creation failed")]
    ParserContextCreationFailed,

    #[error("Input of {len} bytes exceeds the libxml2 buffer limit")]
    InputTooLarge { len: usize },

    #[error("Document parsing failed: {details}")]
    DocumentParseFailed { details: String },

    #[error("Document has no root element")]
    EmptyDocument,
}

impl LibXml2Error {
    /// True when the bytes themselves were rejected, so another encoding may
    /// still succeed. Context and size failures are not retried.
    pub fn is_document_error(&self) -> bool {
        matches!(
            self,
            LibXml2Error::DocumentParseFailed { .. } | LibXml2Error::EmptyDocument
        )
    }
}

impl From<LibXml2Error> for ExtractError {
    fn from(err: LibXml2Error) -> Self {
        ExtractError::LibXml2Internal {
            details: err.to_string(),
        }
    }
}

impl From<crate::config::ConfigError> for ExtractError {
    fn from(err: crate::config::ConfigError) -> Self {
        ExtractError::Config(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ExtractError>;

/// LibXML2 result type alias
pub type LibXml2Result<T> = std::result::Result<T, LibXml2Error>;
