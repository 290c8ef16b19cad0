//! Error types for ruleset generation.

use std::path::PathBuf;

use ruleset_xml::XmlError;
use thiserror::Error;

/// Errors that end a generation run. None of them leave a partial output file.
#[derive(Debug, Error)]
pub enum RulesetError {
    // === Input Errors ===
    /// A category document is not well-formed or a rule has no name.
    #[error("malformed category document {path}: {message}")]
    MalformedInput { path: PathBuf, message: String },

    /// No `category` segment in a document path, so no reference can be derived.
    #[error("path has no 'category/' segment: {path}")]
    PathPatternMismatch { path: PathBuf },

    /// The document list is empty.
    #[error("no category documents to process")]
    NoDocuments,

    // === File System Errors ===
    /// Reading an input or writing the output failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The output tree could not be serialized.
    #[error("failed to serialize ruleset: {0}")]
    Serialize(#[source] XmlError),

    // === Source Errors ===
    /// Fetching the upstream source tree failed.
    #[error("failed to check out {repository} at {revision}: {message}")]
    Checkout {
        repository: String,
        revision: String,
        message: String,
    },

    /// The local source directory does not exist.
    #[error("source directory not found: {path}")]
    SourceNotFound { path: PathBuf },

    // === Configuration Errors ===
    /// The configuration file is not valid TOML for the expected schema.
    #[error("failed to parse configuration {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The configuration parsed but its values are unusable.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl RulesetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Map a parse failure of the document at `path`.
    pub(crate) fn from_xml(path: impl Into<PathBuf>, err: XmlError) -> Self {
        let path = path.into();
        match err {
            XmlError::Io(source) => Self::Io { path, source },
            other => Self::MalformedInput {
                path,
                message: other.to_string(),
            },
        }
    }
}

/// Result type for ruleset operations.
pub type Result<T> = std::result::Result<T, RulesetError>;
