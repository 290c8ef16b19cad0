//! Error types for XML parsing and serialization.

use thiserror::Error;

/// Errors raised while reading or writing a [`crate::Document`].
#[derive(Debug, Error)]
pub enum XmlError {
    /// The input is not well-formed XML.
    #[error("malformed XML: {source}")]
    Parse {
        #[from]
        source: roxmltree::Error,
    },

    /// I/O error while reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for XML operations.
pub type Result<T> = std::result::Result<T, XmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_from_roxmltree() {
        let parse_err = roxmltree::Document::parse("<a>").unwrap_err();
        let err: XmlError = parse_err.into();
        assert!(matches!(err, XmlError::Parse { .. }));
        assert!(err.to_string().starts_with("malformed XML: "));
    }

    #[test]
    fn test_error_from_io() {
        let err: XmlError = std::io::Error::other("disk full").into();
        assert_eq!(err.to_string(), "I/O error: disk full");
    }
}
