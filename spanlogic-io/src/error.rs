use std::io;
use thiserror::Error;

use spanlogic_core::SourceError;

/// Error type for spanlogic-io operations.
#[derive(Error, Debug)]
pub enum SpanIoError {
    /// IO error occurred during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A table could not be opened.
    #[error(transparent)]
    Open(#[from] anyhow::Error),

    /// A line of a table is malformed.
    #[error("Error parsing {path} line {line}: {reason}")]
    Parse {
        path: String,
        line: usize,
        reason: String,
    },
}

/// Result type alias for spanlogic-io operations.
pub type Result<T> = std::result::Result<T, SpanIoError>;

impl From<SpanIoError> for SourceError {
    fn from(err: SpanIoError) -> Self {
        match err {
            SpanIoError::Io(err) => SourceError::Io(err),
            SpanIoError::Parse { path, line, reason } => SourceError::Parse {
                what: format!("{} line {}", path, line),
                line: reason,
            },
            other => SourceError::Backend(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_parse_error_keeps_location() {
        let err = SpanIoError::Parse {
            path: "genes.tsv".to_string(),
            line: 3,
            reason: "missing project id".to_string(),
        };
        match SourceError::from(err) {
            SourceError::Parse { what, line } => {
                assert_eq!(what, "genes.tsv line 3");
                assert_eq!(line, "missing project id");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[rstest]
    fn test_open_error_is_backend() {
        let err = SpanIoError::Open(anyhow::anyhow!("no such table"));
        assert!(matches!(
            SourceError::from(err),
            SourceError::Backend(message) if message == "no such table"
        ));
    }
}
