use thiserror::Error;

/// Failures reported by a [`FeatureSource`](crate::source::FeatureSource).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No answer exists for reference {0}")]
    NotFound(String),

    #[error("Reference {reference} is not runnable: {reason}")]
    NotRunnable { reference: String, reason: String },

    #[error("Error parsing {what}: {line}")]
    Parse { what: String, line: String },

    #[error("Backing store failure: {0}")]
    Backend(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures reported by a [`RowSink`](crate::sink::RowSink).
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Row has {got} values but the sink expects {expected}")]
    RowWidth { expected: usize, got: usize },

    #[error("Can't serialize row: {0}")]
    Serialize(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
