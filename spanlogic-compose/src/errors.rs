use spanlogic_core::{SinkError, SourceError};
use thiserror::Error;

use crate::params::Side;

/// Problems the caller can fix: bad parameter values or references.
#[derive(Error, Debug)]
pub enum UserError {
    #[error("Missing required parameter {0}")]
    MissingParameter(String),

    #[error("Invalid {name}: {value}")]
    InvalidParameter { name: String, value: String },

    #[error("Invalid {name} (expected non-negative number): {value}")]
    InvalidOffset { name: String, value: String },

    #[error("Invalid output column: {0}")]
    InvalidColumn(String),

    #[error("No answer exists for reference {reference} of side {side}")]
    UnknownReference { side: Side, reference: String },

    #[error("Record class {0} has no extraction policy")]
    UnsupportedRecordClass(String),
}

/// Failures of the staged-set store.
#[derive(Error, Debug)]
pub enum StagingError {
    #[error("Staged set name {0} is already in use")]
    NameInUse(String),

    #[error("No free staged set name after {0} attempts")]
    NamesExhausted(usize),

    #[error("Staged set {0} does not exist")]
    Missing(String),

    #[error("Staging store failure: {0}")]
    Backend(String),
}

/// Failures while staging, joining or emitting features.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Can't resolve side {side}: {source}")]
    Source {
        side: Side,
        #[source]
        source: SourceError,
    },

    #[error("Can't look up feature locations: {0}")]
    Lookup(#[from] SourceError),

    #[error("Can't extract features of {record_class}: {reason}")]
    Extraction { record_class: String, reason: String },

    #[error(transparent)]
    Staging(#[from] StagingError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ComposeError {
    pub fn is_user_error(&self) -> bool {
        matches!(self, ComposeError::User(_))
    }
}

impl From<StagingError> for ComposeError {
    fn from(err: StagingError) -> Self {
        ComposeError::Model(err.into())
    }
}

impl From<SinkError> for ComposeError {
    fn from(err: SinkError) -> Self {
        ComposeError::Model(err.into())
    }
}

pub type ComposeResult<T> = std::result::Result<T, ComposeError>;
