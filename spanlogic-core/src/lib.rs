//! Core data model for span composition.
//!
//! This crate holds the types every other `spanlogic` crate agrees on: the staged
//! [`Feature`](models::Feature), the rows an upstream answer yields, and the two collaborator
//! seams of the engine, [`FeatureSource`](source::FeatureSource) and [`RowSink`](sink::RowSink).
pub mod errors;
pub mod models;
pub mod sink;
pub mod source;
pub mod utils;

pub use errors::{SinkError, SourceError};
pub use models::{Answer, AnswerRecord, Feature, FeatureLocation, PointLocation, SpanId};
pub use sink::RowSink;
pub use source::{FeatureSource, InMemoryFeatureSource};

pub mod consts {
    /// Textual stand-in for an absent group key.
    pub const GROUP_KEY_SENTINEL: &str = "none";
    /// Feature type of the gene locations transcripts are expanded to.
    pub const GENE_FEATURE_TYPE: &str = "GeneFeature";
}
