//! # File-backed collaborators for span composition.
//!
//! A [`TsvFeatureSource`] answers references from tab-separated answer files and resolves
//! locations from catalog tables loaded once up front. [`TsvSink`] and [`JsonLinesSink`]
//! write composed rows to any [`std::io::Write`].
//!
pub mod consts;
pub mod error;
pub mod sink;
pub mod tsv;

// re-exports
pub use consts::*;
pub use error::*;
pub use sink::{JsonLinesSink, TsvSink};
pub use tsv::TsvFeatureSource;
