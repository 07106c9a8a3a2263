//! Span composition: which features of one set lie over, inside, or around the features of
//! another, after moving each feature's boundaries by strand-aware anchor offsets.
//!
//! A request flows through five stages:
//!
//! 1. [`anchor`]: turn each side's begin/end anchor choices into boundary formulas,
//! 2. [`stager`]: extract each side's features from its upstream answer (see [`policy`]) and
//!    materialize them as a named, ephemeral set ([`staging`]),
//! 3. [`evaluate`]: join the two sets under a spatial relation and strand filter,
//! 4. [`aggregate`]: fold the ordered matches into one row per output feature,
//! 5. [`columns`]: lay each row out in the order the caller asked for.
//!
//! [`plugin::SpanComposition`] ties the stages together for one request.
//!
//! ```rust
//! use std::collections::HashMap;
//!
//! use spanlogic_compose::{ComposeConfig, InMemoryStagingStore, OutputColumn, SpanComposition};
//! use spanlogic_core::{Answer, AnswerRecord, InMemoryFeatureSource};
//!
//! let record = |id: &str| AnswerRecord {
//!     source_id: id.to_string(),
//!     project_id: "PlasmoDB".to_string(),
//!     weight: 10,
//!     gene_source_id: None,
//! };
//! let source = InMemoryFeatureSource::new()
//!     .with_answer("a", Answer::new("DynSpanRecordClasses.DynSpanRecordClass", vec![record("chr1:100-200:f")]))
//!     .with_answer("b", Answer::new("DynSpanRecordClasses.DynSpanRecordClass", vec![record("chr1:150-160:f")]));
//! let store = InMemoryStagingStore::new();
//! let composition = SpanComposition::new(&source, &store, ComposeConfig::default());
//!
//! let params: HashMap<String, String> = [
//!     ("span_operation", "overlap"),
//!     ("span_a", "a"),
//!     ("span_b", "b"),
//! ]
//! .into_iter()
//! .map(|(k, v)| (k.to_string(), v.to_string()))
//! .collect();
//!
//! let mut rows: Vec<Vec<String>> = Vec::new();
//! let written = composition
//!     .execute(&params, &[OutputColumn::SourceId, OutputColumn::MatchedCount], &mut rows)
//!     .unwrap();
//! assert_eq!(written, 1);
//! assert_eq!(rows[0], vec!["chr1:100-200:f".to_string(), "1".to_string()]);
//! ```
pub mod aggregate;
pub mod anchor;
pub mod columns;
pub mod config;
pub mod consts;
pub mod errors;
pub mod evaluate;
pub mod params;
pub mod plugin;
pub mod policy;
pub mod stager;
pub mod staging;

// re-exports
pub use aggregate::{AggregatedResult, MatchAggregator};
pub use anchor::{Anchor, AnchorSpec, Direction};
pub use columns::OutputColumn;
pub use config::ComposeConfig;
pub use errors::{ComposeError, ComposeResult, ModelError, StagingError, UserError};
pub use evaluate::{MatchedPair, Relation, SpanRelationEvaluator, StrandFilter};
pub use params::{Side, SpanParams};
pub use plugin::SpanComposition;
pub use policy::{ExtractionPolicy, PolicyRegistry};
pub use stager::FeatureStager;
pub use staging::{
    InMemoryStagingStore, NameAllocator, StagedFeatureSet, StagedSetGuard, StagingLifecycle,
    StagingStore,
};
