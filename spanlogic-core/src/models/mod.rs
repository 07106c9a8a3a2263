pub mod feature;
pub mod record;
pub mod span_id;

// re-export for cleaner imports
pub use self::feature::Feature;
pub use self::record::{Answer, AnswerRecord, FeatureLocation, PointLocation};
pub use self::span_id::SpanId;
