//! Interval overlap queries for span composition.
//!
//! Coordinates are closed (`[start, end]`, both ends inclusive) and may be negative: anchor
//! offsets can push a derived boundary upstream of position zero.
//!
//! ```rust
//! use spanlogic_overlaprs::{AIList, Overlapper, Interval};
//!
//! let genes = vec![
//!     Interval { start: 1000i64, end: 2000, val: "BRCA1" },
//!     Interval { start: 3000, end: 4000, val: "TP53" },
//! ];
//!
//! let index = AIList::build(genes);
//!
//! // closed coordinates: a query ending on 3000 still touches TP53
//! let hits: Vec<&str> = index.find_iter(1500, 3000).map(|iv| iv.val).collect();
//! assert_eq!(hits.len(), 2);
//! ```

/// Augmented Interval List implementation.
///
/// See [`AIList`] for details.
pub mod ailist;

/// Per-sequence indexing.
pub mod sequence_index;

/// Core traits for overlap operations.
pub mod traits;

// re-exports
pub use self::ailist::AIList;
pub use self::sequence_index::SequenceIndex;
pub use self::traits::{Interval, Overlapper};
