//! Interval indexing across many sequences.
//!
//! [`SequenceIndex`] keeps one [`AIList`] per sequence id, so a query only ever sees intervals
//! that live in the same coordinate system.
//!
//! ```
//! use spanlogic_overlaprs::{Interval, SequenceIndex};
//!
//! let index = SequenceIndex::from_intervals(vec![
//!     ("chr1".to_string(), Interval { start: 100i64, end: 200, val: 0usize }),
//!     ("chr2".to_string(), Interval { start: 100, end: 200, val: 1 }),
//! ]);
//!
//! let hits: Vec<usize> = index.find_iter("chr1", 150, 160).map(|iv| iv.val).collect();
//! assert_eq!(hits, vec![0]);
//! ```

use fxhash::FxHashMap as HashMap;
use num_traits::PrimInt;

use crate::{AIList, Interval, Overlapper};

/// One [`AIList`] per sequence id.
pub struct SequenceIndex<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    index_maps: HashMap<String, AIList<I, T>>,
}

impl<I, T> SequenceIndex<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    ///
    /// Build the index from `(sequence_id, interval)` pairs in any order.
    ///
    pub fn from_intervals<It>(intervals: It) -> Self
    where
        It: IntoIterator<Item = (String, Interval<I, T>)>,
    {
        // STEP 1: organize intervals by sequence
        let mut by_sequence: HashMap<String, Vec<Interval<I, T>>> = HashMap::default();
        for (sequence_id, interval) in intervals {
            by_sequence.entry(sequence_id).or_default().push(interval);
        }

        // STEP 2: build one list per sequence
        let index_maps = by_sequence
            .into_iter()
            .map(|(sequence_id, ivs)| (sequence_id, AIList::build(ivs)))
            .collect();

        SequenceIndex { index_maps }
    }

    /// Intervals on `sequence_id` overlapping the closed range `[start, end]`.
    pub fn find_iter<'a>(
        &'a self,
        sequence_id: &str,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        match self.index_maps.get(sequence_id) {
            Some(list) => list.find_iter(start, end),
            None => Box::new(std::iter::empty()),
        }
    }

    pub fn num_sequences(&self) -> usize {
        self.index_maps.len()
    }

    /// Total number of indexed intervals.
    pub fn len(&self) -> usize {
        self.index_maps.values().map(|list| list.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
