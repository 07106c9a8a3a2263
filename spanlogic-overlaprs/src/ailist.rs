use std::mem::swap;

use num_traits::PrimInt;

use crate::traits::{Interval, Overlapper};

/// Minimum number of nested successors before an interval is moved to the next component.
const MIN_COVERAGE: usize = 10;

/// An Augmented Interval List over closed intervals.
///
/// From the following article: <https://academic.oup.com/bioinformatics/article/35/23/4907/5509521>
///
/// Intervals are sorted by start and split into components; an interval that covers many of
/// its successors is pushed to a later component so that the running maximum of ends in each
/// component stays tight. A query walks each component backwards from the last start `<= end`
/// and stops once the running maximum falls below the query start.
///
/// # Examples
///
/// ```
/// use spanlogic_overlaprs::{AIList, Overlapper, Interval};
///
/// let spans = vec![
///     Interval { start: -20i64, end: 10, val: "upstream" },
///     Interval { start: 15, end: 25, val: "body" },
/// ];
///
/// let ailist = AIList::build(spans);
/// assert_eq!(ailist.find(0, 12).len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct AIList<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    starts: Vec<I>,
    ends: Vec<I>,
    max_ends: Vec<I>,
    /// Offset of each component inside the flat vectors.
    components: Vec<usize>,
    stored_intervals: Vec<Interval<I, T>>,
}

impl<I, T> Overlapper<I, T> for AIList<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized,
    {
        let mut remaining = intervals;
        remaining.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.end.cmp(&b.end)));

        let mut list = AIList {
            starts: Vec::with_capacity(remaining.len()),
            ends: Vec::with_capacity(remaining.len()),
            max_ends: Vec::with_capacity(remaining.len()),
            components: vec![0],
            stored_intervals: Vec::with_capacity(remaining.len()),
        };
        let mut deferred = Vec::new();

        loop {
            list.push_component(&remaining, &mut deferred);
            swap(&mut remaining, &mut deferred);
            deferred.clear();

            if remaining.is_empty() {
                break;
            }
            list.components.push(list.starts.len());
        }

        list
    }

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>> {
        self.find_iter(start, end).cloned().collect()
    }

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a> {
        Box::new(IterFind {
            inner: self,
            component: 0,
            cursor: None,
            start,
            end,
        })
    }
}

impl<I, T> AIList<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    /// Append one component built from `intervals` (sorted by start), deferring
    /// heavily-nesting intervals to `deferred`.
    fn push_component(&mut self, intervals: &[Interval<I, T>], deferred: &mut Vec<Interval<I, T>>) {
        // a short tail cannot nest enough successors to be worth deferring
        let decompose = intervals.len() > MIN_COVERAGE;
        let mut max = I::min_value();

        for (index, interval) in intervals.iter().enumerate() {
            if decompose {
                let covered = intervals[index + 1..]
                    .iter()
                    .take(MIN_COVERAGE * 2 - 1)
                    .filter(|next| interval.end > next.end)
                    .count();
                if covered >= MIN_COVERAGE {
                    deferred.push(interval.clone());
                    continue;
                }
            }
            max = max.max(interval.end);
            self.starts.push(interval.start);
            self.ends.push(interval.end);
            self.max_ends.push(max);
            self.stored_intervals.push(interval.clone());
        }
    }

    fn component_range(&self, component: usize) -> std::ops::Range<usize> {
        let lo = self.components[component];
        let hi = self
            .components
            .get(component + 1)
            .copied()
            .unwrap_or(self.starts.len());
        lo..hi
    }

    /// Returns the number of intervals in the AIList.
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    /// Returns `true` if the AIList contains no intervals.
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Number of components the intervals were decomposed into.
    pub fn num_components(&self) -> usize {
        self.components.len()
    }
}

/// Lazy iterator over the intervals of an [`AIList`] overlapping a closed query range.
#[derive(Debug)]
pub struct IterFind<'a, I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    inner: &'a AIList<I, T>,
    component: usize,
    cursor: Option<usize>,
    start: I,
    end: I,
}

impl<'a, I, T> Iterator for IterFind<'a, I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    type Item = &'a Interval<I, T>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.component < self.inner.components.len() {
            let range = self.inner.component_range(self.component);
            let offset = range.start;

            let cursor = match self.cursor {
                Some(cursor) => cursor,
                None => {
                    let starts = &self.inner.starts[range.clone()];
                    offset + starts.partition_point(|&s| s <= self.end)
                }
            };

            let mut i = cursor;
            while i > offset {
                i -= 1;
                if self.inner.ends[i] >= self.start {
                    self.cursor = Some(i);
                    return Some(&self.inner.stored_intervals[i]);
                }
                if self.inner.max_ends[i] < self.start {
                    // nothing earlier in this component reaches the query
                    break;
                }
            }

            self.cursor = None;
            self.component += 1;
        }
        None
    }
}
