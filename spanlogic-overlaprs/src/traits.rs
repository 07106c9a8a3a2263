use std::cmp::Ordering;

use num_traits::PrimInt;

/// A closed range `[start, end]` carrying a value.
#[derive(Eq, Debug, Clone)]
pub struct Interval<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    pub start: I,
    pub end: I,
    pub val: T,
}

impl<I, T> Interval<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    /// Check if this interval shares at least one position with `[start, end]`.
    #[inline]
    pub fn overlaps(&self, start: I, end: I) -> bool {
        self.start <= end && self.end >= start
    }

    /// Check if `[start, end]` lies entirely inside this interval.
    #[inline]
    pub fn contains(&self, start: I, end: I) -> bool {
        self.start <= start && self.end >= end
    }
}

impl<I, T> Ord for Interval<I, T>
where
    I: PrimInt + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn cmp(&self, other: &Interval<I, T>) -> Ordering {
        self.start
            .cmp(&other.start)
            .then_with(|| self.end.cmp(&other.end))
    }
}

impl<I, T> PartialOrd for Interval<I, T>
where
    I: PrimInt + Send + Sync,
    T: Eq + Clone + Send + Sync,
{
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<I, T> PartialEq for Interval<I, T>
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    #[inline]
    fn eq(&self, other: &Interval<I, T>) -> bool {
        self.start == other.start && self.end == other.end
    }
}

pub trait Overlapper<I, T>: Send + Sync
where
    I: PrimInt + Send + Sync,
    T: Clone + Send + Sync,
{
    fn build(intervals: Vec<Interval<I, T>>) -> Self
    where
        Self: Sized;

    fn find(&self, start: I, end: I) -> Vec<Interval<I, T>>;

    fn find_iter<'a>(
        &'a self,
        start: I,
        end: I,
    ) -> Box<dyn Iterator<Item = &'a Interval<I, T>> + 'a>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(100, 200, true)]
    #[case(200, 300, true)]
    #[case(201, 300, false)]
    #[case(0, 99, false)]
    #[case(-50, 100, true)]
    fn test_closed_overlap(#[case] start: i64, #[case] end: i64, #[case] expected: bool) {
        let iv = Interval {
            start: 100i64,
            end: 200,
            val: (),
        };
        assert_eq!(iv.overlaps(start, end), expected);
    }

    #[rstest]
    fn test_contains() {
        let iv = Interval {
            start: 100i64,
            end: 200,
            val: (),
        };
        assert!(iv.contains(100, 200));
        assert!(iv.contains(150, 160));
        assert!(!iv.contains(99, 160));
    }
}
