//! The spatial join between two staged feature sets.
use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::str::FromStr;

use log::debug;
use spanlogic_core::Feature;
use spanlogic_overlaprs::{Interval, SequenceIndex};

use crate::params::Side;
use crate::staging::StagedFeatureSet;

/// Spatial relation between a side-A feature `a` and a side-B feature `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `a` and `b` share at least one position.
    Overlap,
    /// `a` covers `b` entirely.
    AContainB,
    /// `b` covers `a` entirely.
    BContainA,
}

impl Relation {
    #[inline]
    pub fn holds(self, a: &Feature, b: &Feature) -> bool {
        match self {
            Relation::Overlap => a.begin <= b.end && a.end >= b.begin,
            Relation::AContainB => a.begin <= b.begin && a.end >= b.end,
            Relation::BContainA => a.begin >= b.begin && a.end <= b.end,
        }
    }
}

impl FromStr for Relation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "overlap" => Ok(Relation::Overlap),
            "a_contain_b" => Ok(Relation::AContainB),
            "b_contain_a" => Ok(Relation::BContainA),
            _ => Err(format!("Invalid operation: {}", s)),
        }
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Overlap => write!(f, "overlap"),
            Relation::AContainB => write!(f, "a_contain_b"),
            Relation::BContainA => write!(f, "b_contain_a"),
        }
    }
}

/// Orientation constraint between matched features.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrandFilter {
    Both,
    Same,
    Opposite,
}

impl StrandFilter {
    #[inline]
    pub fn admits(self, a_reversed: bool, b_reversed: bool) -> bool {
        match self {
            StrandFilter::Both => true,
            StrandFilter::Same => a_reversed == b_reversed,
            StrandFilter::Opposite => a_reversed != b_reversed,
        }
    }
}

impl FromStr for StrandFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "both_strands" => Ok(StrandFilter::Both),
            "same_strand" => Ok(StrandFilter::Same),
            "opposite_strands" => Ok(StrandFilter::Opposite),
            _ => Err(format!("Invalid strand: {}", s)),
        }
    }
}

impl Display for StrandFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrandFilter::Both => write!(f, "both_strands"),
            StrandFilter::Same => write!(f, "same_strand"),
            StrandFilter::Opposite => write!(f, "opposite_strands"),
        }
    }
}

/// A feature of the output side together with one reference feature it matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedPair {
    pub output: Feature,
    pub reference: Feature,
}

impl MatchedPair {
    /// Stream order: output identity first, then references grouped by display id.
    pub fn stream_cmp(&self, other: &MatchedPair) -> Ordering {
        self.output
            .identity()
            .cmp(&other.output.identity())
            .then_with(|| {
                self.reference
                    .display_id()
                    .cmp(other.reference.display_id())
            })
            .then_with(|| self.reference.source_id.cmp(&other.reference.source_id))
            .then_with(|| self.reference.begin.cmp(&other.reference.begin))
            .then_with(|| self.reference.end.cmp(&other.reference.end))
    }
}

///
/// Joins side A against side B under a relation and strand filter.
///
#[derive(Debug, Clone, Copy)]
pub struct SpanRelationEvaluator {
    pub relation: Relation,
    pub strand: StrandFilter,
    pub output: Side,
}

impl SpanRelationEvaluator {
    pub fn new(relation: Relation, strand: StrandFilter, output: Side) -> Self {
        SpanRelationEvaluator {
            relation,
            strand,
            output,
        }
    }

    ///
    /// The full join predicate for one `(a, b)` pair.
    ///
    /// # Arguments
    /// - a: feature of side A
    /// - b: feature of side B
    /// - strand_applies: `false` when either side carries no meaningful orientation
    pub fn matches(&self, a: &Feature, b: &Feature, strand_applies: bool) -> bool {
        a.is_comparable(b)
            && a.is_valid()
            && b.is_valid()
            && (!strand_applies || self.strand.admits(a.reversed, b.reversed))
            && self.relation.holds(a, b)
    }

    ///
    /// Evaluate the join and return the matched pairs in stream order.
    ///
    /// Candidates come from an interval index over side B; every relation implies overlap of
    /// two valid closed intervals, so the exact predicate only ever narrows them.
    ///
    pub fn evaluate(&self, set_a: &StagedFeatureSet, set_b: &StagedFeatureSet) -> Vec<MatchedPair> {
        let strand_applies = set_a.has_orientation() && set_b.has_orientation();

        let index = SequenceIndex::from_intervals(
            set_b
                .features
                .iter()
                .enumerate()
                .filter(|(_, b)| b.is_valid())
                .map(|(i, b)| {
                    (
                        b.sequence_id.clone(),
                        Interval {
                            start: b.begin,
                            end: b.end,
                            val: i,
                        },
                    )
                }),
        );

        let mut pairs = Vec::new();
        for a in set_a.features.iter().filter(|a| a.is_valid()) {
            for hit in index.find_iter(&a.sequence_id, a.begin, a.end) {
                let b = &set_b.features[hit.val];
                if !self.matches(a, b, strand_applies) {
                    continue;
                }
                let (output, reference) = match self.output {
                    Side::A => (a, b),
                    Side::B => (b, a),
                };
                pairs.push(MatchedPair {
                    output: output.clone(),
                    reference: reference.clone(),
                });
            }
        }

        pairs.sort_by(|x, y| x.stream_cmp(y));

        debug!(
            "{} of {} x {} feature pairs satisfy {} ({}, strand filter {})",
            pairs.len(),
            set_a.len(),
            set_b.len(),
            self.relation,
            self.strand,
            if strand_applies { "applied" } else { "skipped" }
        );

        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::ExtractionPolicy;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn feature(id: &str, seq: &str, begin: i64, end: i64, reversed: bool) -> Feature {
        Feature {
            source_id: id.to_string(),
            group_key: None,
            project_id: "PlasmoDB".to_string(),
            sequence_id: seq.to_string(),
            begin,
            end,
            reversed,
            weight: 10,
        }
    }

    fn set(side: Side, policy: ExtractionPolicy, features: Vec<Feature>) -> StagedFeatureSet {
        StagedFeatureSet {
            side,
            policy,
            features,
        }
    }

    fn ids(pairs: &[MatchedPair]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|p| (p.output.source_id.clone(), p.reference.source_id.clone()))
            .collect()
    }

    #[rstest]
    #[case(Relation::Overlap, (100, 200), (150, 160), true)]
    #[case(Relation::Overlap, (100, 200), (200, 300), true)]
    #[case(Relation::Overlap, (100, 200), (201, 300), false)]
    #[case(Relation::AContainB, (100, 200), (100, 200), true)]
    #[case(Relation::AContainB, (100, 200), (90, 150), false)]
    #[case(Relation::BContainA, (120, 130), (100, 200), true)]
    #[case(Relation::BContainA, (100, 200), (120, 130), false)]
    fn test_relation(
        #[case] relation: Relation,
        #[case] a: (i64, i64),
        #[case] b: (i64, i64),
        #[case] expected: bool,
    ) {
        let fa = feature("a", "chr1", a.0, a.1, false);
        let fb = feature("b", "chr1", b.0, b.1, false);
        assert_eq!(relation.holds(&fa, &fb), expected);
    }

    #[rstest]
    fn test_relation_symmetry() {
        let spans = [(0, 10), (5, 15), (10, 10), (11, 20), (-5, 30), (3, 7)];
        for &(ab, ae) in &spans {
            for &(bb, be) in &spans {
                let a = feature("a", "chr1", ab, ae, false);
                let b = feature("b", "chr1", bb, be, false);
                assert_eq!(Relation::Overlap.holds(&a, &b), Relation::Overlap.holds(&b, &a));
                assert_eq!(
                    Relation::AContainB.holds(&a, &b),
                    Relation::BContainA.holds(&b, &a)
                );
            }
        }
    }

    #[rstest]
    #[case(StrandFilter::Both, false, true, true)]
    #[case(StrandFilter::Same, true, true, true)]
    #[case(StrandFilter::Same, false, true, false)]
    #[case(StrandFilter::Opposite, false, true, true)]
    #[case(StrandFilter::Opposite, true, true, false)]
    fn test_strand_filter(
        #[case] filter: StrandFilter,
        #[case] a: bool,
        #[case] b: bool,
        #[case] expected: bool,
    ) {
        assert_eq!(filter.admits(a, b), expected);
    }

    #[rstest]
    fn test_evaluate_requires_same_sequence() {
        let evaluator = SpanRelationEvaluator::new(Relation::Overlap, StrandFilter::Both, Side::A);
        let a = set(Side::A, ExtractionPolicy::Standard, vec![feature("a1", "chr1", 100, 200, false)]);
        let b = set(
            Side::B,
            ExtractionPolicy::Standard,
            vec![
                feature("b1", "chr2", 100, 200, false),
                feature("b2", "chr1", 150, 250, false),
            ],
        );
        assert_eq!(
            ids(&evaluator.evaluate(&a, &b)),
            vec![("a1".to_string(), "b2".to_string())]
        );
    }

    #[rstest]
    fn test_evaluate_skips_inverted_features() {
        let evaluator = SpanRelationEvaluator::new(Relation::Overlap, StrandFilter::Both, Side::A);
        let a = set(Side::A, ExtractionPolicy::Standard, vec![feature("a1", "chr1", 100, 200, false)]);
        let b = set(Side::B, ExtractionPolicy::Standard, vec![feature("b1", "chr1", 180, 120, false)]);
        assert!(evaluator.evaluate(&a, &b).is_empty());
    }

    #[rstest]
    fn test_evaluate_strand_filter_skipped_for_points() {
        let evaluator =
            SpanRelationEvaluator::new(Relation::AContainB, StrandFilter::Same, Side::A);
        let a = set(Side::A, ExtractionPolicy::Standard, vec![feature("g1", "chr1", 100, 200, true)]);
        let points = set(Side::B, ExtractionPolicy::Point, vec![feature("snp1", "chr1", 150, 150, false)]);
        assert_eq!(evaluator.evaluate(&a, &points).len(), 1);

        let spans = set(Side::B, ExtractionPolicy::Standard, vec![feature("s1", "chr1", 150, 150, false)]);
        assert!(evaluator.evaluate(&a, &spans).is_empty());
    }

    #[rstest]
    fn test_evaluate_orders_by_output_side() {
        let evaluator = SpanRelationEvaluator::new(Relation::Overlap, StrandFilter::Both, Side::B);
        let a = set(
            Side::A,
            ExtractionPolicy::Standard,
            vec![
                feature("a2", "chr1", 0, 1000, false),
                feature("a1", "chr1", 0, 1000, false),
            ],
        );
        let b = set(
            Side::B,
            ExtractionPolicy::Standard,
            vec![
                feature("b2", "chr1", 500, 600, false),
                feature("b1", "chr1", 100, 200, false),
            ],
        );
        assert_eq!(
            ids(&evaluator.evaluate(&a, &b)),
            vec![
                ("b1".to_string(), "a1".to_string()),
                ("b1".to_string(), "a2".to_string()),
                ("b2".to_string(), "a1".to_string()),
                ("b2".to_string(), "a2".to_string()),
            ]
        );
    }

    #[rstest]
    fn test_evaluate_matches_brute_force() {
        let evaluator = SpanRelationEvaluator::new(Relation::Overlap, StrandFilter::Opposite, Side::A);
        let features_a: Vec<Feature> = (0..40)
            .map(|i| feature(&format!("a{:02}", i), "chr1", i * 37 % 500, i * 37 % 500 + 60, i % 2 == 0))
            .collect();
        let features_b: Vec<Feature> = (0..40)
            .map(|i| feature(&format!("b{:02}", i), "chr1", i * 53 % 500, i * 53 % 500 + 15, i % 3 == 0))
            .collect();

        let mut expected: Vec<(String, String)> = Vec::new();
        for a in &features_a {
            for b in &features_b {
                if evaluator.matches(a, b, true) {
                    expected.push((a.source_id.clone(), b.source_id.clone()));
                }
            }
        }
        expected.sort();

        let a = set(Side::A, ExtractionPolicy::Standard, features_a);
        let b = set(Side::B, ExtractionPolicy::Standard, features_b);
        assert_eq!(ids(&evaluator.evaluate(&a, &b)), expected);
    }
}
