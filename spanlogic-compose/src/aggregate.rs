//! Folding the ordered match stream into one result per output feature.
use std::collections::BTreeMap;

use spanlogic_core::Feature;

use crate::consts::{MATCHED_REGIONS_SEPARATOR, MAX_MATCHED_REGIONS_LEN};
use crate::evaluate::MatchedPair;
use crate::staging::StagedFeatureSet;

///
/// One output feature with the references it matched.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregatedResult {
    pub source_id: String,
    pub project_id: String,
    /// e.g. `100 - 200 (+)`
    pub region: String,
    pub weight: i64,
    pub matched_count: usize,
    pub matched_regions: String,
    pub matched: bool,
}

impl AggregatedResult {
    /// A result for an output feature that matched nothing.
    pub fn unmatched(feature: &Feature) -> Self {
        AggregatedResult {
            source_id: feature.source_id.clone(),
            project_id: feature.project_id.clone(),
            region: feature.region(),
            weight: feature.weight,
            matched_count: 0,
            matched_regions: String::new(),
            matched: false,
        }
    }

    pub fn identity(&self) -> (&str, &str) {
        (&self.project_id, &self.source_id)
    }
}

struct Group {
    output: Feature,
    count: usize,
    text: String,
    text_chars: usize,
    last_key: Option<String>,
}

impl Group {
    fn new(output: Feature) -> Self {
        Group {
            output,
            count: 0,
            text: String::new(),
            text_chars: 0,
            last_key: None,
        }
    }
}

///
/// Single forward pass over matched pairs in stream order.
///
/// Pairs are pushed one by one; a finished group comes back as soon as a pair with a
/// different output identity arrives. The text of a group stops growing once it passes the
/// length cap, since everything beyond it would be cut anyway.
///
pub struct MatchAggregator {
    max_len: usize,
    current: Option<Group>,
}

impl Default for MatchAggregator {
    fn default() -> Self {
        Self::new(MAX_MATCHED_REGIONS_LEN)
    }
}

impl MatchAggregator {
    pub fn new(max_len: usize) -> Self {
        MatchAggregator {
            max_len,
            current: None,
        }
    }

    ///
    /// Add the next pair of the stream.
    ///
    /// # Returns
    /// - the previous group's result when this pair starts a new group
    pub fn push(&mut self, pair: MatchedPair) -> Option<AggregatedResult> {
        let MatchedPair { output, reference } = pair;

        let same_group = self
            .current
            .as_ref()
            .is_some_and(|group| group.output.identity() == output.identity());
        let flushed = if same_group {
            None
        } else {
            self.current.replace(Group::new(output))
        };

        if let Some(group) = self.current.as_mut() {
            // consecutive references sharing a gene count once
            let duplicate = reference.group_key.is_some() && group.last_key == reference.group_key;
            if !duplicate {
                group.count += 1;
                if group.text_chars <= self.max_len {
                    if !group.text.is_empty() {
                        group.text.push_str(MATCHED_REGIONS_SEPARATOR);
                        group.text_chars += MATCHED_REGIONS_SEPARATOR.len();
                    }
                    let entry = reference.matched_region();
                    group.text_chars += entry.chars().count();
                    group.text.push_str(&entry);
                }
                group.last_key = reference.group_key;
            }
        }

        flushed.map(|group| self.complete(group))
    }

    /// Flush the last group, if any.
    pub fn finish(&mut self) -> Option<AggregatedResult> {
        self.current.take().map(|group| self.complete(group))
    }

    fn complete(&self, group: Group) -> AggregatedResult {
        let Group {
            output,
            count,
            text,
            ..
        } = group;
        AggregatedResult {
            region: output.region(),
            source_id: output.source_id,
            project_id: output.project_id,
            weight: output.weight,
            matched_count: count,
            matched_regions: spanlogic_core::utils::truncate_with_ellipsis(text, self.max_len),
            matched: true,
        }
    }
}

///
/// Iterator adapter yielding one [`AggregatedResult`] per group of an ordered pair stream.
///
pub struct Aggregate<I> {
    pairs: I,
    aggregator: MatchAggregator,
    done: bool,
}

impl<I> Iterator for Aggregate<I>
where
    I: Iterator<Item = MatchedPair>,
{
    type Item = AggregatedResult;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        for pair in self.pairs.by_ref() {
            if let Some(result) = self.aggregator.push(pair) {
                return Some(result);
            }
        }
        self.done = true;
        self.aggregator.finish()
    }
}

///
/// Aggregate an ordered pair stream.
///
/// # Arguments
/// - pairs: matched pairs, sorted with [`MatchedPair::stream_cmp`]
/// - max_len: cap on the rendered matched regions
pub fn aggregate<I>(pairs: I, max_len: usize) -> Aggregate<I::IntoIter>
where
    I: IntoIterator<Item = MatchedPair>,
{
    Aggregate {
        pairs: pairs.into_iter(),
        aggregator: MatchAggregator::new(max_len),
        done: false,
    }
}

///
/// Add a result for every output-side feature that matched nothing, keeping identity order.
///
/// Features of the same identity count once; the first staged one supplies the region.
///
pub fn merge_unmatched(
    matched: Vec<AggregatedResult>,
    output_set: &StagedFeatureSet,
) -> Vec<AggregatedResult> {
    let mut by_identity: BTreeMap<(String, String), AggregatedResult> = matched
        .into_iter()
        .map(|result| {
            (
                (result.project_id.clone(), result.source_id.clone()),
                result,
            )
        })
        .collect();

    for feature in &output_set.features {
        by_identity
            .entry((feature.project_id.clone(), feature.source_id.clone()))
            .or_insert_with(|| AggregatedResult::unmatched(feature));
    }

    by_identity.into_values().collect()
}
