//! Record-class specific extraction of raw features from an upstream answer.
use std::fmt::{self, Display};
use std::str::FromStr;

use fxhash::FxHashMap as HashMap;
use serde::{Deserialize, Serialize};

use spanlogic_core::consts::GENE_FEATURE_TYPE;
use spanlogic_core::{Answer, AnswerRecord, Feature, FeatureSource, SpanId};

use crate::errors::{ModelError, UserError};

/// How the features of one record class are located.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionPolicy {
    /// Catalogued feature locations keyed by the record id.
    Standard,
    /// Single-locus features; no orientation.
    Point,
    /// The record id itself encodes `sequence:start-end:strand`.
    SyntheticSpan,
    /// Transcripts placed at their owning gene's location.
    TranscriptExpanded,
}

/// Built-in record class assignments.
pub const BUILTIN_RECORD_CLASSES: &[(&str, ExtractionPolicy)] = &[
    (
        "DynSpanRecordClasses.DynSpanRecordClass",
        ExtractionPolicy::SyntheticSpan,
    ),
    ("SnpRecordClasses.SnpRecordClass", ExtractionPolicy::Point),
    (
        "TranscriptRecordClasses.TranscriptRecordClass",
        ExtractionPolicy::TranscriptExpanded,
    ),
    ("GeneRecordClasses.GeneRecordClass", ExtractionPolicy::Standard),
    ("OrfRecordClasses.OrfRecordClass", ExtractionPolicy::Standard),
    ("EstRecordClasses.EstRecordClass", ExtractionPolicy::Standard),
    (
        "SequenceRecordClasses.SequenceRecordClass",
        ExtractionPolicy::Standard,
    ),
    (
        "IsolateRecordClasses.IsolateRecordClass",
        ExtractionPolicy::Standard,
    ),
    (
        "GenomicSequenceRecordClasses.GenomicSequenceRecordClass",
        ExtractionPolicy::Standard,
    ),
];

impl ExtractionPolicy {
    /// Whether features extracted this way carry a meaningful strand.
    pub fn has_orientation(self) -> bool {
        !matches!(self, ExtractionPolicy::Point)
    }

    ///
    /// Extract raw (not yet anchor-adjusted) features for every record of an answer.
    ///
    /// Records without a location produce no feature.
    ///
    pub fn extract(
        self,
        source: &dyn FeatureSource,
        answer: &Answer,
    ) -> Result<Vec<Feature>, ModelError> {
        match self {
            ExtractionPolicy::Standard => extract_standard(source, answer),
            ExtractionPolicy::Point => extract_points(source, answer),
            ExtractionPolicy::SyntheticSpan => extract_synthetic_spans(answer),
            ExtractionPolicy::TranscriptExpanded => extract_transcripts(source, answer),
        }
    }
}

impl FromStr for ExtractionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(ExtractionPolicy::Standard),
            "point" => Ok(ExtractionPolicy::Point),
            "synthetic_span" => Ok(ExtractionPolicy::SyntheticSpan),
            "transcript_expanded" => Ok(ExtractionPolicy::TranscriptExpanded),
            _ => Err(format!("Invalid extraction policy: {}", s)),
        }
    }
}

impl Display for ExtractionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExtractionPolicy::Standard => "standard",
            ExtractionPolicy::Point => "point",
            ExtractionPolicy::SyntheticSpan => "synthetic_span",
            ExtractionPolicy::TranscriptExpanded => "transcript_expanded",
        };
        write!(f, "{}", name)
    }
}

fn feature_for(record: &AnswerRecord, sequence_id: &str, begin: i64, end: i64, reversed: bool) -> Feature {
    Feature {
        source_id: record.source_id.clone(),
        group_key: None,
        project_id: record.project_id.clone(),
        sequence_id: sequence_id.to_string(),
        begin,
        end,
        reversed,
        weight: record.weight,
    }
}

// The feature type of a standard answer is that of the first location found for any of its
// records; only top-level locations of that type are staged.
fn extract_standard(source: &dyn FeatureSource, answer: &Answer) -> Result<Vec<Feature>, ModelError> {
    let mut located = Vec::with_capacity(answer.len());
    let mut feature_type: Option<String> = None;

    for record in &answer.records {
        let locations = source.feature_locations(&record.source_id)?;
        if feature_type.is_none() {
            feature_type = locations.first().map(|loc| loc.feature_type.clone());
        }
        located.push((record, locations));
    }

    let Some(feature_type) = feature_type else {
        return Ok(Vec::new());
    };

    let mut features = Vec::with_capacity(located.len());
    for (record, locations) in located {
        for loc in locations {
            if !loc.is_top_level || loc.feature_type != feature_type {
                continue;
            }
            features.push(feature_for(
                record,
                &loc.sequence_source_id,
                loc.start_min,
                loc.end_max,
                loc.reversed(),
            ));
        }
    }
    Ok(features)
}

fn extract_points(source: &dyn FeatureSource, answer: &Answer) -> Result<Vec<Feature>, ModelError> {
    let mut features = Vec::with_capacity(answer.len());
    for record in &answer.records {
        if let Some(point) = source.point_location(&record.source_id)? {
            features.push(feature_for(
                record,
                &point.sequence_source_id,
                point.location,
                point.location,
                false,
            ));
        }
    }
    Ok(features)
}

fn extract_synthetic_spans(answer: &Answer) -> Result<Vec<Feature>, ModelError> {
    answer
        .records
        .iter()
        .map(|record| {
            let span: SpanId =
                record
                    .source_id
                    .parse()
                    .map_err(|reason| ModelError::Extraction {
                        record_class: answer.record_class.clone(),
                        reason,
                    })?;
            Ok(feature_for(
                record,
                &span.sequence_id,
                span.start,
                span.end,
                span.reversed,
            ))
        })
        .collect()
}

fn extract_transcripts(source: &dyn FeatureSource, answer: &Answer) -> Result<Vec<Feature>, ModelError> {
    let mut features = Vec::with_capacity(answer.len());
    for record in &answer.records {
        let gene_id = record
            .gene_source_id
            .as_deref()
            .ok_or_else(|| ModelError::Extraction {
                record_class: answer.record_class.clone(),
                reason: format!("transcript {} has no gene", record.source_id),
            })?;

        for loc in source.feature_locations(gene_id)? {
            if !loc.is_top_level || loc.feature_type != GENE_FEATURE_TYPE {
                continue;
            }
            let mut feature = feature_for(
                record,
                &loc.sequence_source_id,
                loc.start_min,
                loc.end_max,
                loc.reversed(),
            );
            feature.group_key = Some(gene_id.to_string());
            features.push(feature);
        }
    }
    Ok(features)
}

///
/// Maps record class names to extraction policies.
///
#[derive(Debug, Clone)]
pub struct PolicyRegistry {
    by_class: HashMap<String, ExtractionPolicy>,
    default_policy: Option<ExtractionPolicy>,
}

impl Default for PolicyRegistry {
    fn default() -> Self {
        let by_class = BUILTIN_RECORD_CLASSES
            .iter()
            .map(|(name, policy)| (name.to_string(), *policy))
            .collect();
        PolicyRegistry {
            by_class,
            default_policy: None,
        }
    }
}

impl PolicyRegistry {
    /// A registry with no assignments at all.
    pub fn empty() -> Self {
        PolicyRegistry {
            by_class: HashMap::default(),
            default_policy: None,
        }
    }

    pub fn assign(&mut self, record_class: &str, policy: ExtractionPolicy) {
        self.by_class.insert(record_class.to_string(), policy);
    }

    /// Policy used for record classes with no assignment.
    pub fn set_default_policy(&mut self, policy: Option<ExtractionPolicy>) {
        self.default_policy = policy;
    }

    pub fn resolve(&self, record_class: &str) -> Result<ExtractionPolicy, UserError> {
        self.by_class
            .get(record_class)
            .copied()
            .or(self.default_policy)
            .ok_or_else(|| UserError::UnsupportedRecordClass(record_class.to_string()))
    }
}
