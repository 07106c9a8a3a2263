//! Rows yielded by the upstream collaborators before staging.

///
/// One record of an upstream answer (a result set the user already computed).
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnswerRecord {
    pub source_id: String,
    pub project_id: String,
    pub weight: i64,
    /// Set for transcript records only.
    pub gene_source_id: Option<String>,
}

///
/// A resolved upstream answer: the record class tag plus its records.
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Answer {
    pub record_class: String,
    pub records: Vec<AnswerRecord>,
}

impl Answer {
    pub fn new(record_class: &str, records: Vec<AnswerRecord>) -> Self {
        Answer {
            record_class: record_class.to_string(),
            records,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

///
/// A row of the feature location catalog.
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct FeatureLocation {
    pub feature_source_id: String,
    pub sequence_source_id: String,
    pub start_min: i64,
    pub end_max: i64,
    /// Missing orientation is read as forward.
    pub is_reversed: Option<bool>,
    pub is_top_level: bool,
    pub feature_type: String,
}

impl FeatureLocation {
    pub fn reversed(&self) -> bool {
        self.is_reversed.unwrap_or(false)
    }
}

///
/// Single-locus location of a point feature (e.g. a SNP).
///
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PointLocation {
    pub source_id: String,
    pub sequence_source_id: String,
    pub location: i64,
}
