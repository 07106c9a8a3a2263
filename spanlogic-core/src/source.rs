use std::collections::HashMap;

use crate::errors::SourceError;
use crate::models::{Answer, FeatureLocation, PointLocation};

///
/// Upstream collaborator that resolves references to answers and locates their features.
///
/// Implementations must be shareable across threads; both sides of a request may be
/// staged at the same time.
///
pub trait FeatureSource: Send + Sync {
    ///
    /// Resolve an opaque upstream reference (e.g. a result-set id) to its answer.
    ///
    /// # Arguments
    /// - reference: the reference passed as `span_a` / `span_b`
    ///
    /// # Returns
    /// - the answer, `SourceError::NotFound` when the reference does not exist, or
    ///   `SourceError::NotRunnable` when it exists but cannot be evaluated
    fn answer(&self, reference: &str) -> Result<Answer, SourceError>;

    /// All catalogued locations of a feature, in catalog order.
    fn feature_locations(&self, feature_source_id: &str)
    -> Result<Vec<FeatureLocation>, SourceError>;

    /// The locus of a point feature, if catalogued.
    fn point_location(&self, source_id: &str) -> Result<Option<PointLocation>, SourceError>;
}

///
/// A [`FeatureSource`] held entirely in memory.
///
#[derive(Debug, Default, Clone)]
pub struct InMemoryFeatureSource {
    answers: HashMap<String, Answer>,
    unrunnable: HashMap<String, String>,
    locations: HashMap<String, Vec<FeatureLocation>>,
    points: HashMap<String, PointLocation>,
}

impl InMemoryFeatureSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_answer(&mut self, reference: &str, answer: Answer) {
        self.answers.insert(reference.to_string(), answer);
    }

    /// Register a reference that exists but fails to run.
    pub fn insert_unrunnable(&mut self, reference: &str, reason: &str) {
        self.unrunnable
            .insert(reference.to_string(), reason.to_string());
    }

    pub fn insert_location(&mut self, location: FeatureLocation) {
        self.locations
            .entry(location.feature_source_id.clone())
            .or_default()
            .push(location);
    }

    pub fn insert_point(&mut self, point: PointLocation) {
        self.points.insert(point.source_id.clone(), point);
    }

    pub fn with_answer(mut self, reference: &str, answer: Answer) -> Self {
        self.insert_answer(reference, answer);
        self
    }

    pub fn with_location(mut self, location: FeatureLocation) -> Self {
        self.insert_location(location);
        self
    }

    pub fn with_point(mut self, point: PointLocation) -> Self {
        self.insert_point(point);
        self
    }
}

impl FeatureSource for InMemoryFeatureSource {
    fn answer(&self, reference: &str) -> Result<Answer, SourceError> {
        if let Some(reason) = self.unrunnable.get(reference) {
            return Err(SourceError::NotRunnable {
                reference: reference.to_string(),
                reason: reason.clone(),
            });
        }
        self.answers
            .get(reference)
            .cloned()
            .ok_or_else(|| SourceError::NotFound(reference.to_string()))
    }

    fn feature_locations(
        &self,
        feature_source_id: &str,
    ) -> Result<Vec<FeatureLocation>, SourceError> {
        Ok(self
            .locations
            .get(feature_source_id)
            .cloned()
            .unwrap_or_default())
    }

    fn point_location(&self, source_id: &str) -> Result<Option<PointLocation>, SourceError> {
        Ok(self.points.get(source_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnswerRecord;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn source() -> InMemoryFeatureSource {
        InMemoryFeatureSource::new()
            .with_answer(
                "step_1",
                Answer::new(
                    "GeneRecordClasses.GeneRecordClass",
                    vec![AnswerRecord {
                        source_id: "G1".to_string(),
                        project_id: "PlasmoDB".to_string(),
                        weight: 10,
                        gene_source_id: None,
                    }],
                ),
            )
            .with_location(FeatureLocation {
                feature_source_id: "G1".to_string(),
                sequence_source_id: "chr1".to_string(),
                start_min: 100,
                end_max: 200,
                is_reversed: None,
                is_top_level: true,
                feature_type: "GeneFeature".to_string(),
            })
    }

    #[rstest]
    fn test_answer_lookup(source: InMemoryFeatureSource) {
        let answer = source.answer("step_1").unwrap();
        assert_eq!(answer.len(), 1);
        assert_eq!(answer.records[0].source_id, "G1");
    }

    #[rstest]
    fn test_unknown_reference(source: InMemoryFeatureSource) {
        assert!(matches!(
            source.answer("step_2"),
            Err(SourceError::NotFound(_))
        ));
    }

    #[rstest]
    fn test_unrunnable_reference(mut source: InMemoryFeatureSource) {
        source.insert_unrunnable("step_1", "invalid parameter value");
        assert!(matches!(
            source.answer("step_1"),
            Err(SourceError::NotRunnable { .. })
        ));
    }

    #[rstest]
    fn test_locations(source: InMemoryFeatureSource) {
        let locations = source.feature_locations("G1").unwrap();
        assert_eq!(locations.len(), 1);
        assert_eq!(locations[0].reversed(), false);
        assert!(source.feature_locations("G2").unwrap().is_empty());
        assert!(source.point_location("G1").unwrap().is_none());
    }
}
