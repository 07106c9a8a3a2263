use fxhash::FxHashSet as HashSet;
use log::debug;

use spanlogic_core::{Answer, Feature, FeatureSource, SourceError};

use crate::anchor::AnchorSpec;
use crate::errors::{ComposeError, ModelError, UserError};
use crate::params::Side;
use crate::policy::{ExtractionPolicy, PolicyRegistry};
use crate::staging::{StagedFeatureSet, StagedSetGuard, StagingLifecycle};

///
/// Extracts one side's features from its upstream answer and stages them.
///
pub struct FeatureStager<'s> {
    source: &'s dyn FeatureSource,
    registry: &'s PolicyRegistry,
    lifecycle: &'s StagingLifecycle<'s>,
}

impl<'s> FeatureStager<'s> {
    pub fn new(
        source: &'s dyn FeatureSource,
        registry: &'s PolicyRegistry,
        lifecycle: &'s StagingLifecycle<'s>,
    ) -> Self {
        FeatureStager {
            source,
            registry,
            lifecycle,
        }
    }

    ///
    /// Stage the features of one side.
    ///
    /// # Arguments
    /// - side: which side the reference belongs to
    /// - reference: opaque upstream reference of the side's answer
    /// - anchors: the side's begin/end anchoring
    ///
    /// # Returns
    /// - a guard owning the staged set; dropping it releases the set
    pub fn stage(
        &self,
        side: Side,
        reference: &str,
        anchors: &AnchorSpec,
    ) -> Result<StagedSetGuard<'s>, ComposeError> {
        let answer = self.resolve(side, reference)?;
        let policy = self.registry.resolve(&answer.record_class)?;
        let features = extract_features(self.source, &answer, policy, anchors)?;

        debug!(
            "Side {}: {} records of {} gave {} features ({} policy)",
            side,
            answer.len(),
            answer.record_class,
            features.len(),
            policy
        );

        let guard = self.lifecycle.materialize(StagedFeatureSet {
            side,
            policy,
            features,
        })?;
        Ok(guard)
    }

    fn resolve(&self, side: Side, reference: &str) -> Result<Answer, ComposeError> {
        self.source.answer(reference).map_err(|err| match err {
            SourceError::NotFound(reference) => {
                UserError::UnknownReference { side, reference }.into()
            }
            source => ModelError::Source { side, source }.into(),
        })
    }
}

///
/// Extract an answer's features and replace their raw coordinates with the anchor-derived
/// boundaries. Identical rows are kept once, in first-seen order.
///
pub fn extract_features(
    source: &dyn FeatureSource,
    answer: &Answer,
    policy: ExtractionPolicy,
    anchors: &AnchorSpec,
) -> Result<Vec<Feature>, ModelError> {
    let mut seen = HashSet::default();
    let mut features = Vec::new();
    for mut feature in policy.extract(source, answer)? {
        let (begin, end) = anchors
            .resolve(feature.begin, feature.end, feature.reversed)
            .ok_or_else(|| ModelError::Extraction {
                record_class: answer.record_class.clone(),
                reason: format!(
                    "anchored boundaries of {} at {}:{}-{} are out of range",
                    feature.source_id, feature.sequence_id, feature.begin, feature.end
                ),
            })?;
        feature.begin = begin;
        feature.end = end;
        if seen.insert(feature.clone()) {
            features.push(feature);
        }
    }
    Ok(features)
}
