use std::collections::HashMap;

use log::{debug, info};

use spanlogic_core::{FeatureSource, RowSink};

use crate::aggregate::{aggregate, merge_unmatched};
use crate::columns::{OutputColumn, make_row};
use crate::config::ComposeConfig;
use crate::errors::ComposeError;
use crate::evaluate::SpanRelationEvaluator;
use crate::params::{Side, SpanParams, required_parameter_names};
use crate::policy::PolicyRegistry;
use crate::stager::FeatureStager;
use crate::staging::{NameAllocator, StagedSetGuard, StagingLifecycle, StagingStore};

///
/// Composes two feature sets per request: stages both sides, joins them and writes one row per
/// output feature.
///
/// A `SpanComposition` holds no per-request state and may serve concurrent requests against
/// the same store.
///
pub struct SpanComposition<'s> {
    source: &'s dyn FeatureSource,
    store: &'s dyn StagingStore,
    config: ComposeConfig,
    registry: PolicyRegistry,
}

impl<'s> SpanComposition<'s> {
    pub fn new(
        source: &'s dyn FeatureSource,
        store: &'s dyn StagingStore,
        config: ComposeConfig,
    ) -> Self {
        let registry = config.policy_registry();
        SpanComposition {
            source,
            store,
            config,
            registry,
        }
    }

    pub fn config(&self) -> &ComposeConfig {
        &self.config
    }

    pub fn required_parameter_names(&self) -> Vec<String> {
        required_parameter_names()
    }

    /// Check request parameters without running anything.
    pub fn validate_parameters(
        &self,
        params: &HashMap<String, String>,
    ) -> Result<SpanParams, ComposeError> {
        Ok(SpanParams::parse(params)?)
    }

    ///
    /// Run one request.
    ///
    /// # Arguments
    /// - params: raw request parameters
    /// - columns: the column order of the rows written to `sink`
    /// - sink: receives the result rows
    ///
    /// # Returns
    /// - the number of rows written. On error, rows already handed to the sink must be
    ///   discarded by the caller; staged sets are released either way.
    pub fn execute<S: RowSink + ?Sized>(
        &self,
        params: &HashMap<String, String>,
        columns: &[OutputColumn],
        sink: &mut S,
    ) -> Result<usize, ComposeError> {
        let params = SpanParams::parse(params)?;
        info!(
            "Composing {} with {}: {}, {}, output {}",
            params.span_a,
            params.span_b,
            params.relation,
            params.strand,
            params.output
        );

        let lifecycle = StagingLifecycle::new(self.store, NameAllocator::new(&self.config.name_prefix));
        let stager = FeatureStager::new(self.source, &self.registry, &lifecycle);

        let (guard_a, guard_b) = self.stage_both(&stager, &params)?;
        let set_a = guard_a.fetch()?;
        let set_b = guard_b.fetch()?;

        let evaluator = SpanRelationEvaluator::new(params.relation, params.strand, params.output);
        let pairs = evaluator.evaluate(&set_a, &set_b);
        let matched_pairs = pairs.len();

        let mut results: Vec<_> = aggregate(pairs, self.config.max_matched_regions_len).collect();
        if self.config.include_unmatched {
            let output_set = match params.output {
                Side::A => &set_a,
                Side::B => &set_b,
            };
            results = merge_unmatched(results, output_set);
        }

        for result in &results {
            sink.add_row(make_row(columns, result))?;
        }
        sink.finish()?;

        guard_a.release()?;
        guard_b.release()?;

        info!(
            "Wrote {} rows from {} matched pairs",
            results.len(),
            matched_pairs
        );
        Ok(results.len())
    }

    fn stage_both<'l>(
        &self,
        stager: &FeatureStager<'l>,
        params: &SpanParams,
    ) -> Result<(StagedSetGuard<'l>, StagedSetGuard<'l>), ComposeError> {
        let stage = |side: Side| stager.stage(side, params.reference(side), params.anchors(side));

        if self.config.parallel_staging {
            debug!("Staging both sides in parallel");
            // a side that staged fine is released by its guard when the other one fails
            let (a, b) = rayon::join(|| stage(Side::A), || stage(Side::B));
            Ok((a?, b?))
        } else {
            let a = stage(Side::A)?;
            let b = stage(Side::B)?;
            Ok((a, b))
        }
    }
}
