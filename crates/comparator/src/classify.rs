//! Point classification against the declarative model.
//!
//! Each sampled point is resolved to a region, the region is named, and the
//! (material, density) key of the point is checked against the learned
//! [`EquivalenceMap`]. Mismatches close to the region surface are ignored;
//! the rest are failures.

use geometry_query::{CompositionNamer, PointSource, RegionResolver, TraceError};
use oracle_types::{Point3, RegionId, SampledPoint};
use tracing::{debug, info, instrument};

use crate::config::{ComparisonConfig, OutsidePolicy};
use crate::equivalence::{Equivalence, EquivalenceMap};
use crate::statistics::Statistics;

/// Classification of one sampled point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
    /// Mismatch within `delta` of the region surface.
    Ignored,
    /// No region contains the point (only under `OutsidePolicy::Tally`).
    Outside,
}

#[derive(Debug, thiserror::Error)]
pub enum ComparatorError {
    #[error("point {rank} at {position:?} is outside the declarative geometry")]
    OutsideGeometry { rank: i64, position: Point3 },

    #[error("region {region} has no composition")]
    UnnamedRegion { region: RegionId },

    #[error(transparent)]
    Trace(#[from] TraceError),
}

/// Everything a finished run leaves behind.
#[derive(Debug, Clone)]
pub struct ComparisonRun {
    pub statistics: Statistics,
    pub equivalences: EquivalenceMap,
}

/// Drives classification for one run. Owns the run's equivalence map and statistics.
pub struct Comparator<'a> {
    resolver: &'a dyn RegionResolver,
    namer: &'a dyn CompositionNamer,
    config: ComparisonConfig,
    equivalences: EquivalenceMap,
    stats: Statistics,
    classified: u64,
}

impl<'a> Comparator<'a> {
    pub fn new(
        resolver: &'a dyn RegionResolver,
        namer: &'a dyn CompositionNamer,
        config: ComparisonConfig,
    ) -> Self {
        let mut stats = Statistics::new();
        stats.set_total_region_count(resolver.total_region_count());
        Self {
            resolver,
            namer,
            config,
            equivalences: EquivalenceMap::new(),
            stats,
            classified: 0,
        }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    pub fn equivalences(&self) -> &EquivalenceMap {
        &self.equivalences
    }

    /// Number of points classified so far.
    pub fn classified(&self) -> u64 {
        self.classified
    }

    /// Classify one point and record the outcome.
    ///
    /// Under `OutsidePolicy::Abort` a point outside every region is an error
    /// and leaves the statistics untouched.
    pub fn classify(&mut self, point: &SampledPoint) -> Result<Outcome, ComparatorError> {
        let region = self.resolve(point)?;
        let Some(region) = region else {
            self.stats.increment_outside();
            self.classified += 1;
            return Ok(Outcome::Outside);
        };

        let namer = self.namer;
        let composition = namer
            .composition_name(region)
            .ok_or(ComparatorError::UnnamedRegion { region })?;
        let key = point.equivalence_key();
        let sequence_rank = self.classified;

        let outcome = match self.equivalences.check_or_bind(key, composition) {
            Equivalence::Bound => {
                debug!(%key, composition, "new equivalence");
                self.stats.increment_success();
                Outcome::Success
            }
            Equivalence::Matches => {
                self.stats.increment_success();
                Outcome::Success
            }
            Equivalence::Conflicts { bound } => {
                let distance = namer.distance_to_surface(&point.position, region);
                if distance < self.config.delta {
                    debug!(rank = point.rank, %region, distance, "mismatch near surface ignored");
                    self.stats.increment_ignored();
                    Outcome::Ignored
                } else {
                    debug!(
                        rank = point.rank,
                        %region,
                        %key,
                        expected = %bound,
                        found = composition,
                        distance,
                        "composition mismatch"
                    );
                    self.stats.increment_failure();
                    self.stats
                        .record_failure(point, region, distance, sequence_rank);
                    Outcome::Failed
                }
            }
        };

        self.stats.record_covered_region(region);
        self.classified += 1;
        Ok(outcome)
    }

    /// `Ok(None)` means outside, tolerated by the policy.
    fn resolve(&self, point: &SampledPoint) -> Result<Option<RegionId>, ComparatorError> {
        let region = self.resolver.resolve_region(&point.position);
        if !region.is_outside() {
            return Ok(Some(region));
        }
        match self.config.outside_policy {
            OutsidePolicy::Abort => Err(ComparatorError::OutsideGeometry {
                rank: point.rank,
                position: point.position,
            }),
            OutsidePolicy::Tally => {
                debug!(rank = point.rank, "point outside geometry tallied");
                Ok(None)
            }
        }
    }

    /// Classify points from `source` until it is exhausted or the planned
    /// number of points is reached. Returns the number classified.
    #[instrument(skip_all)]
    pub fn run(&mut self, source: &mut dyn PointSource) -> Result<u64, ComparatorError> {
        let planned = self.config.planned_points(source.declared_points());
        info!(?planned, delta = self.config.delta, "starting comparison");

        let mut taken = 0u64;
        while planned.map_or(true, |n| taken < n) {
            let Some(point) = source.next_point()? else {
                break;
            };
            self.classify(&point)?;
            taken += 1;
        }

        info!(
            taken,
            success = self.stats.success(),
            failure = self.stats.failure(),
            ignored = self.stats.ignored(),
            outside = self.stats.outside(),
            "comparison complete"
        );
        Ok(taken)
    }

    pub fn finish(self) -> ComparisonRun {
        ComparisonRun {
            statistics: self.stats,
            equivalences: self.equivalences,
        }
    }
}

/// Run a whole comparison: classify `source` against the model and return the results.
pub fn compare(
    resolver: &dyn RegionResolver,
    namer: &dyn CompositionNamer,
    source: &mut dyn PointSource,
    config: ComparisonConfig,
) -> Result<ComparisonRun, ComparatorError> {
    let mut comparator = Comparator::new(resolver, namer, config);
    comparator.run(source)?;
    Ok(comparator.finish())
}
