//! Run-level counters and failure records.

use std::collections::BTreeSet;
use std::path::Path;

use oracle_types::{MaterialId, Point3, RegionId, SampledPoint};

use crate::export::{self, ExportError, VisualizationFiles};
use crate::report::StatisticsReport;

/// Detail kept for every point classified FAILED.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedPoint {
    pub position: Point3,
    /// Rank of the point in the trace.
    pub point_rank: i64,
    pub region: RegionId,
    pub material: MaterialId,
    pub distance: f64,
    /// 0-based position of the point in the run's sampling order.
    pub sequence_rank: u64,
}

impl FailedPoint {
    /// The export record `x y z pointID cellID materialID dist rank`, all as f64.
    pub fn to_record(&self) -> [f64; 8] {
        [
            self.position.x,
            self.position.y,
            self.position.z,
            self.point_rank as f64,
            self.region.0 as f64,
            self.material.0 as f64,
            self.distance,
            self.sequence_rank as f64,
        ]
    }
}

/// Counters, covered regions and failure records for one comparison run.
///
/// Counters only ever grow. Failures are kept in classification order.
#[derive(Debug, Clone, Default)]
pub struct Statistics {
    success: u64,
    failure: u64,
    ignored: u64,
    outside: u64,
    covered: BTreeSet<RegionId>,
    failures: Vec<FailedPoint>,
    total_regions: usize,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_success(&mut self) {
        self.success += 1;
    }

    pub fn increment_failure(&mut self) {
        self.failure += 1;
    }

    pub fn increment_ignored(&mut self) {
        self.ignored += 1;
    }

    pub fn increment_outside(&mut self) {
        self.outside += 1;
    }

    pub fn record_failure(
        &mut self,
        point: &SampledPoint,
        region: RegionId,
        distance: f64,
        sequence_rank: u64,
    ) {
        self.failures.push(FailedPoint {
            position: point.position,
            point_rank: point.rank,
            region,
            material: point.material,
            distance,
            sequence_rank,
        });
    }

    pub fn record_covered_region(&mut self, region: RegionId) {
        self.covered.insert(region);
    }

    /// Set once before sampling. A later call overwrites.
    pub fn set_total_region_count(&mut self, n: usize) {
        self.total_regions = n;
    }

    pub fn success(&self) -> u64 {
        self.success
    }

    pub fn failure(&self) -> u64 {
        self.failure
    }

    pub fn ignored(&self) -> u64 {
        self.ignored
    }

    pub fn outside(&self) -> u64 {
        self.outside
    }

    pub fn total_sampled(&self) -> u64 {
        self.success + self.failure + self.ignored + self.outside
    }

    pub fn covered_regions(&self) -> &BTreeSet<RegionId> {
        &self.covered
    }

    pub fn total_region_count(&self) -> usize {
        self.total_regions
    }

    pub fn failures(&self) -> &[FailedPoint] {
        &self.failures
    }

    /// Summarize the run.
    pub fn report(&self) -> StatisticsReport {
        let distances = self.failures.iter().map(|f| f.distance);
        let (sum, max) = distances.fold((0.0, f64::NEG_INFINITY), |(s, m), d| (s + d, m.max(d)));
        let (mean, max) = if self.failures.is_empty() {
            (None, None)
        } else {
            (Some(sum / self.failures.len() as f64), Some(max))
        };

        StatisticsReport {
            sampled: self.total_sampled(),
            success: self.success,
            failure: self.failure,
            ignored: self.ignored,
            outside: self.outside,
            covered_regions: self.covered.len(),
            total_regions: self.total_regions,
            mean_failure_distance: mean,
            max_failure_distance: max,
        }
    }

    /// Write the failed points for visualization into `out_dir`.
    pub fn export_for_visualization(
        &self,
        base_name: &str,
        out_dir: &Path,
    ) -> Result<VisualizationFiles, ExportError> {
        export::write_visualization(&self.failures, base_name, out_dir)
    }
}
