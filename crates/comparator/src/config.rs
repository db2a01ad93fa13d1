//! Configuration for a comparison run.

/// Default surface-proximity tolerance.
pub const DEFAULT_DELTA: f64 = 1e-7;

/// What to do with a sampled point that resolves to no region of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutsidePolicy {
    /// Stop the run: the two geometries disagree structurally.
    #[default]
    Abort,
    /// Count the point as OUTSIDE and keep going.
    Tally,
}

/// Parameters of one comparison run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComparisonConfig {
    /// Mismatches strictly closer than this to the region surface are ignored.
    pub delta: f64,
    /// Maximum number of points to classify. `None` means the whole trace.
    pub point_budget: Option<u64>,
    pub outside_policy: OutsidePolicy,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            delta: DEFAULT_DELTA,
            point_budget: None,
            outside_policy: OutsidePolicy::Abort,
        }
    }
}

impl ComparisonConfig {
    pub fn with_delta(delta: f64) -> Self {
        Self {
            delta,
            ..Self::default()
        }
    }

    pub fn with_budget(self, budget: u64) -> Self {
        Self {
            point_budget: Some(budget),
            ..self
        }
    }

    pub fn tally_outside(self) -> Self {
        Self {
            outside_policy: OutsidePolicy::Tally,
            ..self
        }
    }

    /// Number of points a run will classify given what the source declares.
    pub fn planned_points(&self, declared: Option<u64>) -> Option<u64> {
        match (self.point_budget, declared) {
            (Some(budget), Some(declared)) => Some(budget.min(declared)),
            (Some(n), None) | (None, Some(n)) => Some(n),
            (None, None) => None,
        }
    }
}
