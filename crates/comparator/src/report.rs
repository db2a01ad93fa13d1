//! Text report over a finished comparison run.

use std::fmt;

/// Numbers behind the report. Built by [`crate::Statistics::report`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsReport {
    pub sampled: u64,
    pub success: u64,
    pub failure: u64,
    pub ignored: u64,
    pub outside: u64,
    pub covered_regions: usize,
    pub total_regions: usize,
    /// `None` when no point failed.
    pub mean_failure_distance: Option<f64>,
    /// `None` when no point failed.
    pub max_failure_distance: Option<f64>,
}

impl StatisticsReport {
    /// Share of sampled points, in percent. 0 for an empty run.
    pub fn percentage(&self, count: u64) -> f64 {
        if self.sampled == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.sampled as f64
        }
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("\n---------------------------\n");
        out.push_str("Reporting on geometry comparison\n");
        out.push_str("---------------------------\n");
        out.push_str(&format!("Number of SAMPLED points : {}\n", self.sampled));

        for (label, count) in [
            ("SUCCESSFUL", self.success),
            ("FAILED    ", self.failure),
            ("IGNORED   ", self.ignored),
            ("OUTSIDE   ", self.outside),
        ] {
            out.push_str(&format!(
                "Number of {}     : {} -> {:.2}%\n",
                label,
                count,
                self.percentage(count)
            ));
        }

        out.push_str(&format!(
            "Number of COVERED volumes: {}\n",
            self.covered_regions
        ));
        out.push_str(&format!("Number of INPUT   volumes: {}\n", self.total_regions));
        out.push_str(&format!(
            "Average distance to surface for FAILED points: {}\n",
            fmt_distance(self.mean_failure_distance)
        ));
        out.push_str(&format!(
            "Maximum distance to surface for FAILED points: {}\n",
            fmt_distance(self.max_failure_distance)
        ));
        out
    }
}

fn fmt_distance(d: Option<f64>) -> String {
    match d {
        Some(d) => format!("{:e}", d),
        None => "n/a".to_string(),
    }
}

impl fmt::Display for StatisticsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}
