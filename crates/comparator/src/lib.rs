//! Weak-equivalence comparison between a declarative model and a transport trace.
//!
//! # Key Components
//!
//! - [`Comparator`]: classifies sampled points, learning material correspondences
//! - [`EquivalenceMap`]: first-observation-wins map from trace keys to compositions
//! - [`Statistics`]: counters, covered regions and failure records for one run
//! - [`report`]: text report over a finished run
//! - [`export`]: failed-point dataset for visualization

pub mod classify;
pub mod config;
pub mod equivalence;
pub mod export;
pub mod report;
pub mod statistics;

pub use classify::{compare, Comparator, ComparatorError, ComparisonRun, Outcome};
pub use config::{ComparisonConfig, OutsidePolicy, DEFAULT_DELTA};
pub use equivalence::{Equivalence, EquivalenceMap};
pub use export::{ExportError, VisualizationFiles};
pub use report::StatisticsReport;
pub use statistics::{FailedPoint, Statistics};
