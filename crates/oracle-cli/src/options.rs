//! Command line options.

use std::fs::File;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};
use comparator::{ComparisonConfig, OutsidePolicy, DEFAULT_DELTA};
use geometry_query::TraceEncoding;
use tracing::level_filters::LevelFilter;
use tracing::warn;

use crate::CliError;

/// Compare a declarative geometry with a transport trace and check that they
/// are weakly equivalent.
///
/// A point matches when the composition found at that point in the model
/// corresponds to the material the trace reports there. The correspondence
/// is learned from the first point seen for each material and density.
#[derive(Debug, Parser)]
#[command(name = "oracle")]
pub struct Options {
    /// Declarative model (JSON scene).
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,

    /// Transport trace sampled through the converted model.
    #[arg(value_name = "TRACE")]
    pub trace: PathBuf,

    /// Increase output verbosity.
    #[arg(short = 'V', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,

    /// Maximum number of tested points.
    #[arg(short = 'n', long = "npts", allow_hyphen_values = true)]
    pub npoints: Option<i64>,

    /// Distance to the nearest surface below which a failed test is ignored.
    #[arg(short = 'd', long, allow_hyphen_values = true)]
    pub delta: Option<f64>,

    /// Guess the material correspondence from the first few points.
    #[arg(short = 'g', long = "guess-material-assocs")]
    pub guess_material_assocs: bool,

    /// The trace is binary (default).
    #[arg(long, overrides_with = "ascii")]
    pub binary: bool,

    /// The trace is ASCII.
    #[arg(long, overrides_with = "binary")]
    pub ascii: bool,

    /// Base name of the visualization files.
    #[arg(short, long, default_value = "outputViz.txt")]
    pub output: String,

    /// Count points outside the model as OUTSIDE instead of stopping.
    #[arg(long)]
    pub tally_outside: bool,
}

impl Options {
    pub fn encoding(&self) -> TraceEncoding {
        if self.ascii {
            TraceEncoding::Ascii
        } else {
            TraceEncoding::Binary
        }
    }

    pub fn input_files(&self) -> [&Path; 2] {
        [self.model.as_path(), self.trace.as_path()]
    }

    /// Fail on the first input file that cannot be opened for reading.
    pub fn check_inputs(&self) -> Result<(), CliError> {
        for path in self.input_files() {
            File::open(path).map_err(|_| CliError::UnreadableFile {
                path: path.to_path_buf(),
            })?;
        }
        Ok(())
    }

    /// The point budget. Non-positive values are ignored with a warning.
    pub fn point_budget(&self) -> Option<u64> {
        match self.npoints {
            Some(n) if n <= 0 => {
                warn!(npoints = n, "npoints <= 0, ignored");
                None
            }
            Some(n) => Some(n as u64),
            None => None,
        }
    }

    /// The surface tolerance. Non-positive values fall back to the default with a warning.
    pub fn surface_delta(&self) -> f64 {
        match self.delta {
            Some(d) if d > 0.0 => d,
            Some(d) => {
                warn!(delta = d, "delta <= 0, using delta = {:e}", DEFAULT_DELTA);
                DEFAULT_DELTA
            }
            None => DEFAULT_DELTA,
        }
    }

    pub fn comparison_config(&self) -> ComparisonConfig {
        ComparisonConfig {
            delta: self.surface_delta(),
            point_budget: self.point_budget(),
            outside_policy: if self.tally_outside {
                OutsidePolicy::Tally
            } else {
                OutsidePolicy::Abort
            },
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::INFO,
            1 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
