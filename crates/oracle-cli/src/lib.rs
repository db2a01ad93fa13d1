//! Run driver for the `oracle` binary.

pub mod options;

use std::io::Write;
use std::path::{Path, PathBuf};

use comparator::{compare, ComparatorError, ComparisonRun, ExportError};
use geometry_query::{load_scene, GeometryError, PointSource, TraceError, TraceReader};
use tracing::{info, warn};

pub use options::Options;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("'{}': unknown option or unreachable file.", .path.display())]
    UnreadableFile { path: PathBuf },

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Trace(#[from] TraceError),

    #[error(transparent)]
    Comparison(#[from] ComparatorError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

/// Load both inputs, compare them, print the report to `out` and write the
/// visualization files into `out_dir`.
pub fn run(options: &Options, out_dir: &Path, out: &mut dyn Write) -> Result<ComparisonRun, CliError> {
    options.check_inputs()?;
    if options.guess_material_assocs {
        warn!("guessing material associations is not supported, -g ignored");
    }
    let config = options.comparison_config();

    let scene = load_scene(&options.model)?;
    let mut trace = TraceReader::open(&options.trace, options.encoding())?;

    let planned = config
        .planned_points(trace.declared_points())
        .map(|n| n.to_string())
        .unwrap_or_else(|| "all".to_string());
    writeln!(out, "Starting comparison on {} points...", planned)?;

    let run = compare(&scene, &scene, &mut trace, config)?;

    write!(out, "{}", run.statistics.report())?;
    if options.verbose > 0 {
        write!(out, "\n{}", run.equivalences.to_text())?;
    }

    let files = run
        .statistics
        .export_for_visualization(&options.output, out_dir)?;
    info!(manifest = %files.manifest.display(), "export complete");
    Ok(run)
}
