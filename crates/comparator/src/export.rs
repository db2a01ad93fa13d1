//! Failed-point export for visualization.
//!
//! For a base name `B` with file stem `raw`, three files are written:
//! - `raw.failedpoints.dat`: one line per failed point, eight f64 fields
//! - `raw.failedpoints.general`: general-format header describing the `.dat` file
//! - `raw.points`: manifest naming the header

use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use crate::statistics::FailedPoint;

pub const FIELD_NAMES: [&str; 8] = [
    "x",
    "y",
    "z",
    "pointID",
    "cellID",
    "materialID",
    "dist",
    "rank",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("invalid visualization base name: {0:?}")]
    InvalidBaseName(String),

    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Paths of the files produced by one export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualizationFiles {
    pub dataset: PathBuf,
    pub header: PathBuf,
    pub manifest: PathBuf,
}

/// The base name with its directories and last extension stripped.
pub fn raw_name(base_name: &str) -> Result<String, ExportError> {
    Path::new(base_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ExportError::InvalidBaseName(base_name.to_string()))
}

/// The dataset body: one line per failed point, in classification order.
pub fn dataset_text(failures: &[FailedPoint]) -> String {
    let mut out = String::with_capacity(failures.len() * 8 * 24);
    for failed in failures {
        let line: Vec<String> = failed
            .to_record()
            .iter()
            .map(|v| format!("{:.15e}", v))
            .collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// The general-format header pointing at `dataset_file`.
pub fn header_text(dataset_file: &str, count: usize) -> String {
    let n = FIELD_NAMES.len();
    let mut out = String::new();
    out.push_str(&format!("file = {}\n", dataset_file));
    out.push_str(&format!("points = {}\n", count));
    out.push_str("format = ascii\n");
    out.push_str("interleaving = field\n");
    out.push_str(&format!("field = {}\n", FIELD_NAMES.join(", ")));
    out.push_str(&format!("structure = {}\n", vec!["scalar"; n].join(", ")));
    out.push_str(&format!("type = {}\n", vec!["double"; n].join(", ")));
    out.push_str("\nend\n");
    out
}

/// The manifest line naming the header file.
pub fn manifest_text(raw: &str) -> String {
    format!("name {}.failedpoints.general\n", raw)
}

/// Write dataset, header and manifest for `failures` into `out_dir`.
#[instrument(skip(failures), fields(failures = failures.len()))]
pub fn write_visualization(
    failures: &[FailedPoint],
    base_name: &str,
    out_dir: &Path,
) -> Result<VisualizationFiles, ExportError> {
    let raw = raw_name(base_name)?;
    let dataset_name = format!("{}.failedpoints.dat", raw);

    let files = VisualizationFiles {
        dataset: out_dir.join(&dataset_name),
        header: out_dir.join(format!("{}.failedpoints.general", raw)),
        manifest: out_dir.join(format!("{}.points", raw)),
    };

    write_file(&files.dataset, &dataset_text(failures))?;
    write_file(&files.header, &header_text(&dataset_name, failures.len()))?;
    write_file(&files.manifest, &manifest_text(&raw))?;

    info!(dataset = %files.dataset.display(), "visualization written");
    Ok(files)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
