use std::path::PathBuf;

use oracle_types::RegionId;

/// Errors from loading or querying a declarative model.
#[derive(Debug, thiserror::Error)]
pub enum GeometryError {
    #[error("failed to read scene {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scene: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("region {region} declared twice")]
    DuplicateRegion { region: RegionId },

    #[error("region id {region} is negative")]
    NegativeRegion { region: RegionId },

    #[error("region {region} has a degenerate shape: {reason}")]
    DegenerateShape { region: RegionId, reason: String },
}

/// Errors from reading a transport trace.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("trace I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a binary trace (bad magic {found:?})")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported binary trace version {version}")]
    UnsupportedVersion { version: u32 },

    #[error("trace header has no declared point count")]
    MissingHeader,

    #[error("malformed trace record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("truncated binary record: {read} of {expected} bytes")]
    Truncated { read: usize, expected: usize },
}

/// The two on-disk trace encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraceEncoding {
    #[default]
    Binary,
    Ascii,
}
