//! Transport trace readers for the binary and ASCII encodings.
//!
//! ASCII layout:
//! - `#` lines and blank lines are ignored
//! - first data line: declared number of points
//! - each following line: `rank x y z material density`
//!
//! Binary layout (little-endian):
//! - 4-byte magic `PTRC`, u32 version, u64 declared point count
//! - per point: i64 rank + 3×f64 position + i64 material + f64 density = 48 bytes

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use oracle_types::{MaterialId, Point3, SampledPoint};
use tracing::{debug, instrument};

use crate::traits::PointSource;
use crate::types::{TraceEncoding, TraceError};

pub const BINARY_MAGIC: [u8; 4] = *b"PTRC";
pub const BINARY_VERSION: u32 = 1;
pub const BINARY_RECORD_LEN: usize = 48;

enum Decoder<R> {
    Ascii { reader: R, line: usize },
    Binary { reader: R },
}

/// Sequential reader over a trace stream. The header is consumed on open.
pub struct TraceReader<R> {
    decoder: Decoder<R>,
    declared: u64,
}

impl TraceReader<BufReader<File>> {
    /// Open a trace file and skip its header.
    #[instrument]
    pub fn open(path: &Path, encoding: TraceEncoding) -> Result<Self, TraceError> {
        let file = File::open(path)?;
        let reader = Self::from_reader(BufReader::new(file), encoding)?;
        debug!(declared = reader.declared, "trace header read");
        Ok(reader)
    }
}

impl<R: BufRead> TraceReader<R> {
    /// Wrap any buffered stream and skip its header.
    pub fn from_reader(mut reader: R, encoding: TraceEncoding) -> Result<Self, TraceError> {
        match encoding {
            TraceEncoding::Ascii => {
                let mut line = 0;
                let header = next_data_line(&mut reader, &mut line)?
                    .ok_or(TraceError::MissingHeader)?;
                let declared =
                    header
                        .trim()
                        .parse::<u64>()
                        .map_err(|e| TraceError::MalformedRecord {
                            line,
                            reason: format!("bad point count {:?}: {}", header.trim(), e),
                        })?;
                Ok(Self {
                    decoder: Decoder::Ascii { reader, line },
                    declared,
                })
            }
            TraceEncoding::Binary => {
                let mut header = [0u8; 16];
                let read = fill(&mut reader, &mut header)?;
                if read < header.len() {
                    return Err(TraceError::MissingHeader);
                }
                let mut magic = [0u8; 4];
                magic.copy_from_slice(&header[0..4]);
                if magic != BINARY_MAGIC {
                    return Err(TraceError::BadMagic { found: magic });
                }
                let version = u32::from_le_bytes(le_array(&header[4..8]));
                if version != BINARY_VERSION {
                    return Err(TraceError::UnsupportedVersion { version });
                }
                let declared = u64::from_le_bytes(le_array(&header[8..16]));
                Ok(Self {
                    decoder: Decoder::Binary { reader },
                    declared,
                })
            }
        }
    }
}

impl<R: BufRead> PointSource for TraceReader<R> {
    fn declared_points(&self) -> Option<u64> {
        Some(self.declared)
    }

    fn next_point(&mut self) -> Result<Option<SampledPoint>, TraceError> {
        match &mut self.decoder {
            Decoder::Ascii { reader, line } => match next_data_line(reader, line)? {
                Some(text) => parse_ascii_record(&text, *line).map(Some),
                None => Ok(None),
            },
            Decoder::Binary { reader } => {
                let mut record = [0u8; BINARY_RECORD_LEN];
                match fill(reader, &mut record)? {
                    0 => Ok(None),
                    BINARY_RECORD_LEN => Ok(Some(decode_binary_record(&record))),
                    read => Err(TraceError::Truncated {
                        read,
                        expected: BINARY_RECORD_LEN,
                    }),
                }
            }
        }
    }
}

/// Read lines until one carries data. `line` tracks the 1-based line number.
fn next_data_line<R: BufRead>(reader: &mut R, line: &mut usize) -> Result<Option<String>, TraceError> {
    let mut buf = String::new();
    loop {
        buf.clear();
        if reader.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        *line += 1;
        let trimmed = buf.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        return Ok(Some(trimmed.to_string()));
    }
}

fn parse_ascii_record(text: &str, line: usize) -> Result<SampledPoint, TraceError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != 6 {
        return Err(TraceError::MalformedRecord {
            line,
            reason: format!("expected 6 fields, found {}", fields.len()),
        });
    }
    let int = |idx: usize| {
        fields[idx]
            .parse::<i64>()
            .map_err(|e| TraceError::MalformedRecord {
                line,
                reason: format!("field {} ({:?}): {}", idx + 1, fields[idx], e),
            })
    };
    let float = |idx: usize| {
        fields[idx]
            .parse::<f64>()
            .map_err(|e| TraceError::MalformedRecord {
                line,
                reason: format!("field {} ({:?}): {}", idx + 1, fields[idx], e),
            })
    };
    Ok(SampledPoint::new(
        Point3::new(float(1)?, float(2)?, float(3)?),
        MaterialId(int(4)?),
        float(5)?,
        int(0)?,
    ))
}

fn decode_binary_record(record: &[u8; BINARY_RECORD_LEN]) -> SampledPoint {
    let word = |i: usize| le_array(&record[i * 8..(i + 1) * 8]);
    SampledPoint::new(
        Point3::new(
            f64::from_le_bytes(word(1)),
            f64::from_le_bytes(word(2)),
            f64::from_le_bytes(word(3)),
        ),
        MaterialId(i64::from_le_bytes(word(4))),
        f64::from_le_bytes(word(5)),
        i64::from_le_bytes(word(0)),
    )
}

fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

/// Read until `buf` is full or the stream ends; returns the bytes read.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut read = 0;
    while read < buf.len() {
        match reader.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(read)
}

/// Encode points as a binary trace, declaring exactly `points.len()` points.
pub fn encode_binary_trace(points: &[SampledPoint]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16 + points.len() * BINARY_RECORD_LEN);
    buf.extend_from_slice(&BINARY_MAGIC);
    buf.extend_from_slice(&BINARY_VERSION.to_le_bytes());
    buf.extend_from_slice(&(points.len() as u64).to_le_bytes());
    for p in points {
        buf.extend_from_slice(&p.rank.to_le_bytes());
        buf.extend_from_slice(&p.position.x.to_le_bytes());
        buf.extend_from_slice(&p.position.y.to_le_bytes());
        buf.extend_from_slice(&p.position.z.to_le_bytes());
        buf.extend_from_slice(&p.material.0.to_le_bytes());
        buf.extend_from_slice(&p.density.to_le_bytes());
    }
    buf
}

/// Encode points as an ASCII trace, declaring exactly `points.len()` points.
pub fn encode_ascii_trace(points: &[SampledPoint]) -> String {
    let mut out = String::with_capacity(32 + points.len() * 64);
    out.push_str("# rank x y z material density\n");
    out.push_str(&format!("{}\n", points.len()));
    for p in points {
        out.push_str(&format!(
            "{} {:e} {:e} {:e} {} {:e}\n",
            p.rank, p.position.x, p.position.y, p.position.z, p.material, p.density
        ));
    }
    out
}

/// In-memory point source.
#[derive(Debug, Clone, Default)]
pub struct MemoryTrace {
    points: std::vec::IntoIter<SampledPoint>,
    declared: u64,
}

impl MemoryTrace {
    pub fn new(points: Vec<SampledPoint>) -> Self {
        let declared = points.len() as u64;
        Self {
            points: points.into_iter(),
            declared,
        }
    }
}

impl PointSource for MemoryTrace {
    fn declared_points(&self) -> Option<u64> {
        Some(self.declared)
    }

    fn next_point(&mut self) -> Result<Option<SampledPoint>, TraceError> {
        Ok(self.points.next())
    }
}
