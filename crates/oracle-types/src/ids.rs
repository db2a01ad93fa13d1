use std::fmt;

use serde::{Deserialize, Serialize};

/// Handle to a region of the declarative model.
///
/// Negative values mean "no containing region".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RegionId(pub i64);

impl RegionId {
    /// Sentinel returned by resolvers for positions outside every region.
    pub const OUTSIDE: Self = Self(-1);

    pub fn is_outside(&self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Material identifier as reported by the transport trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MaterialId(pub i64);

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace-side identity at which compositions are distinguished:
/// the same material at two densities gets two keys.
///
/// The density is stored by bit pattern so the key can be hashed and
/// ordered. `-0.0` is folded onto `0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EquivalenceKey {
    pub material: MaterialId,
    density_bits: u64,
}

impl EquivalenceKey {
    pub fn new(material: MaterialId, density: f64) -> Self {
        let density = if density == 0.0 { 0.0 } else { density };
        Self {
            material,
            density_bits: density.to_bits(),
        }
    }

    pub fn density(&self) -> f64 {
        f64::from_bits(self.density_bits)
    }
}

impl fmt::Display for EquivalenceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(material {}, density {})", self.material, self.density())
    }
}
