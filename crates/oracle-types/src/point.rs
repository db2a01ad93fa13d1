use serde::{Deserialize, Serialize};

use crate::ids::{EquivalenceKey, MaterialId};

/// A point in 3D Euclidean space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn distance_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Point3 {
    fn from(a: [f64; 3]) -> Self {
        Self::new(a[0], a[1], a[2])
    }
}

/// One sampled position from a transport trace.
///
/// Carries the material the trace claims at that position. Read once,
/// classified once, never modified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampledPoint {
    pub position: Point3,
    pub material: MaterialId,
    pub density: f64,
    /// Rank of the point in the trace (history / event number).
    pub rank: i64,
}

impl SampledPoint {
    pub fn new(position: Point3, material: MaterialId, density: f64, rank: i64) -> Self {
        Self {
            position,
            material,
            density,
            rank,
        }
    }

    /// The key under which this point's material is matched against the model.
    pub fn equivalence_key(&self) -> EquivalenceKey {
        EquivalenceKey::new(self.material, self.density)
    }
}
