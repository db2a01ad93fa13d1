//! Declarative scene model loaded from JSON.
//!
//! A scene is an ordered list of regions, each a primitive shape with a
//! composition name. A position belongs to the first region (in declaration
//! order) whose shape contains it, boundary included.

use std::collections::HashMap;
use std::path::Path;

use oracle_types::{Point3, RegionId};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::traits::{CompositionNamer, RegionResolver};
use crate::types::GeometryError;

/// A primitive region shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    /// Axis-aligned box.
    Box { min: [f64; 3], max: [f64; 3] },
    Sphere { center: [f64; 3], radius: f64 },
}

impl Shape {
    pub fn contains(&self, p: &Point3) -> bool {
        match self {
            Shape::Box { min, max } => {
                let c = p.to_array();
                (0..3).all(|i| min[i] <= c[i] && c[i] <= max[i])
            }
            Shape::Sphere { center, radius } => {
                p.distance_to(&Point3::from(*center)) <= *radius
            }
        }
    }

    /// Unsigned distance from `p` to the boundary of the shape, from either side.
    pub fn distance_to_boundary(&self, p: &Point3) -> f64 {
        match self {
            Shape::Box { min, max } => {
                let c = p.to_array();
                if self.contains(p) {
                    (0..3)
                        .map(|i| (c[i] - min[i]).min(max[i] - c[i]))
                        .fold(f64::INFINITY, f64::min)
                } else {
                    let sq: f64 = (0..3)
                        .map(|i| {
                            let d = (min[i] - c[i]).max(c[i] - max[i]).max(0.0);
                            d * d
                        })
                        .sum();
                    sq.sqrt()
                }
            }
            Shape::Sphere { center, radius } => {
                (p.distance_to(&Point3::from(*center)) - radius).abs()
            }
        }
    }

    fn check(&self) -> Result<(), String> {
        match self {
            Shape::Box { min, max } => {
                if (0..3).any(|i| !(min[i] < max[i])) {
                    return Err(format!("box min {:?} is not below max {:?}", min, max));
                }
            }
            Shape::Sphere { radius, .. } => {
                if !(*radius > 0.0) {
                    return Err(format!("sphere radius {} is not positive", radius));
                }
            }
        }
        Ok(())
    }
}

/// One region of the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub id: RegionId,
    pub composition: String,
    pub shape: Shape,
}

#[derive(Debug, Deserialize)]
struct SceneFile {
    regions: Vec<Region>,
}

/// A validated scene, queryable through RegionResolver and CompositionNamer.
#[derive(Debug, Clone)]
pub struct SceneModel {
    regions: Vec<Region>,
    by_id: HashMap<RegionId, usize>,
}

impl SceneModel {
    /// Build a scene from regions in priority order.
    ///
    /// Rejects negative or duplicate ids and degenerate shapes.
    pub fn from_regions(regions: Vec<Region>) -> Result<Self, GeometryError> {
        let mut by_id = HashMap::with_capacity(regions.len());
        for (idx, region) in regions.iter().enumerate() {
            if region.id.is_outside() {
                return Err(GeometryError::NegativeRegion { region: region.id });
            }
            region
                .shape
                .check()
                .map_err(|reason| GeometryError::DegenerateShape {
                    region: region.id,
                    reason,
                })?;
            if by_id.insert(region.id, idx).is_some() {
                return Err(GeometryError::DuplicateRegion { region: region.id });
            }
        }
        Ok(Self { regions, by_id })
    }

    /// Parse a scene from its JSON text.
    pub fn from_json(json: &str) -> Result<Self, GeometryError> {
        let raw: SceneFile = serde_json::from_str(json)?;
        Self::from_regions(raw.regions)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.by_id.get(&id).map(|&idx| &self.regions[idx])
    }
}

/// Read and validate a scene file.
#[instrument]
pub fn load_scene(path: &Path) -> Result<SceneModel, GeometryError> {
    let json = std::fs::read_to_string(path).map_err(|source| GeometryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let scene = SceneModel::from_json(&json)?;
    info!(regions = scene.regions.len(), "scene loaded");
    Ok(scene)
}

impl RegionResolver for SceneModel {
    fn resolve_region(&self, position: &Point3) -> RegionId {
        self.regions
            .iter()
            .find(|r| r.shape.contains(position))
            .map(|r| r.id)
            .unwrap_or(RegionId::OUTSIDE)
    }

    fn total_region_count(&self) -> usize {
        self.regions.len()
    }
}

impl CompositionNamer for SceneModel {
    fn composition_name(&self, region: RegionId) -> Option<&str> {
        self.region(region).map(|r| r.composition.as_str())
    }

    fn distance_to_surface(&self, position: &Point3, region: RegionId) -> f64 {
        self.region(region)
            .map(|r| r.shape.distance_to_boundary(position))
            .unwrap_or(f64::INFINITY)
    }
}
