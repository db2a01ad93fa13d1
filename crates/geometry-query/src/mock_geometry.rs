//! MockGeometry: deterministic test double implementing RegionResolver + CompositionNamer.
//!
//! Positions are scripted one by one: each placement pins an exact position
//! to a region and a distance to that region's surface. Anything not placed
//! resolves to `RegionId::OUTSIDE`.

use std::collections::BTreeMap;

use oracle_types::{Point3, RegionId};

use crate::traits::{CompositionNamer, RegionResolver};

/// A scripted position with its answers.
#[derive(Debug, Clone)]
struct Placement {
    position: Point3,
    region: RegionId,
    distance: f64,
}

/// Deterministic test double for the declarative model.
#[derive(Debug, Clone, Default)]
pub struct MockGeometry {
    names: BTreeMap<RegionId, String>,
    placements: Vec<Placement>,
}

impl MockGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a region and its composition name.
    pub fn with_region(mut self, region: i64, composition: &str) -> Self {
        self.names.insert(RegionId(region), composition.to_string());
        self
    }

    /// Pin `position` to `region`, `distance` away from the region's surface.
    ///
    /// The region does not have to be declared; an undeclared region
    /// resolves but has no composition name.
    pub fn place(mut self, position: Point3, region: i64, distance: f64) -> Self {
        self.placements.push(Placement {
            position,
            region: RegionId(region),
            distance,
        });
        self
    }

    fn find(&self, position: &Point3) -> Option<&Placement> {
        self.placements.iter().find(|p| p.position == *position)
    }
}

impl RegionResolver for MockGeometry {
    fn resolve_region(&self, position: &Point3) -> RegionId {
        self.find(position)
            .map(|p| p.region)
            .unwrap_or(RegionId::OUTSIDE)
    }

    fn total_region_count(&self) -> usize {
        self.names.len()
    }
}

impl CompositionNamer for MockGeometry {
    fn composition_name(&self, region: RegionId) -> Option<&str> {
        self.names.get(&region).map(String::as_str)
    }

    fn distance_to_surface(&self, position: &Point3, region: RegionId) -> f64 {
        match self.find(position) {
            Some(p) if p.region == region => p.distance,
            _ => f64::INFINITY,
        }
    }
}
