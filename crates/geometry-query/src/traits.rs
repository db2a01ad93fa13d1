use oracle_types::{Point3, RegionId, SampledPoint};

use crate::types::TraceError;

/// Point-in-region queries on the declarative model.
/// Implemented by SceneModel (JSON scenes) and MockGeometry (scripted test double).
pub trait RegionResolver {
    /// The region containing `position`, or `RegionId::OUTSIDE`.
    fn resolve_region(&self, position: &Point3) -> RegionId;

    /// Number of regions the model declares.
    fn total_region_count(&self) -> usize;
}

/// Composition lookups and surface proximity on the declarative model.
pub trait CompositionNamer {
    /// The composition name assigned to a region, if the region is known.
    fn composition_name(&self, region: RegionId) -> Option<&str>;

    /// Unsigned distance from `position` to the bounding surface of `region`.
    ///
    /// Returns `f64::INFINITY` for unknown regions so that nothing is ever
    /// considered close to them.
    fn distance_to_surface(&self, position: &Point3, region: RegionId) -> f64;
}

/// A finite, ordered stream of sampled points.
pub trait PointSource {
    /// Number of points the source announces up front, if any.
    fn declared_points(&self) -> Option<u64>;

    /// Next point, or `None` once the source is exhausted.
    fn next_point(&mut self) -> Result<Option<SampledPoint>, TraceError>;
}
