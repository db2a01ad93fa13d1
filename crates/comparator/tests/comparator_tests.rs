//! Tests for point classification and the comparison loop.

use comparator::{compare, Comparator, ComparatorError, ComparisonConfig, Outcome};
use geometry_query::{MemoryTrace, MockGeometry, SceneModel};
use oracle_types::{EquivalenceKey, MaterialId, Point3, RegionId, SampledPoint};

fn pt(x: f64, material: i64, density: f64, rank: i64) -> SampledPoint {
    SampledPoint::new(Point3::new(x, 0.0, 0.0), MaterialId(material), density, rank)
}

/// Regions: 7 = UO2, 8 = Water, 9 = Water (a second water region).
fn pin_geometry() -> MockGeometry {
    MockGeometry::new()
        .with_region(7, "UO2")
        .with_region(8, "Water")
        .with_region(9, "Water")
        .place(Point3::new(1.0, 0.0, 0.0), 7, 0.5)
        .place(Point3::new(2.0, 0.0, 0.0), 7, 0.3)
        .place(Point3::new(3.0, 0.0, 0.0), 8, 0.2)
        .place(Point3::new(4.0, 0.0, 0.0), 9, 0.4)
        .place(Point3::new(5.0, 0.0, 0.0), 8, 1e-9)
        .place(Point3::new(6.0, 0.0, 0.0), 8, 1e-7)
}

// ── Classification ──────────────────────────────────────────────────────

#[test]
fn learned_equivalence_scenario() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::with_delta(1e-7));

    // First observation of (M1, 2.5) binds it to UO2.
    assert_eq!(c.classify(&pt(1.0, 1, 2.5, 1)).unwrap(), Outcome::Success);
    let key = EquivalenceKey::new(MaterialId(1), 2.5);
    assert_eq!(c.equivalences().get(&key), Some("UO2"));

    // Same key, same composition.
    assert_eq!(c.classify(&pt(2.0, 1, 2.5, 2)).unwrap(), Outcome::Success);

    // Same key, different composition, far from the surface.
    assert_eq!(c.classify(&pt(3.0, 1, 2.5, 3)).unwrap(), Outcome::Failed);

    // New key binds to Water.
    assert_eq!(c.classify(&pt(3.0, 2, 1.0, 4)).unwrap(), Outcome::Success);
    assert_eq!(
        c.equivalences().get(&EquivalenceKey::new(MaterialId(2), 1.0)),
        Some("Water")
    );

    let stats = c.statistics();
    assert_eq!(stats.success(), 3);
    assert_eq!(stats.failure(), 1);
    assert_eq!(stats.ignored(), 0);
    assert_eq!(stats.outside(), 0);
    assert_eq!(stats.failures().len(), 1);

    let failed = &stats.failures()[0];
    assert_eq!(failed.point_rank, 3);
    assert_eq!(failed.region, RegionId(8));
    assert_eq!(failed.material, MaterialId(1));
    assert_eq!(failed.distance, 0.2);
    assert_eq!(failed.sequence_rank, 2);
}

#[test]
fn first_binding_is_never_replaced() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::default());
    c.classify(&pt(1.0, 1, 2.5, 1)).unwrap();
    c.classify(&pt(3.0, 1, 2.5, 2)).unwrap();
    c.classify(&pt(4.0, 1, 2.5, 3)).unwrap();
    let key = EquivalenceKey::new(MaterialId(1), 2.5);
    assert_eq!(c.equivalences().get(&key), Some("UO2"));
    assert_eq!(c.statistics().failure(), 2);
}

#[test]
fn different_regions_with_same_composition_match() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::default());
    assert_eq!(c.classify(&pt(3.0, 2, 1.0, 1)).unwrap(), Outcome::Success);
    assert_eq!(c.classify(&pt(4.0, 2, 1.0, 2)).unwrap(), Outcome::Success);
}

#[test]
fn mismatch_near_surface_is_ignored() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::with_delta(1e-7));
    c.classify(&pt(1.0, 1, 2.5, 1)).unwrap();
    assert_eq!(c.classify(&pt(5.0, 1, 2.5, 2)).unwrap(), Outcome::Ignored);
    assert_eq!(c.statistics().ignored(), 1);
    assert!(c.statistics().failures().is_empty());
}

#[test]
fn distance_exactly_delta_fails() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::with_delta(1e-7));
    c.classify(&pt(1.0, 1, 2.5, 1)).unwrap();
    assert_eq!(c.classify(&pt(6.0, 1, 2.5, 2)).unwrap(), Outcome::Failed);
}

#[test]
fn larger_delta_turns_failures_into_ignored() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::with_delta(0.25));
    c.classify(&pt(1.0, 1, 2.5, 1)).unwrap();
    assert_eq!(c.classify(&pt(3.0, 1, 2.5, 2)).unwrap(), Outcome::Ignored);
    assert_eq!(c.classify(&pt(4.0, 1, 2.5, 3)).unwrap(), Outcome::Failed);
}

#[test]
fn covered_regions_recorded_for_every_outcome() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::default());
    c.classify(&pt(1.0, 1, 2.5, 1)).unwrap();
    c.classify(&pt(2.0, 1, 2.5, 2)).unwrap();
    c.classify(&pt(3.0, 1, 2.5, 3)).unwrap();
    c.classify(&pt(5.0, 1, 2.5, 4)).unwrap();
    let covered: Vec<_> = c.statistics().covered_regions().iter().copied().collect();
    assert_eq!(covered, vec![RegionId(7), RegionId(8)]);
    assert_eq!(c.statistics().total_region_count(), 3);
}

// ── Structural errors ───────────────────────────────────────────────────

#[test]
fn outside_point_aborts_by_default() {
    let geom = pin_geometry();
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::default());
    c.classify(&pt(1.0, 1, 2.5, 1)).unwrap();
    let err = c.classify(&pt(99.0, 1, 2.5, 42)).unwrap_err();
    match err {
        ComparatorError::OutsideGeometry { rank, position } => {
            assert_eq!(rank, 42);
            assert_eq!(position, Point3::new(99.0, 0.0, 0.0));
        }
        other => panic!("expected outside error, got {}", other),
    }
    assert_eq!(c.statistics().total_sampled(), 1);
    assert_eq!(c.statistics().outside(), 0);
}

#[test]
fn outside_point_tallied_when_requested() {
    let geom = pin_geometry();
    let config = ComparisonConfig::default().tally_outside();
    let mut c = Comparator::new(&geom, &geom, config);
    assert_eq!(c.classify(&pt(99.0, 1, 2.5, 1)).unwrap(), Outcome::Outside);
    assert_eq!(c.statistics().outside(), 1);
    assert!(c.statistics().covered_regions().is_empty());
    assert!(c.equivalences().is_empty());
}

#[test]
fn unnamed_region_is_an_error() {
    let geom = MockGeometry::new().place(Point3::ORIGIN, 3, 1.0);
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::default());
    let point = SampledPoint::new(Point3::ORIGIN, MaterialId(1), 1.0, 1);
    assert!(matches!(
        c.classify(&point),
        Err(ComparatorError::UnnamedRegion { region }) if region == RegionId(3)
    ));
}

#[test]
fn run_stops_at_outside_point() {
    let geom = pin_geometry();
    let mut source = MemoryTrace::new(vec![
        pt(1.0, 1, 2.5, 1),
        pt(99.0, 1, 2.5, 2),
        pt(2.0, 1, 2.5, 3),
    ]);
    let result = compare(&geom, &geom, &mut source, ComparisonConfig::default());
    assert!(matches!(
        result,
        Err(ComparatorError::OutsideGeometry { rank: 2, .. })
    ));
}

// ── Run loop ────────────────────────────────────────────────────────────

#[test]
fn run_consumes_whole_source_without_budget() {
    let geom = pin_geometry();
    let mut source = MemoryTrace::new(vec![
        pt(1.0, 1, 2.5, 1),
        pt(2.0, 1, 2.5, 2),
        pt(3.0, 1, 2.5, 3),
        pt(3.0, 2, 1.0, 4),
    ]);
    let run = compare(&geom, &geom, &mut source, ComparisonConfig::default()).unwrap();
    assert_eq!(run.statistics.total_sampled(), 4);
    assert_eq!(run.equivalences.len(), 2);
}

#[test]
fn run_honours_point_budget() {
    let geom = pin_geometry();
    let points = vec![
        pt(1.0, 1, 2.5, 1),
        pt(2.0, 1, 2.5, 2),
        pt(3.0, 1, 2.5, 3),
        pt(3.0, 2, 1.0, 4),
    ];
    let mut source = MemoryTrace::new(points);
    let mut c = Comparator::new(&geom, &geom, ComparisonConfig::default().with_budget(2));
    assert_eq!(c.run(&mut source).unwrap(), 2);
    assert_eq!(c.statistics().total_sampled(), 2);
    assert_eq!(c.statistics().failure(), 0);
}

#[test]
fn run_on_empty_source() {
    let geom = pin_geometry();
    let mut source = MemoryTrace::new(Vec::new());
    let run = compare(&geom, &geom, &mut source, ComparisonConfig::default()).unwrap();
    assert_eq!(run.statistics.total_sampled(), 0);
    assert!(run.equivalences.is_empty());
}

#[test]
fn run_against_scene_model() {
    let scene = SceneModel::from_json(
        r#"{ "regions": [
            { "id": 1, "composition": "UO2",
              "shape": { "kind": "sphere", "center": [0, 0, 0], "radius": 1.0 } },
            { "id": 2, "composition": "Water",
              "shape": { "kind": "box", "min": [-2, -2, -2], "max": [2, 2, 2] } }
        ] }"#,
    )
    .unwrap();

    let mut source = MemoryTrace::new(vec![
        pt(0.0, 10, 10.4, 1),
        pt(1.5, 20, 1.0, 2),
        pt(0.5, 10, 10.4, 3),
        // Fuel material seen in water, 0.5 from the box surface.
        pt(1.5, 10, 10.4, 4),
        // Just outside the fuel sphere: water, about 1.0 from the box surface.
        pt(1.0 + 1e-9, 10, 10.4, 5),
    ]);
    let run = compare(&scene, &scene, &mut source, ComparisonConfig::with_delta(1e-6)).unwrap();
    let stats = &run.statistics;
    assert_eq!(stats.success(), 3);
    assert_eq!(stats.failure(), 2);
    assert_eq!(stats.covered_regions().len(), 2);
    assert_eq!(stats.total_region_count(), 2);
    // Distance is measured to the surface of the region the point resolved to.
    assert!((stats.failures()[0].distance - 0.5).abs() < 1e-12);
}
