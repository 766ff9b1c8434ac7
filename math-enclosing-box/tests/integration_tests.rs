//! Integration tests for the minimal enclosing box

use approx::assert_relative_eq;
use math_convex_hull::{CancelFlag, ConvexHullError, Point, convex_hull, testdata};
use math_enclosing_box::{
    BoxConfig, BoxError, EnclosingBox, LuSolver, MinimalEnclosingBox, assemble_box, box_corners,
    minimal_enclosing_box, supporting_planes,
};

const TOLERANCE: f64 = 1e-9;

fn check_box(name: &str, points: &[Point], result: &EnclosingBox) {
    let mesh = result.mesh();
    println!(
        "{}: {} points → box volume {:.6}, slab thicknesses {:?}",
        name,
        points.len(),
        result.volume(),
        result.planes().iter().map(|p| p.thickness).collect::<Vec<_>>()
    );

    assert_eq!(mesh.num_faces(), 6, "{}", name);
    assert_eq!(mesh.num_vertices(), 8, "{}", name);
    assert!(mesh.faces().all(|(_, f)| f.len() == 4), "{}: faces must be quads", name);
    assert!(mesh.is_closed(), "{}: box mesh not closed", name);
    assert!(mesh.is_convex(TOLERANCE), "{}: box mesh not convex", name);
    assert_relative_eq!(mesh.signed_volume(), result.volume(), max_relative = 1e-9);

    for p in points {
        assert!(result.contains(p, TOLERANCE), "{}: point {} outside box", name, p);
    }
}

/// Smallest slab-triple volume by exhaustive enumeration
fn brute_force_volume(points: &[Point]) -> f64 {
    let hull = convex_hull(points, false).unwrap();
    let planes = supporting_planes(&hull, 1e-6, usize::MAX);
    let solver = LuSolver::default();

    let mut best = f64::INFINITY;
    for i in 0..planes.len() {
        for j in i + 1..planes.len() {
            for k in j + 1..planes.len() {
                let n = [&planes[i], &planes[j], &planes[k]];
                if n[0].normal.dot(&n[1].normal.cross(&n[2].normal)).abs() <= 1e-9 {
                    continue;
                }
                let triple = [planes[i].clone(), planes[j].clone(), planes[k].clone()];
                let Ok(corners) = box_corners(&triple, &solver) else {
                    continue;
                };
                best = best.min(assemble_box(&corners).unwrap().volume());
            }
        }
    }
    best
}

#[test]
fn test_cube_box_matches_cube() {
    let points = testdata::cube_points(3.0);
    let result = minimal_enclosing_box(&points).unwrap();

    check_box("cube", &points, &result);
    assert_relative_eq!(result.volume(), 27.0, max_relative = 1e-12);
    for corner in result.corners() {
        assert!(points.iter().any(|p| p.approx_eq(corner, 1e-9)));
    }
}

#[test]
fn test_rotated_box_volume() {
    let (w, d, h) = (4.0, 1.5, 0.75);
    let points = testdata::transform_points(
        &testdata::box_points(w, d, h),
        [0.3, -1.1, 2.2],
        Point::new(10.0, -4.0, 7.5),
    );
    let result = minimal_enclosing_box(&points).unwrap();

    check_box("rotated_box", &points, &result);
    assert_relative_eq!(result.volume(), w * d * h, max_relative = 1e-9);
}

#[test]
fn test_rotated_solid_box_with_interior_points() {
    let base = testdata::cube_with_interior_points(2.0, 500, 31);
    let points = testdata::transform_points(&base, [1.0, 0.5, -0.25], Point::new(0.0, 3.0, 0.0));
    let result = minimal_enclosing_box(&points).unwrap();

    check_box("rotated_solid_cube", &points, &result);
    assert_relative_eq!(result.volume(), 8.0, max_relative = 1e-9);
}

#[test]
fn test_random_sphere_box() {
    let points = testdata::random_sphere_points(300, 1.0, 2024);
    let result = minimal_enclosing_box(&points).unwrap();

    check_box("sphere_300", &points, &result);
    let hull = convex_hull(&points, false).unwrap();
    assert!(result.volume() >= hull.volume());
}

#[test]
fn test_box_is_minimal_over_all_triples() {
    for (name, points) in [
        ("tetrahedron", testdata::tetrahedron_points()),
        ("octahedron", testdata::octahedron_points()),
        ("sphere_30", testdata::random_sphere_points(30, 1.0, 77)),
    ] {
        let result = minimal_enclosing_box(&points).unwrap();
        check_box(name, &points, &result);
        assert!(
            result.volume() <= brute_force_volume(&points) * (1.0 + 1e-9),
            "{}: search missed a smaller triple",
            name
        );
    }
}

#[test]
fn test_filter_does_not_change_result() {
    let points = testdata::cube_with_interior_points(1.0, 300, 12);

    let mut config = BoxConfig::default();
    let filtered = MinimalEnclosingBox::new(config.clone()).compute(&points).unwrap();
    config.hull.use_akl_toussaint = false;
    let plain = MinimalEnclosingBox::new(config).compute(&points).unwrap();

    assert_relative_eq!(filtered.volume(), plain.volume(), max_relative = 1e-12);
}

#[test]
fn test_parallel_and_sequential_agree() {
    let points = testdata::random_sphere_points(150, 2.0, 5);

    let mut config = BoxConfig::default();
    config.parallel_threshold = usize::MAX;
    config.hull.parallel_threshold = usize::MAX;
    let sequential = MinimalEnclosingBox::new(config.clone()).compute(&points).unwrap();

    config.parallel_threshold = 0;
    config.hull.parallel_threshold = 0;
    let parallel = MinimalEnclosingBox::new(config).compute(&points).unwrap();

    assert_eq!(sequential.volume(), parallel.volume());
    assert_eq!(sequential.corners(), parallel.corners());
}

#[test]
fn test_compute_from_prebuilt_hull() {
    let points = testdata::icosahedron_points();
    let hull = convex_hull(&points, false).unwrap();

    let boxer = MinimalEnclosingBox::default();
    let from_hull = boxer.compute_from_hull(&hull).unwrap();
    let from_points = boxer.compute(&points).unwrap();
    assert_relative_eq!(from_hull.volume(), from_points.volume(), max_relative = 1e-12);
}

#[test]
fn test_degenerate_inputs_fail() {
    let flat: Vec<Point> = (0..12)
        .map(|i| Point::new((i % 4) as f64, (i / 4) as f64, 0.0))
        .collect();
    let err = minimal_enclosing_box(&flat).unwrap_err();
    assert!(matches!(err, BoxError::Hull(ConvexHullError::DegenerateGeometry)));
    assert!(err.is_degenerate());

    let err = minimal_enclosing_box(&flat[..2]).unwrap_err();
    assert!(matches!(
        err,
        BoxError::Hull(ConvexHullError::InsufficientPoints { found: 2 })
    ));
}

#[test]
fn test_cancelled_before_start() {
    let flag = CancelFlag::new();
    flag.cancel();

    let boxer = MinimalEnclosingBox::default().with_cancel_flag(flag);
    let err = boxer.compute(&testdata::random_sphere_points(100, 1.0, 1)).unwrap_err();
    assert!(err.is_cancelled());
    assert!(!err.is_degenerate());
}
