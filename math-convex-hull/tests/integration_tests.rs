//! Integration tests for convex hull construction
//!
//! Each fixture is checked against the structural properties every hull must
//! satisfy: closed, convex, outward-oriented, built from input points only and
//! containing every input point.

use approx::assert_relative_eq;
use math_convex_hull::{
    ConvexHullBuilder, ConvexHullError, HullConfig, Mesh, Point, convex_hull, orientation, testdata,
};

const TOLERANCE: f64 = 1e-9;

/// Assert the structural hull properties and return (faces, vertices)
fn check_hull(name: &str, points: &[Point], hull: &Mesh) -> (usize, usize) {
    println!(
        "{}: {} points → {} faces, {} vertices, V={:.6}, SA={:.6}",
        name,
        points.len(),
        hull.num_faces(),
        hull.num_vertices(),
        hull.volume(),
        hull.surface_area()
    );

    assert!(hull.num_vertices() >= 4, "{}: too few vertices", name);
    assert!(hull.is_closed(), "{}: every edge must be shared by two faces", name);
    assert!(hull.is_convex(TOLERANCE), "{}: hull is not convex", name);
    assert!(hull.signed_volume() > 0.0, "{}: faces must point outward", name);

    // Euler characteristic of a closed triangulated sphere
    assert_eq!(
        hull.num_vertices() + hull.num_faces(),
        hull.num_edges() + 2,
        "{}: V - E + F must be 2",
        name
    );

    // hull vertices are input points
    for v in hull.vertex_points() {
        assert!(points.contains(&v), "{}: synthesized vertex {}", name, v);
    }

    // every input point is on or inside every face
    for (_, face) in hull.faces() {
        let f = face.vertices();
        let (a, b, c) = (&hull.points()[f[0]], &hull.points()[f[1]], &hull.points()[f[2]]);
        for p in points {
            assert!(
                orientation(a, b, c, p) >= -TOLERANCE,
                "{}: point {} outside face {:?}",
                name,
                p,
                f
            );
        }
    }

    (hull.num_faces(), hull.num_vertices())
}

fn sorted_coordinates(points: Vec<Point>) -> Vec<[f64; 3]> {
    let mut coords: Vec<[f64; 3]> = points.iter().map(Point::to_array).collect();
    coords.sort_by(|a, b| a.partial_cmp(b).unwrap());
    coords
}

#[test]
fn test_regular_tetrahedron() {
    let points = testdata::tetrahedron_points();
    let hull = convex_hull(&points, false).unwrap();

    let (faces, vertices) = check_hull("tetrahedron", &points, &hull);
    assert_eq!(faces, 4);
    assert_eq!(vertices, 4);
    assert_eq!(hull.num_edges(), 6);

    // every face points away from the centroid at the origin
    for (_, face) in hull.faces() {
        let normal = face.normal(hull.points());
        let centroid = face.centroid(hull.points());
        assert!(normal.dot(&centroid) > 0.0);
    }
}

#[test]
fn test_cube() {
    let points = testdata::cube_points(2.0);
    let hull = convex_hull(&points, false).unwrap();

    let (faces, vertices) = check_hull("cube", &points, &hull);
    assert_eq!(faces, 12);
    assert_eq!(vertices, 8);
    assert_relative_eq!(hull.volume(), 8.0, epsilon = 1e-12);
    assert_relative_eq!(hull.surface_area(), 24.0, epsilon = 1e-12);
}

#[test]
fn test_octahedron() {
    let points = testdata::octahedron_points();
    let hull = convex_hull(&points, false).unwrap();

    let (faces, _) = check_hull("octahedron", &points, &hull);
    assert_eq!(faces, 8);
    assert_relative_eq!(hull.volume(), 4.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn test_icosahedron() {
    let points = testdata::icosahedron_points();
    let hull = convex_hull(&points, false).unwrap();

    let (faces, vertices) = check_hull("icosahedron", &points, &hull);
    assert_eq!(faces, 20);
    assert_eq!(vertices, 12);
}

#[test]
fn test_collinear_points_with_tetrahedron() {
    let points = testdata::collinear_with_tetrahedron();
    let hull = convex_hull(&points, false).unwrap();

    check_hull("collinear", &points, &hull);

    // the extremal points of the configuration are always vertices
    for required in [0, 4, 5, 6, 7] {
        assert!(hull.is_vertex(required), "point {} must be a hull vertex", required);
    }
    // the solid spanned is the hull of the extremal points
    let extremal: Vec<Point> = [0, 4, 5, 6, 7].iter().map(|&i| points[i]).collect();
    let reference = convex_hull(&extremal, false).unwrap();
    assert_relative_eq!(hull.volume(), reference.volume(), epsilon = 1e-12);
}

#[test]
fn test_random_sphere() {
    let points = testdata::random_sphere_points(500, 1.0, 936);
    let hull = convex_hull(&points, false).unwrap();
    let (faces, _) = check_hull("random_sphere_500", &points, &hull);
    assert!(faces >= 100);
}

#[test]
fn test_fibonacci_sphere() {
    let points = testdata::fibonacci_sphere_points(180, 1.0);
    let hull = convex_hull(&points, false).unwrap();
    let (_, vertices) = check_hull("fibonacci_180", &points, &hull);
    // every lattice point is on the sphere, hence extreme
    assert_eq!(vertices, 180);
}

#[test]
fn test_cube_with_interior_points() {
    let points = testdata::cube_with_interior_points(2.0, 200, 5);
    let hull = convex_hull(&points, false).unwrap();

    let (faces, vertices) = check_hull("cube_interior_200", &points, &hull);
    assert_eq!(vertices, 8);
    assert_eq!(faces, 12);
    assert_eq!(hull.vertices(), (0..8).collect::<Vec<_>>());
}

#[test]
fn test_akl_toussaint_gives_same_hull() {
    for (name, points) in [
        ("sphere", testdata::random_sphere_points(400, 2.0, 17)),
        ("cube_interior", testdata::cube_with_interior_points(3.0, 300, 23)),
    ] {
        let plain = convex_hull(&points, false).unwrap();
        let filtered = convex_hull(&points, true).unwrap();

        check_hull(name, &points, &filtered);
        assert_eq!(plain.vertices(), filtered.vertices(), "{}", name);
        assert_relative_eq!(plain.volume(), filtered.volume(), epsilon = 1e-12);
    }
}

#[test]
fn test_hull_of_hull_is_idempotent() {
    let points = testdata::random_sphere_points(250, 1.0, 99);
    let hull = convex_hull(&points, false).unwrap();

    let again = convex_hull(&hull.vertex_points(), false).unwrap();
    assert_eq!(again.num_vertices(), hull.num_vertices());
    assert_eq!(
        sorted_coordinates(again.vertex_points()),
        sorted_coordinates(hull.vertex_points())
    );
}

#[test]
fn test_duplicates_are_ignored() {
    let mut points = testdata::cube_points(1.0);
    points.extend(testdata::cube_points(1.0));
    points.insert(0, points[0]);

    let hull = convex_hull(&points, false).unwrap();
    check_hull("cube_duplicates", &points, &hull);
    assert_eq!(hull.num_vertices(), 8);
}

#[test]
fn test_translated_and_rotated_input() {
    let base = testdata::random_sphere_points(120, 1.0, 4);
    let moved = testdata::transform_points(&base, [0.4, 1.2, -0.8], Point::new(1e3, -2e3, 5e2));

    let a = convex_hull(&base, false).unwrap();
    let b = convex_hull(&moved, false).unwrap();
    check_hull("moved_sphere", &moved, &b);
    assert_eq!(a.vertices(), b.vertices());
}

#[test]
fn test_degenerate_inputs() {
    let flat: Vec<Point> = (0..10)
        .map(|i| Point::new(i as f64, (i * i) as f64, 0.0))
        .collect();
    let err = convex_hull(&flat, false).unwrap_err();
    assert!(matches!(err, ConvexHullError::DegenerateGeometry));
    assert!(err.is_degenerate());

    let err = convex_hull(&flat[..3], false).unwrap_err();
    assert!(matches!(err, ConvexHullError::InsufficientPoints { found: 3 }));

    // with filtering on, a flat set still reports degeneracy
    assert!(convex_hull(&flat, true).unwrap_err().is_degenerate());
}

#[test]
fn test_custom_tolerance_config() {
    let config: HullConfig =
        serde_json::from_str(r#"{"epsilon": 1e-6, "parallel_threshold": 0}"#).unwrap();
    let points = testdata::random_sphere_points(200, 1.0, 8);
    let hull = ConvexHullBuilder::new(config).build(&points).unwrap();
    check_hull("loose_tolerance", &points, &hull);
}
