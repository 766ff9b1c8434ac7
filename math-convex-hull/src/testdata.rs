//! Test data for convex hull and enclosing box tests
//!
//! Random generators take an explicit seed so fixtures are reproducible.

use crate::types::Point;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Generate random points near a sphere (radius varies by ±10%)
pub fn random_sphere_points(n: usize, radius: f64, seed: u64) -> Vec<Point> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(n);

    for _ in 0..n {
        let azimuth = rng.random::<f64>() * 2.0 * std::f64::consts::PI;
        let elevation = (rng.random::<f64>() * 2.0 - 1.0).asin();
        let r = radius * (0.9 + 0.2 * rng.random::<f64>());

        points.push(Point::from_spherical(azimuth, elevation, r));
    }

    points
}

/// Generate uniformly distributed points on a sphere using Fibonacci lattice
pub fn fibonacci_sphere_points(n: usize, radius: f64) -> Vec<Point> {
    let mut points = Vec::with_capacity(n);
    let golden_ratio = (1.0 + 5.0_f64.sqrt()) / 2.0;

    for i in 0..n {
        let theta = 2.0 * std::f64::consts::PI * (i as f64) / golden_ratio;
        let phi = ((2 * i + 1) as f64 / n as f64 - 1.0).acos();

        let x = radius * phi.sin() * theta.cos();
        let y = radius * phi.sin() * theta.sin();
        let z = radius * phi.cos();

        points.push(Point::new(x, y, z));
    }

    points
}

/// Generate a cube's corners, centered on the origin
pub fn cube_points(size: f64) -> Vec<Point> {
    box_points(size, size, size)
}

/// Corners of an axis-aligned box centered on the origin
pub fn box_points(width: f64, depth: f64, height: f64) -> Vec<Point> {
    let (a, b, c) = (width / 2.0, depth / 2.0, height / 2.0);
    vec![
        Point::new(-a, -b, -c),
        Point::new(a, -b, -c),
        Point::new(a, b, -c),
        Point::new(-a, b, -c),
        Point::new(-a, -b, c),
        Point::new(a, -b, c),
        Point::new(a, b, c),
        Point::new(-a, b, c),
    ]
}

/// Cube corners followed by `n_interior` random points strictly inside the cube
pub fn cube_with_interior_points(size: f64, n_interior: usize, seed: u64) -> Vec<Point> {
    let mut points = cube_points(size);
    let mut rng = StdRng::seed_from_u64(seed);
    let s = 0.99 * size / 2.0;

    for _ in 0..n_interior {
        let x = (rng.random::<f64>() * 2.0 - 1.0) * s;
        let y = (rng.random::<f64>() * 2.0 - 1.0) * s;
        let z = (rng.random::<f64>() * 2.0 - 1.0) * s;
        points.push(Point::new(x, y, z));
    }

    points
}

/// Regular tetrahedron inscribed in the cube [-1, 1]³
pub fn tetrahedron_points() -> Vec<Point> {
    vec![
        Point::new(1.0, 1.0, 1.0),
        Point::new(1.0, -1.0, -1.0),
        Point::new(-1.0, 1.0, -1.0),
        Point::new(-1.0, -1.0, 1.0),
    ]
}

/// Generate points for an icosahedron
pub fn icosahedron_points() -> Vec<Point> {
    let phi = (1.0 + 5.0_f64.sqrt()) / 2.0; // Golden ratio

    vec![
        Point::new(-1.0, phi, 0.0),
        Point::new(1.0, phi, 0.0),
        Point::new(-1.0, -phi, 0.0),
        Point::new(1.0, -phi, 0.0),
        Point::new(0.0, -1.0, phi),
        Point::new(0.0, 1.0, phi),
        Point::new(0.0, -1.0, -phi),
        Point::new(0.0, 1.0, -phi),
        Point::new(phi, 0.0, -1.0),
        Point::new(phi, 0.0, 1.0),
        Point::new(-phi, 0.0, -1.0),
        Point::new(-phi, 0.0, 1.0),
    ]
}

/// Generate points for an octahedron
pub fn octahedron_points() -> Vec<Point> {
    vec![
        Point::new(1.0, 0.0, 0.0),
        Point::new(-1.0, 0.0, 0.0),
        Point::new(0.0, 1.0, 0.0),
        Point::new(0.0, -1.0, 0.0),
        Point::new(0.0, 0.0, 1.0),
        Point::new(0.0, 0.0, -1.0),
    ]
}

/// Five collinear points on the x axis followed by three points that lift
/// them into a solid
pub fn collinear_with_tetrahedron() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0, 0.0),
        Point::new(1.0, 0.0, 0.0),
        Point::new(2.0, 0.0, 0.0),
        Point::new(3.0, 0.0, 0.0),
        Point::new(4.0, 0.0, 0.0),
        Point::new(0.0, 2.0, 0.0),
        Point::new(0.0, 0.0, 2.0),
        Point::new(1.0, 1.0, 1.0),
    ]
}

/// Apply a rotation given as Euler angles (radians, z-y-x order) and a translation
pub fn transform_points(points: &[Point], angles: [f64; 3], offset: Point) -> Vec<Point> {
    let (sz, cz) = angles[0].sin_cos();
    let (sy, cy) = angles[1].sin_cos();
    let (sx, cx) = angles[2].sin_cos();

    let rows = [
        Point::new(cz * cy, cz * sy * sx - sz * cx, cz * sy * cx + sz * sx),
        Point::new(sz * cy, sz * sy * sx + cz * cx, sz * sy * cx - cz * sx),
        Point::new(-sy, cy * sx, cy * cx),
    ];

    points
        .iter()
        .map(|p| Point::new(rows[0].dot(p), rows[1].dot(p), rows[2].dot(p)).add(&offset))
        .collect()
}
