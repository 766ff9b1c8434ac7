//! Geometric predicates and tolerances

use crate::types::Point;

/// Signed orientation of point `p` against the oriented triangle `(v1, v2, v3)`.
///
/// Returns six times the signed volume of the tetrahedron `(p, v1, v2, v3)`.
/// Negative means `p` lies on the outward side of the triangle (right-hand
/// rule), zero means coplanar, positive means `p` is behind the triangle.
#[inline]
pub fn orientation(v1: &Point, v2: &Point, v3: &Point, p: &Point) -> f64 {
    let a = v1.sub(p);
    let b = v2.sub(p);
    let c = v3.sub(p);

    a.x * (b.y * c.z - b.z * c.y) + a.y * (b.z * c.x - b.x * c.z) + a.z * (b.x * c.y - b.y * c.x)
}

/// Position of a point relative to an oriented face plane
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Strictly on the outward side: the face is visible from the point
    Outside,
    /// Within tolerance of the plane
    Coplanar,
    /// Strictly behind the face
    Inside,
}

impl Side {
    /// Classify an orientation value against a volume tolerance.
    ///
    /// Values inside `[-tolerance, tolerance]`, including an exact zero, are
    /// coplanar and therefore never visible.
    #[inline]
    pub fn from_orientation(value: f64, tolerance: f64) -> Self {
        if value < -tolerance {
            Side::Outside
        } else if value > tolerance {
            Side::Inside
        } else {
            Side::Coplanar
        }
    }
}

/// Classify `p` against the oriented triangle `(v1, v2, v3)`
#[inline]
pub fn classify(v1: &Point, v2: &Point, v3: &Point, p: &Point, tolerance: f64) -> Side {
    Side::from_orientation(orientation(v1, v2, v3, p), tolerance)
}

/// Scale-aware tolerances derived from one relative epsilon.
///
/// Lengths, areas and volumes are compared against `epsilon` times the
/// first, second and third power of the largest bounding-box extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub length: f64,
    pub area: f64,
    pub volume: f64,
}

impl Tolerance {
    pub fn new(epsilon: f64, scale: f64) -> Self {
        let scale = if scale > 0.0 && scale.is_finite() {
            scale
        } else {
            1.0
        };
        Self {
            length: epsilon * scale,
            area: epsilon * scale * scale,
            volume: epsilon * scale * scale * scale,
        }
    }

    /// Tolerances relative to the extent of a point set
    pub fn for_points(points: &[Point], epsilon: f64) -> Self {
        Self::new(epsilon, bounding_extent(points))
    }
}

/// Largest axis extent of the bounding box of a point set
pub fn bounding_extent(points: &[Point]) -> f64 {
    let Some(first) = points.first() else {
        return 0.0;
    };
    let (mut min, mut max) = (*first, *first);
    for p in points {
        min = Point::new(min.x.min(p.x), min.y.min(p.y), min.z.min(p.z));
        max = Point::new(max.x.max(p.x), max.y.max(p.y), max.z.max(p.z));
    }
    let extent = max.sub(&min);
    extent.x.max(extent.y).max(extent.z)
}

/// Compute the volume of a tetrahedron formed by 4 points
pub fn tetrahedron_volume(p0: &Point, p1: &Point, p2: &Point, p3: &Point) -> f64 {
    orientation(p1, p2, p3, p0).abs() / 6.0
}

/// True when `c` lies on the line through `a` and `b`, within an area tolerance
pub fn are_collinear(a: &Point, b: &Point, c: &Point, area_tolerance: f64) -> bool {
    b.sub(a).cross(&c.sub(a)).norm() <= area_tolerance
}

/// Check if 4 points are coplanar, within a volume tolerance
pub fn are_coplanar(p0: &Point, p1: &Point, p2: &Point, p3: &Point, volume_tolerance: f64) -> bool {
    orientation(p0, p1, p2, p3).abs() <= volume_tolerance
}

/// Indices of the extreme points among `candidates`: min/max x, y, z in that order.
///
/// Ties keep the earliest candidate.
pub fn find_extreme_points(points: &[Point], candidates: &[usize]) -> Option<[usize; 6]> {
    let &first = candidates.first()?;
    let mut extremes = [first; 6];

    for &i in candidates {
        let p = &points[i];
        if p.x < points[extremes[0]].x {
            extremes[0] = i;
        }
        if p.x > points[extremes[1]].x {
            extremes[1] = i;
        }
        if p.y < points[extremes[2]].y {
            extremes[2] = i;
        }
        if p.y > points[extremes[3]].y {
            extremes[3] = i;
        }
        if p.z < points[extremes[4]].z {
            extremes[4] = i;
        }
        if p.z > points[extremes[5]].z {
            extremes[5] = i;
        }
    }

    Some(extremes)
}
