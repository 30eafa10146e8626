#![warn(missing_docs)]
//! Planar geometry primitives used by the optical objects and the engine.
//!
//! All functions are pure. Degenerate queries (parallel lines, collinear points, a line missing a
//! circle) return `None` instead of producing non-finite coordinates.
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use crate::error::{RayOpticsError, RoResult};

/// Tolerance of [`intersection_is_on_segment`] in squared scene units.
const ON_SEGMENT_TOLERANCE: f64 = 1e-5;

/// A straight line segment (or, depending on context, the infinite line through both points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// first point
    pub p1: Point2<f64>,
    /// second point
    pub p2: Point2<f64>,
}
impl Segment {
    /// Creates a new [`Segment`].
    ///
    /// # Errors
    ///
    /// This function will return an error if any coordinate is not finite or both points coincide.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> RoResult<Self> {
        if !is_finite_point(&p1) || !is_finite_point(&p2) {
            return Err(RayOpticsError::Geometry(
                "segment end points must be finite".into(),
            ));
        }
        if p1 == p2 {
            return Err(RayOpticsError::Geometry(
                "segment end points must not coincide".into(),
            ));
        }
        Ok(Self { p1, p2 })
    }
    /// Returns the length of this [`Segment`].
    #[must_use]
    pub fn length(&self) -> f64 {
        nalgebra::distance(&self.p1, &self.p2)
    }
    /// Returns the midpoint of this [`Segment`].
    #[must_use]
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.p1, &self.p2)
    }
    /// Returns the (non-normalized) direction vector `p2 - p1`.
    #[must_use]
    pub fn direction(&self) -> Vector2<f64> {
        self.p2 - self.p1
    }
}

/// Returns `true` if both coordinates of the given point are finite.
#[must_use]
pub fn is_finite_point(p: &Point2<f64>) -> bool {
    p.x.is_finite() && p.y.is_finite()
}

/// Squared euclidean distance of two points.
#[must_use]
pub fn distance_squared(a: &Point2<f64>, b: &Point2<f64>) -> f64 {
    nalgebra::distance_squared(a, b)
}

/// Intersection point of the two infinite lines through `l1` and `l2`.
///
/// Returns `None` for parallel or degenerate lines.
#[must_use]
pub fn lines_intersection(l1: &Segment, l2: &Segment) -> Option<Point2<f64>> {
    let d1 = l1.direction();
    let d2 = l2.direction();
    let denominator = d1.perp(&d2);
    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }
    let t = (l2.p1 - l1.p1).perp(&d2) / denominator;
    let p = l1.p1 + d1 * t;
    is_finite_point(&p).then_some(p)
}

/// Checks whether an intersection point (known to lie on the line through `segment`) is within
/// the bounds of the segment.
#[must_use]
pub fn intersection_is_on_segment(p: &Point2<f64>, segment: &Segment) -> bool {
    (p.x - segment.p1.x) * (p.x - segment.p2.x) < ON_SEGMENT_TOLERANCE
        && (p.y - segment.p1.y) * (p.y - segment.p2.y) < ON_SEGMENT_TOLERANCE
}

/// Checks whether an intersection point (known to lie on the line through `ray`) is in forward
/// direction of the half line starting at `ray.p1` and passing through `ray.p2`.
#[must_use]
pub fn intersection_is_on_ray(p: &Point2<f64>, ray: &Segment) -> bool {
    (p - ray.p1).dot(&ray.direction()) >= 0.0
}

/// Intersection points of the infinite line through `line` with a circle.
///
/// The points are ordered along the direction of `line`. Returns `None` if the line misses the
/// circle or is degenerate.
#[must_use]
pub fn line_circle_intersections(
    line: &Segment,
    center: &Point2<f64>,
    radius: f64,
) -> Option<(Point2<f64>, Point2<f64>)> {
    let d = line.direction();
    let a = d.norm_squared();
    if a == 0.0 {
        return None;
    }
    let f = line.p1 - center;
    let b = f.dot(&d);
    let c = radius.mul_add(-radius, f.norm_squared());
    let discriminant = b.mul_add(b, -a * c);
    if discriminant < 0.0 || !discriminant.is_finite() {
        return None;
    }
    let sqrt_disc = discriminant.sqrt();
    let t1 = (-b - sqrt_disc) / a;
    let t2 = (-b + sqrt_disc) / a;
    Some((line.p1 + d * t1, line.p1 + d * t2))
}

/// The perpendicular bisector of a segment, returned as a line through its midpoint.
#[must_use]
pub fn perpendicular_bisector(segment: &Segment) -> Segment {
    let mid = segment.midpoint();
    let d = segment.direction();
    Segment {
        p1: mid,
        p2: mid + Vector2::new(-d.y, d.x),
    }
}

/// Center of the circle passing through three points.
///
/// Returns `None` if the points are collinear.
#[must_use]
pub fn circumcenter(a: &Point2<f64>, b: &Point2<f64>, c: &Point2<f64>) -> Option<Point2<f64>> {
    lines_intersection(
        &perpendicular_bisector(&Segment { p1: *a, p2: *b }),
        &perpendicular_bisector(&Segment { p1: *c, p2: *b }),
    )
}
