#![warn(missing_docs)]
//! Glass bodies bounded by a closed path of line segments and circular arcs.
use itertools::Itertools;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

use super::{
    handle_glass_incidence, perturbed_line, GlassBody, GlassMaterial, IncidentData, IncidentType,
};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    geometry::{
        circumcenter, distance_squared, intersection_is_on_ray, intersection_is_on_segment,
        is_finite_point, line_circle_intersections, lines_intersection, Segment,
    },
    object_ref::ObjectRef,
    objects::{IncidentResult, ObjectType, OpticalObject, SceneObject},
    ray::Ray,
};

/// A vertex of the boundary path of a [`Glass`].
///
/// A point flagged as `arc` is the middle point of a circular arc through its predecessor, itself
/// and its successor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PathPoint {
    /// position of the vertex
    pub point: Point2<f64>,
    /// this vertex is the middle point of an arc
    #[serde(default)]
    pub arc: bool,
}
impl PathPoint {
    /// Creates a corner point.
    #[must_use]
    pub const fn corner(x: f64, y: f64) -> Self {
        Self {
            point: Point2::new(x, y),
            arc: false,
        }
    }
    /// Creates the middle point of an arc.
    #[must_use]
    pub const fn arc(x: f64, y: f64) -> Self {
        Self {
            point: Point2::new(x, y),
            arc: true,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    Line(Segment),
    Arc {
        start: Point2<f64>,
        end: Point2<f64>,
        mid: Point2<f64>,
        center: Point2<f64>,
        radius: f64,
    },
}
impl Edge {
    fn end_points(&self) -> (Point2<f64>, Point2<f64>) {
        match self {
            Self::Line(segment) => (segment.p1, segment.p2),
            Self::Arc { start, end, .. } => (*start, *end),
        }
    }
    /// All points of this edge hit by the half line `line` beyond the given squared distance.
    fn hits(&self, line: &Segment, threshold: f64) -> Vec<Point2<f64>> {
        let forward =
            |p: &Point2<f64>| intersection_is_on_ray(p, line) && distance_squared(&line.p1, p) > threshold;
        match self {
            Self::Line(segment) => lines_intersection(line, segment)
                .filter(|p| intersection_is_on_segment(p, segment) && forward(p))
                .into_iter()
                .collect(),
            Self::Arc {
                start,
                end,
                mid,
                center,
                radius,
            } => line_circle_intersections(line, center, *radius)
                .map(|(a, b)| vec![a, b])
                .unwrap_or_default()
                .into_iter()
                .filter(|p| point_is_on_arc(p, start, end, mid) && forward(p))
                .collect(),
        }
    }
    /// Surface normal at `point`, pointing against the direction `r`.
    fn normal_at(&self, point: &Point2<f64>, r: &Vector2<f64>) -> Vector2<f64> {
        match self {
            Self::Line(segment) => {
                let d = segment.direction();
                d * r.dot(&d) - r * d.norm_squared()
            }
            Self::Arc { center, .. } => {
                let outward = point - center;
                if outward.dot(r) > 0.0 {
                    -outward
                } else {
                    outward
                }
            }
        }
    }
    /// Returns `true` if the half line along `line` starting at `origin` crosses this edge an odd
    /// number of times.
    ///
    /// A vertex lying exactly on the line counts as lying on its left side. Adjoining edges
    /// therefore agree on every vertex and a crossing through a vertex is counted once. An arc
    /// is evaluated as its chord combined with the circular segment between arc and chord.
    fn is_crossed(&self, line: &Segment, origin: &Point2<f64>) -> bool {
        let (a, b) = self.end_points();
        let chord = Segment { p1: a, p2: b };
        let chord_crossed = is_left_of(line, &a) != is_left_of(line, &b)
            && lines_intersection(line, &chord)
                .is_some_and(|p| (p - origin).dot(&line.direction()) > 0.0);
        match self {
            Self::Line(_) => chord_crossed,
            Self::Arc {
                mid,
                center,
                radius,
                ..
            } => {
                let in_circular_segment = distance_squared(origin, center) < radius * radius
                    && is_left_of(&chord, origin) == is_left_of(&chord, mid);
                chord_crossed != in_circular_segment
            }
        }
    }
    fn is_near_end(&self, point: &Point2<f64>, threshold: f64) -> bool {
        let (start, end) = self.end_points();
        distance_squared(point, &start) < threshold || distance_squared(point, &end) < threshold
    }
}

/// Side of `point` relative to the directed line through `line`. Points on the line count as left.
fn is_left_of(line: &Segment, point: &Point2<f64>) -> bool {
    line.direction().perp(&(point - line.p1)) >= 0.0
}

/// Checks whether a point on the circle through `start`, `mid` and `end` lies on the arc between
/// `start` and `end` passing `mid`.
fn point_is_on_arc(
    point: &Point2<f64>,
    start: &Point2<f64>,
    end: &Point2<f64>,
    mid: &Point2<f64>,
) -> bool {
    let chord = Segment {
        p1: *start,
        p2: *end,
    };
    let mid_to_point = Segment {
        p1: *mid,
        p2: *point,
    };
    lines_intersection(&chord, &mid_to_point)
        .is_none_or(|p| !intersection_is_on_segment(&p, &mid_to_point))
}

fn build_edges(path: &[PathPoint]) -> Vec<Edge> {
    path.iter()
        .circular_tuple_windows::<(_, _, _)>()
        .filter_map(|(a, b, c)| match (a.arc, b.arc) {
            (false, true) => Some(
                circumcenter(&a.point, &b.point, &c.point).map_or(
                    Edge::Line(Segment {
                        p1: a.point,
                        p2: c.point,
                    }),
                    |center| Edge::Arc {
                        start: a.point,
                        end: c.point,
                        mid: b.point,
                        center,
                        radius: nalgebra::distance(&center, &c.point),
                    },
                ),
            ),
            (false, false) => Some(Edge::Line(Segment {
                p1: a.point,
                p2: b.point,
            })),
            _ => None,
        })
        .collect()
}

/// A glass body bounded by a closed path of straight lines and circular arcs.
#[derive(Debug, Clone)]
pub struct Glass {
    path: Vec<PathPoint>,
    material: GlassMaterial,
    edges: Vec<Edge>,
}
impl Glass {
    /// Creates a new [`Glass`] from its boundary path.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the path has less than three points.
    ///   - any point is not finite.
    ///   - two consecutive points are flagged as arc points.
    pub fn new(path: Vec<PathPoint>, material: GlassMaterial) -> RoResult<Self> {
        if path.len() < 3 {
            return Err(RayOpticsError::Scene(
                "glass path must contain at least three points".into(),
            ));
        }
        if path.iter().any(|p| !is_finite_point(&p.point)) {
            return Err(RayOpticsError::Scene(
                "glass path points must be finite".into(),
            ));
        }
        if path.iter().circular_tuple_windows().any(|(a, b)| a.arc && b.arc) {
            return Err(RayOpticsError::Scene(
                "glass path must not contain consecutive arc points".into(),
            ));
        }
        let edges = build_edges(&path);
        Ok(Self {
            path,
            material,
            edges,
        })
    }
    /// Creates a rectangular glass block with the given corners.
    ///
    /// # Errors
    ///
    /// This function will return an error if the corners are not finite or the block is
    /// degenerate.
    pub fn rectangle(
        corner1: Point2<f64>,
        corner2: Point2<f64>,
        material: GlassMaterial,
    ) -> RoResult<Self> {
        if corner1.x == corner2.x || corner1.y == corner2.y {
            return Err(RayOpticsError::Scene(
                "glass block must have a non-zero extent".into(),
            ));
        }
        Self::new(
            vec![
                PathPoint::corner(corner1.x, corner1.y),
                PathPoint::corner(corner2.x, corner1.y),
                PathPoint::corner(corner2.x, corner2.y),
                PathPoint::corner(corner1.x, corner2.y),
            ],
            material,
        )
    }
    /// Returns the boundary path.
    #[must_use]
    pub fn path(&self) -> &[PathPoint] {
        &self.path
    }
}
impl SceneObject for Glass {
    fn object_type(&self) -> ObjectType {
        ObjectType::Glass
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for Glass {
    fn check_ray_intersects(&self, ray: &Ray, ctx: &SimulationContext) -> Option<Point2<f64>> {
        let line = ray.line();
        let threshold = ctx.coincidence_threshold_squared();
        self.edges
            .iter()
            .flat_map(|edge| edge.hits(&line, threshold))
            .min_by(|a, b| {
                distance_squared(&line.p1, a).total_cmp(&distance_squared(&line.p1, b))
            })
    }
    fn on_ray_incident(
        &mut self,
        ray: &mut Ray,
        _ray_index: usize,
        incident_point: Point2<f64>,
        surface_merging: &[ObjectRef],
        ctx: &mut SimulationContext,
    ) -> RoResult<IncidentResult> {
        handle_glass_incidence(self, ray, incident_point, surface_merging, ctx)
    }
    fn as_glass(&self) -> Option<&dyn GlassBody> {
        Some(self)
    }
}
impl GlassBody for Glass {
    fn material(&self) -> &GlassMaterial {
        &self.material
    }
    fn incident_data(&self, ray: &Ray, ctx: &mut SimulationContext) -> IncidentData {
        let threshold = ctx.coincidence_threshold_squared();
        let line = ray.line();
        let crossing_line = perturbed_line(ray, ctx);
        // hits closer to the ray origin than the coincidence distance are ignored
        let origin = crossing_line.p1
            + crossing_line.direction().normalize() * threshold.sqrt();
        let r = line.direction();
        let mut nearest: Option<(Point2<f64>, f64)> = None;
        let mut normal = Vector2::zeros();
        let mut near_edge = false;
        let mut multiplicity = 1_usize;
        let mut crossings = 0_usize;
        for edge in &self.edges {
            for point in edge.hits(&line, threshold) {
                let d2 = distance_squared(&line.p1, &point);
                match nearest {
                    Some((q, _)) if distance_squared(&q, &point) < threshold => multiplicity += 1,
                    Some((_, nearest_d2)) if d2 >= nearest_d2 => {}
                    _ => {
                        nearest = Some((point, d2));
                        normal = edge.normal_at(&point, &r);
                        near_edge = edge.is_near_end(&point, threshold);
                        multiplicity = 1;
                    }
                }
            }
            crossings += usize::from(edge.is_crossed(&crossing_line, &origin));
        }
        let incident_type = if near_edge {
            IncidentType::Edge
        } else if multiplicity % 2 == 0 {
            IncidentType::Overlapping
        } else if crossings % 2 == 1 {
            IncidentType::InsideToOutside
        } else {
            IncidentType::OutsideToInside
        };
        IncidentData {
            point: nearest.map(|(p, _)| p),
            normal,
            incident_type,
        }
    }
}
