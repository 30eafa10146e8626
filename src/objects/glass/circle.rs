#![warn(missing_docs)]
//! Circular glass bodies.
use nalgebra::{Point2, Vector2};

use super::{handle_glass_incidence, GlassBody, GlassMaterial, IncidentData, IncidentType};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    geometry::{distance_squared, intersection_is_on_ray, is_finite_point, line_circle_intersections},
    object_ref::ObjectRef,
    objects::{IncidentResult, ObjectType, OpticalObject, SceneObject},
    ray::Ray,
};

/// A circular glass body.
#[derive(Debug, Clone)]
pub struct CircleGlass {
    center: Point2<f64>,
    radius: f64,
    material: GlassMaterial,
}
impl CircleGlass {
    /// Creates a new [`CircleGlass`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the center is not finite or the radius is not
    /// positive.
    pub fn new(center: Point2<f64>, radius: f64, material: GlassMaterial) -> RoResult<Self> {
        if !is_finite_point(&center) {
            return Err(RayOpticsError::Scene(
                "center of circle glass must be finite".into(),
            ));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(RayOpticsError::Scene(
                "radius of circle glass must be > 0.0 and finite".into(),
            ));
        }
        Ok(Self {
            center,
            radius,
            material,
        })
    }
    /// Returns the center of this [`CircleGlass`].
    #[must_use]
    pub const fn center(&self) -> Point2<f64> {
        self.center
    }
    /// Returns the radius of this [`CircleGlass`].
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }
    /// Forward intersections of the ray with the circle, each `None` if behind or at the ray
    /// origin.
    fn forward_hits(
        &self,
        ray: &Ray,
        threshold: f64,
    ) -> Option<(Option<Point2<f64>>, Option<Point2<f64>>)> {
        let line = ray.line();
        let (a, b) = line_circle_intersections(&line, &self.center, self.radius)?;
        let forward = |p: Point2<f64>| {
            (intersection_is_on_ray(&p, &line) && distance_squared(&line.p1, &p) > threshold)
                .then_some(p)
        };
        Some((forward(a), forward(b)))
    }
}
impl SceneObject for CircleGlass {
    fn object_type(&self) -> ObjectType {
        ObjectType::CircleGlass
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for CircleGlass {
    fn check_ray_intersects(&self, ray: &Ray, ctx: &SimulationContext) -> Option<Point2<f64>> {
        let (first, second) = self.forward_hits(ray, ctx.coincidence_threshold_squared())?;
        first.or(second)
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
impl GlassBody for CircleGlass {
    fn material(&self) -> &GlassMaterial {
        &self.material
    }
    fn incident_data(&self, ray: &Ray, ctx: &mut SimulationContext) -> IncidentData {
        let hits = self.forward_hits(ray, ctx.coincidence_threshold_squared());
        match hits {
            Some((Some(entry), Some(_))) => IncidentData {
                point: Some(entry),
                normal: entry - self.center,
                incident_type: IncidentType::OutsideToInside,
            },
            Some((None, Some(exit))) => IncidentData {
                point: Some(exit),
                normal: self.center - exit,
                incident_type: IncidentType::InsideToOutside,
            },
            _ => IncidentData {
                point: None,
                normal: Vector2::zeros(),
                incident_type: IncidentType::OutsideToInside,
            },
        }
    }
}
