#![warn(missing_docs)]
//! Flat mirror segment.
use nalgebra::Point2;

use super::{segment_intersection, IncidentResult, ObjectType, OpticalObject, SceneObject};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    geometry::Segment,
    object_ref::ObjectRef,
    ray::Ray,
};

/// A flat, perfectly reflecting mirror segment.
#[derive(Debug, Clone)]
pub struct Mirror {
    segment: Segment,
}
impl Mirror {
    /// Creates a new [`Mirror`] between the given points.
    ///
    /// # Errors
    ///
    /// This function will return an error if the points are not finite or coincide.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> RoResult<Self> {
        Ok(Self {
            segment: Segment::new(p1, p2)?,
        })
    }
    /// Returns the geometry of this [`Mirror`].
    #[must_use]
    pub const fn segment(&self) -> &Segment {
        &self.segment
    }
}
impl SceneObject for Mirror {
    fn object_type(&self) -> ObjectType {
        ObjectType::Mirror
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for Mirror {
    fn check_ray_intersects(&self, ray: &Ray, ctx: &SimulationContext) -> Option<Point2<f64>> {
        segment_intersection(ray, &self.segment, ctx)
    }
    fn on_ray_incident(
        &mut self,
        ray: &mut Ray,
        _ray_index: usize,
        incident_point: Point2<f64>,
        _surface_merging: &[ObjectRef],
        _ctx: &mut SimulationContext,
    ) -> RoResult<IncidentResult> {
        let direction = ray.direction().ok_or_else(|| {
            RayOpticsError::Simulation("mirror hit by degenerate ray".into())
        })?;
        let tangent = self.segment.direction().normalize();
        let reflected = tangent * (2.0 * direction.dot(&tangent)) - direction;
        ray.set_points(incident_point, incident_point + reflected)?;
        Ok(IncidentResult::continued())
    }
}
