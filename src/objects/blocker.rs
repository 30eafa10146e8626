#![warn(missing_docs)]
//! Absorbing line segment.
use nalgebra::Point2;

use super::{segment_intersection, IncidentResult, ObjectType, OpticalObject, SceneObject};
use crate::{
    context::SimulationContext, error::RoResult, geometry::Segment, object_ref::ObjectRef,
    ray::Ray,
};

/// A line segment absorbing all incident rays.
///
/// Blockers may be placed flush against glass boundaries, e.g. for blackening a face of a prism.
#[derive(Debug, Clone)]
pub struct Blocker {
    segment: Segment,
}
impl Blocker {
    /// Creates a new [`Blocker`] between the given points.
    ///
    /// # Errors
    ///
    /// This function will return an error if the points are not finite or coincide.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> RoResult<Self> {
        Ok(Self {
            segment: Segment::new(p1, p2)?,
        })
    }
    /// Returns the geometry of this [`Blocker`].
    #[must_use]
    pub const fn segment(&self) -> &Segment {
        &self.segment
    }
}
impl SceneObject for Blocker {
    fn object_type(&self) -> ObjectType {
        ObjectType::Blocker
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for Blocker {
    fn check_ray_intersects(&self, ray: &Ray, ctx: &SimulationContext) -> Option<Point2<f64>> {
        segment_intersection(ray, &self.segment, ctx)
    }
    fn on_ray_incident(
        &mut self,
        _ray: &mut Ray,
        _ray_index: usize,
        _incident_point: Point2<f64>,
        _surface_merging: &[ObjectRef],
        _ctx: &mut SimulationContext,
    ) -> RoResult<IncidentResult> {
        Ok(IncidentResult::absorbed())
    }
}
