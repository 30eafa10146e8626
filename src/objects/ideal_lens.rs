#![warn(missing_docs)]
//! Thin ideal lens focusing parallel rays onto its focal point.
use nalgebra::{Point2, Vector2};

use super::{segment_intersection, IncidentResult, ObjectType, OpticalObject, SceneObject};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    geometry::Segment,
    object_ref::ObjectRef,
    ray::Ray,
};

/// An ideal (aberration free) thin lens.
///
/// Rays are deflected according to the paraxial lens equation regardless of their angle of
/// incidence. Hence all rays from a point in the front focal plane leave the lens parallel to each
/// other. A negative focal length denotes a diverging lens.
#[derive(Debug, Clone)]
pub struct IdealLens {
    segment: Segment,
    focal_length: f64,
}
impl IdealLens {
    /// Creates a new [`IdealLens`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the points are not finite or coincide.
    ///   - the focal length is zero or not finite.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>, focal_length: f64) -> RoResult<Self> {
        if !focal_length.is_finite() || focal_length == 0.0 {
            return Err(RayOpticsError::Scene(
                "focal length must be != 0.0 and finite".into(),
            ));
        }
        Ok(Self {
            segment: Segment::new(p1, p2)?,
            focal_length,
        })
    }
    /// Returns the focal length of this [`IdealLens`].
    #[must_use]
    pub const fn focal_length(&self) -> f64 {
        self.focal_length
    }
    /// Direction of a ray with the given (unit) direction after passing the lens at
    /// `incident_point`.
    fn deflect(&self, direction: Vector2<f64>, incident_point: &Point2<f64>) -> Option<Vector2<f64>> {
        let tangent = self.segment.direction().normalize();
        let mut axis = Vector2::new(-tangent.y, tangent.x);
        let mut d_axis = direction.dot(&axis);
        if d_axis < 0.0 {
            axis = -axis;
            d_axis = -d_axis;
        }
        if d_axis == 0.0 {
            return None;
        }
        let height = (incident_point - self.segment.midpoint()).dot(&tangent);
        let slope = direction.dot(&tangent) / d_axis - height / self.focal_length;
        Some(axis + tangent * slope)
    }
}
impl SceneObject for IdealLens {
    fn object_type(&self) -> ObjectType {
        ObjectType::IdealLens
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for IdealLens {
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
        let outgoing = ray
            .direction()
            .and_then(|d| self.deflect(d, &incident_point))
            .ok_or_else(|| {
                RayOpticsError::Simulation("ray travels along the ideal lens".into())
            })?;
        ray.set_points(incident_point, incident_point + outgoing)?;
        Ok(IncidentResult::continued())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    fn lens() -> IdealLens {
        IdealLens::new(Point2::new(10.0, -5.0), Point2::new(10.0, 5.0), 10.0).unwrap()
    }
    #[test]
    fn new() {
        assert!(IdealLens::new(Point2::new(0.0, -1.0), Point2::new(0.0, 1.0), 0.0).is_err());
        assert!(IdealLens::new(Point2::new(0.0, -1.0), Point2::new(0.0, 1.0), f64::NAN).is_err());
        assert!(IdealLens::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), 1.0).is_err());
        assert_eq!(lens().focal_length(), 10.0);
        assert!(!lens().merges_with_glass());
    }
    #[test]
    fn collimates_focal_point() {
        let mut ctx = SimulationContext::default();
        let mut lens = lens();
        for y in [-4.0, -1.0, 0.5, 3.0] {
            let mut ray = Ray::new(Point2::new(0.0, 0.0), Point2::new(10.0, y))
                .unwrap()
                .extended(1.0e4)
                .unwrap();
            let p = lens.check_ray_intersects(&ray, &ctx).unwrap();
            let result = lens.on_ray_incident(&mut ray, 0, p, &[], &mut ctx).unwrap();
            assert!(!result.is_absorbed);
            let d = ray.direction().unwrap();
            assert_abs_diff_eq!(d.y, 0.0, epsilon = 1e-12);
            assert!(d.x > 0.0);
        }
    }
    #[test]
    fn focuses_parallel_rays_backwards() {
        let mut ctx = SimulationContext::default();
        let mut lens = lens();
        let mut ray = Ray::new(Point2::new(20.0, 2.0), Point2::new(19.0, 2.0)).unwrap();
        lens.on_ray_incident(&mut ray, 0, Point2::new(10.0, 2.0), &[], &mut ctx)
            .unwrap();
        // the ray crosses the axis one focal length behind the lens
        let d = ray.direction().unwrap();
        let t = -2.0 / d.y;
        assert_abs_diff_eq!(10.0 + t * d.x, 0.0, epsilon = 1e-12);
    }
    #[test]
    fn diverging_lens() {
        let mut ctx = SimulationContext::default();
        let mut lens =
            IdealLens::new(Point2::new(10.0, -5.0), Point2::new(10.0, 5.0), -10.0).unwrap();
        let mut ray = Ray::new(Point2::new(0.0, 2.0), Point2::new(1.0, 2.0)).unwrap();
        lens.on_ray_incident(&mut ray, 0, Point2::new(10.0, 2.0), &[], &mut ctx)
            .unwrap();
        let d = ray.direction().unwrap();
        // virtual focus in front of the lens
        let t = -2.0 / d.y;
        assert_abs_diff_eq!(10.0 + t * d.x, 0.0, epsilon = 1e-12);
    }
}
