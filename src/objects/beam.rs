#![warn(missing_docs)]
//! Parallel beam emitted from a line segment.
use nalgebra::{Point2, Vector2};
use uom::si::f64::Length;

use super::{
    point_source::{check_source_brightness, ray_brightness},
    IncidentResult, ObjectType, OpticalObject, SceneObject, StartResult,
};
use crate::{
    context::SimulationContext, error::RoResult, geometry::Segment, object_ref::ObjectRef,
    ray::Ray,
};

/// A collimated beam emitted from a line segment.
///
/// The rays leave the segment perpendicularly on the left-hand side of the direction `p1 -> p2`.
#[derive(Debug, Clone)]
pub struct Beam {
    segment: Segment,
    brightness: f64,
    wavelength: Option<Length>,
}
impl Beam {
    /// Creates a new [`Beam`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the points are not finite or coincide.
    ///   - the brightness is negative or not finite.
    pub fn new(
        p1: Point2<f64>,
        p2: Point2<f64>,
        brightness: f64,
        wavelength: Option<Length>,
    ) -> RoResult<Self> {
        check_source_brightness(brightness)?;
        Ok(Self {
            segment: Segment::new(p1, p2)?,
            brightness,
            wavelength,
        })
    }
    /// Returns the propagation direction of the emitted rays.
    #[must_use]
    pub fn direction(&self) -> Vector2<f64> {
        let d = self.segment.direction().normalize();
        Vector2::new(-d.y, d.x)
    }
}
impl SceneObject for Beam {
    fn object_type(&self) -> ObjectType {
        ObjectType::Beam
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for Beam {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn on_simulation_start(&mut self, ctx: &mut SimulationContext) -> RoResult<StartResult> {
        let nr_of_rays =
            (self.segment.length() * ctx.ray_density() / ctx.length_scale()).floor() as usize;
        let (brightness, brightness_scale) = ray_brightness(self.brightness, ctx.ray_density());
        if nr_of_rays == 0 || brightness == 0.0 {
            return Ok(StartResult {
                truncation: self.brightness,
                ..StartResult::default()
            });
        }
        let step = self.segment.direction() / nr_of_rays as f64;
        let direction = self.direction();
        let mut new_rays = Vec::with_capacity(nr_of_rays);
        for i in 0..nr_of_rays {
            let origin = self.segment.p1 + step * (i as f64 + 0.5);
            let ray = Ray::from_direction(origin, direction)?
                .with_brightness(0.5 * brightness, 0.5 * brightness)?
                .with_wavelength(self.wavelength)
                .with_gap(i == 0)
                .with_new_flag(true);
            new_rays.push(ray);
        }
        Ok(StartResult {
            new_rays,
            truncation: 0.0,
            brightness_scale,
        })
    }
    fn check_ray_intersects(&self, _ray: &Ray, _ctx: &SimulationContext) -> Option<Point2<f64>> {
        None
    }
    fn on_ray_incident(
        &mut self,
        _ray: &mut Ray,
        _ray_index: usize,
        _incident_point: Point2<f64>,
        _surface_merging: &[ObjectRef],
        _ctx: &mut SimulationContext,
    ) -> RoResult<IncidentResult> {
        Ok(IncidentResult::continued())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    #[test]
    fn new() {
        assert!(Beam::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), 1.0, None).is_err());
        assert!(Beam::new(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0), -1.0, None).is_err());
        let beam = Beam::new(Point2::new(0.0, 1.0), Point2::new(0.0, -1.0), 1.0, None).unwrap();
        assert_abs_diff_eq!(beam.direction().x, 1.0);
        assert_abs_diff_eq!(beam.direction().y, 0.0);
    }
    #[test]
    fn on_simulation_start() {
        let mut ctx = SimulationContext::default();
        let mut beam =
            Beam::new(Point2::new(0.0, 50.0), Point2::new(0.0, -50.0), 0.05, None).unwrap();
        let result = beam.on_simulation_start(&mut ctx).unwrap();
        assert_eq!(result.new_rays.len(), 10);
        assert_abs_diff_eq!(result.new_rays[0].p1().y, 45.0);
        assert_abs_diff_eq!(result.new_rays[9].p1().y, -45.0);
        for ray in &result.new_rays {
            assert_abs_diff_eq!(ray.p1().x, 0.0);
            assert_abs_diff_eq!(ray.direction().unwrap().x, 1.0);
            assert_abs_diff_eq!(ray.total_brightness(), 0.5);
            assert!(ray.is_new());
        }
        assert!(result.new_rays[0].gap());
    }
    #[test]
    fn too_short_for_density() {
        let mut ctx = SimulationContext::default();
        let mut beam =
            Beam::new(Point2::new(0.0, 1.0), Point2::new(0.0, -1.0), 0.05, None).unwrap();
        let result = beam.on_simulation_start(&mut ctx).unwrap();
        assert!(result.new_rays.is_empty());
        assert_abs_diff_eq!(result.truncation, 0.05);
    }
}
