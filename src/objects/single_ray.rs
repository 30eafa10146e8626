#![warn(missing_docs)]
//! Light source emitting a single ray.
use nalgebra::Point2;
use uom::si::f64::Length;

use super::{IncidentResult, ObjectType, OpticalObject, SceneObject, StartResult};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    object_ref::ObjectRef,
    ray::Ray,
};

/// A source emitting exactly one ray, e.g. a laser pointer.
#[derive(Debug, Clone)]
pub struct SingleRay {
    ray: Ray,
}
impl SingleRay {
    /// Creates a new [`SingleRay`] starting at `p1` and pointing towards `p2`.
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the points are not finite or coincide.
    ///   - the brightness is not within `[0.0, 1.0]`.
    pub fn new(
        p1: Point2<f64>,
        p2: Point2<f64>,
        brightness: f64,
        wavelength: Option<Length>,
    ) -> RoResult<Self> {
        if !(0.0..=1.0).contains(&brightness) {
            return Err(RayOpticsError::Scene(
                "brightness of a single ray must be within [0.0, 1.0]".into(),
            ));
        }
        let ray = Ray::new(p1, p2)?
            .with_brightness(0.5 * brightness, 0.5 * brightness)?
            .with_wavelength(wavelength)
            .with_gap(true)
            .with_new_flag(true);
        Ok(Self { ray })
    }
}
impl SceneObject for SingleRay {
    fn object_type(&self) -> ObjectType {
        ObjectType::SingleRay
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for SingleRay {
    fn on_simulation_start(&mut self, _ctx: &mut SimulationContext) -> RoResult<StartResult> {
        Ok(StartResult {
            new_rays: vec![self.ray.clone()],
            ..StartResult::default()
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
    use crate::nanometer;
    use approx::assert_abs_diff_eq;
    #[test]
    fn new() {
        assert!(SingleRay::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), 1.1, None).is_err());
        assert!(SingleRay::new(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0), -0.1, None).is_err());
        assert!(SingleRay::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), 1.0, None).is_err());
    }
    #[test]
    fn on_simulation_start() {
        let mut ctx = SimulationContext::default();
        let mut source = SingleRay::new(
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            0.8,
            Some(nanometer!(650.0)),
        )
        .unwrap();
        let result = source.on_simulation_start(&mut ctx).unwrap();
        assert_eq!(result.new_rays.len(), 1);
        let ray = &result.new_rays[0];
        assert_abs_diff_eq!(ray.brightness_s(), 0.4);
        assert_abs_diff_eq!(ray.brightness_p(), 0.4);
        assert!(ray.is_new());
        assert!(ray.gap());
        assert_eq!(ray.wavelength(), Some(nanometer!(650.0)));
        assert_eq!(result.brightness_scale, None);
        assert!(source.check_ray_intersects(ray, &ctx).is_none());
    }
}
