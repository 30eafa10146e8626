#![warn(missing_docs)]
//! Line detector measuring power, force and irradiance of the light crossing it.
use kahan::KahanSum;
use nalgebra::Point2;

use super::{
    glass::refract, segment_intersection, IncidentResult, ObjectType, OpticalObject, SceneObject,
    StartResult,
};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    geometry::Segment,
    object_ref::ObjectRef,
    ray::Ray,
};

/// A line detector measuring the power and the force of the light crossing it.
///
/// Rays pass the detector unchanged unless it sits flush on a glass surface. In that case the
/// ray is refracted at the merged glass surfaces after being measured. All values are signed: light crossing the detector from its
/// left-hand side (looking from `p1` to `p2`) counts positive. Optionally, the detector records
/// an irradiance map with a fixed number of bins along the segment.
#[derive(Debug, Clone)]
pub struct Detector {
    segment: Segment,
    bin_count: Option<usize>,
    power: KahanSum<f64>,
    normal_force: KahanSum<f64>,
    shear_force: KahanSum<f64>,
    bin_power: Vec<f64>,
    irradiance: Vec<f64>,
}
impl Detector {
    /// Creates a new [`Detector`].
    ///
    /// # Errors
    ///
    /// This function will return an error if
    ///   - the points are not finite or coincide.
    ///   - the bin count is zero.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>, bin_count: Option<usize>) -> RoResult<Self> {
        if bin_count == Some(0) {
            return Err(RayOpticsError::Scene(
                "bin count of detector must be >= 1".into(),
            ));
        }
        Ok(Self {
            segment: Segment::new(p1, p2)?,
            bin_count,
            power: KahanSum::new_with_value(0.0),
            normal_force: KahanSum::new_with_value(0.0),
            shear_force: KahanSum::new_with_value(0.0),
            bin_power: Vec::new(),
            irradiance: Vec::new(),
        })
    }
    /// Returns the total power measured during the last run.
    #[must_use]
    pub fn power(&self) -> f64 {
        self.power.sum()
    }
    /// Returns the force normal to the detector measured during the last run.
    #[must_use]
    pub fn normal_force(&self) -> f64 {
        self.normal_force.sum()
    }
    /// Returns the force along the detector measured during the last run.
    #[must_use]
    pub fn shear_force(&self) -> f64 {
        self.shear_force.sum()
    }
    /// Returns the irradiance map (power per length for each bin) of the last run.
    ///
    /// The map is empty if the detector has no bins.
    #[must_use]
    pub fn irradiance(&self) -> &[f64] {
        &self.irradiance
    }
    #[allow(clippy::cast_precision_loss)]
    fn bin_size(&self, bin_count: usize) -> f64 {
        self.segment.length() / bin_count as f64
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn bin_index(&self, incident_point: &Point2<f64>, bin_count: usize) -> usize {
        let position = nalgebra::distance(&self.segment.p1, incident_point);
        let index = (position / self.bin_size(bin_count)).floor() as usize;
        index.min(bin_count - 1)
    }
}
impl SceneObject for Detector {
    fn object_type(&self) -> ObjectType {
        ObjectType::Detector
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for Detector {
    fn on_simulation_start(&mut self, _ctx: &mut SimulationContext) -> RoResult<StartResult> {
        self.power = KahanSum::new_with_value(0.0);
        self.normal_force = KahanSum::new_with_value(0.0);
        self.shear_force = KahanSum::new_with_value(0.0);
        self.bin_power = vec![0.0; self.bin_count.unwrap_or_default()];
        self.irradiance.clear();
        Ok(StartResult::default())
    }
    fn check_ray_intersects(&self, ray: &Ray, ctx: &SimulationContext) -> Option<Point2<f64>> {
        segment_intersection(ray, &self.segment, ctx)
    }
    fn on_ray_incident(
        &mut self,
        ray: &mut Ray,
        _ray_index: usize,
        incident_point: Point2<f64>,
        surface_merging: &[ObjectRef],
        ctx: &mut SimulationContext,
    ) -> RoResult<IncidentResult> {
        let r = ray.p2() - ray.p1();
        let s = self.segment.direction();
        let r_cross_s = r.perp(&s);
        let sign = if r_cross_s > 0.0 {
            1.0
        } else if r_cross_s < 0.0 {
            -1.0
        } else {
            0.0
        };
        let lengths = r.norm() * s.norm();
        let sin_t = r_cross_s / lengths;
        let cos_t = r.dot(&s) / lengths;
        let brightness = ray.total_brightness();
        self.power += sign * brightness;
        self.normal_force += sign * sin_t * brightness;
        self.shear_force += -sign * cos_t * brightness;
        if let Some(bin_count) = self.bin_count {
            let index = self.bin_index(&incident_point, bin_count);
            if let Some(bin) = self.bin_power.get_mut(index) {
                *bin += sign * brightness;
            }
        }
        if !surface_merging.is_empty() {
            let normal = s * r.dot(&s) - r * s.norm_squared();
            return refract(ray, incident_point, normal, 1.0, surface_merging, ctx);
        }
        ray.set_points(incident_point, incident_point + r)?;
        Ok(IncidentResult::continued())
    }
    fn on_simulation_end(&mut self) {
        if let Some(bin_count) = self.bin_count {
            let bin_size = self.bin_size(bin_count);
            self.irradiance = self.bin_power.iter().map(|p| p / bin_size).collect();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        objects::{CircleGlass, GlassMaterial},
        ray::BodyMerging,
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::{cell::RefCell, rc::Rc};
    fn detector(bins: Option<usize>) -> Detector {
        Detector::new(Point2::new(5.0, -2.0), Point2::new(5.0, 2.0), bins).unwrap()
    }
    fn hit(detector: &mut Detector, y: f64, brightness: f64) -> Ray {
        let mut ctx = SimulationContext::default();
        let mut ray = Ray::new(Point2::new(0.0, y), Point2::new(1.0e4, y))
            .unwrap()
            .with_brightness(0.5 * brightness, 0.5 * brightness)
            .unwrap();
        let p = detector.check_ray_intersects(&ray, &ctx).unwrap();
        let result = detector
            .on_ray_incident(&mut ray, 0, p, &[], &mut ctx)
            .unwrap();
        assert!(!result.is_absorbed);
        ray
    }
    #[test]
    fn new() {
        assert!(Detector::new(Point2::new(0.0, 0.0), Point2::new(0.0, 1.0), Some(0)).is_err());
        assert!(Detector::new(Point2::new(0.0, 0.0), Point2::new(0.0, 0.0), None).is_err());
        let d = detector(None);
        assert_eq!(d.power(), 0.0);
        assert!(d.irradiance().is_empty());
        assert!(d.merges_with_glass());
    }
    #[test]
    fn pass_through() {
        let mut d = detector(None);
        let ray = hit(&mut d, 1.0, 1.0);
        assert_abs_diff_eq!(ray.p1().x, 5.0);
        assert_abs_diff_eq!(ray.p1().y, 1.0);
        assert_abs_diff_eq!(ray.direction().unwrap().x, 1.0);
        assert_abs_diff_eq!(ray.total_brightness(), 1.0);
    }
    #[test]
    fn power_and_force() {
        let mut ctx = SimulationContext::default();
        let mut d = detector(None);
        d.on_simulation_start(&mut ctx).unwrap();
        hit(&mut d, 1.0, 1.0);
        hit(&mut d, -1.0, 0.5);
        assert_abs_diff_eq!(d.power(), 1.5);
        assert_abs_diff_eq!(d.normal_force(), 1.5);
        assert_abs_diff_eq!(d.shear_force(), 0.0);
        d.on_simulation_start(&mut ctx).unwrap();
        assert_eq!(d.power(), 0.0);
    }
    #[test]
    fn opposite_direction_counts_negative() {
        let mut ctx = SimulationContext::default();
        let mut d = detector(None);
        let mut ray = Ray::new(Point2::new(10.0, 0.0), Point2::new(-1.0e4, 0.0)).unwrap();
        d.on_ray_incident(&mut ray, 0, Point2::new(5.0, 0.0), &[], &mut ctx)
            .unwrap();
        assert_abs_diff_eq!(d.power(), -1.0);
    }
    #[test]
    fn irradiance_map() {
        let mut ctx = SimulationContext::default();
        let mut d = detector(Some(4));
        d.on_simulation_start(&mut ctx).unwrap();
        hit(&mut d, 1.5, 1.0);
        hit(&mut d, 1.5, 1.0);
        hit(&mut d, -1.5, 0.5);
        d.on_simulation_end();
        let irradiance = d.irradiance();
        assert_eq!(irradiance.len(), 4);
        assert_abs_diff_eq!(irradiance[0], 0.5);
        assert_abs_diff_eq!(irradiance[1], 0.0);
        assert_abs_diff_eq!(irradiance[2], 0.0);
        assert_abs_diff_eq!(irradiance[3], 2.0);
    }
    #[test]
    fn refracts_at_merged_glass() {
        let mut ctx = SimulationContext::default();
        let mut d = Detector::new(Point2::new(1.0, -1.0), Point2::new(1.0, 1.0), None).unwrap();
        d.on_simulation_start(&mut ctx).unwrap();
        let circle = ObjectRef::new(
            Rc::new(RefCell::new(
                CircleGlass::new(Point2::new(0.0, 0.0), 1.0, GlassMaterial::default()).unwrap(),
            )),
            None,
        );
        // leaves the circle through the point it touches the detector
        let mut ray = Ray::new(Point2::new(0.0, 0.0), Point2::new(1.0e4, 0.0)).unwrap();
        ray.set_body_merging(Some(BodyMerging::new(1.5).unwrap()));
        let result = d
            .on_ray_incident(&mut ray, 0, Point2::new(1.0, 0.0), &[circle], &mut ctx)
            .unwrap();
        assert!(!result.is_absorbed);
        assert!(!result.is_undefined_behavior);
        assert_eq!(result.new_rays.len(), 1);
        assert!(result.new_rays[0].direction().unwrap().x < 0.0);
        assert_relative_eq!(result.new_rays[0].total_brightness(), 0.04, epsilon = 1e-12);
        assert_relative_eq!(ray.total_brightness(), 0.96, epsilon = 1e-12);
        assert_abs_diff_eq!(ray.direction().unwrap().x, 1.0, epsilon = 1e-12);
        assert!(ray.body_merging().is_none());
        assert_abs_diff_eq!(d.power(), 1.0);
    }
}
