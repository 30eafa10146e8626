#![warn(missing_docs)]
//! Isotropic point light source.
use std::f64::consts::PI;

use nalgebra::{Point2, Vector2};
use uom::si::f64::Length;

use super::{IncidentResult, ObjectType, OpticalObject, SceneObject, StartResult};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    geometry::is_finite_point,
    object_ref::ObjectRef,
    ray::Ray,
};

/// Number of rays a full turn is sampled with per unit of ray density.
const RAYS_PER_DENSITY: f64 = 500.0;

/// Per-ray brightness and brightness scale for a source of the given nominal brightness.
///
/// The per-ray brightness is capped at 1. In this case the returned scale (< 1) tells renderers
/// by which factor the emitted light is too dim.
pub(super) fn ray_brightness(brightness: f64, ray_density: f64) -> (f64, Option<f64>) {
    let relative = brightness / ray_density;
    if relative > 0.0 {
        (relative.min(1.0), Some(relative.min(1.0) / relative))
    } else {
        (0.0, None)
    }
}

pub(super) fn check_source_brightness(brightness: f64) -> RoResult<()> {
    if !brightness.is_finite() || brightness.is_sign_negative() {
        return Err(RayOpticsError::Scene(
            "source brightness must be >= 0.0 and finite".into(),
        ));
    }
    Ok(())
}

/// An isotropic point source.
///
/// The number of emitted rays is proportional to the ray density of the scene.
#[derive(Debug, Clone)]
pub struct PointSource {
    position: Point2<f64>,
    brightness: f64,
    wavelength: Option<Length>,
}
impl PointSource {
    /// Creates a new [`PointSource`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the position is not finite or the brightness is
    /// negative or not finite.
    pub fn new(
        position: Point2<f64>,
        brightness: f64,
        wavelength: Option<Length>,
    ) -> RoResult<Self> {
        if !is_finite_point(&position) {
            return Err(RayOpticsError::Scene(
                "position of point source must be finite".into(),
            ));
        }
        check_source_brightness(brightness)?;
        Ok(Self {
            position,
            brightness,
            wavelength,
        })
    }
    /// Returns the position of this [`PointSource`].
    #[must_use]
    pub const fn position(&self) -> Point2<f64> {
        self.position
    }
}
impl SceneObject for PointSource {
    fn object_type(&self) -> ObjectType {
        ObjectType::PointSource
    }
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        Some(self)
    }
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        Some(self)
    }
}
impl OpticalObject for PointSource {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn on_simulation_start(&mut self, ctx: &mut SimulationContext) -> RoResult<StartResult> {
        let nr_of_rays = (ctx.ray_density() * RAYS_PER_DENSITY).floor() as usize;
        let (brightness, brightness_scale) = ray_brightness(self.brightness, ctx.ray_density());
        if nr_of_rays == 0 || brightness == 0.0 {
            return Ok(StartResult {
                truncation: self.brightness,
                ..StartResult::default()
            });
        }
        let step = 2.0 * PI / nr_of_rays as f64;
        let mut new_rays = Vec::with_capacity(nr_of_rays);
        for i in 0..nr_of_rays {
            let angle = step * i as f64;
            let ray = Ray::from_direction(self.position, Vector2::new(angle.sin(), angle.cos()))?
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
