#![warn(missing_docs)]
//! Refractive bulk media.
//!
//! All glass bodies share the refraction model implemented here: vector form of Snell's law with
//! total internal reflection and a Fresnel split of the s- and p-polarized brightness into a
//! transmitted (continuing) and a reflected (newly emitted) ray.
//!
//! Glass surfaces coinciding with other glass surfaces are merged: the handling glass body
//! receives the other bodies and combines their refractive indices according to the side the ray
//! enters or leaves them.
use approx::relative_eq;
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::micrometer};

use super::{IncidentResult, OpticalObject};
use crate::{
    context::SimulationContext,
    error::{RayOpticsError, RoResult},
    object_ref::ObjectRef,
    ray::{BodyMerging, Ray},
};

mod circle;
mod polygon;

pub use circle::CircleGlass;
pub use polygon::{Glass, PathPoint};

/// Amplitude of the random perturbation of the line used for the inside / outside test.
const INSIDE_TEST_PERTURBATION: f64 = 1e-5;

/// Refractive properties of a glass body.
///
/// The refractive index follows Cauchy's equation `n(λ) = A + B / λ²` (λ in µm) if color
/// simulation is enabled and the ray carries a wavelength. Otherwise `A` is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlassMaterial {
    ref_index: f64,
    cauchy_b: f64,
}
impl Default for GlassMaterial {
    /// Create a default material with `A = 1.5` and `B = 0.004 µm²`.
    fn default() -> Self {
        Self {
            ref_index: 1.5,
            cauchy_b: 0.004,
        }
    }
}
impl GlassMaterial {
    /// Creates a new [`GlassMaterial`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the refractive index is not positive or a coefficient
    /// is not finite.
    pub fn new(ref_index: f64, cauchy_b: f64) -> RoResult<Self> {
        if !ref_index.is_finite() || ref_index <= 0.0 {
            return Err(RayOpticsError::Scene(
                "refractive index must be > 0.0 and finite".into(),
            ));
        }
        if !cauchy_b.is_finite() {
            return Err(RayOpticsError::Scene(
                "Cauchy coefficient must be finite".into(),
            ));
        }
        Ok(Self {
            ref_index,
            cauchy_b,
        })
    }
    /// Returns the refractive index (Cauchy coefficient `A`).
    #[must_use]
    pub const fn ref_index(&self) -> f64 {
        self.ref_index
    }
    /// Returns the Cauchy coefficient `B` in µm².
    #[must_use]
    pub const fn cauchy_b(&self) -> f64 {
        self.cauchy_b
    }
    /// Returns the refractive index for the given wavelength.
    #[must_use]
    pub fn ref_index_at(&self, wavelength: Option<Length>, simulate_colors: bool) -> f64 {
        match wavelength {
            Some(wavelength) if simulate_colors => {
                let lambda = wavelength.get::<micrometer>();
                self.ref_index + self.cauchy_b / (lambda * lambda)
            }
            _ => self.ref_index,
        }
    }
}

/// Kind of boundary crossing of a ray at a glass body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentType {
    /// the ray leaves the glass
    InsideToOutside,
    /// the ray enters the glass
    OutsideToInside,
    /// the ray hits two coinciding surfaces of the same body, which cancel each other
    Overlapping,
    /// the ray hits an edge point, where the surface normal is not defined
    Edge,
}

/// Geometric details of a ray hitting a glass body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IncidentData {
    /// nearest hit point, `None` if the ray misses the body
    pub point: Option<Point2<f64>>,
    /// surface normal at the hit point, pointing against the ray (not normalized)
    pub normal: Vector2<f64>,
    /// kind of boundary crossing
    pub incident_type: IncidentType,
}

/// Common behavior of glass bodies
pub trait GlassBody {
    /// Returns the material of this glass body.
    fn material(&self) -> &GlassMaterial;
    /// Determines hit point, surface normal and kind of crossing for the given ray.
    fn incident_data(&self, ray: &Ray, ctx: &mut SimulationContext) -> IncidentData;
    /// Determines the kind of crossing for the given ray.
    fn incident_type(&self, ray: &Ray, ctx: &mut SimulationContext) -> IncidentType {
        self.incident_data(ray, ctx).incident_type
    }
    /// Returns the refractive index at the given point for the given ray.
    fn ref_index_at(&self, _point: &Point2<f64>, ray: &Ray, ctx: &SimulationContext) -> f64 {
        self.material()
            .ref_index_at(ray.wavelength(), ctx.simulate_colors())
    }
}

/// Fresnel reflectance `(R_s, R_p)` for relative refractive index `n1` (incident / transmitted)
/// and the cosines of the angles of incidence and refraction.
#[must_use]
pub fn fresnel_reflectance(n1: f64, cos1: f64, cos2: f64) -> (f64, f64) {
    let r_s = (n1.mul_add(cos1, -cos2) / n1.mul_add(cos1, cos2)).powi(2);
    let r_p = (n1.mul_add(cos2, -cos1) / n1.mul_add(cos2, cos1)).powi(2);
    (r_s, r_p)
}

/// Returns the line used for the inside / outside test of a glass body: the given ray with a
/// slightly perturbed direction point.
pub(crate) fn perturbed_line(ray: &Ray, ctx: &mut SimulationContext) -> crate::geometry::Segment {
    let dx = ctx.random() * INSIDE_TEST_PERTURBATION;
    let dy = ctx.random() * INSIDE_TEST_PERTURBATION;
    crate::geometry::Segment {
        p1: ray.p1(),
        p2: ray.p2() + Vector2::new(dx, dy),
    }
}

/// Handles a ray hitting the given glass body.
pub(crate) fn handle_glass_incidence<G: GlassBody + ?Sized>(
    glass: &G,
    ray: &mut Ray,
    incident_point: Point2<f64>,
    surface_merging: &[ObjectRef],
    ctx: &mut SimulationContext,
) -> RoResult<IncidentResult> {
    let data = glass.incident_data(ray, ctx);
    if data.point.is_none() {
        return Err(RayOpticsError::Simulation(
            "glass body handles a ray it does not intersect".into(),
        ));
    }
    let n = glass.ref_index_at(&incident_point, ray, ctx);
    let n1 = match data.incident_type {
        IncidentType::InsideToOutside => n,
        IncidentType::OutsideToInside => 1.0 / n,
        IncidentType::Overlapping => 1.0,
        IncidentType::Edge => return Ok(IncidentResult::undefined_behavior()),
    };
    refract(ray, incident_point, data.normal, n1, surface_merging, ctx)
}

/// Refracts the ray at a glass surface.
///
/// `n1` is the relative refractive index (incident side / transmitted side) of the handling body.
/// It is combined with the indices of all glass bodies in `surface_merging`. The ray is
/// redirected in place, a partially reflected ray is returned as new ray.
pub(crate) fn refract(
    ray: &mut Ray,
    incident_point: Point2<f64>,
    normal: Vector2<f64>,
    mut n1: f64,
    surface_merging: &[ObjectRef],
    ctx: &mut SimulationContext,
) -> RoResult<IncidentResult> {
    for object in surface_merging {
        let object = object.borrow();
        let Some(glass) = object.as_optical().and_then(OpticalObject::as_glass) else {
            continue;
        };
        match glass.incident_type(ray, ctx) {
            IncidentType::InsideToOutside => n1 *= glass.ref_index_at(&incident_point, ray, ctx),
            IncidentType::OutsideToInside => n1 /= glass.ref_index_at(&incident_point, ray, ctx),
            IncidentType::Overlapping => {}
            IncidentType::Edge => return Ok(IncidentResult::undefined_behavior()),
        }
    }
    let normal = normal
        .try_normalize(0.0)
        .ok_or_else(|| RayOpticsError::Simulation("glass surface normal is zero".into()))?;
    let direction = ray
        .direction()
        .ok_or_else(|| RayOpticsError::Simulation("glass hit by degenerate ray".into()))?;
    let cos1 = -normal.dot(&direction);
    let sq1 = (n1 * n1).mul_add(-cos1.mul_add(-cos1, 1.0), 1.0);
    let reflected_direction = direction + normal * (2.0 * cos1);
    if sq1 < 0.0 {
        // total internal reflection
        ray.set_points(incident_point, incident_point + reflected_direction)?;
        return Ok(IncidentResult::continued());
    }
    let cos2 = sq1.sqrt();
    let (r_s, r_p) = fresnel_reflectance(n1, cos1, cos2);
    let mut result = IncidentResult::continued();
    let reflected_s = ray.brightness_s() * r_s;
    let reflected_p = ray.brightness_p() * r_p;
    if reflected_s + reflected_p > ctx.min_split_brightness() {
        let mut reflected = ray.clone();
        reflected.set_points(incident_point, incident_point + reflected_direction)?;
        reflected.set_brightness(reflected_s, reflected_p)?;
        reflected.set_gap(true);
        reflected.set_new(false);
        result.new_rays.push(reflected);
    } else {
        result.truncation += reflected_s + reflected_p;
    }
    let medium_before = ray.body_merging().map_or(1.0, |b| b.ref_index());
    let medium_after = medium_before / n1;
    let refracted_direction = direction * n1 + normal * n1.mul_add(cos1, -cos2);
    ray.set_points(incident_point, incident_point + refracted_direction)?;
    ray.set_brightness(
        ray.brightness_s() * (1.0 - r_s),
        ray.brightness_p() * (1.0 - r_p),
    )?;
    ray.set_body_merging(if relative_eq!(medium_after, 1.0) {
        None
    } else {
        Some(BodyMerging::new(medium_after)?)
    });
    Ok(result)
}
