#![warn(missing_docs)]
//! This module contains the concrete scene objects and the protocol between them and the
//! [`Simulator`](crate::simulator::Simulator).
//!
//! Every object placed in a [`Scene`](crate::scene::Scene) implements [`SceneObject`]. Objects
//! interacting with rays additionally implement [`OpticalObject`], consisting of three lifecycle
//! operations:
//!   - [`OpticalObject::on_simulation_start`]: called once per run before any ray is traced.
//!     Sources emit their initial rays here, detectors reset their accumulators.
//!   - [`OpticalObject::check_ray_intersects`]: pure intersection test of a ray with the object.
//!   - [`OpticalObject::on_ray_incident`]: handles a ray hitting the object. It may redirect the
//!     ray in place, emit additional rays or absorb the ray.
//!
//! Whether an object is a glass body and whether it may sit flush against a glass boundary is a
//! property of its [`ObjectType`], never of a single instance.
use std::fmt::Debug;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::{
    context::SimulationContext,
    error::RoResult,
    geometry::{
        distance_squared, intersection_is_on_ray, intersection_is_on_segment, lines_intersection,
        Segment,
    },
    object_ref::ObjectRef,
    ray::Ray,
};

mod beam;
mod blocker;
mod detector;
pub mod glass;
mod ideal_lens;
mod mirror;
mod point_source;
mod ruler;
mod single_ray;

pub use beam::Beam;
pub use blocker::Blocker;
pub use detector::Detector;
pub use glass::{CircleGlass, Glass, GlassBody, GlassMaterial, IncidentType, PathPoint};
pub use ideal_lens::IdealLens;
pub use mirror::Mirror;
pub use point_source::PointSource;
pub use ruler::Ruler;
pub use single_ray::SingleRay;

/// All object variants known to the simulation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum ObjectType {
    /// isotropic point source
    #[strum(to_string = "point source")]
    PointSource,
    /// collimated beam emitted from a line segment
    #[strum(to_string = "beam")]
    Beam,
    /// a single ray
    #[strum(to_string = "single ray")]
    SingleRay,
    /// ideal thin lens
    #[strum(to_string = "ideal lens")]
    IdealLens,
    /// flat mirror segment
    #[strum(to_string = "mirror")]
    Mirror,
    /// absorbing segment
    #[strum(to_string = "blocker")]
    Blocker,
    /// power / force / irradiance detector
    #[strum(to_string = "detector")]
    Detector,
    /// glass body bounded by straight lines and circular arcs
    #[strum(to_string = "glass")]
    Glass,
    /// circular glass body
    #[strum(to_string = "circle glass")]
    CircleGlass,
    /// decorative ruler
    #[strum(to_string = "ruler")]
    Ruler,
}
impl ObjectType {
    /// Returns `true` if objects of this type take part in the ray interaction.
    #[must_use]
    pub const fn is_optical(self) -> bool {
        !matches!(self, Self::Ruler)
    }
    /// Returns `true` for refractive bulk media.
    #[must_use]
    pub const fn is_glass(self) -> bool {
        matches!(self, Self::Glass | Self::CircleGlass)
    }
    /// Returns `true` if objects of this type may coincide with a glass boundary without causing
    /// undefined behavior.
    ///
    /// Glass types are always mergeable with other glass objects.
    #[must_use]
    pub const fn merges_with_glass(self) -> bool {
        matches!(
            self,
            Self::Blocker | Self::Detector | Self::Glass | Self::CircleGlass
        )
    }
}

/// Any object placed in a scene
pub trait SceneObject: Debug {
    /// Returns the variant of this object.
    fn object_type(&self) -> ObjectType;
    /// Returns the optical behavior of this object, if any.
    fn as_optical(&self) -> Option<&dyn OpticalObject> {
        None
    }
    /// Returns the (mutable) optical behavior of this object, if any.
    fn as_optical_mut(&mut self) -> Option<&mut dyn OpticalObject> {
        None
    }
}

/// Result of [`OpticalObject::on_simulation_start`]
#[derive(Debug, Default)]
pub struct StartResult {
    /// rays emitted at the beginning of a run
    pub new_rays: Vec<Ray>,
    /// brightness deliberately not emitted
    pub truncation: f64,
    /// factor the emitted brightness was scaled with to fit the ray density
    pub brightness_scale: Option<f64>,
}

/// Result of [`OpticalObject::on_ray_incident`]
#[derive(Debug, Default)]
pub struct IncidentResult {
    /// additional rays spawned by the incidence (e.g. partial reflections)
    pub new_rays: Vec<Ray>,
    /// the ray is terminated at the object
    pub is_absorbed: bool,
    /// brightness deliberately not propagated
    pub truncation: f64,
    /// the object cannot resolve this incidence unambiguously
    pub is_undefined_behavior: bool,
}
impl IncidentResult {
    /// The ray continues (possibly redirected) without side products.
    #[must_use]
    pub fn continued() -> Self {
        Self::default()
    }
    /// The ray is absorbed.
    #[must_use]
    pub fn absorbed() -> Self {
        Self {
            is_absorbed: true,
            ..Self::default()
        }
    }
    /// The ray hit a configuration the object cannot handle. The ray is absorbed.
    #[must_use]
    pub fn undefined_behavior() -> Self {
        Self {
            is_absorbed: true,
            is_undefined_behavior: true,
            ..Self::default()
        }
    }
}

/// Interaction of an object with rays
pub trait OpticalObject: SceneObject {
    /// Prepares this object for a new simulation run and optionally emits initial rays.
    ///
    /// # Errors
    ///
    /// This function will return an error if the object cannot emit valid rays.
    fn on_simulation_start(&mut self, _ctx: &mut SimulationContext) -> RoResult<StartResult> {
        Ok(StartResult::default())
    }
    /// Returns the nearest intersection of the given (extended) ray with this object in forward
    /// direction.
    fn check_ray_intersects(&self, ray: &Ray, ctx: &SimulationContext) -> Option<Point2<f64>>;
    /// Handles a ray hitting this object at `incident_point`.
    ///
    /// `ray` still carries its origin and its extended direction point. If the ray is not
    /// absorbed, the implementation redirects it to describe the continuing ray.
    /// `surface_merging` contains the objects coinciding with this one at the incident point.
    ///
    /// # Errors
    ///
    /// This function will return an error if the continuing ray would be degenerate.
    fn on_ray_incident(
        &mut self,
        ray: &mut Ray,
        ray_index: usize,
        incident_point: Point2<f64>,
        surface_merging: &[ObjectRef],
        ctx: &mut SimulationContext,
    ) -> RoResult<IncidentResult>;
    /// Finalizes accumulated statistics after a run.
    fn on_simulation_end(&mut self) {}
    /// Returns the glass behavior of this object, if any.
    fn as_glass(&self) -> Option<&dyn GlassBody> {
        None
    }
    /// Returns `true` for refractive bulk media.
    fn is_glass(&self) -> bool {
        self.object_type().is_glass()
    }
    /// Returns `true` if this object may coincide with a glass boundary.
    fn merges_with_glass(&self) -> bool {
        self.object_type().merges_with_glass()
    }
}

/// Nearest intersection of a ray with a line segment, ignoring hits within the minimum segment
/// length of the ray origin.
pub(crate) fn segment_intersection(
    ray: &Ray,
    segment: &Segment,
    ctx: &SimulationContext,
) -> Option<Point2<f64>> {
    let line = ray.line();
    let p = lines_intersection(&line, segment)?;
    (intersection_is_on_segment(&p, segment)
        && intersection_is_on_ray(&p, &line)
        && distance_squared(&ray.p1(), &p) > ctx.coincidence_threshold_squared())
    .then_some(p)
}
