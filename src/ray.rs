#![warn(missing_docs)]
//! Module for handling single rays
//!
//! A [`Ray`] is the unit of simulation state flowing through the
//! [`Simulator`](crate::simulator::Simulator). `p1` is its origin while `p2` only defines the
//! direction of travel. Sources usually emit rays with `p2` one unit away from `p1`. Before
//! intersection testing the engine replaces `p2` by a far point along the same direction (see
//! [`Ray::extended`]).
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::{
    error::{RayOpticsError, RoResult},
    geometry::{is_finite_point, Segment},
    nanometer,
};

/// Wavelength of a green laser line (532 nm).
#[must_use]
pub fn green_wavelength() -> Length {
    nanometer!(532.0)
}
/// Default red wavelength (650 nm).
#[must_use]
pub fn red_wavelength() -> Length {
    nanometer!(650.0)
}
/// Default blue wavelength (450 nm).
#[must_use]
pub fn blue_wavelength() -> Length {
    nanometer!(450.0)
}

/// Effective medium of a ray travelling through overlapping glass bodies.
///
/// The refractive index is the product (or quotient) of all bodies crossed at merged surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyMerging {
    ref_index: f64,
}
impl BodyMerging {
    /// Creates a new [`BodyMerging`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the given index is not finite or not positive.
    pub fn new(ref_index: f64) -> RoResult<Self> {
        if !ref_index.is_finite() || ref_index <= 0.0 {
            return Err(RayOpticsError::Simulation(
                "effective refractive index must be positive and finite".into(),
            ));
        }
        Ok(Self { ref_index })
    }
    /// Returns the effective refractive index of the medium.
    #[must_use]
    pub const fn ref_index(&self) -> f64 {
        self.ref_index
    }
}

/// Struct containing all relevant information of a ray
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    p1: Point2<f64>,
    p2: Point2<f64>,
    brightness_s: f64,
    brightness_p: f64,
    wavelength: Option<Length>,
    gap: bool,
    is_new: bool,
    body_merging: Option<BodyMerging>,
}
impl Ray {
    /// Creates a new [`Ray`] starting at `p1` and heading towards `p2`.
    ///
    /// The ray is created with full brightness (0.5 per polarization channel), no wavelength
    /// (white light) and all flags cleared.
    ///
    /// # Errors
    ///
    /// This function will return an error if any coordinate is not finite or both points coincide.
    pub fn new(p1: Point2<f64>, p2: Point2<f64>) -> RoResult<Self> {
        if !is_finite_point(&p1) || !is_finite_point(&p2) {
            return Err(RayOpticsError::Geometry(
                "ray points must be finite".into(),
            ));
        }
        if p1 == p2 {
            return Err(RayOpticsError::Geometry(
                "ray direction must not be zero".into(),
            ));
        }
        Ok(Self {
            p1,
            p2,
            brightness_s: 0.5,
            brightness_p: 0.5,
            wavelength: None,
            gap: false,
            is_new: false,
            body_merging: None,
        })
    }
    /// Creates a new [`Ray`] starting at `p1` with the given direction.
    ///
    /// # Errors
    ///
    /// This function will return an error if `p1` is not finite or the direction is zero or not
    /// finite.
    pub fn from_direction(p1: Point2<f64>, direction: Vector2<f64>) -> RoResult<Self> {
        Self::new(p1, p1 + direction)
    }
    /// Sets the brightness of both polarization channels.
    ///
    /// # Errors
    ///
    /// This function will return an error if a value is negative or not finite.
    pub fn with_brightness(mut self, brightness_s: f64, brightness_p: f64) -> RoResult<Self> {
        self.set_brightness(brightness_s, brightness_p)?;
        Ok(self)
    }
    /// Sets the wavelength of this [`Ray`].
    #[must_use]
    pub const fn with_wavelength(mut self, wavelength: Option<Length>) -> Self {
        self.wavelength = wavelength;
        self
    }
    /// Sets the `gap` flag of this [`Ray`].
    #[must_use]
    pub const fn with_gap(mut self, gap: bool) -> Self {
        self.gap = gap;
        self
    }
    /// Marks this [`Ray`] as freshly emitted by a source.
    #[must_use]
    pub const fn with_new_flag(mut self, is_new: bool) -> Self {
        self.is_new = is_new;
        self
    }
    /// Returns the origin of this [`Ray`].
    #[must_use]
    pub const fn p1(&self) -> Point2<f64> {
        self.p1
    }
    /// Returns the direction point of this [`Ray`].
    #[must_use]
    pub const fn p2(&self) -> Point2<f64> {
        self.p2
    }
    /// Returns the line through origin and direction point.
    #[must_use]
    pub const fn line(&self) -> Segment {
        Segment {
            p1: self.p1,
            p2: self.p2,
        }
    }
    /// Returns the s-polarized brightness of this [`Ray`].
    #[must_use]
    pub const fn brightness_s(&self) -> f64 {
        self.brightness_s
    }
    /// Returns the p-polarized brightness of this [`Ray`].
    #[must_use]
    pub const fn brightness_p(&self) -> f64 {
        self.brightness_p
    }
    /// Returns the total brightness (sum of both polarization channels).
    #[must_use]
    pub fn total_brightness(&self) -> f64 {
        self.brightness_s + self.brightness_p
    }
    /// Returns the wavelength of this [`Ray`]. `None` denotes white light.
    #[must_use]
    pub const fn wavelength(&self) -> Option<Length> {
        self.wavelength
    }
    /// Returns `true` if this ray is not connected to a logically preceding ray.
    #[must_use]
    pub const fn gap(&self) -> bool {
        self.gap
    }
    /// Returns `true` if this ray was freshly emitted by a source and not yet propagated.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }
    /// Returns the merged-body descriptor of this [`Ray`].
    #[must_use]
    pub const fn body_merging(&self) -> Option<BodyMerging> {
        self.body_merging
    }
    /// Returns the unit direction of this [`Ray`] or `None` if it is degenerate.
    #[must_use]
    pub fn direction(&self) -> Option<Vector2<f64>> {
        let d = self.p2 - self.p1;
        let len = d.norm();
        (len > 0.0 && len.is_finite()).then(|| d / len)
    }
    /// Returns a copy of this [`Ray`] whose `p2` lies at the given distance from `p1` along the
    /// direction of travel.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ray direction is degenerate or the extended point
    /// is not finite.
    pub fn extended(&self, length: f64) -> RoResult<Self> {
        let direction = self.direction().ok_or_else(|| {
            RayOpticsError::Simulation("cannot extend ray with zero-length direction".into())
        })?;
        let p2 = self.p1 + direction * length;
        if !is_finite_point(&p2) || p2 == self.p1 {
            return Err(RayOpticsError::Simulation(
                "extended ray is degenerate".into(),
            ));
        }
        let mut ray = self.clone();
        ray.p2 = p2;
        Ok(ray)
    }
    /// Redirects this [`Ray`] to start at `p1` and head towards `p2`.
    ///
    /// # Errors
    ///
    /// This function will return an error if any coordinate is not finite or both points coincide.
    pub fn set_points(&mut self, p1: Point2<f64>, p2: Point2<f64>) -> RoResult<()> {
        if !is_finite_point(&p1) || !is_finite_point(&p2) || p1 == p2 {
            return Err(RayOpticsError::Simulation(format!(
                "invalid ray continuation from ({}, {}) towards ({}, {})",
                p1.x, p1.y, p2.x, p2.y
            )));
        }
        self.p1 = p1;
        self.p2 = p2;
        Ok(())
    }
    /// Sets the brightness of both polarization channels.
    ///
    /// # Errors
    ///
    /// This function will return an error if a value is negative or not finite.
    pub fn set_brightness(&mut self, brightness_s: f64, brightness_p: f64) -> RoResult<()> {
        if !brightness_s.is_finite()
            || !brightness_p.is_finite()
            || brightness_s.is_sign_negative()
            || brightness_p.is_sign_negative()
        {
            return Err(RayOpticsError::Simulation(
                "ray brightness must be >= 0.0 and finite".into(),
            ));
        }
        self.brightness_s = brightness_s;
        self.brightness_p = brightness_p;
        Ok(())
    }
    /// Sets the `gap` flag.
    pub fn set_gap(&mut self, gap: bool) {
        self.gap = gap;
    }
    /// Sets the `is_new` flag.
    pub fn set_new(&mut self, is_new: bool) {
        self.is_new = is_new;
    }
    /// Sets the merged-body descriptor.
    pub fn set_body_merging(&mut self, body_merging: Option<BodyMerging>) {
        self.body_merging = body_merging;
    }
}
