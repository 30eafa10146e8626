#![warn(missing_docs)]
//! Finished ray segments produced by a simulation run.
//!
//! These are the only output handed to renderers and exporters. A segment never aliases the
//! [`Ray`] it was recorded from: its end point is the truncated hit point, while the ray keeps its
//! direction point for the incidence handler.
use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};
use uom::si::f64::Length;

use crate::{
    error::{RayOpticsError, RoResult},
    geometry::is_finite_point,
    ray::Ray,
};

/// End of a recorded segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SegmentEnd {
    /// the segment ends at an optical object
    Point(Point2<f64>),
    /// the ray escapes the scene in the given (unit) direction
    Infinity {
        /// unit direction of travel
        direction: Vector2<f64>,
    },
}

/// Kind of a recorded segment
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    /// an actually travelled ray segment
    #[default]
    Ray,
    /// a backward extension of a ray (virtual image construction in extended / observer mode)
    Extension,
}

/// A finished part of a ray path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaySegment {
    p1: Point2<f64>,
    end: SegmentEnd,
    brightness_s: f64,
    brightness_p: f64,
    wavelength: Option<Length>,
    gap: bool,
    is_new: bool,
    kind: SegmentKind,
}
impl RaySegment {
    /// Records the given ray truncated at `end_point`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the end point is not finite.
    pub fn truncated(ray: &Ray, end_point: Point2<f64>) -> RoResult<Self> {
        if !is_finite_point(&end_point) {
            return Err(RayOpticsError::Simulation(
                "segment end point must be finite".into(),
            ));
        }
        Ok(Self::from_ray(ray, SegmentEnd::Point(end_point), SegmentKind::Ray))
    }
    /// Records the given ray as escaping to infinity.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ray direction is degenerate.
    pub fn escaping(ray: &Ray) -> RoResult<Self> {
        let direction = ray.direction().ok_or_else(|| {
            RayOpticsError::Simulation("escaping ray has no direction".into())
        })?;
        Ok(Self::from_ray(
            ray,
            SegmentEnd::Infinity { direction },
            SegmentKind::Ray,
        ))
    }
    /// Records the backward extension of the given ray, starting at its origin.
    ///
    /// # Errors
    ///
    /// This function will return an error if the ray direction is degenerate.
    pub fn backward_extension(ray: &Ray) -> RoResult<Self> {
        let direction = ray.direction().ok_or_else(|| {
            RayOpticsError::Simulation("extended ray has no direction".into())
        })?;
        let mut segment = Self::from_ray(
            ray,
            SegmentEnd::Infinity {
                direction: -direction,
            },
            SegmentKind::Extension,
        );
        segment.gap = true;
        Ok(segment)
    }
    fn from_ray(ray: &Ray, end: SegmentEnd, kind: SegmentKind) -> Self {
        Self {
            p1: ray.p1(),
            end,
            brightness_s: ray.brightness_s(),
            brightness_p: ray.brightness_p(),
            wavelength: ray.wavelength(),
            gap: ray.gap(),
            is_new: ray.is_new(),
            kind,
        }
    }
    /// Returns the start point of this [`RaySegment`].
    #[must_use]
    pub const fn p1(&self) -> Point2<f64> {
        self.p1
    }
    /// Returns the end of this [`RaySegment`].
    #[must_use]
    pub const fn end(&self) -> SegmentEnd {
        self.end
    }
    /// Returns the end point or, for escaping segments, the point at the given distance from the
    /// start point.
    #[must_use]
    pub fn end_point_or(&self, distance: f64) -> Point2<f64> {
        match self.end {
            SegmentEnd::Point(p) => p,
            SegmentEnd::Infinity { direction } => self.p1 + direction * distance,
        }
    }
    /// Returns `true` if this segment escapes to infinity.
    #[must_use]
    pub const fn escapes(&self) -> bool {
        matches!(self.end, SegmentEnd::Infinity { .. })
    }
    /// Returns the s-polarized brightness.
    #[must_use]
    pub const fn brightness_s(&self) -> f64 {
        self.brightness_s
    }
    /// Returns the p-polarized brightness.
    #[must_use]
    pub const fn brightness_p(&self) -> f64 {
        self.brightness_p
    }
    /// Returns the total brightness.
    #[must_use]
    pub fn total_brightness(&self) -> f64 {
        self.brightness_s + self.brightness_p
    }
    /// Returns the wavelength.
    #[must_use]
    pub const fn wavelength(&self) -> Option<Length> {
        self.wavelength
    }
    /// Returns the discontinuity flag.
    #[must_use]
    pub const fn gap(&self) -> bool {
        self.gap
    }
    /// Returns `true` if the recorded ray came straight from a source.
    #[must_use]
    pub const fn is_new(&self) -> bool {
        self.is_new
    }
    /// Returns the kind of this [`RaySegment`].
    #[must_use]
    pub const fn kind(&self) -> SegmentKind {
        self.kind
    }
}
