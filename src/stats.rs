#![warn(missing_docs)]
//! Run-level statistics collected by the [`Simulator`](crate::simulator::Simulator).
use std::fmt::Display;

use approx::relative_eq;
use kahan::KahanSum;
use serde::Serialize;

use crate::objects::ObjectType;

/// The object types involved in the first undefined behavior of a run.
///
/// Coincident surfaces yield a pair (in detection order), an incidence handler detecting an
/// unsupported configuration yields a single type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UndefinedBehaviorObjects {
    first: ObjectType,
    second: Option<ObjectType>,
}
impl UndefinedBehaviorObjects {
    /// Creates a record of two coincident objects.
    #[must_use]
    pub const fn pair(first: ObjectType, second: ObjectType) -> Self {
        Self {
            first,
            second: Some(second),
        }
    }
    /// Creates a record of a single object.
    #[must_use]
    pub const fn single(object_type: ObjectType) -> Self {
        Self {
            first: object_type,
            second: None,
        }
    }
    /// Returns the first object type.
    #[must_use]
    pub const fn first(&self) -> ObjectType {
        self.first
    }
    /// Returns the second object type, if any.
    #[must_use]
    pub const fn second(&self) -> Option<ObjectType> {
        self.second
    }
}
impl Display for UndefinedBehaviorObjects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.second {
            Some(second) => write!(f, "{} and {second}", self.first),
            None => write!(f, "{}", self.first),
        }
    }
}

/// Brightness normalization reported by the sources of a run
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize)]
pub enum BrightnessScale {
    /// no source reported a scale
    #[default]
    Unset,
    /// all sources reported the same scale
    Uniform(f64),
    /// sources reported different scales
    Inconsistent,
}
impl BrightnessScale {
    /// Merges a newly reported scale into this one.
    #[must_use]
    pub fn merged(self, scale: f64) -> Self {
        match self {
            Self::Unset => Self::Uniform(scale),
            Self::Uniform(current) if relative_eq!(current, scale) => self,
            _ => Self::Inconsistent,
        }
    }
}

/// Statistics of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationStats {
    processed_rays: usize,
    truncation: KahanSum<f64>,
    undefined_behavior_brightness: KahanSum<f64>,
    undefined_behavior_objects: Option<UndefinedBehaviorObjects>,
    brightness_scale: BrightnessScale,
    degenerate_rays: usize,
    budget_exhausted: bool,
}
impl Default for SimulationStats {
    fn default() -> Self {
        Self {
            processed_rays: 0,
            truncation: KahanSum::new_with_value(0.0),
            undefined_behavior_brightness: KahanSum::new_with_value(0.0),
            undefined_behavior_objects: None,
            brightness_scale: BrightnessScale::Unset,
            degenerate_rays: 0,
            budget_exhausted: false,
        }
    }
}
impl SimulationStats {
    /// Returns the number of processed rays.
    #[must_use]
    pub const fn processed_rays(&self) -> usize {
        self.processed_rays
    }
    /// Returns the total brightness not propagated (source sampling, weak splits, ray budget).
    #[must_use]
    pub fn truncation(&self) -> f64 {
        self.truncation.sum()
    }
    /// Returns the total brightness of rays involved in undefined behavior.
    #[must_use]
    pub fn undefined_behavior_brightness(&self) -> f64 {
        self.undefined_behavior_brightness.sum()
    }
    /// Returns the object types involved in the first undefined behavior of the run.
    #[must_use]
    pub const fn undefined_behavior_objects(&self) -> Option<UndefinedBehaviorObjects> {
        self.undefined_behavior_objects
    }
    /// Returns the brightness scale reported by the sources.
    #[must_use]
    pub const fn brightness_scale(&self) -> BrightnessScale {
        self.brightness_scale
    }
    /// Returns the number of rays rejected because of a degenerate direction.
    #[must_use]
    pub const fn degenerate_rays(&self) -> usize {
        self.degenerate_rays
    }
    /// Returns `true` if the run was stopped by the ray budget.
    #[must_use]
    pub const fn budget_exhausted(&self) -> bool {
        self.budget_exhausted
    }
    pub(crate) fn count_processed_ray(&mut self) {
        self.processed_rays += 1;
    }
    pub(crate) fn add_truncation(&mut self, brightness: f64) {
        self.truncation += brightness;
    }
    /// Adds the brightness of a ray involved in undefined behavior. Only the first reported
    /// objects of a run are kept.
    pub(crate) fn add_undefined_behavior(
        &mut self,
        brightness: f64,
        objects: UndefinedBehaviorObjects,
    ) {
        self.undefined_behavior_brightness += brightness;
        self.undefined_behavior_objects.get_or_insert(objects);
    }
    pub(crate) fn merge_brightness_scale(&mut self, scale: f64) {
        self.brightness_scale = self.brightness_scale.merged(scale);
    }
    pub(crate) fn count_degenerate_ray(&mut self) {
        self.degenerate_rays += 1;
    }
    pub(crate) fn set_budget_exhausted(&mut self) {
        self.budget_exhausted = true;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;
    use assert_matches::assert_matches;
    #[test]
    fn objects_display() {
        assert_eq!(
            UndefinedBehaviorObjects::pair(ObjectType::Mirror, ObjectType::Glass).to_string(),
            "mirror and glass"
        );
        assert_eq!(
            UndefinedBehaviorObjects::single(ObjectType::CircleGlass).to_string(),
            "circle glass"
        );
    }
    #[test]
    fn brightness_scale() {
        let scale = BrightnessScale::default();
        assert_eq!(scale, BrightnessScale::Unset);
        let scale = scale.merged(0.5);
        assert_matches!(scale, BrightnessScale::Uniform(_));
        let scale = scale.merged(0.5);
        assert_eq!(scale, BrightnessScale::Uniform(0.5));
        let scale = scale.merged(1.0);
        assert_eq!(scale, BrightnessScale::Inconsistent);
        assert_eq!(scale.merged(1.0), BrightnessScale::Inconsistent);
    }
    #[test]
    fn first_undefined_behavior_wins() {
        let mut stats = SimulationStats::default();
        assert_eq!(stats.undefined_behavior_objects(), None);
        stats.add_undefined_behavior(
            0.5,
            UndefinedBehaviorObjects::pair(ObjectType::Mirror, ObjectType::Mirror),
        );
        stats.add_undefined_behavior(0.25, UndefinedBehaviorObjects::single(ObjectType::Glass));
        assert_abs_diff_eq!(stats.undefined_behavior_brightness(), 0.75);
        assert_eq!(
            stats.undefined_behavior_objects(),
            Some(UndefinedBehaviorObjects::pair(
                ObjectType::Mirror,
                ObjectType::Mirror
            ))
        );
    }
    #[test]
    fn counters() {
        let mut stats = SimulationStats::default();
        stats.count_processed_ray();
        stats.count_processed_ray();
        stats.count_degenerate_ray();
        stats.add_truncation(0.1);
        stats.add_truncation(0.2);
        stats.set_budget_exhausted();
        assert_eq!(stats.processed_rays(), 2);
        assert_eq!(stats.degenerate_rays(), 1);
        assert_abs_diff_eq!(stats.truncation(), 0.3, epsilon = 1e-15);
        assert!(stats.budget_exhausted());
    }
}
