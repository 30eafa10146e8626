//! Configuration of the ray tracing engine
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::error::{RayOpticsError, RoResult};

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
/// Configuration data for a [`Simulator`](crate::simulator::Simulator).
///
/// The config contains the following info
///   - maximum number of rays processed in one run (ray budget)
///   - minimum valid ray segment length
///   - length used for extending rays before intersection testing
///   - threshold of the undefined-behavior brightness above which a warning is issued
///   - minimum brightness of a ray worth tracing
///   - minimum brightness of partially reflected rays worth emitting
///   - seed of the random generator used by glass bodies
pub struct SimulatorConfig {
    ray_budget: usize,
    min_segment_length: f64,
    ray_extension_length: f64,
    undefined_behavior_threshold: f64,
    min_ray_brightness: f64,
    min_split_brightness: f64,
    rng_seed: u64,
}
impl Default for SimulatorConfig {
    /// Create a default config with the following parameters:
    ///   - ray budget: `10000`
    ///   - minimum segment length: `1e-6`
    ///   - ray extension length: `1e4`
    ///   - undefined-behavior threshold: `1e-5`
    ///   - minimum ray brightness: `1e-6`
    ///   - minimum split brightness: `0.01`
    ///   - rng seed: `0`
    fn default() -> Self {
        Self {
            ray_budget: 10000,
            min_segment_length: 1e-6,
            ray_extension_length: 1e4,
            undefined_behavior_threshold: 1e-5,
            min_ray_brightness: 1e-6,
            min_split_brightness: 0.01,
            rng_seed: 0,
        }
    }
}
impl SimulatorConfig {
    /// Reads a config from a YAML file. Missing entries take their default values.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read, parsed or contains invalid
    /// values.
    pub fn from_yaml_file(path: &Path) -> RoResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RayOpticsError::Config(format!("cannot read file {} : {}", path.display(), e))
        })?;
        let config = Self::from_yaml_str(&contents)?;
        info!("Simulator config read from {}", path.display());
        Ok(config)
    }
    /// Parses a config from a YAML string. Missing entries take their default values.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string cannot be parsed or contains invalid
    /// values.
    pub fn from_yaml_str(yaml: &str) -> RoResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| RayOpticsError::Config(format!("parsing of config failed: {e}")))?;
        config.validate()?;
        Ok(config)
    }
    /// Checks all values of this config.
    ///
    /// # Errors
    ///
    /// This function will return an error if any value is out of its valid range.
    pub fn validate(&self) -> RoResult<()> {
        let mut checked = Self::default();
        checked.set_ray_budget(self.ray_budget)?;
        checked.set_min_segment_length(self.min_segment_length)?;
        checked.set_ray_extension_length(self.ray_extension_length)?;
        checked.set_undefined_behavior_threshold(self.undefined_behavior_threshold)?;
        checked.set_min_ray_brightness(self.min_ray_brightness)?;
        checked.set_min_split_brightness(self.min_split_brightness)?;
        if self.ray_extension_length <= self.min_segment_length {
            return Err(RayOpticsError::Config(
                "ray extension length must be larger than the minimum segment length".into(),
            ));
        }
        Ok(())
    }
    /// Returns the maximum number of rays processed in one run.
    #[must_use]
    pub const fn ray_budget(&self) -> usize {
        self.ray_budget
    }
    /// Sets the maximum number of rays processed in one run.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given budget is zero.
    pub fn set_ray_budget(&mut self, ray_budget: usize) -> RoResult<()> {
        if ray_budget == 0 {
            return Err(RayOpticsError::Config("ray budget must be >= 1".into()));
        }
        self.ray_budget = ray_budget;
        Ok(())
    }
    /// Returns the minimum valid ray segment length.
    #[must_use]
    pub const fn min_segment_length(&self) -> f64 {
        self.min_segment_length
    }
    /// Sets the minimum valid ray segment length.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given length is not positive or not finite.
    pub fn set_min_segment_length(&mut self, min_segment_length: f64) -> RoResult<()> {
        if !min_segment_length.is_finite() || min_segment_length <= 0.0 {
            return Err(RayOpticsError::Config(
                "minimum segment length must be > 0.0 and finite".into(),
            ));
        }
        self.min_segment_length = min_segment_length;
        Ok(())
    }
    /// Returns the length rays are extended to before intersection testing.
    #[must_use]
    pub const fn ray_extension_length(&self) -> f64 {
        self.ray_extension_length
    }
    /// Sets the length rays are extended to before intersection testing.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given length is not positive or not finite.
    pub fn set_ray_extension_length(&mut self, ray_extension_length: f64) -> RoResult<()> {
        if !ray_extension_length.is_finite() || ray_extension_length <= 0.0 {
            return Err(RayOpticsError::Config(
                "ray extension length must be > 0.0 and finite".into(),
            ));
        }
        self.ray_extension_length = ray_extension_length;
        Ok(())
    }
    /// Returns the undefined-behavior brightness above which a warning is issued.
    #[must_use]
    pub const fn undefined_behavior_threshold(&self) -> f64 {
        self.undefined_behavior_threshold
    }
    /// Sets the undefined-behavior brightness above which a warning is issued.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given threshold is negative or not finite.
    pub fn set_undefined_behavior_threshold(&mut self, threshold: f64) -> RoResult<()> {
        if !threshold.is_finite() || threshold.is_sign_negative() {
            return Err(RayOpticsError::Config(
                "undefined behavior threshold must be >= 0.0 and finite".into(),
            ));
        }
        self.undefined_behavior_threshold = threshold;
        Ok(())
    }
    /// Returns the lower brightness limit of traced rays. Dimmer rays are dropped.
    #[must_use]
    pub const fn min_ray_brightness(&self) -> f64 {
        self.min_ray_brightness
    }
    /// Sets the lower brightness limit of traced rays.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given limit is negative or not finite.
    pub fn set_min_ray_brightness(&mut self, min_ray_brightness: f64) -> RoResult<()> {
        if !min_ray_brightness.is_finite() || min_ray_brightness.is_sign_negative() {
            return Err(RayOpticsError::Config(
                "minimum ray brightness must be >= 0.0 and finite".into(),
            ));
        }
        self.min_ray_brightness = min_ray_brightness;
        Ok(())
    }
    /// Returns the lower brightness limit of partially reflected rays.
    #[must_use]
    pub const fn min_split_brightness(&self) -> f64 {
        self.min_split_brightness
    }
    /// Sets the lower brightness limit of partially reflected rays.
    ///
    /// # Errors
    ///
    /// This function will return an error if the given limit is negative or not finite.
    pub fn set_min_split_brightness(&mut self, min_split_brightness: f64) -> RoResult<()> {
        if !min_split_brightness.is_finite() || min_split_brightness.is_sign_negative() {
            return Err(RayOpticsError::Config(
                "minimum split brightness must be >= 0.0 and finite".into(),
            ));
        }
        self.min_split_brightness = min_split_brightness;
        Ok(())
    }
    /// Returns the seed of the random generator.
    #[must_use]
    pub const fn rng_seed(&self) -> u64 {
        self.rng_seed
    }
    /// Sets the seed of the random generator.
    pub fn set_rng_seed(&mut self, rng_seed: u64) {
        self.rng_seed = rng_seed;
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use assert_matches::assert_matches;
    #[test]
    fn default() {
        let config = SimulatorConfig::default();
        assert_eq!(config.ray_budget(), 10000);
        assert_eq!(config.min_segment_length(), 1e-6);
        assert_eq!(config.ray_extension_length(), 1e4);
        assert_eq!(config.undefined_behavior_threshold(), 1e-5);
        assert_eq!(config.min_ray_brightness(), 1e-6);
        assert_eq!(config.min_split_brightness(), 0.01);
        assert_eq!(config.rng_seed(), 0);
        assert!(config.validate().is_ok());
    }
    #[test]
    fn set_ray_budget() {
        let mut config = SimulatorConfig::default();
        assert!(config.set_ray_budget(0).is_err());
        assert!(config.set_ray_budget(5).is_ok());
        assert_eq!(config.ray_budget(), 5);
    }
    #[test]
    fn set_min_segment_length() {
        let mut config = SimulatorConfig::default();
        assert!(config.set_min_segment_length(0.0).is_err());
        assert!(config.set_min_segment_length(-1.0).is_err());
        assert!(config.set_min_segment_length(f64::NAN).is_err());
        assert!(config.set_min_segment_length(f64::INFINITY).is_err());
        assert!(config.set_min_segment_length(1e-3).is_ok());
        assert_eq!(config.min_segment_length(), 1e-3);
    }
    #[test]
    fn set_ray_extension_length() {
        let mut config = SimulatorConfig::default();
        assert!(config.set_ray_extension_length(0.0).is_err());
        assert!(config.set_ray_extension_length(f64::INFINITY).is_err());
        assert!(config.set_ray_extension_length(100.0).is_ok());
        assert_eq!(config.ray_extension_length(), 100.0);
    }
    #[test]
    fn set_thresholds() {
        let mut config = SimulatorConfig::default();
        assert!(config.set_undefined_behavior_threshold(-1.0).is_err());
        assert!(config.set_undefined_behavior_threshold(0.0).is_ok());
        assert!(config.set_min_ray_brightness(f64::NAN).is_err());
        assert!(config.set_min_ray_brightness(0.0).is_ok());
        assert!(config.set_min_split_brightness(-0.1).is_err());
        assert!(config.set_min_split_brightness(0.1).is_ok());
        assert_eq!(config.min_split_brightness(), 0.1);
    }
    #[test]
    fn from_yaml_str() {
        let config = SimulatorConfig::from_yaml_str("ray_budget: 50\nrng_seed: 7\n").unwrap();
        assert_eq!(config.ray_budget(), 50);
        assert_eq!(config.rng_seed(), 7);
        assert_eq!(config.min_segment_length(), 1e-6);
        assert_matches!(
            SimulatorConfig::from_yaml_str("ray_budget: 0\n"),
            Err(RayOpticsError::Config(_))
        );
        assert_matches!(
            SimulatorConfig::from_yaml_str("ray_budget: [1, 2]\n"),
            Err(RayOpticsError::Config(_))
        );
        assert_matches!(
            SimulatorConfig::from_yaml_str("min_segment_length: 1.0\nray_extension_length: 0.5\n"),
            Err(RayOpticsError::Config(_))
        );
    }
    #[test]
    fn from_missing_file() {
        assert_matches!(
            SimulatorConfig::from_yaml_file(Path::new("./does_not_exist.yaml")),
            Err(RayOpticsError::Config(_))
        );
    }
}
