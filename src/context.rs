#![warn(missing_docs)]
//! Per-run environment handed to the optical objects
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    config::SimulatorConfig,
    scene::{DisplayMode, SceneSettings},
};

/// Scene settings and engine thresholds valid during one simulation run, plus the seeded random
/// generator used by glass bodies for their inside/outside test.
#[derive(Debug, Clone)]
pub struct SimulationContext {
    ray_density: f64,
    length_scale: f64,
    simulate_colors: bool,
    mode: DisplayMode,
    min_segment_length: f64,
    min_split_brightness: f64,
    rng: StdRng,
}
impl SimulationContext {
    /// Creates a new [`SimulationContext`] for a run with the given settings.
    #[must_use]
    pub fn new(settings: &SceneSettings, config: &SimulatorConfig) -> Self {
        Self {
            ray_density: settings.ray_density(),
            length_scale: settings.length_scale(),
            simulate_colors: settings.simulate_colors(),
            mode: settings.mode(),
            min_segment_length: config.min_segment_length(),
            min_split_brightness: config.min_split_brightness(),
            rng: StdRng::seed_from_u64(config.rng_seed()),
        }
    }
    /// Returns the ray density of the scene.
    #[must_use]
    pub const fn ray_density(&self) -> f64 {
        self.ray_density
    }
    /// Returns the length scale of the scene.
    #[must_use]
    pub const fn length_scale(&self) -> f64 {
        self.length_scale
    }
    /// Returns `true` if refractive indices depend on the wavelength of a ray.
    #[must_use]
    pub const fn simulate_colors(&self) -> bool {
        self.simulate_colors
    }
    /// Returns the display mode of the scene.
    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }
    /// Returns the minimum brightness of a partially reflected ray. Dimmer reflections are truncated.
    #[must_use]
    pub const fn min_split_brightness(&self) -> f64 {
        self.min_split_brightness
    }
    /// Squared minimum segment length, not scaled. Used for rejecting hits at a ray's own origin.
    #[must_use]
    pub fn min_segment_length_squared(&self) -> f64 {
        self.min_segment_length * self.min_segment_length
    }
    /// Squared distance below which two points are considered to coincide.
    #[must_use]
    pub fn coincidence_threshold_squared(&self) -> f64 {
        self.min_segment_length_squared() * self.length_scale * self.length_scale
    }
    /// Returns a random number in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}
impl Default for SimulationContext {
    fn default() -> Self {
        Self::new(&SceneSettings::default(), &SimulatorConfig::default())
    }
}
