#![warn(missing_docs)]
//! The ray tracing engine.
//!
//! A [`Simulator`] owns a [`Scene`] and traces the rays emitted by its sources. The pending rays
//! form a queue which is scanned front to back. Rays spawned by an incidence are appended and thus
//! processed in the same pass. A ray continuing after an incidence keeps its slot and is revisited
//! in the next pass. The run is done once a pass ends without any continuing ray.
//!
//! The engine can be driven in batches using [`Simulator::step`], which allows a host to interleave
//! other work between batches. Results are identical to an uninterrupted [`Simulator::run`].
use log::{debug, error, info, warn};
use strum::Display;

use crate::{
    config::SimulatorConfig,
    context::SimulationContext,
    error::RoResult,
    intersection::find_nearest_intersection,
    ray::Ray,
    ray_segment::RaySegment,
    scene::{DisplayMode, Scene},
    stats::{BrightnessScale, SimulationStats, UndefinedBehaviorObjects},
};

/// State of a [`Simulator`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SimulationState {
    /// rays are being processed
    Running,
    /// rays are pending, processing continues with the next [`Simulator::step`]
    Paused,
    /// no rays are pending
    Done,
}

/// The ray tracing engine
#[derive(Debug)]
pub struct Simulator {
    scene: Scene,
    config: SimulatorConfig,
    ctx: SimulationContext,
    pending: Vec<Option<Ray>>,
    index: usize,
    left: usize,
    segments: Vec<RaySegment>,
    stats: SimulationStats,
    state: SimulationState,
}
impl Simulator {
    /// Creates a new [`Simulator`] for the given scene.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config or the scene settings are invalid.
    pub fn new(scene: Scene, config: SimulatorConfig) -> RoResult<Self> {
        config.validate()?;
        scene.settings().validate()?;
        let ctx = SimulationContext::new(scene.settings(), &config);
        Ok(Self {
            scene,
            config,
            ctx,
            pending: Vec::new(),
            index: 0,
            left: 0,
            segments: Vec::new(),
            stats: SimulationStats::default(),
            state: SimulationState::Done,
        })
    }
    /// Prepares a new run: resets all results and lets every optical object emit its initial
    /// rays.
    ///
    /// # Errors
    ///
    /// This function will return an error if an object fails to initialize.
    pub fn start(&mut self) -> RoResult<()> {
        self.scene.settings().validate()?;
        self.pending.clear();
        self.index = 0;
        self.left = 0;
        self.segments.clear();
        self.stats = SimulationStats::default();
        self.scene.set_warning(None);
        self.scene.set_error(None);
        self.ctx = SimulationContext::new(self.scene.settings(), &self.config);
        let objects = self.scene.optical_objects().to_vec();
        for object in &objects {
            let mut object = object.borrow_mut();
            let Some(optical) = object.as_optical_mut() else {
                continue;
            };
            let result = optical.on_simulation_start(&mut self.ctx)?;
            self.stats.add_truncation(result.truncation);
            if let Some(scale) = result.brightness_scale {
                self.stats.merge_brightness_scale(scale);
            }
            for ray in result.new_rays {
                self.enqueue(ray);
            }
        }
        info!(
            "Starting simulation with {} optical objects and {} initial rays",
            objects.len(),
            self.pending.len()
        );
        self.state = SimulationState::Paused;
        Ok(())
    }
    /// Processes up to `max_rays` rays.
    ///
    /// Returns [`SimulationState::Paused`] if rays are still pending or [`SimulationState::Done`]
    /// if the queue is exhausted or the ray budget is used up.
    pub fn step(&mut self, max_rays: usize) -> SimulationState {
        if self.state == SimulationState::Done {
            return self.state;
        }
        self.state = SimulationState::Running;
        let mut processed = 0;
        loop {
            if self.index >= self.pending.len() {
                if self.left == 0 {
                    self.pending.clear();
                    self.index = 0;
                    self.state = SimulationState::Done;
                    return self.state;
                }
                self.pending.retain(Option::is_some);
                self.index = 0;
                self.left = 0;
                continue;
            }
            if self.stats.processed_rays() >= self.config.ray_budget() {
                self.stop_for_budget();
                return self.state;
            }
            if processed >= max_rays {
                self.state = SimulationState::Paused;
                return self.state;
            }
            let Some(ray) = self.pending[self.index].take() else {
                self.index += 1;
                continue;
            };
            self.stats.count_processed_ray();
            processed += 1;
            if let Some(continued) = self.process_ray(ray, self.index) {
                self.pending[self.index] = Some(continued);
                self.left += 1;
            }
            self.index += 1;
        }
    }
    /// Runs a complete simulation: [`start`](Self::start), processing of all rays and
    /// [`finish`](Self::finish).
    ///
    /// # Errors
    ///
    /// This function will return an error if an object fails to initialize.
    pub fn run(&mut self) -> RoResult<()> {
        self.start()?;
        while self.step(usize::MAX) != SimulationState::Done {}
        self.finish();
        Ok(())
    }
    /// Finalizes a run: lets every optical object finalize its statistics and writes the
    /// validation warnings to the scene.
    pub fn finish(&mut self) {
        for object in self.scene.optical_objects() {
            if let Some(optical) = object.borrow_mut().as_optical_mut() {
                optical.on_simulation_end();
            }
        }
        let warnings = self.validation_warnings();
        for warning in &warnings {
            warn!("{warning}");
        }
        self.scene
            .set_warning((!warnings.is_empty()).then(|| warnings.join("\n")));
        info!(
            "Simulation finished: {} rays processed, {} segments recorded",
            self.stats.processed_rays(),
            self.segments.len()
        );
        self.state = SimulationState::Done;
    }
    /// Queues a ray for processing. The ray is ignored if the ray budget is used up.
    pub fn add_ray(&mut self, ray: Ray) {
        if self.stats.processed_rays() >= self.config.ray_budget() {
            debug!("ray budget used up, ignoring added ray");
            return;
        }
        self.enqueue(ray);
        if self.state == SimulationState::Done {
            self.state = SimulationState::Paused;
        }
    }
    /// Returns the segments recorded so far.
    #[must_use]
    pub fn segments(&self) -> &[RaySegment] {
        &self.segments
    }
    /// Returns the statistics of the current run.
    #[must_use]
    pub const fn stats(&self) -> &SimulationStats {
        &self.stats
    }
    /// Returns the number of rays waiting for processing.
    #[must_use]
    pub fn pending_ray_count(&self) -> usize {
        self.pending.iter().flatten().count()
    }
    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> SimulationState {
        self.state
    }
    /// Returns the config of this [`Simulator`].
    #[must_use]
    pub const fn config(&self) -> &SimulatorConfig {
        &self.config
    }
    /// Returns the simulated scene.
    #[must_use]
    pub const fn scene(&self) -> &Scene {
        &self.scene
    }
    /// Returns the simulated scene for modification. Must not be used while a run is in progress.
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }
    /// Consumes this [`Simulator`] and returns its scene.
    #[must_use]
    pub fn into_scene(self) -> Scene {
        self.scene
    }
    fn enqueue(&mut self, ray: Ray) {
        let brightness = ray.total_brightness();
        if brightness <= self.config.min_ray_brightness() {
            self.stats.add_truncation(brightness);
        } else {
            self.pending.push(Some(ray));
        }
    }
    fn record(&mut self, segment: RoResult<RaySegment>) {
        match segment {
            Ok(segment) => self.segments.push(segment),
            Err(e) => {
                error!("Rejecting degenerate ray segment: {e}");
                self.stats.count_degenerate_ray();
            }
        }
    }
    fn stop_for_budget(&mut self) {
        self.stats.set_budget_exhausted();
        for ray in self.pending.drain(..).flatten() {
            self.stats.add_truncation(ray.total_brightness());
        }
        self.index = 0;
        self.left = 0;
        self.state = SimulationState::Done;
    }
    /// Traces one ray to the next object. Returns the continuing ray, if any.
    fn process_ray(&mut self, ray: Ray, ray_index: usize) -> Option<Ray> {
        let ray = match ray.extended(self.config.ray_extension_length()) {
            Ok(ray) => ray,
            Err(e) => {
                error!("Rejecting degenerate ray: {e}");
                self.stats.count_degenerate_ray();
                return None;
            }
        };
        if matches!(
            self.ctx.mode(),
            DisplayMode::Extended | DisplayMode::Observer
        ) && !ray.is_new()
        {
            self.record(RaySegment::backward_extension(&ray));
        }
        let Some(nearest) =
            find_nearest_intersection(&ray, self.scene.optical_objects(), &self.ctx)
        else {
            self.record(RaySegment::escaping(&ray));
            return None;
        };
        let brightness = ray.total_brightness();
        if let Some(objects) = nearest.undefined_behavior {
            self.stats.add_undefined_behavior(brightness, objects);
        }
        self.record(RaySegment::truncated(&ray, nearest.point));
        let handler_type = nearest.object.object_type();
        let mut continued = ray;
        let result = {
            let mut object = nearest.object.borrow_mut();
            let optical = object.as_optical_mut()?;
            optical.on_ray_incident(
                &mut continued,
                ray_index,
                nearest.point,
                &nearest.surface_merging,
                &mut self.ctx,
            )
        };
        let result = match result {
            Ok(result) => result,
            Err(e) => {
                error!("Ray dropped at {handler_type}: {e}");
                if self.scene.error().is_none() {
                    self.scene.set_error(Some(e.to_string()));
                }
                return None;
            }
        };
        if result.is_undefined_behavior && nearest.undefined_behavior.is_none() {
            self.stats.add_undefined_behavior(
                brightness,
                UndefinedBehaviorObjects::single(handler_type),
            );
        }
        self.stats.add_truncation(result.truncation);
        for new_ray in result.new_rays {
            self.enqueue(new_ray);
        }
        if result.is_absorbed {
            return None;
        }
        continued.set_new(false);
        let brightness = continued.total_brightness();
        if brightness <= self.config.min_ray_brightness() {
            self.stats.add_truncation(brightness);
            return None;
        }
        Some(continued)
    }
    fn validation_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        let ub_brightness = self.stats.undefined_behavior_brightness();
        if ub_brightness > self.config.undefined_behavior_threshold() {
            let objects = self
                .stats
                .undefined_behavior_objects()
                .map_or_else(|| "unknown objects".to_owned(), |o| o.to_string());
            warnings.push(format!(
                "Undefined behavior detected (total brightness {ub_brightness:.3e}) involving {objects}. The simulation result may be incorrect."
            ));
        }
        if self.stats.budget_exhausted() {
            warnings.push(format!(
                "Simulation stopped: maximum ray count ({}) reached",
                self.config.ray_budget()
            ));
        }
        if self.stats.brightness_scale() == BrightnessScale::Inconsistent {
            warnings.push(
                "Sources use different brightness scales. Ray brightness is not comparable between sources.".into(),
            );
        }
        warnings
    }
}
