#![warn(missing_docs)]
//! The container of all objects of a simulation and its global settings.
use std::{cell::RefCell, rc::Rc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{RayOpticsError, RoResult},
    object_ref::ObjectRef,
    objects::SceneObject,
};

/// How the ray paths are meant to be displayed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayMode {
    /// only the actually travelled ray segments
    #[default]
    Rays,
    /// additionally the backward extensions of the rays (virtual images)
    Extended,
    /// as seen by an observer. The engine records backward extensions like in
    /// [`DisplayMode::Extended`].
    Observer,
}

/// Global simulation settings of a [`Scene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    ray_density: f64,
    length_scale: f64,
    simulate_colors: bool,
    mode: DisplayMode,
}
impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            ray_density: 0.1,
            length_scale: 1.0,
            simulate_colors: false,
            mode: DisplayMode::default(),
        }
    }
}
impl SceneSettings {
    /// Returns the ray density.
    #[must_use]
    pub const fn ray_density(&self) -> f64 {
        self.ray_density
    }
    /// Sets the ray density.
    ///
    /// The density controls the number of rays emitted by sources and scales the per-ray
    /// brightness accordingly.
    ///
    /// # Errors
    ///
    /// This function will return an error if the density is not positive or not finite.
    pub fn set_ray_density(&mut self, ray_density: f64) -> RoResult<()> {
        if !ray_density.is_finite() || ray_density <= 0.0 {
            return Err(RayOpticsError::Scene(
                "ray density must be > 0.0 and finite".into(),
            ));
        }
        self.ray_density = ray_density;
        Ok(())
    }
    /// Returns the length scale.
    #[must_use]
    pub const fn length_scale(&self) -> f64 {
        self.length_scale
    }
    /// Sets the length scale of the scene.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scale is not positive or not finite.
    pub fn set_length_scale(&mut self, length_scale: f64) -> RoResult<()> {
        if !length_scale.is_finite() || length_scale <= 0.0 {
            return Err(RayOpticsError::Scene(
                "length scale must be > 0.0 and finite".into(),
            ));
        }
        self.length_scale = length_scale;
        Ok(())
    }
    /// Returns `true` if wavelength dependent effects are simulated.
    #[must_use]
    pub const fn simulate_colors(&self) -> bool {
        self.simulate_colors
    }
    /// Enables or disables the simulation of wavelength dependent effects.
    pub fn set_simulate_colors(&mut self, simulate_colors: bool) {
        self.simulate_colors = simulate_colors;
    }
    /// Returns the display mode.
    #[must_use]
    pub const fn mode(&self) -> DisplayMode {
        self.mode
    }
    /// Sets the display mode.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        self.mode = mode;
    }
    /// Checks all values of these settings.
    ///
    /// # Errors
    ///
    /// This function will return an error if any value is out of its valid range.
    pub fn validate(&self) -> RoResult<()> {
        let mut checked = Self::default();
        checked.set_ray_density(self.ray_density)?;
        checked.set_length_scale(self.length_scale)
    }
}

/// Container of all placed objects.
///
/// Objects are kept in insertion order. Objects with optical behavior are additionally listed as
/// optical objects, which is the list the simulation works on.
#[derive(Debug, Default)]
pub struct Scene {
    objs: Vec<ObjectRef>,
    optical_objs: Vec<ObjectRef>,
    settings: SceneSettings,
    warning: Option<String>,
    error: Option<String>,
}
impl Scene {
    /// Creates a new empty [`Scene`] with the given settings.
    #[must_use]
    pub const fn new(settings: SceneSettings) -> Self {
        Self {
            objs: Vec::new(),
            optical_objs: Vec::new(),
            settings,
            warning: None,
            error: None,
        }
    }
    /// Adds an object to this [`Scene`] and returns a typed handle to it.
    ///
    /// The handle shares the object with the scene and can be used to inspect it after a
    /// simulation run (e.g. for reading detector values).
    pub fn add_object<T: SceneObject + 'static>(&mut self, object: T) -> Rc<RefCell<T>> {
        let object = Rc::new(RefCell::new(object));
        let object_ref = ObjectRef::new(object.clone(), None);
        if object_ref.is_optical() {
            self.optical_objs.push(object_ref.clone());
        }
        self.objs.push(object_ref);
        object
    }
    /// Returns the id of the object behind a handle returned by [`Scene::add_object`].
    ///
    /// Returns `None` if the object is not (or no longer) part of this [`Scene`].
    #[must_use]
    pub fn uuid_of<T: SceneObject>(&self, handle: &Rc<RefCell<T>>) -> Option<Uuid> {
        self.objs
            .iter()
            .find(|o| o.shares_object(handle))
            .map(ObjectRef::uuid)
    }
    /// Removes the object with the given id.
    ///
    /// Must not be called during a simulation run.
    ///
    /// # Errors
    ///
    /// This function will return an error if no object with the given id exists.
    pub fn remove_object(&mut self, uuid: Uuid) -> RoResult<()> {
        let len = self.objs.len();
        self.objs.retain(|o| o.uuid() != uuid);
        if self.objs.len() == len {
            return Err(RayOpticsError::Scene(format!(
                "object with id {uuid} not found"
            )));
        }
        self.optical_objs.retain(|o| o.uuid() != uuid);
        Ok(())
    }
    /// Removes all objects and clears the warning and error slots.
    pub fn clear(&mut self) {
        self.objs.clear();
        self.optical_objs.clear();
        self.warning = None;
        self.error = None;
    }
    /// Returns all objects.
    #[must_use]
    pub fn objects(&self) -> &[ObjectRef] {
        &self.objs
    }
    /// Returns the optical objects.
    #[must_use]
    pub fn optical_objects(&self) -> &[ObjectRef] {
        &self.optical_objs
    }
    /// Returns the settings of this [`Scene`].
    #[must_use]
    pub const fn settings(&self) -> &SceneSettings {
        &self.settings
    }
    /// Returns a mutable reference to the settings of this [`Scene`].
    pub fn settings_mut(&mut self) -> &mut SceneSettings {
        &mut self.settings
    }
    /// Returns the warning set by the last simulation run.
    #[must_use]
    pub fn warning(&self) -> Option<&str> {
        self.warning.as_deref()
    }
    /// Returns the error set by the last simulation run.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
    pub(crate) fn set_warning(&mut self, warning: Option<String>) {
        self.warning = warning;
    }
    pub(crate) fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}
