#![warn(missing_docs)]
//! Scene description files.
//!
//! A scene is described in YAML by a `settings` block and a list of objects, each tagged with
//! its `type`:
//!
//! ```yaml
//! settings:
//!   ray_density: 0.2
//! objects:
//!   - type: point_source
//!     position: [0.0, 0.0]
//!     brightness: 0.5
//!   - type: mirror
//!     p1: [10.0, -5.0]
//!     p2: [10.0, 5.0]
//! ```
use std::path::Path;

use log::info;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use uom::si::{f64::Length, length::nanometer};

use crate::{
    error::{RayOpticsError, RoResult},
    objects::{
        Beam, Blocker, CircleGlass, Detector, Glass, GlassMaterial, IdealLens, Mirror,
        ObjectType, PathPoint, PointSource, Ruler, SingleRay,
    },
    scene::{Scene, SceneSettings},
};

const fn default_source_brightness() -> f64 {
    0.5
}
const fn default_ray_brightness() -> f64 {
    1.0
}

/// Description of a single scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectSpec {
    /// isotropic point source
    PointSource {
        /// position of the source
        position: Point2<f64>,
        /// nominal brightness
        #[serde(default = "default_source_brightness")]
        brightness: f64,
        /// wavelength in nm
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wavelength_nm: Option<f64>,
    },
    /// collimated beam
    Beam {
        /// start point of the emitting segment
        p1: Point2<f64>,
        /// end point of the emitting segment
        p2: Point2<f64>,
        /// nominal brightness
        #[serde(default = "default_source_brightness")]
        brightness: f64,
        /// wavelength in nm
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wavelength_nm: Option<f64>,
    },
    /// single ray
    SingleRay {
        /// origin of the ray
        p1: Point2<f64>,
        /// point the ray is pointing to
        p2: Point2<f64>,
        /// brightness within `[0.0, 1.0]`
        #[serde(default = "default_ray_brightness")]
        brightness: f64,
        /// wavelength in nm
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wavelength_nm: Option<f64>,
    },
    /// ideal thin lens
    IdealLens {
        /// first end point
        p1: Point2<f64>,
        /// second end point
        p2: Point2<f64>,
        /// focal length (negative for diverging lenses)
        focal_length: f64,
    },
    /// flat mirror
    Mirror {
        /// first end point
        p1: Point2<f64>,
        /// second end point
        p2: Point2<f64>,
    },
    /// absorbing segment
    Blocker {
        /// first end point
        p1: Point2<f64>,
        /// second end point
        p2: Point2<f64>,
    },
    /// line detector
    Detector {
        /// first end point
        p1: Point2<f64>,
        /// second end point
        p2: Point2<f64>,
        /// number of irradiance bins
        #[serde(default, skip_serializing_if = "Option::is_none")]
        bin_count: Option<usize>,
    },
    /// glass body bounded by lines and arcs
    Glass {
        /// closed boundary path
        path: Vec<PathPoint>,
        /// optical material
        #[serde(default)]
        material: GlassMaterial,
    },
    /// circular glass body
    CircleGlass {
        /// center of the circle
        center: Point2<f64>,
        /// radius of the circle
        radius: f64,
        /// optical material
        #[serde(default)]
        material: GlassMaterial,
    },
    /// decorative ruler
    Ruler {
        /// first end point
        p1: Point2<f64>,
        /// second end point
        p2: Point2<f64>,
    },
}

fn wavelength(wavelength_nm: Option<f64>) -> RoResult<Option<Length>> {
    match wavelength_nm {
        Some(wl) if !wl.is_finite() || wl <= 0.0 => Err(RayOpticsError::Scene(
            "wavelength must be > 0.0 and finite".into(),
        )),
        Some(wl) => Ok(Some(Length::new::<nanometer>(wl))),
        None => Ok(None),
    }
}

impl ObjectSpec {
    /// Returns the [`ObjectType`] described by this [`ObjectSpec`].
    #[must_use]
    pub const fn object_type(&self) -> ObjectType {
        match self {
            Self::PointSource { .. } => ObjectType::PointSource,
            Self::Beam { .. } => ObjectType::Beam,
            Self::SingleRay { .. } => ObjectType::SingleRay,
            Self::IdealLens { .. } => ObjectType::IdealLens,
            Self::Mirror { .. } => ObjectType::Mirror,
            Self::Blocker { .. } => ObjectType::Blocker,
            Self::Detector { .. } => ObjectType::Detector,
            Self::Glass { .. } => ObjectType::Glass,
            Self::CircleGlass { .. } => ObjectType::CircleGlass,
            Self::Ruler { .. } => ObjectType::Ruler,
        }
    }
    /// Creates the described object and adds it to the given [`Scene`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the parameters of the description are invalid.
    pub fn add_to(&self, scene: &mut Scene) -> RoResult<()> {
        match self {
            Self::PointSource {
                position,
                brightness,
                wavelength_nm,
            } => {
                scene.add_object(PointSource::new(
                    *position,
                    *brightness,
                    wavelength(*wavelength_nm)?,
                )?);
            }
            Self::Beam {
                p1,
                p2,
                brightness,
                wavelength_nm,
            } => {
                scene.add_object(Beam::new(*p1, *p2, *brightness, wavelength(*wavelength_nm)?)?);
            }
            Self::SingleRay {
                p1,
                p2,
                brightness,
                wavelength_nm,
            } => {
                scene.add_object(SingleRay::new(
                    *p1,
                    *p2,
                    *brightness,
                    wavelength(*wavelength_nm)?,
                )?);
            }
            Self::IdealLens {
                p1,
                p2,
                focal_length,
            } => {
                scene.add_object(IdealLens::new(*p1, *p2, *focal_length)?);
            }
            Self::Mirror { p1, p2 } => {
                scene.add_object(Mirror::new(*p1, *p2)?);
            }
            Self::Blocker { p1, p2 } => {
                scene.add_object(Blocker::new(*p1, *p2)?);
            }
            Self::Detector { p1, p2, bin_count } => {
                scene.add_object(Detector::new(*p1, *p2, *bin_count)?);
            }
            Self::Glass { path, material } => {
                scene.add_object(Glass::new(path.clone(), *material)?);
            }
            Self::CircleGlass {
                center,
                radius,
                material,
            } => {
                scene.add_object(CircleGlass::new(*center, *radius, *material)?);
            }
            Self::Ruler { p1, p2 } => {
                scene.add_object(Ruler::new(*p1, *p2)?);
            }
        }
        Ok(())
    }
}

/// Serializable description of a complete [`Scene`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// global settings
    #[serde(default)]
    pub settings: SceneSettings,
    /// objects in list order
    #[serde(default)]
    pub objects: Vec<ObjectSpec>,
}
impl SceneDescription {
    /// Reads a scene description from a YAML file.
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read or parsed.
    pub fn from_yaml_file(path: &Path) -> RoResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            RayOpticsError::Scene(format!("cannot read file {} : {}", path.display(), e))
        })?;
        let description = Self::from_yaml_str(&contents)?;
        info!(
            "Scene description with {} objects read from {}",
            description.objects.len(),
            path.display()
        );
        Ok(description)
    }
    /// Parses a scene description from a YAML string.
    ///
    /// # Errors
    ///
    /// This function will return an error if the string cannot be parsed.
    pub fn from_yaml_str(yaml: &str) -> RoResult<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| RayOpticsError::Scene(format!("parsing of scene failed: {e}")))
    }
    /// Serializes this description to YAML.
    ///
    /// # Errors
    ///
    /// This function will return an error if the serialization fails.
    pub fn to_yaml(&self) -> RoResult<String> {
        serde_yaml::to_string(self)
            .map_err(|e| RayOpticsError::Scene(format!("serialization of scene failed: {e}")))
    }
    /// Builds the described [`Scene`].
    ///
    /// # Errors
    ///
    /// This function will return an error if the settings or any object description are invalid.
    /// The message names the position and type of the offending object.
    pub fn into_scene(self) -> RoResult<Scene> {
        self.settings.validate()?;
        let mut scene = Scene::new(self.settings);
        for (index, object) in self.objects.iter().enumerate() {
            object.add_to(&mut scene).map_err(|e| {
                RayOpticsError::Scene(format!(
                    "invalid object #{index} ({}): {e}",
                    object.object_type()
                ))
            })?;
        }
        Ok(scene)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scene::DisplayMode;
    use assert_matches::assert_matches;

    const SCENE: &str = "
settings:
  ray_density: 0.2
  mode: Extended
objects:
  - type: point_source
    position: [0.0, 0.0]
    wavelength_nm: 532.0
  - type: mirror
    p1: [10.0, -5.0]
    p2: [10.0, 5.0]
  - type: glass
    path:
      - point: [20.0, 0.0]
      - point: [30.0, 0.0]
        arc: true
      - point: [20.0, 10.0]
    material:
      ref_index: 1.7
  - type: detector
    p1: [40.0, -5.0]
    p2: [40.0, 5.0]
    bin_count: 10
  - type: ruler
    p1: [0.0, -20.0]
    p2: [10.0, -20.0]
";

    #[test]
    fn from_yaml_str() {
        let description = SceneDescription::from_yaml_str(SCENE).unwrap();
        assert_eq!(description.settings.ray_density(), 0.2);
        assert_eq!(description.settings.mode(), DisplayMode::Extended);
        assert_eq!(description.objects.len(), 5);
        assert_eq!(
            description.objects[0],
            ObjectSpec::PointSource {
                position: Point2::new(0.0, 0.0),
                brightness: 0.5,
                wavelength_nm: Some(532.0)
            }
        );
        assert_matches!(
            &description.objects[2],
            ObjectSpec::Glass { path, material } if path.len() == 3 && path[1].arc && material.ref_index() == 1.7 && material.cauchy_b() == 0.004
        );
        assert_eq!(description.objects[4].object_type(), ObjectType::Ruler);
    }
    #[test]
    fn empty_description() {
        let description = SceneDescription::from_yaml_str("{}").unwrap();
        assert_eq!(description, SceneDescription::default());
    }
    #[test]
    fn parse_errors() {
        assert_matches!(
            SceneDescription::from_yaml_str("objects:\n  - type: laser\n    p1: [0.0, 0.0]\n"),
            Err(RayOpticsError::Scene(_))
        );
        assert!(
            SceneDescription::from_yaml_str("objects:\n  - type: mirror\n    p1: [0.0, 0.0]\n")
                .is_err()
        );
    }
    #[test]
    fn into_scene() {
        let scene = SceneDescription::from_yaml_str(SCENE)
            .unwrap()
            .into_scene()
            .unwrap();
        assert_eq!(scene.objects().len(), 5);
        assert_eq!(scene.optical_objects().len(), 4);
        assert_eq!(scene.objects()[2].object_type(), ObjectType::Glass);
        assert_eq!(scene.settings().ray_density(), 0.2);
    }
    #[test]
    fn into_scene_invalid_object() {
        let description = SceneDescription {
            settings: SceneSettings::default(),
            objects: vec![
                ObjectSpec::Blocker {
                    p1: Point2::new(0.0, 0.0),
                    p2: Point2::new(0.0, 1.0),
                },
                ObjectSpec::Mirror {
                    p1: Point2::new(0.0, 0.0),
                    p2: Point2::new(0.0, 0.0),
                },
            ],
        };
        let e = description.into_scene().unwrap_err();
        assert!(e.to_string().starts_with("Scene:invalid object #1 (mirror)"));
    }
    #[test]
    fn invalid_wavelength() {
        assert!(wavelength(Some(0.0)).is_err());
        assert!(wavelength(Some(f64::NAN)).is_err());
        assert_eq!(wavelength(None).unwrap(), None);
        assert_eq!(
            wavelength(Some(650.0)).unwrap(),
            Some(Length::new::<nanometer>(650.0))
        );
    }
    #[test]
    fn to_yaml_and_back() {
        let description = SceneDescription::from_yaml_str(SCENE).unwrap();
        let yaml = description.to_yaml().unwrap();
        assert_eq!(SceneDescription::from_yaml_str(&yaml).unwrap(), description);
    }
}
