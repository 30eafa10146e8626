//! Handling the `rayoptics` CLI
//!
//! This module handles the command line parsing and turns the arguments into a ready-to-run
//! [`Simulator`].
use std::path::{Path, PathBuf};

use clap::{builder::Str, Parser};

use crate::{
    config::SimulatorConfig,
    demos::Demo,
    error::{RayOpticsError, RoResult},
    get_version,
    scene::Scene,
    scene_file::SceneDescription,
    simulator::Simulator,
};

/// Command line arguments of the `rayoptics` application.
#[derive(Parser, Debug)]
#[command(author, version = Str::from(get_version()), about, long_about = None)]
pub struct Args {
    /// scene description file (YAML)
    #[arg(short, long, required_unless_present = "demo", conflicts_with = "demo")]
    pub scene: Option<PathBuf>,

    /// built-in demo scene to simulate
    #[arg(short, long, value_enum)]
    pub demo: Option<Demo>,

    /// simulator configuration file (YAML). Defaults are used if not given.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// maximum number of rays to process (overrides the value of the config file)
    #[arg(short, long)]
    pub ray_budget: Option<usize>,

    /// write all recorded ray segments as YAML to stdout
    #[arg(long)]
    pub dump_segments: bool,
}

/// Checks if the passed path points to an existing YAML file.
fn file_path_is_valid(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext == "yaml" || ext == "yml")
}

fn check_file_path(path: &Path) -> RoResult<()> {
    if file_path_is_valid(path) {
        Ok(())
    } else {
        Err(RayOpticsError::Console(format!(
            "{} is not an existing YAML file",
            path.display()
        )))
    }
}

impl Args {
    /// Loads the scene selected by these arguments.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scene file is invalid or neither a file nor a
    /// demo was given.
    pub fn load_scene(&self) -> RoResult<Scene> {
        match (&self.scene, self.demo) {
            (Some(path), _) => {
                check_file_path(path)?;
                SceneDescription::from_yaml_file(path)?.into_scene()
            }
            (None, Some(demo)) => demo.scene(),
            (None, None) => Err(RayOpticsError::Console(
                "either a scene file or a demo must be given".into(),
            )),
        }
    }
    /// Loads the simulator configuration and applies the overrides of these arguments.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is invalid or an override is out of
    /// range.
    pub fn load_config(&self) -> RoResult<SimulatorConfig> {
        let mut config = match &self.config {
            Some(path) => {
                check_file_path(path)?;
                SimulatorConfig::from_yaml_file(path)?
            }
            None => SimulatorConfig::default(),
        };
        if let Some(ray_budget) = self.ray_budget {
            config.set_ray_budget(ray_budget)?;
        }
        Ok(config)
    }
    /// Creates a [`Simulator`] for the selected scene and configuration.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scene or the config cannot be loaded.
    pub fn simulator(&self) -> RoResult<Simulator> {
        Simulator::new(self.load_scene()?, self.load_config()?)
    }
}

/// Show the program name and version information.
pub fn show_intro() {
    println!("rayoptics - 2D ray optics simulation\nversion {}\n", get_version());
}
