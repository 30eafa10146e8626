//! This is the documentation for the **rayoptics** package, a two-dimensional geometric ray-optics
//! simulation engine.
//!
//! A [`Scene`](scene::Scene) holds light sources, mirrors, lenses, blockers, detectors and glass
//! bodies. The [`Simulator`](simulator::Simulator) traces the rays emitted by the sources through
//! the scene and records the travelled [`RaySegment`](ray_segment::RaySegment)s. Objects whose
//! surfaces coincide at an incident point are resolved by surface merging: glass bodies sharing a
//! face act as one optical interface, and blockers or detectors sitting flush on a glass surface
//! are handled alongside it. Unresolvable coincidences are reported as undefined behavior.
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod console;
pub mod context;
pub mod demos;
pub mod error;
pub mod geometry;
pub mod intersection;
pub mod object_ref;
pub mod objects;
pub mod ray;
pub mod ray_segment;
pub mod scene;
pub mod scene_file;
pub mod simulator;
pub mod stats;
pub mod utils;

pub use scene::Scene;
pub use simulator::Simulator;

/// Return the version information of the currently built `rayoptics` executable.
#[must_use]
pub fn get_version() -> String {
    format!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn get_ver() {
        let version_string = get_version();
        assert!(version_string.starts_with("rayoptics "));
        assert!(version_string.ends_with(env!("CARGO_PKG_VERSION")));
    }
}
