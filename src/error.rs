#![warn(missing_docs)]
//! Error structures of the ray optics engine
use std::{error::Error, fmt::Display};

/// Result type used throughout this crate
pub type RoResult<T> = std::result::Result<T, RayOpticsError>;

/// Errors that can be returned by the various parts of the simulation.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum RayOpticsError {
    /// error while setting up a [`Scene`](crate::scene::Scene) or one of its objects
    Scene(String),
    /// invalid geometric input (non-finite coordinates, degenerate segments, ...)
    Geometry(String),
    /// runtime errors occuring while rays are traced
    Simulation(String),
    /// invalid configuration values or unreadable configuration files
    Config(String),
    /// errors console io
    Console(String),
    /// errors not falling in one of the categories above
    Other(String),
}

impl Display for RayOpticsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scene(m) => {
                write!(f, "Scene:{m}")
            }
            Self::Geometry(m) => {
                write!(f, "Geometry:{m}")
            }
            Self::Simulation(m) => {
                write!(f, "Simulation:{m}")
            }
            Self::Config(m) => {
                write!(f, "Config:{m}")
            }
            Self::Console(m) => {
                write!(f, "Console:{m}")
            }
            Self::Other(m) => write!(f, "RayOptics Error:Other:{m}"),
        }
    }
}
impl Error for RayOpticsError {}

impl std::convert::From<String> for RayOpticsError {
    fn from(msg: String) -> Self {
        Self::Other(msg)
    }
}
#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn from() {
        let error = RayOpticsError::from("test".to_string());
        assert_eq!(error, RayOpticsError::Other("test".to_string()));
    }
    #[test]
    fn display() {
        assert_eq!(
            format!("{}", RayOpticsError::Scene("test".to_string())),
            "Scene:test"
        );
        assert_eq!(
            format!("{}", RayOpticsError::Geometry("test".to_string())),
            "Geometry:test"
        );
        assert_eq!(
            format!("{}", RayOpticsError::Simulation("test".to_string())),
            "Simulation:test"
        );
        assert_eq!(
            format!("{}", RayOpticsError::Config("test".to_string())),
            "Config:test"
        );
        assert_eq!(
            format!("{}", RayOpticsError::Console("test".to_string())),
            "Console:test"
        );
        assert_eq!(
            format!("{}", RayOpticsError::Other("test".to_string())),
            "RayOptics Error:Other:test"
        );
    }
}
