#![warn(missing_docs)]
//! Built-in demonstration scenes.
use clap::ValueEnum;
use nalgebra::Point2;
use strum::{Display, EnumIter};

use crate::{
    error::RoResult,
    objects::{GlassMaterial, PathPoint},
    scene::{Scene, SceneSettings},
    scene_file::{ObjectSpec, SceneDescription},
};

/// Available demo scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter, ValueEnum)]
#[strum(serialize_all = "kebab-case")]
pub enum Demo {
    /// point source collimated by an ideal lens
    Collimator,
    /// a ray crossing two glass blocks sharing a face
    GlassStack,
    /// a blocker sitting flush on the exit face of a glass block
    FlushBlocker,
    /// two overlapping mirrors (undefined behavior)
    MirrorOverlap,
    /// dispersion of three colored beams in a prism
    Prism,
}

fn point(x: f64, y: f64) -> Point2<f64> {
    Point2::new(x, y)
}
fn block(x1: f64, y1: f64, x2: f64, y2: f64) -> ObjectSpec {
    ObjectSpec::Glass {
        path: vec![
            PathPoint::corner(x1, y1),
            PathPoint::corner(x2, y1),
            PathPoint::corner(x2, y2),
            PathPoint::corner(x1, y2),
        ],
        material: GlassMaterial::default(),
    }
}
fn test_ray() -> ObjectSpec {
    ObjectSpec::SingleRay {
        p1: point(-5.0, 2.0),
        p2: point(0.0, 1.0),
        brightness: 1.0,
        wavelength_nm: None,
    }
}

impl Demo {
    /// Returns the description of this demo scene.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scene settings are invalid.
    pub fn description(self) -> RoResult<SceneDescription> {
        let mut settings = SceneSettings::default();
        let objects = match self {
            Self::Collimator => vec![
                ObjectSpec::PointSource {
                    position: point(0.0, 0.0),
                    brightness: 0.5,
                    wavelength_nm: None,
                },
                ObjectSpec::IdealLens {
                    p1: point(100.0, -50.0),
                    p2: point(100.0, 50.0),
                    focal_length: 100.0,
                },
                ObjectSpec::Blocker {
                    p1: point(200.0, -60.0),
                    p2: point(200.0, 60.0),
                },
            ],
            Self::GlassStack => vec![
                block(0.0, -5.0, 10.0, 5.0),
                block(10.0, -5.0, 20.0, 5.0),
                test_ray(),
            ],
            Self::FlushBlocker => vec![
                block(0.0, -5.0, 10.0, 5.0),
                ObjectSpec::Blocker {
                    p1: point(10.0, -5.0),
                    p2: point(10.0, 5.0),
                },
                test_ray(),
            ],
            Self::MirrorOverlap => vec![
                ObjectSpec::Mirror {
                    p1: point(0.0, -10.0),
                    p2: point(0.0, 10.0),
                },
                ObjectSpec::Mirror {
                    p1: point(0.0, 0.0),
                    p2: point(0.0, 20.0),
                },
                ObjectSpec::SingleRay {
                    p1: point(-5.0, 5.0),
                    p2: point(0.0, 5.0),
                    brightness: 1.0,
                    wavelength_nm: None,
                },
            ],
            Self::Prism => {
                settings.set_simulate_colors(true);
                settings.set_ray_density(1.0)?;
                let mut objects = vec![ObjectSpec::Glass {
                    path: vec![
                        PathPoint::corner(0.0, 0.0),
                        PathPoint::corner(20.0, 0.0),
                        PathPoint::corner(10.0, 17.0),
                    ],
                    material: GlassMaterial::default(),
                }];
                objects.extend([450.0, 532.0, 650.0].map(|wavelength| ObjectSpec::Beam {
                    p1: point(-20.0, 9.0),
                    p2: point(-20.0, 3.0),
                    brightness: 0.1,
                    wavelength_nm: Some(wavelength),
                }));
                objects
            }
        };
        Ok(SceneDescription { settings, objects })
    }
    /// Builds this demo scene.
    ///
    /// # Errors
    ///
    /// This function will return an error if the scene cannot be built.
    pub fn scene(self) -> RoResult<Scene> {
        self.description()?.into_scene()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::SimulatorConfig,
        objects::ObjectType,
        ray_segment::{RaySegment, SegmentEnd},
        simulator::Simulator,
        stats::UndefinedBehaviorObjects,
        utils::test_helper::test_helper::check_warnings,
    };
    use approx::assert_abs_diff_eq;
    use strum::IntoEnumIterator;

    fn run(demo: Demo) -> Simulator {
        let mut simulator =
            Simulator::new(demo.scene().unwrap(), SimulatorConfig::default()).unwrap();
        simulator.run().unwrap();
        simulator
    }
    fn end_point(segment: &RaySegment) -> Option<Point2<f64>> {
        match segment.end() {
            SegmentEnd::Point(p) => Some(p),
            SegmentEnd::Infinity { .. } => None,
        }
    }
    #[test]
    fn names() {
        assert_eq!(Demo::GlassStack.to_string(), "glass-stack");
        assert_eq!(
            Demo::from_str("mirror-overlap", false).unwrap(),
            Demo::MirrorOverlap
        );
        assert_eq!(Demo::value_variants().len(), Demo::iter().count());
    }
    #[test]
    fn all_demos_build() {
        for demo in Demo::iter() {
            assert!(demo.scene().is_ok(), "{demo}");
        }
    }
    #[test]
    fn collimator() {
        let simulator = run(Demo::Collimator);
        assert_eq!(simulator.stats().undefined_behavior_brightness(), 0.0);
        let collimated: Vec<_> = simulator
            .segments()
            .iter()
            .filter(|s| (s.p1().x - 100.0).abs() < 1e-9)
            .collect();
        assert!(!collimated.is_empty());
        for segment in collimated {
            let end = end_point(segment).unwrap();
            assert_abs_diff_eq!(end.x, 200.0, epsilon = 1e-9);
            assert_abs_diff_eq!(end.y, segment.p1().y, epsilon = 1e-9);
        }
    }
    #[test]
    fn glass_stack() {
        let simulator = run(Demo::GlassStack);
        let stats = simulator.stats();
        assert_eq!(stats.undefined_behavior_brightness(), 0.0);
        assert_eq!(stats.undefined_behavior_objects(), None);
        assert_eq!(simulator.scene().warning(), None);
        let segments = simulator.segments();
        let crossing: Vec<_> = segments
            .iter()
            .filter(|s| (s.p1().x - 10.0).abs() < 1e-9)
            .collect();
        assert!(!crossing.is_empty());
        for segment in crossing {
            let incoming = segments
                .iter()
                .find(|s| end_point(s).is_some_and(|p| (p - segment.p1()).norm() < 1e-9))
                .unwrap();
            assert_abs_diff_eq!(
                incoming.total_brightness(),
                segment.total_brightness(),
                epsilon = 1e-12
            );
            let d_in = end_point(incoming).unwrap() - incoming.p1();
            let d_out = segment.end_point_or(1.0) - segment.p1();
            assert_abs_diff_eq!(
                d_in.normalize().dot(&d_out.normalize()),
                1.0,
                epsilon = 1e-9
            );
        }
    }
    #[test]
    fn flush_blocker() {
        let simulator = run(Demo::FlushBlocker);
        let stats = simulator.stats();
        assert_eq!(stats.undefined_behavior_brightness(), 0.0);
        assert_eq!(stats.undefined_behavior_objects(), None);
        assert_eq!(simulator.scene().warning(), None);
        assert!(simulator
            .segments()
            .iter()
            .any(|s| end_point(s).is_some_and(|p| (p.x - 10.0).abs() < 1e-9)));
        for segment in simulator.segments() {
            assert!(segment.p1().x < 10.0 - 1e-9);
            if let Some(p) = end_point(segment) {
                assert!(p.x < 10.0 + 1e-9);
            }
        }
    }
    #[test]
    fn mirror_overlap() {
        testing_logger::setup();
        let simulator = run(Demo::MirrorOverlap);
        let stats = simulator.stats();
        assert_abs_diff_eq!(stats.undefined_behavior_brightness(), 1.0);
        assert_eq!(
            stats.undefined_behavior_objects(),
            Some(UndefinedBehaviorObjects::pair(
                ObjectType::Mirror,
                ObjectType::Mirror
            ))
        );
        let warning = "Undefined behavior detected (total brightness 1.000e0) involving mirror and mirror. The simulation result may be incorrect.";
        assert_eq!(simulator.scene().warning(), Some(warning));
        check_warnings(vec![warning]);
    }
    #[test]
    fn prism() {
        let simulator = run(Demo::Prism);
        assert!(simulator.scene().settings().simulate_colors());
        assert_eq!(simulator.scene().error(), None);
        assert!(simulator.stats().processed_rays() > 0);
        assert!(simulator.segments().iter().any(|s| s.wavelength().is_some()));
    }
}
