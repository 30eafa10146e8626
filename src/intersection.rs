#![warn(missing_docs)]
//! Search for the object a ray interacts with next.
//!
//! Optical surfaces are zero-thickness boundaries. If two objects are hit at (numerically) the
//! same point, the search classifies the pair instead of picking the marginally nearer one:
//!   - two glass bodies are merged: the first one handles the ray, the other one is passed along
//!     as surface-merging object.
//!   - a glass body and a non-glass object: the non-glass object handles the ray, the glass body
//!     is merged. Undefined behavior is flagged unless the non-glass object may sit flush against
//!     glass.
//!   - two non-glass objects: undefined behavior, the object found first handles the ray.
use nalgebra::Point2;

use crate::{
    context::SimulationContext,
    geometry::distance_squared,
    object_ref::ObjectRef,
    objects::ObjectType,
    ray::Ray,
    stats::UndefinedBehaviorObjects,
};

/// Result of [`find_nearest_intersection`]
#[derive(Debug, Clone)]
pub struct NearestIntersection {
    /// the object handling the ray
    pub object: ObjectRef,
    /// the incident point
    pub point: Point2<f64>,
    /// glass bodies coinciding with the handling object at the incident point
    pub surface_merging: Vec<ObjectRef>,
    /// object types of incompatible coinciding surfaces, `None` if the incidence is well defined
    pub undefined_behavior: Option<UndefinedBehaviorObjects>,
}

struct Candidate {
    object: ObjectRef,
    point: Point2<f64>,
    distance_squared: f64,
    object_type: ObjectType,
    is_glass: bool,
    merges_with_glass: bool,
}

struct SearchState {
    nearest: Candidate,
    surface_merging: Vec<ObjectRef>,
    undefined_behavior: Option<UndefinedBehaviorObjects>,
}
impl SearchState {
    fn new(nearest: Candidate) -> Self {
        Self {
            nearest,
            surface_merging: Vec::new(),
            undefined_behavior: None,
        }
    }
    fn flag_undefined_behavior(&mut self, first: ObjectType, second: ObjectType) {
        self.undefined_behavior
            .get_or_insert(UndefinedBehaviorObjects::pair(first, second));
    }
    /// Resolves a candidate hitting the current nearest object at the same point.
    fn merge(&mut self, candidate: Candidate) {
        match (self.nearest.is_glass, candidate.is_glass) {
            (false, false) => {
                self.flag_undefined_behavior(self.nearest.object_type, candidate.object_type);
            }
            (true, true) => self.surface_merging.push(candidate.object),
            (true, false) => {
                if !candidate.merges_with_glass {
                    self.flag_undefined_behavior(self.nearest.object_type, candidate.object_type);
                }
                let glass = std::mem::replace(&mut self.nearest, candidate);
                self.surface_merging.push(glass.object);
            }
            (false, true) => {
                if !self.nearest.merges_with_glass {
                    self.flag_undefined_behavior(self.nearest.object_type, candidate.object_type);
                }
                self.surface_merging.push(candidate.object);
            }
        }
    }
}

/// Finds the object the given (extended) ray hits first.
///
/// Intersections closer to the ray origin than the minimum segment length are ignored. Returns
/// `None` if the ray escapes.
#[must_use]
pub fn find_nearest_intersection(
    ray: &Ray,
    objects: &[ObjectRef],
    ctx: &SimulationContext,
) -> Option<NearestIntersection> {
    let min_distance_squared = ctx.min_segment_length_squared();
    let coincidence_threshold = ctx.coincidence_threshold_squared();
    let mut state: Option<SearchState> = None;
    for object in objects {
        let candidate = {
            let borrowed = object.borrow();
            let Some(optical) = borrowed.as_optical() else {
                continue;
            };
            let Some(point) = optical.check_ray_intersects(ray, ctx) else {
                continue;
            };
            Candidate {
                object: object.clone(),
                point,
                distance_squared: distance_squared(&ray.p1(), &point),
                object_type: borrowed.object_type(),
                is_glass: optical.is_glass(),
                merges_with_glass: optical.merges_with_glass(),
            }
        };
        if candidate.distance_squared < min_distance_squared {
            continue;
        }
        match &mut state {
            Some(current)
                if distance_squared(&current.nearest.point, &candidate.point)
                    < coincidence_threshold =>
            {
                current.merge(candidate);
            }
            Some(current) if candidate.distance_squared >= current.nearest.distance_squared => {}
            _ => state = Some(SearchState::new(candidate)),
        }
    }
    state.map(|state| NearestIntersection {
        object: state.nearest.object,
        point: state.nearest.point,
        surface_merging: state.surface_merging,
        undefined_behavior: state.undefined_behavior,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        config::SimulatorConfig,
        objects::{Blocker, Glass, GlassMaterial, Mirror, SceneObject},
        scene::{Scene, SceneSettings},
    };
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use assert_matches::assert_matches;
    use std::collections::HashSet;
    use uuid::Uuid;

    fn ray(p1: (f64, f64), p2: (f64, f64)) -> Ray {
        Ray::new(Point2::new(p1.0, p1.1), Point2::new(p2.0, p2.1))
            .unwrap()
            .extended(1.0e4)
            .unwrap()
    }
    fn mirror(x: f64, y1: f64, y2: f64) -> Mirror {
        Mirror::new(Point2::new(x, y1), Point2::new(x, y2)).unwrap()
    }
    fn glass_block(x1: f64, x2: f64) -> Glass {
        Glass::rectangle(
            Point2::new(x1, -1.0),
            Point2::new(x2, 1.0),
            GlassMaterial::default(),
        )
        .unwrap()
    }
    fn blocker(x: f64) -> Blocker {
        Blocker::new(Point2::new(x, -1.0), Point2::new(x, 1.0)).unwrap()
    }
    fn interface_set(nearest: &NearestIntersection) -> HashSet<Uuid> {
        nearest
            .surface_merging
            .iter()
            .map(ObjectRef::uuid)
            .chain(std::iter::once(nearest.object.uuid()))
            .collect()
    }
    #[test]
    fn no_objects() {
        let ctx = SimulationContext::default();
        assert!(find_nearest_intersection(&ray((0.0, 0.0), (1.0, 0.0)), &[], &ctx).is_none());
    }
    #[test]
    fn nearest_object_wins() {
        let mut scene = Scene::default();
        scene.add_object(mirror(5.0, -1.0, 1.0));
        scene.add_object(mirror(2.0, -1.0, 1.0));
        scene.add_object(mirror(8.0, -1.0, 1.0));
        let ctx = SimulationContext::default();
        let nearest =
            find_nearest_intersection(&ray((0.0, 0.0), (1.0, 0.0)), scene.optical_objects(), &ctx)
                .unwrap();
        assert_eq!(nearest.object.uuid(), scene.optical_objects()[1].uuid());
        assert_abs_diff_eq!(nearest.point.x, 2.0);
        assert!(nearest.surface_merging.is_empty());
        assert_eq!(nearest.undefined_behavior, None);
    }
    #[test]
    fn escaping_ray() {
        let mut scene = Scene::default();
        scene.add_object(mirror(5.0, -1.0, 1.0));
        let ctx = SimulationContext::default();
        assert!(find_nearest_intersection(
            &ray((0.0, 0.0), (-1.0, 0.0)),
            scene.optical_objects(),
            &ctx
        )
        .is_none());
    }
    #[test]
    fn coincident_glass_bodies_merge_in_any_order() {
        let mut ctx = SimulationContext::default();
        let mut results = Vec::new();
        for swapped in [false, true] {
            let mut scene = Scene::default();
            let (a, b) = (glass_block(-2.0, 0.0), glass_block(0.0, 2.0));
            if swapped {
                scene.add_object(b);
                scene.add_object(a);
            } else {
                scene.add_object(a);
                scene.add_object(b);
            }
            let mut r = ray((-1.0, 0.5), (0.0, 0.7));
            let nearest =
                find_nearest_intersection(&r, scene.optical_objects(), &ctx).unwrap();
            assert_eq!(nearest.undefined_behavior, None);
            assert_eq!(nearest.surface_merging.len(), 1);
            assert_eq!(interface_set(&nearest).len(), 2);
            let all: HashSet<Uuid> = scene.optical_objects().iter().map(ObjectRef::uuid).collect();
            assert_eq!(interface_set(&nearest), all);
            let result = nearest
                .object
                .borrow_mut()
                .as_optical_mut()
                .unwrap()
                .on_ray_incident(&mut r, 0, nearest.point, &nearest.surface_merging, &mut ctx)
                .unwrap();
            assert!(!result.is_undefined_behavior);
            assert!(result.new_rays.is_empty());
            results.push(r);
        }
        let (d1, d2) = (
            results[0].direction().unwrap(),
            results[1].direction().unwrap(),
        );
        assert_relative_eq!(d1.x, d2.x, epsilon = 1e-12);
        assert_relative_eq!(d1.y, d2.y, epsilon = 1e-12);
        assert_relative_eq!(results[0].total_brightness(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(results[1].total_brightness(), 1.0, epsilon = 1e-12);
    }
    #[test]
    fn coincident_mirrors_are_undefined() {
        let mut scene = Scene::default();
        scene.add_object(mirror(0.0, -10.0, 10.0));
        scene.add_object(mirror(0.0, 0.0, 20.0));
        let ctx = SimulationContext::default();
        let nearest = find_nearest_intersection(
            &ray((-5.0, 5.0), (0.0, 5.0)),
            scene.optical_objects(),
            &ctx,
        )
        .unwrap();
        assert!(nearest.surface_merging.is_empty());
        assert_eq!(nearest.object.uuid(), scene.optical_objects()[0].uuid());
        assert_eq!(
            nearest.undefined_behavior,
            Some(UndefinedBehaviorObjects::pair(
                ObjectType::Mirror,
                ObjectType::Mirror
            ))
        );
    }
    #[test]
    fn glass_with_compatible_object() {
        for swapped in [false, true] {
            let mut scene = Scene::default();
            if swapped {
                scene.add_object(blocker(2.0));
                scene.add_object(glass_block(0.0, 2.0));
            } else {
                scene.add_object(glass_block(0.0, 2.0));
                scene.add_object(blocker(2.0));
            }
            let ctx = SimulationContext::default();
            let nearest = find_nearest_intersection(
                &ray((1.0, 0.0), (2.0, 0.0)),
                scene.optical_objects(),
                &ctx,
            )
            .unwrap();
            assert_eq!(nearest.undefined_behavior, None);
            assert_eq!(nearest.object.object_type(), ObjectType::Blocker);
            assert_eq!(nearest.surface_merging.len(), 1);
            assert_eq!(nearest.surface_merging[0].object_type(), ObjectType::Glass);
        }
    }
    #[test]
    fn glass_with_incompatible_object() {
        let mut scene = Scene::default();
        scene.add_object(glass_block(0.0, 2.0));
        scene.add_object(mirror(2.0, -1.0, 1.0));
        let ctx = SimulationContext::default();
        let nearest =
            find_nearest_intersection(&ray((1.0, 0.0), (2.0, 0.0)), scene.optical_objects(), &ctx)
                .unwrap();
        assert_eq!(nearest.object.object_type(), ObjectType::Mirror);
        assert_eq!(nearest.surface_merging[0].object_type(), ObjectType::Glass);
        assert_eq!(
            nearest.undefined_behavior,
            Some(UndefinedBehaviorObjects::pair(
                ObjectType::Glass,
                ObjectType::Mirror
            ))
        );
        let mut scene = Scene::default();
        scene.add_object(mirror(2.0, -1.0, 1.0));
        scene.add_object(glass_block(0.0, 2.0));
        let nearest =
            find_nearest_intersection(&ray((1.0, 0.0), (2.0, 0.0)), scene.optical_objects(), &ctx)
                .unwrap();
        assert_eq!(nearest.object.object_type(), ObjectType::Mirror);
        assert_eq!(nearest.surface_merging[0].object_type(), ObjectType::Glass);
        assert_eq!(
            nearest.undefined_behavior,
            Some(UndefinedBehaviorObjects::pair(
                ObjectType::Mirror,
                ObjectType::Glass
            ))
        );
    }
    #[test]
    fn nearer_hit_resets_merging() {
        let mut scene = Scene::default();
        scene.add_object(mirror(5.0, -1.0, 1.0));
        scene.add_object(mirror(5.0, -2.0, 2.0));
        scene.add_object(glass_block(5.0, 7.0));
        scene.add_object(blocker(2.0));
        let ctx = SimulationContext::default();
        let nearest =
            find_nearest_intersection(&ray((0.0, 0.0), (1.0, 0.0)), scene.optical_objects(), &ctx)
                .unwrap();
        assert_eq!(nearest.object.object_type(), ObjectType::Blocker);
        assert_abs_diff_eq!(nearest.point.x, 2.0);
        assert!(nearest.surface_merging.is_empty());
        assert_eq!(nearest.undefined_behavior, None);
    }
    #[test]
    fn farther_hit_keeps_merging() {
        let mut scene = Scene::default();
        scene.add_object(glass_block(0.0, 2.0));
        scene.add_object(blocker(2.0));
        scene.add_object(mirror(5.0, -1.0, 1.0));
        let ctx = SimulationContext::default();
        let nearest =
            find_nearest_intersection(&ray((1.0, 0.0), (2.0, 0.0)), scene.optical_objects(), &ctx)
                .unwrap();
        assert_eq!(nearest.object.object_type(), ObjectType::Blocker);
        assert_eq!(nearest.surface_merging.len(), 1);
    }
    #[test]
    fn own_origin_is_never_hit() {
        let mut scene = Scene::default();
        scene.add_object(mirror(0.0, -1.0, 1.0));
        scene.add_object(blocker(3.0));
        let ctx = SimulationContext::default();
        let nearest =
            find_nearest_intersection(&ray((0.0, 0.5), (1.0, 0.5)), scene.optical_objects(), &ctx)
                .unwrap();
        assert_eq!(nearest.object.object_type(), ObjectType::Blocker);
    }
    #[test]
    fn minimum_segment_length_is_not_scaled_at_origin() {
        let mut settings = SceneSettings::default();
        settings.set_length_scale(0.1).unwrap();
        let ctx = SimulationContext::new(&settings, &SimulatorConfig::default());
        let mut scene = Scene::new(settings);
        scene.add_object(mirror(5.0e-7, -1.0, 1.0));
        scene.add_object(blocker(1.0));
        let r = ray((0.0, 0.0), (1.0, 0.0));
        assert_matches!(
            scene.optical_objects()[0]
                .borrow()
                .as_optical()
                .unwrap()
                .check_ray_intersects(&r, &ctx),
            Some(_)
        );
        let nearest = find_nearest_intersection(&r, scene.optical_objects(), &ctx).unwrap();
        assert_eq!(nearest.object.object_type(), ObjectType::Blocker);
    }
}
