//! # Module [crate::scene]
//!
//! The top-level container and query entry point: a [Scene] owns an immutable
//! aggregate of objects and answers closest-hit queries against it.

use getset::CopyGetters;
use thiserror::Error;
use tracing::debug;

use crate::core::targets::SCENE;
use crate::core::types::Number;
use crate::object::bvh::ObjectBvh;
use crate::object::list::ObjectList;
use crate::object::simple::SimpleObject;
use crate::object::{Object, ObjectInstance, ObjectToken};
use crate::shared::aabb::Bounded;
use crate::shared::generic_bvh::BvhBuildError;
use crate::shared::intersect::ObjectIntersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;
use crate::shared::validate;

/// A reason the scene could not be assembled
///
/// Build failures are surfaced here instead of during queries: once a [Scene]
/// exists, every query on it is infallible (a miss is [None], not an error).
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum SceneBuildError {
    #[error("object {token} has an invalid bounding box (non-finite, or min > max)")]
    InvalidAabb { token: ObjectToken },
    #[error("could not build the object hierarchy: {0}")]
    Bvh(#[from] BvhBuildError),
}

/// The scene is the engine's unit of querying: built once from ingested
/// objects, then shared (immutably) across however many query workers want it
#[derive(Clone, Debug, CopyGetters)]
pub struct Scene {
    /// The root aggregate; [None] for a scene with no objects, which every
    /// query trivially misses
    root: Option<ObjectInstance>,
    #[get_copy = "pub"]
    object_count: usize,
}

impl Scene {
    /// Builds a scene with an accelerated (hierarchy-backed) aggregate
    ///
    /// This is the default choice; see [Scene::new_unaccelerated] for the
    /// brute-force equivalent.
    pub fn new(objects: impl IntoIterator<Item = SimpleObject>) -> Result<Self, SceneBuildError> {
        let objects = Self::validated(objects)?;
        let object_count = objects.len();
        let root = if objects.is_empty() {
            None
        } else {
            Some(ObjectBvh::new(objects.into_iter().map(ObjectInstance::from))?.into())
        };
        debug!(target: SCENE, objects = object_count, accelerated = true, "built scene");
        Ok(Self { root, object_count })
    }

    /// Builds a scene that queries by testing every object in turn
    ///
    /// Gives identical results to [Scene::new] over the same objects; queries
    /// cost `O(n)` instead of roughly `O(log n)`
    pub fn new_unaccelerated(objects: impl IntoIterator<Item = SimpleObject>) -> Result<Self, SceneBuildError> {
        let objects = Self::validated(objects)?;
        let object_count = objects.len();
        let root = if objects.is_empty() {
            None
        } else {
            Some(ObjectList::new(objects.into_iter().map(ObjectInstance::from)).into())
        };
        debug!(target: SCENE, objects = object_count, accelerated = false, "built scene");
        Ok(Self { root, object_count })
    }

    /// Rejects objects whose bounding box is malformed, identifying the
    /// offender by token rather than by position in the input
    fn validated(objects: impl IntoIterator<Item = SimpleObject>) -> Result<Vec<SimpleObject>, SceneBuildError> {
        let objects = objects.into_iter().collect::<Vec<_>>();
        if let Some(bad) = objects.iter().find(|o| !o.aabb().is_valid()) {
            return Err(SceneBuildError::InvalidAabb { token: bad.token() });
        }
        Ok(objects)
    }

    pub fn is_empty(&self) -> bool { self.root.is_none() }

    /// Finds the closest intersection along `ray` within `interval`
    ///
    /// Returns [None] when nothing is hit, and also when the interval is
    /// invalid (`start > end`): an empty search window cannot contain a hit.
    pub fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<ObjectIntersection> {
        validate::ray(ray);
        if !interval.is_valid() {
            return None;
        }
        self.root.as_ref()?.intersect(ray, interval)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::types::{Point3, Vector3};
    use crate::mesh::sphere::SphereBuilder;
    use crate::object::MaterialToken;
    use approx::assert_relative_eq;

    fn sphere_at(z: Number, radius: Number, token: u64) -> SimpleObject {
        SimpleObject::new(
            SphereBuilder {
                pos: Point3::new(0., 0., z),
                radius,
            },
            MaterialToken(token),
            ObjectToken(token),
        )
    }

    #[test]
    fn empty_scene_always_misses() {
        let scene = Scene::new([]).expect("empty scene is fine");
        assert!(scene.is_empty());
        let ray = Ray::new(Point3::ZERO, Vector3::new(0., 0., 1.));
        assert!(scene.intersect(&ray, &Interval::FULL).is_none());
    }

    #[test]
    fn closest_object_is_reported() {
        let scene = Scene::new([sphere_at(10., 1., 1), sphere_at(5., 1., 2)]).expect("objects are valid");
        let ray = Ray::new(Point3::ZERO, Vector3::new(0., 0., 1.));

        let hit = scene
            .intersect(&ray, &Interval::from(0.0..))
            .expect("both spheres are ahead");
        assert_eq!(hit.token, ObjectToken(2));
        assert_relative_eq!(hit.intersection.dist, 4.);
    }

    #[test]
    fn invalid_interval_is_a_miss_not_a_panic() {
        let scene = Scene::new([sphere_at(5., 1., 1)]).expect("object is valid");
        let ray = Ray::new(Point3::ZERO, Vector3::new(0., 0., 1.));
        assert!(scene.intersect(&ray, &Interval::from(3.0..=1.0)).is_none());
    }

    #[test]
    fn malformed_object_is_rejected_by_token() {
        let err = Scene::new([sphere_at(5., 1., 1), sphere_at(10., Number::NAN, 99)])
            .expect_err("nan radius produces an invalid box");
        assert_eq!(err, SceneBuildError::InvalidAabb { token: ObjectToken(99) });
    }

    #[test]
    fn accelerated_and_unaccelerated_scenes_agree() {
        let objects = (0..20u64)
            .map(|i| {
                let f = i as Number;
                SimpleObject::new(
                    SphereBuilder {
                        pos: Point3::new((f * 1.7).sin() * 10., (f * 2.3).cos() * 10., f),
                        radius: 0.5 + (f * 0.9).sin().abs(),
                    },
                    MaterialToken(i),
                    ObjectToken(i),
                )
            })
            .collect::<Vec<_>>();

        let fast = Scene::new(objects.clone()).expect("objects are valid");
        let slow = Scene::new_unaccelerated(objects).expect("objects are valid");

        let interval = Interval::from(0.0..);
        for sample in 0..32 {
            let s = sample as Number;
            let ray = Ray::new(
                Point3::new(0., 0., -5.),
                Vector3::new((s * 0.3).sin() * 0.5, (s * 0.7).cos() * 0.5, 1.),
            );
            let (a, b) = (fast.intersect(&ray, &interval), slow.intersect(&ray, &interval));
            match (a, b) {
                (None, None) => {}
                (Some(a), Some(b)) => {
                    assert_relative_eq!(a.intersection.dist, b.intersection.dist);
                    assert_eq!(a.token, b.token);
                }
                (a, b) => panic!("query modes disagree: accelerated {a:?}, unaccelerated {b:?}"),
            }
        }
    }
}
