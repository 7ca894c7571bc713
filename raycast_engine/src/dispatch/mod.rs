//! # Module [crate::dispatch]
//!
//! Fans batches of queries out over a worker pool. The scene is shared by
//! reference and never copied; results come back in the order the rays were
//! given, so callers can index them against the input batch.

use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuildError, ThreadPoolBuilder};
use std::time::Instant;
use thiserror::Error;
use tracing::debug;

use crate::core::targets::DISPATCH;
use crate::core::types::Number;
use crate::scene::Scene;
use crate::shared::intersect::ObjectIntersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

#[derive(Error, Debug)]
pub enum DispatcherBuildError {
    #[error("could not create worker thread pool: {0}")]
    ThreadPool(#[from] ThreadPoolBuildError),
}

/// Owns the worker threads that batch queries run on
///
/// Creating one is relatively expensive (it spawns OS threads); the intent is
/// one long-lived dispatcher serving many batches.
#[derive(Debug)]
pub struct Dispatcher {
    thread_pool: ThreadPool,
}

impl Dispatcher {
    /// Creates a dispatcher with one worker per available core
    pub fn new() -> Result<Self, DispatcherBuildError> { Self::with_threads(0) }

    /// Creates a dispatcher with the given number of workers
    /// (`0` means one per available core)
    pub fn with_threads(num_threads: usize) -> Result<Self, DispatcherBuildError> {
        let thread_pool = ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|id| format!("Dispatcher::worker_{id}"))
            .build()?;
        Ok(Self { thread_pool })
    }

    /// Intersects every ray in the batch against the scene, in parallel
    ///
    /// `results[i]` corresponds to `rays[i]`. Queries are independent and
    /// read-only, so no ordering between them is ever observable.
    pub fn intersect_batch(
        &self,
        scene: &Scene,
        rays: &[Ray],
        interval: &Interval<Number>,
    ) -> Vec<Option<ObjectIntersection>> {
        let start = Instant::now();
        let hits = self.thread_pool.install(|| {
            rays.par_iter()
                .map(|ray| scene.intersect(ray, interval))
                .collect::<Vec<_>>()
        });
        debug!(target: DISPATCH, rays = rays.len(), duration = ?start.elapsed(), "batch complete");
        hits
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::types::{Point3, Vector3};
    use crate::mesh::sphere::SphereBuilder;
    use crate::object::simple::SimpleObject;
    use crate::object::{MaterialToken, ObjectToken};

    fn test_scene() -> Scene {
        let objects = (0..10u64).map(|i| {
            let f = i as Number;
            SimpleObject::new(
                SphereBuilder {
                    pos: Point3::new((f * 1.3).sin() * 5., (f * 2.1).cos() * 5., f * 2.),
                    radius: 1.,
                },
                MaterialToken(i),
                ObjectToken(i),
            )
        });
        Scene::new(objects).expect("objects are valid")
    }

    fn test_rays(n: usize) -> Vec<Ray> {
        (0..n)
            .map(|i| {
                let f = i as Number;
                Ray::new(
                    Point3::new(0., 0., -5.),
                    Vector3::new((f * 0.17).sin() * 0.4, (f * 0.29).cos() * 0.4, 1.),
                )
            })
            .collect()
    }

    #[test]
    fn batch_matches_sequential_queries_in_order() {
        let scene = test_scene();
        let rays = test_rays(100);
        let interval = Interval::from(0.0..);

        let dispatcher = Dispatcher::with_threads(4).expect("pool should build");
        let batched = dispatcher.intersect_batch(&scene, &rays, &interval);

        assert_eq!(batched.len(), rays.len());
        for (ray, hit) in std::iter::zip(&rays, &batched) {
            assert_eq!(*hit, scene.intersect(ray, &interval));
        }
    }

    #[test]
    fn empty_batch_is_fine() {
        let scene = test_scene();
        let dispatcher = Dispatcher::new().expect("pool should build");
        assert!(dispatcher.intersect_batch(&scene, &[], &Interval::FULL).is_empty());
    }
}
