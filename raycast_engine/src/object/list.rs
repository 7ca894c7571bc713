use getset::{CopyGetters, Getters};

use crate::core::types::Number;
use crate::object::Object;
use crate::shared::aabb::{Aabb, Bounded};
use crate::shared::intersect::ObjectIntersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

/// An unaccelerated aggregate: intersects by testing every object in turn
///
/// Every query costs `O(n)`; this exists as the reference behaviour that the
/// accelerated aggregate ([crate::object::bvh::ObjectBvh]) must agree with,
/// and as the sensible choice for a handful of objects.
#[derive(Clone, Debug, Getters, CopyGetters)]
pub struct ObjectList<Obj: Object> {
    #[get = "pub"]
    objects: Vec<Obj>,
    #[get_copy = "pub"]
    aabb: Aabb,
}

impl<Obj: Object> ObjectList<Obj> {
    /// # Panics
    /// If no objects are given; an empty aggregate has no meaningful bounds
    pub fn new(objects: impl IntoIterator<Item = Obj>) -> Self {
        let objects = objects.into_iter().collect::<Vec<Obj>>();
        assert!(!objects.is_empty(), "cannot create an empty object list");
        let aabb = Aabb::encompass_iter(objects.iter().map(Bounded::aabb));
        Self { objects, aabb }
    }
}

impl<Obj: Object> Object for ObjectList<Obj> {
    fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<ObjectIntersection> {
        // `min` keeps the first of equally-distant hits, so ties break towards
        // the earlier object, same as the accelerated traversal
        self.objects
            .iter()
            .filter_map(|o| o.intersect(ray, interval))
            .min()
    }
}

impl<Obj: Object> Bounded for ObjectList<Obj> {
    fn aabb(&self) -> Aabb { self.aabb }
}
