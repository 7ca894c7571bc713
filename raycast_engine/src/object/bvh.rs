use getset::{CopyGetters, Getters};
use indextree::{Arena, NodeId};

use crate::core::types::Number;
use crate::object::Object;
use crate::shared::aabb::{Aabb, Bounded};
use crate::shared::generic_bvh::{BvhBuildError, GenericBvh, GenericBvhNode};
use crate::shared::intersect::ObjectIntersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

/// The accelerated aggregate: a [GenericBvh] over whole objects
///
/// Queries descend the hierarchy instead of touching every object, with the
/// search interval shrinking as closer hits are found. Must always agree with
/// [crate::object::list::ObjectList] over the same objects.
#[derive(Clone, Debug, Getters, CopyGetters)]
pub struct ObjectBvh<Obj: Object> {
    #[get = "pub"]
    bvh: GenericBvh<Obj>,
    #[get_copy = "pub"]
    aabb: Aabb,
}

impl<Obj: Object> ObjectBvh<Obj> {
    /// Builds a hierarchy over the given objects
    ///
    /// # Panics
    /// If no objects are given; an empty aggregate has no meaningful bounds
    pub fn new(objects: impl IntoIterator<Item = Obj>) -> Result<Self, BvhBuildError> {
        let objects = objects.into_iter().collect::<Vec<Obj>>();
        assert!(!objects.is_empty(), "cannot create an empty object hierarchy");
        let aabb = Aabb::encompass_iter(objects.iter().map(Bounded::aabb));
        let bvh = GenericBvh::new(objects)?;
        Ok(Self { bvh, aabb })
    }

    /// Recursively walks the hierarchy, returning the closest object hit in the subtree
    ///
    /// Branch nodes whose box misses the (current) interval are skipped without
    /// descending; the interval's far bound shrinks to the best distance found
    /// so far, so later siblings prune against it.
    fn bvh_node_intersect(
        ray: &Ray,
        interval: &Interval<Number>,
        node: NodeId,
        arena: &Arena<GenericBvhNode<Obj>>,
    ) -> Option<ObjectIntersection> {
        match arena.get(node).expect("node should exist in arena").get() {
            GenericBvhNode::Nested(aabb) => {
                if !aabb.hit(ray, interval) {
                    return None;
                }

                let mut search = *interval;
                let mut best: Option<ObjectIntersection> = None;
                for child in node.children(arena) {
                    let Some(i) = Self::bvh_node_intersect(ray, &search, child, arena) else {
                        continue;
                    };
                    // strictly-closer wins, so the earliest hit at a given distance is kept
                    if best.as_ref().map_or(true, |b| i.intersection.dist < b.intersection.dist) {
                        search = search.with_some_end(i.intersection.dist);
                        best = Some(i);
                    }
                }
                best
            }
            GenericBvhNode::Object(obj) => obj.intersect(ray, interval),
        }
    }
}

impl<Obj: Object> Object for ObjectBvh<Obj> {
    fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<ObjectIntersection> {
        let root = self.bvh.root_id()?;
        Self::bvh_node_intersect(ray, interval, root, self.bvh.arena())
    }
}

impl<Obj: Object> Bounded for ObjectBvh<Obj> {
    fn aabb(&self) -> Aabb { self.aabb }
}
