//! Module containing the **Bounding Volume Hierarchy** (BVH) construction code
//!
//! The hierarchy accelerates ray intersection tests by narrowing the search space,
//! skipping objects that obviously can't be intersected. Construction happens once
//! per scene and is deterministic; traversal lives with the types that wrap a
//! [`GenericBvh`] (see [`crate::object::bvh`] and [`crate::mesh::group`]).

use getset::{CopyGetters, Getters};
use indextree::{Arena, NodeId};
use std::cmp::Ordering;
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use thiserror::Error;
use tracing::{debug, trace};

use crate::core::targets::BVH;
use crate::core::types::Number;
use crate::shared::aabb::{Aabb, Bounded};

/// The number of objects at/under which we create a leaf batch, instead of
/// splitting further. Chosen for tree quality, affects performance only
const MAX_LEAF_NODES: usize = 4;

#[derive(Getters, CopyGetters, Clone, Debug)]
pub struct GenericBvh<BNode: Bounded> {
    /// The backing store containing all of our objects, as well as their hierarchy
    #[get = "pub"]
    arena: Arena<GenericBvhNode<BNode>>,
    /// The node of the root object in the tree; [`None`] for an empty hierarchy
    #[get_copy = "pub"]
    root_id: Option<NodeId>,
}

/// The type for each node in the BVH tree
///
/// Nodes are either a branch point [GenericBvhNode::Nested] (whose children are
/// tracked by the arena), or a leaf [GenericBvhNode::Object] (which holds an object)
#[derive(Clone, Debug)]
pub enum GenericBvhNode<BNode: Bounded> {
    Nested(Aabb),
    Object(BNode),
}

/// A structural invariant violation detected while building a hierarchy
///
/// These are fatal: a tree built over broken bounds would silently return wrong
/// results for every query afterwards, so the build aborts instead.
#[derive(Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum BvhBuildError {
    #[error("object at index {index} has an invalid bounding box (non-finite, or min > max)")]
    InvalidAabb { index: usize },
}

impl<BNode: Bounded> GenericBvh<BNode> {
    /// Creates a new hierarchy from the given objects
    ///
    /// Every object's [Aabb] is validated up-front; a malformed box aborts the
    /// build (see [BvhBuildError]). An empty input is fine and yields an empty
    /// hierarchy that can never be hit.
    pub fn new(objects: impl IntoIterator<Item = BNode>) -> Result<Self, BvhBuildError> {
        let objects = objects.into_iter().collect::<Vec<BNode>>();

        if let Some(index) = objects.iter().position(|o| !o.aabb().is_valid()) {
            return Err(BvhBuildError::InvalidAabb { index });
        }

        let count = objects.len();
        let mut arena = Arena::with_capacity(count);
        let root_id = if objects.is_empty() {
            None
        } else {
            Some(Self::generate_nodes_sah(objects, &mut arena))
        };

        debug!(target: BVH, objects = count, nodes = arena.count(), "built hierarchy");

        Ok(Self { arena, root_id })
    }

    /// Sorts the given slice of objects along the chosen `axis`, by bounding-box centroid.
    /// This sort is *unstable* (see [sort_unstable_by](https://doc.rust-lang.org/std/primitive.slice.html#method.sort_unstable_by))
    fn sort_along_axis(axis: SplitAxis, objects: &mut [BNode]) {
        let sort_x = |a: &BNode, b: &BNode| -> Ordering {
            PartialOrd::partial_cmp(&a.aabb().centroid().x, &b.aabb().centroid().x)
                .expect("should be able to cmp AABB x-centroids: should not be nan")
        };
        let sort_y = |a: &BNode, b: &BNode| -> Ordering {
            PartialOrd::partial_cmp(&a.aabb().centroid().y, &b.aabb().centroid().y)
                .expect("should be able to cmp AABB y-centroids: should not be nan")
        };
        let sort_z = |a: &BNode, b: &BNode| -> Ordering {
            PartialOrd::partial_cmp(&a.aabb().centroid().z, &b.aabb().centroid().z)
                .expect("should be able to cmp AABB z-centroids: should not be nan")
        };

        match axis {
            SplitAxis::X => objects.sort_unstable_by(sort_x),
            SplitAxis::Y => objects.sort_unstable_by(sort_y),
            SplitAxis::Z => objects.sort_unstable_by(sort_z),
        }
    }

    /// Recursively processes the `objects`, splitting until the tree is created
    ///
    /// # **Surface-Area Heuristics** (SAH)
    /// This method uses SAH to optimise the choice of split axis and split position:
    /// for each axis the objects are sorted by centroid, then every split point is
    /// costed as `N_left * Area_left + N_right * Area_right` with a prefix/suffix
    /// area sweep, and the cheapest (axis, position) wins.
    ///
    /// Split positions range over `1..len`, so both halves are always non-empty and
    /// recursion terminates even when every bounding box is coincident.
    ///
    /// # Panics
    /// The vec of `objects` passed in must be non-empty.
    fn generate_nodes_sah(mut objects: Vec<BNode>, arena: &mut Arena<GenericBvhNode<BNode>>) -> NodeId {
        assert!(
            !objects.is_empty(),
            "internal invariant fail: must pass in a non-empty vec of objects"
        );

        if objects.len() == 1 {
            return arena.new_node(GenericBvhNode::Object(objects.remove(0)));
        }

        // Small batches aren't worth splitting; group them under one tight box
        if objects.len() <= MAX_LEAF_NODES {
            let aabb = Aabb::encompass_iter(objects.iter().map(Bounded::aabb));
            let node = arena.new_node(GenericBvhNode::Nested(aabb));
            objects.into_iter().for_each(|o| {
                node.append_value(GenericBvhNode::Object(o), arena);
            });
            return node;
        }

        // NOTE: must be computed before splitting; it is the tight union of the
        // whole subtree and that invariant is what the tests pin down
        let main_aabb = Aabb::encompass_iter(objects.iter().map(Bounded::aabb));

        let split = Self::calculate_optimal_split(&mut objects);
        Self::sort_along_axis(split.axis, &mut objects);
        let right = objects.split_off(split.pos);
        trace!(target: BVH, axis = ?split.axis, pos = split.pos, cost = split.cost, "split node");

        let main_node = arena.new_node(GenericBvhNode::Nested(main_aabb));
        let left_node = Self::generate_nodes_sah(objects, arena);
        let right_node = Self::generate_nodes_sah(right, arena);
        main_node.append(left_node, arena);
        main_node.append(right_node, arena);

        main_node
    }

    /// Given a vec of objects, calculates the optimal (axis, position) split
    ///
    /// Requires mutable access to the vec, so that elements can be sorted along axes;
    /// the sort order on return is unspecified (the caller re-sorts by the chosen axis).
    fn calculate_optimal_split(objects: &mut [BNode]) -> BvhSplit {
        let n = objects.len();
        assert!(n >= 2, "cannot split fewer than two objects (have {n})");

        let mut best: Option<BvhSplit> = None;

        for axis in SplitAxis::iter() {
            Self::sort_along_axis(axis, objects);

            // suffix_areas[i] = surface area of the union of `objects[i..]`
            let mut suffix_areas = vec![0.; n];
            let mut running: Option<Aabb> = None;
            for i in (0..n).rev() {
                let joined = match running {
                    None => objects[i].aabb(),
                    Some(r) => Aabb::encompass(r, objects[i].aabb()),
                };
                suffix_areas[i] = joined.area();
                running = Some(joined);
            }

            // sweep the split point left to right, growing the left-hand union
            let mut left: Option<Aabb> = None;
            for pos in 1..n {
                let grown = match left {
                    None => objects[pos - 1].aabb(),
                    Some(l) => Aabb::encompass(l, objects[pos - 1].aabb()),
                };
                left = Some(grown);

                let cost = (pos as Number) * grown.area() + ((n - pos) as Number) * suffix_areas[pos];
                // strictly-less keeps the earliest candidate, making the choice deterministic
                if best.map_or(true, |b| cost < b.cost) {
                    best = Some(BvhSplit { axis, pos, cost });
                }
            }
        }

        best.expect("at least one split candidate must exist for n >= 2")
    }
}

/// Enum for which axis we split along when doing SAH
#[derive(Copy, Clone, Debug, EnumIter, Hash, Ord, PartialOrd, Eq, PartialEq)]
enum SplitAxis {
    X = 0,
    Y = 1,
    Z = 2,
}

#[derive(Copy, Clone, Debug)]
struct BvhSplit {
    pub axis: SplitAxis,
    pub pos: usize,
    pub cost: Number,
}
