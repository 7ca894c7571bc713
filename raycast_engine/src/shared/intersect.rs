use std::cmp::Ordering;

use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::object::{MaterialToken, ObjectToken};

/// A struct representing a ray-mesh intersection
///
/// Produced fresh by every intersect call and never mutated afterwards; the
/// "no hit" case is expressed as [`None`] at the call sites.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Intersection {
    /// The position in world coordinates of the intersection
    pub pos_w: Point3,
    /// The position in mesh-local coordinates of the intersection
    /// (unit-sphere point for spheres, barycentric coordinates for triangles)
    pub pos_l: Point3,
    /// Surface normal at intersection.
    /// This should point in the *outwards* direction, irrespective of the
    /// incident ray
    ///
    /// # Invariants
    /// - Must be normalised
    /// - Cannot be zero/nan
    pub normal: Vector3,
    /// Surface normal at intersection.
    /// This should point in the *opposite* direction to the incident ray
    ///
    /// # Invariants
    /// - Must be normalised
    /// - Cannot be zero/nan
    pub ray_normal: Vector3,
    pub front_face: bool,
    /// Distance along the ray that the intersection occurred
    ///
    /// # Invariants
    /// - Cannot be nan
    /// - Must be inside the interval the query was made with
    pub dist: Number,
    /// The UV coordinates for the point on the mesh's surface
    pub uv: Point2,
    /// Numeric ID for which "face" of the mesh was hit; zero for single-surface
    /// meshes, the triangle's index for grouped triangle meshes
    pub side: usize,
}

impl Eq for Intersection {}

impl PartialOrd<Self> for Intersection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for Intersection {
    fn cmp(&self, other: &Self) -> Ordering {
        Number::partial_cmp(&self.dist, &other.dist)
            .expect("couldn't compare intersection distances: invariant `.dist != NaN` failed")
    }
}

/// A mesh intersection bound to the identity of the object that was hit
///
/// This is what [`crate::scene::Scene::intersect`] returns: the geometric hit,
/// plus the stable handles the caller needs to shade it (without copying the
/// object itself).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ObjectIntersection {
    pub intersection: Intersection,
    /// Stable identity of the object that was hit
    pub token: ObjectToken,
    /// Reference to the material bound to the object at ingestion
    pub material: MaterialToken,
}

impl Eq for ObjectIntersection {}

impl PartialOrd<Self> for ObjectIntersection {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> { Some(self.cmp(other)) }
}

impl Ord for ObjectIntersection {
    fn cmp(&self, other: &Self) -> Ordering { Intersection::cmp(&self.intersection, &other.intersection) }
}
