//! A mesh made of many triangles, searched through an internal [GenericBvh]
//!
//! This is the target for model ingestion: one group per material batch, with
//! the face index of each hit reported via [Intersection::side].

use getset::CopyGetters;
use indextree::{Arena, NodeId};

use crate::core::types::Number;
use crate::mesh::triangle::TriangleMesh;
use crate::mesh::Mesh;
use crate::shared::aabb::{Aabb, Bounded};
use crate::shared::generic_bvh::{BvhBuildError, GenericBvh, GenericBvhNode};
use crate::shared::intersect::Intersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

/// A triangle tagged with its position in the owning group, so that hits can
/// report which face they landed on
#[derive(Clone, Debug)]
struct IndexedTriangle {
    index: usize,
    triangle: TriangleMesh,
}

impl Bounded for IndexedTriangle {
    fn aabb(&self) -> Aabb { self.triangle.aabb() }
}

#[derive(Clone, Debug, CopyGetters)]
pub struct TriangleGroupMesh {
    bvh: GenericBvh<IndexedTriangle>,
    #[get_copy = "pub"]
    aabb: Aabb,
    /// How many triangles the group was built from
    #[get_copy = "pub"]
    count: usize,
}

impl TriangleGroupMesh {
    /// Builds a group over the given triangles
    ///
    /// # Panics
    /// If no triangles are given; an empty group has no meaningful bounds
    pub fn new(triangles: impl IntoIterator<Item = TriangleMesh>) -> Result<Self, BvhBuildError> {
        let triangles = triangles
            .into_iter()
            .enumerate()
            .map(|(index, triangle)| IndexedTriangle { index, triangle })
            .collect::<Vec<_>>();
        assert!(!triangles.is_empty(), "cannot create an empty triangle group");

        let aabb = Aabb::encompass_iter(triangles.iter().map(Bounded::aabb));
        let count = triangles.len();
        let bvh = GenericBvh::new(triangles)?;
        Ok(Self { bvh, aabb, count })
    }

    /// Recursively walks the hierarchy, returning the closest triangle hit in the subtree
    ///
    /// The search interval's far bound shrinks to the best distance found so far,
    /// so sibling subtrees entirely behind the current best are culled by the
    /// box test without touching their triangles.
    fn bvh_node_intersect(
        ray: &Ray,
        interval: &Interval<Number>,
        node: NodeId,
        arena: &Arena<GenericBvhNode<IndexedTriangle>>,
    ) -> Option<Intersection> {
        match arena.get(node).expect("node should exist in arena").get() {
            GenericBvhNode::Nested(aabb) => {
                if !aabb.hit(ray, interval) {
                    return None;
                }

                let mut search = *interval;
                let mut best: Option<Intersection> = None;
                for child in node.children(arena) {
                    let Some(i) = Self::bvh_node_intersect(ray, &search, child, arena) else {
                        continue;
                    };
                    // strictly-closer wins, so the earliest hit at a given distance is kept
                    if best.as_ref().map_or(true, |b| i.dist < b.dist) {
                        search = search.with_some_end(i.dist);
                        best = Some(i);
                    }
                }
                best
            }
            GenericBvhNode::Object(tri) => {
                let mut i = tri.triangle.intersect(ray, interval)?;
                i.side = tri.index;
                Some(i)
            }
        }
    }
}

impl Mesh for TriangleGroupMesh {
    fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<Intersection> {
        let root = self.bvh.root_id()?;
        Self::bvh_node_intersect(ray, interval, root, self.bvh.arena())
    }
}

impl Bounded for TriangleGroupMesh {
    fn aabb(&self) -> Aabb { self.aabb }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::core::types::{Point3, Vector3};
    use approx::assert_relative_eq;

    /// Two triangles forming the quad `x,y in [-1, 1]` at the given z
    fn quad(z: Number) -> [TriangleMesh; 2] {
        [
            TriangleMesh::new_flat([
                Point3::new(-1., -1., z),
                Point3::new(1., -1., z),
                Point3::new(-1., 1., z),
            ]),
            TriangleMesh::new_flat([
                Point3::new(1., 1., z),
                Point3::new(1., -1., z),
                Point3::new(-1., 1., z),
            ]),
        ]
    }

    #[test]
    fn nearest_quad_wins() {
        let group = TriangleGroupMesh::new(quad(0.).into_iter().chain(quad(1.))).expect("triangles are valid");
        assert_eq!(group.count(), 4);

        let ray = Ray::new(Point3::new(-0.5, -0.5, -1.), Vector3::new(0., 0., 1.));
        let i = group
            .intersect(&ray, &Interval::from(0.0..))
            .expect("ray passes through both quads");

        assert_relative_eq!(i.dist, 1.);
        assert_relative_eq!(i.pos_w, Point3::new(-0.5, -0.5, 0.));
        // lower-left triangle of the nearer quad
        assert_eq!(i.side, 0);
    }

    #[test]
    fn side_reports_the_covering_triangle() {
        let group = TriangleGroupMesh::new(quad(0.)).expect("triangles are valid");

        let upper_right = Ray::new(Point3::new(0.5, 0.5, -1.), Vector3::new(0., 0., 1.));
        let i = group
            .intersect(&upper_right, &Interval::from(0.0..))
            .expect("point is inside the quad");
        assert_eq!(i.side, 1);
    }

    #[test]
    fn miss_outside_every_triangle() {
        let group = TriangleGroupMesh::new(quad(0.).into_iter().chain(quad(1.))).expect("triangles are valid");
        let ray = Ray::new(Point3::new(5., 5., -1.), Vector3::new(0., 0., 1.));
        assert!(group.intersect(&ray, &Interval::from(0.0..)).is_none());
    }

    #[test]
    fn interval_window_skips_the_near_face() {
        let group = TriangleGroupMesh::new(quad(0.).into_iter().chain(quad(1.))).expect("triangles are valid");
        let ray = Ray::new(Point3::new(-0.5, -0.5, -1.), Vector3::new(0., 0., 1.));
        // near quad at t = 1 is below the window; far quad at t = 2 is in it
        let i = group
            .intersect(&ray, &Interval::from(1.5..))
            .expect("far quad is inside the window");
        assert_relative_eq!(i.dist, 2.);
    }

    #[test]
    fn matches_brute_force_over_a_stack_of_faces() {
        // a stack of large triangles at increasing depth, offset so the tree
        // actually splits along multiple axes
        let triangles = (0..32)
            .map(|n| {
                let n = n as Number;
                let (dx, dy) = ((n * 0.7).sin(), (n * 1.3).cos());
                TriangleMesh::new_flat([
                    Point3::new(-5. + dx, -5. + dy, n),
                    Point3::new(5. + dx, -5. + dy, n),
                    Point3::new(-5. + dx, 5. + dy, n),
                ])
            })
            .collect::<Vec<_>>();
        let group = TriangleGroupMesh::new(triangles.clone()).expect("triangles are valid");

        let interval = Interval::from(0.0..);
        for sample in 0..16 {
            let s = sample as Number;
            let ray = Ray::new(
                Point3::new(s * 0.2 - 2., s * 0.15 - 2., -1.),
                Vector3::new(0., 0., 1.),
            );

            let expected = triangles
                .iter()
                .enumerate()
                .filter_map(|(index, t)| t.intersect(&ray, &interval).map(|i| (index, i)))
                .min_by(|(_, a), (_, b)| a.cmp(b));
            let actual = group.intersect(&ray, &interval);

            match (expected, actual) {
                (None, None) => {}
                (Some((index, e)), Some(a)) => {
                    assert_relative_eq!(e.dist, a.dist);
                    assert_eq!(index, a.side);
                }
                (e, a) => panic!("hierarchy disagrees with brute force: expected {e:?}, got {a:?}"),
            }
        }
    }
}
