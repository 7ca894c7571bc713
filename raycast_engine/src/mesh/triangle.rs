use std::ops::Add;

use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::mesh::Mesh;
use crate::shared::aabb::{Aabb, Bounded};
use crate::shared::intersect::Intersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;
use crate::shared::validate;

/// The recommended amount of padding around AABBs for planar meshes
///
/// Because triangles are infinitely thin, we need to add padding to ensure their box
/// has at least some volume. Otherwise, there is a chance that the [Aabb] will always
/// be missed because it has zero size along one axis.
pub const PLANAR_AABB_PADDING: Number = 1e-6;

#[derive(Copy, Clone, Debug)]
pub struct TriangleMesh {
    /// The three corner vertices of the triangle
    vertices: [Point3; 3],
    /// The corresponding normal vectors at the vertices
    normals: [Vector3; 3],
    aabb: Aabb,
}

// region Constructors

impl TriangleMesh {
    /// Creates a smooth-shaded triangle: the surface normal is interpolated
    /// between the given per-vertex normals
    ///
    /// # Panics
    /// If any two vertices coincide, or any normal is not normalised.
    /// Ingestion is expected to hand the engine fully-resolved, sane geometry.
    pub fn new(vertices: impl Into<[Point3; 3]>, normals: impl Into<[Vector3; 3]>) -> Self {
        let (vertices, normals) = (vertices.into(), normals.into());

        let [a, b, c] = vertices;
        assert!(a != b && b != c && c != a, "triangles cannot have duplicate vertices");
        assert!(
            normals.into_iter().all(Vector3::is_normalized),
            "normals must be normalised"
        );
        Self {
            vertices,
            normals,
            aabb: Aabb::encompass_points(vertices).min_padded(PLANAR_AABB_PADDING),
        }
    }

    /// Creates a flat-shaded triangle: all three vertex normals are the face normal
    ///
    /// # Panics
    /// If the vertices are collinear (the face has no normal)
    pub fn new_flat(vertices: impl Into<[Point3; 3]>) -> Self {
        let vertices = vertices.into();
        let [a, b, c] = vertices;
        let face_normal = Vector3::cross(b - a, c - a)
            .try_normalize()
            .expect("degenerate triangle: vertices are collinear");
        Self::new(vertices, [face_normal; 3])
    }

    pub fn vertices(&self) -> [Point3; 3] { self.vertices }
    pub fn normals(&self) -> [Vector3; 3] { self.normals }
}

// endregion Constructors

// region Mesh Impl

impl Bounded for TriangleMesh {
    fn aabb(&self) -> Aabb { self.aabb }
}

impl Mesh for TriangleMesh {
    fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<Intersection> {
        /*
        CREDITS:

        Title: "Ray-Tracing: Rendering a Triangle (Möller-Trumbore algorithm)"
        Author: Scratchapixel
        URL: <https://www.scratchapixel.com/lessons/3d-basic-rendering/ray-tracing-rendering-a-triangle/moller-trumbore-ray-triangle-intersection.html>
        */

        let [v0, v1, v2] = self.vertices;

        let v0v1 = v1 - v0;
        let v0v2 = v2 - v0;
        let p_vec = Vector3::cross(ray.dir(), v0v2);
        let det = v0v1.dot(p_vec);

        // ray and triangle are (near-)parallel; reject instead of dividing towards NaN
        if det.abs() < validate::EPSILON {
            return None;
        }

        let inv_det = 1. / det;

        let t_vec = ray.pos() - v0;
        let u = Vector3::dot(t_vec, p_vec) * inv_det;
        if u < 0. || u > 1. {
            return None;
        }

        let q_vec = Vector3::cross(t_vec, v0v1);
        let v = Vector3::dot(ray.dir(), q_vec) * inv_det;
        if v < 0. || u + v > 1. {
            return None;
        }
        let t = Vector3::dot(v0v2, q_vec) * inv_det;

        if !interval.contains(&t) {
            return None;
        }

        let pos_w = ray.at(t);
        let bary_coords = Vector3::new(1. - u - v, u, v);
        // If we can't normalize, the vertex normals must have all added to (close to) zero
        // Therefore they must be opposing. Current way of handling this is to skip the point
        let normal = Self::interpolate_normals(self.normals, bary_coords)?;

        Some(Intersection {
            pos_w,
            pos_l: bary_coords.to_point(),
            front_face: det.is_sign_positive(),
            dist: t,
            uv: Point2::new(u, v),
            side: 0,
            ray_normal: normal * -Vector3::dot(normal, ray.dir()).signum(),
            normal,
        })
    }
}

impl TriangleMesh {
    /// Interpolates across the vertex normals for a given point in barycentric coordinates
    fn interpolate_normals(normals: [Vector3; 3], bary_coords: Vector3) -> Option<Vector3> {
        std::iter::zip(normals, bary_coords.to_array())
            .map(|(n, u)| n * u)
            .fold(Vector3::ZERO, Vector3::add)
            .try_normalize()
    }
}

// endregion Mesh Impl

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    /// Flat triangle covering the lower-left half of `x,y in [-1, 1]` at the given z
    fn lower_left_tri(z: Number) -> TriangleMesh {
        TriangleMesh::new_flat([
            Point3::new(-1., -1., z),
            Point3::new(1., -1., z),
            Point3::new(-1., 1., z),
        ])
    }

    #[test]
    fn head_on_hit_with_barycentric_uv() {
        let tri = lower_left_tri(0.);
        let ray = Ray::new(Point3::new(-0.5, -0.5, -3.), Vector3::new(0., 0., 1.));
        let i = tri
            .intersect(&ray, &Interval::from(0.0..))
            .expect("ray passes through the triangle interior");

        assert_relative_eq!(i.dist, 3.);
        assert_relative_eq!(i.pos_w, Point3::new(-0.5, -0.5, 0.));
        // barycentric weights at the midpoint-ish sample
        assert_relative_eq!(i.pos_l.x + i.pos_l.y + i.pos_l.z, 1.);
        assert_relative_eq!(i.uv, Point2::new(0.25, 0.25));
        // flat shading: normal is the face normal, opposing the ray
        assert_relative_eq!(i.ray_normal, Vector3::new(0., 0., -1.));
    }

    #[test]
    fn parallel_ray_is_rejected() {
        let tri = lower_left_tri(0.);
        let ray = Ray::new(Point3::new(-2., -0.5, 0.), Vector3::new(1., 0., 0.));
        assert!(tri.intersect(&ray, &Interval::FULL).is_none());
    }

    #[test]
    fn miss_outside_edges() {
        let tri = lower_left_tri(0.);
        // aimed at the upper-right half of the quad, which this triangle doesn't cover
        let ray = Ray::new(Point3::new(0.5, 0.5, -3.), Vector3::new(0., 0., 1.));
        assert!(tri.intersect(&ray, &Interval::from(0.0..)).is_none());
    }

    #[test]
    fn interval_rejects_hit_behind_origin() {
        let tri = lower_left_tri(0.);
        let ray = Ray::new(Point3::new(-0.5, -0.5, 3.), Vector3::new(0., 0., 1.));
        // the only crossing is at t = -3
        assert!(tri.intersect(&ray, &Interval::from(0.0..)).is_none());
        assert!(tri.intersect(&ray, &Interval::FULL).is_some());
    }

    #[test]
    fn smooth_normals_interpolate() {
        let nx = Vector3::new(1., 0., 0.);
        let nz = Vector3::new(0., 0., 1.);
        let tri = TriangleMesh::new(
            [
                Point3::new(-1., -1., 0.),
                Point3::new(1., -1., 0.),
                Point3::new(-1., 1., 0.),
            ],
            [nz, nx, nx],
        );
        let ray = Ray::new(Point3::new(-0.9, -0.9, -3.), Vector3::new(0., 0., 1.));
        let i = tri.intersect(&ray, &Interval::from(0.0..)).expect("inside the triangle");
        // near vertex 0, the interpolated normal leans towards that vertex's normal
        assert!(i.normal.z > i.normal.x);
        assert_relative_eq!(i.normal.length(), 1.);
    }

    #[test]
    #[should_panic]
    fn duplicate_vertices_panic() {
        let p = Point3::new(0., 0., 0.);
        let _ = TriangleMesh::new_flat([p, p, Point3::new(1., 0., 0.)]);
    }
}
