use enum_dispatch::enum_dispatch;
use getset::CopyGetters;
use std::borrow::Borrow;

use crate::core::types::{Number, Point3, Vector3};
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;
use crate::shared::ComponentRequirements;

/// An **Axis-Aligned Bounding Box** (AABB)
///
/// The box spans between the two corners `min` and `max`.
///
/// # Invariants
/// `min[axis] <= max[axis]` on every axis, all components finite. [`Aabb::new`]
/// sorts its corners so the only way to end up invalid is non-finite input;
/// BVH construction rejects such boxes (see [`crate::shared::generic_bvh`]).
#[derive(CopyGetters, Copy, Clone, Debug, PartialEq)]
#[getset(get_copy = "pub")]
pub struct Aabb {
    /// The lower corner of the [Aabb]; the corner with the smallest coordinates
    min: Point3,
    /// The upper corner of the [Aabb]; the corner with the largest coordinates
    max: Point3,
    /// The difference between [min](fn@Self::min) and [max](fn@Self::max); how large the [Aabb] is
    size: Vector3,
    area: Number,
    volume: Number,
}

// region Constructors

impl Aabb {
    /// Creates a new [Aabb] from two points, which do *not* have to be sorted by min/max
    pub fn new(a: impl Into<Point3>, b: impl Into<Point3>) -> Self {
        let (a, b) = (a.into(), b.into());
        let min = Point3::min(a, b);
        let max = Point3::max(a, b);
        let size = max - min;
        let area = ((size.x * size.y) + (size.y * size.z) + (size.z * size.x)) * 2.;
        let volume = size.x * size.y * size.z;
        Self {
            min,
            max,
            size,
            area,
            volume,
        }
    }

    pub fn new_centred(centre: impl Into<Point3>, size: impl Into<Vector3>) -> Self {
        let (centre, size) = (centre.into(), size.into());
        let min = centre - size / 2.;
        let max = centre + size / 2.;
        Self::new(min, max)
    }

    /// Returns an [Aabb] that surrounds the two given boxes
    pub fn encompass(a: impl Borrow<Self>, b: impl Borrow<Self>) -> Self {
        let (a, b) = (a.borrow(), b.borrow());
        let min = Point3::min(a.min, b.min);
        let max = Point3::max(a.max, b.max);
        Self::new(min, max)
    }

    /// [Self::encompass] but for an arbitrary number of boxes
    ///
    /// # Panics
    /// If the iterator is empty; an empty union has no meaningful bounds
    pub fn encompass_iter<B: Borrow<Self>>(iter: impl IntoIterator<Item = B>) -> Self {
        iter.into_iter()
            .map(|b| *b.borrow())
            .reduce(|a, b| Self::encompass(a, b))
            .expect("cannot encompass an empty iterator of boxes")
    }

    /// [Self::encompass] but for an arbitrary number of points
    ///
    /// # Panics
    /// If the iterator is empty
    pub fn encompass_points<B: Borrow<Point3>>(iter: impl IntoIterator<Item = B>) -> Self {
        let mut any = false;
        let mut min = Point3::splat(Number::INFINITY);
        let mut max = Point3::splat(Number::NEG_INFINITY);
        for p in iter.into_iter() {
            let p = *p.borrow();
            min = Point3::min(min, p);
            max = Point3::max(max, p);
            any = true;
        }
        assert!(any, "cannot encompass an empty iterator of points");
        Self::new(min, max)
    }

    /// Ensures that an AABB has all sides of at least `thresh` thickness.
    /// If any side widths between corners are less than this threshold, the [Aabb] will
    /// be expanded (away from the centre) to fit.
    pub fn min_padded(&self, thresh: Number) -> Self {
        let size = Vector3::new(
            self.size.x.max(thresh),
            self.size.y.max(thresh),
            self.size.z.max(thresh),
        );
        let centre = self.min + self.size / 2.;
        Self::new_centred(centre, size)
    }
}

// endregion Constructors

// region Helper

impl Aabb {
    /// The midpoint of the box; what BVH construction sorts on
    pub fn centroid(&self) -> Point3 { self.min + self.size / 2. }

    /// Checks the box invariants: finite corners, `min <= max` on every axis
    pub fn is_valid(&self) -> bool {
        let finite = [self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z]
            .iter()
            .all(|x| x.is_finite());
        finite && self.min.x <= self.max.x && self.min.y <= self.max.y && self.min.z <= self.max.z
    }
}

// endregion Helper

// region Impl

impl Aabb {
    /// Checks whether the given ray intersects with the AABB at any point within the given distance interval
    pub fn hit(&self, ray: &Ray, interval: &Interval<Number>) -> bool {
        /*
        CREDITS:

        Author: Tavianator
        URL:
            - <https://tavianator.com/2011/ray_box.html>
        */

        // This is actually correct, even though it appears not to handle edge cases
        // (ray.inv_dir.{x,y,z} == inf). It works because the infinities that result from
        // dividing by zero will still behave correctly in the comparisons. Rays
        // which are parallel to an axis and outside the box will have tmin == inf
        // or tmax == -inf, while rays inside the box will have tmin and tmax
        // unchanged.

        let tx1 = (self.min.x - ray.pos().x) * ray.inv_dir().x;
        let tx2 = (self.max.x - ray.pos().x) * ray.inv_dir().x;

        let mut tmin = Number::min(tx1, tx2);
        let mut tmax = Number::max(tx1, tx2);

        let ty1 = (self.min.y - ray.pos().y) * ray.inv_dir().y;
        let ty2 = (self.max.y - ray.pos().y) * ray.inv_dir().y;

        tmin = Number::max(tmin, Number::min(ty1, ty2));
        tmax = Number::min(tmax, Number::max(ty1, ty2));

        let tz1 = (self.min.z - ray.pos().z) * ray.inv_dir().z;
        let tz2 = (self.max.z - ray.pos().z) * ray.inv_dir().z;

        tmin = Number::max(tmin, Number::min(tz1, tz2));
        tmax = Number::min(tmax, Number::max(tz1, tz2));

        return interval.range_overlaps(&tmin, &tmax);
    }
}

// endregion Impl

// region Bounded trait

// Sometimes `enum_dispatch` tries to generate the enum implementations in this file's scope,
// so have to import the names here
// Don't really like it but it's what must be done

#[allow(unused)]
use crate::{mesh::MeshInstance, object::ObjectInstance};

/// Trait for any component that can report its bounding box
///
/// Only queried at build time; traversal uses the boxes stored in the tree
#[enum_dispatch]
pub trait Bounded: ComponentRequirements {
    /// Gets the bounding box for this component
    fn aabb(&self) -> Aabb;
}

// endregion Bounded trait

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb { Aabb::new(Point3::splat(-1.), Point3::splat(1.)) }

    #[test]
    fn corners_are_sorted() {
        let aabb = Aabb::new(Point3::new(1., -2., 3.), Point3::new(-1., 2., -3.));
        assert_eq!(aabb.min(), Point3::new(-1., -2., -3.));
        assert_eq!(aabb.max(), Point3::new(1., 2., 3.));
        assert_relative_eq!(aabb.volume(), 48.);
        assert_relative_eq!(aabb.area(), 88.);
    }

    #[test]
    fn encompass_is_tight() {
        let a = Aabb::new(Point3::new(0., 0., 0.), Point3::new(1., 1., 1.));
        let b = Aabb::new(Point3::new(2., -1., 0.), Point3::new(3., 0., 1.));
        let u = Aabb::encompass(a, b);
        assert_eq!(u.min(), Point3::new(0., -1., 0.));
        assert_eq!(u.max(), Point3::new(3., 1., 1.));
        assert_eq!(u, Aabb::encompass_iter([a, b]));
    }

    #[test]
    fn slab_test_hits_and_misses() {
        let aabb = unit_box();
        let full = Interval::FULL;

        let towards = Ray::new(Point3::new(0., 0., -5.), Vector3::new(0., 0., 1.));
        assert!(aabb.hit(&towards, &full));

        let away = Ray::new(Point3::new(0., 0., -5.), Vector3::new(0., 0., -1.));
        // the intersection exists on the line, but at negative t
        assert!(aabb.hit(&away, &full));
        assert!(!aabb.hit(&away, &Interval::from(0.0..)));

        let parallel_miss = Ray::new(Point3::new(0., 5., -5.), Vector3::new(0., 0., 1.));
        assert!(!aabb.hit(&parallel_miss, &full));

        let inside = Ray::new(Point3::ZERO, Vector3::new(1., 0., 0.));
        assert!(aabb.hit(&inside, &Interval::from(0.0..)));
    }

    #[test]
    fn slab_test_respects_interval_window() {
        let aabb = unit_box();
        let ray = Ray::new(Point3::new(0., 0., -5.), Vector3::new(0., 0., 1.));
        // box spans t in [4, 6]
        assert!(aabb.hit(&ray, &Interval::from(0.0..=4.0)));
        assert!(aabb.hit(&ray, &Interval::from(5.0..=100.0)));
        assert!(!aabb.hit(&ray, &Interval::from(0.0..=3.9)));
        assert!(!aabb.hit(&ray, &Interval::from(6.1..)));
    }

    #[test]
    fn validity() {
        assert!(unit_box().is_valid());
        assert!(!Aabb::new(Point3::splat(Number::NAN), Point3::splat(Number::NAN)).is_valid());
        assert!(!Aabb::new(Point3::splat(Number::NEG_INFINITY), Point3::splat(0.)).is_valid());
    }

    #[test]
    fn padding_degenerate_boxes() {
        let flat = Aabb::new(Point3::new(-1., 0., -1.), Point3::new(1., 0., 1.));
        let padded = flat.min_padded(1e-6);
        assert!(padded.size().y >= 1e-6);
        assert_relative_eq!(padded.size().x, 2.);
    }
}
