use crate::core::types::{Number, Point3, Vector3};

/// An immutable parametric half-line: `pos + t * dir`, for `t` in some interval
/// (see [`crate::shared::interval::Interval`], which travels alongside the ray)
///
/// Rays are plain values; each query owns its own and nothing is ever shared
/// between concurrent queries.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct Ray {
    pos: Point3,
    dir: Vector3,
    inv_dir: Vector3,
}

impl Ray {
    pub fn new(pos: Point3, dir: Vector3) -> Self {
        let dir = dir.normalize();
        Self {
            pos,
            dir,
            inv_dir: Vector3::new(1. / dir.x, 1. / dir.y, 1. / dir.z),
        }
    }

    /// Creates a new ray, without normalising the direction vector
    ///
    /// # Safety
    /// Unsafe as it does not normalise the direction, assuming the caller
    /// provided a correct vector, possibly breaking the invariant of a normalised direction
    pub unsafe fn new_unchecked(pos: Point3, dir: Vector3) -> Self {
        Self {
            pos,
            dir,
            inv_dir: Vector3::new(1. / dir.x, 1. / dir.y, 1. / dir.z),
        }
    }

    /// World-space origin of the ray
    #[inline(always)]
    pub fn pos(&self) -> Point3 { self.pos }

    /// Direction vector of the ray.
    ///
    /// # Requirements
    /// Must be normalised
    #[inline(always)]
    pub fn dir(&self) -> Vector3 { self.dir }

    /// Component-wise reciprocal of [`Self::dir`]; precomputed for box slab tests.
    ///
    /// Components may be infinite for axis-parallel rays, which the slab test tolerates.
    #[inline(always)]
    pub fn inv_dir(&self) -> Vector3 { self.inv_dir }

    /// Gets the position at a given distance along the ray
    ///
    /// `pos + (t * dir)`
    pub fn at(&self, t: Number) -> Point3 { self.pos + (self.dir * t) }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn direction_is_normalised_on_construction() {
        let ray = Ray::new(Point3::new(1., 2., 3.), Vector3::new(0., 0., 10.));
        assert_eq!(ray.dir(), Vector3::new(0., 0., 1.));
        assert_eq!(ray.at(4.), Point3::new(1., 2., 7.));
    }

    #[test]
    fn inv_dir_is_infinite_on_parallel_axes() {
        let ray = Ray::new(Point3::ZERO, Vector3::new(1., 0., 0.));
        assert_eq!(ray.inv_dir().x, 1.);
        assert!(ray.inv_dir().y.is_infinite());
        assert!(ray.inv_dir().z.is_infinite());
    }
}
