use getset::{CopyGetters, Getters};

use crate::core::types::Number;
use crate::mesh::{Mesh, MeshInstance};
use crate::object::{MaterialToken, Object, ObjectToken};
use crate::shared::aabb::{Aabb, Bounded};
use crate::shared::intersect::ObjectIntersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;
use crate::shared::validate;

/// A single mesh bound to an identity and a material
///
/// This is the leaf of the object layer: everything a scene stores eventually
/// bottoms out in these.
#[derive(Clone, Debug, Getters, CopyGetters)]
pub struct SimpleObject {
    #[get = "pub"]
    mesh: MeshInstance,
    #[get_copy = "pub"]
    material: MaterialToken,
    #[get_copy = "pub"]
    token: ObjectToken,
}

impl SimpleObject {
    pub fn new(mesh: impl Into<MeshInstance>, material: MaterialToken, token: ObjectToken) -> Self {
        Self {
            mesh: mesh.into(),
            material,
            token,
        }
    }
}

impl Object for SimpleObject {
    fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<ObjectIntersection> {
        let intersection = self.mesh.intersect(ray, interval)?;
        validate::intersection(ray, &intersection, interval);
        Some(ObjectIntersection {
            intersection,
            token: self.token,
            material: self.material,
        })
    }
}

impl Bounded for SimpleObject {
    fn aabb(&self) -> Aabb { self.mesh.aabb() }
}
