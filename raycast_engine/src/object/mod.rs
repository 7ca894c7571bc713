//! # Module [crate::object]
//!
//! The identity layer on top of [crate::mesh]: objects pair geometry with the
//! stable handles ([ObjectToken], [MaterialToken]) that hits are reported under,
//! and provide the aggregates that group objects for querying.

use enum_dispatch::enum_dispatch;
use std::fmt::{Display, Formatter};

use crate::core::types::{IdToken, Number};
use crate::shared::aabb::Bounded;
use crate::shared::intersect::ObjectIntersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;
use crate::shared::ComponentRequirements;

// noinspection ALL - Used by enum_dispatch macro
#[allow(unused_imports)]
use self::{bvh::ObjectBvh, list::ObjectList, simple::SimpleObject};

pub mod bvh;
pub mod list;
pub mod simple;

// region Tokens

/// Stable identity of an object within a scene
///
/// Assigned at ingestion and carried through every intersection that lands on
/// the object; the engine itself only ever compares and reports these
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ObjectToken(pub IdToken);

/// Reference to a material, owned by whatever shading system sits above the engine
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct MaterialToken(pub IdToken);

impl Display for ObjectToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{:016X}", self.0) }
}
impl Display for MaterialToken {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{:016X}", self.0) }
}

// endregion Tokens

// region Object trait

/// The main trait for an object in a scene; a queryable unit of geometry plus identity
///
/// Unlike [crate::mesh::Mesh], hits are reported as [ObjectIntersection]s, which
/// bind the geometric hit to the tokens of the object that produced it.
#[enum_dispatch]
pub trait Object: ComponentRequirements + Bounded {
    /// Attempts to intersect the ray with this object (or, for aggregates, the
    /// closest of the contained objects), within the given distance interval
    fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<ObjectIntersection>;
}

/// A closed set of object variants with static dispatch; see [crate::mesh::MeshInstance]
/// for the reasoning
#[enum_dispatch(Object, Bounded)]
#[derive(Clone, Debug)]
pub enum ObjectInstance {
    SimpleObject(SimpleObject),
    ObjectList(ObjectList<ObjectInstance>),
    ObjectBvh(ObjectBvh<ObjectInstance>),
}

// endregion Object trait
