use std::fmt::Debug;

pub mod aabb;
pub mod generic_bvh;
pub mod intersect;
pub mod interval;
pub mod ray;
pub mod validate;

/// A simple marker trait that enforces a few other traits we need
/// on every component in the engine
///
/// Everything a scene stores must be cloneable and shareable across the
/// query worker threads
pub trait ComponentRequirements: Debug + Clone + Send + Sync {}
impl<T: Debug + Clone + Send + Sync> ComponentRequirements for T {}
