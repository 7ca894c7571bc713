//! # Module [crate::mesh]
//!
//! This module contains the submodules for the different mesh (see [Mesh] and [MeshInstance]) types:
//! the raw geometry layer, with one closed-form ray solve per shape.
//!
//! # DEV: Code Structure
//!
//! Meshes are placed into named submodules which are publicly exported. Shapes with
//! derived/cached values are split into a "Builder" struct holding the publicly accessible
//! properties, and a "Mesh" struct holding the built (immutable, precomputed) state.
//! Each mesh gets an entry in [MeshInstance] for static dispatch.

use enum_dispatch::enum_dispatch;

use crate::core::types::Number;
use crate::shared::aabb::Bounded;
use crate::shared::intersect::Intersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;
use crate::shared::ComponentRequirements;

// noinspection ALL - Used by enum_dispatch macro
#[allow(unused_imports)]
use self::{group::TriangleGroupMesh, sphere::SphereMesh, triangle::TriangleMesh};

pub mod group;
pub mod sphere;
pub mod triangle;

// region Mesh trait

#[enum_dispatch]
pub trait Mesh: ComponentRequirements + Bounded {
    /// Attempts to perform an intersection between the given ray and the target mesh
    ///
    /// # Return Value
    /// This should return the *closest* intersection that is within the given interval, else [None].
    /// Numerical edge cases (parallel rays, degenerate geometry) are absorbed here and
    /// reported as [None], never as garbage values.
    ///
    /// # Purity
    /// Must be a pure function of `(self, ray, interval)` — no interior mutability,
    /// no allocation — so that queries can run concurrently over a shared scene.
    fn intersect(&self, ray: &Ray, interval: &Interval<Number>) -> Option<Intersection>;
}

/// An optimised implementation of [Mesh]: a closed set of shape variants with
/// static dispatch, avoiding indirect calls on the query hot path
#[enum_dispatch(Mesh, Bounded)]
#[derive(Clone, Debug)]
pub enum MeshInstance {
    SphereMesh,
    TriangleMesh,
    TriangleGroupMesh,
}

// endregion Mesh trait
