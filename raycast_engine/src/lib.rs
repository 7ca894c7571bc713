//! # `raycast_engine`
//!
//! The scene-intersection core of the `raycast` project: given a [`shared::ray::Ray`] and an
//! immutable [`scene::Scene`], find the closest surface hit (or none).
//!
//! The engine is split into layers:
//! - [`mesh`] — raw geometry and the per-shape intersection solves
//! - [`object`] — geometry bound to an identity and a material reference
//! - [`scene`] — the single public query entry point over a built object hierarchy
//! - [`dispatch`] — the data-parallel batch query loop
//!
//! Scene ingestion (file parsing, material resolution), cameras and shading live outside
//! this crate; they only interact through [`scene::Scene::new`] and [`scene::Scene::intersect`].

pub mod core;
pub mod dispatch;
pub mod mesh;
pub mod object;
pub mod scene;
pub mod shared;
