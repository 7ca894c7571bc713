//! Debug-only validation helpers for the engine's numeric invariants
//!
//! Every function here compiles to a no-op in release builds; in debug builds
//! they catch NaN/garbage values as close to the source as possible.

use approx::*;
use std::borrow::Borrow;

use crate::core::types::{Number, Point2, Point3, Vector3};
use crate::shared::intersect::Intersection;
use crate::shared::interval::Interval;
use crate::shared::ray::Ray;

macro_rules! debug_assert_only {
    () => {
        if cfg!(not(debug_assertions)) {
            return;
        }
    };
}

pub const EPSILON: Number = 1e-6;
pub const RELATIVE: Number = 1e-3;

#[inline(always)]
#[track_caller]
pub fn number(val: impl Borrow<Number>) {
    debug_assert_only!();

    let val = val.borrow();
    assert!(!val.is_nan(), "should not be nan; val: {val}");
}

#[inline(always)]
#[track_caller]
pub fn vector3(v: impl Borrow<Vector3>) {
    debug_assert_only!();
    let v = v.borrow();
    assert!(!v.is_nan(), "should not be nan; vec: {v:?}");
}

#[inline(always)]
#[track_caller]
pub fn normal3(n: impl Borrow<Vector3>) {
    debug_assert_only!();
    let n = n.borrow();
    vector3(n);
    assert!(
        n.is_normalized(),
        "should be normalised; vec: {n:?}, len: {:?}",
        n.length()
    );
}

#[inline(always)]
#[track_caller]
pub fn point3(p: impl Borrow<Point3>) {
    debug_assert_only!();
    let p = p.borrow();
    assert!(!p.is_nan(), "should not be nan; point: {p:?}");
}

#[inline(always)]
#[track_caller]
pub fn uv(uv: impl Borrow<Point2>) {
    debug_assert_only!();
    let uv = uv.borrow();
    assert!(!uv.is_nan(), "should not be nan; uvs: {uv:?}");
}

#[inline(always)]
#[track_caller]
pub fn ray(r: impl Borrow<Ray>) {
    debug_assert_only!();
    let r = r.borrow();
    point3(r.pos());
    normal3(r.dir());
}

#[inline(always)]
#[track_caller]
pub fn interval(i: impl Borrow<Interval<Number>>) {
    debug_assert_only!();
    let i = i.borrow();
    assert!(i.is_valid(), "interval invariant `start <= end` failed: {i}");
}

/// Asserts that an intersection was valid
#[inline(always)]
#[track_caller]
pub fn intersection(ray: impl Borrow<Ray>, intersect: impl Borrow<Intersection>, interval: impl Borrow<Interval<Number>>) {
    debug_assert_only!();

    let intersect = intersect.borrow();
    let interval = interval.borrow();
    let ray = ray.borrow();

    uv(&intersect.uv);
    point3(intersect.pos_w);
    number(intersect.dist);

    assert!(
        interval.contains(&intersect.dist),
        "intersect dist {} not in interval {}",
        intersect.dist,
        interval
    );

    assert!(
        Point3::relative_eq(&intersect.pos_w, &ray.at(intersect.dist), EPSILON, RELATIVE),
        "intersect position doesn't match ray at intersection dist; intersect_pos: {i_pos:?}, dist: {dist}, ray: {ray:?}, ray_pos: {r_pos:?}",
        i_pos = intersect.pos_w,
        dist = intersect.dist,
        ray = ray,
        r_pos = ray.at(intersect.dist)
    );

    normal3(intersect.ray_normal);
    normal3(intersect.normal);
}
