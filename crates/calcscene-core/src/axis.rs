//! Domain-to-render axis convention.
//!
//! Payloads use the mathematical "z is up" convention: `z` is the elevation
//! (the function value) and `(x, y)` span the horizontal plane. The render
//! space is y-up, so every builder routes domain coordinates through
//! [`to_render`] and nowhere else swaps axes.
//!
//! The swap itself is [`remap`], exact in `f64`. [`to_render`] applies it
//! and then narrows to the `f32` render precision.

use glam::Vec3;

/// Swaps a domain triple `(x, y, z)` into render order `(x, z, y)`.
#[inline]
#[must_use]
pub fn remap([x, y, z]: [f64; 3]) -> [f64; 3] {
    [x, z, y]
}

/// Inverse of [`remap`]: render order `(x, z, y)` back to `(x, y, z)`.
#[inline]
#[must_use]
pub fn unremap([x, z, y]: [f64; 3]) -> [f64; 3] {
    [x, y, z]
}

/// Maps a domain triple `(x, y, z)` to render space `(x, z, y)`.
///
/// Elevation becomes the vertical render axis and the domain `y` becomes
/// render-space depth.
#[inline]
#[must_use]
pub fn to_render(x: f64, y: f64, z: f64) -> Vec3 {
    let [rx, ry, rz] = remap([x, y, z]);
    Vec3::new(rx as f32, ry as f32, rz as f32)
}

/// Same as [`to_render`] for a `[x, y, z]` array.
#[inline]
#[must_use]
pub fn point_to_render(p: [f64; 3]) -> Vec3 {
    to_render(p[0], p[1], p[2])
}

/// Maps a domain-space direction to render space.
///
/// Directions follow the same swap as positions.
#[inline]
#[must_use]
pub fn direction_to_render(d: [f64; 3]) -> Vec3 {
    to_render(d[0], d[1], d[2])
}

/// Inverse of [`to_render`] up to `f32` precision.
#[inline]
#[must_use]
pub fn to_domain(render: Vec3) -> [f64; 3] {
    unremap(render.as_dvec3().to_array())
}
