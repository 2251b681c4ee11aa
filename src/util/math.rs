//! Math type re-exports and baking-specific geometry helpers.
//!
//! This module re-exports the `glam` types used across the crate and
//! provides the small 2D/3D helpers the rasterizer needs (UV bounds,
//! triangle areas, barycentric inversion).

// Re-export glam types
pub use glam::{IVec2, UVec2, Vec2, Vec3, Vec4};

use std::fmt;

/// 2D bounding box in texel space.
#[derive(Clone, Copy, PartialEq)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    /// Empty bounding box (inverted, will expand on first point).
    pub const EMPTY: Self = Self {
        min: Vec2::splat(f32::INFINITY),
        max: Vec2::splat(f32::NEG_INFINITY),
    };

    /// Smallest box containing all `points`.
    pub fn from_points(points: &[Vec2]) -> Self {
        let mut b = Self::EMPTY;
        for &p in points {
            b.expand_by_point(p);
        }
        b
    }

    /// Expand this box to include a point.
    #[inline]
    pub fn expand_by_point(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Integer texel range covering this box, padded by `pad` texels on every
    /// side and clamped to `[0, limit)`. Returned as `(min, max_exclusive)`.
    ///
    /// Clamping happens before the integer conversion, so huge or
    /// non-finite coordinates yield an in-range (possibly empty) span.
    pub fn texel_range(&self, pad: i32, limit: UVec2) -> (IVec2, IVec2) {
        let pad = Vec2::splat(pad as f32);
        let limit = limit.as_vec2();
        let lo = (self.min.floor() - pad).max(Vec2::ZERO).min(limit);
        let hi = (self.max.ceil() + pad).max(Vec2::ZERO).min(limit);
        (lo.as_ivec2(), hi.as_ivec2())
    }
}

impl Default for Box2 {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl fmt::Debug for Box2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Box2({:?} - {:?})", self.min, self.max)
    }
}

/// Unsigned area of a 3D triangle.
#[inline]
pub fn triangle_area(p0: Vec3, p1: Vec3, p2: Vec3) -> f32 {
    (p1 - p0).cross(p2 - p0).length() * 0.5
}

/// Unnormalized geometric normal, `(p2 - p0) x (p1 - p0)`.
///
/// Front faces wind clockwise when seen from the side the normal points to.
#[inline]
pub fn face_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p2 - p0).cross(p1 - p0)
}

/// Unsigned area of a 2D triangle.
#[inline]
pub fn triangle_area_2d(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a).abs() * 0.5
}

/// Signed shoelace area of a closed polygon (positive when counter-clockwise).
pub fn polygon_signed_area(poly: &[Vec2]) -> f32 {
    let Some(&last) = poly.last() else { return 0.0 };
    let mut prev = last;
    let mut twice = 0.0;
    for &p in poly {
        twice += prev.perp_dot(p);
        prev = p;
    }
    twice * 0.5
}

/// Barycentric inversion: returns `(s, t)` such that `p = a + s*(b-a) + t*(c-a)`.
///
/// A degenerate triangle yields non-finite coordinates; callers check with
/// `Vec2::is_finite`.
#[inline]
pub fn barycentric(a: Vec2, b: Vec2, c: Vec2, p: Vec2) -> Vec2 {
    let v0 = b - a;
    let v1 = c - a;
    let v2 = p - a;
    let denom = v0.perp_dot(v1);
    Vec2::new(v2.perp_dot(v1) / denom, v0.perp_dot(v2) / denom)
}
