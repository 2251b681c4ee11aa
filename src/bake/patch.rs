//! One rasterized texel sample of a triangle.

use crate::util::Vec3;

/// A surface sample owning exactly one lightmap texel at its mip level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Patch {
    /// Row-major texel index at the patch's level: `y * (width >> level) + x`.
    pub texel_index: u32,
    /// World-space area covered by this texel's share of the triangle.
    pub area: f32,
    /// World-space sample point.
    pub position: Vec3,
    /// Flat triangle normal (unit length).
    pub normal: Vec3,
    /// Diffuse albedo.
    pub color: Vec3,
    /// Self-emission.
    pub emissive: Vec3,
    /// Source triangle corners, kept for debugging.
    pub corners: [Vec3; 3],
}

impl Patch {
    /// Texel coordinates given the row width of the patch's level.
    #[inline]
    pub fn texel(&self, level_width: u32) -> (u32, u32) {
        (self.texel_index % level_width, self.texel_index / level_width)
    }

    #[inline]
    pub fn is_emissive(&self) -> bool {
        self.emissive != Vec3::ZERO
    }
}
