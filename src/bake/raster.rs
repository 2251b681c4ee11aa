//! Conservative triangle rasterization in lightmap UV space.
//!
//! Every texel whose square overlaps the UV triangle with non-zero area
//! yields one [`Patch`]. The patch samples the triangle at the centroid of
//! the texel/triangle intersection polygon. It carries the world area of
//! that intersection, so partially covered edge texels weigh less.

use crate::material::Material;
use crate::settings::EmissiveSource;
use crate::util::{
    barycentric, face_normal, polygon_signed_area, triangle_area, triangle_area_2d, Box2,
    IVec2, UVec2, Vec2, Vec3,
};

use super::clip::convex_clip;
use super::patch::Patch;

/// Texels of padding around the UV bounding box.
const CONSERVATIVE_PAD: i32 = 1;

/// A triangle ready for rasterization. UVs are in `[0, 1]` lightmap space.
#[derive(Clone, Copy, Debug)]
pub struct RasterTriangle {
    pub positions: [Vec3; 3],
    pub uvs: [Vec2; 3],
    pub color: Vec3,
    pub emissive: Vec3,
}

/// Emission of a surface under the configured [`EmissiveSource`].
pub fn resolve_emissive(source: EmissiveSource, color: Vec3, material: &Material) -> Vec3 {
    match source {
        EmissiveSource::GreenDominantHeuristic => {
            if color.y > color.x + color.z {
                color
            } else {
                Vec3::ZERO
            }
        }
        EmissiveSource::MaterialChannel => material.emissive_color().unwrap_or(Vec3::ZERO),
    }
}

/// Scan state for one triangle at one mip level. Yields patches in
/// row-major texel order.
#[derive(Clone, Debug)]
pub struct ConservativeRasterizer {
    positions: [Vec3; 3],
    /// UVs scaled to the level's texel grid.
    uvs: [Vec2; 3],
    world_area: f32,
    uv_area: f32,
    normal: Vec3,
    color: Vec3,
    emissive: Vec3,
    row_width: u32,
    min: IVec2,
    max: IVec2,
    cursor: IVec2,
}

impl ConservativeRasterizer {
    /// Set up scanning of `tri` on a `grid.x * grid.y` texel grid.
    pub fn new(tri: &RasterTriangle, grid: UVec2) -> Self {
        let scale = grid.as_vec2();
        let uvs = tri.uvs.map(|uv| uv * scale);
        let [p0, p1, p2] = tri.positions;

        let uv_area = triangle_area_2d(uvs[0], uvs[1], uvs[2]);
        let normal = face_normal(p0, p1, p2).normalize();

        // Rejected before any texel math: such UVs would not map to the grid
        let degenerate = !uvs.iter().all(|uv| uv.is_finite())
            || !(uv_area > 0.0 && uv_area.is_finite())
            || !normal.is_finite()
            || normal.length_squared() <= 0.5;
        let (min, max) = if degenerate {
            (IVec2::ZERO, IVec2::ZERO)
        } else {
            Box2::from_points(&uvs).texel_range(CONSERVATIVE_PAD, grid)
        };
        let mut cursor = min;
        if min.x >= max.x || min.y >= max.y {
            cursor.y = max.y;
        }

        Self {
            positions: tri.positions,
            uvs,
            world_area: triangle_area(p0, p1, p2),
            uv_area,
            normal,
            color: tri.color,
            emissive: tri.emissive,
            row_width: grid.x,
            min,
            max,
            cursor,
        }
    }

    /// True once every texel of the bounding box has been visited.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor.y >= self.max.y
    }

    fn advance(&mut self) {
        self.cursor.x += 1;
        if self.cursor.x >= self.max.x {
            self.cursor.x = self.min.x;
            self.cursor.y += 1;
        }
    }

    /// Try to produce a patch for one texel.
    fn sample(&self, texel: IVec2) -> Option<Patch> {
        let origin = texel.as_vec2();
        let square = [
            origin,
            origin + Vec2::X,
            origin + Vec2::ONE,
            origin + Vec2::Y,
        ];

        let poly = convex_clip(&square, &self.uvs);
        if poly.is_empty() {
            return None;
        }
        let covered = polygon_signed_area(&poly).abs();
        if !(covered > 0.0) {
            return None;
        }

        let centroid = poly.iter().copied().sum::<Vec2>() / poly.len() as f32;
        let st = barycentric(self.uvs[0], self.uvs[1], self.uvs[2], centroid);
        if !st.is_finite() {
            return None;
        }

        let [p0, p1, p2] = self.positions;
        let position = p0 + (p1 - p0) * st.x + (p2 - p0) * st.y;
        if !position.is_finite() {
            return None;
        }

        Some(Patch {
            texel_index: texel.y as u32 * self.row_width + texel.x as u32,
            area: self.world_area * (covered / self.uv_area),
            position,
            normal: self.normal,
            color: self.color,
            emissive: self.emissive,
            corners: self.positions,
        })
    }
}

impl Iterator for ConservativeRasterizer {
    type Item = Patch;

    fn next(&mut self) -> Option<Patch> {
        while !self.is_finished() {
            let texel = self.cursor;
            self.advance();
            if let Some(patch) = self.sample(texel) {
                return Some(patch);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn tri(uvs: [Vec2; 3]) -> RasterTriangle {
        // World triangle 2x2 in the XZ plane, facing +Y
        RasterTriangle {
            positions: [Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 2.0)],
            uvs,
            color: Vec3::splat(0.5),
            emissive: Vec3::ZERO,
        }
    }

    #[test]
    fn test_normal_faces_clockwise_side() {
        let t = tri([Vec2::ZERO, Vec2::X, Vec2::Y]);
        let patches: Vec<_> = ConservativeRasterizer::new(&t, UVec2::splat(4)).collect();
        assert!(!patches.is_empty());
        for p in &patches {
            assert!((p.normal - Vec3::Y).length() < 1e-6);
        }
    }

    #[test]
    fn test_area_sums_to_world_area() {
        let t = tri([Vec2::new(0.1, 0.1), Vec2::new(0.9, 0.15), Vec2::new(0.2, 0.8)]);
        let patches: Vec<_> = ConservativeRasterizer::new(&t, UVec2::new(16, 16)).collect();
        let total: f32 = patches.iter().map(|p| p.area).sum();
        assert!((total - 2.0).abs() < 1e-3, "total area {total}");
    }

    #[test]
    fn test_texels_unique_and_in_bounds() {
        let t = tri([Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]);
        let grid = UVec2::new(8, 4);
        let patches: Vec<_> = ConservativeRasterizer::new(&t, grid).collect();
        let mut seen = HashSet::new();
        for p in &patches {
            assert!(p.texel_index < grid.x * grid.y);
            assert!(seen.insert(p.texel_index), "duplicate texel {}", p.texel_index);
        }
        // Texels whose lower-left corner lies strictly below x + 2y = 8
        assert_eq!(patches.len(), 8 + 6 + 4 + 2);
    }

    #[test]
    fn test_small_triangle_single_texel() {
        let t = tri([Vec2::new(0.26, 0.26), Vec2::new(0.30, 0.26), Vec2::new(0.26, 0.30)]);
        let patches: Vec<_> = ConservativeRasterizer::new(&t, UVec2::splat(4)).collect();
        assert_eq!(patches.len(), 1);
        assert_eq!(patches[0].texel(4), (1, 1));
        assert!((patches[0].area - 2.0).abs() < 1e-4);
        // Sample lies inside the world triangle
        let p = patches[0].position;
        assert!(p.x >= 0.0 && p.z >= 0.0 && p.x + p.z <= 2.0 + 1e-5);
    }

    #[test]
    fn test_degenerate_uv_produces_nothing() {
        let t = tri([Vec2::ZERO, Vec2::new(0.5, 0.5), Vec2::ONE]);
        let mut raster = ConservativeRasterizer::new(&t, UVec2::splat(8));
        assert!(raster.is_finished());
        assert!(raster.next().is_none());
    }

    #[test]
    fn test_degenerate_world_triangle_produces_nothing() {
        let mut t = tri([Vec2::ZERO, Vec2::X, Vec2::Y]);
        t.positions = [Vec3::ZERO, Vec3::X, Vec3::X * 2.0];
        assert_eq!(ConservativeRasterizer::new(&t, UVec2::splat(8)).count(), 0);
    }

    #[test]
    fn test_huge_and_non_finite_uvs_produce_nothing() {
        let grid = UVec2::splat(16);
        let cases = [
            [Vec2::new(1e10, 0.0), Vec2::new(2e10, 0.0), Vec2::new(1e10, 1.0)],
            [Vec2::new(-1e10, 0.0), Vec2::new(-2e10, 0.0), Vec2::new(-1e10, 1.0)],
            [Vec2::new(f32::INFINITY, 0.0), Vec2::ZERO, Vec2::Y],
            [Vec2::new(f32::NEG_INFINITY, 0.0), Vec2::ZERO, Vec2::Y],
            [Vec2::new(f32::NAN, 0.0), Vec2::ZERO, Vec2::Y],
            // Collinear through the grid
            [Vec2::new(1e10, 0.0), Vec2::ZERO, Vec2::new(-1e10, 0.0)],
        ];
        for uvs in cases {
            let mut raster = ConservativeRasterizer::new(&tri(uvs), grid);
            assert!(raster.is_finished(), "{uvs:?}");
            assert!(raster.next().is_none(), "{uvs:?}");
        }
    }

    #[test]
    fn test_one_far_vertex_stays_in_bounds() {
        let grid = UVec2::splat(16);
        let t = tri([Vec2::new(1e10, 0.0), Vec2::ZERO, Vec2::Y]);
        let mut seen = HashSet::new();
        for p in ConservativeRasterizer::new(&t, grid) {
            assert!(p.texel_index < grid.x * grid.y);
            assert!(seen.insert(p.texel_index));
        }
    }

    #[test]
    fn test_out_of_range_uvs_are_clamped() {
        let t = tri([Vec2::new(-1.0, -1.0), Vec2::new(3.0, -1.0), Vec2::new(-1.0, 3.0)]);
        let grid = UVec2::splat(4);
        let patches: Vec<_> = ConservativeRasterizer::new(&t, grid).collect();
        assert_eq!(patches.len(), 16);
        assert!(patches.iter().all(|p| p.texel_index < 16));
    }

    #[test]
    fn test_resolve_emissive() {
        let m = Material::diffuse("m", Vec3::new(0.1, 0.9, 0.1));
        let green = Vec3::new(0.1, 0.9, 0.1);
        assert_eq!(resolve_emissive(EmissiveSource::GreenDominantHeuristic, green, &m), green);
        assert_eq!(
            resolve_emissive(EmissiveSource::GreenDominantHeuristic, Vec3::splat(0.5), &m),
            Vec3::ZERO
        );
        assert_eq!(resolve_emissive(EmissiveSource::MaterialChannel, green, &m), Vec3::ZERO);
    }
}
