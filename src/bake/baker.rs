//! The lightmapper: rasterize geometry into patches, then light them.

use crate::geom::{Camera, Geometry, Light};
use crate::settings::BakeSettings;
use crate::util::{Result, UVec2, Vec3};

use super::direct::compute_direct_light;
use super::indirect::{compute_indirect_light_bounce, GatherParams};
use super::level::MipLevel;
use super::lightmap::Lightmap;
use super::patch::Patch;
use super::raster::{resolve_emissive, ConservativeRasterizer, RasterTriangle};
use super::raycast::Raycaster;

/// Outcome of [`Lightmapper::set_geometry`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BakeStats {
    /// Triangles fed to the rasterizer.
    pub triangles: usize,
    /// Subsets skipped for lacking a material or a diffuse color.
    pub skipped_subsets: usize,
    /// Patches kept at each level, finest first.
    pub patches_per_level: Vec<usize>,
    /// Level-0 patches that carry emission.
    pub emissive_patches: usize,
}

impl BakeStats {
    pub fn total_patches(&self) -> usize {
        self.patches_per_level.iter().sum()
    }
}

/// Bakes static lighting into a lightmap.
///
/// Typical use: [`set_geometry`](Self::set_geometry) once, then
/// [`render_light`](Self::render_light) for direct light, then
/// [`render`](Self::render) for the indirect bounce into the front buffer.
#[derive(Debug)]
pub struct Lightmapper {
    settings: BakeSettings,
    levels: Vec<MipLevel>,
    front: Lightmap,
}

impl Lightmapper {
    /// Validate settings and allocate the output image.
    pub fn new(settings: BakeSettings) -> Result<Self> {
        settings.validate()?;
        let front = Lightmap::new(settings.width, settings.height);
        Ok(Self {
            settings,
            levels: Vec::new(),
            front,
        })
    }

    pub fn settings(&self) -> &BakeSettings {
        &self.settings
    }

    pub fn width(&self) -> u32 {
        self.settings.width
    }

    pub fn height(&self) -> u32 {
        self.settings.height
    }

    /// Number of mip levels built by the last `set_geometry`.
    pub fn num_levels(&self) -> usize {
        self.levels.len()
    }

    /// Result of the last [`render`](Self::render).
    pub fn front_buffer(&self) -> &Lightmap {
        &self.front
    }

    /// Consume the baker, keeping the output image.
    pub fn into_lightmap(self) -> Lightmap {
        self.front
    }

    /// Patches of one level; empty for a level that does not exist.
    pub fn patches(&self, level: usize) -> &[Patch] {
        self.levels.get(level).map(MipLevel::patches).unwrap_or(&[])
    }

    /// Direct radiance buffer of one level; empty for a level that does not exist.
    pub fn direct_light(&self, level: usize) -> &[Vec3] {
        self.levels
            .get(level)
            .map(|l| l.direct.as_slice())
            .unwrap_or(&[])
    }

    /// Rebuild all patch tables from `geometry`.
    ///
    /// Structural problems (index or attribute length mismatch) fail the
    /// whole call and leave no patches behind. Degenerate triangles are
    /// skipped silently. A mesh without the lightmap UV channel bakes to
    /// nothing.
    #[tracing::instrument(
        skip_all,
        fields(triangles = geometry.mesh.num_triangles(), subsets = geometry.mesh.num_subsets())
    )]
    pub fn set_geometry(&mut self, geometry: &Geometry) -> Result<BakeStats> {
        self.levels.clear();
        self.front.clear();
        geometry.mesh.validate()?;

        self.levels = (0..self.settings.mip_levels)
            .map(|level| {
                let (w, h) = self.settings.level_size(level);
                MipLevel::new(w, h)
            })
            .collect();

        let mut stats = BakeStats::default();
        let mesh = &geometry.mesh;
        let uvs = mesh.texcoords(self.settings.uv_channel);
        if uvs.is_empty() {
            tracing::warn!(
                channel = self.settings.uv_channel,
                "mesh has no lightmap UVs, nothing to bake"
            );
            stats.patches_per_level = vec![0; self.levels.len()];
            return Ok(stats);
        }

        for subset in 0..mesh.num_subsets() {
            let Some(material) = geometry.material(subset) else {
                tracing::debug!(subset, "no material, skipping subset");
                stats.skipped_subsets += 1;
                continue;
            };
            let Some(color) = material.diffuse_color() else {
                tracing::debug!(subset, material = %material.name, "no diffuse color, skipping subset");
                stats.skipped_subsets += 1;
                continue;
            };
            let emissive = resolve_emissive(self.settings.emissive, color, material);

            for [a, b, c] in mesh.triangles(subset) {
                let (a, b, c) = (a as usize, b as usize, c as usize);
                let tri = RasterTriangle {
                    positions: [mesh.positions[a], mesh.positions[b], mesh.positions[c]],
                    uvs: [uvs[a], uvs[b], uvs[c]],
                    color,
                    emissive,
                };
                stats.triangles += 1;
                self.rasterize(&tri);
            }
        }

        stats.patches_per_level = self.levels.iter().map(|l| l.patches().len()).collect();
        stats.emissive_patches = self.patches(0).iter().filter(|p| p.is_emissive()).count();
        tracing::info!(
            triangles = stats.triangles,
            patches = stats.total_patches(),
            emissive = stats.emissive_patches,
            "geometry rasterized"
        );
        Ok(stats)
    }

    /// Insert a triangle's patches into every level.
    fn rasterize(&mut self, tri: &RasterTriangle) {
        for level in &mut self.levels {
            let grid = UVec2::new(level.width, level.height);
            for patch in ConservativeRasterizer::new(tri, grid) {
                level.table.try_insert(patch);
            }
        }
    }

    /// Recompute direct light for a single light.
    pub fn render_light<R: Raycaster + ?Sized>(&mut self, light: &Light, raycaster: &R) {
        self.render_lights(std::slice::from_ref(light), raycaster);
    }

    /// Recompute direct light as the sum of `lights`.
    pub fn render_lights<R: Raycaster + ?Sized>(&mut self, lights: &[Light], raycaster: &R) {
        compute_direct_light(&mut self.levels, lights, raycaster, self.settings.ray_epsilon);
    }

    /// Gather one indirect bounce into the front buffer.
    ///
    /// Reads the direct light of the source level, so call
    /// [`render_light`](Self::render_light) first. The camera does not
    /// affect the result.
    pub fn render<R: Raycaster + ?Sized>(&mut self, camera: &Camera, raycaster: &R) {
        tracing::debug!(eye = ?camera.position, forward = ?camera.forward(), "indirect bounce");
        let source = self.settings.indirect_source_level as usize;
        let (Some(finest), Some(emitters)) = (self.levels.first(), self.levels.get(source)) else {
            self.front.clear();
            return;
        };
        compute_indirect_light_bounce(
            &mut self.front,
            finest.patches(),
            emitters,
            raycaster,
            GatherParams::from(&self.settings),
        );
    }

    /// Front buffer plus level-0 direct light, for previewing a full bake.
    pub fn composite(&self) -> Lightmap {
        let mut out = self.front.clone();
        out.add(self.direct_light(0));
        out
    }
}
