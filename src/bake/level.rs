//! One tier of the patch hierarchy.

use crate::util::Vec3;

use super::patch::Patch;
use super::table::PatchTable;

/// Texel grid of one mip level: its patches and their direct radiance.
#[derive(Clone, Debug, Default)]
pub struct MipLevel {
    pub width: u32,
    pub height: u32,
    pub table: PatchTable,
    /// Direct radiance per texel, `width * height` entries.
    pub direct: Vec<Vec3>,
}

impl MipLevel {
    /// Empty level sized for a `width x height` grid.
    pub fn new(width: u32, height: u32) -> Self {
        let texels = width as usize * height as usize;
        Self {
            width,
            height,
            table: PatchTable::new(texels),
            direct: vec![Vec3::ZERO; texels],
        }
    }

    #[inline]
    pub fn texel_count(&self) -> usize {
        self.direct.len()
    }

    #[inline]
    pub fn patches(&self) -> &[Patch] {
        self.table.patches()
    }

    /// Zero the direct buffer.
    pub fn clear_direct(&mut self) {
        self.direct.fill(Vec3::ZERO);
    }

    /// Add per-patch values into the direct buffer. `values[i]` belongs to
    /// `patches()[i]`.
    pub(crate) fn scatter_add(&mut self, values: &[Vec3]) {
        for (patch, value) in self.table.patches().iter().zip(values) {
            self.direct[patch.texel_index as usize] += *value;
        }
    }
}
