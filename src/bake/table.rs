//! Per-level patch storage with at-most-one-patch-per-texel dedup.

use super::patch::Patch;

/// Fixed-size bitset over the texels of one level.
#[derive(Clone, Debug, Default)]
pub struct TexelSet {
    words: Vec<u64>,
    len: usize,
}

impl TexelSet {
    /// Bitset for `len` texels, all clear.
    pub fn new(len: usize) -> Self {
        Self {
            words: vec![0; len.div_ceil(64)],
            len,
        }
    }

    /// Number of texels covered by the set.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn contains(&self, texel: u32) -> bool {
        let i = texel as usize;
        i < self.len && self.words[i / 64] & (1u64 << (i % 64)) != 0
    }

    /// Mark a texel. Returns `false` if it was already marked or out of range.
    #[inline]
    pub fn insert(&mut self, texel: u32) -> bool {
        let i = texel as usize;
        if i >= self.len {
            return false;
        }
        let (word, bit) = (&mut self.words[i / 64], 1u64 << (i % 64));
        let fresh = *word & bit == 0;
        *word |= bit;
        fresh
    }

    /// Number of marked texels.
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}

/// Append-only patch list for one mip level, gated by a [`TexelSet`].
#[derive(Clone, Debug, Default)]
pub struct PatchTable {
    patches: Vec<Patch>,
    used: TexelSet,
}

impl PatchTable {
    /// Empty table for a level with `texel_count` texels.
    pub fn new(texel_count: usize) -> Self {
        Self {
            patches: Vec::new(),
            used: TexelSet::new(texel_count),
        }
    }

    /// Insert a patch unless its texel is already claimed. The first
    /// claimant wins; later ones are dropped and `false` is returned.
    pub fn try_insert(&mut self, patch: Patch) -> bool {
        if !self.used.insert(patch.texel_index) {
            return false;
        }
        self.patches.push(patch);
        true
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn used_texels(&self) -> &TexelSet {
        &self.used
    }

    pub fn is_used(&self, texel: u32) -> bool {
        self.used.contains(texel)
    }

    pub fn len(&self) -> usize {
        self.patches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Sum of patch areas.
    pub fn total_area(&self) -> f32 {
        self.patches.iter().map(|p| p.area).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::Vec3;

    fn patch(texel_index: u32, area: f32) -> Patch {
        Patch {
            texel_index,
            area,
            position: Vec3::ZERO,
            normal: Vec3::Y,
            color: Vec3::ONE,
            emissive: Vec3::ZERO,
            corners: [Vec3::ZERO; 3],
        }
    }

    #[test]
    fn test_texel_set() {
        let mut set = TexelSet::new(130);
        assert_eq!(set.len(), 130);
        assert!(set.insert(0));
        assert!(set.insert(129));
        assert!(!set.insert(129));
        assert!(!set.insert(130));
        assert!(set.contains(129));
        assert!(!set.contains(64));
        assert_eq!(set.count(), 2);
    }

    #[test]
    fn test_first_claimant_wins() {
        let mut table = PatchTable::new(16);
        assert!(table.try_insert(patch(3, 1.0)));
        assert!(!table.try_insert(patch(3, 5.0)));
        assert!(table.try_insert(patch(4, 2.0)));
        assert_eq!(table.len(), 2);
        assert_eq!(table.patches()[0].area, 1.0);
        assert!(table.is_used(3));
        assert!(!table.is_used(5));
        assert_eq!(table.total_area(), 3.0);
    }
}
