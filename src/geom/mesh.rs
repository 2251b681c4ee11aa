//! Triangle mesh with per-subset index arrays and multiple UV channels.
//!
//! Texcoord channel 0 is the regular material UV set; channel 1
//! ([`LIGHTMAP_UV_CHANNEL`]) holds the non-overlapping lightmap unwrap.

use crate::util::{Error, Result, Vec2, Vec3};

/// Conventional texcoord channel carrying lightmap UVs.
pub const LIGHTMAP_UV_CHANNEL: usize = 1;

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (world space).
    pub positions: Vec<Vec3>,
    /// Vertex normals (optional, empty if absent).
    pub normals: Vec<Vec3>,
    /// Texcoord channels; each non-empty channel is per-vertex.
    pub texcoords: Vec<Vec<Vec2>>,
    /// Triangle index lists, one per material subset.
    pub subsets: Vec<Vec<u32>>,
}

impl Mesh {
    /// Create a mesh from positions only.
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            ..Self::default()
        }
    }

    /// Attach vertex normals.
    pub fn with_normals(mut self, normals: Vec<Vec3>) -> Self {
        self.normals = normals;
        self
    }

    /// Attach a texcoord channel, growing the channel list as needed.
    pub fn with_texcoords(mut self, channel: usize, uvs: Vec<Vec2>) -> Self {
        if self.texcoords.len() <= channel {
            self.texcoords.resize_with(channel + 1, Vec::new);
        }
        self.texcoords[channel] = uvs;
        self
    }

    /// Append a subset (flat triangle list). Returns its index.
    pub fn add_subset(&mut self, indices: Vec<u32>) -> usize {
        self.subsets.push(indices);
        self.subsets.len() - 1
    }

    /// Get number of vertices.
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get number of subsets.
    pub fn num_subsets(&self) -> usize {
        self.subsets.len()
    }

    /// Total triangle count across all subsets.
    pub fn num_triangles(&self) -> usize {
        self.subsets.iter().map(|s| s.len() / 3).sum()
    }

    /// Vertex positions.
    pub fn vertices(&self) -> &[Vec3] {
        &self.positions
    }

    /// Texcoord channel, or an empty slice if the channel is absent.
    pub fn texcoords(&self, channel: usize) -> &[Vec2] {
        self.texcoords.get(channel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if mesh has the given UV channel.
    pub fn has_texcoords(&self, channel: usize) -> bool {
        !self.texcoords(channel).is_empty()
    }

    /// Index array of one subset.
    pub fn indices(&self, subset: usize) -> &[u32] {
        self.subsets.get(subset).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Complete triangles of a subset; a trailing partial triangle is ignored.
    pub fn triangles(&self, subset: usize) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices(subset)
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
    }

    /// Check if this is a valid mesh (has positions and at least one triangle).
    pub fn is_valid(&self) -> bool {
        !self.positions.is_empty() && self.num_triangles() > 0
    }

    /// Check attribute lengths and index ranges.
    ///
    /// Only structural problems are errors. Degenerate triangles are
    /// accepted here and skipped later by the rasterizer.
    pub fn validate(&self) -> Result<()> {
        let count = self.positions.len();

        if !self.normals.is_empty() && self.normals.len() != count {
            return Err(Error::AttributeMismatch {
                attribute: "normals",
                expected: count,
                actual: self.normals.len(),
            });
        }

        for uvs in self.texcoords.iter().filter(|c| !c.is_empty()) {
            if uvs.len() != count {
                return Err(Error::AttributeMismatch {
                    attribute: "texcoords",
                    expected: count,
                    actual: uvs.len(),
                });
            }
        }

        for (subset, indices) in self.subsets.iter().enumerate() {
            if let Some(&index) = indices.iter().find(|&&i| i as usize >= count) {
                return Err(Error::IndexOutOfBounds { subset, index, count });
            }
        }

        Ok(())
    }

    /// Calculate bounding box.
    pub fn compute_bounds(&self) -> (Vec3, Vec3) {
        if self.positions.is_empty() {
            return (Vec3::ZERO, Vec3::ZERO);
        }

        let mut min = self.positions[0];
        let mut max = self.positions[0];

        for &p in &self.positions[1..] {
            min = min.min(p);
            max = max.max(p);
        }

        (min, max)
    }

    /// Append another mesh, offsetting its indices. Returns the index of the
    /// first appended subset.
    ///
    /// Channels missing on one side are zero-filled so every non-empty
    /// channel stays per-vertex.
    pub fn append(&mut self, other: &Mesh) -> usize {
        let base = self.positions.len();
        let first_subset = self.subsets.len();

        let other_has_normals = !other.normals.is_empty();
        if other_has_normals || !self.normals.is_empty() {
            self.normals.resize(base, Vec3::ZERO);
            if other_has_normals {
                self.normals.extend_from_slice(&other.normals);
            } else {
                self.normals.resize(base + other.positions.len(), Vec3::ZERO);
            }
        }

        let channels = self.texcoords.len().max(other.texcoords.len());
        self.texcoords.resize_with(channels, Vec::new);
        for (channel, uvs) in self.texcoords.iter_mut().enumerate() {
            let theirs = other.texcoords(channel);
            if uvs.is_empty() && theirs.is_empty() {
                continue;
            }
            uvs.resize(base, Vec2::ZERO);
            if theirs.is_empty() {
                uvs.resize(base + other.positions.len(), Vec2::ZERO);
            } else {
                uvs.extend_from_slice(theirs);
            }
        }

        self.positions.extend_from_slice(&other.positions);
        for indices in &other.subsets {
            self.subsets
                .push(indices.iter().map(|&i| i + base as u32).collect());
        }

        first_subset
    }
}
