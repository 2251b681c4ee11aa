//! Mesh plus per-subset materials: the unit handed to the baker.

use crate::material::Material;

use super::mesh::Mesh;

/// A mesh with one material per subset.
#[derive(Clone, Debug, Default)]
pub struct Geometry {
    pub mesh: Mesh,
    /// `materials[i]` shades `mesh.subsets[i]`. Subsets without a material
    /// are not baked.
    pub materials: Vec<Material>,
}

impl Geometry {
    pub fn new(mesh: Mesh, materials: Vec<Material>) -> Self {
        Self { mesh, materials }
    }

    /// Material of a subset, if any.
    pub fn material(&self, subset: usize) -> Option<&Material> {
        self.materials.get(subset)
    }

    /// Append another geometry. Subset/material pairing is preserved; if
    /// `self` has fewer materials than subsets, the gap is kept unbaked by
    /// padding with empty materials.
    pub fn merge(&mut self, other: &Geometry) {
        let first = self.mesh.append(&other.mesh);
        if self.materials.len() < first {
            self.materials.resize_with(first, Material::default);
        }
        self.materials.truncate(first);
        self.materials.extend(other.materials.iter().take(other.mesh.num_subsets()).cloned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::{Vec2, Vec3};

    fn single(color: Vec3) -> Geometry {
        let mut mesh = Mesh::new(vec![Vec3::ZERO, Vec3::Y, Vec3::X])
            .with_texcoords(1, vec![Vec2::ZERO, Vec2::Y, Vec2::X]);
        mesh.add_subset(vec![0, 1, 2]);
        Geometry::new(mesh, vec![Material::diffuse("m", color)])
    }

    #[test]
    fn test_merge_keeps_material_pairing() {
        let mut a = single(Vec3::X);
        a.merge(&single(Vec3::Y));
        assert_eq!(a.mesh.num_subsets(), 2);
        assert_eq!(a.material(0).and_then(|m| m.diffuse_color()), Some(Vec3::X));
        assert_eq!(a.material(1).and_then(|m| m.diffuse_color()), Some(Vec3::Y));
        assert!(a.mesh.validate().is_ok());
    }

    #[test]
    fn test_merge_pads_missing_materials() {
        let mut a = single(Vec3::X);
        a.materials.clear();
        a.merge(&single(Vec3::Z));
        assert_eq!(a.materials.len(), 2);
        assert_eq!(a.material(0).and_then(|m| m.diffuse_color()), None);
        assert_eq!(a.material(1).and_then(|m| m.diffuse_color()), Some(Vec3::Z));
    }
}
