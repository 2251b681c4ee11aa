//! JSON scene descriptions.
//!
//! A scene is a list of meshes, each split into subsets that carry their
//! own material, plus lights and an optional camera:
//!
//! ```json
//! {
//!   "meshes": [{
//!     "name": "floor",
//!     "positions": [[0,0,0], [1,0,0], [1,0,1], [0,0,1]],
//!     "lightmap_uvs": [[0,0], [1,0], [1,1], [0,1]],
//!     "subsets": [{ "indices": [0,1,2, 0,2,3], "material": { "diffuse": [0.8,0.8,0.8] } }]
//!   }],
//!   "lights": [{ "type": "directional", "forward": [0,-1,0], "intensity": 2.0 }]
//! }
//! ```
//!
//! Triangles face the side from which their corners appear clockwise.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::geom::{Camera, DirectionalLight, EnvironmentLight, Geometry, Light, Mesh, LIGHTMAP_UV_CHANNEL};
use crate::material::{Material, ParamValue, DIFFUSE, EMISSIVE};
use crate::util::{Error, Result, Vec2, Vec3};

/// Serialized material: only what the baker reads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialDesc {
    pub name: String,
    pub diffuse: Option<Vec3>,
    pub emissive: Option<Vec3>,
}

impl MaterialDesc {
    pub fn diffuse(name: &str, color: Vec3) -> Self {
        Self {
            name: name.to_string(),
            diffuse: Some(color),
            emissive: None,
        }
    }

    pub fn to_material(&self) -> Material {
        let mut material = Material::new(&self.name);
        if let Some(color) = self.diffuse {
            material.set(DIFFUSE, ParamValue::Color3(color));
        }
        if let Some(color) = self.emissive {
            material.set(EMISSIVE, ParamValue::Color3(color));
        }
        material
    }
}

/// Triangle list sharing one material.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubsetDesc {
    pub indices: Vec<u32>,
    #[serde(default)]
    pub material: MaterialDesc,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshDesc {
    #[serde(default)]
    pub name: String,
    pub positions: Vec<Vec3>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normals: Vec<Vec3>,
    pub lightmap_uvs: Vec<Vec2>,
    pub subsets: Vec<SubsetDesc>,
}

impl MeshDesc {
    /// Convert to a mesh with one material per subset.
    pub fn to_geometry(&self) -> Result<Geometry> {
        if self.positions.is_empty() {
            return Err(Error::scene(format!("mesh '{}' has no positions", self.name)));
        }
        if let Some((i, s)) = self.subsets.iter().enumerate().find(|(_, s)| s.indices.len() % 3 != 0) {
            return Err(Error::scene(format!(
                "mesh '{}' subset {} has {} indices, not a multiple of 3",
                self.name,
                i,
                s.indices.len()
            )));
        }

        let mut mesh = Mesh::new(self.positions.clone())
            .with_normals(self.normals.clone())
            .with_texcoords(LIGHTMAP_UV_CHANNEL, self.lightmap_uvs.clone());
        let materials = self
            .subsets
            .iter()
            .map(|s| {
                mesh.add_subset(s.indices.clone());
                s.material.to_material()
            })
            .collect();

        let geometry = Geometry::new(mesh, materials);
        geometry.mesh.validate()?;
        Ok(geometry)
    }
}

/// Everything needed to bake: geometry, lights and a camera.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDesc {
    pub meshes: Vec<MeshDesc>,
    #[serde(default)]
    pub lights: Vec<Light>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
}

impl SceneDesc {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Merge all meshes into one geometry.
    pub fn into_scene(self) -> Result<Scene> {
        if self.meshes.is_empty() {
            return Err(Error::scene("scene has no meshes"));
        }
        let mut geometry = Geometry::default();
        for desc in &self.meshes {
            geometry.merge(&desc.to_geometry()?);
        }
        tracing::debug!(
            meshes = self.meshes.len(),
            triangles = geometry.mesh.num_triangles(),
            lights = self.lights.len(),
            "scene loaded"
        );
        Ok(Scene {
            geometry,
            lights: self.lights,
            camera: self.camera.unwrap_or_default(),
        })
    }
}

/// A scene ready for [`Lightmapper`](crate::bake::Lightmapper).
#[derive(Clone, Debug)]
pub struct Scene {
    pub geometry: Geometry,
    pub lights: Vec<Light>,
    pub camera: Camera,
}

impl Scene {
    /// Load and convert a JSON scene file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        SceneDesc::load(path)?.into_scene()
    }

    pub fn from_json(text: &str) -> Result<Self> {
        SceneDesc::from_json(text)?.into_scene()
    }
}

/// Packs quads into a grid atlas, one cell each.
struct QuadAtlas {
    columns: u32,
    rows: u32,
    next: u32,
}

impl QuadAtlas {
    /// Gap between a quad and its cell border, as a fraction of the cell.
    const INSET: f32 = 0.06;

    fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows, next: 0 }
    }

    /// Quad centered on `center` with half extent `half_u` along one edge,
    /// `half_v` along the other, facing `normal`.
    fn quad(&mut self, name: &str, center: Vec3, half_u: Vec3, half_v: f32, normal: Vec3, color: Vec3) -> MeshDesc {
        let v = half_u.normalize().cross(normal) * half_v;
        let positions = vec![
            center - half_u - v,
            center + half_u - v,
            center + half_u + v,
            center - half_u + v,
        ];

        let cell = Vec2::new(1.0 / self.columns as f32, 1.0 / self.rows as f32);
        let origin = Vec2::new((self.next % self.columns) as f32, (self.next / self.columns) as f32) * cell;
        self.next += 1;
        let lo = origin + cell * Self::INSET;
        let hi = origin + cell * (1.0 - Self::INSET);

        MeshDesc {
            name: name.to_string(),
            positions,
            normals: vec![normal; 4],
            lightmap_uvs: vec![lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y)],
            subsets: vec![SubsetDesc {
                indices: vec![0, 1, 2, 0, 2, 3],
                material: MaterialDesc::diffuse(name, color),
            }],
        }
    }
}

/// Open-fronted box with colored side walls and a block on the floor,
/// lit by a sun through the opening and a dim sky.
pub fn cornell_box() -> SceneDesc {
    let white = Vec3::splat(0.75);
    let red = Vec3::new(0.63, 0.06, 0.05);
    let green = Vec3::new(0.14, 0.45, 0.09);

    let mut atlas = QuadAtlas::new(4, 3);
    let mut meshes = vec![
        atlas.quad("floor", Vec3::ZERO, Vec3::X, 1.0, Vec3::Y, white),
        atlas.quad("ceiling", Vec3::new(0.0, 2.0, 0.0), Vec3::X, 1.0, Vec3::NEG_Y, white),
        atlas.quad("back", Vec3::new(0.0, 1.0, -1.0), Vec3::X, 1.0, Vec3::Z, white),
        atlas.quad("left", Vec3::new(-1.0, 1.0, 0.0), Vec3::Z, 1.0, Vec3::X, red),
        atlas.quad("right", Vec3::new(1.0, 1.0, 0.0), Vec3::Z, 1.0, Vec3::NEG_X, green),
    ];

    let (b, h) = (Vec3::new(0.35, 0.0, -0.3), 0.3);
    meshes.extend([
        atlas.quad("block_top", b + Vec3::new(0.0, 2.0 * h, 0.0), Vec3::X * h, h, Vec3::Y, white),
        atlas.quad("block_front", b + Vec3::new(0.0, h, h), Vec3::X * h, h, Vec3::Z, white),
        atlas.quad("block_back", b + Vec3::new(0.0, h, -h), Vec3::X * h, h, Vec3::NEG_Z, white),
        atlas.quad("block_left", b + Vec3::new(-h, h, 0.0), Vec3::Z * h, h, Vec3::NEG_X, white),
        atlas.quad("block_right", b + Vec3::new(h, h, 0.0), Vec3::Z * h, h, Vec3::X, white),
    ]);

    SceneDesc {
        meshes,
        lights: vec![
            DirectionalLight::new(Vec3::new(-0.3, -0.6, -1.0), Vec3::new(1.0, 0.95, 0.85), 3.0).into(),
            EnvironmentLight::new(Vec3::new(0.4, 0.5, 0.7), 0.05).into(),
        ],
        camera: Some(Camera::look_at(Vec3::new(0.0, 1.0, 3.5), Vec3::new(0.0, 1.0, 0.0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::face_normal;

    #[test]
    fn test_from_json_with_defaults() {
        let json = r#"{
            "meshes": [{
                "positions": [[0,0,0],[1,0,0],[0,0,1]],
                "lightmap_uvs": [[0,0],[1,0],[0,1]],
                "subsets": [{ "indices": [0,1,2], "material": { "diffuse": [0.5,0.5,0.5] } }]
            }],
            "lights": [{ "type": "directional", "intensity": 2.0 }, { "type": "environment" }]
        }"#;
        let scene = Scene::from_json(json).unwrap();
        assert_eq!(scene.geometry.mesh.num_triangles(), 1);
        assert_eq!(scene.geometry.material(0).and_then(|m| m.diffuse_color()), Some(Vec3::splat(0.5)));
        match scene.lights[0] {
            Light::Directional(l) => {
                assert_eq!(l.forward, Vec3::NEG_Y);
                assert_eq!(l.intensity, 2.0);
            }
            other => panic!("unexpected light {other:?}"),
        }
        assert_eq!(scene.lights[1], Light::Environment(EnvironmentLight::default()));
        assert_eq!(scene.camera, Camera::default());
    }

    #[test]
    fn test_rejects_partial_triangle() {
        let mut desc = cornell_box();
        desc.meshes[0].subsets[0].indices.pop();
        assert!(matches!(desc.into_scene(), Err(Error::InvalidScene(_))));
    }

    #[test]
    fn test_rejects_uv_count_mismatch() {
        let mut desc = cornell_box();
        desc.meshes[2].lightmap_uvs.pop();
        assert!(matches!(desc.into_scene(), Err(Error::AttributeMismatch { .. })));
    }

    #[test]
    fn test_rejects_empty_scene() {
        assert!(matches!(SceneDesc::default().into_scene(), Err(Error::InvalidScene(_))));
    }

    #[test]
    fn test_cornell_quads_face_their_normals() {
        for mesh in cornell_box().meshes {
            let p = &mesh.positions;
            for tri in mesh.subsets[0].indices.chunks_exact(3) {
                let n = face_normal(p[tri[0] as usize], p[tri[1] as usize], p[tri[2] as usize]).normalize();
                assert!((n - mesh.normals[0]).length() < 1e-5, "{} faces {n}", mesh.name);
            }
        }
    }

    #[test]
    fn test_cornell_uv_cells_do_not_overlap() {
        let desc = cornell_box();
        let rects: Vec<(Vec2, Vec2)> = desc
            .meshes
            .iter()
            .map(|m| (m.lightmap_uvs[0], m.lightmap_uvs[2]))
            .collect();
        for (i, a) in rects.iter().enumerate() {
            assert!(a.0.cmpge(Vec2::ZERO).all() && a.1.cmple(Vec2::ONE).all());
            for b in &rects[i + 1..] {
                let disjoint = a.1.x <= b.0.x || b.1.x <= a.0.x || a.1.y <= b.0.y || b.1.y <= a.0.y;
                assert!(disjoint);
            }
        }
    }
}
