//! Scene inputs for the baker.
//!
//! - [`Mesh`] - Indexed triangles with subsets and UV channels
//! - [`Geometry`] - Mesh plus one material per subset
//! - [`Light`] - Directional and environment lights
//! - [`Camera`] - Pinhole camera (accepted, not used by the bake)

pub mod mesh;
pub mod geometry;
pub mod light;
pub mod camera;

pub use mesh::{Mesh, LIGHTMAP_UV_CHANNEL};
pub use geometry::Geometry;
pub use light::{DirectionalLight, EnvironmentLight, Light};
pub use camera::Camera;
