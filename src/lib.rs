//! # Lightbake
//!
//! Static lightmap baker. Scene geometry with a non-overlapping lightmap
//! UV unwrap is rasterized into per-texel surface patches at several mip
//! levels. Direct light is evaluated per patch with shadow rays, and one
//! bounce of indirect light is gathered with patch-to-patch form factors.
//!
//! ## Modules
//!
//! - [`util`] - Math types and errors
//! - [`geom`] - Meshes, geometry, lights and camera
//! - [`material`] - Material parameters
//! - [`settings`] - Bake configuration
//! - [`bake`] - Rasterization and light transport
//! - [`scene`] - JSON scene descriptions and a demo scene
//!
//! ## Example
//!
//! ```
//! use lightbake::prelude::*;
//!
//! let scene = lightbake::scene::cornell_box().into_scene()?;
//! let settings = BakeSettings { mip_levels: 3, indirect_source_level: 2, ..BakeSettings::with_resolution(16, 16) };
//!
//! let raycaster = TriangleRaycaster::from_geometry(&scene.geometry);
//! let mut baker = Lightmapper::new(settings)?;
//! baker.set_geometry(&scene.geometry)?;
//! baker.render_lights(&scene.lights, &raycaster);
//! baker.render(&scene.camera, &raycaster);
//!
//! let lightmap = baker.front_buffer();
//! assert!(lightmap.data.iter().all(|c| c.is_finite()));
//! # Ok::<(), lightbake::Error>(())
//! ```

pub mod util;
pub mod geom;
pub mod material;
pub mod settings;
pub mod bake;
pub mod scene;

// Re-export commonly used types
pub use util::{Error, Result};
pub use bake::{Lightmap, Lightmapper, Ray, Raycaster};
pub use settings::BakeSettings;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result, Vec2, Vec3};
    pub use crate::geom::*;
    pub use crate::material::Material;
    pub use crate::settings::{BakeSettings, EmissiveSource};
    pub use crate::bake::{
        BakeStats, Lightmap, Lightmapper, NoOcclusion, Patch, Ray, Raycaster, TriangleRaycaster,
    };
    pub use crate::scene::{Scene, SceneDesc};
}
