//! Lightmap baking.
//!
//! Geometry is rasterized in lightmap UV space into [`Patch`]es, one per
//! covered texel, at several mip levels. Direct light is evaluated per
//! patch with shadow rays. A single indirect bounce is then gathered onto
//! the finest level from the patches of a coarser source level.
//!
//! - [`Lightmapper`] - Owns the patch hierarchy and the output image
//! - [`ConservativeRasterizer`] - Triangle to patches for one level
//! - [`Raycaster`] - Visibility queries, supplied by the caller
//! - [`Lightmap`] - Output radiance image

mod baker;
mod clip;
mod direct;
mod indirect;
mod level;
mod lightmap;
mod patch;
mod raster;
mod raycast;
mod table;

pub use baker::{BakeStats, Lightmapper};
pub use clip::{convex_clip, left_of, line_intersection, Polygon};
pub use direct::compute_direct_light;
pub use indirect::{compute_indirect_light_bounce, GatherParams};
pub use level::MipLevel;
pub use lightmap::Lightmap;
pub use patch::Patch;
pub use raster::{resolve_emissive, ConservativeRasterizer, RasterTriangle};
pub use raycast::{Aabb, NoOcclusion, Ray, Raycaster, TriangleRaycaster};
pub use table::{PatchTable, TexelSet};
