//! Materials for baking.
//!
//! A [`Material`] is a named bag of parameters. The baker reads the diffuse
//! albedo through [`Material::get_vec3`] with the [`DIFFUSE`] key, and the
//! explicit emission channel through [`EMISSIVE`] when configured to.
//!
//! ## Example
//!
//! ```
//! use lightbake::material::{Material, ParamValue, EMISSIVE};
//! use lightbake::util::Vec3;
//!
//! let lamp = Material::diffuse("lamp", Vec3::splat(0.9))
//!     .with_param(EMISSIVE, ParamValue::Color3(Vec3::splat(4.0)));
//! assert_eq!(lamp.get_vec3("diffuse"), Some(Vec3::splat(0.9)));
//! ```

mod schema;

pub use schema::*;

/// Parameter name of the diffuse albedo.
pub const DIFFUSE: &str = "diffuse";

/// Parameter name of the explicit emission color.
pub const EMISSIVE: &str = "emissive";
