//! Material property bag.
//!
//! Materials are looked up by parameter name, the way shading networks expose
//! their inputs. The baker only reads [`DIFFUSE`] and, optionally, [`EMISSIVE`].

use crate::util::{Vec2, Vec3, Vec4};

use super::{DIFFUSE, EMISSIVE};

/// Material parameter value.
#[derive(Clone, Debug, PartialEq)]
pub enum ParamValue {
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i32),
    /// Float value.
    Float(f32),
    /// String value (texture path, enum name, ...).
    String(String),
    /// Vec2 value.
    Vec2(Vec2),
    /// Vec3 value.
    Vec3(Vec3),
    /// Color3 value (linear RGB).
    Color3(Vec3),
    /// Color4 value (linear RGBA).
    Color4(Vec4),
}

/// Named material parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialParam {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: ParamValue,
}

impl MaterialParam {
    /// Create a new parameter.
    pub fn new(name: &str, value: ParamValue) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }

    /// Get as float if possible.
    pub fn as_float(&self) -> Option<f32> {
        match &self.value {
            ParamValue::Float(v) => Some(*v),
            ParamValue::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    /// Get as vec3 if possible. RGBA colors drop their alpha; a scalar
    /// splats to grey.
    pub fn as_vec3(&self) -> Option<Vec3> {
        match &self.value {
            ParamValue::Vec3(v) | ParamValue::Color3(v) => Some(*v),
            ParamValue::Color4(v) => Some(v.truncate()),
            ParamValue::Float(v) => Some(Vec3::splat(*v)),
            _ => None,
        }
    }

    /// Get as string if possible.
    pub fn as_string(&self) -> Option<&str> {
        match &self.value {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A material: a name plus an ordered list of parameters.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// Parameters; later entries shadow earlier ones with the same name.
    pub params: Vec<MaterialParam>,
}

impl Material {
    /// Create an empty material.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            params: Vec::new(),
        }
    }

    /// Create a plain Lambertian material.
    pub fn diffuse(name: &str, color: Vec3) -> Self {
        Self::new(name).with_param(DIFFUSE, ParamValue::Color3(color))
    }

    /// Builder-style parameter setter.
    pub fn with_param(mut self, name: &str, value: ParamValue) -> Self {
        self.set(name, value);
        self
    }

    /// Set a parameter, replacing any existing one with the same name.
    pub fn set(&mut self, name: &str, value: ParamValue) {
        match self.params.iter_mut().find(|p| p.name == name) {
            Some(param) => param.value = value,
            None => self.params.push(MaterialParam::new(name, value)),
        }
    }

    /// Get a parameter by name.
    pub fn param(&self, name: &str) -> Option<&MaterialParam> {
        self.params.iter().rev().find(|p| p.name == name)
    }

    /// Look up a three-component parameter.
    pub fn get_vec3(&self, name: &str) -> Option<Vec3> {
        self.param(name).and_then(MaterialParam::as_vec3)
    }

    /// Diffuse albedo, if the material defines one.
    pub fn diffuse_color(&self) -> Option<Vec3> {
        self.get_vec3(DIFFUSE)
    }

    /// Explicit emissive color, if the material defines one.
    pub fn emissive_color(&self) -> Option<Vec3> {
        self.get_vec3(EMISSIVE)
    }

    /// All parameter names.
    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }
}
