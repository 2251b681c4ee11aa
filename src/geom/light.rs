//! Light descriptions consumed by the direct lighting stage.

use serde::{Deserialize, Serialize};

use crate::util::Vec3;

/// Infinitely distant light shining along `forward`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionalLight {
    /// Direction the light travels (from the light into the scene).
    pub forward: Vec3,
    /// Linear RGB color.
    pub color: Vec3,
    /// Scalar multiplier on `color`.
    pub intensity: f32,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            forward: Vec3::NEG_Y,
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl DirectionalLight {
    pub fn new(forward: Vec3, color: Vec3, intensity: f32) -> Self {
        Self { forward, color, intensity }
    }

    /// Radiance carried by the light (`color * intensity`).
    #[inline]
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }

    /// Unit vector pointing from a surface towards the light.
    ///
    /// Falls back to +Y for a zero-length `forward`.
    #[inline]
    pub fn to_light(&self) -> Vec3 {
        (-self.forward).try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Uniform ambient light added to every covered texel, unoccluded.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for EnvironmentLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
        }
    }
}

impl EnvironmentLight {
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self { color, intensity }
    }

    #[inline]
    pub fn radiance(&self) -> Vec3 {
        self.color * self.intensity
    }
}

/// Any light the baker understands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Light {
    Directional(DirectionalLight),
    Environment(EnvironmentLight),
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Self::Directional(light)
    }
}

impl From<EnvironmentLight> for Light {
    fn from(light: EnvironmentLight) -> Self {
        Self::Environment(light)
    }
}
