//! Direct lighting of every patch at every level.

use rayon::prelude::*;

use crate::geom::{DirectionalLight, EnvironmentLight, Light};
use crate::util::Vec3;

use super::level::MipLevel;
use super::patch::Patch;
use super::raycast::{Ray, Raycaster};

/// Recompute the direct buffers of all levels from scratch.
///
/// Every buffer is cleared first, then each light is accumulated in order.
/// Identical inputs give bit-identical buffers.
#[tracing::instrument(skip_all, fields(lights = lights.len(), levels = levels.len()))]
pub fn compute_direct_light<R: Raycaster + ?Sized>(
    levels: &mut [MipLevel],
    lights: &[Light],
    raycaster: &R,
    epsilon: f32,
) {
    for level in levels.iter_mut() {
        level.clear_direct();
    }
    for light in lights {
        for level in levels.iter_mut() {
            let values = shade_level(level.patches(), light, raycaster, epsilon);
            level.scatter_add(&values);
        }
    }
}

/// Contribution of one light to each patch, in patch order.
fn shade_level<R: Raycaster + ?Sized>(
    patches: &[Patch],
    light: &Light,
    raycaster: &R,
    epsilon: f32,
) -> Vec<Vec3> {
    match light {
        Light::Directional(sun) => patches
            .par_iter()
            .map(|p| shade_directional(p, sun, raycaster, epsilon))
            .collect(),
        Light::Environment(env) => vec![environment_radiance(env); patches.len()],
    }
}

/// Lambertian term with a hard shadow.
#[inline]
fn shade_directional<R: Raycaster + ?Sized>(
    patch: &Patch,
    light: &DirectionalLight,
    raycaster: &R,
    epsilon: f32,
) -> Vec3 {
    let to_light = light.to_light();
    let nl = to_light.dot(patch.normal).max(0.0);
    if nl <= 0.0 {
        return Vec3::ZERO;
    }
    let ray = Ray::new(patch.position + to_light * epsilon, to_light);
    if raycaster.raycast(&ray) {
        return Vec3::ZERO;
    }
    light.radiance() * patch.color * nl
}

/// Uniform sky term: no albedo weighting, no occlusion.
#[inline]
fn environment_radiance(light: &EnvironmentLight) -> Vec3 {
    light.radiance()
}
