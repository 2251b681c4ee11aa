//! Single-bounce indirect lighting by patch-to-patch form factors.
//!
//! Each level-0 patch gathers from every patch of a coarser source level,
//! treating the emitter's direct radiance as outgoing light:
//!
//! ```text
//! L_i = sum_j  direct_j * cos_i * cos_j * A_j / (max(1, d^2) * pi)
//! ```
//!
//! The `max(1, d^2)` clamp keeps near-contact pairs from blowing up.

use std::f32::consts::PI;

use rayon::prelude::*;

use crate::settings::BakeSettings;
use crate::util::Vec3;

use super::level::MipLevel;
use super::lightmap::Lightmap;
use super::patch::Patch;
use super::raycast::{Ray, Raycaster};

/// Light-transport knobs used by the gather.
#[derive(Clone, Copy, Debug)]
pub struct GatherParams {
    pub ray_epsilon: f32,
    pub emitter_distance_bias: f32,
    pub form_factor_threshold: f32,
}

impl From<&BakeSettings> for GatherParams {
    fn from(s: &BakeSettings) -> Self {
        Self {
            ray_epsilon: s.ray_epsilon,
            emitter_distance_bias: s.emitter_distance_bias,
            form_factor_threshold: s.form_factor_threshold,
        }
    }
}

/// Overwrite `image` with one bounce gathered from `source` onto `receivers`.
///
/// Texels without a receiver patch stay zero.
#[tracing::instrument(
    skip_all,
    fields(receivers = receivers.len(), emitters = source.patches().len())
)]
pub fn compute_indirect_light_bounce<R: Raycaster + ?Sized>(
    image: &mut Lightmap,
    receivers: &[Patch],
    source: &MipLevel,
    raycaster: &R,
    params: GatherParams,
) {
    image.clear();

    let gathered: Vec<Vec3> = receivers
        .par_iter()
        .map(|recv| gather(recv, source, raycaster, &params))
        .collect();

    for (recv, value) in receivers.iter().zip(gathered) {
        if let Some(texel) = image.data.get_mut(recv.texel_index as usize) {
            *texel = value;
        }
    }
}

/// Sum of all emitter contributions reaching one receiver.
fn gather<R: Raycaster + ?Sized>(
    recv: &Patch,
    source: &MipLevel,
    raycaster: &R,
    params: &GatherParams,
) -> Vec3 {
    let origin = recv.position + recv.normal * params.ray_epsilon;
    let mut value = Vec3::ZERO;

    for emitter in source.patches() {
        let offset = emitter.position - recv.position;
        let d2 = offset.length_squared();
        if d2 == 0.0 {
            continue;
        }
        let d = d2.sqrt();
        let dir = offset / d;

        let cos_i = recv.normal.dot(dir);
        let cos_j = -emitter.normal.dot(dir);
        let factor = cos_i * cos_j;
        if factor <= params.form_factor_threshold {
            continue;
        }

        let ray = Ray::bounded(origin, dir, d - params.emitter_distance_bias);
        if raycaster.raycast(&ray) {
            continue;
        }

        let radiance = source.direct[emitter.texel_index as usize];
        value += radiance * factor * emitter.area / (d2.max(1.0) * PI);
    }

    value
}
