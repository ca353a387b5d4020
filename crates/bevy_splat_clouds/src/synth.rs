//! Particle synthesis: turns a count and a parameter set into splats.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::bounds::CloudBounds;
use crate::hash::hash4;
use crate::noise::fbm;
use crate::params::CloudParams;
use crate::splats::{SPLAT_SCALE, SplatRecord, SplatSet};

/// Rate the noise field evolves at relative to wall-clock seconds.
pub const NOISE_TIME_SCALE: f32 = 0.2;
/// Opacity floor so thin splats never vanish entirely.
pub const MIN_OPACITY: f32 = 0.1;

/// Build `count` splats. Deterministic for a given `(params, bounds,
/// noise_time)`: no external random source is consulted.
pub fn synthesize(
    count: usize,
    params: &CloudParams,
    bounds: &CloudBounds,
    noise_time: f32,
) -> SplatSet {
    let records = (0..count)
        .map(|index| synthesize_one(index as u32, params, bounds, noise_time))
        .collect();
    SplatSet::from_records(records)
}

/// Build the splat for a single index.
pub fn synthesize_one(
    index: u32,
    params: &CloudParams,
    bounds: &CloudBounds,
    noise_time: f32,
) -> SplatRecord {
    let r = hash4(index);
    let mut pos = bounds.lerp(r.truncate());

    // Both offsets share channel w and are correlated.
    let fluff = (r.w * TAU).sin() * params.fluffiness * 0.5;
    pos.y += fluff;
    let turb = (r.w * TAU * 4.0).sin() * params.turbulence * 0.3;
    pos.x += turb;

    pos.y += fbm(pos, noise_time, &params.noise) * params.fluffiness * 0.1;

    // Height for the gradient is taken before wrapping.
    let t = bounds.normalized_height(pos.y);
    let color = params.color_bottom.lerp(params.color_top, t);

    let center = bounds.wrap_point(pos);
    let opacity = (params.opacity * (0.8 + 0.4 * fluff.abs())).max(MIN_OPACITY);

    SplatRecord {
        center,
        scale: SPLAT_SCALE,
        rotation: Quat::IDENTITY,
        opacity,
        color,
    }
}
