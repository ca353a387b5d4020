//! Deterministic per-splat randomness.
//!
//! Every random quantity a splat uses is derived from its index alone, so a
//! rebuild with the same parameters reproduces the same cloud (no flicker)
//! and the wind animator can recover a splat's home position without storing
//! it anywhere.

use bevy::prelude::*;

use crate::bounds::lerp;

/// Scales the index before it is fed to `sin`.
const INDEX_SCALE: f64 = 0.12345;
/// Post-`sin` multiplier of the classic shader `rand()` one-liner.
const SPREAD: f64 = 43758.5453;
/// Per-channel frequencies (x, y, z, w).
const CHANNEL_KEYS: [f64; 4] = [12.9898, 78.233, 37.719, 93.989];

/// Map a splat index to four repeatable pseudo-random values in `[0, 1)`.
///
/// Channels `x`, `y`, `z` pick the base position inside the bounds, `w`
/// drives the fluffiness/turbulence offsets.
pub fn hash4(index: u32) -> Vec4 {
    let seed = f64::from(index) * INDEX_SCALE;
    let [x, y, z, w] = CHANNEL_KEYS.map(|key| channel(seed, key));
    Vec4::new(x, y, z, w)
}

/// Fractional part keeps the sign of `sin`, so the raw value lies in
/// `(-1, 1)` and is remapped into `[0, 1)`.
fn channel(seed: f64, key: f64) -> f32 {
    let raw = ((seed * key).sin() * SPREAD) % 1.0;
    // Narrowing can round 0.99999999 up to 1.0.
    ((raw * 0.5 + 0.5) as f32).min(ONE_BELOW)
}

const ONE_BELOW: f32 = 1.0 - f32::EPSILON / 2.0;

/// Home (time-zero) Z coordinate of a splat: where the synthesizer put it
/// and where the wind animator measures drift from.
pub fn home_z(index: u32, min_z: f32, max_z: f32) -> f32 {
    lerp(min_z, max_z, hash4(index).z)
}
