//! Wind animation: endless Z drift that wraps at the bounds.

use crate::bounds::{CloudBounds, wrap};
use crate::hash::home_z;
use crate::splats::SplatSet;

/// Z position of splat `index` after `elapsed` seconds of wind.
///
/// The displacement is reduced modulo the Z range in `f64` before narrowing,
/// so per-frame steps keep their size at any uptime.
pub fn drifted_z(index: u32, elapsed: f64, wind_speed: f32, bounds: &CloudBounds) -> f32 {
    let home = home_z(index, bounds.min.z, bounds.max.z);
    let range = f64::from(bounds.max.z - bounds.min.z);
    let offset = (f64::from(wind_speed) * elapsed).rem_euclid(range) as f32;
    wrap(home + offset, bounds.min.z, bounds.max.z)
}

/// Move every splat to its drifted Z. X and Y are left alone and the set is
/// never resized.
///
/// Positions are recomputed from the home Z each tick rather than integrated,
/// so they never accumulate error and stay bounded however long the app runs.
pub fn animate(splats: &mut SplatSet, elapsed: f64, wind_speed: f32, bounds: &CloudBounds) {
    splats.for_each_mut(|index, splat| {
        splat.center.z = drifted_z(index as u32, elapsed, wind_speed, bounds);
    });
}
