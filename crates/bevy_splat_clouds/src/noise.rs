//! Fractal sum-of-sines noise used to roughen the cloud layer.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Shape of the fBM field.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct NoiseShape {
    /// Number of summed octaves (0 disables the field).
    pub octaves: u32,
    /// Spatial frequency of the first octave.
    pub frequency: f32,
    /// Amplitude of the first octave.
    pub amplitude: f32,
    /// Frequency multiplier applied per octave.
    pub lacunarity: f32,
    /// Amplitude multiplier applied per octave.
    pub persistence: f32,
    /// Time scaling of the per-octave phase offset.
    pub phase: f32,
}

impl Default for NoiseShape {
    fn default() -> Self {
        Self {
            octaves: 4,
            frequency: 0.3,
            amplitude: 0.5,
            lacunarity: 2.0,
            persistence: 0.5,
            phase: 0.1,
        }
    }
}

/// Evaluate the field at `point` and time `t`.
///
/// Each octave is a 3D grid of sines whose phase advances at `(i + 1)` times
/// the base rate, so octaves drift against each other instead of pulsing in
/// sync. Unbounded in general; damps out when `persistence < 1`.
pub fn fbm(point: Vec3, t: f32, shape: &NoiseShape) -> f32 {
    let mut value = 0.0;
    let mut amp = shape.amplitude;
    let mut freq = shape.frequency;

    for i in 0..shape.octaves {
        let offset = t * shape.phase * (i + 1) as f32;
        value += amp
            * (point.x * freq + offset).sin()
            * (point.y * freq + offset).sin()
            * (point.z * freq + offset).sin();

        freq *= shape.lacunarity;
        amp *= shape.persistence;
    }

    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_octaves_is_silent() {
        let shape = NoiseShape {
            octaves: 0,
            ..default()
        };
        assert_eq!(fbm(Vec3::new(1.3, -0.2, 4.0), 12.0, &shape), 0.0);
    }

    #[test]
    fn single_octave_matches_closed_form() {
        let shape = NoiseShape {
            octaves: 1,
            frequency: 0.5,
            amplitude: 2.0,
            ..default()
        };
        let p = Vec3::new(1.0, 2.0, 3.0);
        let expected = 2.0 * 0.5f32.sin() * 1.0f32.sin() * 1.5f32.sin();
        assert!((fbm(p, 0.0, &shape) - expected).abs() < 1e-6);
    }

    #[test]
    fn octaves_advance_at_different_rates() {
        let shape = NoiseShape {
            octaves: 2,
            frequency: 1.0,
            amplitude: 1.0,
            lacunarity: 1.0,
            persistence: 1.0,
            phase: 1.0,
        };
        let p = Vec3::splat(0.25);
        let t = 0.7;
        let first = (0.25f32 + t).sin().powi(3);
        let second = (0.25f32 + 2.0 * t).sin().powi(3);
        assert!((fbm(p, t, &shape) - (first + second)).abs() < 1e-5);
    }

    #[test]
    fn damped_sum_stays_below_geometric_bound() {
        let shape = NoiseShape::default();
        let bound = shape.amplitude / (1.0 - shape.persistence);
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..500 {
            let p = Vec3::new(
                rng.f32() * 32.0 - 16.0,
                rng.f32() * 2.0 - 1.0,
                rng.f32() * 32.0 - 16.0,
            );
            assert!(fbm(p, rng.f32() * 100.0, &shape).abs() <= bound);
        }
    }

    #[test]
    fn field_is_pure() {
        let shape = NoiseShape::default();
        let p = Vec3::new(-3.0, 0.1, 7.5);
        assert_eq!(fbm(p, 4.2, &shape), fbm(p, 4.2, &shape));
    }
}
