//! Tunable weather parameters and the metadata table the controller and UI
//! share.

use std::ops::RangeInclusive;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::noise::NoiseShape;

/// Live cloud parameters.
///
/// Only [`CloudParams::wind_speed`] can change without regenerating the
/// splats; see [`ParamField::effect`].
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Reflect)]
pub struct CloudParams {
    /// Signed drift rate along Z, in units per second.
    pub wind_speed: f32,
    /// Splat budget before density is applied.
    pub particle_count: u32,
    /// Fraction of `particle_count` actually generated.
    pub cloud_density: f32,
    /// Base splat alpha.
    pub opacity: f32,
    /// Vertical spread and noise weight.
    pub fluffiness: f32,
    /// Horizontal jitter.
    pub turbulence: f32,
    /// Gradient colour at the top of the layer (linear RGB).
    pub color_top: Vec3,
    /// Gradient colour at the bottom of the layer (linear RGB).
    pub color_bottom: Vec3,
    pub noise: NoiseShape,
}

impl Default for CloudParams {
    fn default() -> Self {
        Self {
            wind_speed: -0.3,
            particle_count: 20_000,
            cloud_density: 0.7,
            opacity: 0.5,
            fluffiness: 0.5,
            turbulence: 0.5,
            color_top: Vec3::ONE,
            color_bottom: Vec3::splat(0.87),
            noise: NoiseShape::default(),
        }
    }
}

impl CloudParams {
    /// Number of splats a rebuild generates: `floor(particle_count * cloud_density)`.
    ///
    /// Non-positive or NaN products yield zero.
    pub fn effective_count(&self) -> usize {
        let count = (self.particle_count as f32 * self.cloud_density).floor();
        if count.is_nan() || count <= 0.0 {
            0
        } else {
            count as usize
        }
    }

    pub fn get(&self, field: ParamField) -> f32 {
        match field {
            ParamField::WindSpeed => self.wind_speed,
            ParamField::ParticleCount => self.particle_count as f32,
            ParamField::CloudDensity => self.cloud_density,
            ParamField::Opacity => self.opacity,
            ParamField::Fluffiness => self.fluffiness,
            ParamField::Turbulence => self.turbulence,
            ParamField::Octaves => self.noise.octaves as f32,
            ParamField::Frequency => self.noise.frequency,
            ParamField::Amplitude => self.noise.amplitude,
            ParamField::Lacunarity => self.noise.lacunarity,
            ParamField::Persistence => self.noise.persistence,
            ParamField::Phase => self.noise.phase,
        }
    }

    /// Write `value` into `field`. Integer fields are rounded and clamped at
    /// zero. Returns `true` if the stored value changed.
    pub fn set(&mut self, field: ParamField, value: f32) -> bool {
        fn assign<T: PartialEq>(slot: &mut T, value: T) -> bool {
            if *slot == value {
                false
            } else {
                *slot = value;
                true
            }
        }

        let as_count = || value.round().max(0.0) as u32;
        match field {
            ParamField::WindSpeed => assign(&mut self.wind_speed, value),
            ParamField::ParticleCount => assign(&mut self.particle_count, as_count()),
            ParamField::CloudDensity => assign(&mut self.cloud_density, value),
            ParamField::Opacity => assign(&mut self.opacity, value),
            ParamField::Fluffiness => assign(&mut self.fluffiness, value),
            ParamField::Turbulence => assign(&mut self.turbulence, value),
            ParamField::Octaves => assign(&mut self.noise.octaves, as_count()),
            ParamField::Frequency => assign(&mut self.noise.frequency, value),
            ParamField::Amplitude => assign(&mut self.noise.amplitude, value),
            ParamField::Lacunarity => assign(&mut self.noise.lacunarity, value),
            ParamField::Persistence => assign(&mut self.noise.persistence, value),
            ParamField::Phase => assign(&mut self.noise.phase, value),
        }
    }

    pub fn color(&self, slot: ColorSlot) -> Vec3 {
        match slot {
            ColorSlot::Top => self.color_top,
            ColorSlot::Bottom => self.color_bottom,
        }
    }

    /// Returns `true` if the stored colour changed.
    pub fn set_color(&mut self, slot: ColorSlot, color: Vec3) -> bool {
        let target = match slot {
            ColorSlot::Top => &mut self.color_top,
            ColorSlot::Bottom => &mut self.color_bottom,
        };
        if *target == color {
            return false;
        }
        *target = color;
        true
    }
}

/// What a parameter write requires of the controller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamEffect {
    /// The splats must be regenerated.
    Rebuild,
    /// Only the per-frame animation reads it.
    Drift,
}

/// Group a parameter is shown under.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamFolder {
    Main,
    Advanced,
}

/// Every numeric cloud parameter.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum ParamField {
    WindSpeed,
    ParticleCount,
    CloudDensity,
    Opacity,
    Fluffiness,
    Turbulence,
    Octaves,
    Frequency,
    Amplitude,
    Lacunarity,
    Persistence,
    Phase,
}

impl ParamField {
    pub const ALL: [Self; 12] = [
        Self::WindSpeed,
        Self::Opacity,
        Self::Fluffiness,
        Self::Turbulence,
        Self::CloudDensity,
        Self::Octaves,
        Self::Frequency,
        Self::Amplitude,
        Self::Lacunarity,
        Self::Persistence,
        Self::Phase,
        Self::ParticleCount,
    ];

    /// Rebuild/no-rebuild classification.
    pub fn effect(&self) -> ParamEffect {
        match self {
            Self::WindSpeed => ParamEffect::Drift,
            _ => ParamEffect::Rebuild,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::WindSpeed => "Wind Speed",
            Self::ParticleCount => "Particle Count",
            Self::CloudDensity => "Cloud Density",
            Self::Opacity => "Thickness",
            Self::Fluffiness => "Fluffiness",
            Self::Turbulence => "Turbulence",
            Self::Octaves => "Noise Octaves",
            Self::Frequency => "Noise Frequency",
            Self::Amplitude => "Noise Amplitude",
            Self::Lacunarity => "Noise Lacunarity",
            Self::Persistence => "Noise Persistence",
            Self::Phase => "Noise Phase",
        }
    }

    pub fn range(&self) -> RangeInclusive<f32> {
        match self {
            Self::WindSpeed => -1.0..=1.0,
            Self::ParticleCount => 1_000.0..=60_000.0,
            Self::CloudDensity => 0.1..=1.0,
            Self::Opacity => 0.05..=1.0,
            Self::Fluffiness => 0.0..=2.0,
            Self::Turbulence => 0.0..=1.0,
            Self::Octaves => 1.0..=8.0,
            Self::Frequency => 0.1..=1.0,
            Self::Amplitude => 0.0..=2.0,
            Self::Lacunarity => 1.0..=4.0,
            Self::Persistence => 0.0..=1.0,
            Self::Phase => 0.0..=1.0,
        }
    }

    pub fn step(&self) -> f64 {
        match self {
            Self::WindSpeed => 0.1,
            Self::ParticleCount => 1_000.0,
            Self::Octaves => 1.0,
            _ => 0.01,
        }
    }

    pub fn folder(&self) -> ParamFolder {
        match self {
            Self::WindSpeed
            | Self::Opacity
            | Self::Fluffiness
            | Self::Turbulence
            | Self::CloudDensity => ParamFolder::Main,
            _ => ParamFolder::Advanced,
        }
    }

    /// Integer-valued parameters.
    pub fn is_integer(&self) -> bool {
        matches!(self, Self::ParticleCount | Self::Octaves)
    }
}

/// The two ends of the vertical colour gradient.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Reflect)]
pub enum ColorSlot {
    Top,
    Bottom,
}

impl ColorSlot {
    pub const ALL: [Self; 2] = [Self::Top, Self::Bottom];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Top => "Top Color",
            Self::Bottom => "Bottom Color",
        }
    }
}
