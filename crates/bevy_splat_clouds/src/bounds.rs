//! The toroidal box splats live in, and the wrap that keeps them there.

use std::fmt;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Linear interpolation between `a` and `b`.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Wrap `value` into `[min, max)`, treating the interval's ends as joined.
///
/// Uses a euclidean remainder so values below `min` wrap forward instead of
/// landing in a negative-shifted range. `max - min` must be non-zero; bounds
/// are validated up front by [`CloudBounds::validate`].
pub fn wrap(value: f32, min: f32, max: f32) -> f32 {
    let range = max - min;
    let wrapped = (value - min).rem_euclid(range) + min;
    // rem_euclid of a tiny negative offset can round up to exactly `range`.
    if wrapped >= max { min } else { wrapped }
}

/// Axis that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "X"),
            Axis::Y => write!(f, "Y"),
            Axis::Z => write!(f, "Z"),
        }
    }
}

/// Errors raised when a bounding box cannot host a wrapped cloud.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundsError {
    /// `max <= min` on an axis: the wrap period would be zero or negative.
    Degenerate { axis: Axis, min: f32, max: f32 },
    /// A limit is NaN or infinite.
    NonFinite { axis: Axis },
}

impl fmt::Display for BoundsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundsError::Degenerate { axis, min, max } => write!(
                f,
                "Cloud bounds on {} axis are degenerate: min {} must be below max {}",
                axis, min, max
            ),
            BoundsError::NonFinite { axis } => {
                write!(f, "Cloud bounds on {} axis are not finite", axis)
            }
        }
    }
}

impl std::error::Error for BoundsError {}

/// Axis-aligned box the cloud wraps around.
///
/// Flattened on Y: clouds form a thin layer rather than a cube.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Reflect)]
pub struct CloudBounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for CloudBounds {
    fn default() -> Self {
        Self {
            min: Vec3::new(-8.0, -0.33, -8.0),
            max: Vec3::new(8.0, 0.33, 10.0),
        }
    }
}

impl CloudBounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Check every axis has a finite, positive extent.
    pub fn validate(&self) -> Result<(), BoundsError> {
        for (axis, min, max) in [
            (Axis::X, self.min.x, self.max.x),
            (Axis::Y, self.min.y, self.max.y),
            (Axis::Z, self.min.z, self.max.z),
        ] {
            if !min.is_finite() || !max.is_finite() {
                return Err(BoundsError::NonFinite { axis });
            }
            if max <= min {
                return Err(BoundsError::Degenerate { axis, min, max });
            }
        }
        Ok(())
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Point inside the box at fractional coordinates `t` (each in `[0, 1)`).
    pub fn lerp(&self, t: Vec3) -> Vec3 {
        Vec3::new(
            lerp(self.min.x, self.max.x, t.x),
            lerp(self.min.y, self.max.y, t.y),
            lerp(self.min.z, self.max.z, t.z),
        )
    }

    /// Wrap each component of `point` into the box.
    pub fn wrap_point(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            wrap(point.x, self.min.x, self.max.x),
            wrap(point.y, self.min.y, self.max.y),
            wrap(point.z, self.min.z, self.max.z),
        )
    }

    /// Height of `y` within the layer, clamped to `[0, 1]`.
    pub fn normalized_height(&self, y: f32) -> f32 {
        ((y - self.min.y) / (self.max.y - self.min.y)).clamp(0.0, 1.0)
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.cmpge(self.min).all() && point.cmplt(self.max).all()
    }
}
