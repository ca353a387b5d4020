//! Shared constants for the sky app

use bevy::prelude::*;

/// Scene background behind the sky sphere
pub const CLEAR_COLOR: Color = Color::srgb_u8(0x08, 0xa2, 0xd3);

/// Sky sphere dimensions and texture
pub mod sky {
    /// Texture path relative to the asset root
    pub const TEXTURE: &str = "sky.jpeg";
    pub const RADIUS: f32 = 10.0;
    pub const SECTORS: u32 = 60;
    pub const STACKS: u32 = 40;
}

/// Camera projection and movement defaults
pub mod camera {
    pub const FOV_DEGREES: f32 = 75.0;
    pub const MIN_FOV_DEGREES: f32 = 20.0;
    pub const MAX_FOV_DEGREES: f32 = 110.0;
    /// FOV change per scroll unit
    pub const FOV_SCROLL_SPEED: f32 = 5.0;
    pub const NEAR: f32 = 0.1;
    pub const FAR: f32 = 1000.0;
    /// Speed multiplier while Shift is held
    pub const BOOST: f32 = 3.0;
    /// Keeps the view from flipping over the poles
    pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.1;
}

/// Window title of the standalone binary
pub const WINDOW_TITLE: &str = "Cloud Sky";
