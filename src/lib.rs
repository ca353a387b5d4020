//! # Bevy Cloud Sky
//!
//! A small sky scene around [`bevy_splat_clouds`]: a fly camera, a textured
//! sky sphere and a live panel for tuning the cloud layer.
//!
//! ## Quick Start
//!
//! ```no_run
//! use bevy::prelude::*;
//! use bevy_cloud_sky::CloudSkyPlugin;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(CloudSkyPlugin::default())
//!         .run();
//! }
//! ```
//!
//! ## Controls
//!
//! - **Right mouse drag**: look around
//! - **WASD / Space / Ctrl**: move, Shift to go faster
//! - **Scroll**: field of view
//! - **F1**: settings window
//! - **F2**: show or hide the cloud panel

pub mod camera;
pub mod constants;
pub mod sky;
pub mod ui;

use bevy::prelude::*;
use bevy_egui::EguiPlugin;
use bevy_splat_clouds::SplatCloudPlugin;

pub use camera::{FlyCamera, FlyCameraPlugin};
pub use sky::SkyPlugin;
pub use ui::{Settings, UiPlugin};

/// Bundles the cloud layer with the camera, sky and UI
#[derive(Default)]
pub struct CloudSkyPlugin {
    pub clouds: SplatCloudPlugin,
}

impl Plugin for CloudSkyPlugin {
    fn build(&self, app: &mut App) {
        app
            // Third-party plugins
            .add_plugins(EguiPlugin::default())
            // Scene
            .add_plugins(self.clouds.clone())
            .add_plugins(FlyCameraPlugin)
            .add_plugins(SkyPlugin)
            // UI
            .add_plugins(UiPlugin);
    }
}
