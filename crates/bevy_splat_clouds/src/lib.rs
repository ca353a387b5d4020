//! # bevy_splat_clouds
//!
//! Procedural cloud layers made of thousands of soft splats, drifting with
//! the wind inside a wrap-around box.
//!
//! Everything about a splat is derived from its index, so regenerating with
//! the same parameters reproduces the same cloud, and the wind can recompute
//! positions every frame without storing any per-splat state.
//!
//! ## Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_splat_clouds::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(SplatCloudPlugin::default())
//!         .add_systems(Update, storm_on_s)
//!         .run();
//! }
//!
//! fn storm_on_s(keys: Res<ButtonInput<KeyCode>>, mut presets: MessageWriter<ApplyWeatherPreset>) {
//!     if keys.just_pressed(KeyCode::KeyS) {
//!         presets.write(ApplyWeatherPreset("Storm".into()));
//!     }
//! }
//! ```

pub mod bounds;
pub mod controller;
pub mod hash;
pub mod noise;
pub mod params;
pub mod presets;
pub mod render;
pub mod splats;
pub mod synth;
pub mod wind;

use bevy::prelude::*;

pub use bounds::{BoundsError, CloudBounds, wrap};
pub use controller::{ApplyWeatherPreset, CloudController, CloudPhase};
pub use hash::{hash4, home_z};
pub use noise::{NoiseShape, fbm};
pub use params::{CloudParams, ColorSlot, ParamEffect, ParamField, ParamFolder};
pub use presets::{WeatherLibrary, WeatherPreset};
pub use render::{CloudMesh, CloudRoot};
pub use splats::{SplatRecord, SplatSet};
pub use synth::synthesize;
pub use wind::animate;

/// Convenient re-exports of commonly used types.
pub mod prelude {
    pub use crate::bounds::CloudBounds;
    pub use crate::controller::{ApplyWeatherPreset, CloudController};
    pub use crate::params::{CloudParams, ColorSlot, ParamField};
    pub use crate::presets::{WeatherLibrary, WeatherPreset};
    pub use crate::{SplatCloudPlugin, SplatCloudSystems};
}

/// Name the plugin registers under. Bevy rejects a second plugin with the
/// same name.
pub const CLOUD_EXTENSION_NAME: &str = "bevy_splat_clouds";

/// Where the cloud layer sits relative to the world origin.
pub const DEFAULT_PLACEMENT: Vec3 = Vec3::new(0.0, -0.5, -2.0);

/// Startup configuration, consumed by the setup system.
#[derive(Resource, Clone, Debug)]
pub struct CloudConfig {
    pub params: CloudParams,
    pub bounds: CloudBounds,
    pub placement: Vec3,
}

/// Ordering of the per-frame cloud work.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SplatCloudSystems {
    /// Preset requests are turned into parameter writes.
    Commands,
    /// Wind advances every splat.
    Animate,
    /// The mesh is brought up to date with the splats.
    Sync,
}

/// Registers the cloud subsystem.
///
/// Construction validates the bounds, so an unusable box is reported before
/// the app starts rather than on the first frame.
#[derive(Clone, Debug)]
pub struct SplatCloudPlugin {
    config: CloudConfig,
}

impl Default for SplatCloudPlugin {
    fn default() -> Self {
        Self {
            config: CloudConfig {
                params: CloudParams::default(),
                bounds: CloudBounds::default(),
                placement: DEFAULT_PLACEMENT,
            },
        }
    }
}

impl SplatCloudPlugin {
    pub fn with_bounds(bounds: CloudBounds) -> Result<Self, BoundsError> {
        bounds.validate()?;
        let mut plugin = Self::default();
        plugin.config.bounds = bounds;
        Ok(plugin)
    }

    pub fn with_params(mut self, params: CloudParams) -> Self {
        self.config.params = params;
        self
    }

    pub fn with_placement(mut self, placement: Vec3) -> Self {
        self.config.placement = placement;
        self
    }
}

impl Plugin for SplatCloudPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<CloudBounds>()
            .register_type::<CloudParams>()
            .register_type::<NoiseShape>()
            .register_type::<WeatherPreset>()
            .register_type::<ParamField>()
            .register_type::<ColorSlot>()
            .insert_resource(self.config.clone())
            .init_resource::<WeatherLibrary>()
            .init_resource::<render::RenderedCloud>()
            .add_message::<ApplyWeatherPreset>()
            .add_systems(PreStartup, presets::load_weather_presets)
            .add_systems(Startup, setup_clouds)
            .configure_sets(
                Update,
                (
                    SplatCloudSystems::Commands,
                    SplatCloudSystems::Animate,
                    SplatCloudSystems::Sync,
                )
                    .chain()
                    .run_if(resource_exists::<CloudController>),
            )
            .add_systems(
                Update,
                (
                    controller::handle_apply_preset.in_set(SplatCloudSystems::Commands),
                    controller::advance_clouds.in_set(SplatCloudSystems::Animate),
                    render::sync_cloud_mesh.in_set(SplatCloudSystems::Sync),
                ),
            );
    }

    fn name(&self) -> &str {
        CLOUD_EXTENSION_NAME
    }
}

/// One-time setup: build the controller, the shared material and the root
/// entity the cloud mesh hangs off.
fn setup_clouds(
    mut commands: Commands,
    config: Res<CloudConfig>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) -> Result {
    let controller = CloudController::new(config.params.clone(), config.bounds)?;
    let splat_count = controller.splats().len();

    commands.insert_resource(controller);
    commands.insert_resource(render::CloudMaterial(
        materials.add(render::cloud_material()),
    ));
    commands.spawn((
        Name::new("Clouds"),
        CloudRoot,
        Transform::from_translation(config.placement),
        Visibility::default(),
    ));

    info!(
        "{} setup complete ({} splats)",
        CLOUD_EXTENSION_NAME, splat_count
    );
    Ok(())
}
