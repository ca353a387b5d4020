//! Standalone cloud sky viewer.

use bevy::prelude::*;
use bevy_cloud_sky::CloudSkyPlugin;
use bevy_cloud_sky::constants::WINDOW_TITLE;

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: WINDOW_TITLE.to_string(),
                ..default()
            }),
            ..default()
        }))
        .add_plugins(CloudSkyPlugin::default())
        .run();
}
