mod cloud_panel;
mod settings;
pub mod theme;

pub use cloud_panel::*;
pub use settings::*;

use bevy::prelude::*;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(theme::ThemePlugin)
            .add_plugins(SettingsPlugin)
            .add_plugins(CloudPanelPlugin);
    }
}
