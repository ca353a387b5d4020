use bevy::prelude::*;
use bevy_egui::{EguiContext, EguiContextSettings, EguiContexts, EguiPrimaryContextPass, egui};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::theme::grid_label;

/// App settings that persist to disk
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Settings {
    /// UI scale factor (1.0 = default)
    pub ui_scale: f32,
    /// Camera movement speed
    pub camera_speed: f32,
    /// Camera mouse sensitivity
    pub camera_sensitivity: f32,
    /// Show the cloud panel
    #[serde(default = "default_show_panel")]
    pub show_panel: bool,
}

fn default_show_panel() -> bool {
    true
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            camera_speed: 2.0,
            camera_sensitivity: 0.003,
            show_panel: true,
        }
    }
}

impl Settings {
    /// Get the settings file path
    fn file_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut p| {
            p.push("bevy_cloud_sky");
            p.push("settings.ron");
            p
        })
    }

    /// Load settings from disk, or return defaults if not found
    pub fn load() -> Self {
        Self::file_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    /// Load from a specific file. Missing or malformed files yield defaults.
    pub fn load_from(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            return Self::default();
        };
        ron::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring malformed settings at {:?}: {}", path, e);
            Self::default()
        })
    }

    /// Save settings to disk
    pub fn save(&self) {
        let Some(path) = Self::file_path() else {
            error!("Could not determine config directory");
            return;
        };
        match self.save_to(&path) {
            Ok(()) => info!("Settings saved to: {:?}", path),
            Err(e) => error!("Failed to save settings: {}", e),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(SettingsError::Io)?;
        }
        let content = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(SettingsError::Serialize)?;
        fs::write(path, content).map_err(SettingsError::Io)
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Serialize(ron::Error),
}

impl std::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "I/O error: {}", e),
            SettingsError::Serialize(e) => write!(f, "serialization error: {}", e),
        }
    }
}

impl std::error::Error for SettingsError {}

/// Resource to track if settings window is open
#[derive(Resource, Default)]
pub struct SettingsWindowState {
    pub open: bool,
}

pub struct SettingsPlugin;

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(Settings::load())
            .init_resource::<SettingsWindowState>()
            .add_systems(Update, (toggle_settings_window, apply_ui_scale))
            .add_systems(EguiPrimaryContextPass, draw_settings_window);
    }
}

fn toggle_settings_window(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut window_state: ResMut<SettingsWindowState>,
    mut settings: ResMut<Settings>,
) {
    if keyboard.just_pressed(KeyCode::F1) {
        window_state.open = !window_state.open;
    }
    if keyboard.just_pressed(KeyCode::F2) {
        settings.show_panel = !settings.show_panel;
        settings.save();
    }
}

/// Apply UI scale to egui
fn apply_ui_scale(
    settings: Res<Settings>,
    mut query: Query<&mut EguiContextSettings, With<EguiContext>>,
) {
    for mut ctx_settings in &mut query {
        if ctx_settings.scale_factor != settings.ui_scale {
            ctx_settings.scale_factor = settings.ui_scale;
        }
    }
}

/// Draw the settings window
fn draw_settings_window(
    mut contexts: EguiContexts,
    mut settings: ResMut<Settings>,
    mut window_state: ResMut<SettingsWindowState>,
) -> Result {
    if !window_state.open {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Settings")
        .open(&mut window_state.open)
        .resizable(false)
        .show(ctx, |ui| {
            egui::Grid::new("settings_grid")
                .num_columns(2)
                .spacing([10.0, 8.0])
                .show(ui, |ui| {
                    let mut changed = false;

                    grid_label(ui, "UI Scale");
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut settings.ui_scale, 0.75..=3.0)
                                .step_by(0.25)
                                .suffix("x"),
                        )
                        .changed();
                    ui.end_row();

                    grid_label(ui, "Movement Speed");
                    changed |= ui
                        .add(egui::Slider::new(&mut settings.camera_speed, 0.5..=20.0).step_by(0.5))
                        .changed();
                    ui.end_row();

                    grid_label(ui, "Mouse Sensitivity");
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut settings.camera_sensitivity, 0.001..=0.01)
                                .step_by(0.001),
                        )
                        .changed();
                    ui.end_row();

                    grid_label(ui, "Cloud Panel");
                    changed |= ui.checkbox(&mut settings.show_panel, "").changed();
                    ui.end_row();

                    if changed {
                        settings.save();
                    }
                });

            ui.add_space(8.0);
            if ui.button("Reset to Defaults").clicked() {
                *settings = Settings::default();
                settings.save();
            }
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_file(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("bevy_cloud_sky_settings_{}_{}", name, std::process::id()))
            .join("settings.ron")
    }

    #[test]
    fn save_then_load_keeps_values() {
        let path = temp_file("roundtrip");
        let settings = Settings {
            ui_scale: 1.5,
            camera_speed: 7.0,
            camera_sensitivity: 0.005,
            show_panel: false,
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let path = temp_file("missing");
        assert_eq!(Settings::load_from(&path), Settings::default());
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let path = temp_file("malformed");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not ron at all (").unwrap();
        assert_eq!(Settings::load_from(&path), Settings::default());
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn older_files_without_panel_flag_still_load() {
        let path = temp_file("older");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(
            &path,
            "(ui_scale: 2.0, camera_speed: 4.0, camera_sensitivity: 0.002)",
        )
        .unwrap();
        let settings = Settings::load_from(&path);
        assert_eq!(settings.ui_scale, 2.0);
        assert!(settings.show_panel);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
