//! The "Clouds" window: live sliders for every cloud parameter, grouped the
//! way [`ParamField::folder`] says, plus one button per weather preset.

use bevy::prelude::*;
use bevy_egui::{EguiContexts, EguiPrimaryContextPass, egui};
use bevy_splat_clouds::prelude::*;
use bevy_splat_clouds::{CloudConfig, ParamFolder};

use super::settings::{Settings, SettingsWindowState};
use super::theme::{colors, grid_label, section_header};

pub struct CloudPanelPlugin;

impl Plugin for CloudPanelPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            EguiPrimaryContextPass,
            draw_cloud_panel.run_if(resource_exists::<CloudController>),
        );
    }
}

/// Fields shown in `folder`, in display order.
pub fn fields_in(folder: ParamFolder) -> impl Iterator<Item = ParamField> {
    ParamField::ALL
        .into_iter()
        .filter(move |field| field.folder() == folder)
}

/// Summary shown under the sliders.
pub fn status_line(controller: &CloudController) -> String {
    format!(
        "{} splats, generation {}",
        controller.splats().len(),
        controller.generation()
    )
}

fn param_slider(field: ParamField, value: &mut f32) -> egui::Slider<'_> {
    let slider = egui::Slider::new(value, field.range());
    let slider = if field.is_integer() { slider.integer() } else { slider };
    slider.step_by(field.step())
}

/// One slider row per field. Writes go through the controller so it can
/// decide whether the cloud has to be rebuilt.
fn param_grid(ui: &mut egui::Ui, id: &str, folder: ParamFolder, controller: &mut CloudController) {
    egui::Grid::new(id)
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            for field in fields_in(folder) {
                grid_label(ui, field.label());
                let mut value = controller.params().get(field);
                if ui.add(param_slider(field, &mut value)).changed() {
                    controller.set(field, value);
                }
                ui.end_row();
            }
        });
}

fn color_grid(ui: &mut egui::Ui, controller: &mut CloudController) {
    egui::Grid::new("cloud_color_grid")
        .num_columns(2)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            for slot in ColorSlot::ALL {
                grid_label(ui, slot.label());
                let mut rgb = controller.params().color(slot).to_array();
                if ui.color_edit_button_rgb(&mut rgb).changed() {
                    controller.set_color(slot, Vec3::from_array(rgb));
                }
                ui.end_row();
            }
        });
}

fn draw_cloud_panel(
    mut contexts: EguiContexts,
    mut controller: ResMut<CloudController>,
    library: Res<WeatherLibrary>,
    config: Res<CloudConfig>,
    settings: Res<Settings>,
    mut settings_window: ResMut<SettingsWindowState>,
    mut presets: MessageWriter<ApplyWeatherPreset>,
) -> Result {
    if !settings.show_panel {
        return Ok(());
    }

    let ctx = contexts.ctx_mut()?;

    egui::Window::new("Clouds")
        .default_pos([12.0, 12.0])
        .resizable(false)
        .show(ctx, |ui| {
            param_grid(ui, "cloud_main_grid", ParamFolder::Main, &mut controller);

            ui.add_space(4.0);
            egui::CollapsingHeader::new("Advanced")
                .default_open(false)
                .show(ui, |ui| {
                    param_grid(ui, "cloud_advanced_grid", ParamFolder::Advanced, &mut controller);
                    ui.add_space(4.0);
                    color_grid(ui, &mut controller);
                });

            egui::CollapsingHeader::new(egui::RichText::new("Weather").color(colors::ACCENT_STORM))
                .default_open(true)
                .show(ui, |ui| {
                    ui.horizontal_wrapped(|ui| {
                        for name in library.names() {
                            if ui.button(name).clicked() {
                                presets.write(ApplyWeatherPreset(name.to_string()));
                            }
                        }
                    });
                });

            ui.separator();
            section_header(ui, "Status");
            ui.label(egui::RichText::new(status_line(&controller)).color(colors::TEXT_MUTED));

            ui.horizontal(|ui| {
                if ui.button("Reset to Defaults").clicked() {
                    controller.replace_params(config.params.clone());
                }
                if ui.button("Settings").clicked() {
                    settings_window.open = !settings_window.open;
                }
            });
        });

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn main_folder_lists_the_top_level_sliders_in_order() {
        let main: Vec<_> = fields_in(ParamFolder::Main).collect();
        assert_eq!(
            main,
            vec![
                ParamField::WindSpeed,
                ParamField::Opacity,
                ParamField::Fluffiness,
                ParamField::Turbulence,
                ParamField::CloudDensity,
            ]
        );
    }

    #[test]
    fn every_field_appears_in_exactly_one_folder() {
        let main = fields_in(ParamFolder::Main).count();
        let advanced = fields_in(ParamFolder::Advanced).count();
        assert_eq!(main + advanced, ParamField::ALL.len());
        assert!(fields_in(ParamFolder::Advanced).any(|f| f == ParamField::ParticleCount));
    }

    #[test]
    fn status_reports_count_and_generation() {
        let params = CloudParams {
            particle_count: 10,
            cloud_density: 1.0,
            ..default()
        };
        let controller = CloudController::new(params, CloudBounds::default()).unwrap();
        assert_eq!(status_line(&controller), "10 splats, generation 1");
    }
}
