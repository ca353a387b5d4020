use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

/// Set once the style has been pushed to egui
#[derive(Resource, Default)]
pub struct ThemeApplied(pub bool);

pub struct ThemePlugin;

impl Plugin for ThemePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ThemeApplied>()
            .add_systems(Update, apply_sky_theme);
    }
}

/// Palette: dark translucent panels that sit well over a blue sky
pub mod colors {
    use bevy_egui::egui::Color32;

    pub const BG_DARKEST: Color32 = Color32::from_rgb(14, 22, 30);
    pub const PANEL_BG: Color32 = Color32::from_rgba_premultiplied(20, 28, 38, 235);
    pub const BG_MEDIUM: Color32 = Color32::from_rgb(34, 44, 56);

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(225, 232, 238);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(165, 178, 190);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 132, 145);

    pub const ACCENT_SKY: Color32 = Color32::from_rgb(8, 162, 211);
    pub const ACCENT_STORM: Color32 = Color32::from_rgb(150, 140, 200);

    pub const WIDGET_BG: Color32 = Color32::from_rgb(42, 54, 68);
    pub const WIDGET_BG_HOVER: Color32 = Color32::from_rgb(52, 66, 82);
    pub const WIDGET_BG_ACTIVE: Color32 = Color32::from_rgb(62, 78, 96);
    pub const WIDGET_BORDER: Color32 = Color32::from_rgb(70, 86, 104);
}

/// Width of the label column in parameter grids
pub const LABEL_WIDTH: f32 = 110.0;

/// Left column label of a two-column grid
pub fn grid_label(ui: &mut egui::Ui, text: &str) {
    ui.add_sized(
        [LABEL_WIDTH, ui.spacing().interact_size.y],
        egui::Label::new(egui::RichText::new(text).color(colors::TEXT_SECONDARY)),
    );
}

pub fn section_header(ui: &mut egui::Ui, text: &str) {
    ui.label(
        egui::RichText::new(text)
            .strong()
            .size(12.0)
            .color(colors::ACCENT_SKY),
    );
}

/// Write the palette into an egui style.
pub fn sky_style(style: &mut egui::Style) {
    style.spacing.item_spacing = egui::vec2(8.0, 4.0);
    style.spacing.window_margin = egui::Margin::same(8);
    style.spacing.slider_width = 160.0;

    style.visuals.window_corner_radius = egui::CornerRadius::same(6);
    style.visuals.window_fill = colors::PANEL_BG;
    style.visuals.window_stroke = egui::Stroke::new(1.0, colors::WIDGET_BORDER);
    style.visuals.panel_fill = colors::PANEL_BG;
    style.visuals.extreme_bg_color = colors::BG_DARKEST;
    style.visuals.faint_bg_color = colors::BG_MEDIUM;

    let widgets = &mut style.visuals.widgets;
    for (state, fill) in [
        (&mut widgets.noninteractive, colors::WIDGET_BG),
        (&mut widgets.inactive, colors::WIDGET_BG),
        (&mut widgets.hovered, colors::WIDGET_BG_HOVER),
        (&mut widgets.active, colors::WIDGET_BG_ACTIVE),
    ] {
        state.bg_fill = fill;
        state.weak_bg_fill = fill;
        state.corner_radius = egui::CornerRadius::same(4);
        state.fg_stroke = egui::Stroke::new(1.0, colors::TEXT_PRIMARY);
    }
    widgets.hovered.bg_stroke = egui::Stroke::new(1.0, colors::ACCENT_SKY);
    widgets.active.bg_stroke = egui::Stroke::new(1.0, colors::ACCENT_SKY);

    style.visuals.selection.bg_fill = colors::ACCENT_SKY.linear_multiply(0.6);
    style.visuals.selection.stroke = egui::Stroke::new(1.0, colors::ACCENT_SKY);
    style.visuals.override_text_color = Some(colors::TEXT_PRIMARY);
}

fn apply_sky_theme(mut contexts: EguiContexts, mut theme_applied: ResMut<ThemeApplied>) {
    if theme_applied.0 {
        return;
    }

    let Ok(ctx) = contexts.ctx_mut() else {
        return;
    };

    let mut style = (*ctx.style()).clone();
    sky_style(&mut style);
    ctx.set_style(style);
    theme_applied.0 = true;

    info!("Applied sky theme");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_uses_the_palette() {
        let mut style = egui::Style::default();
        sky_style(&mut style);
        assert_eq!(style.visuals.window_fill, colors::PANEL_BG);
        assert_eq!(style.visuals.widgets.hovered.bg_fill, colors::WIDGET_BG_HOVER);
        assert_eq!(style.visuals.override_text_color, Some(colors::TEXT_PRIMARY));
    }
}
