//! Palette and one-time style application for code-block windows.

use eframe::egui::{self, Color32, CornerRadius, FontFamily, FontId, Stroke, TextStyle, Visuals};

pub const COLOR_BG_PRIMARY: Color32 = Color32::from_rgb(0x0d, 0x11, 0x17);
pub const COLOR_BG_BLOCK: Color32 = Color32::from_rgb(0x16, 0x1b, 0x22);
pub const COLOR_BG_HEADER: Color32 = Color32::from_rgb(0x21, 0x26, 0x29);
pub const COLOR_TEXT_PRIMARY: Color32 = Color32::from_rgb(0xc9, 0xd1, 0xd9);
pub const COLOR_TEXT_MUTED: Color32 = Color32::from_rgb(0x6e, 0x76, 0x81);
pub const COLOR_BORDER: Color32 = Color32::from_rgb(0x30, 0x36, 0x3d);
pub const COLOR_BORDER_FOCUSED: Color32 = Color32::from_rgb(0x3B, 0x82, 0xF6);

/// Gutter number opacity for lines touched by the selection.
pub const GUTTER_SELECTED_OPACITY: f32 = 1.0;
/// Gutter number opacity for all other lines.
pub const GUTTER_IDLE_OPACITY: f32 = 0.5;
/// Gap between the gutter and the text.
pub const GUTTER_PADDING: f32 = 8.0;

pub const BLOCK_CORNER_RADIUS: u8 = 6;

/// Monospace font used by the editor and its gutter.
pub fn editor_font(font_size: f32) -> FontId {
    FontId::new(font_size, FontFamily::Monospace)
}

/// Gutter number color for a line.
pub fn gutter_color(selected: bool) -> Color32 {
    let opacity = if selected {
        GUTTER_SELECTED_OPACITY
    } else {
        GUTTER_IDLE_OPACITY
    };
    COLOR_TEXT_PRIMARY.gamma_multiply(opacity)
}

/// Block frame stroke; focused blocks get the accent border.
pub fn block_stroke(focused: bool) -> Stroke {
    Stroke::new(
        1.0,
        if focused {
            COLOR_BORDER_FOCUSED
        } else {
            COLOR_BORDER
        },
    )
}

/// Applies the dark palette and sizes the monospace style to `font_size`.
pub fn apply_style(ctx: &egui::Context, font_size: f32) {
    let mut style = (*ctx.style()).clone();
    style.visuals = Visuals::dark();
    style.visuals.override_text_color = Some(COLOR_TEXT_PRIMARY);
    style.visuals.panel_fill = COLOR_BG_PRIMARY;
    style.visuals.extreme_bg_color = COLOR_BG_BLOCK;
    style.visuals.window_stroke = Stroke::new(1.0, COLOR_BORDER);
    style.visuals.widgets.noninteractive.corner_radius = CornerRadius::same(BLOCK_CORNER_RADIUS);
    style
        .text_styles
        .insert(TextStyle::Monospace, editor_font(font_size));
    ctx.set_style(style);
}
