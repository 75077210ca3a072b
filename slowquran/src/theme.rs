//! slowQuran theme: black and white, 1px outlines.
//!
//! Latin text uses egui's built-in fonts. Arabic glyphs come from a font
//! file named in the config and live in their own family so verse text can
//! ask for it explicitly.

use egui::{Color32, FontData, FontDefinitions, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use std::path::Path;
use tracing::{info, warn};

pub const ARABIC_FAMILY: &str = "arabic";

pub struct SlowColors;

impl SlowColors {
    pub const WHITE: Color32 = Color32::from_rgb(255, 255, 255);
    pub const BLACK: Color32 = Color32::from_rgb(0, 0, 0);
}

pub struct SlowTheme {
    pub font_size_body: f32,
    pub font_size_heading: f32,
    pub font_size_small: f32,
    pub window_padding: f32,
    pub item_spacing: f32,
}

impl Default for SlowTheme {
    fn default() -> Self {
        Self {
            font_size_body: 14.0,
            font_size_heading: 22.0,
            font_size_small: 11.0,
            window_padding: 8.0,
            item_spacing: 4.0,
        }
    }
}

impl SlowTheme {
    /// Install fonts and black-and-white visuals on `ctx`.
    pub fn apply(&self, ctx: &egui::Context, arabic_font: Option<&Path>) {
        ctx.set_fonts(font_definitions(arabic_font));

        let mut style = Style::default();
        style.text_styles = [
            (TextStyle::Small, FontId::new(self.font_size_small, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(self.font_size_heading, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(self.font_size_body, FontFamily::Monospace)),
        ]
        .into();

        let mut visuals = Visuals::light();
        visuals.window_fill = SlowColors::WHITE;
        visuals.panel_fill = SlowColors::WHITE;
        visuals.faint_bg_color = SlowColors::WHITE;
        visuals.extreme_bg_color = SlowColors::WHITE;
        visuals.window_rounding = Rounding::ZERO;
        visuals.menu_rounding = Rounding::ZERO;
        visuals.window_stroke = Stroke::new(1.0, SlowColors::BLACK);

        let bw = |ws: &mut egui::style::WidgetVisuals| {
            ws.bg_fill = SlowColors::WHITE;
            ws.weak_bg_fill = SlowColors::WHITE;
            ws.bg_stroke = Stroke::new(1.0, SlowColors::BLACK);
            ws.fg_stroke = Stroke::new(1.0, SlowColors::BLACK);
            ws.rounding = Rounding::ZERO;
        };
        bw(&mut visuals.widgets.noninteractive);
        bw(&mut visuals.widgets.inactive);
        bw(&mut visuals.widgets.hovered);
        bw(&mut visuals.widgets.active);
        bw(&mut visuals.widgets.open);

        // translucent so the dither overlay still reads
        visuals.selection.bg_fill = Color32::from_rgba_premultiplied(0, 0, 0, 80);
        visuals.selection.stroke = Stroke::new(1.0, SlowColors::BLACK);

        style.visuals = visuals;
        style.spacing.window_margin = egui::Margin::same(self.window_padding);
        style.spacing.item_spacing = egui::vec2(self.item_spacing, self.item_spacing);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);
        ctx.set_style(style);
    }
}

/// egui's defaults plus the Arabic family. Without a usable font file the
/// family falls back to the proportional fonts.
fn font_definitions(arabic_font: Option<&Path>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();
    let mut arabic_stack: Vec<String> = Vec::new();

    if let Some(path) = arabic_font {
        match std::fs::read(path) {
            Ok(bytes) => {
                info!(path = %path.display(), "loaded arabic font");
                fonts.font_data.insert(ARABIC_FAMILY.to_owned(), FontData::from_owned(bytes));
                arabic_stack.push(ARABIC_FAMILY.to_owned());
                // also a fallback for Arabic names in list rows
                fonts
                    .families
                    .entry(FontFamily::Proportional)
                    .or_default()
                    .push(ARABIC_FAMILY.to_owned());
            }
            Err(e) => warn!(path = %path.display(), error = %e, "arabic font unavailable"),
        }
    }

    if let Some(proportional) = fonts.families.get(&FontFamily::Proportional) {
        for name in proportional {
            if !arabic_stack.contains(name) {
                arabic_stack.push(name.clone());
            }
        }
    }
    fonts.families.insert(FontFamily::Name(ARABIC_FAMILY.into()), arabic_stack);
    fonts
}

/// Font for verse text at `size` px.
pub fn arabic_font(size: f32) -> FontId {
    FontId::new(size, FontFamily::Name(ARABIC_FAMILY.into()))
}

/// Framed strip for the menu bar.
pub fn menu_bar(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui)) {
    egui::Frame::none()
        .fill(SlowColors::WHITE)
        .stroke(Stroke::new(1.0, SlowColors::BLACK))
        .inner_margin(egui::Margin::symmetric(4.0, 2.0))
        .show(ui, |ui| {
            ui.horizontal(add_contents);
        });
}

/// Drop Tab and cmd +/- before egui sees them; Tab would walk focus through
/// the menus and cmd +/- would zoom the whole UI instead of the verse text.
pub fn consume_special_keys(ctx: &egui::Context) {
    ctx.input_mut(|i| {
        i.events.retain(|e| match e {
            egui::Event::Key { key: egui::Key::Tab, .. } => false,
            egui::Event::Text(text) if text.contains('\t') => false,
            egui::Event::Key { key, modifiers, .. }
                if modifiers.command && matches!(key, egui::Key::Plus | egui::Key::Minus | egui::Key::Equals) =>
            {
                false
            }
            _ => true,
        });
    });
}
