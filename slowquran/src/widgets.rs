//! Custom widgets: pure black and white, dithered overlays

use crate::theme::SlowColors;
use egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Response, Sense, Stroke, Ui, Widget};
use qurancore::SurahSummary;

/// Checkerboard over `rect`; `density` 1 is every other pixel, higher is sparser.
pub fn draw_dither_rect(painter: &Painter, rect: Rect, color: Color32, density: u32) {
    let step = density.max(1) as i32;
    let (x0, y0) = (rect.min.x as i32, rect.min.y as i32);
    let (x1, y1) = (rect.max.x as i32, rect.max.y as i32);
    let mut y = y0;
    while y < y1 {
        let offset = if (y - y0) % (step * 2) < step { 0 } else { step };
        let mut x = x0 + offset;
        while x < x1 {
            painter.rect_filled(
                Rect::from_min_size(Pos2::new(x as f32, y as f32), egui::Vec2::splat(1.0)),
                0.0,
                color,
            );
            x += step * 2;
        }
        y += step;
    }
}

pub fn draw_dither_selection(painter: &Painter, rect: Rect) {
    draw_dither_rect(painter, rect, SlowColors::BLACK, 1);
}

pub fn draw_dither_hover(painter: &Painter, rect: Rect) {
    draw_dither_rect(painter, rect, SlowColors::BLACK, 2);
}

/// Status bar: white bg, 1px black border
pub fn status_bar(ui: &mut Ui, text: &str) {
    egui::Frame::none()
        .fill(SlowColors::WHITE)
        .stroke(Stroke::new(1.0, SlowColors::BLACK))
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.label(text);
        });
}

/// One surah in the list. The bookmark marker is drawn here but the toggle
/// itself is a separate button so its click never selects the row.
pub struct SurahRow<'a> {
    surah: &'a SurahSummary,
    selected: bool,
    last_read: bool,
}

impl<'a> SurahRow<'a> {
    pub const HEIGHT: f32 = 36.0;

    pub fn new(surah: &'a SurahSummary) -> Self {
        Self { surah, selected: false, last_read: false }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }

    pub fn last_read(mut self, last_read: bool) -> Self {
        self.last_read = last_read;
        self
    }
}

impl<'a> Widget for SurahRow<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(ui.available_width(), Self::HEIGHT), Sense::click());

        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_filled(rect, 0.0, SlowColors::WHITE);
            painter.hline(rect.x_range(), rect.max.y, Stroke::new(1.0, SlowColors::BLACK));

            let color = if self.selected {
                draw_dither_selection(painter, rect);
                SlowColors::WHITE
            } else {
                if response.hovered() {
                    draw_dither_hover(painter, rect);
                }
                SlowColors::BLACK
            };

            let s = self.surah;
            painter.text(
                Pos2::new(rect.min.x + 6.0, rect.center().y),
                Align2::LEFT_CENTER,
                format!("{:>3}", s.id),
                FontId::monospace(12.0),
                color,
            );
            let title = if self.last_read { format!("{}  *", s.name) } else { s.name.to_string() };
            painter.text(
                Pos2::new(rect.min.x + 36.0, rect.min.y + 10.0),
                Align2::LEFT_CENTER,
                title,
                FontId::proportional(13.0),
                color,
            );
            painter.text(
                Pos2::new(rect.min.x + 36.0, rect.max.y - 10.0),
                Align2::LEFT_CENTER,
                format!("{} · {} ayah · {}", s.name_translation, s.total_ayah, s.revelation_place),
                FontId::proportional(10.0),
                color,
            );
            painter.text(
                Pos2::new(rect.max.x - 30.0, rect.center().y),
                Align2::RIGHT_CENTER,
                s.name_arabic,
                FontId::proportional(15.0),
                color,
            );
        }

        response
    }
}

/// Horizontal bar filled up to `fraction`, click or drag to change it.
/// Returns the new fraction while the pointer is on it.
pub fn fill_bar(ui: &mut Ui, width: f32, fraction: f32, label: &str) -> Option<f32> {
    let (rect, response) = ui.allocate_exact_size(egui::vec2(width, 18.0), Sense::click_and_drag());
    let fraction = if fraction.is_finite() { fraction.clamp(0.0, 1.0) } else { 0.0 };

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();
        painter.rect_filled(rect, 0.0, SlowColors::WHITE);
        painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SlowColors::BLACK));
        let filled = Rect::from_min_size(rect.min, egui::vec2(rect.width() * fraction, rect.height()));
        painter.rect_filled(filled, 0.0, SlowColors::BLACK);
        let text_color = if fraction > 0.5 { SlowColors::WHITE } else { SlowColors::BLACK };
        painter.text(rect.center(), Align2::CENTER_CENTER, label, FontId::proportional(11.0), text_color);
    }

    if response.clicked() || response.dragged() {
        response
            .interact_pointer_pos()
            .map(|pos| ((pos.x - rect.min.x) / rect.width()).clamp(0.0, 1.0))
    } else {
        None
    }
}
