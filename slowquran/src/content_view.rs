//! Surah text: header, Bismillah, verses.

use crate::theme::{arabic_font, SlowColors};
use crate::widgets::draw_dither_hover;
use egui::{Align, Layout, RichText, Stroke};
use qurancore::api::Verse;
use qurancore::catalog::{self, shows_bismillah, BISMILLAH};
use qurancore::{LoadState, Preferences, SurahDetail, SurahId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentAction {
    Retry,
    ToggleBookmark(SurahId),
    /// Verse number that went to the clipboard.
    Copied(usize),
}

/// Clipboard text for one verse.
pub fn verse_clipboard_text(detail: &SurahDetail, verse: &Verse<'_>) -> String {
    let mut text = verse.arabic.to_string();
    if let Some(english) = verse.english.filter(|e| !e.is_empty()) {
        text.push_str("\n\n");
        text.push_str(english);
    }
    text.push_str(&format!("\n\n({} {}:{})", detail.name, detail.surah_id, verse.number));
    text
}

#[derive(Default)]
pub struct ContentView {
    shown: Option<SurahId>,
}

impl ContentView {
    pub fn show(&mut self, ui: &mut egui::Ui, state: &LoadState, prefs: &Preferences) -> Option<ContentAction> {
        match state {
            LoadState::Empty => {
                welcome(ui);
                None
            }
            LoadState::Loading { surah_id } => {
                skeleton(ui, *surah_id);
                None
            }
            LoadState::Failed { surah_id, error } => failed(ui, *surah_id, &error.to_string()),
            LoadState::Loaded(detail) => {
                let jump_to_top = self.shown != Some(detail.surah_id);
                self.shown = Some(detail.surah_id);
                self.render_surah(ui, detail, prefs, jump_to_top)
            }
        }
    }

    fn render_surah(
        &mut self,
        ui: &mut egui::Ui,
        detail: &SurahDetail,
        prefs: &Preferences,
        jump_to_top: bool,
    ) -> Option<ContentAction> {
        let mut action = None;
        let font_size = f32::from(prefs.font_size);

        let mut scroll = egui::ScrollArea::vertical().auto_shrink([false, false]);
        if jump_to_top {
            scroll = scroll.vertical_scroll_offset(0.0);
        }
        scroll.show(ui, |ui| {
            // header
            egui::Frame::none()
                .stroke(Stroke::new(1.0, SlowColors::BLACK))
                .inner_margin(egui::Margin::same(10.0))
                .show(ui, |ui| {
                    ui.horizontal(|ui| {
                        let bookmarked = prefs.bookmarks.contains(&detail.surah_id);
                        let label = if bookmarked { "★ bookmarked" } else { "☆ bookmark" };
                        if ui.button(label).clicked() {
                            action = Some(ContentAction::ToggleBookmark(detail.surah_id));
                        }
                        ui.with_layout(Layout::right_to_left(Align::Min), |ui| {
                            ui.vertical(|ui| {
                                ui.with_layout(Layout::top_down(Align::Max), |ui| {
                                    ui.label(RichText::new(&detail.name_arabic).font(arabic_font(font_size + 4.0)));
                                    ui.label(format!(
                                        "{}  ·  {}  ·  {} ayat",
                                        detail.name, detail.name_translation, detail.total_ayah
                                    ));
                                    if let Some(summary) = catalog::surah_by_id(detail.surah_id) {
                                        ui.small(summary.revelation_place.as_str());
                                    }
                                });
                            });
                        });
                    });
                });
            ui.add_space(12.0);

            if detail.verse_count() == 0 {
                ui.label("this surah has no verses to show");
                return;
            }

            if shows_bismillah(detail.surah_id) {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new(BISMILLAH).font(arabic_font(font_size)));
                });
                ui.add_space(12.0);
            }

            for verse in detail.verses() {
                if verse_block(ui, &verse, font_size, prefs.translation_enabled) {
                    ui.output_mut(|o| o.copied_text = verse_clipboard_text(detail, &verse));
                    action = Some(ContentAction::Copied(verse.number));
                }
                ui.add_space(8.0);
            }
            ui.add_space(8.0);
        });

        action
    }
}

/// One framed verse. Returns true when its copy button was clicked.
fn verse_block(ui: &mut egui::Ui, verse: &Verse<'_>, font_size: f32, translation: bool) -> bool {
    let mut copy = false;
    egui::Frame::none()
        .stroke(Stroke::new(1.0, SlowColors::BLACK))
        .inner_margin(egui::Margin::same(10.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("{}", verse.number)).monospace());
                if ui.small_button("copy").on_hover_text("copy verse").clicked() {
                    copy = true;
                }
            });
            ui.with_layout(Layout::top_down(Align::Max), |ui| {
                ui.add(egui::Label::new(RichText::new(verse.arabic).font(arabic_font(font_size))).wrap(true));
            });
            if translation {
                if let Some(english) = verse.english {
                    ui.add_space(4.0);
                    ui.add(egui::Label::new(RichText::new(english).size((font_size * 0.6).max(12.0))).wrap(true));
                }
            }
        });
    copy
}

fn welcome(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.heading("slowQuran");
        ui.add_space(8.0);
        ui.label("select a surah to start reading");
        ui.add_space(4.0);
        ui.small("search by name, meaning or place of revelation");
    });
}

/// Placeholder blocks while a surah is on its way.
fn skeleton(ui: &mut egui::Ui, surah_id: SurahId) {
    let name = catalog::surah_by_id(surah_id).map(|s| s.name).unwrap_or("surah");
    ui.label(format!("loading {}...", name));
    ui.add_space(8.0);
    let width = ui.available_width();
    for (i, fraction) in [0.35_f32, 0.75, 0.6, 0.8, 0.5, 0.7].iter().enumerate() {
        let height = if i == 0 { 48.0 } else { 36.0 };
        let (rect, _) = ui.allocate_exact_size(egui::vec2(width, height), egui::Sense::hover());
        if ui.is_rect_visible(rect) {
            let painter = ui.painter();
            painter.rect_stroke(rect, 0.0, Stroke::new(1.0, SlowColors::BLACK));
            let bar = egui::Rect::from_min_size(
                rect.min + egui::vec2(8.0, 8.0),
                egui::vec2((rect.width() - 16.0) * fraction, height - 16.0),
            );
            draw_dither_hover(painter, bar);
        }
        ui.add_space(8.0);
    }
}

fn failed(ui: &mut egui::Ui, surah_id: SurahId, message: &str) -> Option<ContentAction> {
    let name = catalog::surah_by_id(surah_id).map(|s| s.name).unwrap_or("surah");
    let mut action = None;
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.heading(format!("could not load {}", name));
        ui.add_space(8.0);
        ui.label(message);
        ui.add_space(12.0);
        if ui.button("try again").clicked() {
            action = Some(ContentAction::Retry);
        }
    });
    action
}
