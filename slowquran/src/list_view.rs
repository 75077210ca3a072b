//! Surah list with fuzzy search.

use crate::widgets::SurahRow;
use egui::{Key, RichText};
use qurancore::catalog::catalog;
use qurancore::{Preferences, SearchIndex, SurahId, SurahSummary};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ListAction {
    Select(SurahId),
    ToggleBookmark(SurahId),
}

pub struct ListView {
    index: SearchIndex<'static>,
    query: String,
    results: Vec<&'static SurahSummary>,
    /// Keyboard highlight into `results`.
    cursor: Option<usize>,
    scroll_to_cursor: bool,
}

impl ListView {
    pub fn new() -> Self {
        let index = SearchIndex::new(catalog());
        let results = index.search("");
        Self { index, query: String::new(), results, cursor: None, scroll_to_cursor: false }
    }

    pub fn results(&self) -> &[&'static SurahSummary] {
        &self.results
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
        self.refresh();
    }

    fn refresh(&mut self) {
        self.results = self.index.search(&self.query);
        // a typed query highlights the best hit so enter opens it
        self.cursor = if self.results.is_empty() || self.query.trim().is_empty() { None } else { Some(0) };
    }

    fn move_cursor(&mut self, down: bool, selected: Option<SurahId>) {
        if self.results.is_empty() {
            return;
        }
        let last = self.results.len() - 1;
        let from = self
            .cursor
            .or_else(|| selected.and_then(|id| self.results.iter().position(|s| s.id == id)));
        self.cursor = Some(match (from, down) {
            (None, _) => 0,
            (Some(i), true) => (i + 1).min(last),
            (Some(i), false) => i.saturating_sub(1),
        });
        self.scroll_to_cursor = true;
    }

    pub fn show(&mut self, ui: &mut egui::Ui, selected: Option<SurahId>, prefs: &Preferences) -> Option<ListAction> {
        let mut action = None;

        ui.horizontal(|ui| {
            ui.label(RichText::new("surahs").strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(format!("{}", self.results.len()));
            });
        });
        let search = ui.add(
            egui::TextEdit::singleline(&mut self.query)
                .hint_text("search name, meaning, place")
                .desired_width(f32::INFINITY),
        );
        if search.changed() {
            self.refresh();
        }

        if search.has_focus() || !ui.ctx().wants_keyboard_input() {
            let (down, up, enter) = ui.input(|i| {
                (i.key_pressed(Key::ArrowDown), i.key_pressed(Key::ArrowUp), i.key_pressed(Key::Enter))
            });
            if down {
                self.move_cursor(true, selected);
            }
            if up {
                self.move_cursor(false, selected);
            }
            if enter {
                if let Some(s) = self.cursor.and_then(|i| self.results.get(i)) {
                    action = Some(ListAction::Select(s.id));
                }
            }
        }
        ui.separator();

        if self.results.is_empty() {
            ui.vertical_centered(|ui| {
                ui.add_space(20.0);
                ui.label("no surah matches");
            });
            return action;
        }

        egui::ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
            for (i, surah) in self.results.iter().enumerate() {
                let highlighted = match self.cursor {
                    Some(c) => c == i,
                    None => selected == Some(surah.id),
                };
                let bookmarked = prefs.bookmarks.contains(&surah.id);
                ui.horizontal(|ui| {
                    ui.spacing_mut().item_spacing.x = 0.0;
                    let star = if bookmarked { "★" } else { "☆" };
                    let toggle = ui
                        .add_sized([24.0, SurahRow::HEIGHT], egui::Button::new(star).frame(false))
                        .on_hover_text(if bookmarked { "remove bookmark" } else { "bookmark" });
                    if toggle.clicked() {
                        action = Some(ListAction::ToggleBookmark(surah.id));
                    }
                    let row = ui.add(
                        SurahRow::new(surah)
                            .selected(highlighted)
                            .last_read(prefs.last_read_surah == Some(surah.id)),
                    );
                    if row.clicked() {
                        action = Some(ListAction::Select(surah.id));
                    }
                    if highlighted && self.scroll_to_cursor {
                        row.scroll_to_me(Some(egui::Align::Center));
                    }
                });
            }
        });
        self.scroll_to_cursor = false;

        if let Some(ListAction::Select(_)) = action {
            self.cursor = None;
        }
        action
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_with_full_catalog() {
        let list = ListView::new();
        assert_eq!(list.results().len(), 114);
        assert_eq!(list.cursor, None);
    }

    #[test]
    fn test_query_filters_and_highlights_first() {
        let mut list = ListView::new();
        list.set_query("cave");
        assert_eq!(list.results().first().map(|s| s.id), Some(18));
        assert_eq!(list.cursor, Some(0));
        list.set_query("  ");
        assert_eq!(list.results().len(), 114);
        assert_eq!(list.cursor, None);
    }

    #[test]
    fn test_cursor_starts_from_selection_and_is_bounded() {
        let mut list = ListView::new();
        list.move_cursor(true, Some(114));
        assert_eq!(list.cursor, Some(113));
        list.cursor = None;
        list.move_cursor(false, Some(1));
        assert_eq!(list.cursor, Some(0));
        list.cursor = None;
        list.move_cursor(true, None);
        assert_eq!(list.cursor, Some(0));
    }
}
