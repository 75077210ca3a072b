//! slowQuran - surah list, reader and recitation player

use crate::audio::RodioOutput;
use crate::content_view::{ContentAction, ContentView};
use crate::list_view::{ListAction, ListView};
use crate::theme::{arabic_font, consume_special_keys, menu_bar, SlowColors};
use crate::toast::Toasts;
use crate::widgets::{fill_bar, status_bar};
use egui::{Context, Key, RichText};
use qurancore::catalog::{self, next_id, prev_id, surah_by_id, BISMILLAH};
use qurancore::playback::{format_time, PlayerState};
use qurancore::prefs::{FONT_SIZE_STEP, MAX_FONT_SIZE, MIN_FONT_SIZE};
use qurancore::{
    ApiClient, AppConfig, ContentLoader, LoadState, PlaybackError, PlaybackSession, PreferenceEvent,
    PreferenceStore, SurahId,
};
use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub struct SlowQuranApp {
    prefs: PreferenceStore,
    pref_events: Receiver<PreferenceEvent>,
    list: ListView,
    content: ContentView,
    loader: ContentLoader,
    player: PlaybackSession<RodioOutput>,
    /// Surah whose reciters the player currently holds.
    player_surah: Option<SurahId>,
    shown_error: Option<PlaybackError>,
    toasts: Toasts,
    show_list: bool,
    show_settings: bool,
    show_bookmarks: bool,
    show_about: bool,
}

impl SlowQuranApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: &AppConfig, client: Arc<ApiClient>) -> Self {
        let mut prefs = PreferenceStore::open_default();
        let pref_events = prefs.subscribe();
        info!(api = %config.api_base_url, prefs = %prefs.path().display(), "starting slowQuran");
        Self {
            prefs,
            pref_events,
            list: ListView::new(),
            content: ContentView::default(),
            loader: ContentLoader::new(client.clone()),
            player: PlaybackSession::new(RodioOutput::new(client)),
            player_surah: None,
            shown_error: None,
            toasts: Toasts::default(),
            show_list: true,
            show_settings: false,
            show_bookmarks: false,
            show_about: false,
        }
    }

    /// Reopen the surah the reader was on last time.
    pub fn resume_last_read(&mut self) {
        if let Some(id) = self.prefs.get().last_read_surah {
            self.select_surah(id);
        }
    }

    fn select_surah(&mut self, id: SurahId) {
        if !catalog::is_valid_id(id) {
            return;
        }
        debug!(surah = id, "selecting surah");
        self.loader.select(id);
        self.player.reset();
        self.player_surah = None;
        self.shown_error = None;
        // position within the surah is not tracked yet
        let saved = self.prefs.set_last_read(id, 1);
        self.report(saved);
    }

    fn step_surah(&mut self, forward: bool) {
        let target = match self.loader.selected() {
            Some(id) if forward => next_id(id),
            Some(id) => prev_id(id),
            None => catalog::FIRST_SURAH,
        };
        if Some(target) != self.loader.selected() {
            self.select_surah(target);
        }
    }

    fn toggle_bookmark(&mut self, id: SurahId) {
        let saved = self.prefs.toggle_bookmark(id);
        self.report(saved);
    }

    fn change_font_size(&mut self, delta: i32) {
        let size = i32::from(self.prefs.get().font_size) + delta;
        let saved = self.prefs.set_font_size(size);
        self.report(saved);
    }

    fn toggle_translation(&mut self) {
        let saved = self.prefs.toggle_translation();
        self.report(saved);
    }

    fn toggle_play(&mut self) {
        // failures are picked up from the session's error in sync_player
        let _ = self.player.toggle_play();
    }

    /// Turn a failed preference write into a toast.
    fn report(&mut self, result: qurancore::storage::Result<()>) {
        if let Err(e) = result {
            self.toasts.error(format!("could not save preferences: {}", e));
        }
    }

    fn drain_preference_events(&mut self) {
        while let Ok(event) = self.pref_events.try_recv() {
            let name = |id: SurahId| surah_by_id(id).map(|s| s.name).unwrap_or("surah");
            match event {
                PreferenceEvent::BookmarkAdded(id) => self.toasts.success(format!("bookmarked {}", name(id))),
                PreferenceEvent::BookmarkRemoved(id) => self.toasts.push(format!("removed bookmark for {}", name(id))),
                PreferenceEvent::Translation(on) => {
                    self.toasts.push(if on { "translation shown" } else { "translation hidden" })
                }
                PreferenceEvent::FontSize(_) | PreferenceEvent::LastRead { .. } => {}
            }
        }
    }

    /// Hand freshly loaded reciters to the player and surface playback errors.
    fn sync_player(&mut self) {
        if let LoadState::Loaded(detail) = self.loader.state() {
            if self.player_surah != Some(detail.surah_id) {
                self.player_surah = Some(detail.surah_id);
                self.player.load_reciters(detail.reciters.clone());
            }
        }
        self.player.poll();
        let error = self.player.last_error().cloned();
        if error.is_some() && error != self.shown_error {
            if let Some(e) = &error {
                self.toasts.error(e.to_string());
            }
        }
        self.shown_error = error;
    }

    fn close_modals(&mut self) -> bool {
        let any = self.show_settings || self.show_bookmarks || self.show_about;
        self.show_settings = false;
        self.show_bookmarks = false;
        self.show_about = false;
        any
    }

    fn handle_keys(&mut self, ctx: &Context) {
        consume_special_keys(ctx);
        let typing = ctx.wants_keyboard_input();
        ctx.input(|i| {
            let cmd = i.modifiers.command;
            if i.key_pressed(Key::Escape) {
                self.close_modals();
            }
            if cmd && i.key_pressed(Key::K) {
                self.show_settings = !self.show_settings;
            }
            if cmd && i.key_pressed(Key::B) {
                self.show_bookmarks = !self.show_bookmarks;
            }
            if cmd && i.key_pressed(Key::Backslash) {
                self.show_list = !self.show_list;
            }
            if typing || cmd {
                return;
            }
            if i.key_pressed(Key::ArrowLeft) {
                self.step_surah(false);
            }
            if i.key_pressed(Key::ArrowRight) {
                self.step_surah(true);
            }
            if i.key_pressed(Key::Space) {
                self.toggle_play();
            }
            if i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals) {
                self.change_font_size(i32::from(FONT_SIZE_STEP));
            }
            if i.key_pressed(Key::Minus) {
                self.change_font_size(-i32::from(FONT_SIZE_STEP));
            }
            if i.key_pressed(Key::T) {
                self.toggle_translation();
            }
        });
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        menu_bar(ui, |ui| {
            ui.menu_button("file", |ui| {
                if ui.button("bookmarks...  ⌘B").clicked() {
                    self.show_bookmarks = true;
                    ui.close_menu();
                }
                if ui.button("settings...   ⌘K").clicked() {
                    self.show_settings = true;
                    ui.close_menu();
                }
            });
            ui.menu_button("view", |ui| {
                let label = if self.show_list { "hide surah list  ⌘\\" } else { "show surah list  ⌘\\" };
                if ui.button(label).clicked() {
                    self.show_list = !self.show_list;
                    ui.close_menu();
                }
                let label = if self.prefs.get().translation_enabled { "hide translation  t" } else { "show translation  t" };
                if ui.button(label).clicked() {
                    self.toggle_translation();
                    ui.close_menu();
                }
                ui.separator();
                if ui.button("larger text      +").clicked() {
                    self.change_font_size(i32::from(FONT_SIZE_STEP));
                    ui.close_menu();
                }
                if ui.button("smaller text     -").clicked() {
                    self.change_font_size(-i32::from(FONT_SIZE_STEP));
                    ui.close_menu();
                }
            });
            ui.menu_button("go", |ui| {
                if ui.button("next surah      →").clicked() {
                    self.step_surah(true);
                    ui.close_menu();
                }
                if ui.button("previous surah  ←").clicked() {
                    self.step_surah(false);
                    ui.close_menu();
                }
                if let Some(id) = self.prefs.get().last_read_surah {
                    ui.separator();
                    if ui.button("last read").clicked() {
                        self.select_surah(id);
                        ui.close_menu();
                    }
                }
            });
            ui.menu_button("help", |ui| {
                if ui.button("about slowQuran").clicked() {
                    self.show_about = true;
                    ui.close_menu();
                }
            });
        });
    }

    fn status_text(&mut self) -> String {
        let prefs = self.prefs.get();
        let mut text = format!("{} bookmarks  |  {}px", prefs.bookmarks.len(), prefs.font_size);
        if let Some(s) = prefs.last_read_surah.and_then(surah_by_id) {
            text.push_str(&format!("  |  last read: {} {}:{}", s.name, s.id, prefs.last_read_ayah.unwrap_or(1)));
        }
        if let Some((kind, toast)) = self.toasts.current(Instant::now()) {
            text.push_str("  |  ");
            text.push_str(kind.marker());
            text.push_str(toast);
        }
        text
    }

    fn render_player(&mut self, ui: &mut egui::Ui) {
        if self.player.reciters().is_empty() {
            ui.vertical_centered(|ui| {
                let text = match self.loader.state() {
                    LoadState::Loaded(_) => "no recitation available",
                    _ => "select a surah to listen",
                };
                ui.label(text);
            });
            return;
        }

        ui.horizontal(|ui| {
            let mut chosen = None;
            let current = self.player.selected_reciter().map(|r| r.display_name.clone()).unwrap_or_default();
            egui::ComboBox::from_id_source("reciter")
                .selected_text(current)
                .width(200.0)
                .show_ui(ui, |ui| {
                    for (i, reciter) in self.player.reciters().iter().enumerate() {
                        let selected = self.player.selected_index() == Some(i);
                        if ui.selectable_label(selected, &reciter.display_name).clicked() && !selected {
                            chosen = Some(i);
                        }
                    }
                });
            if let Some(i) = chosen {
                self.player.select_reciter(i);
            }

            let label = match self.player.state() {
                PlayerState::Loading { .. } => "loading...",
                _ if self.player.is_playing() => "pause",
                _ => "play",
            };
            if ui.button(RichText::new(label).size(16.0)).clicked() {
                self.toggle_play();
            }

            let duration = self.player.duration();
            let elapsed = self.player.current_time();
            let total = duration.map(format_time).unwrap_or_else(|| "-:--".into());
            ui.label(format!("{} / {}", format_time(elapsed), total));

            let fraction = match duration {
                Some(d) if !d.is_zero() => elapsed.as_secs_f32() / d.as_secs_f32(),
                _ => 0.0,
            };
            let width = (ui.available_width() - 190.0).max(80.0);
            if let Some(f) = fill_bar(ui, width, fraction, "") {
                if let Some(d) = duration {
                    let _ = self.player.seek(f64::from(f) * d.as_secs_f64());
                }
            }

            let mute_label = if self.player.is_muted() { "unmute" } else { "mute" };
            if ui.button(mute_label).clicked() {
                self.player.toggle_mute();
            }
            let volume = self.player.volume();
            let pct = format!("{}%", (volume * 100.0).round() as i32);
            if let Some(v) = fill_bar(ui, 80.0, volume, &pct) {
                self.player.set_volume(v);
            }
        });

        if let Some(e) = self.player.last_error() {
            ui.label(RichText::new(format!("playback error: {}", e)).small());
        }
    }

    fn render_settings(&mut self, ctx: &Context) {
        let mut open = self.show_settings;
        egui::Window::new("settings")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                let size = self.prefs.get().font_size;
                ui.horizontal(|ui| {
                    ui.label("text size:");
                    if ui.add_enabled(size > MIN_FONT_SIZE, egui::Button::new("-")).clicked() {
                        self.change_font_size(-i32::from(FONT_SIZE_STEP));
                    }
                    ui.label(format!("{}px", size));
                    if ui.add_enabled(size < MAX_FONT_SIZE, egui::Button::new("+")).clicked() {
                        self.change_font_size(i32::from(FONT_SIZE_STEP));
                    }
                });
                ui.add_space(6.0);
                egui::Frame::none()
                    .stroke(egui::Stroke::new(1.0, SlowColors::BLACK))
                    .inner_margin(egui::Margin::same(8.0))
                    .show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.vertical_centered(|ui| {
                            ui.label(RichText::new(BISMILLAH).font(arabic_font(f32::from(size))));
                        });
                    });
                ui.add_space(6.0);
                let mut translation = self.prefs.get().translation_enabled;
                if ui.checkbox(&mut translation, "show english translation").changed() {
                    self.toggle_translation();
                }
            });
        self.show_settings = open;
    }

    fn render_bookmarks(&mut self, ctx: &Context) {
        let mut open = self.show_bookmarks;
        let mut to_open = None;
        let mut to_remove = None;
        egui::Window::new("bookmarks")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(340.0)
            .show(ctx, |ui| {
                let bookmarks = &self.prefs.get().bookmarks;
                if bookmarks.is_empty() {
                    ui.label("no bookmarks yet");
                    ui.small("use ☆ next to a surah to add one");
                    return;
                }
                egui::ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
                    for s in bookmarks.iter().filter_map(|&id| surah_by_id(id)) {
                        ui.horizontal(|ui| {
                            ui.label(format!("{:>3}  {}  ({})", s.id, s.name, s.name_translation));
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                                if ui.small_button("remove").clicked() {
                                    to_remove = Some(s.id);
                                }
                                if ui.small_button("open").clicked() {
                                    to_open = Some(s.id);
                                }
                            });
                        });
                    }
                });
            });
        if let Some(id) = to_remove {
            let saved = self.prefs.remove_bookmark(id);
            self.report(saved);
        }
        if let Some(id) = to_open {
            self.select_surah(id);
            open = false;
        }
        self.show_bookmarks = open;
    }

    fn render_about(&mut self, ctx: &Context) {
        egui::Window::new("about slowQuran")
            .collapsible(false)
            .resizable(false)
            .default_width(300.0)
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.heading("slowQuran");
                    ui.label(format!("version {}", env!("CARGO_PKG_VERSION")));
                    ui.add_space(8.0);
                    ui.label("quran reader and recitation player");
                });
                ui.add_space(8.0);
                ui.separator();
                ui.add_space(4.0);
                ui.label("text and audio:");
                ui.label("  quranapi.pages.dev");
                ui.add_space(4.0);
                ui.label("shortcuts:");
                ui.label("  ← →  previous / next surah");
                ui.label("  space  play / pause");
                ui.label("  ⌘K settings   ⌘B bookmarks   ⌘\\ list");
                ui.add_space(4.0);
                ui.label("frameworks:");
                ui.label("  egui/eframe (MIT), rodio (MIT)");
                ui.label("  reqwest (MIT), symphonia (MPL-2.0)");
                ui.add_space(8.0);
                ui.vertical_centered(|ui| {
                    if ui.button("ok").clicked() {
                        self.show_about = false;
                    }
                });
            });
    }
}

impl eframe::App for SlowQuranApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_keys(ctx);
        self.loader.poll();
        self.sync_player();
        self.drain_preference_events();

        let busy = self.loader.in_flight() > 0 || self.player.is_playing() || self.player.is_loading();
        let toasting = !self.toasts.is_empty();
        ctx.request_repaint_after(if busy || toasting { Duration::from_millis(100) } else { Duration::from_millis(500) });

        egui::TopBottomPanel::top("menu").show(ctx, |ui| self.render_menu_bar(ui));
        let status = self.status_text();
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| status_bar(ui, &status));
        egui::TopBottomPanel::bottom("player").min_height(44.0).show(ctx, |ui| {
            ui.add_space(4.0);
            self.render_player(ui);
            ui.add_space(4.0);
        });

        if self.show_list {
            let mut action = None;
            egui::SidePanel::left("surahs")
                .default_width(300.0)
                .min_width(220.0)
                .show(ctx, |ui| {
                    action = self.list.show(ui, self.loader.selected(), self.prefs.get());
                });
            match action {
                Some(ListAction::Select(id)) => self.select_surah(id),
                Some(ListAction::ToggleBookmark(id)) => self.toggle_bookmark(id),
                None => {}
            }
        }

        let mut action = None;
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(SlowColors::WHITE).inner_margin(egui::Margin::same(12.0)))
            .show(ctx, |ui| {
                action = self.content.show(ui, self.loader.state(), self.prefs.get());
            });
        match action {
            Some(ContentAction::Retry) => {
                self.loader.retry();
            }
            Some(ContentAction::ToggleBookmark(id)) => self.toggle_bookmark(id),
            Some(ContentAction::Copied(n)) => self.toasts.success(format!("copied verse {}", n)),
            None => {}
        }

        if self.show_settings {
            self.render_settings(ctx);
        }
        if self.show_bookmarks {
            self.render_bookmarks(ctx);
        }
        if self.show_about {
            self.render_about(ctx);
        }
    }
}
