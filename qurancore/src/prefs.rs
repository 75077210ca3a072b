//! Reading preferences: font size, translation, bookmarks, last read.
//!
//! One `PreferenceStore` exists per process. The shell owns it and hands it
//! to whichever view needs it; nothing keeps a private copy. Every mutation
//! rewrites the whole record to disk.

use crate::catalog::{self, SurahId};
use crate::storage::{self, StorageError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use tracing::{debug, warn};

pub const MIN_FONT_SIZE: u8 = 16;
pub const MAX_FONT_SIZE: u8 = 40;
pub const DEFAULT_FONT_SIZE: u8 = 24;
/// Step used by the settings window's -/+ buttons.
pub const FONT_SIZE_STEP: u8 = 2;

pub const PREFERENCES_FILE: &str = "preferences.json";

/// Persisted reading preferences.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(rename = "fontSize", deserialize_with = "deserialize_font_size")]
    pub font_size: u8,
    #[serde(rename = "translationEnabled")]
    pub translation_enabled: bool,
    pub bookmarks: BTreeSet<SurahId>,
    #[serde(rename = "lastReadSurah")]
    pub last_read_surah: Option<SurahId>,
    #[serde(rename = "lastReadAyah")]
    pub last_read_ayah: Option<u16>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            font_size: DEFAULT_FONT_SIZE,
            translation_enabled: true,
            bookmarks: BTreeSet::new(),
            last_read_surah: None,
            last_read_ayah: None,
        }
    }
}

/// Clamp a requested font size to the supported range.
pub fn clamp_font_size(px: i32) -> u8 {
    // the clamp guarantees the value fits
    px.clamp(i32::from(MIN_FONT_SIZE), i32::from(MAX_FONT_SIZE)) as u8
}

/// Any integer is accepted and clamped, so a bad size never costs the rest
/// of the record.
fn deserialize_font_size<'de, D>(deserializer: D) -> std::result::Result<u8, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = i64::deserialize(deserializer)?;
    let px = i32::try_from(raw).unwrap_or(if raw < 0 { i32::MIN } else { i32::MAX });
    Ok(clamp_font_size(px))
}

/// What changed, sent to subscribers after each effective mutation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreferenceEvent {
    FontSize(u8),
    Translation(bool),
    BookmarkAdded(SurahId),
    BookmarkRemoved(SurahId),
    LastRead { surah: SurahId, ayah: u16 },
}

pub struct PreferenceStore {
    prefs: Preferences,
    path: PathBuf,
    subscribers: Vec<Sender<PreferenceEvent>>,
}

impl PreferenceStore {
    /// Open the store at the default location.
    pub fn open_default() -> Self {
        Self::open(storage::config_dir().join(PREFERENCES_FILE))
    }

    /// Load preferences from `path`. A missing or unreadable file yields
    /// the defaults; the user never sees an error for it.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let prefs = match storage::load_json::<Preferences>(&path) {
            Ok(mut prefs) => {
                prefs.bookmarks.retain(|id| catalog::is_valid_id(*id));
                debug!(path = %path.display(), "loaded preferences");
                prefs
            }
            Err(StorageError::NotFound(_)) => Preferences::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "discarding unreadable preferences");
                Preferences::default()
            }
        };
        Self { prefs, path, subscribers: Vec::new() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current snapshot.
    pub fn get(&self) -> &Preferences {
        &self.prefs
    }

    /// Receive an event for every change from now on.
    pub fn subscribe(&mut self) -> Receiver<PreferenceEvent> {
        let (tx, rx) = channel();
        self.subscribers.push(tx);
        rx
    }

    pub fn set_font_size(&mut self, px: i32) -> storage::Result<()> {
        let size = clamp_font_size(px);
        let changed = self.prefs.font_size != size;
        self.prefs.font_size = size;
        self.commit(changed.then_some(PreferenceEvent::FontSize(size)))
    }

    pub fn toggle_translation(&mut self) -> storage::Result<()> {
        self.prefs.translation_enabled = !self.prefs.translation_enabled;
        let enabled = self.prefs.translation_enabled;
        self.commit(Some(PreferenceEvent::Translation(enabled)))
    }

    /// Ids outside the catalog are ignored.
    pub fn add_bookmark(&mut self, id: SurahId) -> storage::Result<()> {
        if !catalog::is_valid_id(id) {
            warn!(surah = id, "ignoring bookmark for unknown surah");
            return Ok(());
        }
        let added = self.prefs.bookmarks.insert(id);
        self.commit(added.then_some(PreferenceEvent::BookmarkAdded(id)))
    }

    pub fn remove_bookmark(&mut self, id: SurahId) -> storage::Result<()> {
        let removed = self.prefs.bookmarks.remove(&id);
        self.commit(removed.then_some(PreferenceEvent::BookmarkRemoved(id)))
    }

    /// Add the bookmark if absent, remove it otherwise.
    pub fn toggle_bookmark(&mut self, id: SurahId) -> storage::Result<()> {
        if self.is_bookmarked(id) {
            self.remove_bookmark(id)
        } else {
            self.add_bookmark(id)
        }
    }

    pub fn is_bookmarked(&self, id: SurahId) -> bool {
        self.prefs.bookmarks.contains(&id)
    }

    /// Record the reading position. Both fields are always written together.
    pub fn set_last_read(&mut self, surah: SurahId, ayah: u16) -> storage::Result<()> {
        let changed = self.prefs.last_read_surah != Some(surah)
            || self.prefs.last_read_ayah != Some(ayah);
        self.prefs.last_read_surah = Some(surah);
        self.prefs.last_read_ayah = Some(ayah);
        self.commit(changed.then_some(PreferenceEvent::LastRead { surah, ayah }))
    }

    /// Persist the whole record, then notify. In-memory state stays updated
    /// even if the write fails.
    fn commit(&mut self, event: Option<PreferenceEvent>) -> storage::Result<()> {
        let saved = storage::save_json(&self.path, &self.prefs);
        if let Err(e) = &saved {
            warn!(path = %self.path.display(), error = %e, "failed to save preferences");
        }
        if let Some(event) = event {
            self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
        }
        saved
    }
}
