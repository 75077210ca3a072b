//! qurancore: reading, search, preferences and playback for slowQuran

pub mod api;
pub mod catalog;
pub mod config;
pub mod content;
pub mod logging;
pub mod playback;
pub mod prefs;
pub mod search;
pub mod storage;

pub use api::{ApiClient, FetchError, Reciter, SurahDetail, SurahSource};
pub use catalog::{SurahId, SurahSummary};
pub use config::AppConfig;
pub use content::{ContentLoader, LoadState};
pub use playback::{AudioOutput, MediaEvent, PlaybackError, PlaybackSession};
pub use prefs::{PreferenceEvent, PreferenceStore, Preferences};
pub use search::SearchIndex;
