//! Select a surah from search, load it, and remember where the reader was.

use qurancore::api::parse_surah;
use qurancore::catalog::{self, catalog};
use qurancore::prefs::PREFERENCES_FILE;
use qurancore::{ContentLoader, FetchError, LoadState, PreferenceStore, SearchIndex, SurahDetail, SurahId, SurahSource};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Serves a canned body for every valid surah.
struct CannedSource;

impl SurahSource for CannedSource {
    fn fetch(&self, id: SurahId) -> Result<SurahDetail, FetchError> {
        let summary = catalog::surah_by_id(id).ok_or(FetchError::InvalidSurah(id))?;
        let body = format!(
            r#"{{"surahName":"{}","surahNameArabic":"{}","surahNameTranslation":"{}","totalAyah":2,
                "arabic1":["one","two"],"english":["first","second"],
                "audio":{{"1":{{"reciter":"Mishary Rashid Al Afasy","url":"https://audio.test/{}.mp3"}}}}}}"#,
            summary.name, summary.name_arabic, summary.name_translation, id
        );
        parse_surah(id, &body)
    }
}

fn wait_loaded(loader: &mut ContentLoader) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while loader.in_flight() > 0 {
        loader.poll();
        assert!(Instant::now() < deadline, "fetch never finished");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn test_search_select_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(PREFERENCES_FILE);

    let index = SearchIndex::new(catalog());
    let hit = index.search("kahf")[0];
    assert_eq!(hit.id, 18);

    let mut store = PreferenceStore::open(&path);
    let events = store.subscribe();
    let mut loader = ContentLoader::new(Arc::new(CannedSource));

    loader.select(hit.id);
    store.set_last_read(hit.id, 1).unwrap();
    store.add_bookmark(hit.id).unwrap();
    wait_loaded(&mut loader);

    match loader.state() {
        LoadState::Loaded(detail) => {
            assert_eq!(detail.name, "Al-Kahf");
            assert_eq!(detail.default_reciter().map(|r| r.audio_url.as_str()), Some("https://audio.test/18.mp3"));
        }
        other => panic!("expected loaded surah, got {:?}", other),
    }
    assert_eq!(events.try_iter().count(), 2);
    drop(store);

    let reopened = PreferenceStore::open(&path);
    assert_eq!(reopened.get().last_read_surah, Some(18));
    assert_eq!(reopened.get().last_read_ayah, Some(1));
    assert!(reopened.is_bookmarked(18));
}

#[test]
fn test_invalid_selection_fails_cleanly() {
    let mut loader = ContentLoader::new(Arc::new(CannedSource));
    loader.select(0);
    wait_loaded(&mut loader);
    assert_eq!(loader.state(), &LoadState::Failed { surah_id: 0, error: FetchError::InvalidSurah(0) });
}
