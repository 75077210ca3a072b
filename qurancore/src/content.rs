//! Content loader: fetches the selected surah off the UI thread.
//!
//! Every `select` starts a new generation. Outcomes carry the generation
//! they were issued for and anything older than the current one is dropped,
//! so a slow response for an earlier selection can never replace a newer one.

use crate::api::{FetchError, SurahDetail, SurahSource};
use crate::catalog::SurahId;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, warn};

/// What the content view should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing selected yet.
    Empty,
    Loading { surah_id: SurahId },
    Loaded(SurahDetail),
    Failed { surah_id: SurahId, error: FetchError },
}

impl LoadState {
    pub fn surah_id(&self) -> Option<SurahId> {
        match self {
            LoadState::Empty => None,
            LoadState::Loading { surah_id } | LoadState::Failed { surah_id, .. } => Some(*surah_id),
            LoadState::Loaded(detail) => Some(detail.surah_id),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading { .. })
    }
}

struct FetchOutcome {
    generation: u64,
    surah_id: SurahId,
    result: Result<SurahDetail, FetchError>,
}

pub struct ContentLoader {
    source: Arc<dyn SurahSource>,
    generation: u64,
    state: LoadState,
    tx: Sender<FetchOutcome>,
    rx: Receiver<FetchOutcome>,
    in_flight: usize,
}

impl ContentLoader {
    pub fn new(source: Arc<dyn SurahSource>) -> Self {
        let (tx, rx) = channel();
        Self {
            source,
            generation: 0,
            state: LoadState::Empty,
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn selected(&self) -> Option<SurahId> {
        self.state.surah_id()
    }

    /// Fetches still running, including superseded ones.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Start loading `id`, superseding whatever was loading before.
    pub fn select(&mut self, id: SurahId) {
        self.generation += 1;
        self.state = LoadState::Loading { surah_id: id };
        self.spawn_fetch(id);
    }

    /// Re-issue the fetch for a failed selection. Returns false if there is
    /// nothing to retry.
    pub fn retry(&mut self) -> bool {
        match self.state {
            LoadState::Failed { surah_id, .. } => {
                self.select(surah_id);
                true
            }
            _ => false,
        }
    }

    /// Apply finished fetches. Returns true if the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(outcome) = self.rx.try_recv() {
            self.in_flight = self.in_flight.saturating_sub(1);
            changed |= self.apply(outcome);
        }
        changed
    }

    fn apply(&mut self, outcome: FetchOutcome) -> bool {
        if outcome.generation != self.generation {
            debug!(surah = outcome.surah_id, "discarding stale surah response");
            return false;
        }
        self.state = match outcome.result {
            Ok(detail) => {
                debug!(surah = outcome.surah_id, verses = detail.verse_count(), "surah loaded");
                LoadState::Loaded(detail)
            }
            Err(error) => {
                warn!(surah = outcome.surah_id, %error, "surah fetch failed");
                LoadState::Failed { surah_id: outcome.surah_id, error }
            }
        };
        true
    }

    fn spawn_fetch(&mut self, surah_id: SurahId) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let generation = self.generation;
        let spawned = std::thread::Builder::new()
            .name(format!("fetch-surah-{}", surah_id))
            .spawn(move || {
                let result = source.fetch(surah_id);
                // the loader may be gone by now; nothing to report to
                let _ = tx.send(FetchOutcome { generation, surah_id, result });
            });
        match spawned {
            Ok(_) => self.in_flight += 1,
            Err(e) => {
                self.apply(FetchOutcome {
                    generation,
                    surah_id,
                    result: Err(FetchError::Network(format!("could not start fetch: {}", e))),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    fn detail(id: SurahId) -> SurahDetail {
        SurahDetail {
            surah_id: id,
            name: format!("surah {}", id),
            name_arabic: String::new(),
            name_translation: String::new(),
            total_ayah: 1,
            arabic_verses: vec!["verse".into()],
            english_verses: vec![],
            reciters: vec![],
        }
    }

    /// Holds back chosen surahs until their gate is opened.
    #[derive(Default)]
    struct GatedSource {
        gates: Mutex<HashMap<SurahId, Receiver<()>>>,
        failing: Vec<SurahId>,
    }

    impl GatedSource {
        fn gate(&self, id: SurahId) -> Sender<()> {
            let (tx, rx) = channel();
            self.gates.lock().unwrap().insert(id, rx);
            tx
        }
    }

    impl SurahSource for GatedSource {
        fn fetch(&self, id: SurahId) -> Result<SurahDetail, FetchError> {
            let gate = self.gates.lock().unwrap().remove(&id);
            if let Some(gate) = gate {
                let _ = gate.recv();
            }
            if self.failing.contains(&id) {
                Err(FetchError::Status(503))
            } else {
                Ok(detail(id))
            }
        }
    }

    fn poll_until(loader: &mut ContentLoader, done: impl Fn(&ContentLoader) -> bool) {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            loader.poll();
            if done(loader) {
                return;
            }
            assert!(Instant::now() < deadline, "timed out waiting for loader");
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_select_loads() {
        let mut loader = ContentLoader::new(Arc::new(GatedSource::default()));
        assert_eq!(loader.state(), &LoadState::Empty);
        loader.select(18);
        assert!(loader.state().is_loading());
        assert_eq!(loader.selected(), Some(18));
        poll_until(&mut loader, |l| l.in_flight() == 0);
        assert_eq!(loader.state(), &LoadState::Loaded(detail(18)));
    }

    #[test]
    fn test_late_response_for_old_selection_is_ignored() {
        let source = Arc::new(GatedSource::default());
        let release_two = source.gate(2);
        let mut loader = ContentLoader::new(source.clone());

        loader.select(2);
        loader.select(3);
        poll_until(&mut loader, |l| matches!(l.state(), LoadState::Loaded(_)));
        assert_eq!(loader.selected(), Some(3));

        release_two.send(()).unwrap();
        poll_until(&mut loader, |l| l.in_flight() == 0);
        assert_eq!(loader.state(), &LoadState::Loaded(detail(3)));
    }

    #[test]
    fn test_failure_is_surfaced_and_retryable() {
        let source = Arc::new(GatedSource { failing: vec![7], ..Default::default() });
        let mut loader = ContentLoader::new(source);
        assert!(!loader.retry());

        loader.select(7);
        poll_until(&mut loader, |l| l.in_flight() == 0);
        assert_eq!(
            loader.state(),
            &LoadState::Failed { surah_id: 7, error: FetchError::Status(503) }
        );

        assert!(loader.retry());
        assert!(loader.state().is_loading());
        assert_eq!(loader.selected(), Some(7));
    }
}
