//! Recitation playback state machine.
//!
//! `PlaybackSession` owns the transport state and drives an `AudioOutput`.
//! The output reports back through `MediaEvent`s which the session folds
//! into its state on `poll`.

use crate::api::Reciter;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    #[error("no recitation loaded")]
    NoSource,
    #[error("audio device unavailable: {0}")]
    Device(String),
    #[error("could not decode recitation: {0}")]
    Decode(String),
    #[error("could not download recitation: {0}")]
    Download(String),
    #[error("seek failed: {0}")]
    Seek(String),
}

/// Whether audio should be running once the track is ready.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transport {
    Paused,
    Playing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    /// No track loaded.
    Idle,
    /// Buffering; `then` is where the transport goes once data arrives.
    Loading { then: Transport },
    Ready(Transport),
}

/// Notifications from the audio backend.
#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    LoadedMetadata { duration: Option<Duration> },
    TimeUpdate(Duration),
    Waiting,
    CanPlay,
    Ended,
    Error(PlaybackError),
}

/// Audio backend driven by the session.
pub trait AudioOutput {
    /// Replace the current track. Playback does not start.
    fn load(&mut self, url: &str);
    fn play(&mut self) -> Result<(), PlaybackError>;
    fn pause(&mut self);
    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError>;
    fn set_volume(&mut self, volume: f32);
    /// Drop the current track.
    fn stop(&mut self);
    /// Events since the last call.
    fn poll_events(&mut self) -> Vec<MediaEvent>;
}

pub struct PlaybackSession<O: AudioOutput> {
    output: O,
    reciters: Vec<Reciter>,
    selected: Option<usize>,
    state: PlayerState,
    current_time: Duration,
    duration: Option<Duration>,
    volume: f32,
    muted: bool,
    last_error: Option<PlaybackError>,
}

impl<O: AudioOutput> PlaybackSession<O> {
    pub fn new(mut output: O) -> Self {
        output.set_volume(1.0);
        Self {
            output,
            reciters: Vec::new(),
            selected: None,
            state: PlayerState::Idle,
            current_time: Duration::ZERO,
            duration: None,
            volume: 1.0,
            muted: false,
            last_error: None,
        }
    }

    pub fn reciters(&self) -> &[Reciter] {
        &self.reciters
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_reciter(&self) -> Option<&Reciter> {
        self.selected.and_then(|i| self.reciters.get(i))
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    /// True while audio is running or about to resume after buffering.
    pub fn is_playing(&self) -> bool {
        matches!(
            self.state,
            PlayerState::Ready(Transport::Playing) | PlayerState::Loading { then: Transport::Playing }
        )
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, PlayerState::Loading { .. })
    }

    pub fn current_time(&self) -> Duration {
        self.current_time
    }

    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn last_error(&self) -> Option<&PlaybackError> {
        self.last_error.as_ref()
    }

    pub fn take_error(&mut self) -> Option<PlaybackError> {
        self.last_error.take()
    }

    /// Back to a fresh session: no reciters, no track, full volume.
    pub fn reset(&mut self) {
        self.output.stop();
        self.reciters.clear();
        self.selected = None;
        self.state = PlayerState::Idle;
        self.current_time = Duration::ZERO;
        self.duration = None;
        self.volume = 1.0;
        self.muted = false;
        self.last_error = None;
        self.output.set_volume(self.volume);
    }

    /// Replace the reciter list and load the first one.
    pub fn load_reciters(&mut self, reciters: Vec<Reciter>) {
        self.reset();
        self.reciters = reciters;
        if !self.reciters.is_empty() {
            self.select_reciter(0);
        }
    }

    /// Switch to reciter `index`. The new track starts paused. Returns false
    /// for an index outside the list.
    pub fn select_reciter(&mut self, index: usize) -> bool {
        let Some(reciter) = self.reciters.get(index) else {
            return false;
        };
        debug!(reciter = %reciter.display_name, "loading recitation");
        self.output.load(&reciter.audio_url);
        self.selected = Some(index);
        self.state = PlayerState::Loading { then: Transport::Paused };
        self.current_time = Duration::ZERO;
        self.duration = None;
        self.last_error = None;
        true
    }

    pub fn toggle_play(&mut self) -> Result<(), PlaybackError> {
        match self.state {
            PlayerState::Idle => Err(PlaybackError::NoSource),
            _ if self.is_playing() => {
                self.output.pause();
                self.state = match self.state {
                    PlayerState::Loading { .. } => PlayerState::Loading { then: Transport::Paused },
                    _ => PlayerState::Ready(Transport::Paused),
                };
                Ok(())
            }
            previous => {
                self.state = PlayerState::Loading { then: Transport::Playing };
                match self.output.play() {
                    Ok(()) => {
                        self.last_error = None;
                        if !matches!(previous, PlayerState::Loading { .. }) {
                            self.state = PlayerState::Ready(Transport::Playing);
                        }
                        Ok(())
                    }
                    Err(e) => {
                        warn!(error = %e, "playback failed to start");
                        self.state = PlayerState::Ready(Transport::Paused);
                        self.last_error = Some(e.clone());
                        Err(e)
                    }
                }
            }
        }
    }

    /// Jump to `seconds`, clamped to the track. Non-finite input is ignored.
    pub fn seek(&mut self, seconds: f64) -> Result<(), PlaybackError> {
        if self.state == PlayerState::Idle {
            return Err(PlaybackError::NoSource);
        }
        if !seconds.is_finite() {
            return Ok(());
        }
        let mut target = seconds.max(0.0);
        if let Some(duration) = self.duration {
            target = target.min(duration.as_secs_f64());
        }
        let position = match Duration::try_from_secs_f64(target) {
            Ok(position) => position,
            Err(e) => {
                let e = PlaybackError::Seek(e.to_string());
                self.last_error = Some(e.clone());
                return Err(e);
            }
        };
        self.current_time = position;
        self.output.seek(position).map_err(|e| {
            warn!(error = %e, "seek failed");
            self.last_error = Some(e.clone());
            e
        })
    }

    /// Set volume in `[0, 1]`. Anything above zero unmutes.
    pub fn set_volume(&mut self, volume: f32) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.volume = volume;
        if volume > 0.0 {
            self.muted = false;
        }
        self.output.set_volume(volume);
    }

    /// Mute to zero, or unmute to full volume.
    pub fn toggle_mute(&mut self) {
        if self.muted {
            self.muted = false;
            self.volume = 1.0;
        } else {
            self.muted = true;
            self.volume = 0.0;
        }
        self.output.set_volume(self.volume);
    }

    /// Drain backend events. Returns true if anything arrived.
    pub fn poll(&mut self) -> bool {
        let events = self.output.poll_events();
        let any = !events.is_empty();
        for event in events {
            self.handle_event(event);
        }
        any
    }

    pub fn handle_event(&mut self, event: MediaEvent) {
        if self.state == PlayerState::Idle {
            return;
        }
        match event {
            MediaEvent::LoadedMetadata { duration } => self.duration = duration,
            MediaEvent::TimeUpdate(position) => {
                self.current_time = match self.duration {
                    Some(d) => position.min(d),
                    None => position,
                };
            }
            MediaEvent::Waiting => {
                if let PlayerState::Ready(then) = self.state {
                    self.state = PlayerState::Loading { then };
                }
            }
            MediaEvent::CanPlay => {
                if let PlayerState::Loading { then } = self.state {
                    self.state = PlayerState::Ready(then);
                }
            }
            MediaEvent::Ended => {
                self.state = PlayerState::Ready(Transport::Paused);
                if let Some(d) = self.duration {
                    self.current_time = d;
                }
            }
            MediaEvent::Error(e) => {
                warn!(error = %e, "playback error");
                self.state = PlayerState::Ready(Transport::Paused);
                self.last_error = Some(e);
            }
        }
    }
}

/// `m:ss`, as shown next to the seek bar.
pub fn format_time(time: Duration) -> String {
    let secs = time.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeOutput {
        loaded: Vec<String>,
        playing: bool,
        volume: f32,
        seeks: Vec<Duration>,
        fail_play: Option<PlaybackError>,
        pending: Vec<MediaEvent>,
    }

    impl AudioOutput for FakeOutput {
        fn load(&mut self, url: &str) {
            self.loaded.push(url.to_string());
            self.playing = false;
        }
        fn play(&mut self) -> Result<(), PlaybackError> {
            if let Some(e) = self.fail_play.clone() {
                return Err(e);
            }
            self.playing = true;
            Ok(())
        }
        fn pause(&mut self) {
            self.playing = false;
        }
        fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
            self.seeks.push(position);
            Ok(())
        }
        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
        fn stop(&mut self) {
            self.playing = false;
        }
        fn poll_events(&mut self) -> Vec<MediaEvent> {
            std::mem::take(&mut self.pending)
        }
    }

    fn reciter(key: &str) -> Reciter {
        Reciter {
            key: key.into(),
            display_name: format!("reciter {}", key),
            audio_url: format!("https://audio.test/{}.mp3", key),
            image_url: None,
        }
    }

    fn ready_session() -> PlaybackSession<FakeOutput> {
        let mut session = PlaybackSession::new(FakeOutput::default());
        session.load_reciters(vec![reciter("1"), reciter("2"), reciter("3")]);
        session.handle_event(MediaEvent::LoadedMetadata { duration: Some(Duration::from_secs(90)) });
        session.handle_event(MediaEvent::CanPlay);
        session
    }

    #[test]
    fn test_load_reciters_selects_first() {
        let mut session = PlaybackSession::new(FakeOutput::default());
        assert_eq!(session.state(), PlayerState::Idle);
        session.load_reciters(vec![reciter("1"), reciter("2")]);
        assert_eq!(session.selected_index(), Some(0));
        assert_eq!(session.output.loaded, vec!["https://audio.test/1.mp3"]);
        assert_eq!(session.state(), PlayerState::Loading { then: Transport::Paused });
        assert!(!session.is_playing());
    }

    #[test]
    fn test_empty_reciters_stay_idle() {
        let mut session = PlaybackSession::new(FakeOutput::default());
        session.load_reciters(Vec::new());
        assert_eq!(session.state(), PlayerState::Idle);
        assert_eq!(session.toggle_play(), Err(PlaybackError::NoSource));
    }

    #[test]
    fn test_toggle_play_and_pause() {
        let mut session = ready_session();
        assert_eq!(session.state(), PlayerState::Ready(Transport::Paused));
        session.toggle_play().unwrap();
        assert_eq!(session.state(), PlayerState::Ready(Transport::Playing));
        assert!(session.output.playing);
        session.toggle_play().unwrap();
        assert_eq!(session.state(), PlayerState::Ready(Transport::Paused));
        assert!(!session.output.playing);
    }

    #[test]
    fn test_play_before_ready_waits_for_can_play() {
        let mut session = PlaybackSession::new(FakeOutput::default());
        session.load_reciters(vec![reciter("1")]);
        session.toggle_play().unwrap();
        assert_eq!(session.state(), PlayerState::Loading { then: Transport::Playing });
        assert!(session.is_playing());
        session.handle_event(MediaEvent::CanPlay);
        assert_eq!(session.state(), PlayerState::Ready(Transport::Playing));
    }

    #[test]
    fn test_play_failure_reverts_to_paused() {
        let mut session = ready_session();
        session.output.fail_play = Some(PlaybackError::Device("no sink".into()));
        let err = session.toggle_play().unwrap_err();
        assert_eq!(err, PlaybackError::Device("no sink".into()));
        assert_eq!(session.state(), PlayerState::Ready(Transport::Paused));
        assert_eq!(session.last_error(), Some(&err));
    }

    #[test]
    fn test_select_reciter_does_not_resume() {
        let mut session = ready_session();
        session.toggle_play().unwrap();
        session.handle_event(MediaEvent::TimeUpdate(Duration::from_secs(30)));
        assert!(session.select_reciter(2));
        assert!(!session.is_playing());
        assert_eq!(session.current_time(), Duration::ZERO);
        assert_eq!(session.duration(), None);
        assert_eq!(session.selected_reciter().map(|r| r.key.as_str()), Some("3"));
        assert!(!session.select_reciter(3));
        assert_eq!(session.selected_index(), Some(2));
    }

    #[test]
    fn test_waiting_and_can_play() {
        let mut session = ready_session();
        session.toggle_play().unwrap();
        session.output.pending = vec![MediaEvent::Waiting];
        assert!(session.poll());
        assert_eq!(session.state(), PlayerState::Loading { then: Transport::Playing });
        session.output.pending = vec![MediaEvent::CanPlay];
        session.poll();
        assert_eq!(session.state(), PlayerState::Ready(Transport::Playing));
        assert!(!session.poll());
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut session = ready_session();
        session.seek(200.0).unwrap();
        assert_eq!(session.current_time(), Duration::from_secs(90));
        session.seek(-5.0).unwrap();
        assert_eq!(session.current_time(), Duration::ZERO);
        session.seek(f64::NAN).unwrap();
        assert_eq!(session.output.seeks, vec![Duration::from_secs(90), Duration::ZERO]);
    }

    #[test]
    fn test_huge_seek_before_metadata_is_rejected() {
        let mut session = PlaybackSession::new(FakeOutput::default());
        session.load_reciters(vec![reciter("1")]);
        assert!(matches!(session.seek(1e20), Err(PlaybackError::Seek(_))));
        assert_eq!(session.current_time(), Duration::ZERO);
        assert!(session.output.seeks.is_empty());
        assert!(matches!(session.last_error(), Some(PlaybackError::Seek(_))));
    }

    #[test]
    fn test_seek_without_track() {
        let mut session = PlaybackSession::new(FakeOutput::default());
        assert_eq!(session.seek(3.0), Err(PlaybackError::NoSource));
    }

    #[test]
    fn test_ended_pauses_at_end() {
        let mut session = ready_session();
        session.toggle_play().unwrap();
        session.handle_event(MediaEvent::Ended);
        assert_eq!(session.state(), PlayerState::Ready(Transport::Paused));
        assert_eq!(session.current_time(), Duration::from_secs(90));
    }

    #[test]
    fn test_error_event_recorded() {
        let mut session = ready_session();
        session.toggle_play().unwrap();
        session.handle_event(MediaEvent::Error(PlaybackError::Decode("bad frame".into())));
        assert!(!session.is_playing());
        assert_eq!(session.take_error(), Some(PlaybackError::Decode("bad frame".into())));
        assert_eq!(session.last_error(), None);
    }

    #[test]
    fn test_failed_deferred_seek_leaves_session_paused() {
        let mut session = PlaybackSession::new(FakeOutput::default());
        session.load_reciters(vec![reciter("1")]);
        session.seek(30.0).unwrap();
        session.toggle_play().unwrap();
        assert_eq!(session.state(), PlayerState::Loading { then: Transport::Playing });

        session.handle_event(MediaEvent::LoadedMetadata { duration: Some(Duration::from_secs(90)) });
        session.handle_event(MediaEvent::Error(PlaybackError::Seek("not seekable".into())));
        session.handle_event(MediaEvent::CanPlay);
        assert_eq!(session.state(), PlayerState::Ready(Transport::Paused));
        assert!(!session.is_playing());
        assert_eq!(session.last_error(), Some(&PlaybackError::Seek("not seekable".into())));
    }

    #[test]
    fn test_volume_clamped() {
        let mut session = ready_session();
        session.set_volume(1.7);
        assert_eq!(session.volume(), 1.0);
        session.set_volume(-0.2);
        assert_eq!(session.volume(), 0.0);
        session.set_volume(f32::NAN);
        assert_eq!(session.volume(), 0.0);
        session.set_volume(0.25);
        assert_eq!(session.output.volume, 0.25);
    }

    #[test]
    fn test_mute_then_unmute_restores_full_volume() {
        let mut session = ready_session();
        session.set_volume(0.4);
        session.toggle_mute();
        assert_eq!(session.volume(), 0.0);
        assert!(session.is_muted());
        session.toggle_mute();
        assert_eq!(session.volume(), 1.0);
        assert!(!session.is_muted());
    }

    #[test]
    fn test_volume_change_unmutes() {
        let mut session = ready_session();
        session.toggle_mute();
        session.set_volume(0.5);
        assert!(!session.is_muted());
    }

    #[test]
    fn test_reset() {
        let mut session = ready_session();
        session.toggle_play().unwrap();
        session.set_volume(0.3);
        session.reset();
        assert_eq!(session.state(), PlayerState::Idle);
        assert!(session.reciters().is_empty());
        assert_eq!(session.volume(), 1.0);
        assert!(!session.output.playing);
        // events from a dropped track are ignored
        session.handle_event(MediaEvent::CanPlay);
        assert_eq!(session.state(), PlayerState::Idle);
    }

    #[test]
    fn test_format_time() {
        assert_eq!(format_time(Duration::ZERO), "0:00");
        assert_eq!(format_time(Duration::from_secs(65)), "1:05");
        assert_eq!(format_time(Duration::from_millis(3_599_900)), "59:59");
    }
}
