//! rodio backend for the playback session.
//!
//! Recitations are downloaded whole on a worker thread, then decoded into a
//! paused sink. Position is wall-clock time since play, like the music player.

use qurancore::playback::{AudioOutput, MediaEvent, PlaybackError};
use qurancore::{ApiClient, FetchError};
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::io::Cursor;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

struct Download {
    generation: u64,
    result: Result<Vec<u8>, FetchError>,
}

enum Track {
    None,
    Downloading,
    Failed,
    Ready(Vec<u8>),
}

pub struct RodioOutput {
    client: Arc<ApiClient>,
    _stream: Option<OutputStream>,
    stream_handle: Option<OutputStreamHandle>,
    sink: Option<Sink>,
    url: Option<String>,
    track: Track,
    generation: u64,
    tx: Sender<Download>,
    rx: Receiver<Download>,
    volume: f32,
    want_play: bool,
    pending_seek: Option<Duration>,
    play_start: Option<Instant>,
    elapsed_before_pause: Duration,
    events: Vec<MediaEvent>,
}

impl RodioOutput {
    pub fn new(client: Arc<ApiClient>) -> Self {
        let (stream, handle) = match OutputStream::try_default() {
            Ok((stream, handle)) => (Some(stream), Some(handle)),
            Err(e) => {
                warn!(error = %e, "no audio output device");
                (None, None)
            }
        };
        let (tx, rx) = channel();
        Self {
            client,
            _stream: stream,
            stream_handle: handle,
            sink: None,
            url: None,
            track: Track::None,
            generation: 0,
            tx,
            rx,
            volume: 1.0,
            want_play: false,
            pending_seek: None,
            play_start: None,
            elapsed_before_pause: Duration::ZERO,
            events: Vec::new(),
        }
    }

    fn elapsed(&self) -> Duration {
        let current = self.play_start.map(|s| s.elapsed()).unwrap_or_default();
        self.elapsed_before_pause + current
    }

    fn reset_clock(&mut self) {
        self.play_start = None;
        self.elapsed_before_pause = Duration::ZERO;
    }

    fn start_download(&mut self) {
        let Some(url) = self.url.clone() else { return };
        self.generation += 1;
        self.track = Track::Downloading;
        self.events.push(MediaEvent::Waiting);

        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let generation = self.generation;
        let spawned = std::thread::Builder::new()
            .name("recitation-download".into())
            .spawn(move || {
                let result = client.fetch_bytes(&url);
                let _ = tx.send(Download { generation, result });
            });
        if let Err(e) = spawned {
            self.track = Track::Failed;
            self.events.push(MediaEvent::Error(PlaybackError::Download(e.to_string())));
        }
    }

    /// Decode the downloaded track into a fresh paused sink.
    fn build_sink(&mut self) -> Result<Option<Duration>, PlaybackError> {
        let Track::Ready(bytes) = &self.track else {
            return Err(PlaybackError::NoSource);
        };
        let handle = self
            .stream_handle
            .as_ref()
            .ok_or_else(|| PlaybackError::Device("no audio output device".into()))?;
        let source = Decoder::new(Cursor::new(bytes.clone())).map_err(|e| PlaybackError::Decode(e.to_string()))?;
        let duration = source.total_duration();
        let sink = Sink::try_new(handle).map_err(|e| PlaybackError::Device(e.to_string()))?;
        sink.pause();
        sink.set_volume(self.volume);
        sink.append(source);
        if let Some(old) = self.sink.replace(sink) {
            old.stop();
        }
        self.reset_clock();
        Ok(duration)
    }

    fn finish_download(&mut self, result: Result<Vec<u8>, FetchError>) {
        match result {
            Ok(bytes) => {
                debug!(bytes = bytes.len(), "recitation downloaded");
                self.track = Track::Ready(bytes);
                match self.build_sink() {
                    Ok(duration) => {
                        self.events.push(MediaEvent::LoadedMetadata { duration });
                        if let Some(position) = self.pending_seek.take() {
                            if let Err(e) = self.seek(position) {
                                warn!(error = %e, "deferred seek failed");
                                // the session pauses on the error; keep the sink in step
                                self.want_play = false;
                                self.events.push(MediaEvent::Error(e));
                            }
                        }
                        if self.want_play {
                            self.resume();
                        }
                        self.events.push(MediaEvent::CanPlay);
                    }
                    Err(e) => self.events.push(MediaEvent::Error(e)),
                }
            }
            Err(e) => {
                warn!(error = %e, "recitation download failed");
                self.track = Track::Failed;
                self.want_play = false;
                self.events.push(MediaEvent::Error(PlaybackError::Download(e.to_string())));
            }
        }
    }

    fn resume(&mut self) {
        if let Some(sink) = &self.sink {
            sink.play();
            self.play_start = Some(Instant::now());
        }
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, url: &str) {
        self.stop();
        self.url = Some(url.to_string());
        self.start_download();
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        if self.stream_handle.is_none() {
            return Err(PlaybackError::Device("no audio output device".into()));
        }
        match self.track {
            Track::None => return Err(PlaybackError::NoSource),
            // a failed download is retried on the next press
            Track::Failed => self.start_download(),
            Track::Downloading => {}
            Track::Ready(_) => {
                let finished = self.sink.as_ref().map_or(true, |s| s.empty());
                if finished {
                    self.build_sink()?;
                }
                self.resume();
            }
        }
        self.want_play = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.want_play = false;
        if let Some(sink) = &self.sink {
            sink.pause();
        }
        if let Some(start) = self.play_start.take() {
            self.elapsed_before_pause += start.elapsed();
        }
    }

    fn seek(&mut self, position: Duration) -> Result<(), PlaybackError> {
        let Some(sink) = &self.sink else {
            self.pending_seek = Some(position);
            return Ok(());
        };
        sink.try_seek(position).map_err(|e| PlaybackError::Seek(e.to_string()))?;
        self.elapsed_before_pause = position;
        if self.play_start.is_some() {
            self.play_start = Some(Instant::now());
        }
        Ok(())
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn stop(&mut self) {
        // bump so an in-flight download lands as stale
        self.generation += 1;
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
        self.url = None;
        self.track = Track::None;
        self.want_play = false;
        self.pending_seek = None;
        self.reset_clock();
        self.events.clear();
    }

    fn poll_events(&mut self) -> Vec<MediaEvent> {
        while let Ok(download) = self.rx.try_recv() {
            if download.generation == self.generation {
                self.finish_download(download.result);
            }
        }

        if self.play_start.is_some() {
            if self.sink.as_ref().map_or(false, |s| s.empty()) {
                self.want_play = false;
                self.reset_clock();
                self.events.push(MediaEvent::Ended);
            } else {
                self.events.push(MediaEvent::TimeUpdate(self.elapsed()));
            }
        }

        std::mem::take(&mut self.events)
    }
}
