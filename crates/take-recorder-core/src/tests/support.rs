//! In-memory capture backend whose tracks and recorder can be observed and
//! scripted from tests.

use crate::{
    AcquireFailure, AcquireFuture, Capabilities, CaptureBackend, MediaRecorder, MediaStream,
    RecorderFailure, RecordingSession, SessionConfig,
};

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicUsize, Ordering},
    },
    time::Duration,
};

pub(crate) const TRACKS_PER_STREAM: usize = 2;

/// Switches a test flips to make the next recorder misbehave.
#[derive(Debug, Default)]
pub(crate) struct RecorderScript {
    pub(crate) pause_unsupported: AtomicBool,
    pub(crate) fail_start: AtomicBool,
    pub(crate) fail_stop: AtomicBool,
    pub(crate) background_error: AtomicBool,
}

#[derive(Debug)]
pub(crate) struct FakeStream {
    tracks: usize,
    live: Arc<AtomicUsize>,
    samples: Vec<f32>,
    overstate_samples: bool,
}

impl MediaStream for FakeStream {
    fn stop_tracks(&mut self) {
        self.live.fetch_sub(self.tracks, Ordering::AcqRel);
        self.tracks = 0;
    }

    fn live_tracks(&self) -> usize {
        self.tracks
    }

    fn audio_samples(&self, out: &mut [f32]) -> usize {
        let count = out.len().min(self.samples.len());
        out[..count].copy_from_slice(&self.samples[..count]);
        if self.overstate_samples {
            return out.len() + 1;
        }
        count
    }
}

#[derive(Debug)]
pub(crate) struct FakeRecorder {
    script: Arc<RecorderScript>,
    chunks: Vec<Vec<u8>>,
}

impl MediaRecorder for FakeRecorder {
    fn start(&mut self) -> Result<(), RecorderFailure> {
        if self.script.fail_start.load(Ordering::Acquire) {
            return Err(RecorderFailure::Failed("start refused".to_string()));
        }
        self.chunks.push(b"head".to_vec());
        Ok(())
    }

    fn pause(&mut self) -> Result<(), RecorderFailure> {
        if self.script.pause_unsupported.load(Ordering::Acquire) {
            return Err(RecorderFailure::PauseUnsupported);
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<(), RecorderFailure> {
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RecorderFailure> {
        if self.script.fail_stop.load(Ordering::Acquire) {
            return Err(RecorderFailure::Failed("flush failed".to_string()));
        }
        self.chunks.push(b"tail".to_vec());
        Ok(())
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.chunks)
    }

    fn take_error(&mut self) -> Option<RecorderFailure> {
        self.script
            .background_error
            .swap(false, Ordering::AcqRel)
            .then(|| RecorderFailure::Failed("encoder crashed".to_string()))
    }
}

#[derive(Debug)]
pub(crate) struct FakeBackend {
    pub(crate) capabilities: Capabilities,
    pub(crate) refuse: Option<AcquireFailure>,
    pub(crate) supported: Vec<String>,
    pub(crate) samples: Vec<f32>,
    /// Streams claim to write more samples than the buffer holds.
    pub(crate) overstate_samples: bool,
    pub(crate) live_tracks: Arc<AtomicUsize>,
    pub(crate) acquisitions: Arc<AtomicUsize>,
    pub(crate) script: Arc<RecorderScript>,
}

impl FakeBackend {
    pub(crate) fn new() -> Self {
        Self {
            capabilities: Capabilities {
                media_devices: true,
                recorder: true,
                secure_context: true,
            },
            refuse: None,
            supported: vec!["video/webm".to_string()],
            samples: Vec::new(),
            overstate_samples: false,
            live_tracks: Arc::new(AtomicUsize::new(0)),
            acquisitions: Arc::new(AtomicUsize::new(0)),
            script: Arc::new(RecorderScript::default()),
        }
    }

    pub(crate) fn refusing(failure: AcquireFailure) -> Self {
        Self {
            refuse: Some(failure),
            ..Self::new()
        }
    }

    pub(crate) fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::new()
        }
    }

    pub(crate) fn with_samples(samples: Vec<f32>) -> Self {
        Self {
            samples,
            ..Self::new()
        }
    }

    pub(crate) fn live_tracks(&self) -> usize {
        self.live_tracks.load(Ordering::Acquire)
    }
}

impl CaptureBackend for FakeBackend {
    type Stream = FakeStream;
    type Recorder = FakeRecorder;

    fn capabilities(&self) -> Capabilities {
        self.capabilities
    }

    fn acquire(&self, _constraints: crate::MediaConstraints) -> AcquireFuture<FakeStream> {
        let refuse = self.refuse.clone();
        let live = Arc::clone(&self.live_tracks);
        let acquisitions = Arc::clone(&self.acquisitions);
        let samples = self.samples.clone();
        let overstate_samples = self.overstate_samples;

        Box::pin(async move {
            acquisitions.fetch_add(1, Ordering::AcqRel);
            if let Some(failure) = refuse {
                return Err(failure);
            }
            live.fetch_add(TRACKS_PER_STREAM, Ordering::AcqRel);
            Ok(FakeStream {
                tracks: TRACKS_PER_STREAM,
                live,
                samples,
                overstate_samples,
            })
        })
    }

    fn is_type_supported(&self, mime: &str) -> bool {
        self.supported.iter().any(|supported| supported == mime)
    }

    fn create_recorder(
        &self,
        _stream: &mut FakeStream,
        _mime: &str,
    ) -> Result<FakeRecorder, RecorderFailure> {
        Ok(FakeRecorder {
            script: Arc::clone(&self.script),
            chunks: Vec::new(),
        })
    }
}

pub(crate) fn session() -> RecordingSession<FakeBackend> {
    RecordingSession::new(FakeBackend::new(), SessionConfig::default())
}

/// Acquires and runs the countdown out; leaves the session Recording.
#[allow(clippy::unwrap_used)]
pub(crate) async fn start_recording(session: &mut RecordingSession<FakeBackend>) {
    session.begin_countdown().await.unwrap();
    for _ in 0..session.config().countdown_secs {
        session.tick_countdown().unwrap();
    }
}

/// Records a take of `secs` seconds of paused-clock time.
#[allow(clippy::unwrap_used)]
pub(crate) async fn record_take(session: &mut RecordingSession<FakeBackend>, secs: u64) {
    start_recording(session).await;
    tokio::time::advance(Duration::from_secs(secs)).await;
    session.stop().unwrap();
}
