use crate::{
    CoreResult, SessionError,
    device::{
        AcquireFailure, Artifact, CaptureBackend, FormatPreference, MediaRecorder, MediaStream,
        RecorderFailure,
    },
};

use std::{panic::Location, time::Duration};

use error_location::ErrorLocation;
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Result of a completed capture.
#[derive(Debug, Clone)]
pub struct CaptureOutput {
    /// All recorder chunks assembled into one payload.
    pub artifact: Artifact,
    /// Time spent actually recording, pauses excluded.
    pub duration: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CapturePhase {
    Inactive,
    Active,
    Paused,
}

/// Sole owner of the live stream and the recorder bound to it.
///
/// At most one stream is held at a time. Every path out of capture
/// ([`finish`](Self::finish), [`release`](Self::release) and drop) stops all
/// tracks of the stream it held.
pub struct DeviceSession<B: CaptureBackend> {
    stream: Option<B::Stream>,
    recorder: Option<B::Recorder>,
    mime: Option<String>,
    chunks: Vec<Vec<u8>>,
    phase: CapturePhase,
    accumulated: Duration,
    segment_started: Option<Instant>,
}

impl<B: CaptureBackend> DeviceSession<B> {
    /// Creates a session holding no stream.
    pub fn new() -> Self {
        Self {
            stream: None,
            recorder: None,
            mime: None,
            chunks: Vec::new(),
            phase: CapturePhase::Inactive,
            accumulated: Duration::ZERO,
            segment_started: None,
        }
    }

    /// Whether a stream is currently held.
    pub fn has_stream(&self) -> bool {
        self.stream.is_some()
    }

    /// The held stream, if any.
    pub fn stream(&self) -> Option<&B::Stream> {
        self.stream.as_ref()
    }

    /// Whether capture is running or paused.
    pub fn is_capturing(&self) -> bool {
        self.phase != CapturePhase::Inactive
    }

    /// MIME type of the capture in progress.
    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    /// Takes ownership of a freshly acquired stream.
    ///
    /// # Errors
    ///
    /// Returns `StreamAlreadyActive` if a stream is already held; the
    /// incoming stream is stopped before returning.
    #[track_caller]
    #[instrument(skip(self, stream))]
    pub fn install(&mut self, mut stream: B::Stream) -> CoreResult<()> {
        if self.stream.is_some() {
            stream.stop_tracks();
            return Err(SessionError::StreamAlreadyActive {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        info!(tracks = stream.live_tracks(), "Capture stream acquired");
        self.stream = Some(stream);

        Ok(())
    }

    /// Starts encoding from the held stream in the best supported format.
    ///
    /// # Errors
    ///
    /// Returns `NotCapturing` without a stream and `RecorderFailed` if the
    /// recorder cannot be created or started.
    #[track_caller]
    #[instrument(skip(self, backend, formats))]
    pub fn begin_capture(&mut self, backend: &B, formats: &FormatPreference) -> CoreResult<String> {
        if self.phase != CapturePhase::Inactive {
            return Err(SessionError::RecorderFailed {
                reason: "capture already in progress".to_string(),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let stream = self.stream.as_mut().ok_or(SessionError::NotCapturing {
            location: ErrorLocation::from(Location::caller()),
        })?;

        let mime = formats.select(|candidate| backend.is_type_supported(candidate));

        let mut recorder = backend
            .create_recorder(stream, &mime)
            .map_err(recorder_error)?;
        recorder.start().map_err(recorder_error)?;

        self.chunks.clear();
        self.accumulated = Duration::ZERO;
        self.segment_started = Some(Instant::now());
        self.phase = CapturePhase::Active;
        self.recorder = Some(recorder);
        self.mime = Some(mime.clone());

        info!(mime = %mime, "Capture started");

        Ok(mime)
    }

    /// Suspends capture and banks the time recorded so far.
    ///
    /// # Errors
    ///
    /// Returns `NotCapturing` unless capture is active, `PauseUnsupported`
    /// if the recorder cannot pause. State is untouched on error.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn pause(&mut self) -> CoreResult<Duration> {
        if self.phase != CapturePhase::Active {
            return Err(SessionError::NotCapturing {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let recorder = self.recorder.as_mut().ok_or(SessionError::NotCapturing {
            location: ErrorLocation::from(Location::caller()),
        })?;
        recorder.pause().map_err(recorder_error)?;

        if let Some(started) = self.segment_started.take() {
            self.accumulated += started.elapsed();
        }
        self.phase = CapturePhase::Paused;

        debug!(
            accumulated_ms = self.accumulated.as_millis(),
            "Capture paused"
        );

        Ok(self.accumulated)
    }

    /// Continues a paused capture.
    ///
    /// # Errors
    ///
    /// Returns `NotCapturing` unless paused, `ResumeUnsupported` if the
    /// recorder cannot resume.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn resume(&mut self) -> CoreResult<()> {
        if self.phase != CapturePhase::Paused {
            return Err(SessionError::NotCapturing {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let recorder = self.recorder.as_mut().ok_or(SessionError::NotCapturing {
            location: ErrorLocation::from(Location::caller()),
        })?;
        recorder.resume().map_err(recorder_error)?;

        self.segment_started = Some(Instant::now());
        self.phase = CapturePhase::Active;

        debug!(
            accumulated_ms = self.accumulated.as_millis(),
            "Capture resumed"
        );

        Ok(())
    }

    /// Pulls buffered chunks from the recorder and reports any error it
    /// raised in the background.
    pub fn collect(&mut self) -> Option<SessionError> {
        let recorder = self.recorder.as_mut()?;
        self.chunks.extend(recorder.take_chunks());
        recorder.take_error().map(recorder_error)
    }

    /// Recorded time so far, pauses excluded.
    pub fn elapsed(&self) -> Duration {
        self.accumulated
            + self
                .segment_started
                .map(|started| started.elapsed())
                .unwrap_or_default()
    }

    /// Stops capture, releases the stream and assembles the artifact.
    ///
    /// The stream is released whether or not the recorder stops cleanly.
    ///
    /// # Errors
    ///
    /// Returns `NotCapturing` if no capture is running (including a second
    /// call after completion) and `RecorderFailed` if the recorder's stop
    /// step failed.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn finish(&mut self) -> CoreResult<CaptureOutput> {
        if self.phase == CapturePhase::Inactive {
            return Err(SessionError::NotCapturing {
                location: ErrorLocation::from(Location::caller()),
            });
        }

        if let Some(started) = self.segment_started.take() {
            self.accumulated += started.elapsed();
        }
        let duration = self.accumulated;

        let stopped = match self.recorder.as_mut() {
            Some(recorder) => {
                let result = recorder.stop();
                self.chunks.extend(recorder.take_chunks());
                result
            }
            None => Err(RecorderFailure::Failed("recorder missing".to_string())),
        };

        let chunks = std::mem::take(&mut self.chunks);
        let mime = self.mime.take().unwrap_or_default();

        self.teardown();

        stopped.map_err(recorder_error)?;

        let artifact = Artifact::assemble(chunks, mime);

        info!(
            duration_ms = duration.as_millis(),
            bytes = artifact.len(),
            "Capture finished"
        );

        Ok(CaptureOutput { artifact, duration })
    }

    /// Abandons any capture and releases the stream without producing an
    /// artifact.
    #[instrument(skip(self))]
    pub fn release(&mut self) {
        if self.phase != CapturePhase::Inactive {
            if let Some(recorder) = self.recorder.as_mut() {
                if let Err(e) = recorder.stop() {
                    warn!(error = %e, "Recorder stop failed during release");
                }
            }
        }

        let had_stream = self.stream.is_some();
        self.chunks.clear();
        self.mime = None;
        self.teardown();

        if had_stream {
            info!("Capture stream released");
        }
    }

    fn teardown(&mut self) {
        self.recorder = None;
        if let Some(mut stream) = self.stream.take() {
            stream.stop_tracks();
        }
        self.phase = CapturePhase::Inactive;
        self.segment_started = None;
        self.accumulated = Duration::ZERO;
    }
}

impl<B: CaptureBackend> Default for DeviceSession<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: CaptureBackend> Drop for DeviceSession<B> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Translates a platform acquisition failure into a session error.
#[track_caller]
pub(crate) fn acquire_error(failure: AcquireFailure) -> SessionError {
    let location = ErrorLocation::from(Location::caller());
    match failure {
        AcquireFailure::NotAllowed => SessionError::PermissionDenied { location },
        AcquireFailure::NotFound => SessionError::DeviceNotFound { location },
        AcquireFailure::NotReadable => SessionError::DeviceBusy { location },
        AcquireFailure::Other(reason) => {
            SessionError::UnknownAcquisitionFailure { reason, location }
        }
    }
}

/// Translates a platform recorder failure into a session error.
#[track_caller]
pub(crate) fn recorder_error(failure: RecorderFailure) -> SessionError {
    let location = ErrorLocation::from(Location::caller());
    match failure {
        RecorderFailure::PauseUnsupported => SessionError::PauseUnsupported { location },
        RecorderFailure::ResumeUnsupported => SessionError::ResumeUnsupported { location },
        RecorderFailure::Failed(reason) => SessionError::RecorderFailed { reason, location },
    }
}
