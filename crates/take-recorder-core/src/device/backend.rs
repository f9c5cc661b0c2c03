//! Collaborator traits for the platform capture stack.
//!
//! A [`CaptureBackend`] is the factory side (permission prompt, codec
//! support, recorder construction). The stream and recorder it hands out are
//! owned exclusively by [`DeviceSession`](crate::device::DeviceSession).

use std::{fmt, future::Future, pin::Pin};

use serde::{Deserialize, Serialize};

/// Which camera to ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FacingMode {
    /// Front-facing ("selfie") camera.
    User,
    /// Rear camera.
    Environment,
}

/// Video part of an acquisition request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoConstraints {
    /// Preferred camera.
    pub facing_mode: FacingMode,
    /// Ideal frame width in pixels.
    pub ideal_width: u32,
    /// Ideal frame height in pixels.
    pub ideal_height: u32,
}

/// Full acquisition request handed to [`CaptureBackend::acquire`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConstraints {
    /// Requested video track, `None` for audio-only capture.
    pub video: Option<VideoConstraints>,
    /// Whether a microphone track is requested.
    pub audio: bool,
}

impl Default for MediaConstraints {
    /// Front camera in portrait orientation plus microphone.
    fn default() -> Self {
        Self {
            video: Some(VideoConstraints {
                facing_mode: FacingMode::User,
                ideal_width: 720,
                ideal_height: 1280,
            }),
            audio: true,
        }
    }
}

/// What the environment offers, checked once when the session is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Camera/microphone acquisition is available.
    pub media_devices: bool,
    /// A low-level recorder primitive is available.
    pub recorder: bool,
    /// The host runs in a secure context.
    pub secure_context: bool,
}

/// Platform-level reasons an acquisition can fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireFailure {
    /// Access was refused.
    NotAllowed,
    /// No device matched the constraints.
    NotFound,
    /// The device could not be read, usually because it is in use.
    NotReadable,
    /// Anything else.
    Other(String),
}

impl fmt::Display for AcquireFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAllowed => write!(f, "not allowed"),
            Self::NotFound => write!(f, "not found"),
            Self::NotReadable => write!(f, "not readable"),
            Self::Other(reason) => write!(f, "{reason}"),
        }
    }
}

/// Platform-level recorder failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecorderFailure {
    /// The recorder has no pause support.
    PauseUnsupported,
    /// The recorder has no resume support.
    ResumeUnsupported,
    /// Start, stop or encoding failed.
    Failed(String),
}

impl fmt::Display for RecorderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PauseUnsupported => write!(f, "pause unsupported"),
            Self::ResumeUnsupported => write!(f, "resume unsupported"),
            Self::Failed(reason) => write!(f, "{reason}"),
        }
    }
}

/// Pending acquisition returned by [`CaptureBackend::acquire`].
///
/// Owns everything it needs so it can be awaited after the session is
/// borrowed again.
pub type AcquireFuture<S> = Pin<Box<dyn Future<Output = Result<S, AcquireFailure>>>>;

/// A live capture stream.
pub trait MediaStream {
    /// Stops every track. Must be safe to call more than once.
    fn stop_tracks(&mut self);

    /// Number of tracks still live.
    fn live_tracks(&self) -> usize;

    /// Copies the most recent mono audio samples into `out`, oldest first,
    /// returning how many were written.
    fn audio_samples(&self, out: &mut [f32]) -> usize;
}

/// A low-level binary recorder bound to one stream.
pub trait MediaRecorder {
    /// Begins encoding.
    fn start(&mut self) -> Result<(), RecorderFailure>;

    /// Suspends encoding.
    fn pause(&mut self) -> Result<(), RecorderFailure>;

    /// Continues encoding after [`pause`](Self::pause).
    fn resume(&mut self) -> Result<(), RecorderFailure>;

    /// Stops encoding and flushes the final data into the chunk buffer.
    fn stop(&mut self) -> Result<(), RecorderFailure>;

    /// Drains the chunks produced since the previous call.
    fn take_chunks(&mut self) -> Vec<Vec<u8>>;

    /// Returns an error raised asynchronously since the previous call.
    fn take_error(&mut self) -> Option<RecorderFailure>;
}

/// Factory for streams and recorders.
pub trait CaptureBackend {
    /// Stream type handed out by [`acquire`](Self::acquire).
    type Stream: MediaStream + 'static;
    /// Recorder type built by [`create_recorder`](Self::create_recorder).
    type Recorder: MediaRecorder;

    /// Reports what this environment supports.
    fn capabilities(&self) -> Capabilities;

    /// Requests camera/microphone access. The future may wait on a
    /// permission prompt.
    fn acquire(&self, constraints: MediaConstraints) -> AcquireFuture<Self::Stream>;

    /// Whether the recorder can produce `mime`.
    fn is_type_supported(&self, mime: &str) -> bool;

    /// Builds a recorder over `stream` producing `mime`.
    fn create_recorder(
        &self,
        stream: &mut Self::Stream,
        mime: &str,
    ) -> Result<Self::Recorder, RecorderFailure>;
}
