//! Take Recorder Core Library
//!
//! Recording session state machine for a self-recording widget: device
//! ownership, take management, trimming and live telemetry. The platform
//! capture stack is reached only through the traits in [`device`].
//!
//! # Example
//!
//! ```no_run
//! use take_recorder_core::{CaptureBackend, CoreResult, RecordingSession, SessionConfig};
//!
//! async fn record_one<B: CaptureBackend>(backend: B) -> CoreResult<()> {
//!     let mut session = RecordingSession::new(backend, SessionConfig::default());
//!
//!     session.begin_countdown().await?;
//!     for _ in 0..3 {
//!         session.tick_countdown()?;
//!     }
//!     session.stop()?;
//!
//!     let save = session.save()?;
//!     println!("{} ({} bytes)", save.filename, save.payload.len());
//!     Ok(())
//! }
//! ```

pub mod device;
mod error;
pub mod session;
pub mod takes;
pub mod telemetry;
pub mod trim;

pub use {
    device::{
        AcquireFailure, AcquireFuture, Artifact, Capabilities, CaptureBackend, FormatPreference,
        MediaConstraints, MediaRecorder, MediaStream, RecorderFailure,
    },
    error::{ErrorClass, Result as CoreResult, SessionError},
    session::{
        Advisory, RecordingSession, RecordingState, SaveRequest, SessionConfig, SessionEvent,
        SessionSnapshot, Severity, Transition,
    },
    takes::{FrameDecoder, TakeId, TakeStore, TakeSummary, Thumbnail, ThumbnailJob},
    telemetry::{MeterReading, TimerSignal},
    trim::{TrimCodec, TrimRange},
};
