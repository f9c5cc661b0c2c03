mod artifact;
mod backend;
mod format;
mod session;

pub use {
    artifact::Artifact,
    backend::{
        AcquireFailure, AcquireFuture, Capabilities, CaptureBackend, FacingMode, MediaConstraints,
        MediaRecorder, MediaStream, RecorderFailure, VideoConstraints,
    },
    format::{DEFAULT_FORMATS, FormatPreference, extension_for},
    session::{CaptureOutput, DeviceSession},
};

pub(crate) use session::acquire_error;
