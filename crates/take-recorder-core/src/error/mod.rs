use crate::{TakeId, session::RecordingState, session::Transition};

use error_location::ErrorLocation;
use thiserror::Error;

/// Severity class of a [`SessionError`], deciding how the session reacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The widget cannot work in this environment at all.
    Fatal,
    /// Shown to the user, nothing is blocked.
    Advisory,
    /// Shown to the user, who may retry.
    Recoverable,
    /// A caller issued an intent the state machine should have disallowed.
    Defect,
    /// Cosmetic failure, logged only.
    Cosmetic,
}

/// Session, device and take-store errors with source location tracking.
#[derive(Error, Debug)]
pub enum SessionError {
    /// Capture or recording capability is missing.
    #[error("Unsupported environment: {reason} {location}")]
    UnsupportedEnvironment {
        /// Which capability is missing.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Capture was requested outside a secure context.
    #[error("Insecure context {location}")]
    InsecureContext {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The user or platform refused camera/microphone access.
    #[error("Permission denied {location}")]
    PermissionDenied {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No matching capture device exists.
    #[error("Device not found {location}")]
    DeviceNotFound {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The device exists but another application holds it.
    #[error("Device busy {location}")]
    DeviceBusy {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Acquisition failed for a reason the platform did not classify.
    #[error("Acquisition failed: {reason} {location}")]
    UnknownAcquisitionFailure {
        /// Platform-provided description.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// An acquisition request is already waiting on the platform.
    #[error("Acquisition already pending {location}")]
    AcquisitionPending {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// A stream is already held by the device session.
    #[error("A capture stream is already active {location}")]
    StreamAlreadyActive {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder cannot pause.
    #[error("Pause unsupported {location}")]
    PauseUnsupported {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The recorder cannot resume.
    #[error("Resume unsupported {location}")]
    ResumeUnsupported {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The low-level recorder failed to start, stop or encode.
    #[error("Recorder failed: {reason} {location}")]
    RecorderFailed {
        /// Recorder-provided description.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// No capture is in progress.
    #[error("Not capturing {location}")]
    NotCapturing {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The trim range has zero or negative length.
    #[error("Trim range is empty ({start:.3}s..{end:.3}s) {location}")]
    EmptyTrimRange {
        /// Range start in seconds.
        start: f64,
        /// Range end in seconds.
        end: f64,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The take id is not in the store.
    #[error("Unknown take {id} {location}")]
    UnknownTake {
        /// The id that was looked up.
        id: TakeId,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The intent needs a selected take and there is none.
    #[error("No take selected {location}")]
    NoTakeSelected {
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The intent is not legal in the current state.
    #[error("Cannot {transition:?} while {from:?} {location}")]
    InvalidTransition {
        /// State the session was in.
        from: RecordingState,
        /// Transition that was rejected.
        transition: Transition,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Thumbnail decoding, cropping or encoding failed.
    #[error("Thumbnail generation failed: {reason} {location}")]
    ThumbnailFailed {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// The trim codec could not produce the trimmed artifact.
    #[error("Trim codec failed: {reason} {location}")]
    TrimFailed {
        /// Codec-provided description.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

impl SessionError {
    /// How the session and its callers should treat this error.
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::UnsupportedEnvironment { .. } => ErrorClass::Fatal,
            Self::InsecureContext { .. } => ErrorClass::Advisory,
            Self::PermissionDenied { .. }
            | Self::DeviceNotFound { .. }
            | Self::DeviceBusy { .. }
            | Self::UnknownAcquisitionFailure { .. }
            | Self::AcquisitionPending { .. }
            | Self::PauseUnsupported { .. }
            | Self::ResumeUnsupported { .. }
            | Self::RecorderFailed { .. }
            | Self::EmptyTrimRange { .. }
            | Self::TrimFailed { .. } => ErrorClass::Recoverable,
            Self::StreamAlreadyActive { .. }
            | Self::NotCapturing { .. }
            | Self::UnknownTake { .. }
            | Self::NoTakeSelected { .. }
            | Self::InvalidTransition { .. } => ErrorClass::Defect,
            Self::ThumbnailFailed { .. } => ErrorClass::Cosmetic,
        }
    }

    /// Message suitable for the error slot shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::UnsupportedEnvironment { reason, .. } => {
                format!("{reason} Please use a supported device or browser.")
            }
            Self::InsecureContext { .. } => {
                "Camera access requires HTTPS. Please use HTTPS or localhost.".to_string()
            }
            Self::PermissionDenied { .. } => {
                "Camera access denied. Please grant camera permissions and try again.".to_string()
            }
            Self::DeviceNotFound { .. } => {
                "No camera found. Please ensure your device has a camera.".to_string()
            }
            Self::DeviceBusy { .. } => {
                "Camera is already in use by another application.".to_string()
            }
            Self::UnknownAcquisitionFailure { .. } => {
                "Unable to access camera. Please try again.".to_string()
            }
            Self::AcquisitionPending { .. } => "Waiting for camera access.".to_string(),
            Self::PauseUnsupported { .. } => "Pausing is not supported on this device.".to_string(),
            Self::ResumeUnsupported { .. } => {
                "Resuming is not supported on this device.".to_string()
            }
            Self::RecorderFailed { .. } => "Recording failed. Please try again.".to_string(),
            Self::EmptyTrimRange { .. } => "Select a longer section to trim.".to_string(),
            Self::TrimFailed { .. } => "Trimming failed. Please try again.".to_string(),
            other => other.to_string(),
        }
    }
}

/// Result type alias using [`SessionError`].
pub type Result<T> = std::result::Result<T, SessionError>;
