use crate::{TakeId, session::RecordingState};

use serde::{Deserialize, Serialize};

/// How loudly an advisory should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral notice.
    Info,
    /// Positive confirmation.
    Success,
    /// Needs attention soon.
    Warning,
    /// Something failed.
    Error,
}

/// A transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Advisory {
    /// Text to show.
    pub message: String,
    /// Presentation severity.
    pub severity: Severity,
}

impl Advisory {
    /// Builds an advisory.
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    /// Warning for `remaining_secs` left on the recording clock.
    pub fn time_remaining(remaining_secs: u32) -> Self {
        let message = match remaining_secs {
            60 => "1 minute remaining".to_string(),
            1 => "1 second remaining".to_string(),
            secs => format!("{secs} seconds remaining"),
        };

        let severity = match remaining_secs {
            secs if secs > 30 => Severity::Info,
            secs if secs > 10 => Severity::Warning,
            _ => Severity::Error,
        };

        Self::new(message, severity)
    }
}

/// Things presentation may want to react to, queued in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    /// The state machine moved.
    StateChanged {
        /// Previous state.
        from: RecordingState,
        /// New state.
        to: RecordingState,
    },
    /// A message for the user.
    Advisory(Advisory),
    /// A new take was stored and selected.
    TakeCommitted {
        /// The new take.
        take_id: TakeId,
    },
    /// A take was removed.
    TakeDeleted {
        /// The removed take.
        take_id: TakeId,
    },
    /// A trimmed take was added next to its source.
    TrimApplied {
        /// Take the trim was made from.
        source: TakeId,
        /// The new take.
        take_id: TakeId,
    },
    /// A take's thumbnail became available.
    ThumbnailAttached {
        /// Take the thumbnail belongs to.
        take_id: TakeId,
    },
    /// The recording limit was hit.
    TimeLimitReached,
}
