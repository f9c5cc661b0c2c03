use crate::{
    TakeId,
    session::RecordingState,
    takes::TakeSummary,
    telemetry::MeterReading,
    trim::TrimRange,
};

use std::sync::Arc;

use serde::Serialize;

/// Everything presentation needs to draw one frame of the widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    /// Current state.
    pub state: RecordingState,
    /// `false` once the environment was found unusable.
    pub supported: bool,
    /// An acquisition is waiting on the platform.
    pub acquisition_pending: bool,
    /// Takes, most recent first.
    pub takes: Vec<TakeSummary>,
    /// Selected take.
    pub selected: Option<TakeId>,
    /// Contents of the error slot.
    pub error: Option<String>,
    /// Latest meter frame, zero when the meter is off.
    pub meter: MeterReading,
    /// Seconds left in the countdown.
    pub countdown_remaining: Option<u32>,
    /// Whole seconds recorded, while capturing.
    pub elapsed_secs: Option<u32>,
    /// Whole seconds left before the limit, while capturing.
    pub remaining_secs: Option<u32>,
    /// Recording limit.
    pub max_duration_secs: u32,
    /// Trim editor range, while trimming.
    pub trim: Option<TrimRange>,
}

/// A download request for the selected take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveRequest {
    /// Take being saved.
    pub take_id: TakeId,
    /// Payload bytes.
    pub payload: Arc<[u8]>,
    /// Suggested file name, `<stem>.<ext>`.
    pub filename: String,
    /// Payload MIME type.
    pub mime: String,
}
