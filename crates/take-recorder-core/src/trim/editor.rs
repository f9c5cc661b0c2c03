use crate::{CoreResult, SessionError, TakeId};

use std::panic::Location;

use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};

/// Smallest allowed gap between trim start and end, in seconds.
pub const DEFAULT_MIN_SEPARATION_SECS: f64 = 0.1;

/// Sub-interval of a take, in seconds from the take's start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrimRange {
    /// Inclusive start offset.
    pub start: f64,
    /// Exclusive end offset.
    pub end: f64,
}

impl TrimRange {
    /// Length of the range; may be zero for degenerate takes.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Edits the trim range of one take.
///
/// Every mutation clamps so that `0 <= start < end <= duration` and the
/// range never shrinks below the minimum separation.
#[derive(Debug, Clone)]
pub struct TrimEditor {
    take_id: TakeId,
    duration: f64,
    min_separation: f64,
    range: TrimRange,
}

impl TrimEditor {
    /// Opens the editor over the whole take.
    pub fn start(take_id: TakeId, duration_secs: f64, min_separation: f64) -> Self {
        let duration = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };

        Self {
            take_id,
            duration,
            min_separation: min_separation.max(0.0),
            range: TrimRange {
                start: 0.0,
                end: duration,
            },
        }
    }

    /// Take being trimmed.
    pub fn take_id(&self) -> TakeId {
        self.take_id
    }

    /// Duration of the take being trimmed.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Current range.
    pub fn range(&self) -> TrimRange {
        self.range
    }

    /// Moves the start, clamped below the end. Non-finite input is ignored.
    pub fn set_start(&mut self, seconds: f64) -> TrimRange {
        if seconds.is_finite() {
            let upper = (self.range.end - self.min_separation).max(0.0);
            self.range.start = seconds.clamp(0.0, upper);
        }
        self.range
    }

    /// Moves the end, clamped above the start. Non-finite input is ignored.
    pub fn set_end(&mut self, seconds: f64) -> TrimRange {
        if seconds.is_finite() {
            let lower = (self.range.start + self.min_separation).min(self.duration);
            self.range.end = seconds.clamp(lower, self.duration);
        }
        self.range
    }

    /// Restores the full-take range.
    pub fn reset(&mut self) -> TrimRange {
        self.range = TrimRange {
            start: 0.0,
            end: self.duration,
        };
        self.range
    }

    /// Validates the range for committing.
    ///
    /// # Errors
    ///
    /// Returns `EmptyTrimRange` if the range has no length.
    #[track_caller]
    pub fn apply(&self) -> CoreResult<TrimRange> {
        if self.range.length() <= 0.0 {
            return Err(SessionError::EmptyTrimRange {
                start: self.range.start,
                end: self.range.end,
                location: ErrorLocation::from(Location::caller()),
            });
        }
        Ok(self.range)
    }
}
