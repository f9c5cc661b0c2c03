use std::collections::BTreeSet;

use tracing::debug;

/// Default recording limit in seconds.
pub const DEFAULT_MAX_DURATION_SECS: u32 = 120;

/// Default remaining-time warnings in seconds.
pub const DEFAULT_WARNING_THRESHOLDS_SECS: [u32; 3] = [60, 30, 10];

/// Advisory output of a timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    /// Remaining time crossed a warning threshold.
    Warning {
        /// The threshold that was crossed.
        remaining_secs: u32,
    },
    /// Remaining time reached zero.
    LimitReached,
}

/// Whole-second recording timer with one-shot warnings.
#[derive(Debug, Clone)]
pub struct RecordingTimer {
    max_duration_secs: u32,
    thresholds: Vec<u32>,
    elapsed_secs: u32,
    fired: BTreeSet<u32>,
    limit_reported: bool,
}

impl RecordingTimer {
    /// Creates a timer at zero.
    ///
    /// Thresholds at or above the limit can never be crossed and are
    /// dropped.
    pub fn new(max_duration_secs: u32, thresholds: &[u32]) -> Self {
        let mut thresholds: Vec<u32> = thresholds
            .iter()
            .copied()
            .filter(|&t| t < max_duration_secs)
            .collect();
        thresholds.sort_unstable_by(|a, b| b.cmp(a));
        thresholds.dedup();

        Self {
            max_duration_secs,
            thresholds,
            elapsed_secs: 0,
            fired: BTreeSet::new(),
            limit_reported: false,
        }
    }

    /// Advances by one second.
    pub fn tick(&mut self) -> Vec<TimerSignal> {
        if self.limit_reported {
            return Vec::new();
        }

        self.elapsed_secs = (self.elapsed_secs + 1).min(self.max_duration_secs);
        let remaining = self.remaining_secs();

        let mut signals: Vec<TimerSignal> = self
            .thresholds
            .iter()
            .copied()
            .filter(|&threshold| remaining <= threshold && self.fired.insert(threshold))
            .map(|threshold| TimerSignal::Warning {
                remaining_secs: threshold,
            })
            .collect();

        if remaining == 0 {
            self.limit_reported = true;
            signals.push(TimerSignal::LimitReached);
        }

        if !signals.is_empty() {
            debug!(
                elapsed_secs = self.elapsed_secs,
                remaining_secs = remaining,
                signals = signals.len(),
                "Timer signals raised"
            );
        }

        signals
    }

    /// Seconds counted so far.
    pub fn elapsed_secs(&self) -> u32 {
        self.elapsed_secs
    }

    /// Seconds left before the limit.
    pub fn remaining_secs(&self) -> u32 {
        self.max_duration_secs.saturating_sub(self.elapsed_secs)
    }

    /// Configured limit.
    pub fn max_duration_secs(&self) -> u32 {
        self.max_duration_secs
    }
}
