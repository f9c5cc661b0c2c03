use crate::{
    device::{FormatPreference, MediaConstraints},
    telemetry::{DEFAULT_COUNTDOWN_SECS, DEFAULT_MAX_DURATION_SECS, DEFAULT_WARNING_THRESHOLDS_SECS},
    trim::DEFAULT_MIN_SEPARATION_SECS,
};

/// Default download name without extension.
pub const DEFAULT_FILENAME_STEM: &str = "welcome-video";

/// Tunables for a [`RecordingSession`](crate::RecordingSession).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Seconds of lead-in before capture; 0 starts immediately.
    pub countdown_secs: u32,
    /// Hard recording limit in seconds.
    pub max_duration_secs: u32,
    /// Remaining-time warnings in seconds.
    pub warning_thresholds_secs: Vec<u32>,
    /// Recording formats in preference order.
    pub formats: FormatPreference,
    /// Minimum trim length in seconds.
    pub min_trim_separation_secs: f64,
    /// Download name without extension.
    pub filename_stem: String,
    /// What to ask the platform for.
    pub constraints: MediaConstraints,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            countdown_secs: DEFAULT_COUNTDOWN_SECS,
            max_duration_secs: DEFAULT_MAX_DURATION_SECS,
            warning_thresholds_secs: DEFAULT_WARNING_THRESHOLDS_SECS.to_vec(),
            formats: FormatPreference::default(),
            min_trim_separation_secs: DEFAULT_MIN_SEPARATION_SECS,
            filename_stem: DEFAULT_FILENAME_STEM.to_string(),
            constraints: MediaConstraints::default(),
        }
    }
}
