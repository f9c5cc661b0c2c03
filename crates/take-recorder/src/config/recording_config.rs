use crate::config::{
    default_countdown_secs, default_formats, default_max_duration_secs,
    default_warning_thresholds_secs,
};

use serde::{Deserialize, Serialize};

/// Capture timing and format configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    /// Input device name (None = system default).
    #[serde(default)]
    pub selected_device: Option<String>,

    /// Lead-in before capture starts, in seconds.
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,

    /// Hard recording limit in seconds.
    #[serde(default = "default_max_duration_secs")]
    pub max_duration_secs: u32,

    /// Remaining-time warnings in seconds.
    #[serde(default = "default_warning_thresholds_secs")]
    pub warning_thresholds_secs: Vec<u32>,

    /// Recording MIME types in preference order; the last is the fallback.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

impl Default for RecordingConfig {
    fn default() -> Self {
        Self {
            selected_device: None,
            countdown_secs: default_countdown_secs(),
            max_duration_secs: default_max_duration_secs(),
            warning_thresholds_secs: default_warning_thresholds_secs(),
            formats: default_formats(),
        }
    }
}
