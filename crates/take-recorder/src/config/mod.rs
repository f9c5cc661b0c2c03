#[allow(clippy::module_inception)]
mod config;
mod display_config;
mod export_config;
mod recording_config;
mod trim_config;

pub(crate) use {
    config::Config, display_config::DisplayConfig, export_config::ExportConfig,
    recording_config::RecordingConfig, trim_config::TrimConfig,
};

use take_recorder_core::{
    session::DEFAULT_FILENAME_STEM,
    telemetry::{DEFAULT_COUNTDOWN_SECS, DEFAULT_MAX_DURATION_SECS, DEFAULT_WARNING_THRESHOLDS_SECS},
    trim::DEFAULT_MIN_SEPARATION_SECS,
};

/// The microphone recorder only produces WAV.
pub(crate) const DEFAULT_FORMAT: &str = "audio/wav";
pub(crate) const DEFAULT_METER_FPS: u32 = 30;
pub(crate) const DEFAULT_TOAST_DURATION_MS: u64 = 4000;
/// Longest time limit a config may set; bounds the in-memory recording.
pub(crate) const MAX_DURATION_LIMIT_SECS: u32 = 60 * 60;

pub(crate) fn default_countdown_secs() -> u32 {
    DEFAULT_COUNTDOWN_SECS
}

pub(crate) fn default_max_duration_secs() -> u32 {
    DEFAULT_MAX_DURATION_SECS
}

pub(crate) fn default_warning_thresholds_secs() -> Vec<u32> {
    DEFAULT_WARNING_THRESHOLDS_SECS.to_vec()
}

pub(crate) fn default_formats() -> Vec<String> {
    vec![DEFAULT_FORMAT.to_string()]
}

pub(crate) fn default_min_separation_secs() -> f64 {
    DEFAULT_MIN_SEPARATION_SECS
}

pub(crate) fn default_filename_stem() -> String {
    DEFAULT_FILENAME_STEM.to_string()
}

pub(crate) fn default_meter_fps() -> u32 {
    DEFAULT_METER_FPS
}

pub(crate) fn default_toast_duration_ms() -> u64 {
    DEFAULT_TOAST_DURATION_MS
}
