use crate::config::{default_meter_fps, default_toast_duration_ms};

use serde::{Deserialize, Serialize};

/// Terminal presentation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Audio meter refresh rate.
    #[serde(default = "default_meter_fps")]
    pub meter_fps: u32,

    /// How long a toast stays visible, in milliseconds.
    #[serde(default = "default_toast_duration_ms")]
    pub toast_duration_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            meter_fps: default_meter_fps(),
            toast_duration_ms: default_toast_duration_ms(),
        }
    }
}
