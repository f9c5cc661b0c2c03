use crate::config::default_min_separation_secs;

use serde::{Deserialize, Serialize};

/// Trim editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimConfig {
    /// Shortest range the handles can be dragged to, in seconds.
    #[serde(default = "default_min_separation_secs")]
    pub min_separation_secs: f64,
}

impl Default for TrimConfig {
    fn default() -> Self {
        Self {
            min_separation_secs: default_min_separation_secs(),
        }
    }
}
