use crate::config::default_filename_stem;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and under what name saved takes are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Target directory (None = the application's data directory).
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// File name without extension.
    #[serde(default = "default_filename_stem")]
    pub filename_stem: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: None,
            filename_stem: default_filename_stem(),
        }
    }
}
