//! Configuration management for take-recorder.
//!
//! Handles loading and saving TOML configuration files with cross-platform
//! paths, validation, and atomic write operations.

use crate::{
    AppError, AppResult,
    config::{
        DisplayConfig, ExportConfig, MAX_DURATION_LIMIT_SECS, RecordingConfig, TrimConfig,
    },
};

use std::{
    fs,
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use serde::{Deserialize, Serialize};
use take_recorder_core::{FormatPreference, MediaConstraints, SessionConfig};
use tracing::{debug, info, instrument};

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Capture timing and formats.
    #[serde(default)]
    pub recording: RecordingConfig,
    /// Trim editor settings.
    #[serde(default)]
    pub trim: TrimConfig,
    /// Saved take destination.
    #[serde(default)]
    pub export: ExportConfig,
    /// Terminal presentation settings.
    #[serde(default)]
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the platform config directory, creating a
    /// default file if none exists.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            info!("No config found, creating default");
            let config = Config::default();
            config.save_to(&config_path)?;
            Ok(config)
        }
    }

    /// Load and validate configuration from an explicit path.
    #[track_caller]
    #[instrument]
    pub fn load_from(config_path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to read config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to parse config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        config.validate()?;

        info!(config_path = ?config_path, "Configuration loaded");

        Ok(config)
    }

    /// Rejects values the session cannot run with.
    #[track_caller]
    pub fn validate(&self) -> AppResult<()> {
        let invalid = |reason: String| AppError::ConfigError {
            reason,
            location: ErrorLocation::from(Location::caller()),
        };

        let max_duration = self.recording.max_duration_secs;
        if max_duration == 0 || max_duration > MAX_DURATION_LIMIT_SECS {
            return Err(invalid(format!(
                "recording.max_duration_secs must be between 1 and {}, got {}",
                MAX_DURATION_LIMIT_SECS, max_duration
            )));
        }

        if self.recording.formats.iter().all(|mime| mime.trim().is_empty()) {
            return Err(invalid("recording.formats must list at least one MIME type".to_string()));
        }

        if !self.trim.min_separation_secs.is_finite() || self.trim.min_separation_secs <= 0.0 {
            return Err(invalid(format!(
                "trim.min_separation_secs must be positive, got {}",
                self.trim.min_separation_secs
            )));
        }

        if self.display.meter_fps == 0 || self.display.meter_fps > 120 {
            return Err(invalid(format!(
                "display.meter_fps must be between 1 and 120, got {}",
                self.display.meter_fps
            )));
        }

        let stem = self.export.filename_stem.trim();
        if stem.is_empty() || stem.contains(['/', '\\']) {
            return Err(invalid(format!(
                "export.filename_stem '{}' is not a valid file name",
                self.export.filename_stem
            )));
        }

        Ok(())
    }

    /// Save configuration to the platform config directory.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save(&self) -> AppResult<()> {
        let config_path = Self::config_path()?;
        self.save_to(&config_path)
    }

    /// Save configuration to `config_path` using atomic write pattern.
    ///
    /// Writes to a temporary file first, then renames to prevent corruption
    /// if the process crashes during the write.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        let contents = toml::to_string_pretty(self).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to serialize config: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        // Atomic write: write to temp file then rename
        let temp_path = config_path.with_extension("toml.tmp");

        let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to create temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        temp_file
            .write_all(contents.as_bytes())
            .map_err(|e| AppError::ConfigError {
                reason: format!("Failed to write temp config file: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        temp_file.sync_all().map_err(|e| AppError::ConfigError {
            reason: format!("Failed to sync temp config file: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        fs::rename(&temp_path, config_path).map_err(|e| AppError::ConfigError {
            reason: format!("Failed to rename temp config to final: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        info!(config_path = ?config_path, "Configuration saved (atomic write)");

        Ok(())
    }

    /// Session tunables derived from this configuration.
    ///
    /// The microphone backend only records audio, so no video track is
    /// requested.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            countdown_secs: self.recording.countdown_secs,
            max_duration_secs: self.recording.max_duration_secs,
            warning_thresholds_secs: self.recording.warning_thresholds_secs.clone(),
            formats: FormatPreference::new(self.recording.formats.iter().cloned()),
            min_trim_separation_secs: self.trim.min_separation_secs,
            filename_stem: self.export.filename_stem.trim().to_string(),
            constraints: MediaConstraints {
                video: None,
                audio: true,
            },
        }
    }

    /// Directory saved takes are written to.
    #[track_caller]
    pub fn export_directory(&self) -> AppResult<PathBuf> {
        match &self.export.directory {
            Some(directory) => Ok(directory.clone()),
            None => Ok(Self::project_dirs()?.data_dir().join("exports")),
        }
    }

    /// Directory log files are written to.
    #[track_caller]
    pub fn log_directory() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join("logs"))
    }

    #[track_caller]
    fn config_path() -> AppResult<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join("config.toml"))
    }

    #[track_caller]
    fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "take-recorder", "Take-Recorder").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get project directories".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })
    }
}
