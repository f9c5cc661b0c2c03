//! Writes saved takes to disk.

use crate::{AppError, AppResult};

use std::{
    fs,
    io::{ErrorKind, Write},
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use take_recorder_core::SaveRequest;
use tracing::{debug, info, instrument};

/// Highest numeric suffix tried before giving up on a free file name.
const MAX_NAME_ATTEMPTS: u32 = 1000;

/// Saves take payloads into one directory without overwriting anything.
#[derive(Debug, Clone)]
pub(crate) struct TakeExporter {
    directory: PathBuf,
}

impl TakeExporter {
    pub(crate) fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub(crate) fn directory(&self) -> &Path {
        &self.directory
    }

    /// Writes the payload off the async runtime and returns the final path.
    ///
    /// Name collisions get a `-1`, `-2`, ... suffix.
    #[instrument(
        skip(self, request),
        fields(take_id = %request.take_id, filename = %request.filename)
    )]
    pub(crate) async fn export(&self, request: SaveRequest) -> AppResult<PathBuf> {
        let directory = self.directory.clone();

        let path = tokio::task::spawn_blocking(move || write_take(&directory, &request))
            .await
            .map_err(|e| AppError::ExportFailed {
                reason: format!("Export task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        info!(path = ?path, "Take saved");

        Ok(path)
    }
}

#[track_caller]
fn write_take(directory: &Path, request: &SaveRequest) -> AppResult<PathBuf> {
    fs::create_dir_all(directory)?;

    let target = free_path(directory, &request.filename)?;

    // Atomic write: write to temp file then rename
    let temp_path = target.with_extension("part");

    let mut temp_file = fs::File::create(&temp_path).map_err(|e| AppError::ExportFailed {
        reason: format!("Failed to create temp file: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    temp_file
        .write_all(&request.payload)
        .map_err(|e| AppError::ExportFailed {
            reason: format!("Failed to write take: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

    temp_file.sync_all().map_err(|e| AppError::ExportFailed {
        reason: format!("Failed to sync take: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    fs::rename(&temp_path, &target).map_err(|e| AppError::ExportFailed {
        reason: format!("Failed to rename temp file to final: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    debug!(bytes = request.payload.len(), mime = %request.mime, "Take written");

    Ok(target)
}

#[track_caller]
fn free_path(directory: &Path, filename: &str) -> AppResult<PathBuf> {
    let candidate = directory.join(filename);
    if !exists(&candidate)? {
        return Ok(candidate);
    }

    let (stem, extension) = match filename.rsplit_once('.') {
        Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
        _ => (filename, None),
    };

    for attempt in 1..=MAX_NAME_ATTEMPTS {
        let name = match extension {
            Some(extension) => format!("{stem}-{attempt}.{extension}"),
            None => format!("{stem}-{attempt}"),
        };
        let candidate = directory.join(name);
        if !exists(&candidate)? {
            return Ok(candidate);
        }
    }

    Err(AppError::ExportFailed {
        reason: format!("No free file name for '{}' in {:?}", filename, directory),
        location: ErrorLocation::from(Location::caller()),
    })
}

fn exists(path: &Path) -> AppResult<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}
