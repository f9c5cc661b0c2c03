use crate::{device::Artifact, takes::PlaybackHandle, takes::Thumbnail};

use std::{fmt, sync::Arc};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque take identity, stable for the take's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TakeId(Uuid);

impl TakeId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for TakeId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for TakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Section of the payload that the take's declared duration refers to.
///
/// Present when a trim was applied without re-encoding: the payload still
/// spans the source recording and playback must be clamped to this window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackWindow {
    /// Offset into the payload where playback starts, in seconds.
    pub start_secs: f64,
    /// Offset into the payload where playback stops, in seconds.
    pub end_secs: f64,
}

/// One completed recording.
#[derive(Debug)]
pub struct Take {
    pub(crate) id: TakeId,
    pub(crate) artifact: Artifact,
    pub(crate) handle: PlaybackHandle,
    pub(crate) duration_secs: f64,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) thumbnail: Option<Arc<Thumbnail>>,
    pub(crate) playback_window: Option<PlaybackWindow>,
}

impl Take {
    /// Identity of this take.
    pub fn id(&self) -> TakeId {
        self.id
    }

    /// The recorded payload.
    pub fn artifact(&self) -> &Artifact {
        &self.artifact
    }

    /// Handle used by presentation to play the take.
    pub fn handle(&self) -> &PlaybackHandle {
        &self.handle
    }

    /// Declared duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration_secs
    }

    /// When the take was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Thumbnail, once background generation has finished.
    pub fn thumbnail(&self) -> Option<&Thumbnail> {
        self.thumbnail.as_deref()
    }

    /// Playback clamp for takes trimmed without re-encoding.
    pub fn playback_window(&self) -> Option<PlaybackWindow> {
        self.playback_window
    }

    pub(crate) fn summary(&self, number: usize, selected: bool) -> TakeSummary {
        TakeSummary {
            id: self.id,
            number,
            duration_secs: self.duration_secs,
            created_at: self.created_at,
            mime: self.artifact.mime().to_string(),
            bytes: self.artifact.len(),
            has_thumbnail: self.thumbnail.is_some(),
            playback_window: self.playback_window,
            selected,
        }
    }
}

/// Presentation view of a take.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakeSummary {
    /// Take identity.
    pub id: TakeId,
    /// "Take N" number; the oldest take is 1.
    pub number: usize,
    /// Declared duration in seconds.
    pub duration_secs: f64,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Payload MIME type.
    pub mime: String,
    /// Payload size in bytes.
    pub bytes: usize,
    /// Whether a thumbnail is attached.
    pub has_thumbnail: bool,
    /// Playback clamp, if any.
    pub playback_window: Option<PlaybackWindow>,
    /// Whether this take is the current selection.
    pub selected: bool,
}
