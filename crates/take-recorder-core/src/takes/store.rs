use crate::{
    CoreResult, SessionError,
    device::Artifact,
    takes::{PlaybackHandle, PlaybackWindow, Take, TakeId, TakeSummary, Thumbnail},
};

use std::{
    panic::Location,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use chrono::Utc;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Payload produced by a trim, ready to become a new take.
#[derive(Debug, Clone)]
pub struct TrimmedArtifact {
    /// The trimmed payload (may share bytes with the source).
    pub artifact: Artifact,
    /// Playback clamp when the payload was not re-encoded.
    pub window: Option<PlaybackWindow>,
}

/// What a [`TakeStore::delete`] did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deletion {
    /// The deleted take was the selected one.
    pub was_selected: bool,
    /// Takes left in the store.
    pub remaining: usize,
}

/// Owner of all completed takes and of the current selection.
///
/// Takes are ordered most recent first. Selection is an id looked up in the
/// list, so a deleted take can never be left selected.
#[derive(Debug)]
pub struct TakeStore {
    takes: Vec<Take>,
    selected: Option<TakeId>,
    ledger: Arc<AtomicUsize>,
}

impl TakeStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            takes: Vec::new(),
            selected: None,
            ledger: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Stores a freshly recorded artifact as the newest, selected take.
    #[instrument(skip(self, artifact))]
    pub fn commit(&mut self, artifact: Artifact, duration: Duration) -> &Take {
        let take = Take {
            id: TakeId::generate(),
            handle: PlaybackHandle::open(&self.ledger),
            artifact,
            duration_secs: duration.as_secs_f64(),
            created_at: Utc::now(),
            thumbnail: None,
            playback_window: None,
        };

        info!(
            take_id = %take.id,
            duration_secs = take.duration_secs,
            bytes = take.artifact.len(),
            "Take committed"
        );

        self.insert_selected(take)
    }

    /// Adds a trimmed copy of `source` as the newest, selected take.
    ///
    /// The source take is left in place.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTake` if `source` is not stored.
    #[track_caller]
    #[instrument(skip(self, trimmed))]
    pub fn replace(
        &mut self,
        source: TakeId,
        trimmed: TrimmedArtifact,
        duration_secs: f64,
    ) -> CoreResult<&Take> {
        let thumbnail = self.get(source)?.thumbnail.clone();

        let take = Take {
            id: TakeId::generate(),
            handle: PlaybackHandle::open(&self.ledger),
            artifact: trimmed.artifact,
            duration_secs,
            created_at: Utc::now(),
            thumbnail,
            playback_window: trimmed.window,
        };

        info!(
            source_id = %source,
            take_id = %take.id,
            duration_secs,
            "Trimmed take inserted"
        );

        Ok(self.insert_selected(take))
    }

    /// Makes `id` the current selection.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTake` if `id` is not stored.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn select(&mut self, id: TakeId) -> CoreResult<&PlaybackHandle> {
        let position = self.position(id)?;
        self.selected = Some(id);

        debug!(take_id = %id, "Take selected");

        Ok(&self.takes[position].handle)
    }

    /// Removes a take and releases its handle and thumbnail.
    ///
    /// If it was selected, the most recent remaining take becomes selected.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTake` if `id` is not stored.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn delete(&mut self, id: TakeId) -> CoreResult<Deletion> {
        let position = self.position(id)?;
        let removed = self.takes.remove(position);
        drop(removed);

        let was_selected = self.selected == Some(id);
        if was_selected {
            self.selected = self.takes.first().map(|take| take.id);
        }

        info!(
            take_id = %id,
            was_selected,
            remaining = self.takes.len(),
            "Take deleted"
        );

        Ok(Deletion {
            was_selected,
            remaining: self.takes.len(),
        })
    }

    /// Removes every take; returns how many were released.
    #[instrument(skip(self))]
    pub fn delete_all(&mut self) -> usize {
        let count = self.takes.len();
        self.takes.clear();
        self.selected = None;

        info!(count, "All takes deleted");

        count
    }

    /// Attaches a thumbnail; returns `false` if the take no longer exists.
    pub fn attach_thumbnail(&mut self, id: TakeId, thumbnail: Thumbnail) -> bool {
        match self.takes.iter_mut().find(|take| take.id == id) {
            Some(take) => {
                take.thumbnail = Some(Arc::new(thumbnail));
                true
            }
            None => false,
        }
    }

    /// Looks up a take by id.
    ///
    /// # Errors
    ///
    /// Returns `UnknownTake` if `id` is not stored.
    #[track_caller]
    pub fn get(&self, id: TakeId) -> CoreResult<&Take> {
        let position = self.position(id)?;
        Ok(&self.takes[position])
    }

    /// Id of the selected take.
    pub fn selected(&self) -> Option<TakeId> {
        self.selected
    }

    /// The selected take.
    pub fn selected_take(&self) -> Option<&Take> {
        let id = self.selected?;
        self.takes.iter().find(|take| take.id == id)
    }

    /// All takes, most recent first.
    pub fn takes(&self) -> &[Take] {
        &self.takes
    }

    /// Number of stored takes.
    pub fn len(&self) -> usize {
        self.takes.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.takes.is_empty()
    }

    /// Resolves the user-facing "Take N" number (oldest is 1).
    pub fn take_by_number(&self, number: usize) -> Option<TakeId> {
        if number == 0 || number > self.takes.len() {
            return None;
        }
        self.takes.get(self.takes.len() - number).map(|take| take.id)
    }

    /// Presentation summaries, most recent first.
    pub fn summaries(&self) -> Vec<TakeSummary> {
        let total = self.takes.len();
        self.takes
            .iter()
            .enumerate()
            .map(|(index, take)| take.summary(total - index, self.selected == Some(take.id)))
            .collect()
    }

    /// Number of playback handles not yet released.
    pub fn live_handles(&self) -> usize {
        self.ledger.load(Ordering::Acquire)
    }

    fn insert_selected(&mut self, take: Take) -> &Take {
        self.selected = Some(take.id);
        self.takes.insert(0, take);
        &self.takes[0]
    }

    #[track_caller]
    fn position(&self, id: TakeId) -> CoreResult<usize> {
        self.takes
            .iter()
            .position(|take| take.id == id)
            .ok_or_else(|| SessionError::UnknownTake {
                id,
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl Default for TakeStore {
    fn default() -> Self {
        Self::new()
    }
}
