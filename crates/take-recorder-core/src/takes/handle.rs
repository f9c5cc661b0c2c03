use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tracing::debug;
use uuid::Uuid;

/// RAII playback handle for one take.
///
/// Opening a handle registers it with the store's ledger; dropping it
/// releases it. Ownership makes a double release impossible, and the
/// ledger count makes a leaked handle observable.
#[derive(Debug)]
pub struct PlaybackHandle {
    uri: String,
    ledger: Arc<AtomicUsize>,
}

impl PlaybackHandle {
    pub(crate) fn open(ledger: &Arc<AtomicUsize>) -> Self {
        ledger.fetch_add(1, Ordering::AcqRel);

        Self {
            uri: format!("take:{}", Uuid::new_v4()),
            ledger: Arc::clone(ledger),
        }
    }

    /// Address the presentation layer plays from.
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

impl Drop for PlaybackHandle {
    fn drop(&mut self) {
        self.ledger.fetch_sub(1, Ordering::AcqRel);
        debug!(uri = %self.uri, "Playback handle released");
    }
}
