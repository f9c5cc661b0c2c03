//! Transient notifications shown under the status line.

use std::{collections::VecDeque, time::Duration};

use take_recorder_core::{Advisory, Severity};
use tokio::time::Instant;
use tracing::debug;

/// Most toasts kept at once; the oldest is dropped first.
pub(crate) const MAX_TOASTS: usize = 5;

/// One visible advisory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Toast {
    pub(crate) id: u64,
    pub(crate) message: String,
    pub(crate) severity: Severity,
    pub(crate) expires_at: Instant,
}

/// Advisories waiting to expire, oldest first.
#[derive(Debug)]
pub(crate) struct ToastQueue {
    toasts: VecDeque<Toast>,
    lifetime: Duration,
    next_id: u64,
}

impl ToastQueue {
    pub(crate) fn new(lifetime: Duration) -> Self {
        Self {
            toasts: VecDeque::with_capacity(MAX_TOASTS),
            lifetime,
            next_id: 1,
        }
    }

    /// Shows an advisory and returns its id.
    pub(crate) fn push(&mut self, advisory: Advisory) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        self.toasts.push_back(Toast {
            id,
            message: advisory.message,
            severity: advisory.severity,
            expires_at: Instant::now() + self.lifetime,
        });

        while self.toasts.len() > MAX_TOASTS {
            self.toasts.pop_front();
        }

        id
    }

    /// Removes toasts whose lifetime ran out, returning how many went.
    pub(crate) fn expire(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        self.toasts.retain(|toast| toast.expires_at > now);
        let expired = before - self.toasts.len();

        if expired > 0 {
            debug!(expired, remaining = self.toasts.len(), "Toasts expired");
        }

        expired
    }

    /// When the next toast expires.
    pub(crate) fn next_expiry(&self) -> Option<Instant> {
        self.toasts.iter().map(|toast| toast.expires_at).min()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
