use std::{
    collections::VecDeque,
    sync::{Arc, Mutex, MutexGuard},
};

use take_recorder_core::telemetry::FFT_SIZE;
use tracing::{error, warn};

/// Recent samples kept for the meter, a few analyser windows deep.
const RECENT_SAMPLES: usize = FFT_SIZE * 4;

/// Audio allowed past the time limit before the buffer counts as full.
///
/// The limit is enforced by the session's wall clock, which lags the audio
/// callback by up to one clock tick.
const RECORDING_GRACE_SECS: u64 = 2;

/// Mono samples one recording may hold at `sample_rate` under a
/// `max_duration_secs` time limit.
pub(crate) fn recording_capacity(sample_rate: u32, max_duration_secs: u32) -> usize {
    let secs = u64::from(max_duration_secs) + RECORDING_GRACE_SECS;
    usize::try_from(u64::from(sample_rate) * secs).unwrap_or(usize::MAX)
}

/// State shared between the audio callback and the session thread.
#[derive(Debug, Default)]
pub(crate) struct CaptureBuffer {
    recent: VecDeque<f32>,
    recording: Vec<f32>,
    /// Samples the current recording may hold before it is cut off.
    recording_limit: usize,
    truncated: bool,
    capturing: bool,
    error: Option<String>,
}

impl CaptureBuffer {
    pub(crate) fn shared() -> Arc<Mutex<Self>> {
        Arc::new(Mutex::new(Self {
            recent: VecDeque::with_capacity(RECENT_SAMPLES),
            ..Self::default()
        }))
    }

    /// Locks the buffer, recovering from poison.
    ///
    /// A poisoned mutex means a previous holder panicked, but the sample
    /// data is still valid and usable.
    pub(crate) fn lock(shared: &Mutex<Self>) -> MutexGuard<'_, Self> {
        shared.lock().unwrap_or_else(|e| {
            error!("Capture buffer lock poisoned, recovering: {}", e);
            e.into_inner()
        })
    }

    /// Appends one callback's worth of interleaved samples, downmixed to
    /// mono.
    pub(crate) fn push_interleaved(&mut self, data: &[f32], channels: usize) {
        let channels = channels.max(1);
        for frame in data.chunks(channels) {
            let mono = frame.iter().sum::<f32>() / frame.len() as f32;

            self.recent.push_back(mono);
            if !self.capturing {
                continue;
            }
            if self.recording.len() < self.recording_limit {
                self.recording.push(mono);
            } else if !self.truncated {
                self.truncated = true;
                warn!(limit = self.recording_limit, "Recording buffer full");
                self.record_error(format!(
                    "recording buffer full after {} samples",
                    self.recording_limit
                ));
            }
        }

        // Ring buffer: O(1) amortized drop of oldest samples via VecDeque
        while self.recent.len() > RECENT_SAMPLES {
            self.recent.pop_front();
        }
    }

    /// Copies the newest samples into the head of `out`, oldest first.
    ///
    /// Returns how many leading slots were written.
    pub(crate) fn copy_recent(&self, out: &mut [f32]) -> usize {
        let count = out.len().min(self.recent.len());
        let skip = self.recent.len() - count;
        for (slot, sample) in out.iter_mut().zip(self.recent.iter().skip(skip)) {
            *slot = *sample;
        }
        count
    }

    /// Starts a fresh recording holding at most `limit` samples.
    pub(crate) fn start_recording(&mut self, limit: usize) {
        self.recording.clear();
        self.recording_limit = limit;
        self.truncated = false;
        self.error = None;
        self.capturing = true;
    }

    pub(crate) fn set_capturing(&mut self, capturing: bool) {
        self.capturing = capturing;
    }

    /// Ends the recording and hands over everything captured.
    pub(crate) fn finish_recording(&mut self) -> Vec<f32> {
        self.capturing = false;
        std::mem::take(&mut self.recording)
    }

    pub(crate) fn record_error(&mut self, reason: String) {
        self.error.get_or_insert(reason);
    }

    pub(crate) fn take_error(&mut self) -> Option<String> {
        self.error.take()
    }
}
