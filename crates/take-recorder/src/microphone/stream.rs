use crate::microphone::CaptureBuffer;

use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use cpal::Stream;
use take_recorder_core::MediaStream;
use tracing::info;

/// A running microphone input stream.
///
/// The cpal stream is `!Send`, so this stays on the thread that opened it.
pub(crate) struct MicrophoneStream {
    stream: Option<Stream>,
    buffer: Arc<Mutex<CaptureBuffer>>,
    /// Signals the audio callback to stop writing. Set to `true` before
    /// dropping the stream so no in-flight callback writes afterwards.
    shutdown: Arc<AtomicBool>,
    sample_rate: u32,
}

impl MicrophoneStream {
    pub(crate) fn new(
        stream: Option<Stream>,
        buffer: Arc<Mutex<CaptureBuffer>>,
        shutdown: Arc<AtomicBool>,
        sample_rate: u32,
    ) -> Self {
        Self {
            stream,
            buffer,
            shutdown,
            sample_rate,
        }
    }

    pub(crate) fn buffer(&self) -> Arc<Mutex<CaptureBuffer>> {
        Arc::clone(&self.buffer)
    }

    pub(crate) fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl MediaStream for MicrophoneStream {
    fn stop_tracks(&mut self) {
        self.shutdown.store(true, Ordering::Release);

        if let Some(stream) = self.stream.take() {
            drop(stream);
            // Let any in-flight callback observe the shutdown flag.
            std::thread::sleep(Duration::from_millis(5));
            info!("Microphone stream stopped");
        }
    }

    fn live_tracks(&self) -> usize {
        usize::from(self.stream.is_some())
    }

    fn audio_samples(&self, out: &mut [f32]) -> usize {
        if self.stream.is_none() {
            return 0;
        }
        CaptureBuffer::lock(&self.buffer).copy_recent(out)
    }
}

impl Drop for MicrophoneStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}
