use crate::{
    media::{WAV_MIME, encode_wav},
    microphone::CaptureBuffer,
};

use std::sync::{Arc, Mutex};

use take_recorder_core::{MediaRecorder, RecorderFailure};
use tracing::{debug, info, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecorderPhase {
    Idle,
    Recording,
    Paused,
    Stopped,
}

/// Encodes everything the microphone heard between start and stop as one
/// mono WAV chunk.
pub(crate) struct WavRecorder {
    buffer: Arc<Mutex<CaptureBuffer>>,
    sample_rate: u32,
    /// Most samples one recording may hold.
    capacity: usize,
    phase: RecorderPhase,
    chunks: Vec<Vec<u8>>,
}

impl WavRecorder {
    pub(crate) fn new(
        buffer: Arc<Mutex<CaptureBuffer>>,
        sample_rate: u32,
        capacity: usize,
    ) -> Self {
        Self {
            buffer,
            sample_rate,
            capacity,
            phase: RecorderPhase::Idle,
            chunks: Vec::new(),
        }
    }

    fn expect_phase(&self, phase: RecorderPhase, action: &str) -> Result<(), RecorderFailure> {
        if self.phase != phase {
            return Err(RecorderFailure::Failed(format!(
                "cannot {} while {:?}",
                action, self.phase
            )));
        }
        Ok(())
    }
}

impl MediaRecorder for WavRecorder {
    #[instrument(skip(self))]
    fn start(&mut self) -> Result<(), RecorderFailure> {
        self.expect_phase(RecorderPhase::Idle, "start")?;

        CaptureBuffer::lock(&self.buffer).start_recording(self.capacity);
        self.phase = RecorderPhase::Recording;

        info!(
            sample_rate = self.sample_rate,
            capacity = self.capacity,
            mime = WAV_MIME,
            "WAV recorder started"
        );

        Ok(())
    }

    fn pause(&mut self) -> Result<(), RecorderFailure> {
        self.expect_phase(RecorderPhase::Recording, "pause")?;
        CaptureBuffer::lock(&self.buffer).set_capturing(false);
        self.phase = RecorderPhase::Paused;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), RecorderFailure> {
        self.expect_phase(RecorderPhase::Paused, "resume")?;
        CaptureBuffer::lock(&self.buffer).set_capturing(true);
        self.phase = RecorderPhase::Recording;
        Ok(())
    }

    #[instrument(skip(self))]
    fn stop(&mut self) -> Result<(), RecorderFailure> {
        if !matches!(self.phase, RecorderPhase::Recording | RecorderPhase::Paused) {
            return Err(RecorderFailure::Failed(format!(
                "cannot stop while {:?}",
                self.phase
            )));
        }
        self.phase = RecorderPhase::Stopped;

        let samples = CaptureBuffer::lock(&self.buffer).finish_recording();
        debug!(sample_count = samples.len(), "Encoding captured audio");

        let wav = encode_wav(&samples, self.sample_rate, 1).map_err(RecorderFailure::Failed)?;
        self.chunks.push(wav);

        info!("WAV recorder stopped");

        Ok(())
    }

    fn take_chunks(&mut self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.chunks)
    }

    fn take_error(&mut self) -> Option<RecorderFailure> {
        CaptureBuffer::lock(&self.buffer)
            .take_error()
            .map(RecorderFailure::Failed)
    }
}
