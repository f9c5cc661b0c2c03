use std::{f32::consts::PI, fmt, sync::Arc};

use rustfft::{Fft, FftPlanner, num_complex::Complex};

/// FFT window length in samples.
pub const FFT_SIZE: usize = 512;

/// Number of frequency bins produced per frame.
pub const FREQUENCY_BIN_COUNT: usize = FFT_SIZE / 2;

/// Weight of the previous frame when smoothing magnitudes.
pub const SMOOTHING_TIME_CONSTANT: f32 = 0.7;

/// Magnitude mapped to byte 0.
pub const MIN_DECIBELS: f32 = -100.0;

/// Magnitude mapped to byte 255.
pub const MAX_DECIBELS: f32 = -30.0;

/// Turns time-domain audio into smoothed byte-scaled frequency bins.
///
/// Blackman-windowed FFT, magnitudes smoothed across frames, then mapped
/// linearly from [`MIN_DECIBELS`]..[`MAX_DECIBELS`] onto 0..=255.
pub struct FrequencyAnalyser {
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    smoothed: Vec<f32>,
    bins: Vec<u8>,
}

impl FrequencyAnalyser {
    /// Plans the FFT and precomputes the window.
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        let window = (0..FFT_SIZE)
            .map(|n| {
                let phase = 2.0 * PI * n as f32 / FFT_SIZE as f32;
                0.42 - 0.5 * phase.cos() + 0.08 * (2.0 * phase).cos()
            })
            .collect();

        Self {
            fft,
            window,
            buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            smoothed: vec![0.0; FREQUENCY_BIN_COUNT],
            bins: vec![0; FREQUENCY_BIN_COUNT],
        }
    }

    /// Analyses the most recent [`FFT_SIZE`] samples of `samples`.
    ///
    /// Shorter input is zero-padded at the front.
    pub fn analyse(&mut self, samples: &[f32]) -> &[u8] {
        let recent = &samples[samples.len().saturating_sub(FFT_SIZE)..];
        let padding = FFT_SIZE - recent.len();

        for (i, slot) in self.buffer.iter_mut().enumerate() {
            let sample = if i < padding { 0.0 } else { recent[i - padding] };
            *slot = Complex::new(sample * self.window[i], 0.0);
        }

        self.fft.process(&mut self.buffer);

        let range = MAX_DECIBELS - MIN_DECIBELS;
        for (k, (smoothed, byte)) in self
            .smoothed
            .iter_mut()
            .zip(self.bins.iter_mut())
            .enumerate()
        {
            let magnitude = self.buffer[k].norm() / FFT_SIZE as f32;
            *smoothed =
                SMOOTHING_TIME_CONSTANT * *smoothed + (1.0 - SMOOTHING_TIME_CONSTANT) * magnitude;

            *byte = if *smoothed > 0.0 {
                let db = 20.0 * smoothed.log10();
                (255.0 * (db - MIN_DECIBELS) / range).clamp(0.0, 255.0) as u8
            } else {
                0
            };
        }

        &self.bins
    }

    /// Forgets smoothing history.
    pub fn reset(&mut self) {
        self.smoothed.iter_mut().for_each(|value| *value = 0.0);
        self.bins.iter_mut().for_each(|value| *value = 0);
    }
}

impl Default for FrequencyAnalyser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FrequencyAnalyser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrequencyAnalyser")
            .field("fft_size", &FFT_SIZE)
            .finish()
    }
}
