use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;

/// How long a new peak is held before it starts to decay.
pub const PEAK_HOLD: Duration = Duration::from_millis(100);

/// Per-frame peak decay factor.
pub const PEAK_DECAY: f32 = 0.98;

/// Levels below this are flagged as low audio.
pub const LOW_AUDIO_THRESHOLD: f32 = 10.0;

// Raw averages of speech rarely pass half scale.
const LEVEL_GAIN: f32 = 2.0;

/// One meter frame, all values on a 0-100 scale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MeterReading {
    /// Current loudness.
    pub level: f32,
    /// Held/decaying peak.
    pub peak: f32,
    /// Whether the level is below [`LOW_AUDIO_THRESHOLD`].
    pub low: bool,
}

/// Loudness meter with a decaying peak indicator.
#[derive(Debug, Clone, Default)]
pub struct AudioMeter {
    reading: MeterReading,
    last_peak_at: Option<Instant>,
}

impl AudioMeter {
    /// Creates a meter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one frame of byte-scaled frequency bins.
    pub fn update(&mut self, bins: &[u8], now: Instant) -> MeterReading {
        let level = if bins.is_empty() {
            0.0
        } else {
            let sum: u32 = bins.iter().map(|&b| u32::from(b)).sum();
            let average = sum as f32 / bins.len() as f32;
            (average / 255.0 * 100.0 * LEVEL_GAIN).min(100.0)
        };

        let mut peak = self.reading.peak;
        if level > peak {
            peak = level;
            self.last_peak_at = Some(now);
        } else {
            let held = self
                .last_peak_at
                .is_some_and(|at| now.duration_since(at) <= PEAK_HOLD);
            if !held {
                peak = level.max(peak * PEAK_DECAY);
            }
        }

        self.reading = MeterReading {
            level,
            peak,
            low: level < LOW_AUDIO_THRESHOLD,
        };

        self.reading
    }

    /// Last computed reading.
    pub fn reading(&self) -> MeterReading {
        self.reading
    }
}
