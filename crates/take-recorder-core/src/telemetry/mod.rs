mod analyser;
mod countdown;
mod meter;
mod timer;

pub use {
    analyser::{FFT_SIZE, FREQUENCY_BIN_COUNT, FrequencyAnalyser},
    countdown::{Countdown, DEFAULT_COUNTDOWN_SECS},
    meter::{AudioMeter, LOW_AUDIO_THRESHOLD, MeterReading, PEAK_DECAY, PEAK_HOLD},
    timer::{
        DEFAULT_MAX_DURATION_SECS, DEFAULT_WARNING_THRESHOLDS_SECS, RecordingTimer, TimerSignal,
    },
};
