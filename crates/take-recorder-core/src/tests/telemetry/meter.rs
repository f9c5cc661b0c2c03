use crate::telemetry::{AudioMeter, PEAK_DECAY};

use std::time::Duration;

use tokio::time::Instant;

/// WHAT: Level is the boosted byte average capped at 100
/// WHY: Speech rarely fills the spectrum
#[test]
fn given_bins_when_updating_then_level_boosted_and_capped() {
    // Given: A fresh meter
    let mut meter = AudioMeter::new();
    let now = Instant::now();

    // When: Feeding a quarter-scale frame, then a full-scale one
    let quarter = meter.update(&[64; 256], now);
    let full = meter.update(&[255; 256], now);

    // Then: Doubled average, capped at 100
    assert!((quarter.level - 64.0 / 255.0 * 200.0).abs() < 1e-3);
    assert_eq!(full.level, 100.0);
    assert!(!full.low);
}

/// WHAT: Quiet input is flagged low
/// WHY: Users get a "low audio" hint
#[test]
fn given_silence_when_updating_then_low_flagged() {
    // Given / When: A silent frame
    let reading = AudioMeter::new().update(&[0; 256], Instant::now());

    // Then: Zero level, low
    assert_eq!(reading.level, 0.0);
    assert!(reading.low);
}

/// WHAT: The peak holds briefly and then decays towards the level
/// WHY: A falling peak indicator is readable; a jumping one is not
#[test]
fn given_peak_when_level_drops_then_held_then_decays() {
    // Given: A full-scale peak
    let mut meter = AudioMeter::new();
    let start = Instant::now();
    meter.update(&[255; 256], start);

    // When: Silence 50ms and then 200ms later
    let held = meter.update(&[0; 256], start + Duration::from_millis(50));
    let decayed = meter.update(&[0; 256], start + Duration::from_millis(200));

    // Then: Held at 100, then one decay step
    assert_eq!(held.peak, 100.0);
    assert!((decayed.peak - 100.0 * PEAK_DECAY).abs() < 1e-3);
    assert!(decayed.peak >= decayed.level);
}
