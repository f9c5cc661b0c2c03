use crate::telemetry::{FREQUENCY_BIN_COUNT, FrequencyAnalyser};

use std::f32::consts::PI;

/// WHAT: Silence produces all-zero bins
/// WHY: The meter must read zero without input
#[test]
fn given_silence_when_analysing_then_all_bins_zero() {
    // Given: An analyser and silence
    let mut analyser = FrequencyAnalyser::new();
    let silence = vec![0.0f32; 512];

    // When: Analysing
    let bins = analyser.analyse(&silence);

    // Then: One byte per bin, all zero
    assert_eq!(bins.len(), FREQUENCY_BIN_COUNT);
    assert!(bins.iter().all(|&b| b == 0));
}

/// WHAT: A loud tone saturates the bin it falls in
/// WHY: Byte scaling tops out at -30 dB
#[test]
fn given_loud_tone_when_analysing_then_its_bin_saturates() {
    // Given: A full-scale tone centred on bin 32
    let mut analyser = FrequencyAnalyser::new();
    let tone: Vec<f32> = (0..512)
        .map(|n| (2.0 * PI * 32.0 * n as f32 / 512.0).sin())
        .collect();

    // When: Analysing
    let bins = analyser.analyse(&tone).to_vec();

    // Then: Bin 32 is at full scale, distant bins are quiet
    assert_eq!(bins[32], 255);
    assert!(bins[200] < bins[32]);
}

/// WHAT: Short input is zero-padded rather than rejected
/// WHY: Streams may deliver fewer samples than the FFT window
#[test]
fn given_short_input_when_analysing_then_still_produces_bins() {
    // Given: Only 10 samples
    let mut analyser = FrequencyAnalyser::new();

    // When: Analysing
    let bins = analyser.analyse(&[0.25; 10]);

    // Then: Full-length output
    assert_eq!(bins.len(), FREQUENCY_BIN_COUNT);
}
