//! In-memory 16-bit PCM WAV encoding.

use std::io::Cursor;

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};

/// MIME type of everything this module produces.
pub(crate) const WAV_MIME: &str = "audio/wav";

/// Decoded mono or interleaved PCM.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct WavClip {
    pub(crate) samples: Vec<i16>,
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

impl WavClip {
    /// Number of frames (samples per channel).
    pub(crate) fn frames(&self) -> usize {
        self.samples.len() / usize::from(self.channels.max(1))
    }

    /// Length in seconds.
    pub(crate) fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frames() as f64 / f64::from(self.sample_rate)
    }
}

/// Encodes float samples in `[-1.0, 1.0]` as 16-bit PCM.
pub(crate) fn encode_wav(
    samples: &[f32],
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<u8>, String> {
    let pcm: Vec<i16> = samples
        .iter()
        .map(|sample| (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16)
        .collect();

    encode_pcm(&pcm, sample_rate, channels)
}

/// Encodes 16-bit PCM samples.
pub(crate) fn encode_pcm(
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> Result<Vec<u8>, String> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = WavWriter::new(&mut cursor, spec)
            .map_err(|e| format!("Failed to create WAV writer: {}", e))?;
        for &sample in samples {
            writer
                .write_sample(sample)
                .map_err(|e| format!("Failed to write WAV sample: {}", e))?;
        }
        writer
            .finalize()
            .map_err(|e| format!("Failed to finalize WAV: {}", e))?;
    }

    Ok(cursor.into_inner())
}

/// Decodes a 16-bit PCM WAV payload.
pub(crate) fn decode_wav(bytes: &[u8]) -> Result<WavClip, String> {
    let reader =
        WavReader::new(Cursor::new(bytes)).map_err(|e| format!("Failed to read WAV: {}", e))?;
    let spec = reader.spec();

    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(format!(
            "Unsupported WAV format: {:?} {} bit",
            spec.sample_format, spec.bits_per_sample
        ));
    }

    let samples = reader
        .into_samples::<i16>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("Failed to decode WAV samples: {}", e))?;

    Ok(WavClip {
        samples,
        sample_rate: spec.sample_rate,
        channels: spec.channels,
    })
}
