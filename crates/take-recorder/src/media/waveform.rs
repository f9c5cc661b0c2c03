use crate::media::decode_wav;

use std::time::Duration;

use image::{Rgba, RgbaImage};
use take_recorder_core::{Artifact, FrameDecoder};

const WAVEFORM_WIDTH: u32 = 320;
const WAVEFORM_HEIGHT: u32 = 180;

const BACKGROUND: Rgba<u8> = Rgba([24, 24, 32, 255]);
const ENVELOPE: Rgba<u8> = Rgba([96, 200, 140, 255]);
const PLAYHEAD: Rgba<u8> = Rgba([240, 80, 80, 255]);

/// Stands in for a video frame: draws the amplitude envelope of a WAV take
/// with a marker at the requested position.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WaveformFrameDecoder;

impl FrameDecoder for WaveformFrameDecoder {
    fn decode_frame(&self, artifact: &Artifact, at: Duration) -> Result<RgbaImage, String> {
        let clip = decode_wav(artifact.payload())?;
        if clip.samples.is_empty() {
            return Err("take contains no audio".to_string());
        }

        let mut frame = RgbaImage::from_pixel(WAVEFORM_WIDTH, WAVEFORM_HEIGHT, BACKGROUND);
        let mid = WAVEFORM_HEIGHT / 2;
        let columns = WAVEFORM_WIDTH as usize;
        let per_column = clip.samples.len().div_ceil(columns).max(1);

        for (x, column) in clip.samples.chunks(per_column).enumerate().take(columns) {
            let peak = column
                .iter()
                .map(|sample| sample.unsigned_abs())
                .max()
                .unwrap_or(0);
            let half = (u32::from(peak) * mid) / u32::from(i16::MAX.unsigned_abs());
            let top = mid.saturating_sub(half);
            let bottom = (mid + half).min(WAVEFORM_HEIGHT - 1);
            for y in top..=bottom {
                frame.put_pixel(x as u32, y, ENVELOPE);
            }
        }

        let duration = clip.duration_secs();
        if duration > 0.0 {
            let ratio = (at.as_secs_f64() / duration).clamp(0.0, 1.0);
            let x = ((ratio * f64::from(WAVEFORM_WIDTH - 1)) as u32).min(WAVEFORM_WIDTH - 1);
            for y in 0..WAVEFORM_HEIGHT {
                frame.put_pixel(x, y, PLAYHEAD);
            }
        }

        Ok(frame)
    }
}
