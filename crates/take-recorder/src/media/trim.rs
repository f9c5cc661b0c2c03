use crate::media::{WAV_MIME, decode_wav, encode_pcm};

use take_recorder_core::{
    Artifact, TrimCodec, TrimRange,
    takes::{Take, TrimmedArtifact},
};
use tracing::debug;

/// Re-encodes the trimmed section of a WAV take so the new payload holds
/// only the kept audio.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct WavTrimCodec;

impl TrimCodec for WavTrimCodec {
    fn trim(&self, source: &Take, range: TrimRange) -> Result<TrimmedArtifact, String> {
        let clip = decode_wav(source.artifact().payload())?;

        // A take trimmed without re-encoding still carries its source payload.
        let offset = source
            .playback_window()
            .map(|window| window.start_secs)
            .unwrap_or(0.0);

        let channels = usize::from(clip.channels.max(1));
        let frames = clip.frames();
        let to_frame = |secs: f64| -> usize {
            let frame = ((offset + secs) * f64::from(clip.sample_rate)).round();
            (frame.max(0.0) as usize).min(frames)
        };

        let first = to_frame(range.start);
        let last = to_frame(range.end).max(first);
        let kept = &clip.samples[first * channels..last * channels];

        let payload = encode_pcm(kept, clip.sample_rate, clip.channels)?;

        debug!(
            source_frames = frames,
            kept_frames = last - first,
            "WAV take trimmed"
        );

        Ok(TrimmedArtifact {
            artifact: Artifact::new(payload, WAV_MIME),
            window: None,
        })
    }
}
