use crate::{
    takes::{PlaybackWindow, Take, TrimmedArtifact},
    trim::TrimRange,
};

/// Produces the payload for a trimmed take.
pub trait TrimCodec {
    /// Trims `source` to `range` (seconds relative to the source's declared
    /// start).
    fn trim(&self, source: &Take, range: TrimRange) -> Result<TrimmedArtifact, String>;
}

/// Relabels the take without touching the payload.
///
/// The new take shares the source bytes and carries a [`PlaybackWindow`]
/// into them, so presentation has to clamp playback to the window.
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataOnlyTrim;

impl TrimCodec for MetadataOnlyTrim {
    fn trim(&self, source: &Take, range: TrimRange) -> Result<TrimmedArtifact, String> {
        let offset = source
            .playback_window()
            .map(|window| window.start_secs)
            .unwrap_or(0.0);

        Ok(TrimmedArtifact {
            artifact: source.artifact().clone(),
            window: Some(PlaybackWindow {
                start_secs: offset + range.start,
                end_secs: offset + range.end,
            }),
        })
    }
}
