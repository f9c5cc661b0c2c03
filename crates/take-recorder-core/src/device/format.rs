use tracing::debug;

/// Default preference order: royalty-free pairing first, MP4 last.
pub const DEFAULT_FORMATS: [&str; 4] = [
    "video/webm;codecs=vp9,opus",
    "video/webm;codecs=vp8,opus",
    "video/webm",
    "video/mp4",
];

/// Ordered list of recording MIME types.
///
/// The last entry is used when nothing earlier is supported, so selection
/// always yields a format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatPreference {
    formats: Vec<String>,
}

impl FormatPreference {
    /// Builds a preference list, falling back to [`DEFAULT_FORMATS`] when
    /// `formats` is empty.
    pub fn new<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let formats: Vec<String> = formats.into_iter().map(Into::into).collect();
        if formats.is_empty() {
            return Self::default();
        }
        Self { formats }
    }

    /// Picks the first format accepted by `supported`, or the last one.
    pub fn select(&self, supported: impl Fn(&str) -> bool) -> String {
        let chosen = self
            .formats
            .iter()
            .find(|mime| supported(mime))
            .or_else(|| self.formats.last())
            .cloned()
            .unwrap_or_else(|| DEFAULT_FORMATS[DEFAULT_FORMATS.len() - 1].to_string());

        debug!(mime = %chosen, "Recording format selected");

        chosen
    }

    /// The formats in preference order.
    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Default for FormatPreference {
    fn default() -> Self {
        Self::new(DEFAULT_FORMATS)
    }
}

/// File extension for a recording MIME type.
pub fn extension_for(mime: &str) -> &'static str {
    let essence = mime.split(';').next().unwrap_or(mime).trim();
    match essence {
        "video/webm" | "audio/webm" => "webm",
        "video/mp4" | "audio/mp4" => "mp4",
        "audio/wav" | "audio/wave" | "audio/x-wav" => "wav",
        "audio/ogg" | "video/ogg" => "ogg",
        _ => "bin",
    }
}
