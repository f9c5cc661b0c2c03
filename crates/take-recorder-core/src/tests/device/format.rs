use crate::device::{DEFAULT_FORMATS, FormatPreference, extension_for};

/// WHAT: The first supported format in preference order wins
/// WHY: Royalty-free codecs are preferred when available
#[test]
fn given_default_preferences_when_vp8_supported_then_vp8_selected() {
    // Given: Default preferences
    let formats = FormatPreference::default();

    // When: Only vp8 and mp4 are supported
    let chosen =
        formats.select(|mime| mime == "video/webm;codecs=vp8,opus" || mime == "video/mp4");

    // Then: vp8 beats mp4
    assert_eq!(chosen, "video/webm;codecs=vp8,opus");
}

/// WHAT: With nothing supported, the last entry is used unconditionally
/// WHY: Selection must always yield a format
#[test]
fn given_nothing_supported_when_selecting_then_last_entry() {
    // Given: Default preferences
    let formats = FormatPreference::default();

    // When: The platform claims support for nothing
    let chosen = formats.select(|_| false);

    // Then: The fallback is returned
    assert_eq!(chosen, DEFAULT_FORMATS[3]);
}

/// WHAT: An empty preference list falls back to the defaults
/// WHY: Misconfiguration must not leave the recorder without a format
#[test]
fn given_empty_list_when_building_then_defaults_used() {
    // Given / When: An empty list
    let formats = FormatPreference::new(Vec::<String>::new());

    // Then: Same as the defaults
    assert_eq!(formats, FormatPreference::default());
    assert_eq!(formats.formats().len(), DEFAULT_FORMATS.len());
}

/// WHAT: Extensions come from the MIME essence, ignoring codec parameters
/// WHY: Saved files need a playable extension
#[test]
fn given_mime_types_when_mapping_extensions_then_essence_decides() {
    // Given / When / Then: Common recording types
    assert_eq!(extension_for("video/webm;codecs=vp9,opus"), "webm");
    assert_eq!(extension_for("video/mp4"), "mp4");
    assert_eq!(extension_for("audio/wav"), "wav");
    assert_eq!(extension_for("application/x-unknown"), "bin");
}
