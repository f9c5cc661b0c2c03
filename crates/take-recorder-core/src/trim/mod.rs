mod codec;
mod editor;

pub use {
    codec::{MetadataOnlyTrim, TrimCodec},
    editor::{DEFAULT_MIN_SEPARATION_SECS, TrimEditor, TrimRange},
};
