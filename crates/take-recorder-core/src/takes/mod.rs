mod handle;
mod store;
mod take;
mod thumbnail;

pub use {
    handle::PlaybackHandle,
    store::{Deletion, TakeStore, TrimmedArtifact},
    take::{PlaybackWindow, Take, TakeId, TakeSummary},
    thumbnail::{
        FrameDecoder, THUMBNAIL_FRAME_OFFSET, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH, Thumbnail,
        ThumbnailJob, crop_to_portrait,
    },
};
