//! Best-effort take thumbnails.
//!
//! Decoding a frame is delegated to a [`FrameDecoder`]; cropping, scaling
//! and PNG encoding happen here. Jobs are plain data so the host can run
//! them off the session's timeline and hand the result back by id.

use crate::{CoreResult, SessionError, TakeId, device::Artifact};

use std::{fmt, io::Cursor, panic::Location, time::Duration};

use error_location::ErrorLocation;
use image::{ImageFormat, RgbaImage, imageops, imageops::FilterType};
use tracing::{debug, instrument};

/// Thumbnail width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 90;

/// Thumbnail height in pixels (9:16 portrait).
pub const THUMBNAIL_HEIGHT: u32 = 160;

/// How far into the take the thumbnail frame is taken from.
pub const THUMBNAIL_FRAME_OFFSET: Duration = Duration::from_millis(100);

/// Decodes a single frame from an encoded artifact.
pub trait FrameDecoder: Send + Sync {
    /// Returns the frame nearest to `at`.
    fn decode_frame(&self, artifact: &Artifact, at: Duration) -> Result<RgbaImage, String>;
}

/// PNG-encoded portrait thumbnail.
#[derive(Clone, PartialEq, Eq)]
pub struct Thumbnail {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl Thumbnail {
    /// PNG bytes.
    pub fn png(&self) -> &[u8] {
        &self.png
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }
}

impl fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Thumbnail")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.png.len())
            .finish()
    }
}

/// Pending thumbnail work for one take.
#[derive(Debug, Clone)]
pub struct ThumbnailJob {
    /// Take the thumbnail belongs to.
    pub take_id: TakeId,
    /// Payload to decode from.
    pub artifact: Artifact,
    /// Declared duration of the take.
    pub duration: Duration,
}

impl ThumbnailJob {
    /// Decodes, crops and encodes the thumbnail.
    ///
    /// # Errors
    ///
    /// Returns `ThumbnailFailed` if any step fails.
    #[track_caller]
    #[instrument(skip(self, decoder), fields(take_id = %self.take_id))]
    pub fn render(&self, decoder: &dyn FrameDecoder) -> CoreResult<Thumbnail> {
        let at = THUMBNAIL_FRAME_OFFSET.min(self.duration / 2);

        let frame = decoder
            .decode_frame(&self.artifact, at)
            .map_err(|reason| SessionError::ThumbnailFailed {
                reason,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let portrait = crop_to_portrait(&frame)?;
        let scaled = imageops::resize(
            &portrait,
            THUMBNAIL_WIDTH,
            THUMBNAIL_HEIGHT,
            FilterType::Triangle,
        );

        let mut png = Vec::new();
        scaled
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .map_err(|e| SessionError::ThumbnailFailed {
                reason: format!("Failed to encode PNG: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        debug!(
            frame_width = frame.width(),
            frame_height = frame.height(),
            png_len = png.len(),
            "Thumbnail rendered"
        );

        Ok(Thumbnail {
            png,
            width: THUMBNAIL_WIDTH,
            height: THUMBNAIL_HEIGHT,
        })
    }
}

/// Centre-crops `frame` to a 9:16 portrait aspect.
///
/// # Errors
///
/// Returns `ThumbnailFailed` for an empty frame.
#[track_caller]
pub fn crop_to_portrait(frame: &RgbaImage) -> CoreResult<RgbaImage> {
    let (width, height) = frame.dimensions();
    if width == 0 || height == 0 {
        return Err(SessionError::ThumbnailFailed {
            reason: "decoded frame is empty".to_string(),
            location: ErrorLocation::from(Location::caller()),
        });
    }

    let (w, h) = (u64::from(width), u64::from(height));
    let (crop_w, crop_h) = if w * 16 > h * 9 {
        ((h * 9 / 16).max(1), h)
    } else {
        (w, (w * 16 / 9).clamp(1, h))
    };

    // Both crop dimensions are bounded by the frame's own u32 dimensions.
    let crop_w = crop_w as u32;
    let crop_h = crop_h as u32;
    let x = (width - crop_w) / 2;
    let y = (height - crop_h) / 2;

    Ok(imageops::crop_imm(frame, x, y, crop_w, crop_h).to_image())
}
