use crate::{
    SessionError, TakeId,
    device::Artifact,
    takes::{FrameDecoder, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH, ThumbnailJob, crop_to_portrait},
};

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use image::{GenericImageView, Rgba, RgbaImage};
use uuid::Uuid;

struct RecordingDecoder {
    asked_at: Mutex<Option<Duration>>,
}

impl FrameDecoder for RecordingDecoder {
    fn decode_frame(&self, _artifact: &Artifact, at: Duration) -> Result<RgbaImage, String> {
        if let Ok(mut asked) = self.asked_at.lock() {
            *asked = Some(at);
        }
        Ok(RgbaImage::from_pixel(1280, 720, Rgba([200, 0, 0, 255])))
    }
}

struct FailingDecoder;

impl FrameDecoder for FailingDecoder {
    fn decode_frame(&self, _artifact: &Artifact, _at: Duration) -> Result<RgbaImage, String> {
        Err("no video track".to_string())
    }
}

fn job(duration: Duration) -> ThumbnailJob {
    ThumbnailJob {
        take_id: TakeId::from(Uuid::new_v4()),
        artifact: Artifact::new(Arc::<[u8]>::from(vec![0u8; 4]), "video/webm"),
        duration,
    }
}

/// WHAT: Landscape frames are centre-cropped to 9:16
/// WHY: Thumbnails match the portrait recording layout
#[test]
#[allow(clippy::unwrap_used)]
fn given_landscape_frame_when_cropping_then_portrait_aspect() {
    // Given: A 1280x720 frame
    let frame = RgbaImage::new(1280, 720);

    // When: Cropping
    let cropped = crop_to_portrait(&frame).unwrap();

    // Then: Full height, width at 9:16
    assert_eq!(cropped.dimensions(), (405, 720));
}

/// WHAT: Overly tall frames are cropped vertically
/// WHY: Aspect correction works in both directions
#[test]
#[allow(clippy::unwrap_used)]
fn given_tall_frame_when_cropping_then_height_trimmed() {
    // Given: A 720x1600 frame
    let frame = RgbaImage::new(720, 1600);

    // When: Cropping
    let cropped = crop_to_portrait(&frame).unwrap();

    // Then: Full width, height at 16:9
    assert_eq!(cropped.dimensions(), (720, 1280));
}

/// WHAT: Empty frames are rejected
/// WHY: Zero-sized crops cannot be encoded
#[test]
fn given_empty_frame_when_cropping_then_thumbnail_failed() {
    // Given / When: Cropping a 0x0 frame
    let result = crop_to_portrait(&RgbaImage::new(0, 0));

    // Then: ThumbnailFailed
    assert!(matches!(result, Err(SessionError::ThumbnailFailed { .. })));
}

/// WHAT: Rendering produces a 90x160 PNG from a frame near the start
/// WHY: The first frames are often black; 100ms in is representative
#[test]
#[allow(clippy::unwrap_used)]
fn given_long_take_when_rendering_then_png_thumbnail_from_offset_frame() {
    // Given: A five-second take
    let decoder = RecordingDecoder {
        asked_at: Mutex::new(None),
    };

    // When: Rendering
    let thumbnail = job(Duration::from_secs(5)).render(&decoder).unwrap();

    // Then: PNG of the expected size from the 100ms frame
    let decoded = image::load_from_memory(thumbnail.png()).unwrap();
    assert_eq!(decoded.dimensions(), (THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT));
    assert_eq!(
        *decoder.asked_at.lock().unwrap(),
        Some(Duration::from_millis(100))
    );
}

/// WHAT: Very short takes use their midpoint
/// WHY: The offset must stay inside the take
#[test]
#[allow(clippy::unwrap_used)]
fn given_short_take_when_rendering_then_midpoint_frame() {
    // Given: A 120ms take
    let decoder = RecordingDecoder {
        asked_at: Mutex::new(None),
    };

    // When: Rendering
    job(Duration::from_millis(120)).render(&decoder).unwrap();

    // Then: Frame requested at 60ms
    assert_eq!(
        *decoder.asked_at.lock().unwrap(),
        Some(Duration::from_millis(60))
    );
}

/// WHAT: Decoder failures become ThumbnailFailed
/// WHY: Thumbnails are best effort and classed as cosmetic
#[test]
fn given_failing_decoder_when_rendering_then_thumbnail_failed() {
    // Given / When: Rendering with a decoder that cannot decode
    let result = job(Duration::from_secs(1)).render(&FailingDecoder);

    // Then: ThumbnailFailed
    assert!(matches!(result, Err(SessionError::ThumbnailFailed { .. })));
}
