//! Turns a response body into a [`FetchedImage`].
//!
//! Called from a blocking thread (`spawn_blocking`) by the service, so the
//! UI thread only ever sees the small RGB thumbnail, never the full-size
//! image.

use chrono::Local;
use image::imageops::FilterType;
use log::{debug, warn};
use uuid::Uuid;

use crate::core::fetch::{FetchError, FetchedImage, ImageRequest, Thumbnail};

/// Thumbnail bounds in pixels. Rendered with half-blocks, so this is
/// `THUMB_MAX_WIDTH` columns by `THUMB_MAX_HEIGHT / 2` rows.
pub const THUMB_MAX_WIDTH: u32 = 48;
pub const THUMB_MAX_HEIGHT: u32 = 32;

pub fn decode_image(
    bytes: &[u8],
    content_type: Option<String>,
    request: ImageRequest,
) -> Result<FetchedImage, FetchError> {
    if bytes.is_empty() {
        warn!("Empty image body");
        return Err(FetchError::Decode("empty body".to_string()));
    }

    let decoded = image::load_from_memory(bytes).map_err(|e| {
        warn!("Image decode failed: {}", e);
        FetchError::Decode(e.to_string())
    })?;

    let (width, height) = (decoded.width(), decoded.height());
    let (thumb_w, thumb_h) = thumbnail_size(width, height, THUMB_MAX_WIDTH, THUMB_MAX_HEIGHT);
    let rgb = decoded
        .resize_exact(thumb_w, thumb_h, FilterType::Triangle)
        .to_rgb8();
    debug!(
        "Decoded {}x{} image, thumbnail {}x{}",
        width, height, thumb_w, thumb_h
    );

    Ok(FetchedImage {
        id: Uuid::new_v4(),
        request,
        width,
        height,
        byte_len: bytes.len(),
        content_type,
        thumbnail: Thumbnail {
            width: thumb_w,
            height: thumb_h,
            pixels: rgb.pixels().map(|p| p.0).collect(),
        },
        fetched_at: Local::now(),
    })
}

/// Largest size fitting in `max_w` x `max_h` with the source aspect ratio.
/// Never upscales and never returns a zero dimension.
pub fn thumbnail_size(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (1, 1);
    }
    let scale = f64::min(
        max_w as f64 / width as f64,
        max_h as f64 / height as f64,
    )
    .min(1.0);
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_w.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_h.max(1));
    (w, h)
}
