//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use uuid::Uuid;

use crate::core::fetch::{FetchError, FetchedImage, ImageRequest, Thumbnail};
use crate::service::ImageService;

/// A service that never touches the network.
pub struct StubImageService;

#[async_trait]
impl ImageService for StubImageService {
    fn name(&self) -> &str {
        "stub"
    }

    async fn fetch(&self, request: &ImageRequest) -> Result<FetchedImage, FetchError> {
        Ok(sample_image(request.clone()))
    }
}

/// Creates a test App with a StubImageService and a small suggestion list.
pub fn test_app() -> crate::core::state::App {
    crate::core::state::App::new(
        Arc::new(StubImageService),
        ["grumpy", "hat", "cute", "orange"],
    )
}

/// A 4x2 checkerboard image as if it had just been fetched.
pub fn sample_image(request: ImageRequest) -> FetchedImage {
    let pixels: Vec<[u8; 3]> = (0..8)
        .map(|i| if (i % 4 + i / 4) % 2 == 0 { [255, 255, 255] } else { [0, 0, 0] })
        .collect();
    FetchedImage {
        id: Uuid::new_v4(),
        request,
        width: 640,
        height: 320,
        byte_len: 2048,
        content_type: Some("image/jpeg".to_string()),
        thumbnail: Thumbnail {
            width: 4,
            height: 2,
            pixels,
        },
        fetched_at: Local::now(),
    }
}

/// Encodes a solid-colour PNG.
pub fn png_bytes(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(width, height, Rgb(color));
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Png)
        .expect("encoding a PNG in memory cannot fail");
    out.into_inner()
}
