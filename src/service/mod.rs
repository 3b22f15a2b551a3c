//! # Image Service
//!
//! Outbound HTTP. The core decides *what* to fetch (`ImageRequest`);
//! implementations of [`ImageService`] decide *how*.

pub mod cataas;
pub mod decode;

use async_trait::async_trait;

use crate::core::fetch::{FetchError, FetchedImage, ImageRequest};

pub use cataas::CataasService;

#[async_trait]
pub trait ImageService: Send + Sync {
    /// Returns the name of the service.
    fn name(&self) -> &str;

    /// Fetches and decodes one image. Never retries.
    async fn fetch(&self, request: &ImageRequest) -> Result<FetchedImage, FetchError>;
}
