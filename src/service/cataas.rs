//! cataas.com client.
//!
//! - `GET <base>/cat?type=<size>` for a random image
//! - `GET <base>/cat/<tag,tag>?type=<size>` for an image matching every tag
//!
//! Success is a binary image body; any non-2xx status is a failure.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

use crate::ImageSize;
use crate::core::fetch::{FetchError, FetchedImage, ImageRequest};
use crate::service::ImageService;
use crate::service::decode::decode_image;

pub struct CataasService {
    base_url: Url,
    size: ImageSize,
    client: reqwest::Client,
}

impl CataasService {
    pub fn new(base_url: Url, size: ImageSize) -> Self {
        Self {
            base_url,
            size,
            client: reqwest::Client::new(),
        }
    }

    /// Builds the request URL, keeping any path prefix of the base URL.
    pub fn request_url(&self, request: &ImageRequest) -> Url {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);

        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("cat");
            if let Some(scope) = request.path_scope() {
                segments.push(&scope);
            }
        }

        url.query_pairs_mut()
            .append_pair("type", self.size.as_query());
        url
    }
}

/// Short identifier for a reqwest failure, shown as the error code.
fn transport_code(e: &reqwest::Error) -> String {
    let id = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_redirect() {
        "redirect"
    } else if e.is_body() {
        "body"
    } else if e.is_decode() {
        "decode"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    };
    id.to_string()
}

#[async_trait]
impl ImageService for CataasService {
    fn name(&self) -> &str {
        "cataas"
    }

    async fn fetch(&self, request: &ImageRequest) -> Result<FetchedImage, FetchError> {
        let url = self.request_url(request);
        info!("GET {}", url);

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!("Request failed: {}", e);
            FetchError::Transport(transport_code(&e))
        })?;

        let status = response.status();
        debug!("cataas response status: {}", status);

        if !status.is_success() {
            warn!("cataas returned HTTP {}", status.as_u16());
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await.map_err(|e| {
            warn!("Reading response body failed: {}", e);
            FetchError::Transport(transport_code(&e))
        })?;
        debug!("Received {} bytes ({:?})", bytes.len(), content_type);

        // Decoding and resizing are CPU-bound; keep them off the async workers
        let request = request.clone();
        tokio::task::spawn_blocking(move || decode_image(&bytes, content_type, request))
            .await
            .map_err(|e| {
                warn!("Decode task failed: {}", e);
                FetchError::Decode(format!("decode task failed: {e}"))
            })?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::tags::Tag;

    fn service(base: &str) -> CataasService {
        CataasService::new(Url::parse(base).unwrap(), ImageSize::Medium)
    }

    #[test]
    fn test_random_url() {
        let url = service("https://cataas.com").request_url(&ImageRequest::Random);
        assert_eq!(url.as_str(), "https://cataas.com/cat?type=medium");
    }

    #[test]
    fn test_tagged_url_keeps_commas() {
        let tags = vec![Tag::parse("grumpy").unwrap(), Tag::parse("hat").unwrap()];
        let url = service("https://cataas.com/").request_url(&ImageRequest::Tagged(tags));
        assert_eq!(url.path(), "/cat/grumpy,hat");
        assert_eq!(url.query(), Some("type=medium"));
    }

    #[test]
    fn test_base_path_prefix_is_preserved() {
        let url = service("http://localhost:8080/proxy/").request_url(&ImageRequest::Random);
        assert_eq!(url.as_str(), "http://localhost:8080/proxy/cat?type=medium");
    }

    #[test]
    fn test_size_goes_into_query() {
        let svc = CataasService::new(Url::parse("https://cataas.com").unwrap(), ImageSize::Square);
        let url = svc.request_url(&ImageRequest::Random);
        assert_eq!(url.query(), Some("type=square"));
    }

    #[test]
    fn test_tag_with_space_is_escaped() {
        let tags = vec![Tag::parse("very cute").unwrap()];
        let url = service("https://cataas.com").request_url(&ImageRequest::Tagged(tags));
        assert_eq!(url.path(), "/cat/very%20cute");
    }
}
