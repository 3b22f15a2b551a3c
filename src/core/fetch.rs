//! # Image Fetch Panel
//!
//! Request bookkeeping for the results panel: which request to issue, the
//! loading/error/empty flags, and the list of fetched images.
//!
//! ```text
//!            fetch_random() / fetch_by_tags()
//!   Idle ─────────────────────────────────────▶ Loading(gen)
//!    ▲                                              │
//!    │            resolve(gen, Ok | Err)            │
//!    └──────────── Success / Failure ◀──────────────┘
//! ```
//!
//! Each trigger bumps a generation counter. `resolve` ignores results whose
//! generation is not the latest, so a slow first request can never overwrite
//! the outcome of a later one.

use std::fmt;

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use uuid::Uuid;

use crate::core::tags::{Tag, TagsChanged, join_tags};

/// What to ask the image service for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageRequest {
    Random,
    Tagged(Vec<Tag>),
}

impl ImageRequest {
    /// Comma-joined tag list used as the path segment, `None` for random.
    pub fn path_scope(&self) -> Option<String> {
        match self {
            ImageRequest::Random => None,
            ImageRequest::Tagged(tags) => Some(join_tags(tags)),
        }
    }

    pub fn label(&self) -> String {
        match self {
            ImageRequest::Random => "random".to_string(),
            ImageRequest::Tagged(tags) => join_tags(tags),
        }
    }
}

/// A request handed to the I/O layer, stamped with the generation that
/// issued it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub request: ImageRequest,
}

/// Why a fetch failed. All variants are terminal for that request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Server answered with a non-2xx status.
    HttpStatus(u16),
    /// Body arrived but isn't a readable image.
    Decode(String),
    /// Request never completed (DNS, refused connection, timeout...).
    /// Carries a short identifier such as `connect`.
    Transport(String),
}

impl FetchError {
    /// Code shown to the user and used for message selection.
    pub fn code(&self) -> String {
        match self {
            FetchError::HttpStatus(status) => status.to_string(),
            FetchError::Decode(_) => "decode".to_string(),
            FetchError::Transport(id) => id.clone(),
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            FetchError::HttpStatus(404) => "No cats found for these tags.".to_string(),
            FetchError::Decode(_) => "Failed to load the image.".to_string(),
            other => format!("Something went wrong (error: {}). Try again.", other.code()),
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::HttpStatus(status) => write!(f, "HTTP status {status}"),
            FetchError::Decode(msg) => write!(f, "image decode error: {msg}"),
            FetchError::Transport(id) => write!(f, "transport error: {id}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Downscaled RGB preview, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 3]>,
}

impl Thumbnail {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }
}

/// A successfully decoded image.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub id: Uuid,
    pub request: ImageRequest,
    pub width: u32,
    pub height: u32,
    pub byte_len: usize,
    pub content_type: Option<String>,
    pub thumbnail: Thumbnail,
    pub fetched_at: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Loading,
    Success(Uuid),
    Failure(FetchError),
}

#[derive(Debug, Default)]
pub struct ImageFetchPanel {
    tags: Vec<Tag>,
    results: Vec<FetchedImage>,
    /// `None` while idle.
    outcome: Option<FetchOutcome>,
    generation: u64,
    scroll_requested: bool,
}

impl ImageFetchPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a private copy of the latest tag list. Never issues a request.
    pub fn on_tags_changed(&mut self, msg: TagsChanged) {
        debug!("Panel tags updated: {:?}", msg.tags);
        self.tags = msg.tags;
    }

    pub fn fetch_random(&mut self) -> FetchTicket {
        self.begin(ImageRequest::Random)
    }

    /// Same as [`fetch_random`](Self::fetch_random) when no tags are selected.
    pub fn fetch_by_tags(&mut self) -> FetchTicket {
        if self.tags.is_empty() {
            return self.fetch_random();
        }
        self.begin(ImageRequest::Tagged(self.tags.clone()))
    }

    fn begin(&mut self, request: ImageRequest) -> FetchTicket {
        self.generation += 1;
        self.outcome = Some(FetchOutcome::Loading);
        info!(
            "Fetch #{} started: {}",
            self.generation,
            request.label()
        );
        FetchTicket {
            generation: self.generation,
            request,
        }
    }

    /// Applies a finished request. Returns false if it was stale and dropped.
    pub fn resolve(&mut self, generation: u64, result: Result<FetchedImage, FetchError>) -> bool {
        if generation != self.generation || !self.is_loading() {
            debug!(
                "Dropping stale fetch #{} (current #{})",
                generation, self.generation
            );
            return false;
        }

        // Loader goes off before the outcome is evaluated.
        self.outcome = None;

        match result {
            Ok(image) => {
                info!(
                    "Fetch #{} succeeded: {}x{}, {} bytes",
                    generation, image.width, image.height, image.byte_len
                );
                self.outcome = Some(FetchOutcome::Success(image.id));
                self.results.push(image);
                self.scroll_requested = true;
            }
            Err(e) => {
                warn!("Fetch #{} failed: {}", generation, e);
                self.outcome = Some(FetchOutcome::Failure(e));
            }
        }
        true
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.outcome, Some(FetchOutcome::Loading))
    }

    pub fn active_error(&self) -> Option<&FetchError> {
        match &self.outcome {
            Some(FetchOutcome::Failure(e)) => Some(e),
            _ => None,
        }
    }

    /// True only when there is nothing at all to show.
    pub fn show_empty_message(&self) -> bool {
        self.results.is_empty() && self.active_error().is_none()
    }

    pub fn outcome(&self) -> Option<&FetchOutcome> {
        self.outcome.as_ref()
    }

    pub fn results(&self) -> &[FetchedImage] {
        &self.results
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns true once after each successful fetch.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::sample_image;

    fn tags(list: &[&str]) -> Vec<Tag> {
        list.iter().filter_map(|s| Tag::parse(s)).collect()
    }

    #[test]
    fn test_initial_state_is_idle_and_empty() {
        let panel = ImageFetchPanel::new();
        assert!(panel.outcome().is_none());
        assert!(!panel.is_loading());
        assert!(panel.active_error().is_none());
        assert!(panel.show_empty_message());
    }

    #[test]
    fn test_tags_changed_does_not_start_request() {
        let mut panel = ImageFetchPanel::new();
        panel.on_tags_changed(TagsChanged { tags: tags(&["hat"]) });
        assert!(panel.outcome().is_none());
        assert_eq!(panel.generation(), 0);
        assert_eq!(panel.tags(), tags(&["hat"]).as_slice());
    }

    #[test]
    fn test_search_without_tags_is_random() {
        let mut random = ImageFetchPanel::new();
        let mut search = ImageFetchPanel::new();
        assert_eq!(random.fetch_random(), search.fetch_by_tags());
        assert_eq!(search.fetch_by_tags().request, ImageRequest::Random);
    }

    #[test]
    fn test_search_joins_tags_in_order() {
        let mut panel = ImageFetchPanel::new();
        panel.on_tags_changed(TagsChanged { tags: tags(&["grumpy", "hat"]) });
        let ticket = panel.fetch_by_tags();
        assert_eq!(ticket.request.path_scope().as_deref(), Some("grumpy,hat"));
        assert!(panel.is_loading());
    }

    #[test]
    fn test_ticket_holds_copy_of_tags() {
        let mut panel = ImageFetchPanel::new();
        panel.on_tags_changed(TagsChanged { tags: tags(&["grumpy"]) });
        let ticket = panel.fetch_by_tags();
        panel.on_tags_changed(TagsChanged { tags: tags(&["hat"]) });
        assert_eq!(ticket.request, ImageRequest::Tagged(tags(&["grumpy"])));
    }

    #[test]
    fn test_success_appends_one_result() {
        let mut panel = ImageFetchPanel::new();
        let ticket = panel.fetch_random();
        let image = sample_image(ImageRequest::Random);
        let id = image.id;

        assert!(panel.resolve(ticket.generation, Ok(image)));
        assert_eq!(panel.results().len(), 1);
        assert!(!panel.is_loading());
        assert_eq!(panel.outcome(), Some(&FetchOutcome::Success(id)));
        assert!(!panel.show_empty_message());
        assert!(panel.take_scroll_request());
        assert!(!panel.take_scroll_request());

        let ticket = panel.fetch_random();
        panel.resolve(ticket.generation, Ok(sample_image(ImageRequest::Random)));
        assert_eq!(panel.results().len(), 2);
    }

    #[test]
    fn test_not_found_shows_error_and_suppresses_empty() {
        let mut panel = ImageFetchPanel::new();
        panel.on_tags_changed(TagsChanged { tags: tags(&["nope"]) });
        let ticket = panel.fetch_by_tags();

        assert!(panel.resolve(ticket.generation, Err(FetchError::HttpStatus(404))));
        assert!(!panel.is_loading());
        let err = panel.active_error().unwrap();
        assert_eq!(err.user_message(), "No cats found for these tags.");
        assert!(!panel.show_empty_message());
        assert!(panel.results().is_empty());
    }

    #[test]
    fn test_new_trigger_clears_error() {
        let mut panel = ImageFetchPanel::new();
        let ticket = panel.fetch_random();
        panel.resolve(ticket.generation, Err(FetchError::Transport("connect".into())));
        assert!(panel.active_error().is_some());

        panel.fetch_random();
        assert!(panel.active_error().is_none());
        assert!(panel.is_loading());
        assert!(panel.show_empty_message());
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut panel = ImageFetchPanel::new();
        let first = panel.fetch_random();
        let second = panel.fetch_random();

        assert!(!panel.resolve(first.generation, Ok(sample_image(ImageRequest::Random))));
        assert!(panel.is_loading());
        assert!(panel.results().is_empty());

        assert!(panel.resolve(second.generation, Err(FetchError::HttpStatus(500))));
        assert!(!panel.resolve(second.generation, Err(FetchError::HttpStatus(500))));
        assert_eq!(panel.active_error(), Some(&FetchError::HttpStatus(500)));
    }

    #[test]
    fn test_error_message_branches_on_code() {
        assert_eq!(
            FetchError::Decode("bad png".into()).user_message(),
            "Failed to load the image."
        );
        assert_eq!(FetchError::HttpStatus(503).code(), "503");
        assert!(FetchError::HttpStatus(503).user_message().contains("503"));
        assert!(FetchError::Transport("connect".into()).user_message().contains("connect"));
    }

    #[test]
    fn test_thumbnail_pixel_bounds() {
        let thumb = Thumbnail {
            width: 2,
            height: 1,
            pixels: vec![[1, 2, 3], [4, 5, 6]],
        };
        assert_eq!(thumb.pixel(1, 0), Some([4, 5, 6]));
        assert_eq!(thumb.pixel(2, 0), None);
        assert_eq!(thumb.pixel(0, 1), None);
    }
}
