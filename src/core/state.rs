//! # Application State
//!
//! Core business state for cattag. Domain logic only, no ratatui types.
//! Presentation state (focus, scroll offsets, input buffer) lives in `tui`.
//!
//! ```text
//! App
//! ├── service: Arc<dyn ImageService>  // where images come from
//! ├── selector: TagSelector           // suggestions + selected tags
//! ├── panel: ImageFetchPanel          // request state + results
//! └── status_message: String          // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;

use crate::core::config::ResolvedConfig;
use crate::core::fetch::ImageFetchPanel;
use crate::core::tags::TagSelector;
use crate::service::ImageService;

pub struct App {
    pub service: Arc<dyn ImageService>,
    pub selector: TagSelector,
    pub panel: ImageFetchPanel,
    pub status_message: String,
}

impl App {
    pub fn new<I, S>(service: Arc<dyn ImageService>, suggestions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            service,
            selector: TagSelector::new(suggestions),
            panel: ImageFetchPanel::new(),
            status_message: String::from("Pick some tags, then fetch a cat."),
        }
    }

    pub fn from_config(service: Arc<dyn ImageService>, config: &ResolvedConfig) -> Self {
        Self::new(service, config.suggestions.iter().cloned())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert!(app.selector.is_selection_empty());
        assert!(app.panel.show_empty_message());
        assert_eq!(app.service.name(), "stub");
        assert!(!app.status_message.is_empty());
    }
}
