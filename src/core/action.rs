//! # Actions
//!
//! Everything that can happen in cattag becomes an `Action`.
//! User picks a suggestion? That's `Action::SelectSuggestion(index)`.
//! A background fetch finishes? That's `Action::FetchCompleted { .. }`.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! `update()` is also the only bridge between the tag selector and the fetch
//! panel: whenever the selector reports a `TagsChanged`, the same call hands
//! it to the panel. No I/O happens here; requests are returned as
//! `Effect::SpawnFetch` for the adapter to run.

use log::debug;

use crate::core::fetch::{FetchError, FetchTicket, FetchedImage};
use crate::core::state::App;
use crate::core::tags::{FocusTarget, Tag, TagsChanged};

#[derive(Debug)]
pub enum Action {
    /// Input text edited.
    QueryChanged(String),
    /// Keyboard or mouse focus moved between regions.
    FocusChanged {
        from: Option<FocusTarget>,
        to: Option<FocusTarget>,
    },
    /// Suggestion at this index (into the full list) activated.
    SelectSuggestion(usize),
    /// Chip removed.
    RemoveTag(Tag),
    /// Selection message delivered to the panel.
    TagsChanged(TagsChanged),
    FetchRandom,
    FetchByTags,
    FetchCompleted {
        generation: u64,
        result: Result<FetchedImage, FetchError>,
    },
    Quit,
}

/// Side effect requested by `update()`, carried out by the adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    SpawnFetch(FetchTicket),
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::QueryChanged(query) => {
            app.selector.filter_suggestions(&query);
            Effect::None
        }
        Action::FocusChanged { from, to } => {
            app.selector.on_focus_change(from, to);
            Effect::None
        }
        Action::SelectSuggestion(index) => match app.selector.select_suggestion(index) {
            Some(msg) => update(app, Action::TagsChanged(msg)),
            None => Effect::None,
        },
        Action::RemoveTag(tag) => match app.selector.remove_tag(&tag) {
            Some(msg) => update(app, Action::TagsChanged(msg)),
            None => Effect::None,
        },
        Action::TagsChanged(msg) => {
            app.status_message = if msg.tags.is_empty() {
                "No tags selected".to_string()
            } else {
                format!("Tags: {}", app.selector.selected_tags().joined())
            };
            app.panel.on_tags_changed(msg);
            Effect::None
        }
        Action::FetchRandom => {
            let ticket = app.panel.fetch_random();
            app.status_message = "Fetching a random cat...".to_string();
            Effect::SpawnFetch(ticket)
        }
        Action::FetchByTags => {
            let ticket = app.panel.fetch_by_tags();
            app.status_message = format!("Fetching: {}", ticket.request.label());
            Effect::SpawnFetch(ticket)
        }
        Action::FetchCompleted { generation, result } => {
            let failed = result.as_ref().err().cloned();
            if app.panel.resolve(generation, result) {
                app.status_message = match failed {
                    Some(e) => format!("Fetch failed: {}", e.code()),
                    None => format!("{} cat(s) fetched", app.panel.results().len()),
                };
            } else {
                debug!("Ignored completion for fetch #{}", generation);
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fetch::ImageRequest;
    use crate::test_support::{sample_image, test_app};

    #[test]
    fn test_select_routes_tags_to_panel() {
        let mut app = test_app();
        let grumpy = app
            .selector
            .suggestions()
            .iter()
            .position(|s| s.label == "grumpy")
            .unwrap();
        let hat = app
            .selector
            .suggestions()
            .iter()
            .position(|s| s.label == "hat")
            .unwrap();

        assert_eq!(update(&mut app, Action::SelectSuggestion(grumpy)), Effect::None);
        assert_eq!(update(&mut app, Action::SelectSuggestion(hat)), Effect::None);

        let labels: Vec<&str> = app.panel.tags().iter().map(Tag::as_str).collect();
        assert_eq!(labels, vec!["grumpy", "hat"]);
        assert_eq!(app.status_message, "Tags: grumpy,hat");
        assert!(!app.panel.is_loading());

        let effect = update(&mut app, Action::FetchByTags);
        match effect {
            Effect::SpawnFetch(ticket) => {
                assert_eq!(ticket.request.path_scope().as_deref(), Some("grumpy,hat"));
            }
            other => panic!("Expected SpawnFetch, got {:?}", other),
        }
    }

    #[test]
    fn test_remove_tag_updates_panel_copy() {
        let mut app = test_app();
        update(&mut app, Action::SelectSuggestion(0));
        let tag = app.selector.suggestions()[0].tag.clone().unwrap();
        update(&mut app, Action::RemoveTag(tag));
        assert!(app.panel.tags().is_empty());

        let effect = update(&mut app, Action::FetchByTags);
        assert!(matches!(
            effect,
            Effect::SpawnFetch(FetchTicket { request: ImageRequest::Random, .. })
        ));
    }

    #[test]
    fn test_fetch_completed_applies_result() {
        let mut app = test_app();
        let Effect::SpawnFetch(ticket) = update(&mut app, Action::FetchRandom) else {
            panic!("Expected SpawnFetch");
        };
        assert!(app.panel.is_loading());

        update(
            &mut app,
            Action::FetchCompleted {
                generation: ticket.generation,
                result: Ok(sample_image(ImageRequest::Random)),
            },
        );
        assert_eq!(app.panel.results().len(), 1);
        assert!(!app.panel.is_loading());
    }

    #[test]
    fn test_stale_completion_is_ignored() {
        let mut app = test_app();
        let Effect::SpawnFetch(first) = update(&mut app, Action::FetchRandom) else {
            panic!("Expected SpawnFetch");
        };
        update(&mut app, Action::FetchRandom);

        update(
            &mut app,
            Action::FetchCompleted {
                generation: first.generation,
                result: Err(FetchError::HttpStatus(404)),
            },
        );
        assert!(app.panel.is_loading());
        assert!(app.panel.active_error().is_none());
    }

    #[test]
    fn test_query_and_focus_drive_selector() {
        let mut app = test_app();
        update(
            &mut app,
            Action::FocusChanged {
                from: None,
                to: Some(FocusTarget::Input),
            },
        );
        assert!(app.selector.is_expanded());

        update(&mut app, Action::QueryChanged("xyz".to_string()));
        assert!(app.selector.has_no_results());
    }

    #[test]
    fn test_quit_effect() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Quit), Effect::Quit);
    }
}
