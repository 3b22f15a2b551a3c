//! # Core Application Logic
//!
//! This module contains cattag's business logic.
//! It knows nothing about any specific UI technology or about HTTP.
//!
//! ```text
//!     ┌──────────────┐   TagsChanged    ┌────────────────┐
//!     │ TagSelector  │ ───────────────▶ │ ImageFetchPanel│
//!     │  (tags.rs)   │   via update()   │   (fetch.rs)   │
//!     └──────────────┘                  └───────┬────────┘
//!                                               │ FetchTicket
//!                                               ▼
//!                                     Effect::SpawnFetch (adapter runs it)
//! ```
//!
//! ## Modules
//!
//! - [`tags`]: suggestion filtering and the selected-tag set
//! - [`fetch`]: request generation, outcome tracking, results
//! - [`state`]: the `App` struct, all application state in one place
//! - [`action`]: the `Action` enum and the `update()` reducer
//! - [`config`]: config file + env + CLI resolution

pub mod action;
pub mod config;
pub mod fetch;
pub mod state;
pub mod tags;
