//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: top status line
//! - `ImageCard` / `ThumbnailView`: one fetched image
//!
//! ### Stateful Components (Event-Driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it each
//! frame together with props from the core `App`:
//! - `TagInput`: query box (owns its own buffer)
//! - `SuggestionListState` / `SuggestionList`: filtered dropdown
//! - `ChipRowState` / `ChipRow`: selected tags, removable
//! - `ResultsPanelState` / `ResultsPanel`: scrollable results
//!
//! Components never mutate core state. They emit events
//! (`TagInputEvent`, `SuggestionEvent`, `ChipEvent`) that the event loop
//! turns into `core::action::Action`s.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── title_bar.rs
//! ├── tag_input.rs
//! ├── suggestion_list.rs
//! ├── chip_row.rs
//! ├── image_card.rs
//! └── results_panel.rs
//! ```

pub mod chip_row;
pub mod image_card;
pub mod results_panel;
pub mod suggestion_list;
pub mod tag_input;
pub mod title_bar;

pub use chip_row::{ChipEvent, ChipRow, ChipRowState};
pub use results_panel::{ResultsPanel, ResultsPanelState};
pub use suggestion_list::{SuggestionEvent, SuggestionList, SuggestionListState};
pub use tag_input::{TagInput, TagInputEvent};
pub use title_bar::TitleBar;
