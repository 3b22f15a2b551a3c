//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard and mouse events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Focus
//!
//! Focus is presentation state, kept in `TuiState`. Every move is also
//! reported to the core as `Action::FocusChanged` so the tag selector can
//! open or close its suggestion list.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events, resize or
//!   background results.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::fetch::FetchTicket;
use crate::core::state::App;
use crate::core::tags::FocusTarget;
use crate::service::{CataasService, ImageService};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ChipEvent, ChipRowState, ResultsPanelState, SuggestionEvent, SuggestionListState, TagInput,
    TagInputEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: FocusTarget,
    // Persistent component states
    pub tag_input: TagInput,
    pub suggestions: SuggestionListState,
    pub chips: ChipRowState,
    pub results: ResultsPanelState,
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: FocusTarget::Input, // User expects to type immediately
            tag_input: TagInput::new(),
            suggestions: SuggestionListState::new(),
            chips: ChipRowState::new(),
            results: ResultsPanelState::new(),
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

/// Build the image service from a resolved config.
pub fn build_service(config: &ResolvedConfig) -> Arc<dyn ImageService> {
    Arc::new(CataasService::new(config.base_url.clone(), config.image_size))
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let service = build_service(&config);
    info!("Using {} at {}", service.name(), config.base_url);
    let mut app = App::from_config(service, &config);
    let mut tui = TuiState::new();

    // Initial focus is the input, which opens the suggestion list
    update(
        &mut app,
        Action::FocusChanged {
            from: None,
            to: Some(tui.focus),
        },
    );
    sync_props(&mut app, &mut tui);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    // Handle of the in-flight fetch, aborted when a newer one starts
    let mut active_fetch: Option<AbortHandle> = None;

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.panel.is_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            match route_event(&mut app, &mut tui, event) {
                Effect::Quit => should_quit = true,
                Effect::SpawnFetch(ticket) => {
                    start_fetch(&app, ticket, &tx, &mut active_fetch);
                }
                Effect::None => {}
            }
            sync_props(&mut app, &mut tui);
        }

        if should_quit {
            break;
        }

        // Handle background task actions (fetch completions)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            if let Effect::SpawnFetch(ticket) = update(&mut app, action) {
                start_fetch(&app, ticket, &tx, &mut active_fetch);
            }
            sync_props(&mut app, &mut tui);
        }
    }

    if let Some(handle) = active_fetch.take() {
        handle.abort();
    }

    ratatui::restore();
    Ok(())
}

/// Copy core state the components render from into their persistent state.
fn sync_props(app: &mut App, tui: &mut TuiState) {
    tui.suggestions.set_visible(app.selector.visible_indices());
    tui.chips.set_chips(app.selector.selected_tags().to_vec());
    if app.panel.take_scroll_request() {
        tui.results.scroll_to_latest();
    }
    // The list may close under us (e.g. after a click elsewhere)
    if tui.focus == FocusTarget::Suggestions && !app.selector.is_expanded() {
        set_focus(app, tui, FocusTarget::Input);
    }
}

fn set_focus(app: &mut App, tui: &mut TuiState, to: FocusTarget) {
    let from = tui.focus;
    if from == to {
        return;
    }
    debug!("Focus {:?} -> {:?}", from, to);
    tui.focus = to;
    if to == FocusTarget::Suggestions {
        tui.suggestions.reset();
    }
    update(
        app,
        Action::FocusChanged {
            from: Some(from),
            to: Some(to),
        },
    );
}

/// Tab order. The suggestion list is reached with Down, not Tab.
fn next_focus(focus: FocusTarget) -> FocusTarget {
    match focus {
        FocusTarget::Input | FocusTarget::Suggestions => FocusTarget::Chips,
        FocusTarget::Chips => FocusTarget::Results,
        FocusTarget::Results => FocusTarget::Input,
    }
}

fn prev_focus(focus: FocusTarget) -> FocusTarget {
    match focus {
        FocusTarget::Input => FocusTarget::Results,
        FocusTarget::Suggestions | FocusTarget::Chips => FocusTarget::Input,
        FocusTarget::Results => FocusTarget::Chips,
    }
}

/// Turn one terminal event into at most one core effect.
fn route_event(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
    match event {
        TuiEvent::ForceQuit => return update(app, Action::Quit),
        TuiEvent::FetchRandom => return update(app, Action::FetchRandom),
        TuiEvent::FetchByTags => return update(app, Action::FetchByTags),
        TuiEvent::Resize => return Effect::None,
        TuiEvent::FocusNext => {
            set_focus(app, tui, next_focus(tui.focus));
            return Effect::None;
        }
        TuiEvent::FocusPrev => {
            set_focus(app, tui, prev_focus(tui.focus));
            return Effect::None;
        }
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            tui.results.handle_event(&event);
            return Effect::None;
        }
        TuiEvent::MouseClick(col, row) => return route_click(app, tui, col, row),
        _ => {}
    }

    match tui.focus {
        FocusTarget::Input => {
            if matches!(event, TuiEvent::Escape) {
                set_focus(app, tui, FocusTarget::Results);
                return Effect::None;
            }
            match tui.tag_input.handle_event(&event) {
                Some(TagInputEvent::QueryChanged(query)) => update(app, Action::QueryChanged(query)),
                Some(TagInputEvent::EnterSuggestions) => {
                    if app.selector.is_expanded() && !tui.suggestions.visible.is_empty() {
                        set_focus(app, tui, FocusTarget::Suggestions);
                    }
                    Effect::None
                }
                None => Effect::None,
            }
        }
        FocusTarget::Suggestions => {
            // Typing goes back to the input
            if matches!(
                event,
                TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace
            ) {
                set_focus(app, tui, FocusTarget::Input);
                return match tui.tag_input.handle_event(&event) {
                    Some(TagInputEvent::QueryChanged(query)) => {
                        update(app, Action::QueryChanged(query))
                    }
                    _ => Effect::None,
                };
            }
            match tui.suggestions.handle_event(&event) {
                Some(SuggestionEvent::Select(index)) => update(app, Action::SelectSuggestion(index)),
                Some(SuggestionEvent::ExitToInput) => {
                    set_focus(app, tui, FocusTarget::Input);
                    Effect::None
                }
                None => Effect::None,
            }
        }
        FocusTarget::Chips => match tui.chips.handle_event(&event) {
            Some(ChipEvent::Remove(tag)) => update(app, Action::RemoveTag(tag)),
            None => Effect::None,
        },
        FocusTarget::Results => {
            if let TuiEvent::InputChar(_) | TuiEvent::Paste(_) = event {
                set_focus(app, tui, FocusTarget::Input);
                return match tui.tag_input.handle_event(&event) {
                    Some(TagInputEvent::QueryChanged(query)) => {
                        update(app, Action::QueryChanged(query))
                    }
                    _ => Effect::None,
                };
            }
            tui.results.handle_event(&event);
            Effect::None
        }
    }
}

fn route_click(app: &mut App, tui: &mut TuiState, col: u16, row: u16) -> Effect {
    // Dropdown overlays everything under the input, so it wins
    if app.selector.is_expanded()
        && let Some(index) = tui.suggestions.hit(col, row)
    {
        set_focus(app, tui, FocusTarget::Suggestions);
        return update(app, Action::SelectSuggestion(index));
    }
    if let Some(tag) = tui.chips.hit(col, row) {
        set_focus(app, tui, FocusTarget::Chips);
        return update(app, Action::RemoveTag(tag));
    }
    if tui.tag_input.contains(col, row) {
        set_focus(app, tui, FocusTarget::Input);
        return Effect::None;
    }
    set_focus(app, tui, FocusTarget::Results);
    Effect::None
}

fn start_fetch(
    app: &App,
    ticket: FetchTicket,
    tx: &mpsc::Sender<Action>,
    active_fetch: &mut Option<AbortHandle>,
) {
    if let Some(previous) = active_fetch.take() {
        debug!("Aborting superseded fetch");
        previous.abort();
    }
    *active_fetch = Some(spawn_fetch(app.service.clone(), ticket, tx.clone()));
}

fn spawn_fetch(
    service: Arc<dyn ImageService>,
    ticket: FetchTicket,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!(
        "Spawning fetch #{} ({}) via {}",
        ticket.generation,
        ticket.request.label(),
        service.name()
    );
    let handle = tokio::spawn(async move {
        let started = Instant::now();
        let result = service.fetch(&ticket.request).await;
        match &result {
            Ok(image) => info!(
                "Fetch #{} done in {}ms ({} bytes)",
                ticket.generation,
                started.elapsed().as_millis(),
                image.byte_len
            ),
            Err(e) => warn!("Fetch #{} failed: {}", ticket.generation, e),
        }
        if tx
            .send(Action::FetchCompleted {
                generation: ticket.generation,
                result,
            })
            .is_err()
        {
            warn!(
                "Failed to send result for fetch #{}: receiver dropped",
                ticket.generation
            );
        }
    });
    handle.abort_handle()
}
