//! # Suggestion List Component
//!
//! Dropdown under the tag input. Shows the suggestions left visible by the
//! current query, a check mark on selected ones, and "No matching tags"
//! when the filter hides everything.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SuggestionListState` lives in `TuiState` (highlight, hit rectangles)
//! - `SuggestionList` is created each frame with borrowed state and props

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

use crate::core::tags::Suggestion;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows shown before the list starts scrolling.
pub const MAX_VISIBLE_ROWS: u16 = 8;

/// Events emitted by the suggestion list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionEvent {
    /// Activate the suggestion at this index (into the full list).
    Select(usize),
    /// Leave the list back to the input (Up at the top, or Esc).
    ExitToInput,
}

#[derive(Default)]
pub struct SuggestionListState {
    /// Indices of visible suggestions (Prop, synced from `TagSelector`)
    pub visible: Vec<usize>,
    /// Position of the highlight within `visible`
    pub highlighted: usize,
    pub list_state: ListState,
    /// Screen row of each rendered item, paired with its suggestion index
    hits: Vec<(Rect, usize)>,
}

impl SuggestionListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible set, keeping the highlight in range.
    pub fn set_visible(&mut self, visible: Vec<usize>) {
        self.visible = visible;
        if self.highlighted >= self.visible.len() {
            self.highlighted = self.visible.len().saturating_sub(1);
        }
    }

    pub fn highlighted_index(&self) -> Option<usize> {
        self.visible.get(self.highlighted).copied()
    }

    /// Suggestion index under a screen position, if any.
    pub fn hit(&self, col: u16, row: u16) -> Option<usize> {
        self.hits
            .iter()
            .find(|(rect, _)| rect.contains(Position { x: col, y: row }))
            .map(|(_, idx)| *idx)
    }

    pub fn reset(&mut self) {
        self.highlighted = 0;
        self.hits.clear();
    }

    /// Height needed to show the list (borders included).
    pub fn height(&self) -> u16 {
        let rows = (self.visible.len() as u16).clamp(1, MAX_VISIBLE_ROWS);
        rows + 2
    }
}

impl EventHandler for SuggestionListState {
    type Event = SuggestionEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => {
                if self.highlighted == 0 {
                    Some(SuggestionEvent::ExitToInput)
                } else {
                    self.highlighted -= 1;
                    None
                }
            }
            TuiEvent::CursorDown => {
                if self.highlighted + 1 < self.visible.len() {
                    self.highlighted += 1;
                }
                None
            }
            TuiEvent::Home => {
                self.highlighted = 0;
                None
            }
            TuiEvent::End => {
                self.highlighted = self.visible.len().saturating_sub(1);
                None
            }
            TuiEvent::Submit => self.highlighted_index().map(SuggestionEvent::Select),
            TuiEvent::Escape => Some(SuggestionEvent::ExitToInput),
            _ => None,
        }
    }
}

/// Transient render wrapper for the dropdown.
pub struct SuggestionList<'a> {
    state: &'a mut SuggestionListState,
    suggestions: &'a [Suggestion],
    no_results: bool,
    focused: bool,
}

impl<'a> SuggestionList<'a> {
    pub fn new(
        state: &'a mut SuggestionListState,
        suggestions: &'a [Suggestion],
        no_results: bool,
        focused: bool,
    ) -> Self {
        Self {
            state,
            suggestions,
            no_results,
            focused,
        }
    }
}

impl<'a> Component for SuggestionList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Clear, area);
        self.state.hits.clear();

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Suggestions ");

        if self.no_results || self.state.visible.is_empty() {
            let empty = Paragraph::new("No matching tags")
                .style(Style::default().fg(Color::DarkGray))
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let items: Vec<ListItem> = self
            .state
            .visible
            .iter()
            .enumerate()
            .filter_map(|(pos, &idx)| self.suggestions.get(idx).map(|s| (pos, s)))
            .map(|(pos, suggestion)| {
                let check = if suggestion.selected { "✓ " } else { "  " };
                let style = if self.focused && pos == self.state.highlighted {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else if suggestion.selected {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(check, style),
                    Span::styled(suggestion.label.trim().to_string(), style),
                ]))
            })
            .collect();

        self.state
            .list_state
            .select(self.focused.then_some(self.state.highlighted));

        let list = List::new(items).block(block);
        frame.render_stateful_widget(list, area, &mut self.state.list_state);

        // Rows as laid out after the list scrolled to keep the highlight in view
        let inner = area.inner(ratatui::layout::Margin::new(1, 1));
        let first = self.state.list_state.offset();
        for row in 0..inner.height {
            let pos = first + row as usize;
            let Some(&idx) = self.state.visible.get(pos) else {
                break;
            };
            let rect = Rect::new(inner.x, inner.y + row, inner.width, 1);
            self.state.hits.push((rect, idx));
        }
    }
}
