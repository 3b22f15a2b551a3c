//! # TagInput Component
//!
//! Single-line query box above the suggestion list.
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `focused` and `expanded` are
//! props synced from `TuiState` / `TagSelector` before each frame.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// High-level events emitted by the TagInput
#[derive(Debug, Clone, PartialEq)]
pub enum TagInputEvent {
    /// Buffer changed; carries the new query.
    QueryChanged(String),
    /// Down arrow: move focus into the suggestion list.
    EnterSuggestions,
}

pub struct TagInput {
    /// Query text (Internal State)
    pub buffer: String,
    /// Byte offset of the cursor within `buffer`
    cursor: usize,
    /// Whether keyboard focus is here (Prop)
    pub focused: bool,
    /// Whether the suggestion list is open (Prop)
    pub expanded: bool,
    /// Area from the last render, for click hit-testing
    pub last_area: Rect,
}

impl Default for TagInput {
    fn default() -> Self {
        Self::new()
    }
}

impl TagInput {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            focused: false,
            expanded: false,
            last_area: Rect::default(),
        }
    }

    pub fn contains(&self, col: u16, row: u16) -> bool {
        self.last_area.contains(ratatui::layout::Position { x: col, y: row })
    }

    fn changed(&self) -> Option<TagInputEvent> {
        Some(TagInputEvent::QueryChanged(self.buffer.clone()))
    }
}

fn prev_boundary(s: &str, pos: usize) -> usize {
    s[..pos].char_indices().next_back().map(|(i, _)| i).unwrap_or(0)
}

fn next_boundary(s: &str, pos: usize) -> usize {
    s[pos..].chars().next().map(|c| pos + c.len_utf8()).unwrap_or(pos)
}

impl Component for TagInput {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.last_area = area;

        let marker = if self.expanded { "▾" } else { "▸" };
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!(" Tags {marker} "));

        let input = if self.buffer.is_empty() && !self.focused {
            Paragraph::new("type to filter tags")
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        } else {
            Paragraph::new(self.buffer.as_str()).style(Style::default().fg(Color::Green))
        };
        frame.render_widget(input.block(block), area);

        if self.focused {
            let offset = self.buffer[..self.cursor].width() as u16;
            let max_x = area.x + area.width.saturating_sub(2);
            let x = (area.x + 1 + offset).min(max_x);
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

impl EventHandler for TagInput {
    type Event = TagInputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                self.changed()
            }
            TuiEvent::Paste(text) => {
                // Single-line field
                let line: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
                self.buffer.insert_str(self.cursor, &line);
                self.cursor += line.len();
                self.changed()
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let prev = prev_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                self.changed()
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let next = next_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                self.changed()
            }
            TuiEvent::CursorLeft => {
                self.cursor = prev_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = next_boundary(&self.buffer, self.cursor);
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::CursorDown => Some(TagInputEvent::EnterSuggestions),
            _ => None,
        }
    }
}
