//! # Chip Row Component
//!
//! One removable chip per selected tag, laid out left to right and wrapped
//! onto extra lines when they don't fit. Shows "No tags selected" while the
//! selection is empty.

use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph, Widget};
use unicode_width::UnicodeWidthStr;

use crate::core::tags::Tag;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Events emitted by the chip row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChipEvent {
    Remove(Tag),
}

#[derive(Default)]
pub struct ChipRowState {
    /// Selected tags in order (Prop, synced from `TagSelector`)
    pub chips: Vec<Tag>,
    /// Index of the focused chip
    pub cursor: usize,
    hits: Vec<(Rect, usize)>,
}

impl ChipRowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_chips(&mut self, chips: Vec<Tag>) {
        self.chips = chips;
        if self.cursor >= self.chips.len() {
            self.cursor = self.chips.len().saturating_sub(1);
        }
    }

    /// Tag whose chip is under a screen position, if any.
    pub fn hit(&self, col: u16, row: u16) -> Option<Tag> {
        self.hits
            .iter()
            .find(|(rect, _)| rect.contains(Position { x: col, y: row }))
            .and_then(|(_, idx)| self.chips.get(*idx).cloned())
    }

    /// Rows the chips need at this width (borders included).
    pub fn height(&self, width: u16) -> u16 {
        let lines = chip_layout(&self.chips, width.saturating_sub(2)).1.max(1);
        lines + 2
    }
}

impl EventHandler for ChipRowState {
    type Event = ChipEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorLeft => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorRight => {
                if self.cursor + 1 < self.chips.len() {
                    self.cursor += 1;
                }
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.chips.len().saturating_sub(1);
                None
            }
            TuiEvent::Submit | TuiEvent::Backspace | TuiEvent::Delete => self
                .chips
                .get(self.cursor)
                .cloned()
                .map(ChipEvent::Remove),
            _ => None,
        }
    }
}

fn chip_label(tag: &Tag) -> String {
    format!(" {} ✕ ", tag)
}

/// Position of every chip relative to the inner area, plus the line count.
fn chip_layout(chips: &[Tag], width: u16) -> (Vec<Rect>, u16) {
    let mut rects = Vec::with_capacity(chips.len());
    let (mut x, mut y) = (0u16, 0u16);

    for tag in chips {
        let w = (chip_label(tag).width() as u16).min(width.max(1));
        if x > 0 && x + w > width {
            x = 0;
            y += 1;
        }
        rects.push(Rect::new(x, y, w, 1));
        x += w + 1;
    }

    let lines = if chips.is_empty() { 0 } else { y + 1 };
    (rects, lines)
}

/// Transient render wrapper for the chip row.
pub struct ChipRow<'a> {
    state: &'a mut ChipRowState,
    focused: bool,
}

impl<'a> ChipRow<'a> {
    pub fn new(state: &'a mut ChipRowState, focused: bool) -> Self {
        Self { state, focused }
    }
}

impl<'a> Component for ChipRow<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.state.hits.clear();

        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(format!(" Selected ({}) ", self.state.chips.len()));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.state.chips.is_empty() {
            let empty = Paragraph::new("No tags selected")
                .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC));
            frame.render_widget(empty, inner);
            return;
        }

        let (rects, _) = chip_layout(&self.state.chips, inner.width);
        let buf = frame.buffer_mut();
        for (i, (tag, rel)) in self.state.chips.iter().zip(rects).enumerate() {
            if rel.y >= inner.height {
                break;
            }
            let rect = Rect::new(inner.x + rel.x, inner.y + rel.y, rel.width, 1);
            let style = if self.focused && i == self.state.cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Black).bg(Color::Blue)
            };
            render_chip(&chip_label(tag), style, rect, buf);
            self.state.hits.push((rect, i));
        }
    }
}

fn render_chip(label: &str, style: Style, area: Rect, buf: &mut Buffer) {
    Paragraph::new(label.to_string()).style(style).render(area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn tags(list: &[&str]) -> Vec<Tag> {
        list.iter().filter_map(|s| Tag::parse(s)).collect()
    }

    fn render(state: &mut ChipRowState, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| ChipRow::new(state, true).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_empty_row_shows_placeholder() {
        let mut state = ChipRowState::new();
        let text = render(&mut state, 40, 3);
        assert!(text.contains("No tags selected"));
        assert!(text.contains("Selected (0)"));
    }

    #[test]
    fn test_chips_render_and_hit_test() {
        let mut state = ChipRowState::new();
        state.set_chips(tags(&["grumpy", "hat"]));
        let text = render(&mut state, 40, 3);

        assert!(text.contains("grumpy ✕"));
        assert!(text.contains("hat ✕"));
        assert!(!text.contains("No tags selected"));
        // " grumpy ✕ " spans columns 1..11, then a gap, then " hat ✕ "
        assert_eq!(state.hit(2, 1), tags(&["grumpy"]).pop());
        assert_eq!(state.hit(13, 1), tags(&["hat"]).pop());
        assert_eq!(state.hit(30, 1), None);
    }

    #[test]
    fn test_remove_focused_chip() {
        let mut state = ChipRowState::new();
        state.set_chips(tags(&["grumpy", "hat", "cute"]));
        state.handle_event(&TuiEvent::CursorRight);
        assert_eq!(
            state.handle_event(&TuiEvent::Backspace),
            Some(ChipEvent::Remove(tags(&["hat"]).remove(0)))
        );

        state.set_chips(tags(&["grumpy"]));
        assert_eq!(state.cursor, 0);
        state.set_chips(Vec::new());
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_height_wraps_long_rows() {
        let mut state = ChipRowState::new();
        assert_eq!(state.height(20), 3);
        state.set_chips(tags(&["grumpy", "orange", "sleepy", "kitten"]));
        // Each chip is 10 wide; 18 inner columns fit one per line
        assert_eq!(state.height(20), 6);
    }
}
