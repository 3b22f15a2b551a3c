//! # TitleBar Component
//!
//! Single-line status bar: app name, result count, status message, and a
//! spinner while a fetch is in flight.
//!
//! Purely presentational. Every field is a prop copied from `App` each frame.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

pub const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub struct TitleBar {
    pub status_message: String,
    pub result_count: usize,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(status_message: String, result_count: usize, is_loading: bool, spinner_frame: usize) -> Self {
        Self {
            status_message,
            result_count,
            is_loading,
            spinner_frame,
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![
            Span::styled("cattag", Style::default().fg(Color::Magenta)),
            Span::raw(format!(" ({} cats)", self.result_count)),
        ];
        if self.is_loading {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(format!(" {glyph}"), Style::default().fg(Color::Yellow)));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::raw(format!(" | {}", self.status_message)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
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
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new("Tags: grumpy".to_string(), 3, false, 0);
        let text = render_text(&mut title_bar);
        assert!(text.contains("cattag"));
        assert!(text.contains("(3 cats)"));
        assert!(text.contains("Tags: grumpy"));
        assert!(!text.contains(SPINNER[0]));
    }

    #[test]
    fn test_title_bar_shows_spinner_while_loading() {
        let mut title_bar = TitleBar::new(String::new(), 0, true, 2);
        let text = render_text(&mut title_bar);
        assert!(text.contains(SPINNER[2]));
        assert!(!text.contains('|'));
    }
}
