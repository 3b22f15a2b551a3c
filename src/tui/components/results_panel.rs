//! # ResultsPanel Component
//!
//! Scrollable list of fetched images plus the panel's loading, error and
//! empty indicators.
//!
//! ## Architecture
//!
//! `ResultsPanel` is a transient component (created each frame) that wraps
//! `&'a mut ResultsPanelState` (persistent scroll state) and the core
//! `ImageFetchPanel` (props). The panel decides *whether* to show the
//! loader, error and empty message; this component only draws them.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::fetch::{FetchedImage, ImageFetchPanel};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::image_card::ImageCard;
use crate::tui::components::title_bar::SPINNER;
use crate::tui::event::TuiEvent;

pub const EMPTY_MESSAGE: &str = "No cats yet. Ctrl+R for a random cat, Ctrl+F to search by tags.";

/// Cached card heights. Results only ever grow, so new cards are appended
/// and earlier prefix sums are reused.
#[derive(Default)]
pub struct CardLayout {
    pub heights: Vec<u16>,
    /// `prefix_heights[i]` is the bottom edge of card `i`.
    pub prefix_heights: Vec<usize>,
}

impl CardLayout {
    fn sync(&mut self, results: &[FetchedImage]) {
        if results.len() < self.heights.len() {
            self.heights.clear();
            self.prefix_heights.clear();
        }
        for image in results.iter().skip(self.heights.len()) {
            let height = ImageCard::calculate_height(image);
            let top = self.total_height();
            self.heights.push(height);
            self.prefix_heights.push(top + height as usize);
        }
    }

    pub fn total_height(&self) -> usize {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    fn top_of(&self, index: usize) -> usize {
        if index == 0 { 0 } else { self.prefix_heights[index - 1] }
    }

    /// Cards overlapping rows `offset..offset + height`.
    pub fn visible_range(&self, offset: usize, height: usize) -> Range<usize> {
        let start = self.prefix_heights.partition_point(|&bottom| bottom <= offset);
        let end = self
            .prefix_heights
            .partition_point(|&bottom| bottom < offset + height)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end.max(start)
    }
}

/// Scroll state for the results list.
/// Must be persisted in the parent TuiState.
pub struct ResultsPanelState {
    /// Row of the whole list shown at the top of the viewport
    pub offset: usize,
    /// When true, keep the newest card in view
    pub stick_to_bottom: bool,
    /// Last known viewport and content heights (for clamping between frames)
    pub viewport_height: usize,
    pub content_height: usize,
    pub layout: CardLayout,
    /// Scroll position inside the window of cards actually drawn
    window_state: ScrollViewState,
}

impl Default for ResultsPanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsPanelState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            stick_to_bottom: true,
            viewport_height: 0,
            content_height: 0,
            layout: CardLayout::default(),
            window_state: ScrollViewState::default(),
        }
    }

    /// Called after a successful fetch so the new card is visible.
    pub fn scroll_to_latest(&mut self) {
        self.stick_to_bottom = true;
    }

    fn max_offset(&self) -> usize {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.min(self.max_offset()).saturating_sub(rows);
        self.stick_to_bottom = false;
    }

    fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
        if self.offset >= self.max_offset() {
            self.stick_to_bottom = true;
        }
    }
}

impl EventHandler for ResultsPanelState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let page = self.viewport_height.max(1);
        match event {
            TuiEvent::ScrollUp | TuiEvent::CursorUp => self.scroll_up(1),
            TuiEvent::ScrollDown | TuiEvent::CursorDown => self.scroll_down(1),
            TuiEvent::PageUp => self.scroll_up(page),
            TuiEvent::PageDown => self.scroll_down(page),
            TuiEvent::Home => {
                self.offset = 0;
                self.stick_to_bottom = false;
            }
            TuiEvent::End => {
                self.stick_to_bottom = true;
            }
            _ => {}
        }
        None
    }
}

pub struct ResultsPanel<'a> {
    state: &'a mut ResultsPanelState,
    panel: &'a ImageFetchPanel,
    spinner_frame: usize,
    focused: bool,
}

impl<'a> ResultsPanel<'a> {
    pub fn new(
        state: &'a mut ResultsPanelState,
        panel: &'a ImageFetchPanel,
        spinner_frame: usize,
        focused: bool,
    ) -> Self {
        Self {
            state,
            panel,
            spinner_frame,
            focused,
        }
    }

    fn title(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(format!(" Results ({}) ", self.panel.results().len()))];
        if self.panel.is_loading() {
            let glyph = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(
                format!("{glyph} loading "),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }

    /// Draws only the cards in view. The ScrollView canvas holds just that
    /// window, so its height stays near the viewport however long the list is.
    fn render_cards(&mut self, frame: &mut Frame, area: Rect) {
        let panel = self.panel;
        let results = panel.results();
        let content_width = area.width.saturating_sub(1); // scrollbar column

        let state = &mut *self.state;
        state.layout.sync(results);
        state.viewport_height = area.height as usize;
        state.content_height = state.layout.total_height();

        let max_offset = state.max_offset();
        if state.stick_to_bottom {
            state.offset = max_offset;
        } else {
            state.offset = state.offset.min(max_offset);
        }

        let visible = state.layout.visible_range(state.offset, state.viewport_height);
        let window_top = state.layout.top_of(visible.start);
        let window_bottom = if visible.is_empty() {
            window_top
        } else {
            state.layout.prefix_heights[visible.end - 1]
        };
        let window_height = u16::try_from(window_bottom - window_top).unwrap_or(u16::MAX);

        let mut scroll_view = ScrollView::new(Size::new(content_width, window_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Never)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let latest = results.len().saturating_sub(1);
        let mut y = 0u16;
        for i in visible {
            let height = state.layout.heights[i];
            let rect = Rect::new(0, y, content_width, height);
            scroll_view.render_widget(ImageCard::new(&results[i], i + 1, i == latest), rect);
            y = y.saturating_add(height);
        }

        let in_window = u16::try_from(state.offset - window_top).unwrap_or(u16::MAX);
        state.window_state.set_offset(Position { x: 0, y: in_window });
        let cards_area = Rect::new(area.x, area.y, content_width, area.height);
        frame.render_stateful_widget(scroll_view, cards_area, &mut state.window_state);

        if max_offset > 0 {
            let mut scrollbar_state = ScrollbarState::new(max_offset)
                .position(state.offset)
                .viewport_content_length(state.viewport_height);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar_state,
            );
        }
    }
}

impl<'a> Component for ResultsPanel<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let list_area = match self.panel.active_error() {
            Some(error) => {
                let [error_area, rest] =
                    Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);
                let message = Paragraph::new(error.user_message())
                    .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .wrap(Wrap { trim: true })
                    .block(Block::bordered().border_style(Style::default().fg(Color::Red)).title(" Error "));
                frame.render_widget(message, error_area);
                rest
            }
            None => inner,
        };

        if self.panel.show_empty_message() {
            let [_, middle, _] = Layout::vertical([
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Fill(1),
            ])
            .areas(list_area);
            let empty = Paragraph::new(EMPTY_MESSAGE)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(empty, middle);
            return;
        }

        self.render_cards(frame, list_area);
    }
}
