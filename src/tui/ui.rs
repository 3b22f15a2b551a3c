use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::core::state::App;
use crate::core::tags::FocusTarget;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{ChipRow, ResultsPanel, SuggestionList, TitleBar};

/// Widest the suggestion dropdown gets.
const DROPDOWN_MAX_WIDTH: u16 = 40;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let chips_height = tui.chips.height(area.width);
    let [title_area, input_area, chips_area, results_area, help_area] = Layout::vertical([
        Length(1),
        Length(3),
        Length(chips_height),
        Min(0),
        Length(1),
    ])
    .areas(area);

    TitleBar::new(
        app.status_message.clone(),
        app.panel.results().len(),
        app.panel.is_loading(),
        spinner_frame,
    )
    .render(frame, title_area);

    tui.tag_input.focused = tui.focus == FocusTarget::Input;
    tui.tag_input.expanded = app.selector.is_expanded();
    tui.tag_input.render(frame, input_area);

    ChipRow::new(&mut tui.chips, tui.focus == FocusTarget::Chips).render(frame, chips_area);

    ResultsPanel::new(
        &mut tui.results,
        &app.panel,
        spinner_frame,
        tui.focus == FocusTarget::Results,
    )
    .render(frame, results_area);

    frame.render_widget(help_line(tui.focus), help_area);

    // Dropdown last so it overlays everything under the input
    if app.selector.is_expanded() {
        let dropdown = dropdown_area(input_area, tui.suggestions.height(), area);
        SuggestionList::new(
            &mut tui.suggestions,
            app.selector.suggestions(),
            app.selector.has_no_results(),
            tui.focus == FocusTarget::Suggestions,
        )
        .render(frame, dropdown);
    }
}

/// Area directly under the input, clipped to the frame.
fn dropdown_area(input: Rect, wanted_height: u16, frame: Rect) -> Rect {
    let y = input.y + input.height;
    let bottom = frame.y + frame.height;
    let height = wanted_height.min(bottom.saturating_sub(y));
    let width = input.width.min(DROPDOWN_MAX_WIDTH);
    Rect::new(input.x, y, width, height)
}

fn help_line(focus: FocusTarget) -> Line<'static> {
    let context = match focus {
        FocusTarget::Input => "type to filter  ↓ suggestions  Esc close",
        FocusTarget::Suggestions => "↑↓ move  Enter select  Esc back",
        FocusTarget::Chips => "←→ move  Enter/Del remove",
        FocusTarget::Results => "↑↓ PgUp PgDn Home End scroll",
    };
    Line::from(vec![
        Span::styled(format!(" {context} "), Style::default().fg(Color::Gray)),
        Span::styled(
            "│ Tab focus  ^R random  ^F search  ^C quit",
            Style::default().fg(Color::DarkGray),
        ),
    ])
}
