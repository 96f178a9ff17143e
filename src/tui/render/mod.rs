pub mod board_view;
pub mod options_popup;
pub mod status_row;
pub mod title_bar;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::widgets::Block;

use super::app::{App, Mode};

/// Main render function, dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    let memo_rows = if app.preferences().hide_memo { 0 } else { 1 };

    // Layout: title (1 row) | board | status row (1 row) | key memo (0-1 rows)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(memo_rows),
        ])
        .split(area);

    title_bar::render_title_bar(frame, app, chunks[0]);
    board_view::render_board(frame, app, chunks[1]);
    status_row::render_status_row(frame, app, chunks[2]);
    if memo_rows > 0 {
        status_row::render_memo_row(frame, app, chunks[3]);
    }

    if app.mode == Mode::Options {
        options_popup::render_options_popup(frame, app, area);
    }
}

#[cfg(test)]
mod tests {
    use super::test_helpers::*;
    use super::*;

    #[test]
    fn full_screen_layout() {
        let app = app_with_doc(SAMPLE_DOC);
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("KanbanTxt"));
        assert!(out.contains("To Do"));
        assert!(out.contains("Done"));
        assert!(lines.last().unwrap().contains("q quit"));
    }

    #[test]
    fn memo_row_can_be_hidden() {
        let mut app = app_with_doc(SAMPLE_DOC);
        app.prefs
            .set_toggle(crate::model::config::Toggle::HideMemo, true)
            .unwrap();
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(!out.contains("q quit"));
    }

    #[test]
    fn options_popup_on_top() {
        let mut app = app_with_doc(SAMPLE_DOC);
        app.mode = Mode::Options;
        let out = render_to_string(TERM_W, TERM_H, |frame, _| render(frame, &app));
        assert!(out.contains("Options"));
        assert!(out.contains("[x] Ask before deleting tasks"));
    }
}
