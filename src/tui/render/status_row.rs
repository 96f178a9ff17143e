use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::config::Preferences;
use crate::session::StatusLevel;
use crate::tui::app::{App, Mode};
use crate::util::unicode::display_width;

/// Render the status row: prompt, question, message or filter summary
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint) = match (app.mode, &app.prompt, &app.confirm) {
        (Mode::Prompt, Some(prompt), _) => {
            let (before, after) = prompt.input.split();
            let spans = vec![
                Span::styled(prompt.kind.label(), dim),
                Span::styled(
                    before.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled(
                    "\u{258C}",
                    Style::default().fg(app.theme.important).bg(bg),
                ),
                Span::styled(
                    after.to_string(),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
            ];
            (spans, Some("Enter ok  Esc cancel".to_string()))
        }
        (Mode::Confirm, _, Some(action)) => (
            vec![Span::styled(
                action.question(),
                Style::default()
                    .fg(app.theme.important)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )],
            None,
        ),
        _ => match app.session.status() {
            Some(message) => {
                let fg = match message.level {
                    StatusLevel::Warning => app.theme.important,
                    StatusLevel::Info => app.theme.text,
                };
                (
                    vec![Span::styled(
                        message.text.clone(),
                        Style::default().fg(fg).bg(bg),
                    )],
                    None,
                )
            }
            None => match app.session.filter_query() {
                Some((query, use_regex)) => {
                    let label = if use_regex {
                        format!("/{}/ (regex)", query)
                    } else {
                        format!("/{}", query)
                    };
                    (
                        vec![Span::styled(label, dim)],
                        app.session.filter_status(),
                    )
                }
                None => (Vec::new(), None),
            },
        },
    };

    // Right-aligned hint; while filtering it is the match count
    if let Some(hint) = hint {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let hint_width = display_width(&hint);
        if content_width + hint_width < width {
            let padding = width - content_width - hint_width;
            spans.push(Span::styled(" ".repeat(padding), Style::default().bg(bg)));
            spans.push(Span::styled(hint, dim));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

/// Key groups for the memo row; the optional ones follow the `hide_button*`
/// preferences.
pub fn memo_groups(prefs: &Preferences) -> Vec<&'static str> {
    let mut groups = vec!["q quit", "n new", "e edit"];
    if !prefs.hide_button_delete {
        groups.push("Del delete");
    }
    if !prefs.hide_buttons_move_to_column {
        groups.push("1-4 column");
    }
    if !prefs.hide_buttons_assign_priority {
        groups.push("p/A-E/- priority");
    }
    if !prefs.hide_buttons_move_line_up_down {
        groups.push("J/K reorder");
    }
    if !prefs.hide_button_add_date {
        groups.push("t date");
    }
    groups.extend(["/ filter", "r regex", "s sort", "o options", "R rename", "T theme", "w save", "^O open"]);
    groups
}

pub fn render_memo_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let key_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let text_style = Style::default().fg(app.theme.dim).bg(bg);

    let mut spans = Vec::new();
    for (i, group) in memo_groups(app.preferences()).into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled("  ", text_style));
        }
        let (key, label) = group.split_once(' ').unwrap_or((group, ""));
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(format!(" {}", label), text_style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{ConfirmAction, PromptKind};
    use crate::tui::render::test_helpers::*;

    fn status(app: &App, w: u16) -> String {
        render_to_string(w, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[test]
    fn empty_when_idle() {
        let app = app_with_doc(SAMPLE_DOC);
        assert_eq!(status(&app, 40), "");
    }

    #[test]
    fn prompt_with_cursor() {
        let mut app = app_with_doc(SAMPLE_DOC);
        app.open_prompt(PromptKind::NewTask, "Buy eggs");
        let out = status(&app, 60);
        assert!(out.starts_with("new task: Buy eggs\u{258C}"));
        assert!(out.ends_with("Enter ok  Esc cancel"));
    }

    #[test]
    fn filter_summary() {
        let mut app = app_with_doc(SAMPLE_DOC);
        app.session.apply_filter("milk", false).unwrap();
        let out = status(&app, 60);
        assert!(out.starts_with("/milk"));
        assert!(out.ends_with("showing 1 of 5 tasks"));
    }

    #[test]
    fn question_and_warning() {
        let mut app = app_with_doc(SAMPLE_DOC);
        app.ask(ConfirmAction::Delete(1));
        assert_eq!(status(&app, 60), "Delete this task? (y/n)");

        app.mode = Mode::Navigate;
        app.confirm = None;
        app.session.set_warning("could not write todo.txt");
        assert_eq!(status(&app, 60), "could not write todo.txt");
    }

    #[test]
    fn memo_follows_toggles() {
        let mut prefs = Preferences::default();
        assert!(memo_groups(&prefs).contains(&"t date"));
        prefs.hide_button_add_date = true;
        prefs.hide_buttons_move_to_column = true;
        let groups = memo_groups(&prefs);
        assert!(!groups.contains(&"t date"));
        assert!(!groups.contains(&"1-4 column"));
        assert!(groups.contains(&"Del delete"));
    }
}
