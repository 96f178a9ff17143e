use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::config::Preferences;
use crate::model::task::{Column, KANBAN_KEY, TaskRecord};
use crate::tui::app::App;
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the four board columns side by side
pub fn render_board(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(area);

    for (column, chunk) in Column::ALL.into_iter().zip(chunks.iter()) {
        render_column(frame, app, column, *chunk);
    }
}

/// Column header: name, task count and share of all tasks
pub fn column_title(app: &App, column: Column) -> String {
    let board = app.session.board();
    let percent = (board.column_share(column) * 100.0).round() as u32;
    format!(
        " {} {} · {}% ",
        app.preferences().column_name(column),
        board.column_count(column),
        percent
    )
}

fn render_column(frame: &mut Frame, app: &App, column: Column, area: Rect) {
    let theme = &app.theme;
    let accent = theme.column_color(column);
    let bg = theme.column_background;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(accent).bg(bg))
        .title(Span::styled(
            column_title(app, column),
            Style::default()
                .fg(accent)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let width = inner.width as usize;
    let selected = app.session.selected_index();
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_span: Option<(usize, usize)> = None;

    for task in app.session.board().column_tasks(column) {
        if !lines.is_empty() {
            lines.push(Line::from(Span::styled("", Style::default().bg(bg))));
        }
        let is_selected = selected == Some(task.index);
        let card = card_lines(task, app.preferences(), theme, width, is_selected);
        if is_selected {
            selected_span = Some((lines.len(), lines.len() + card.len()));
        }
        lines.extend(card);
    }

    // Scroll just far enough to show the whole selected card
    let height = inner.height as usize;
    let offset = match selected_span {
        Some((start, end)) if end > height => start.min(end - height),
        _ => 0,
    };

    let paragraph = Paragraph::new(lines)
        .style(Style::default().bg(bg))
        .scroll((offset as u16, 0));
    frame.render_widget(paragraph, inner);
}

/// Lines of one task card, padded to `width`. Parts hidden in the
/// preferences are left out; a card with everything hidden shows its raw line.
pub fn card_lines(
    task: &TaskRecord,
    prefs: &Preferences,
    theme: &Theme,
    width: usize,
    selected: bool,
) -> Vec<Line<'static>> {
    let bg = if selected {
        theme.selection_bg
    } else if task.is_done {
        theme.done_card_background
    } else {
        theme.card_background
    };
    let text_style = Style::default().fg(theme.text).bg(bg);
    let mut rows: Vec<Vec<(String, Style)>> = Vec::new();

    // Header: line number, priority, dates
    let mut header = Vec::new();
    if !prefs.card_hide_index {
        header.push((format!("#{}", task.index + 1), text_style.fg(theme.dim)));
    }
    if !prefs.card_hide_priority
        && let Some(priority) = task.priority
    {
        header.push((
            priority.to_string(),
            text_style
                .fg(theme.priority_color(priority))
                .add_modifier(Modifier::BOLD),
        ));
    }
    if !prefs.card_hide_date {
        let dates = match (task.start_date, task.end_date) {
            (Some(start), Some(end)) => Some(format!("{} \u{2192} {}", start, end)),
            (Some(start), None) => Some(start.to_string()),
            _ => None,
        };
        if let Some(dates) = dates {
            header.push((dates, text_style.fg(theme.dim)));
        }
    }
    if !header.is_empty() {
        rows.push(join_words(header, text_style));
    }

    if !prefs.card_hide_subject && !task.subject.is_empty() {
        let mut style = text_style.fg(if task.is_done { theme.dim } else { theme.text_bright });
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        if task.is_done {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        rows.push(vec![(task.subject.clone(), style)]);
    }

    let mut tags = Vec::new();
    if !prefs.card_hide_project {
        tags.extend(
            task.project_tags
                .iter()
                .map(|t| (t.clone(), text_style.fg(theme.project))),
        );
    }
    if !prefs.card_hide_context {
        tags.extend(
            task.context_tags
                .iter()
                .map(|t| (t.clone(), text_style.fg(theme.context))),
        );
    }
    if !tags.is_empty() {
        rows.push(join_words(tags, text_style));
    }

    if !prefs.card_hide_special_kv_data {
        let kv: Vec<(String, Style)> = task
            .special_kv
            .iter()
            .filter(|kv| kv.key != KANBAN_KEY)
            .map(|kv| {
                (
                    format!("{}:{}", kv.key, kv.value),
                    text_style.fg(theme.kv_data),
                )
            })
            .collect();
        if !kv.is_empty() {
            rows.push(join_words(kv, text_style));
        }
    }

    if rows.is_empty() {
        rows.push(vec![(task.raw_text.clone(), text_style)]);
    }

    rows.into_iter()
        .map(|row| fit_row(row, width, bg))
        .collect()
}

fn join_words(words: Vec<(String, Style)>, gap_style: Style) -> Vec<(String, Style)> {
    let mut row = Vec::with_capacity(words.len() * 2);
    for (i, word) in words.into_iter().enumerate() {
        if i > 0 {
            row.push((" ".to_string(), gap_style));
        }
        row.push(word);
    }
    row
}

/// Cut a row to `width` cells and pad it with the card background
fn fit_row(row: Vec<(String, Style)>, width: usize, bg: Color) -> Line<'static> {
    let mut spans = Vec::new();
    let mut used = 0;
    for (text, style) in row {
        let remaining = width.saturating_sub(used);
        if remaining == 0 {
            break;
        }
        let text = truncate_to_width(&text, remaining);
        used += display_width(&text);
        spans.push(Span::styled(text, style));
    }
    if used < width {
        spans.push(Span::styled(
            " ".repeat(width - used),
            Style::default().bg(bg),
        ));
    }
    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::Toggle;
    use crate::parse::parse_line;
    use crate::tui::render::test_helpers::*;

    fn card_text(line: &str, prefs: &Preferences, width: usize) -> Vec<String> {
        let task = parse_line(line, 4).as_task().unwrap().clone();
        card_lines(&task, prefs, &Theme::light(), width, false)
            .into_iter()
            .map(|l| {
                l.spans
                    .iter()
                    .map(|s| s.content.as_ref())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn card_shows_all_parts() {
        let prefs = Preferences::default();
        let lines = card_text(
            "(A) 2024-05-01 Call the bank +money @phone due:friday k:do",
            &prefs,
            40,
        );
        assert_eq!(
            lines,
            vec![
                "#5 (A) 2024-05-01",
                "Call the bank",
                "+money @phone",
                "due:friday",
            ]
        );
    }

    #[test]
    fn card_with_two_dates() {
        let lines = card_text("x 2024-05-03 2024-05-01 Pay rent", &Preferences::default(), 40);
        assert_eq!(lines[0], "#5 2024-05-01 \u{2192} 2024-05-03");
    }

    #[test]
    fn hidden_parts_are_left_out() {
        let mut prefs = Preferences::default();
        prefs.card_hide_index = true;
        prefs.card_hide_project = true;
        prefs.card_hide_special_kv_data = true;
        let lines = card_text("(B) Call +money @phone due:friday", &prefs, 40);
        assert_eq!(lines, vec!["(B)", "Call", "@phone"]);
    }

    #[test]
    fn everything_hidden_shows_raw_line() {
        let mut prefs = Preferences::default();
        for toggle in Toggle::ALL {
            toggle.set(&mut prefs, true);
        }
        let lines = card_text("(B) Call +money", &prefs, 40);
        assert_eq!(lines, vec!["(B) Call +money"]);
    }

    #[test]
    fn long_subjects_are_truncated() {
        let lines = card_text("A very long subject line", &Preferences::default(), 10);
        assert_eq!(lines[1], "A very lo\u{2026}");
    }

    #[test]
    fn board_columns_have_counts_and_shares() {
        let app = app_with_doc(SAMPLE_DOC);
        assert_eq!(column_title(&app, Column::Backlog), " To Do 2 · 40% ");
        assert_eq!(column_title(&app, Column::Done), " Done 1 · 20% ");

        let out = render_to_string(TERM_W, 12, |frame, area| render_board(frame, &app, area));
        assert!(out.contains("To Do 2 · 40%"));
        assert!(out.contains("In progress 1 · 20%"));
        assert!(out.contains("Validation 1 · 20%"));
        assert!(out.contains("Call the bank"));
        assert!(out.contains("due:friday"));
    }

    #[test]
    fn renamed_columns() {
        let mut app = app_with_doc(SAMPLE_DOC);
        app.prefs
            .rename_columns(["Backlog", "Doing", "Review", "Shipped"].map(String::from))
            .unwrap();
        let out = render_to_string(TERM_W, 12, |frame, area| render_board(frame, &app, area));
        assert!(out.contains("Shipped 1"));
        assert!(!out.contains("To Do"));
    }
}
