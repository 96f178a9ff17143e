use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::model::task::{Column, Priority};
use crate::ops::task_ops;
use crate::session::Direction;
use crate::tui::app::{App, ConfirmAction, Mode, PromptKind};
use crate::tui::theme::Theme;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.session.clear_status();

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('o') => {
                let dir = app
                    .session
                    .path()
                    .and_then(|p| p.parent())
                    .filter(|d| !d.as_os_str().is_empty())
                    .map(|d| format!("{}/", d.display()))
                    .unwrap_or_default();
                app.open_prompt(PromptKind::Open, &dir);
            }
            _ => {}
        }
        return;
    }

    let selected = app.session.selected_index();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,

        // Selection
        KeyCode::Up | KeyCode::Char('k') => app.session.navigate(Direction::Up),
        KeyCode::Down | KeyCode::Char('j') => app.session.navigate(Direction::Down),
        KeyCode::Left | KeyCode::Char('h') => app.session.navigate(Direction::Left),
        KeyCode::Right | KeyCode::Char('l') => app.session.navigate(Direction::Right),

        // Columns: 4 completes the task and stamps the date
        KeyCode::Char(c @ '1'..='4') => {
            if let Some(index) = selected {
                let column = Column::ALL[c as usize - '1' as usize];
                let result = if column == Column::Done {
                    app.session.mark_done(index, task_ops::today())
                } else {
                    app.session.set_state(index, column)
                };
                app.report(result);
            }
        }

        // Priority
        KeyCode::Char('p') => {
            if let Some(index) = selected {
                let result = app.session.advance_priority(index);
                app.report(result);
            }
        }
        KeyCode::Char(c @ 'A'..='E') => {
            if let Some(index) = selected {
                let result = app.session.set_priority(index, Priority::new(c));
                app.report(result);
            }
        }
        KeyCode::Char('-') => {
            if let Some(index) = selected {
                let result = app.session.set_priority(index, None);
                app.report(result);
            }
        }

        KeyCode::Char('t') => {
            if let Some(index) = selected {
                let result = app.session.add_date(index, task_ops::today());
                app.report(result);
            }
        }

        // Line order
        KeyCode::Char('J') => {
            if let Some(index) = selected {
                let result = app.session.move_line_down(index);
                app.report(result);
            }
        }
        KeyCode::Char('K') => {
            if let Some(index) = selected {
                let result = app.session.move_line_up(index);
                app.report(result);
            }
        }

        // Adding, editing, removing
        KeyCode::Char('n') => {
            if app.session.is_filtering() {
                app.session
                    .set_warning("clear the filter (Esc) before adding tasks");
            } else {
                app.open_prompt(PromptKind::NewTask, "");
            }
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            if let Some(index) = selected {
                let line = app.session.line(index).unwrap_or_default().to_string();
                app.open_prompt(PromptKind::EditTask(index), &line);
            }
        }
        KeyCode::Delete => {
            if let Some(index) = selected {
                if app.preferences().ask_for_delete {
                    app.ask(ConfirmAction::Delete(index));
                } else {
                    let result = app.session.remove_line(index);
                    app.report(result);
                }
            }
        }

        // Filtering
        KeyCode::Char('/') => {
            let query = app
                .session
                .filter_query()
                .map(|(q, _)| q.to_string())
                .unwrap_or_default();
            app.open_prompt(PromptKind::Filter, &query);
        }
        KeyCode::Char('r') => {
            app.filter_regex = !app.filter_regex;
            let query = app.session.filter_query().map(|(q, _)| q.to_string());
            if let Some(query) = query {
                let result = app.session.apply_filter(&query, app.filter_regex);
                app.report(result);
            }
            if app.session.status().is_none() {
                let kind = if app.filter_regex { "regex" } else { "text" };
                app.session.set_info(format!("filter matches {}", kind));
            }
        }
        KeyCode::Esc => {
            let result = app.session.clear_filter();
            app.report(result);
        }

        // Display
        KeyCode::Char('s') => {
            let strategy = app.session.strategy().next();
            app.session.set_strategy(strategy);
            let result = app.prefs.set_sort_strategy(strategy);
            app.report(result.map(|_| ()).map_err(Into::into));
            if app.session.status().is_none() {
                app.session
                    .set_info(format!("sort: {}", strategy.label()));
            }
        }
        KeyCode::Char('o') => {
            app.options_cursor = 0;
            app.mode = Mode::Options;
        }
        KeyCode::Char('R') => {
            let names = app.preferences().column_names().join(" | ");
            app.open_prompt(PromptKind::RenameColumns, &names);
        }
        KeyCode::Char('T') => {
            let dark = app.theme == Theme::dark();
            app.set_darkmode(!dark);
        }

        // Files
        KeyCode::Char('w') => {
            if app.session.path().is_some() {
                let result = app.session.save();
                app.report(result);
                if app.session.status().is_none() {
                    app.session.set_info("saved");
                }
            } else {
                app.open_prompt(PromptKind::SaveAs, "");
            }
        }
        KeyCode::Char('W') => {
            let current = app
                .session
                .path()
                .map(|p| p.display().to_string())
                .unwrap_or_default();
            app.open_prompt(PromptKind::SaveAs, &current);
        }
        _ => {}
    }
}
