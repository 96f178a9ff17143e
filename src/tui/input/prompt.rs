use std::path::Path;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::info;

use crate::session::Placement;
use crate::tui::app::{App, ConfirmAction, PromptKind};

pub(super) fn handle_prompt(app: &mut App, key: KeyEvent) {
    let Some(prompt) = app.prompt.as_mut() else {
        app.close_prompt();
        return;
    };
    let input = &mut prompt.input;

    match (key.modifiers, key.code) {
        (_, KeyCode::Esc) => {
            let kind = prompt.kind;
            app.close_prompt();
            if kind == PromptKind::Filter {
                let result = app.session.clear_filter();
                app.report(result);
            }
            return;
        }
        (_, KeyCode::Enter) => {
            submit(app);
            return;
        }
        (m, KeyCode::Char('w')) if m.contains(KeyModifiers::CONTROL) => input.delete_word(),
        (m, KeyCode::Char('a')) if m.contains(KeyModifiers::CONTROL) => input.home(),
        (m, KeyCode::Char('e')) if m.contains(KeyModifiers::CONTROL) => input.end(),
        (m, KeyCode::Char(_)) if m.contains(KeyModifiers::CONTROL) => return,
        (_, KeyCode::Char(c)) => input.insert(c),
        (_, KeyCode::Backspace) => input.backspace(),
        (_, KeyCode::Delete) => input.delete(),
        (_, KeyCode::Left) => input.left(),
        (_, KeyCode::Right) => input.right(),
        (_, KeyCode::Home) => input.home(),
        (_, KeyCode::End) => input.end(),
        _ => return,
    }

    // live filtering while typing
    if prompt.kind == PromptKind::Filter {
        let query = prompt.input.text().to_string();
        let regex = app.filter_regex;
        app.session.schedule_filter(&query, regex, Instant::now());
    }
}

fn submit(app: &mut App) {
    let Some(prompt) = app.close_prompt() else {
        return;
    };
    // edits keep the line as typed; everything else ignores outer spaces
    let text = match prompt.kind {
        PromptKind::EditTask(_) => prompt.input.text().to_string(),
        _ => prompt.input.text().trim().to_string(),
    };

    match prompt.kind {
        PromptKind::NewTask => {
            if text.is_empty() {
                return;
            }
            let last_task = {
                let lines: Vec<&str> = app.session.document().split('\n').collect();
                lines.iter().rposition(|line| !line.trim().is_empty())
            };
            match (app.session.selected_index(), last_task) {
                (Some(after), Some(last))
                    if app.preferences().ask_for_new_task && after < last =>
                {
                    app.ask(ConfirmAction::Placement { text, after });
                }
                _ => {
                    let result = app.session.add_task(&text, Placement::End).map(|_| ());
                    app.report(result);
                }
            }
        }
        PromptKind::EditTask(index) => {
            if text.trim().is_empty() {
                app.session
                    .set_warning("a task can't be empty; use Delete to remove it");
                return;
            }
            let result = app.session.replace_line(index, &text);
            app.report(result);
        }
        PromptKind::Filter => {
            let result = app.session.apply_filter(&text, app.filter_regex);
            app.report(result);
        }
        PromptKind::SaveAs => {
            if text.is_empty() {
                return;
            }
            match app.session.save_as(Path::new(&text)) {
                Ok(path) => {
                    info!(path = %path.display(), "saved as");
                    app.session.set_info(format!("saved to {}", path.display()));
                    app.watch_document();
                }
                Err(e) => app.session.set_warning(e.to_string()),
            }
        }
        PromptKind::Open => {
            if !text.is_empty() {
                app.open_document(Path::new(&text));
            }
        }
        PromptKind::RenameColumns => {
            let names: Vec<String> = text.split('|').map(|n| n.trim().to_string()).collect();
            match <[String; 4]>::try_from(names) {
                Ok(names) => {
                    let result = app.prefs.rename_columns(names);
                    app.report(result.map(|_| ()).map_err(Into::into));
                }
                Err(_) => app
                    .session
                    .set_warning("enter four column names separated by |"),
            }
        }
    }
}
