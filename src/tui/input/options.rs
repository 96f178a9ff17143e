use crossterm::event::{KeyCode, KeyEvent};

use crate::model::config::Toggle;
use crate::tui::app::{App, Mode};

pub(super) fn handle_options(app: &mut App, key: KeyEvent) {
    let last = Toggle::ALL.len() - 1;
    match key.code {
        KeyCode::Esc | KeyCode::Char('o') | KeyCode::Char('q') => {
            app.mode = Mode::Navigate;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.options_cursor = app.options_cursor.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.options_cursor = (app.options_cursor + 1).min(last);
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            let toggle = Toggle::ALL[app.options_cursor.min(last)];
            let value = !toggle.get(app.preferences());
            let result = app.prefs.set_toggle(toggle, value);
            app.report(result.map(|_| ()).map_err(Into::into));
        }
        _ => {}
    }
}
