use crossterm::event::{KeyCode, KeyEvent};

use crate::session::Placement;
use crate::tui::app::{App, ConfirmAction, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) {
    let Some(action) = app.confirm.take() else {
        app.mode = Mode::Navigate;
        return;
    };

    let answered = match (&action, key.code) {
        (ConfirmAction::Delete(index), KeyCode::Char('y')) => {
            let result = app.session.remove_line(*index);
            app.report(result);
            true
        }
        (ConfirmAction::Delete(_), KeyCode::Char('n') | KeyCode::Esc) => true,

        (ConfirmAction::Placement { text, after }, KeyCode::Char('a')) => {
            let result = app.session.add_task(text, Placement::After(*after)).map(|_| ());
            app.report(result);
            true
        }
        (ConfirmAction::Placement { text, .. }, KeyCode::Char('e') | KeyCode::Enter) => {
            let result = app.session.add_task(text, Placement::End).map(|_| ());
            app.report(result);
            true
        }
        (ConfirmAction::Placement { .. }, KeyCode::Esc) => true,
        _ => false,
    };

    if answered {
        app.mode = Mode::Navigate;
    } else {
        // anything else keeps the question open
        app.confirm = Some(action);
    }
}
