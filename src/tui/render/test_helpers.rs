use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::io::config_io::PreferencesStore;
use crate::model::config::Preferences;
use crate::ops::sort::SortStrategy;
use crate::session::Session;
use crate::tui::app::App;

pub const TERM_W: u16 = 100;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// An App over an in-memory document with default preferences
pub fn app_with_doc(doc: &str) -> App {
    App::new(
        Session::new(doc, SortStrategy::Priority),
        PreferencesStore::in_memory(Preferences::default()),
    )
}

pub const SAMPLE_DOC: &str = "\
(A) 2024-05-01 Call the bank +money @phone
Buy milk @store
Write report k:do due:friday
Review PR k:wt
x 2024-05-03 2024-05-01 Pay rent +home";
