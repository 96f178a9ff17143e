use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{info, warn};

use crate::io::config_io::{PreferencesStore, preferences_path};
use crate::io::watcher::DocumentWatcher;
use crate::model::config::Preferences;
use crate::session::{Session, SessionError};

use super::input;
use super::render;
use super::text_input::TextInput;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing into the prompt row
    Prompt,
    /// Waiting for an answer to a question in the status row
    Confirm,
    /// The options popup is open
    Options,
}

/// What the prompt row is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    NewTask,
    /// Editing the line with this true index
    EditTask(usize),
    Filter,
    SaveAs,
    /// Path of another document to open
    Open,
    RenameColumns,
}

impl PromptKind {
    pub fn label(self) -> &'static str {
        match self {
            PromptKind::NewTask => "new task: ",
            PromptKind::EditTask(_) => "edit: ",
            PromptKind::Filter => "/",
            PromptKind::SaveAs => "save as: ",
            PromptKind::Open => "open: ",
            PromptKind::RenameColumns => "columns: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub kind: PromptKind,
    pub input: TextInput,
}

/// A question awaiting a key press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Delete the line with this true index
    Delete(usize),
    /// Place a new task after the selected line or at the end
    Placement { text: String, after: usize },
}

impl ConfirmAction {
    pub fn question(&self) -> &'static str {
        match self {
            ConfirmAction::Delete(_) => "Delete this task? (y/n)",
            ConfirmAction::Placement { .. } => {
                "Add after the selected task (a) or at the end of the file (e)?"
            }
        }
    }
}

/// Main application state
pub struct App {
    pub session: Session,
    pub prefs: PreferencesStore,
    pub theme: Theme,
    pub mode: Mode,
    pub prompt: Option<Prompt>,
    pub confirm: Option<ConfirmAction>,
    /// Highlighted row of the options popup
    pub options_cursor: usize,
    /// Whether the next filter is a regex
    pub filter_regex: bool,
    pub watcher: Option<DocumentWatcher>,
    pub should_quit: bool,
}

impl App {
    pub fn new(session: Session, prefs: PreferencesStore) -> Self {
        let theme = Theme::for_mode(prefs.prefs().darkmode);
        App {
            session,
            prefs,
            theme,
            mode: Mode::Navigate,
            prompt: None,
            confirm: None,
            options_cursor: 0,
            filter_regex: false,
            watcher: None,
            should_quit: false,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        self.prefs.prefs()
    }

    /// Show a failed command as a warning; the board keeps its state.
    pub fn report(&mut self, result: Result<(), SessionError>) {
        if let Err(e) = result {
            self.session.set_warning(e.to_string());
        }
    }

    pub fn open_prompt(&mut self, kind: PromptKind, initial: &str) {
        self.prompt = Some(Prompt {
            kind,
            input: TextInput::new(initial),
        });
        self.mode = Mode::Prompt;
    }

    pub fn close_prompt(&mut self) -> Option<Prompt> {
        self.mode = Mode::Navigate;
        self.prompt.take()
    }

    pub fn ask(&mut self, action: ConfirmAction) {
        self.confirm = Some(action);
        self.mode = Mode::Confirm;
    }

    /// Watch the session's file for outside changes, replacing any
    /// previous watcher.
    pub fn watch_document(&mut self) {
        self.watcher = match self.session.path().map(DocumentWatcher::start) {
            Some(Ok(w)) => Some(w),
            Some(Err(e)) => {
                warn!(error = %e, "file watching disabled");
                None
            }
            None => None,
        };
    }

    /// Drain watcher events and run due work. Reloads wait until no prompt
    /// or question is open, since those hold a true line index.
    pub fn tick(&mut self, now: Instant) {
        if let Some(watcher) = &self.watcher
            && !watcher.poll().is_empty()
        {
            self.session.schedule_reload(now);
        }
        self.session.tick(now, self.mode == Mode::Navigate);
    }

    /// Switch to another document. An active filter is merged back first.
    /// A board that was never saved to a file is kept rather than dropped.
    pub fn open_document(&mut self, path: &Path) {
        if self.session.path().is_none() && !self.session.document().trim().is_empty() {
            self.session
                .set_warning("this board has no file yet; save it (w) before opening another");
            return;
        }
        if let Err(e) = self.session.clear_filter() {
            self.session.set_warning(e.to_string());
            return;
        }
        match Session::open(path, self.session.strategy()) {
            Ok(session) => {
                info!(path = %path.display(), "opened document");
                self.session = session;
                self.session.set_info(format!("opened {}", path.display()));
                self.watch_document();
            }
            Err(e) => self.session.set_warning(e.to_string()),
        }
    }

    pub fn set_darkmode(&mut self, darkmode: bool) {
        let result = self.prefs.set_darkmode(darkmode);
        self.theme = Theme::for_mode(darkmode);
        self.report(result.map(|_| ()).map_err(SessionError::from));
    }
}

/// Run the TUI. Without a path the board starts empty and `w` asks where
/// to save. `darkmode` forces the dark theme for this run without changing
/// the stored preference.
pub fn run(path: Option<&Path>, darkmode: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (prefs, prefs_error) = PreferencesStore::load_or_default(&preferences_path());
    let strategy = prefs.prefs().sort_strategy();

    let mut session = match path {
        Some(path) => Session::open(path, strategy)?,
        None => Session::new("", strategy),
    };
    if let Some(e) = prefs_error {
        session.set_warning(e.to_string());
    }

    let mut app = App::new(session, prefs);
    if darkmode {
        app.theme = Theme::dark();
    }
    app.watch_document();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("quit");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        app.tick(Instant::now());

        if app.should_quit {
            break;
        }
    }
    Ok(())
}
