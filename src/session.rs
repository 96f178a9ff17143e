//! One open document: its text, the active filter, the current selection,
//! the sort strategy and the board built from all of that.
//!
//! Every command addresses tasks by their true index (their line number in
//! the full document). While a filter is active, line edits go through the
//! filter mapping: the filtered view is edited, then merged back into the
//! full document, so lines outside the view are never touched.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::io::config_io::ConfigError;
use crate::io::document_io::{
    DocumentError, document_title, read_document, with_todo_extension, write_document,
};
use crate::model::board::Board;
use crate::model::task::{Column, Priority, TaskRecord};
use crate::ops::document_ops::{self, DocumentOpError};
use crate::ops::filter::{FilterError, FilterPattern, FilteredView, apply_filter};
use crate::ops::sort::SortStrategy;
use crate::ops::task_ops;
use crate::parse::parse_indexed;

/// Delay between the last filter keystroke and re-filtering
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(150);
/// Delay between the last change on disk and reloading the document
pub const RELOAD_DEBOUNCE: Duration = Duration::from_millis(300);

const FILTER_TITLE_SUFFIX: &str = " !! FILTER VIEW ACTIVE !!";

/// Error type for session commands
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Filter(#[from] FilterError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Line(#[from] DocumentOpError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Deferred work with a deadline. Scheduling again replaces the pending
/// deadline, so only the last request in a burst fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReparseScheduler {
    deadline: Option<Instant>,
}

impl ReparseScheduler {
    pub fn schedule(&mut self, now: Instant, delay: Duration) {
        self.deadline = Some(now + delay);
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// True once the deadline has passed. Fires at most once per schedule.
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
}

/// A one-line message for the status row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub level: StatusLevel,
}

/// Where a new task goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// After the last task of the document
    End,
    /// Right below the line with this true index
    After(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone)]
struct ActiveFilter {
    query: String,
    use_regex: bool,
    view: FilteredView,
}

#[derive(Debug, Clone)]
pub struct Session {
    document: String,
    path: Option<PathBuf>,
    filter: Option<ActiveFilter>,
    strategy: SortStrategy,
    board: Board,
    /// True index of the selected task
    selected: Option<usize>,
    pending_filter: Option<(String, bool)>,
    filter_scheduler: ReparseScheduler,
    reload_scheduler: ReparseScheduler,
    status: Option<StatusMessage>,
}

impl Session {
    /// An in-memory session; nothing is written until `save_as`.
    pub fn new(document: impl Into<String>, strategy: SortStrategy) -> Self {
        let mut session = Session {
            document: document.into(),
            path: None,
            filter: None,
            strategy,
            board: Board::default(),
            selected: None,
            pending_filter: None,
            filter_scheduler: ReparseScheduler::default(),
            reload_scheduler: ReparseScheduler::default(),
            status: None,
        };
        session.refresh(None);
        session
    }

    /// Open the document at `path`. A file that doesn't exist yet starts
    /// empty and is created by the first change.
    pub fn open(path: &Path, strategy: SortStrategy) -> Result<Self, SessionError> {
        let text = if path.exists() {
            read_document(path)?
        } else {
            info!(path = %path.display(), "new document");
            String::new()
        };
        let mut session = Session::new(text, strategy);
        session.path = Some(path.to_path_buf());
        Ok(session)
    }

    // -- Accessors --

    /// The full document text
    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn strategy(&self) -> SortStrategy {
        self.strategy
    }

    pub fn is_filtering(&self) -> bool {
        self.filter.is_some()
    }

    pub fn filter_query(&self) -> Option<(&str, bool)> {
        self.filter
            .as_ref()
            .map(|f| (f.query.as_str(), f.use_regex))
    }

    /// The text of the filtered view, if a filter is active
    pub fn filtered_text(&self) -> Option<&str> {
        self.filter.as_ref().map(|f| f.view.text.as_str())
    }

    pub fn title(&self) -> String {
        let mut title = document_title(self.path());
        if self.is_filtering() {
            title.push_str(FILTER_TITLE_SUFFIX);
        }
        title
    }

    /// "showing N of M tasks" while a filter is active
    pub fn filter_status(&self) -> Option<String> {
        self.filter.as_ref()?;
        let total = self
            .document
            .split('\n')
            .filter(|l| !l.trim().is_empty())
            .count();
        Some(format!("showing {} of {} tasks", self.board.total(), total))
    }

    pub fn status(&self) -> Option<&StatusMessage> {
        self.status.as_ref()
    }

    pub fn set_info(&mut self, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            level: StatusLevel::Info,
        });
    }

    pub fn set_warning(&mut self, text: impl Into<String>) {
        let text = text.into();
        warn!("{}", text);
        self.status = Some(StatusMessage {
            text,
            level: StatusLevel::Warning,
        });
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Raw text of the line with this true index
    pub fn line(&self, index: usize) -> Option<&str> {
        document_ops::line_at(&self.document, index)
    }

    // -- Selection --

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&TaskRecord> {
        self.selected.and_then(|i| self.board.find(i))
    }

    /// Select the task with true index `index` if it is on the board
    pub fn select(&mut self, index: usize) -> bool {
        if self.board.find(index).is_some() {
            self.selected = Some(index);
            true
        } else {
            false
        }
    }

    /// Move the selection on the board. Empty columns are skipped when
    /// moving sideways; the row is kept as close as the column allows.
    pub fn navigate(&mut self, direction: Direction) {
        let Some((column, row)) = self.selected.and_then(|i| self.board.position_of(i)) else {
            self.fix_selection(None);
            return;
        };
        let target = match direction {
            Direction::Up => self.clamped(column, row.saturating_sub(1)),
            Direction::Down => self.clamped(column, row + 1),
            Direction::Left => Column::ALL[..column.position()]
                .iter()
                .rev()
                .find_map(|c| self.clamped(*c, row)),
            Direction::Right => Column::ALL[column.position() + 1..]
                .iter()
                .find_map(|c| self.clamped(*c, row)),
        };
        if let Some(index) = target {
            self.selected = Some(index);
        }
    }

    /// Index of the task at `row` of `column`, or the last one above it
    fn clamped(&self, column: Column, row: usize) -> Option<usize> {
        let count = self.board.column_count(column);
        if count == 0 {
            return None;
        }
        self.board
            .task_at(column, row.min(count - 1))
            .map(|t| t.index)
    }

    /// Keep the selection on a visible task, preferring the spot a removed
    /// task occupied.
    fn fix_selection(&mut self, near: Option<(Column, usize)>) {
        if self.selected.is_some_and(|i| self.board.find(i).is_some()) {
            return;
        }
        self.selected = near
            .and_then(|(column, row)| self.clamped(column, row))
            .or_else(|| {
                Column::ALL
                    .iter()
                    .find_map(|c| self.board.task_at(*c, 0))
                    .map(|t| t.index)
            });
    }

    // -- Sorting --

    pub fn set_strategy(&mut self, strategy: SortStrategy) {
        if self.strategy != strategy {
            self.strategy = strategy;
            self.refresh(None);
        }
    }

    // -- Line edits (allowed while filtering) --

    pub fn set_state(&mut self, index: usize, column: Column) -> Result<(), SessionError> {
        self.edit_line(index, |line| task_ops::set_state(line, column))
    }

    pub fn set_priority(
        &mut self,
        index: usize,
        priority: Option<Priority>,
    ) -> Result<(), SessionError> {
        self.edit_line(index, |line| task_ops::set_priority(line, priority))
    }

    pub fn advance_priority(&mut self, index: usize) -> Result<(), SessionError> {
        self.edit_line(index, task_ops::advance_priority)
    }

    pub fn add_date(&mut self, index: usize, today: NaiveDate) -> Result<(), SessionError> {
        self.edit_line(index, |line| task_ops::add_date(line, today))
    }

    pub fn mark_done(&mut self, index: usize, today: NaiveDate) -> Result<(), SessionError> {
        self.edit_line(index, |line| task_ops::mark_done(line, today))
    }

    /// Replace a whole line. While filtering the new text must be a single
    /// non-empty line, so the view keeps one line per mapped task.
    pub fn replace_line(&mut self, index: usize, text: &str) -> Result<(), SessionError> {
        if self.is_filtering() && (text.trim().is_empty() || text.contains('\n')) {
            return Err(FilterError::StructuralEdit.into());
        }
        self.edit_line(index, |_| text.to_string())
    }

    fn edit_line<F>(&mut self, index: usize, edit: F) -> Result<(), SessionError>
    where
        F: FnOnce(&str) -> String,
    {
        match &mut self.filter {
            Some(filter) => {
                let visible = filter.view.mapping.visible_index(index).ok_or(
                    DocumentOpError::LineOutOfRange {
                        index,
                        len: document_ops::line_count(&self.document),
                    },
                )?;
                let view = document_ops::map_line(&filter.view.text, visible, edit)?;
                let merged = filter.view.mapping.merge(&self.document, &view)?;
                filter.view.text = view;
                self.document = merged;
            }
            None => {
                self.document = document_ops::map_line(&self.document, index, edit)?;
            }
        }
        self.commit(None);
        Ok(())
    }

    // -- Structural edits (refused while filtering) --

    /// Add a task. Returns its true index, or `None` for blank text.
    pub fn add_task(
        &mut self,
        text: &str,
        placement: Placement,
    ) -> Result<Option<usize>, SessionError> {
        self.ensure_unfiltered()?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(None);
        }
        let index = match placement {
            Placement::End => {
                let (document, index) = document_ops::append_line(&self.document, text)?;
                self.document = document;
                index
            }
            Placement::After(line) => {
                self.document = document_ops::insert_line(&self.document, line + 1, text)?;
                line + 1
            }
        };
        self.selected = Some(index);
        self.commit(None);
        Ok(Some(index))
    }

    pub fn remove_line(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_unfiltered()?;
        let near = self.board.position_of(index);
        self.document = document_ops::remove_line(&self.document, index)?;
        if self.selected == Some(index) {
            self.selected = None;
        } else if let Some(selected) = self.selected
            && selected > index
        {
            self.selected = Some(selected - 1);
        }
        self.commit(near);
        Ok(())
    }

    /// Swap a line with the one above it; the selection follows the line.
    pub fn move_line_up(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_unfiltered()?;
        let (document, moved) = document_ops::move_line_up(&self.document, index)?;
        self.finish_move(index, document, moved);
        Ok(())
    }

    pub fn move_line_down(&mut self, index: usize) -> Result<(), SessionError> {
        self.ensure_unfiltered()?;
        let (document, moved) = document_ops::move_line_down(&self.document, index)?;
        self.finish_move(index, document, moved);
        Ok(())
    }

    fn finish_move(&mut self, from: usize, document: String, to: usize) {
        if from == to {
            return;
        }
        self.document = document;
        if self.selected == Some(from) {
            self.selected = Some(to);
        } else if self.selected == Some(to) {
            self.selected = Some(from);
        }
        self.commit(None);
    }

    fn ensure_unfiltered(&self) -> Result<(), SessionError> {
        if self.is_filtering() {
            Err(FilterError::StructuralEdit.into())
        } else {
            Ok(())
        }
    }

    // -- Filtering --

    /// Show only the lines matching `query`. An empty query clears the filter.
    /// An invalid regex leaves the current view as it was.
    pub fn apply_filter(&mut self, query: &str, use_regex: bool) -> Result<(), SessionError> {
        self.pending_filter = None;
        self.filter_scheduler.cancel();
        if query.is_empty() {
            return self.clear_filter();
        }
        let pattern = FilterPattern::new(query, use_regex)?;
        let view = apply_filter(&self.document, &pattern);
        self.filter = Some(ActiveFilter {
            query: query.to_string(),
            use_regex,
            view,
        });
        self.refresh(None);
        Ok(())
    }

    /// Queue a filter for when typing pauses
    pub fn schedule_filter(&mut self, query: &str, use_regex: bool, now: Instant) {
        self.pending_filter = Some((query.to_string(), use_regex));
        self.filter_scheduler.schedule(now, FILTER_DEBOUNCE);
    }

    /// Merge the filtered view back and show the whole document again.
    /// On a failed merge the filter stays active and the document is untouched.
    pub fn clear_filter(&mut self) -> Result<(), SessionError> {
        self.pending_filter = None;
        self.filter_scheduler.cancel();
        let Some(filter) = &self.filter else {
            return Ok(());
        };
        self.document = filter.view.mapping.merge(&self.document, &filter.view.text)?;
        debug!(query = %filter.query, "cleared filter");
        self.filter = None;
        self.refresh(None);
        Ok(())
    }

    // -- Persistence --

    /// Write the document to its file. Sessions without a file do nothing.
    pub fn save(&self) -> Result<(), SessionError> {
        if let Some(path) = &self.path {
            write_document(path, &self.document)?;
        }
        Ok(())
    }

    /// Write the document to a new file and keep using that file.
    /// A bare name gains the `.todo.txt` extension.
    pub fn save_as(&mut self, path: &Path) -> Result<PathBuf, SessionError> {
        let path = with_todo_extension(path);
        write_document(&path, &self.document)?;
        self.path = Some(path.clone());
        Ok(path)
    }

    /// Replace the document with the file's current content. Refused while
    /// filtering. Returns whether anything changed.
    pub fn reload(&mut self) -> Result<bool, SessionError> {
        let Some(path) = self.path.clone() else {
            return Ok(false);
        };
        if self.is_filtering() {
            self.set_warning("file changed on disk; clear the filter to reload");
            return Ok(false);
        }
        let text = read_document(&path)?;
        if text == self.document {
            return Ok(false);
        }
        info!(path = %path.display(), "reloaded document");
        self.document = text;
        self.refresh(None);
        self.set_info("reloaded from disk");
        Ok(true)
    }

    /// The file changed on disk; reload once changes settle.
    pub fn schedule_reload(&mut self, now: Instant) {
        self.reload_scheduler.schedule(now, RELOAD_DEBOUNCE);
    }

    /// Run deferred work that is due. Returns whether the board changed.
    ///
    /// With `allow_reload` false a due reload stays pending: callers holding
    /// a true index (an open edit prompt or delete question) must not see
    /// line numbers shift under them.
    pub fn tick(&mut self, now: Instant, allow_reload: bool) -> bool {
        let mut changed = false;
        if self.filter_scheduler.take_due(now)
            && let Some((query, use_regex)) = self.pending_filter.take()
        {
            match self.apply_filter(&query, use_regex) {
                Ok(()) => changed = true,
                Err(e) => self.set_warning(e.to_string()),
            }
        }
        if allow_reload && self.reload_scheduler.take_due(now) {
            match self.reload() {
                Ok(reloaded) => changed |= reloaded,
                Err(e) => self.set_warning(e.to_string()),
            }
        }
        changed
    }

    /// Write the changed document and rebuild the board. A failed write
    /// keeps the in-memory text and shows a warning.
    fn commit(&mut self, near: Option<(Column, usize)>) {
        if let Err(e) = self.save() {
            self.set_warning(format!("{} (changes kept in memory)", e));
        }
        self.refresh(near);
    }

    fn refresh(&mut self, near: Option<(Column, usize)>) {
        self.board = match &self.filter {
            Some(filter) => Board::build(parse_indexed(filter.view.indexed_lines()), self.strategy),
            None => Board::from_document(&self.document, self.strategy),
        };
        self.fix_selection(near);
    }
}
