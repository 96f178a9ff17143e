use std::fmt;

use chrono::NaiveDate;

/// Reserved special key that routes a task to a board column
pub const KANBAN_KEY: &str = "k";
/// `k:do`: task is in progress
pub const KANBAN_VAL_IN_PROGRESS: &str = "do";
/// `k:wt`: task is waiting for validation
pub const KANBAN_VAL_VALIDATION: &str = "wt";

/// The four fixed board columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Backlog,
    InProgress,
    Validation,
    Done,
}

impl Column {
    /// Columns in board order, left to right
    pub const ALL: [Column; 4] = [
        Column::Backlog,
        Column::InProgress,
        Column::Validation,
        Column::Done,
    ];

    /// Position of the column on the board (0-based)
    pub fn position(self) -> usize {
        match self {
            Column::Backlog => 0,
            Column::InProgress => 1,
            Column::Validation => 2,
            Column::Done => 3,
        }
    }

    /// The `k:` value that routes a task into this column, if any.
    /// Backlog is the default and Done is driven by the `x ` marker.
    pub fn kanban_value(self) -> Option<&'static str> {
        match self {
            Column::InProgress => Some(KANBAN_VAL_IN_PROGRESS),
            Column::Validation => Some(KANBAN_VAL_VALIDATION),
            Column::Backlog | Column::Done => None,
        }
    }

    /// Map a `k:` value to its column. Unknown values return `None`.
    pub fn from_kanban_value(value: &str) -> Option<Column> {
        match value {
            KANBAN_VAL_IN_PROGRESS => Some(Column::InProgress),
            KANBAN_VAL_VALIDATION => Some(Column::Validation),
            _ => None,
        }
    }
}

/// A todo.txt priority letter, always `A` to `Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Priority(char);

impl Priority {
    pub const A: Priority = Priority('A');
    pub const B: Priority = Priority('B');
    pub const C: Priority = Priority('C');
    pub const D: Priority = Priority('D');
    pub const E: Priority = Priority('E');

    /// Validate a priority letter. Only uppercase ASCII letters are accepted.
    pub fn new(letter: char) -> Option<Priority> {
        letter.is_ascii_uppercase().then_some(Priority(letter))
    }

    pub fn letter(self) -> char {
        self.0
    }
}

impl fmt::Display for Priority {
    /// Formats as the todo.txt token, e.g. `(A)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.0)
    }
}

/// A `key:value` pair found anywhere in a task line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialKv {
    pub key: String,
    pub value: String,
}

/// One parsed task line.
///
/// Every field other than `raw_text` and `index` is derived from `raw_text`,
/// and the whole record is rebuilt on each parse pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRecord {
    /// The line exactly as it appears in the document
    pub raw_text: String,
    /// Line position in the full, unfiltered document
    pub index: usize,
    pub is_done: bool,
    pub priority: Option<Priority>,
    /// Creation date (the only date, or the second of two)
    pub start_date: Option<NaiveDate>,
    /// Completion date (the first of two dates)
    pub end_date: Option<NaiveDate>,
    /// Free text with tags and key/values removed
    pub subject: String,
    /// Project tags including the `+` marker
    pub project_tags: Vec<String>,
    /// Context tags including the `@` marker
    pub context_tags: Vec<String>,
    pub special_kv: Vec<SpecialKv>,
    /// Derived board column
    pub column: Column,
}

impl TaskRecord {
    /// Value of the first `k:` pair on the line, which is the one that routes
    /// the task. Later occurrences are ignored.
    pub fn kanban_value(&self) -> Option<&str> {
        self.special_kv
            .iter()
            .find(|kv| kv.key == KANBAN_KEY)
            .map(|kv| kv.value.as_str())
    }
}

/// A line of the document after parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedLine {
    /// An empty or whitespace-only line, kept verbatim
    Blank(String),
    Task(TaskRecord),
}

impl ParsedLine {
    /// The source text of the line
    pub fn raw_text(&self) -> &str {
        match self {
            ParsedLine::Blank(text) => text,
            ParsedLine::Task(task) => &task.raw_text,
        }
    }

    pub fn as_task(&self) -> Option<&TaskRecord> {
        match self {
            ParsedLine::Task(task) => Some(task),
            ParsedLine::Blank(_) => None,
        }
    }
}
