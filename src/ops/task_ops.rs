use chrono::{Local, NaiveDate};

use crate::model::task::{Column, KANBAN_KEY, Priority};
use crate::parse::task_parser::{DONE_MARKER, SPECIAL_KV_RE, scan_head};

// ---------------------------------------------------------------------------
// State transitions
// ---------------------------------------------------------------------------

/// Move a task line to a board column.
///
/// Every `k:` pair and a leading done marker are removed first, then the
/// target is applied: `x ` is prepended for Done, ` k:do` / ` k:wt` appended
/// for In progress / Validation, nothing for Backlog. Applying the same target
/// twice gives the same line.
pub fn set_state(line: &str, target: Column) -> String {
    let stripped = strip_kanban_pairs(line);
    let bare = stripped.strip_prefix(DONE_MARKER).unwrap_or(&stripped);
    let bare = bare.trim_start_matches(' ');

    match (target, target.kanban_value()) {
        (Column::Done, _) => format!("{}{}", DONE_MARKER, bare),
        (_, Some(value)) if bare.is_empty() => format!("{}:{}", KANBAN_KEY, value),
        (_, Some(value)) => format!("{} {}:{}", bare, KANBAN_KEY, value),
        (_, None) => bare.to_string(),
    }
}

/// Remove every `k:value` pair together with one adjacent whitespace char.
fn strip_kanban_pairs(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut pos = 0;
    for caps in SPECIAL_KV_RE.captures_iter(line) {
        if &caps[1] != KANBAN_KEY {
            continue;
        }
        let whole = caps.get(0).expect("group 0 always present");
        let mut start = whole.start();
        let mut end = whole.end();
        match line[pos..start].chars().next_back() {
            Some(c) if c.is_whitespace() => start -= c.len_utf8(),
            _ => {
                if let Some(c) = line[end..].chars().next()
                    && c.is_whitespace()
                {
                    end += c.len_utf8();
                }
            }
        }
        out.push_str(&line[pos..start]);
        pos = end;
    }
    out.push_str(&line[pos..]);
    out
}

/// Mark a task done the way the board's Done command does: drop its priority,
/// stamp today's date, then set the done marker.
pub fn mark_done(line: &str, today: NaiveDate) -> String {
    let line = set_priority(line, None);
    let line = add_date(&line, today);
    set_state(&line, Column::Done)
}

// ---------------------------------------------------------------------------
// Priority
// ---------------------------------------------------------------------------

/// Replace, insert or remove the `(X)` priority token.
///
/// A new token goes right after the done marker (or at the start of the line).
/// Everything else on the line is kept as is.
pub fn set_priority(line: &str, priority: Option<Priority>) -> String {
    let head = scan_head(line);
    match (head.priority, priority) {
        (Some((_, range)), Some(new)) => {
            format!("{}{}{}", &line[..range.start], new, &line[range.end..])
        }
        (Some((_, range)), None) => {
            let end = if line.as_bytes().get(range.end) == Some(&b' ') {
                range.end + 1
            } else {
                range.end
            };
            format!("{}{}", &line[..range.start], &line[end..])
        }
        (None, Some(new)) => {
            let at = if head.is_done { DONE_MARKER.len() } else { 0 };
            format!("{}{} {}", &line[..at], new, &line[at..])
        }
        (None, None) => line.to_string(),
    }
}

/// The next rung of the priority cycle: none → E → D → C → B → A → none.
/// Priorities below E enter the cycle at E.
pub fn next_priority(current: Option<Priority>) -> Option<Priority> {
    match current.map(Priority::letter) {
        None => Some(Priority::E),
        Some('E') => Some(Priority::D),
        Some('D') => Some(Priority::C),
        Some('C') => Some(Priority::B),
        Some('B') => Some(Priority::A),
        Some('A') => None,
        Some(_) => Some(Priority::E),
    }
}

/// Step a task line one rung along the priority cycle.
pub fn advance_priority(line: &str) -> String {
    let current = scan_head(line).priority.map(|(p, _)| p);
    set_priority(line, next_priority(current))
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Stamp `today` into the date slot after the done marker and priority.
///
/// With no date the stamp becomes the creation date; with one date it is
/// inserted in front and becomes the completion date. A line that already
/// carries two dates is returned unchanged.
pub fn add_date(line: &str, today: NaiveDate) -> String {
    let head = scan_head(line);
    let stamp = today.format("%Y-%m-%d").to_string();
    match head.dates.as_slice() {
        [] => {
            let at = head.date_slot;
            let lead = if at > 0 && line.as_bytes()[at - 1] != b' ' {
                " "
            } else {
                ""
            };
            let trail = if at < line.len() { " " } else { "" };
            format!("{}{}{}{}{}", &line[..at], lead, stamp, trail, &line[at..])
        }
        [(_, existing)] => {
            let at = existing.start;
            format!("{}{} {}", &line[..at], stamp, &line[at..])
        }
        _ => line.to_string(),
    }
}

/// Today's date in local time
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}
