use std::ops::Range;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::model::task::{Column, ParsedLine, Priority, SpecialKv, TaskRecord};
use crate::ops::categorize::categorize;
use crate::parse::span::{TokenSpan, cut_spans};

/// `key:value` anywhere in the line, neither side containing `:` or whitespace
pub(crate) static SPECIAL_KV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^:\s]+):([^:\s]+)").expect("valid regex"));

/// ` +project`; the leading space is part of the match
static PROJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" (\+\S+)").expect("valid regex"));

/// ` @context`; the leading space is part of the match
static CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" (@\S+)").expect("valid regex"));

/// The done marker that opens a completed task
pub const DONE_MARKER: &str = "x ";

/// Length of a `YYYY-MM-DD` token
const DATE_LEN: usize = 10;

/// Positional fields at the start of a task line: done marker, priority, dates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LineHead {
    pub is_done: bool,
    /// Priority letter and the byte range of its `(X)` token
    pub priority: Option<(Priority, Range<usize>)>,
    /// Up to two dates with their byte ranges, in line order
    pub dates: Vec<(NaiveDate, Range<usize>)>,
    /// Where the date tokens start, or would be inserted
    pub date_slot: usize,
    /// Where the free text begins
    pub subject_start: usize,
}

/// Scan the positional head of a line. Each field is optional and must follow
/// the previous one with a single space; a field that does not match is
/// simply absent.
pub fn scan_head(line: &str) -> LineHead {
    let mut head = LineHead::default();
    let mut pos = 0;

    if line.starts_with(DONE_MARKER) {
        head.is_done = true;
        pos = DONE_MARKER.len();
    }

    if let Some(priority) = priority_at(line, pos) {
        head.priority = Some((priority, pos..pos + 3));
        pos = skip_separator(line, pos + 3);
    }

    head.date_slot = pos;
    while head.dates.len() < 2 {
        match date_at(line, pos) {
            Some(date) => {
                head.dates.push((date, pos..pos + DATE_LEN));
                pos = skip_separator(line, pos + DATE_LEN);
            }
            None => break,
        }
    }

    // `x 2023-01-02 2023-01-01 (A) ...`: priority written after the dates
    if head.priority.is_none()
        && !head.dates.is_empty()
        && let Some(priority) = priority_at(line, pos)
    {
        head.priority = Some((priority, pos..pos + 3));
        pos = skip_separator(line, pos + 3);
    }

    head.subject_start = pos;
    head
}

/// Parse one line of a document. Empty and whitespace-only lines are blank.
pub fn parse_line(line: &str, index: usize) -> ParsedLine {
    if line.trim().is_empty() {
        return ParsedLine::Blank(line.to_string());
    }
    ParsedLine::Task(parse_task(line, index))
}

/// Parse a whole document, one entry per `\n`-separated line.
pub fn parse_document(text: &str) -> Vec<ParsedLine> {
    text.split('\n')
        .enumerate()
        .map(|(index, line)| parse_line(line, index))
        .collect()
}

/// Parse lines that carry their own true index (e.g. a filtered view),
/// skipping blanks.
pub fn parse_indexed<'a, I>(lines: I) -> Vec<TaskRecord>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    lines
        .into_iter()
        .filter_map(|(index, line)| match parse_line(line, index) {
            ParsedLine::Task(task) => Some(task),
            ParsedLine::Blank(_) => None,
        })
        .collect()
}

/// Parse a non-blank task line into a record.
fn parse_task(line: &str, index: usize) -> TaskRecord {
    let head = scan_head(line);

    let mut spans = Vec::new();

    let special_kv: Vec<SpecialKv> = SPECIAL_KV_RE
        .captures_iter(line)
        .map(|caps| {
            let whole = caps.get(0).expect("group 0 always present");
            spans.push(TokenSpan::new(whole.start(), whole.end()));
            SpecialKv {
                key: caps[1].to_string(),
                value: caps[2].to_string(),
            }
        })
        .collect();

    let project_tags = scan_tags(&PROJECT_RE, line, &mut spans);
    let context_tags = scan_tags(&CONTEXT_RE, line, &mut spans);

    let subject = cut_spans(line, head.subject_start, &spans)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");

    let (start_date, end_date) = match head.dates.as_slice() {
        [(only, _)] => (Some(*only), None),
        [(completed, _), (created, _)] => (Some(*created), Some(*completed)),
        _ => (None, None),
    };

    let mut task = TaskRecord {
        raw_text: line.to_string(),
        index,
        is_done: head.is_done,
        priority: head.priority.map(|(p, _)| p),
        start_date,
        end_date,
        subject,
        project_tags,
        context_tags,
        special_kv,
        column: Column::Backlog,
    };
    task.column = categorize(&task);
    task
}

/// Collect tag tokens (group 1) and record the whole match as a span.
fn scan_tags(re: &Regex, line: &str, spans: &mut Vec<TokenSpan>) -> Vec<String> {
    re.captures_iter(line)
        .map(|caps| {
            let whole = caps.get(0).expect("group 0 always present");
            spans.push(TokenSpan::new(whole.start(), whole.end()));
            caps[1].to_string()
        })
        .collect()
}

/// True if a token of `len` bytes at `pos` ends at a space or end of line
fn ends_token(line: &str, pos: usize, len: usize) -> bool {
    let end = pos + len;
    end == line.len() || line.as_bytes().get(end) == Some(&b' ')
}

/// Step over a single separating space, if present
fn skip_separator(line: &str, pos: usize) -> usize {
    if line.as_bytes().get(pos) == Some(&b' ') {
        pos + 1
    } else {
        pos
    }
}

/// `(X)` at `pos`
fn priority_at(line: &str, pos: usize) -> Option<Priority> {
    let bytes = line.as_bytes().get(pos..pos + 3)?;
    if bytes[0] != b'(' || bytes[2] != b')' || !ends_token(line, pos, 3) {
        return None;
    }
    Priority::new(bytes[1] as char)
}

/// `YYYY-MM-DD` at `pos`. Date-shaped tokens that are not real calendar
/// dates are not dates.
fn date_at(line: &str, pos: usize) -> Option<NaiveDate> {
    let bytes = line.as_bytes().get(pos..pos + DATE_LEN)?;
    let shaped = bytes.iter().enumerate().all(|(i, b)| match i {
        4 | 7 => *b == b'-',
        _ => b.is_ascii_digit(),
    });
    if !shaped || !ends_token(line, pos, DATE_LEN) {
        return None;
    }
    NaiveDate::parse_from_str(&line[pos..pos + DATE_LEN], "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn task(line: &str) -> TaskRecord {
        match parse_line(line, 0) {
            ParsedLine::Task(t) => t,
            ParsedLine::Blank(_) => panic!("expected a task for {:?}", line),
        }
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_parse_minimal_task() {
        let t = task("Buy milk");
        assert!(!t.is_done);
        assert_eq!(t.priority, None);
        assert_eq!(t.start_date, None);
        assert_eq!(t.subject, "Buy milk");
        assert_eq!(t.column, Column::Backlog);
    }

    #[test]
    fn test_parse_full_done_line() {
        let t = task("x 2023-01-02 2023-01-01 (A) Buy milk +groceries @store k:wt");
        assert!(t.is_done);
        assert_eq!(t.end_date, Some(date("2023-01-02")));
        assert_eq!(t.start_date, Some(date("2023-01-01")));
        assert_eq!(t.priority, Some(Priority::A));
        assert_eq!(t.subject, "Buy milk");
        assert_eq!(t.project_tags, vec!["+groceries"]);
        assert_eq!(t.context_tags, vec!["@store"]);
        assert_eq!(
            t.special_kv,
            vec![SpecialKv {
                key: "k".into(),
                value: "wt".into()
            }]
        );
        assert_eq!(t.column, Column::Done);
    }

    #[test]
    fn test_parse_priority_then_single_date() {
        let t = task("(B) 2024-03-05 Call mom @phone");
        assert_eq!(t.priority, Some(Priority::B));
        assert_eq!(t.start_date, Some(date("2024-03-05")));
        assert_eq!(t.end_date, None);
        assert_eq!(t.subject, "Call mom");
    }

    #[test]
    fn test_priority_must_lead_or_follow_dates() {
        // A priority in the middle of the text is just text
        let t = task("Call (A) mom");
        assert_eq!(t.priority, None);
        assert_eq!(t.subject, "Call (A) mom");

        // Lowercase is not a priority
        let t = task("(a) Call mom");
        assert_eq!(t.priority, None);
        assert_eq!(t.subject, "(a) Call mom");

        // Must be followed by a space
        let t = task("(A)Call mom");
        assert_eq!(t.priority, None);
    }

    #[test]
    fn test_done_marker_needs_space() {
        let t = task("xylophone lessons");
        assert!(!t.is_done);
        assert_eq!(t.subject, "xylophone lessons");

        let t = task("X Buy milk");
        assert!(!t.is_done);
    }

    #[test]
    fn test_invalid_date_fails_open() {
        let t = task("2023-13-45 Impossible date");
        assert_eq!(t.start_date, None);
        assert_eq!(t.subject, "2023-13-45 Impossible date");
    }

    #[test]
    fn test_three_dates_only_two_are_taken() {
        let t = task("2023-01-03 2023-01-02 2023-01-01 Task");
        assert_eq!(t.end_date, Some(date("2023-01-03")));
        assert_eq!(t.start_date, Some(date("2023-01-02")));
        assert_eq!(t.subject, "2023-01-01 Task");
    }

    #[test]
    fn test_tags_anywhere_keep_order() {
        let t = task("+first Write +docs for @home the +api @desk");
        // `+first` has no leading space so it is not a project tag
        assert_eq!(t.project_tags, vec!["+docs", "+api"]);
        assert_eq!(t.context_tags, vec!["@home", "@desk"]);
        assert_eq!(t.subject, "+first Write for the");
    }

    #[test]
    fn test_special_kv_scan_whole_line() {
        let t = task("due:2024-01-01 Pay rent k:do k:wt owner:me");
        let keys: Vec<_> = t
            .special_kv
            .iter()
            .map(|kv| (kv.key.as_str(), kv.value.as_str()))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("due", "2024-01-01"),
                ("k", "do"),
                ("k", "wt"),
                ("owner", "me")
            ]
        );
        assert_eq!(t.subject, "Pay rent");
        // First occurrence routes
        assert_eq!(t.column, Column::InProgress);
    }

    #[test]
    fn test_kv_with_extra_colon() {
        let t = task("Meet at 10:30:00 sharp");
        assert_eq!(t.special_kv.len(), 1);
        assert_eq!(t.special_kv[0].key, "10");
        assert_eq!(t.special_kv[0].value, "30");
    }

    #[test]
    fn test_tag_right_after_head_is_removed_from_subject() {
        let t = task("(A) +proj Fix it");
        assert_eq!(t.project_tags, vec!["+proj"]);
        assert_eq!(t.subject, "Fix it");
    }

    #[test]
    fn test_blank_lines() {
        assert_eq!(parse_line("", 3), ParsedLine::Blank(String::new()));
        assert_eq!(parse_line("   ", 3), ParsedLine::Blank("   ".into()));
    }

    #[test]
    fn test_parse_document_indices_are_contiguous() {
        let lines = parse_document("a\n\nb\nc");
        assert_eq!(lines.len(), 4);
        assert!(matches!(&lines[1], ParsedLine::Blank(_)));
        let indices: Vec<usize> = lines
            .iter()
            .filter_map(ParsedLine::as_task)
            .map(|t| t.index)
            .collect();
        assert_eq!(indices, vec![0, 2, 3]);
    }

    #[test]
    fn test_parse_indexed_keeps_given_indices() {
        let tasks = parse_indexed([(4, "a"), (7, ""), (9, "b")]);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].index, 4);
        assert_eq!(tasks[1].index, 9);
    }

    #[test]
    fn test_scan_head_spans() {
        let head = scan_head("x (C) 2020-02-02 rest");
        assert!(head.is_done);
        assert_eq!(head.priority, Some((Priority::C, 2..5)));
        assert_eq!(head.date_slot, 6);
        assert_eq!(head.dates.len(), 1);
        assert_eq!(head.dates[0].1, 6..16);
        assert_eq!(head.subject_start, 17);
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let line = "x (B) 2021-05-06 Write +report @work k:do due:fri";
        assert_eq!(parse_line(line, 5), parse_line(line, 5));
    }

    #[test]
    fn test_non_ascii_line() {
        let t = task("(A) Café résumé +été @maison");
        assert_eq!(t.subject, "Café résumé");
        assert_eq!(t.project_tags, vec!["+été"]);
        assert_eq!(t.context_tags, vec!["@maison"]);
    }
}
