use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use insta::assert_snapshot;
use kanbantxt::model::{Board, Column, ParsedLine, Priority, TaskRecord};
use kanbantxt::ops::filter::{FilterError, FilterPattern, apply_filter};
use kanbantxt::ops::sort::{SortStrategy, sort_tasks};
use kanbantxt::ops::task_ops::{advance_priority, next_priority, set_state};
use kanbantxt::parse::{parse_indexed, parse_line};
use kanbantxt::session::{Session, SessionError};
use pretty_assertions::assert_eq;

fn fixture(name: &str) -> String {
    let path = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Could not read fixture {}: {}", name, e))
}

fn task(line: &str) -> TaskRecord {
    match parse_line(line, 0) {
        ParsedLine::Task(t) => t,
        ParsedLine::Blank(_) => panic!("expected a task for {:?}", line),
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn indices<'a>(tasks: impl Iterator<Item = &'a TaskRecord>) -> Vec<usize> {
    tasks.map(|t| t.index).collect()
}

const FIVE_LINES: &str = "Call bank\nPay rent +home\nBuy milk @store\nWalk dog\nFix bike";

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn parses_full_done_line() {
    let t = task("x 2023-01-02 2023-01-01 (A) Buy milk +groceries @store k:wt");
    assert!(t.is_done);
    assert_eq!(t.start_date, Some(date("2023-01-01")));
    assert_eq!(t.end_date, Some(date("2023-01-02")));
    assert_eq!(t.priority, Some(Priority::A));
    assert_eq!(t.subject, "Buy milk");
    assert_eq!(t.project_tags, vec!["+groceries"]);
    assert_eq!(t.context_tags, vec!["@store"]);
    assert_eq!(t.special_kv.len(), 1);
    assert_eq!(t.special_kv[0].key, "k");
    assert_eq!(t.special_kv[0].value, "wt");
    // done wins over the k:wt routing
    assert_eq!(t.column, Column::Done);
}

#[test]
fn board_fixture_columns() {
    let board = Board::from_document(&fixture("board.todo.txt"), SortStrategy::Priority);

    assert_eq!(board.total(), 8);
    assert_eq!(indices(board.column_tasks(Column::Backlog)), vec![2, 4, 9]);
    assert_eq!(indices(board.column_tasks(Column::InProgress)), vec![0, 6]);
    assert_eq!(indices(board.column_tasks(Column::Validation)), vec![1]);
    // (A) before the task without priority
    assert_eq!(indices(board.column_tasks(Column::Done)), vec![7, 5]);
}

#[test]
fn edge_case_fixture_parses_without_losing_lines() {
    let text = fixture("edge_cases.todo.txt");
    let board = Board::from_document(&text, SortStrategy::DocumentOrder);

    let lowercase = board
        .tasks()
        .iter()
        .find(|t| t.raw_text == "(a) lowercase priority")
        .unwrap();
    assert_eq!(lowercase.priority, None);

    let bad_date = board
        .tasks()
        .iter()
        .find(|t| t.raw_text.starts_with("2024-02-30"))
        .unwrap();
    assert_eq!(bad_date.start_date, None);

    let repeated = board
        .tasks()
        .iter()
        .find(|t| t.raw_text.starts_with("k:wt first"))
        .unwrap();
    assert_eq!(repeated.column, Column::Validation);

    let low = board
        .tasks()
        .iter()
        .find(|t| t.raw_text == "(Z) very low priority")
        .unwrap();
    assert_eq!(low.priority, Priority::new('Z'));
}

// ============================================================================
// State transitions
// ============================================================================

#[test]
fn set_state_moves_between_columns() {
    assert_eq!(set_state("Buy milk", Column::Done), "x Buy milk");
    assert_eq!(set_state("x Buy milk", Column::Backlog), "Buy milk");
    assert_eq!(set_state("Buy milk k:wt", Column::InProgress), "Buy milk k:do");
    assert_eq!(set_state("x Buy milk k:do", Column::Validation), "Buy milk k:wt");
}

#[test]
fn set_state_is_idempotent_and_routes_to_target() {
    let lines = [
        "Buy milk",
        "x Buy milk",
        "(A) 2024-01-10 Write report +work @office k:do",
        "Review k:wt due:2024-01-12",
        "k:wt first routes k:do",
        "x (A) 2024-01-05 Send invoice +work k:wt",
        "  leading space k:do",
    ];
    for line in lines {
        for column in Column::ALL {
            let once = set_state(line, column);
            let twice = set_state(&once, column);
            assert_eq!(twice, once, "not idempotent for {:?} -> {:?}", line, column);
            assert_eq!(task(&once).column, column, "wrong column for {:?}", once);
        }
    }
}

// ============================================================================
// Priority cycle
// ============================================================================

#[test]
fn priority_cycle_closes_after_six_steps() {
    let mut current = None;
    let mut seen = Vec::new();
    for _ in 0..6 {
        current = next_priority(current);
        seen.push(current.map(Priority::letter));
    }
    assert_eq!(
        seen,
        vec![Some('E'), Some('D'), Some('C'), Some('B'), Some('A'), None]
    );
}

#[test]
fn advance_priority_returns_to_the_starting_line() {
    for line in ["Buy milk", "x Buy milk +home", "2024-01-01 Dated task"] {
        let mut edited = line.to_string();
        for _ in 0..6 {
            edited = advance_priority(&edited);
        }
        assert_eq!(edited, line);
    }
}

// ============================================================================
// Sorting
// ============================================================================

#[test]
fn sort_is_stable_for_every_strategy() {
    let lines = ["same task", "same task", "same task", "same task"];
    for strategy in SortStrategy::ALL {
        let mut tasks = parse_indexed(lines.iter().copied().enumerate());
        sort_tasks(&mut tasks, strategy);
        let expected = if strategy == SortStrategy::DocumentOrderReversed {
            vec![3, 2, 1, 0]
        } else {
            vec![0, 1, 2, 3]
        };
        assert_eq!(indices(tasks.iter()), expected, "{:?}", strategy);
    }
}

#[test]
fn sort_by_project_puts_untagged_last() {
    let lines = ["Task one +b", "Task two +a +c", "Task three"];
    let mut tasks = parse_indexed(lines.iter().copied().enumerate());
    sort_tasks(&mut tasks, SortStrategy::Project);
    assert_eq!(indices(tasks.iter()), vec![1, 0, 2]);
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn filter_edit_merges_only_the_visible_line() {
    let view = apply_filter(FIVE_LINES, &FilterPattern::new("milk", false).unwrap());
    assert_eq!(view.text, "Buy milk @store");
    assert_eq!(view.mapping.true_indices(), &[2]);

    let merged = view.mapping.merge(FIVE_LINES, "x Buy milk @store").unwrap();
    let before: Vec<&str> = FIVE_LINES.split('\n').collect();
    let after: Vec<&str> = merged.split('\n').collect();
    assert_eq!(after.len(), before.len());
    for i in [0, 1, 3, 4] {
        assert_eq!(after[i], before[i]);
    }
    assert_eq!(after[2], "x Buy milk @store");
}

#[test]
fn merge_overflow_is_refused() {
    let view = apply_filter(FIVE_LINES, &FilterPattern::new("milk", false).unwrap());
    let err = view
        .mapping
        .merge(FIVE_LINES, "Buy milk @store\nsneaky new line")
        .unwrap_err();
    assert!(matches!(
        err,
        FilterError::MergeOverflow {
            expected: 1,
            actual: 2
        }
    ));
}

#[test]
fn session_filter_edit_then_clear() {
    let mut session = Session::new(FIVE_LINES, SortStrategy::DocumentOrder);
    session.apply_filter("MILK", false).unwrap();
    assert_eq!(session.filtered_text(), Some("Buy milk @store"));
    assert_eq!(session.filter_status().as_deref(), Some("showing 1 of 5 tasks"));

    session.set_priority(2, Some(Priority::B)).unwrap();
    session.set_state(2, Column::InProgress).unwrap();
    session.clear_filter().unwrap();

    assert!(!session.is_filtering());
    assert_snapshot!(session.document(), @r"
    Call bank
    Pay rent +home
    (B) Buy milk @store k:do
    Walk dog
    Fix bike
    ");
}

#[test]
fn session_refuses_structural_edits_while_filtering() {
    let mut session = Session::new(FIVE_LINES, SortStrategy::DocumentOrder);
    session.apply_filter("bike", false).unwrap();

    assert!(matches!(
        session.add_task("New one", kanbantxt::session::Placement::End),
        Err(SessionError::Filter(FilterError::StructuralEdit))
    ));
    assert!(matches!(
        session.remove_line(4),
        Err(SessionError::Filter(FilterError::StructuralEdit))
    ));
    assert!(matches!(
        session.replace_line(4, "Fix bike\nand car"),
        Err(SessionError::Filter(FilterError::StructuralEdit))
    ));
    assert_eq!(session.document(), FIVE_LINES);
}

#[test]
fn regex_filter_keeps_line_order() {
    let view = apply_filter(FIVE_LINES, &FilterPattern::new(r"^(Pay|Walk)", true).unwrap());
    assert_snapshot!(view.text, @r"
    Pay rent +home
    Walk dog
    ");
    assert_eq!(view.mapping.true_indices(), &[1, 3]);
}
