use crate::model::task::{Column, ParsedLine, TaskRecord};
use crate::ops::sort::{SortStrategy, sort_tasks};
use crate::parse::parse_document;

/// Parsed, categorized and sorted tasks ready for display
#[derive(Debug, Clone, Default)]
pub struct Board {
    /// All tasks in display order
    tasks: Vec<TaskRecord>,
}

impl Board {
    /// Sort `tasks` with `strategy` and group them for display.
    pub fn build(mut tasks: Vec<TaskRecord>, strategy: SortStrategy) -> Self {
        sort_tasks(&mut tasks, strategy);
        Board { tasks }
    }

    /// Parse a full document into a board
    pub fn from_document(text: &str, strategy: SortStrategy) -> Self {
        let tasks = parse_document(text)
            .into_iter()
            .filter_map(|line| match line {
                ParsedLine::Task(task) => Some(task),
                ParsedLine::Blank(_) => None,
            })
            .collect();
        Self::build(tasks, strategy)
    }

    pub fn tasks(&self) -> &[TaskRecord] {
        &self.tasks
    }

    /// Tasks of one column, in display order
    pub fn column_tasks(&self, column: Column) -> impl Iterator<Item = &TaskRecord> {
        self.tasks.iter().filter(move |t| t.column == column)
    }

    pub fn column_count(&self, column: Column) -> usize {
        self.column_tasks(column).count()
    }

    pub fn total(&self) -> usize {
        self.tasks.len()
    }

    /// Fraction of all tasks sitting in `column`, 0.0 for an empty board
    pub fn column_share(&self, column: Column) -> f64 {
        if self.tasks.is_empty() {
            0.0
        } else {
            self.column_count(column) as f64 / self.tasks.len() as f64
        }
    }

    /// Look a task up by its full-document index
    pub fn find(&self, index: usize) -> Option<&TaskRecord> {
        self.tasks.iter().find(|t| t.index == index)
    }

    /// Column and row at which the task with full-document `index` is shown
    pub fn position_of(&self, index: usize) -> Option<(Column, usize)> {
        let task = self.find(index)?;
        let row = self
            .column_tasks(task.column)
            .position(|t| t.index == index)?;
        Some((task.column, row))
    }

    /// The task shown at `row` of `column`
    pub fn task_at(&self, column: Column, row: usize) -> Option<&TaskRecord> {
        self.column_tasks(column).nth(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "\
(B) Write report k:do
Buy milk
x 2024-01-02 Pay rent

(A) Review PR k:do
Plan trip k:wt";

    #[test]
    fn groups_by_column_in_sorted_order() {
        let board = Board::from_document(DOC, SortStrategy::Priority);
        let in_progress: Vec<usize> = board
            .column_tasks(Column::InProgress)
            .map(|t| t.index)
            .collect();
        assert_eq!(in_progress, vec![4, 0]);
        assert_eq!(board.column_count(Column::Backlog), 1);
        assert_eq!(board.column_count(Column::Validation), 1);
        assert_eq!(board.column_count(Column::Done), 1);
        assert_eq!(board.total(), 5);
    }

    #[test]
    fn shares_sum_to_one() {
        let board = Board::from_document(DOC, SortStrategy::DocumentOrder);
        let sum: f64 = Column::ALL.iter().map(|c| board.column_share(*c)).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(Board::default().column_share(Column::Done), 0.0);
    }

    #[test]
    fn positions_follow_display_order() {
        let board = Board::from_document(DOC, SortStrategy::Priority);
        assert_eq!(board.position_of(4), Some((Column::InProgress, 0)));
        assert_eq!(board.position_of(0), Some((Column::InProgress, 1)));
        assert_eq!(board.position_of(3), None);
        assert_eq!(board.task_at(Column::Done, 0).map(|t| t.index), Some(2));
        assert!(board.task_at(Column::Done, 1).is_none());
    }
}
