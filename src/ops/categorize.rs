use crate::model::task::{Column, TaskRecord};

/// Decide which board column a task belongs to.
///
/// A done task is always in Done, whatever its `k:` value says. Otherwise the
/// first `k:` pair on the line routes the task; an unknown value, or no pair
/// at all, leaves it in the backlog.
pub fn categorize(task: &TaskRecord) -> Column {
    if task.is_done {
        return Column::Done;
    }
    task.kanban_value()
        .and_then(Column::from_kanban_value)
        .unwrap_or(Column::Backlog)
}
