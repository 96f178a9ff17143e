use std::cmp::Ordering;

use crate::model::task::TaskRecord;

/// How tasks are ordered inside each board column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStrategy {
    /// (A) first, tasks without priority last
    #[default]
    Priority,
    /// Tasks without priority first, (A) last
    PriorityReversed,
    /// Order of definition in the file
    DocumentOrder,
    /// Reverse order of definition in the file
    DocumentOrderReversed,
    /// Subject text, ignoring priority, dates and tags
    Subject,
    /// Whole line text
    RawText,
    /// Project tags, untagged tasks last
    Project,
    /// Context tags, untagged tasks last
    Context,
}

impl SortStrategy {
    /// All strategies, in the order they are persisted and presented
    pub const ALL: [SortStrategy; 8] = [
        SortStrategy::Priority,
        SortStrategy::PriorityReversed,
        SortStrategy::DocumentOrder,
        SortStrategy::DocumentOrderReversed,
        SortStrategy::Subject,
        SortStrategy::RawText,
        SortStrategy::Project,
        SortStrategy::Context,
    ];

    /// Strategy stored under `sort_method = <position>`
    pub fn from_position(position: usize) -> Option<SortStrategy> {
        Self::ALL.get(position).copied()
    }

    pub fn position(self) -> usize {
        Self::ALL
            .iter()
            .position(|s| *s == self)
            .unwrap_or_default()
    }

    /// The strategy after this one, wrapping around
    pub fn next(self) -> SortStrategy {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn label(self) -> &'static str {
        match self {
            SortStrategy::Priority => "Task priority",
            SortStrategy::PriorityReversed => "Reversed task priority",
            SortStrategy::DocumentOrder => "Order in txt file",
            SortStrategy::DocumentOrderReversed => "Reversed order in txt file",
            SortStrategy::Subject => "Alphabetically by subject",
            SortStrategy::RawText => "Alphabetically by text",
            SortStrategy::Project => "Alphabetically by project",
            SortStrategy::Context => "Alphabetically by context",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            SortStrategy::Priority => {
                "(A) first, then (B)... up to (Z); tasks without priority last"
            }
            SortStrategy::PriorityReversed => {
                "tasks without priority first, then (Z)... up to (A)"
            }
            SortStrategy::DocumentOrder => "earlier lines in the file appear higher",
            SortStrategy::DocumentOrderReversed => "later lines in the file appear higher",
            SortStrategy::Subject => "subject text, without priority, dates or tags",
            SortStrategy::RawText => "the whole line, including priority and dates",
            SortStrategy::Project => "project tags, alphabetized per task; untagged last",
            SortStrategy::Context => "context tags, alphabetized per task; untagged last",
        }
    }

    /// Compare two tasks. Only the primary key is reversed for the reversed
    /// strategies; ties always fall back to document order.
    pub fn compare(self, a: &TaskRecord, b: &TaskRecord) -> Ordering {
        let primary = match self {
            SortStrategy::Priority => priority_key(a).cmp(&priority_key(b)),
            SortStrategy::PriorityReversed => priority_key(b).cmp(&priority_key(a)),
            SortStrategy::DocumentOrder => a.index.cmp(&b.index),
            SortStrategy::DocumentOrderReversed => b.index.cmp(&a.index),
            SortStrategy::Subject => a.subject.cmp(&b.subject),
            SortStrategy::RawText => a.raw_text.cmp(&b.raw_text),
            SortStrategy::Project => {
                compare_tag_keys(tag_key(&a.project_tags, '+'), tag_key(&b.project_tags, '+'))
            }
            SortStrategy::Context => {
                compare_tag_keys(tag_key(&a.context_tags, '@'), tag_key(&b.context_tags, '@'))
            }
        };
        primary.then(a.index.cmp(&b.index))
    }
}

/// Sort tasks in place. Equal keys keep document order.
pub fn sort_tasks(tasks: &mut [TaskRecord], strategy: SortStrategy) {
    tasks.sort_by(|a, b| strategy.compare(a, b));
}

/// Missing priority sorts after `Z`
fn priority_key(task: &TaskRecord) -> u8 {
    task.priority.map_or(u8::MAX, |p| p.letter() as u8)
}

/// Case-folded tags without their marker, alphabetized and joined.
/// `None` for a task without tags.
fn tag_key(tags: &[String], marker: char) -> Option<String> {
    if tags.is_empty() {
        return None;
    }
    let mut folded: Vec<String> = tags
        .iter()
        .map(|t| t.strip_prefix(marker).unwrap_or(t).to_lowercase())
        .collect();
    folded.sort();
    Some(folded.join(" "))
}

/// Untagged tasks go after every tagged one
fn compare_tag_keys(a: Option<String>, b: Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_indexed;
    use pretty_assertions::assert_eq;

    fn tasks(lines: &[&str]) -> Vec<TaskRecord> {
        parse_indexed(lines.iter().copied().enumerate())
    }

    fn order(tasks: &[TaskRecord]) -> Vec<usize> {
        tasks.iter().map(|t| t.index).collect()
    }

    #[test]
    fn priority_missing_sorts_last_and_ties_keep_order() {
        let mut t = tasks(&["none 1", "(B) b1", "(A) a", "none 2", "(B) b2"]);
        sort_tasks(&mut t, SortStrategy::Priority);
        assert_eq!(order(&t), vec![2, 1, 4, 0, 3]);
    }

    #[test]
    fn priority_reversed_keeps_tie_order() {
        let mut t = tasks(&["none 1", "(B) b1", "(A) a", "none 2", "(B) b2"]);
        sort_tasks(&mut t, SortStrategy::PriorityReversed);
        assert_eq!(order(&t), vec![0, 3, 1, 4, 2]);
    }

    #[test]
    fn document_order_both_ways() {
        let mut t = tasks(&["c", "a", "b"]);
        sort_tasks(&mut t, SortStrategy::DocumentOrderReversed);
        assert_eq!(order(&t), vec![2, 1, 0]);
        sort_tasks(&mut t, SortStrategy::DocumentOrder);
        assert_eq!(order(&t), vec![0, 1, 2]);
    }

    #[test]
    fn subject_ignores_head_but_raw_text_does_not() {
        let mut t = tasks(&["(A) zebra", "apple", "(C) mango"]);
        sort_tasks(&mut t, SortStrategy::Subject);
        assert_eq!(order(&t), vec![1, 2, 0]);
        sort_tasks(&mut t, SortStrategy::RawText);
        assert_eq!(order(&t), vec![0, 2, 1]);
    }

    #[test]
    fn project_sort_example() {
        let mut t = tasks(&["one +b", "two +a +c", "three"]);
        sort_tasks(&mut t, SortStrategy::Project);
        assert_eq!(order(&t), vec![1, 0, 2]);
    }

    #[test]
    fn project_tags_are_case_folded_and_alphabetized() {
        let mut t = tasks(&["x1 +Zeta +alpha", "x2 +Beta", "x3 +ALPHA +zeta"]);
        sort_tasks(&mut t, SortStrategy::Project);
        // "alpha zeta" (0) == "alpha zeta" (2) < "beta" (1)
        assert_eq!(order(&t), vec![0, 2, 1]);
    }

    #[test]
    fn context_sort_untagged_last() {
        let mut t = tasks(&["plain", "call @phone", "shop @errands"]);
        sort_tasks(&mut t, SortStrategy::Context);
        assert_eq!(order(&t), vec![2, 1, 0]);
    }

    #[test]
    fn sorting_twice_is_stable() {
        let lines = ["(B) x", "(A) y", "(B) z", "w", "(A) v"];
        for strategy in SortStrategy::ALL {
            let mut first = tasks(&lines);
            sort_tasks(&mut first, strategy);
            let mut second = first.clone();
            sort_tasks(&mut second, strategy);
            assert_eq!(order(&first), order(&second), "{:?}", strategy);
        }
    }

    #[test]
    fn positions_round_trip_and_cycle() {
        for (i, s) in SortStrategy::ALL.iter().enumerate() {
            assert_eq!(s.position(), i);
            assert_eq!(SortStrategy::from_position(i), Some(*s));
        }
        assert_eq!(SortStrategy::from_position(8), None);
        assert_eq!(SortStrategy::Context.next(), SortStrategy::Priority);
    }
}
