use regex::Regex;
use tracing::debug;

/// Error type for filtered-view operations
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("invalid filter pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
    #[error(
        "filtered view has {actual} lines but maps {expected}; refusing to merge it back"
    )]
    MergeOverflow { expected: usize, actual: usize },
    #[error("can't add, remove or reorder tasks while the filter view is active")]
    StructuralEdit,
}

/// Predicate deciding which lines a filter keeps
#[derive(Debug, Clone)]
pub enum FilterPattern {
    /// Case-insensitive substring containment
    Substring(String),
    /// Regular expression search anywhere in the line
    Regex(Regex),
}

impl FilterPattern {
    pub fn new(query: &str, use_regex: bool) -> Result<Self, FilterError> {
        if use_regex {
            Ok(FilterPattern::Regex(Regex::new(query)?))
        } else {
            Ok(FilterPattern::Substring(query.to_lowercase()))
        }
    }

    pub fn is_match(&self, line: &str) -> bool {
        match self {
            FilterPattern::Substring(needle) => line.to_lowercase().contains(needle.as_str()),
            FilterPattern::Regex(re) => re.is_match(line),
        }
    }
}

/// Maps each line of a filtered view to its line in the full document.
/// Indices are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMapping {
    true_indices: Vec<usize>,
}

impl FilterMapping {
    /// Number of lines in the filtered view
    pub fn len(&self) -> usize {
        self.true_indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.true_indices.is_empty()
    }

    /// Full-document index of a filtered-view line
    pub fn true_index(&self, visible: usize) -> Option<usize> {
        self.true_indices.get(visible).copied()
    }

    /// Filtered-view position of a full-document line, if it is shown
    pub fn visible_index(&self, true_index: usize) -> Option<usize> {
        self.true_indices.binary_search(&true_index).ok()
    }

    pub fn true_indices(&self) -> &[usize] {
        &self.true_indices
    }

    /// Write the (possibly edited) filtered lines back over their positions in
    /// the full document. Lines outside the mapping are left byte-identical.
    ///
    /// If the filtered view no longer has exactly one line per mapping entry
    /// the merge is refused and nothing is returned.
    pub fn merge(&self, full: &str, filtered: &str) -> Result<String, FilterError> {
        let filtered_lines = split_view(filtered, self.is_empty());
        if filtered_lines.len() != self.len() {
            return Err(FilterError::MergeOverflow {
                expected: self.len(),
                actual: filtered_lines.len(),
            });
        }

        let mut full_lines: Vec<&str> = full.split('\n').collect();
        for (visible, line) in filtered_lines.into_iter().enumerate() {
            let target = self.true_indices[visible];
            match full_lines.get_mut(target) {
                Some(slot) => *slot = line,
                None => {
                    return Err(FilterError::MergeOverflow {
                        expected: full_lines.len(),
                        actual: target + 1,
                    });
                }
            }
        }
        debug!(lines = self.len(), "merged filtered view into document");
        Ok(full_lines.join("\n"))
    }
}

/// The lines of a document that pass a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredView {
    /// Matching lines joined with `\n`
    pub text: String,
    pub mapping: FilterMapping,
}

impl FilteredView {
    /// Lines of the view paired with their full-document index
    pub fn indexed_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        split_view(&self.text, self.mapping.is_empty())
            .into_iter()
            .zip(self.mapping.true_indices.iter().copied())
            .map(|(line, index)| (index, line))
    }
}

/// Build the filtered view of `document`.
pub fn apply_filter(document: &str, pattern: &FilterPattern) -> FilteredView {
    let mut kept = Vec::new();
    let mut true_indices = Vec::new();
    for (index, line) in document.split('\n').enumerate() {
        if pattern.is_match(line) {
            kept.push(line);
            true_indices.push(index);
        }
    }
    debug!(
        shown = kept.len(),
        total = document.split('\n').count(),
        "applied filter"
    );
    FilteredView {
        text: kept.join("\n"),
        mapping: FilterMapping { true_indices },
    }
}

/// Split a filtered buffer into lines. An empty buffer of an empty view has
/// no lines at all rather than one empty line.
fn split_view(text: &str, empty_view: bool) -> Vec<&str> {
    if empty_view && text.is_empty() {
        Vec::new()
    } else {
        text.split('\n').collect()
    }
}
