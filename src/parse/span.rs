use std::ops::Range;

/// Byte span of a token found by one of the whole-line scans
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpan {
    /// Byte range in the line (0-indexed, exclusive end)
    pub range: Range<usize>,
}

impl TokenSpan {
    pub fn new(start: usize, end: usize) -> Self {
        TokenSpan { range: start..end }
    }

    pub fn start(&self) -> usize {
        self.range.start
    }

    pub fn end(&self) -> usize {
        self.range.end
    }
}

/// Return `text[from..]` with every span cut out. Spans may overlap each
/// other and may start before `from`; only the part inside `from..` is removed.
pub fn cut_spans(text: &str, from: usize, spans: &[TokenSpan]) -> String {
    let mut ranges: Vec<Range<usize>> = spans
        .iter()
        .filter(|s| s.end() > from)
        .map(|s| s.start().max(from)..s.end().min(text.len()))
        .collect();
    ranges.sort_by_key(|r| r.start);

    let mut out = String::with_capacity(text.len().saturating_sub(from));
    let mut pos = from;
    for r in ranges {
        if r.start > pos {
            out.push_str(&text[pos..r.start]);
        }
        pos = pos.max(r.end);
    }
    if pos < text.len() {
        out.push_str(&text[pos..]);
    }
    out
}
