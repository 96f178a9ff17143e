//! Whole-document line operations: editing, inserting, removing and
//! reordering task lines by their index.

/// Error type for document line operations
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DocumentOpError {
    #[error("line {index} is out of range (document has {len} lines)")]
    LineOutOfRange { index: usize, len: usize },
    #[error("a task line can't contain a newline")]
    EmbeddedNewline,
}

fn split(document: &str) -> Vec<&str> {
    document.split('\n').collect()
}

fn check(index: usize, len: usize) -> Result<(), DocumentOpError> {
    if index < len {
        Ok(())
    } else {
        Err(DocumentOpError::LineOutOfRange { index, len })
    }
}

fn check_single_line(line: &str) -> Result<(), DocumentOpError> {
    if line.contains('\n') {
        Err(DocumentOpError::EmbeddedNewline)
    } else {
        Ok(())
    }
}

/// The line at `index`
pub fn line_at(document: &str, index: usize) -> Option<&str> {
    document.split('\n').nth(index)
}

/// Number of lines, counting a trailing empty line
pub fn line_count(document: &str) -> usize {
    document.split('\n').count()
}

/// Apply `edit` to one line and return the new document.
pub fn map_line<F>(document: &str, index: usize, edit: F) -> Result<String, DocumentOpError>
where
    F: FnOnce(&str) -> String,
{
    let mut lines = split(document);
    check(index, lines.len())?;
    let edited = edit(lines[index]);
    check_single_line(&edited)?;
    lines[index] = &edited;
    Ok(lines.join("\n"))
}

/// Replace the line at `index` with `line`.
pub fn replace_line(document: &str, index: usize, line: &str) -> Result<String, DocumentOpError> {
    map_line(document, index, |_| line.to_string())
}

/// Insert `line` so that it becomes line `at`. `at` may equal the line count.
pub fn insert_line(document: &str, at: usize, line: &str) -> Result<String, DocumentOpError> {
    check_single_line(line)?;
    let mut lines = split(document);
    if at > lines.len() {
        return Err(DocumentOpError::LineOutOfRange {
            index: at,
            len: lines.len(),
        });
    }
    lines.insert(at, line);
    Ok(lines.join("\n"))
}

/// Add `line` as a new last task. A trailing empty line is reused rather
/// than leaving a blank gap. Returns the new document and the line's index.
pub fn append_line(document: &str, line: &str) -> Result<(String, usize), DocumentOpError> {
    check_single_line(line)?;
    let mut lines = split(document);
    match lines.last_mut() {
        Some(last) if last.is_empty() => *last = line,
        _ => lines.push(line),
    }
    let index = lines.len() - 1;
    Ok((lines.join("\n"), index))
}

/// Remove the line at `index`.
pub fn remove_line(document: &str, index: usize) -> Result<String, DocumentOpError> {
    let mut lines = split(document);
    check(index, lines.len())?;
    lines.remove(index);
    Ok(lines.join("\n"))
}

/// Swap the line at `index` with the one above it. Returns the new document
/// and the line's new index; the first line stays where it is.
pub fn move_line_up(document: &str, index: usize) -> Result<(String, usize), DocumentOpError> {
    let mut lines = split(document);
    check(index, lines.len())?;
    if index == 0 {
        return Ok((document.to_string(), 0));
    }
    lines.swap(index - 1, index);
    Ok((lines.join("\n"), index - 1))
}

/// Swap the line at `index` with the one below it. Returns the new document
/// and the line's new index; the last line stays where it is.
pub fn move_line_down(document: &str, index: usize) -> Result<(String, usize), DocumentOpError> {
    let mut lines = split(document);
    check(index, lines.len())?;
    if index + 1 == lines.len() {
        return Ok((document.to_string(), index));
    }
    lines.swap(index, index + 1);
    Ok((lines.join("\n"), index + 1))
}
