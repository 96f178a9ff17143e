use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Error type for reading and writing todo.txt documents
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

/// Read a whole document. Files are UTF-8.
pub fn read_document(path: &Path) -> Result<String, DocumentError> {
    let text = fs::read_to_string(path).map_err(|e| DocumentError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "read document");
    Ok(text)
}

/// Write a whole document, replacing the file atomically.
pub fn write_document(path: &Path, text: &str) -> Result<(), DocumentError> {
    atomic_write(path, text.as_bytes()).map_err(|e| DocumentError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(path = %path.display(), bytes = text.len(), "saved document");
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Path a save-as target should get: a bare name gains `.todo.txt`.
pub fn with_todo_extension(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if name.ends_with(".txt") {
        path.to_path_buf()
    } else {
        path.with_file_name(format!("{}.todo.txt", name))
    }
}

/// Window title for a document
pub fn document_title(path: Option<&Path>) -> String {
    match path.and_then(|p| p.file_name()) {
        Some(name) => format!("KanbanTxt - {}", name.to_string_lossy()),
        None => "KanbanTxt".to_string(),
    }
}
