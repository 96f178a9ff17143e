use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::debug;

/// Events sent from the file watcher to the TUI event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileEvent {
    /// The watched document changed on disk.
    Changed(PathBuf),
}

/// Watches a single todo.txt file for changes made by other programs.
///
/// The parent directory is watched rather than the file itself, since
/// editors and our own atomic writes replace the file instead of
/// modifying it in place.
pub struct DocumentWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<FileEvent>,
}

impl DocumentWatcher {
    /// Start watching `path`. `poll()` should be called each tick.
    pub fn start(path: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name: Option<OsString> = path.file_name().map(|n| n.to_os_string());

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(_) => return,
                };

                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }

                if let Some(changed) = event
                    .paths
                    .into_iter()
                    .find(|p| p.file_name().map(|n| n.to_os_string()) == file_name)
                {
                    let _ = tx.send(FileEvent::Changed(changed));
                }
            },
            Config::default(),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        debug!(path = %path.display(), "watching document");
        Ok(DocumentWatcher {
            _watcher: watcher,
            rx,
        })
    }

    /// Non-blocking poll for pending file events.
    /// Returns all queued events (may be empty).
    pub fn poll(&self) -> Vec<FileEvent> {
        let mut events = Vec::new();
        while let Ok(evt) = self.rx.try_recv() {
            events.push(evt);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn starts_quiet_on_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("todo.txt");
        std::fs::write(&path, "Buy milk\n").unwrap();

        let watcher = DocumentWatcher::start(&path).unwrap();
        assert!(watcher.poll().is_empty());
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("no/such/dir/todo.txt");
        assert!(DocumentWatcher::start(&path).is_err());
    }
}
