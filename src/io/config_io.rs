use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use toml_edit::DocumentMut;
use tracing::{debug, warn};

use crate::io::document_io::atomic_write;
use crate::model::config::{Preferences, Toggle};
use crate::ops::sort::SortStrategy;

/// Error type for the preferences file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid preferences: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid preferences: {0}")]
    Syntax(#[from] toml_edit::TomlError),
    #[error("column name \"{0}\" is used more than once")]
    DuplicateColumnName(String),
    #[error("column names can't be empty")]
    EmptyColumnName,
}

/// Default location of the preferences file:
/// `$XDG_CONFIG_HOME/kanbantxt/config.toml`, else `~/.config/kanbantxt/config.toml`
pub fn preferences_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_home().join(".config"));
    config_dir.join("kanbantxt").join("config.toml")
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

/// Preferences plus the toml_edit document they were read from, so that
/// rewriting the file keeps comments and unknown keys.
#[derive(Debug, Clone)]
pub struct PreferencesStore {
    /// Where changes are written; `None` keeps everything in memory
    path: Option<PathBuf>,
    prefs: Preferences,
    doc: DocumentMut,
}

impl PreferencesStore {
    /// A store that never touches the disk
    pub fn in_memory(prefs: Preferences) -> Self {
        let mut store = PreferencesStore {
            path: None,
            prefs,
            doc: DocumentMut::new(),
        };
        store.sync_doc();
        store
    }

    /// Read preferences from `path`. A missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no preferences file, using defaults");
                String::new()
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        let prefs: Preferences = toml::from_str(&text)?;
        let doc: DocumentMut = text.parse()?;
        Ok(PreferencesStore {
            path: Some(path.to_path_buf()),
            prefs,
            doc,
        })
    }

    /// Like `load`, but an unreadable or invalid file falls back to the
    /// defaults. The error is handed back so it can be shown as a warning.
    pub fn load_or_default(path: &Path) -> (Self, Option<ConfigError>) {
        match Self::load(path) {
            Ok(store) => (store, None),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "falling back to default preferences");
                let store = PreferencesStore {
                    path: Some(path.to_path_buf()),
                    prefs: Preferences::default(),
                    doc: DocumentMut::new(),
                };
                (store, Some(e))
            }
        }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set a boolean preference. Returns whether anything changed.
    pub fn set_toggle(&mut self, toggle: Toggle, value: bool) -> Result<bool, ConfigError> {
        if toggle.get(&self.prefs) == value {
            return Ok(false);
        }
        toggle.set(&mut self.prefs, value);
        self.save()?;
        Ok(true)
    }

    pub fn set_darkmode(&mut self, darkmode: bool) -> Result<bool, ConfigError> {
        if self.prefs.darkmode == darkmode {
            return Ok(false);
        }
        self.prefs.darkmode = darkmode;
        self.save()?;
        Ok(true)
    }

    pub fn set_sort_strategy(&mut self, strategy: SortStrategy) -> Result<bool, ConfigError> {
        let position = strategy.position();
        if self.prefs.sort_method == position {
            return Ok(false);
        }
        self.prefs.sort_method = position;
        self.save()?;
        Ok(true)
    }

    /// Rename the four columns. Names are trimmed; empty or duplicate names
    /// are rejected and leave the current names in place.
    pub fn rename_columns(&mut self, names: [String; 4]) -> Result<bool, ConfigError> {
        let names = names.map(|n| n.trim().to_string());
        validate_column_names(&names)?;
        if names == self.prefs.column_names() {
            return Ok(false);
        }
        self.prefs.set_column_names(names);
        self.save()?;
        Ok(true)
    }

    /// Write every preference to the file. In-memory stores do nothing.
    pub fn save(&mut self) -> Result<(), ConfigError> {
        self.sync_doc();
        let Some(path) = &self.path else {
            return Ok(());
        };
        let write_err = |e| ConfigError::Write {
            path: path.clone(),
            source: e,
        };
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        atomic_write(path, self.doc.to_string().as_bytes()).map_err(write_err)?;
        debug!(path = %path.display(), "saved preferences");
        Ok(())
    }

    /// Copy current values into the document, leaving untouched keys
    /// (and their formatting) alone.
    fn sync_doc(&mut self) {
        let Ok(table) = toml::Table::try_from(&self.prefs) else {
            return;
        };
        for (key, value) in table {
            let current = self.doc.get(&key).and_then(|item| item.as_value());
            let new_value = match &value {
                toml::Value::Boolean(b) => {
                    if current.and_then(|v| v.as_bool()) == Some(*b) {
                        continue;
                    }
                    toml_edit::value(*b)
                }
                toml::Value::Integer(i) => {
                    if current.and_then(|v| v.as_integer()) == Some(*i) {
                        continue;
                    }
                    toml_edit::value(*i)
                }
                toml::Value::String(s) => {
                    if current.and_then(|v| v.as_str()) == Some(s.as_str()) {
                        continue;
                    }
                    toml_edit::value(s.as_str())
                }
                _ => continue,
            };
            self.doc[key.as_str()] = new_value;
        }
    }
}

/// Column names must be non-empty and pairwise distinct.
pub fn validate_column_names(names: &[String; 4]) -> Result<(), ConfigError> {
    for (i, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ConfigError::EmptyColumnName);
        }
        if names[..i].iter().any(|other| other.trim() == name.trim()) {
            return Err(ConfigError::DuplicateColumnName(name.trim().to_string()));
        }
    }
    Ok(())
}
