pub mod config_io;
pub mod document_io;
pub mod watcher;
