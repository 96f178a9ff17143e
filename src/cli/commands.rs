use std::path::{Path, PathBuf};

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "kanbantxt",
    about = concat!("KanbanTxt v", env!("CARGO_PKG_VERSION"), " - a todo.txt file as a kanban board"),
    version
)]
pub struct Cli {
    /// todo.txt file to open; it is created on the first change if missing
    #[arg(value_name = "FILE", conflicts_with = "file_flag")]
    pub file: Option<PathBuf>,

    /// Same as FILE
    #[arg(long = "file", id = "file_flag", value_name = "PATH")]
    pub file_flag: Option<PathBuf>,

    /// Use the dark theme for this session
    #[arg(long)]
    pub darkmode: bool,
}

impl Cli {
    /// The document to open, given either way
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref().or(self.file_flag.as_deref())
    }
}
