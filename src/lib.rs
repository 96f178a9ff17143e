//! KanbanTxt: a todo.txt file shown and edited as a four-column kanban board.
//!
//! The engine (`parse`, `ops`, `model`, `session`) is independent of the
//! terminal front end in `tui`.

pub mod cli;
pub mod io;
pub mod model;
pub mod ops;
pub mod parse;
pub mod session;
pub mod tui;
pub mod util;
