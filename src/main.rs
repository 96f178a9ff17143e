use clap::Parser;
use kanbantxt::cli::commands::Cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() {
    // Tracing is opt-in via RUST_LOG and goes to stderr, so redirect it
    // (`2>kanbantxt.log`) to keep it off the board. Invalid filters are ignored.
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|raw| {
            let raw = raw.trim();
            if raw.is_empty() {
                return None;
            }
            EnvFilter::try_new(raw).ok()
        })
        .unwrap_or_else(|| EnvFilter::new("off"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_ansi(false))
        .with(filter)
        .init();

    let cli = Cli::parse();
    if let Err(e) = kanbantxt::tui::run(cli.path(), cli.darkmode) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
