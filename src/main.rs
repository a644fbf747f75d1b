use std::io;

mod cli;
use cli::{USAGE, parse_cli_mode, run_agenda_mode};
mod tui;
use tui::run_tui;

use day_grid::storage::config::Config;

#[tokio::main]
async fn main() -> Result<(), io::Error> {
    setup_logging();

    let options = match parse_cli_mode() {
        Ok(Some(options)) => options,
        Ok(None) => {
            println!("{}", USAGE);
            return Ok(());
        }
        Err(err) => {
            eprintln!("Error: {}", err);
            println!("{}", USAGE);
            return Ok(());
        }
    };

    let config = Config::load_or_create().map_err(|e| {
        tracing::error!("Failed to load config: {}", e);
        io::Error::other(e.to_string())
    })?;

    if options.agenda {
        return run_agenda_mode(config, options).await;
    }

    run_tui(config, options).await
}

fn setup_logging() {
    let log_dir = Config::config_dir();

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = tracing_appender::rolling::daily(log_dir, "day-grid.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .init();

    std::mem::forget(_guard);

    tracing::info!("day-grid started");
}
