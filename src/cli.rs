use std::{
    env,
    io::{self, Write},
    path::{Path, PathBuf},
    process::{Command, Stdio},
    sync::Arc,
};

use chrono::{NaiveDate, Utc};

use day_grid::{
    app::AppState,
    calendar::Event,
    storage::config::Config,
    sync::{EventFetcher, HttpRemoteEvents},
    ui::day_view::{self, DayLayout},
};

use crate::tui::add_sample_events;

pub const USAGE: &str = "Usage: day-grid [--date YYYY/MM/DD] [--events FILE] [--sample] [--agenda]";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliOptions {
    pub date: Option<NaiveDate>,
    pub events_file: Option<PathBuf>,
    pub sample: bool,
    pub agenda: bool,
}

pub fn parse_cli_mode() -> Result<Option<CliOptions>, String> {
    parse_args(env::args().skip(1))
}

/// `Ok(None)` when only help was requested.
pub fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Option<CliOptions>, String> {
    let mut options = CliOptions::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--date" => {
                let value = args.next().ok_or("--date needs a value")?;
                let date = NaiveDate::parse_from_str(&value, "%Y/%m/%d")
                    .map_err(|_| format!("Invalid date '{}'. Use YYYY/MM/DD.", value))?;
                options.date = Some(date);
            }
            "--events" => {
                let value = args.next().ok_or("--events needs a file path")?;
                options.events_file = Some(PathBuf::from(value));
            }
            "--sample" => options.sample = true,
            "--agenda" => options.agenda = true,
            "--help" => return Ok(None),
            _ => return Err(format!("Unknown argument: {}", arg)),
        }
    }

    Ok(Some(options))
}

pub fn load_events_file(path: &Path) -> Result<Vec<Event>, io::Error> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Builds the initial state from config and command-line sources.
pub fn prepare_state(config: &Config, options: &CliOptions) -> Result<AppState, io::Error> {
    let mut app = AppState::from_config(config);

    if let Some(date) = options.date {
        app.selected_date = date;
    }

    if let Some(path) = &options.events_file {
        for event in load_events_file(path)? {
            app.add_event(event);
        }
        tracing::info!("Loaded {} events from {}", app.events.len(), path.display());
    }

    if options.sample {
        add_sample_events(&mut app);
    }

    Ok(app)
}

pub fn remote_fetcher(config: &Config) -> Option<EventFetcher> {
    let url = config.remote.url.as_ref()?;
    let remote = Arc::new(HttpRemoteEvents::new(url.clone()));
    Some(EventFetcher::new(remote).with_discard_stale(config.remote.discard_stale))
}

pub async fn run_agenda_mode(config: Config, options: CliOptions) -> Result<(), io::Error> {
    let mut app = prepare_state(&config, &options)?;

    if let Some(fetcher) = remote_fetcher(&config) {
        let date = app.selected_date;
        let day = app.day;
        if let Err(e) = fetcher.fetch(date, &day, &mut app).await {
            eprintln!("Failed to fetch events: {}", e);
        }
    }

    let layout = day_view::calculate_layout_at(&app, Utc::now());
    display_with_pager(&format_agenda_text(&layout))
}

pub fn format_agenda_text(layout: &DayLayout) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Agenda - {}", layout.title));

    for column in &layout.columns {
        lines.push(String::new());
        if let Some(title) = &column.title {
            lines.push(format!("[{}]", title));
        }

        if column.bands.is_empty() && column.slots.is_empty() {
            lines.push("No events scheduled.".to_string());
            continue;
        }

        for band in &column.bands {
            let prev = if band.has_prev { "<" } else { " " };
            let next = if band.has_next { ">" } else { " " };
            lines.push(format!("{}{} {:<11} {}", prev, next, "All Day", band.event.title));
        }

        for slot in &column.slots {
            let time_label = format!(
                "{}-{}",
                slot.event.start.format("%H:%M"),
                slot.event.end.format("%H:%M")
            );
            let mut line = format!("   {:<11} {}", time_label, slot.event.title);
            if let Some(width) = slot.width {
                line.push_str(&format!(" ({:.0}% wide", width));
                if let Some(inset) = slot.inset {
                    line.push_str(&format!(", {:.0}% in", inset));
                }
                line.push(')');
            }
            lines.push(line);
        }
    }

    lines.join("\n")
}

fn display_with_pager(text: &str) -> Result<(), io::Error> {
    let pager_value = env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut parts = pager_value.split_whitespace();
    let cmd = match parts.next() {
        Some(c) => c,
        None => {
            println!("{text}");
            return Ok(());
        }
    };
    let args: Vec<&str> = parts.collect();

    match Command::new(cmd)
        .args(&args)
        .stdin(Stdio::piped())
        .spawn()
    {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                stdin.write_all(text.as_bytes())?;
            }
            let _ = child.wait();
        }
        Err(_) => {
            println!("{text}");
        }
    }

    Ok(())
}
