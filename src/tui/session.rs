use std::io;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event as TermEvent, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use day_grid::{
    app::{AppState, SchedulerHandle},
    calendar::Event,
    storage::config::{Config, DayConfig},
    sync::EventFetcher,
    ui::slot_click::{handle_slot_click, DialogSeed},
};
use crate::cli::{prepare_state, remote_fetcher, CliOptions};
use crate::tui::{
    calendar_views::day::{GridGeometry, Hit},
    presentation::ui,
};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Scheduler calls made off the UI task, replayed onto `AppState` by the
/// event loop.
#[derive(Debug, Clone, PartialEq)]
enum StateUpdate {
    Loading(bool),
    Events(Vec<Event>),
    Dialog(bool, Option<DialogSeed>),
    Failed(String),
}

struct ChannelHandle {
    tx: mpsc::UnboundedSender<StateUpdate>,
}

impl SchedulerHandle for ChannelHandle {
    fn trigger_loading(&mut self, loading: bool) {
        self.tx.send(StateUpdate::Loading(loading)).ok();
    }

    fn handle_events(&mut self, events: Vec<Event>) {
        self.tx.send(StateUpdate::Events(events)).ok();
    }

    fn trigger_dialog(&mut self, open: bool, seed: Option<DialogSeed>) {
        self.tx.send(StateUpdate::Dialog(open, seed)).ok();
    }
}

fn apply_update(app: &mut AppState, update: StateUpdate) {
    match update {
        StateUpdate::Loading(loading) => app.trigger_loading(loading),
        StateUpdate::Events(events) => {
            app.status_message = Some(format!("Loaded {} events", events.len()));
            app.handle_events(events);
        }
        StateUpdate::Dialog(open, seed) => app.trigger_dialog(open, seed),
        StateUpdate::Failed(message) => app.status_message = Some(format!("Fetch failed: {}", message)),
    }
}

fn spawn_fetch(fetcher: &EventFetcher, date: NaiveDate, day: DayConfig, tx: &mpsc::UnboundedSender<StateUpdate>) {
    let fetcher = fetcher.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let mut handle = ChannelHandle { tx: tx.clone() };
        if let Err(e) = fetcher.fetch(date, &day, &mut handle).await {
            tx.send(StateUpdate::Failed(e.to_string())).ok();
        }
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyAction {
    Continue,
    Refetch,
    Quit,
}

fn handle_key(code: KeyCode, app: &mut AppState) -> KeyAction {
    if app.event_form.is_some() {
        handle_form_key(code, app);
        return KeyAction::Continue;
    }

    if app.show_help {
        if matches!(code, KeyCode::Char('q') | KeyCode::Char('?') | KeyCode::Esc) {
            app.show_help = false;
        }
        return KeyAction::Continue;
    }

    let before = app.selected_date;
    match code {
        KeyCode::Char('q') => return KeyAction::Quit,
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Right => app.next_day(),
        KeyCode::Char('h') | KeyCode::Char('p') | KeyCode::Left => app.prev_day(),
        KeyCode::Char('t') => app.go_to_today(),
        KeyCode::Char('r') => return KeyAction::Refetch,
        KeyCode::Esc => app.status_message = None,
        _ => {}
    }

    if app.selected_date != before {
        app.status_message = None;
        KeyAction::Refetch
    } else {
        KeyAction::Continue
    }
}

fn handle_form_key(code: KeyCode, app: &mut AppState) {
    match code {
        KeyCode::Enter => {
            if let Some(event) = app.save_event_form() {
                tracing::info!("Created event {} ({})", event.title, event.id);
                app.status_message = Some(format!("Created '{}'", event.title));
            }
        }
        KeyCode::Esc => app.trigger_dialog(false, None),
        KeyCode::Backspace => {
            if let Some(form) = app.event_form.as_mut() {
                form.title.pop();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.event_form.as_mut() {
                form.title.push(c);
            }
        }
        _ => {}
    }
}

fn handle_hit(app: &mut AppState, hit: Hit) {
    match hit {
        Hit::Event(id) => {
            app.status_message = app.events.iter().find(|e| e.id == id).map(|e| {
                format!(
                    "{}: {} - {}",
                    e.title,
                    e.start.format("%Y-%m-%d %H:%M"),
                    e.end.format("%Y-%m-%d %H:%M")
                )
            });
        }
        Hit::Slot { column, hour } => {
            let resource = app.resources.get(column).cloned();
            let resource_fields = app.resource_fields.clone();
            let date = app.selected_date;
            handle_slot_click(app, date, hour, resource.as_ref(), &resource_fields);
        }
    }
}

pub async fn run_tui(config: Config, options: CliOptions) -> Result<(), io::Error> {
    let mut app = prepare_state(&config, &options)?;
    let fetcher = remote_fetcher(&config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, fetcher).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    fetcher: Option<EventFetcher>,
) -> io::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut geometry = GridGeometry::default();

    if let Some(fetcher) = &fetcher {
        spawn_fetch(fetcher, app.selected_date, app.day, &tx);
    }

    loop {
        while let Ok(update) = rx.try_recv() {
            apply_update(app, update);
        }

        terminal.draw(|f| geometry = ui(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        match event::read()? {
            TermEvent::Key(key) if key.kind == KeyEventKind::Press => match handle_key(key.code, app) {
                KeyAction::Quit => return Ok(()),
                KeyAction::Refetch => {
                    if let Some(fetcher) = &fetcher {
                        spawn_fetch(fetcher, app.selected_date, app.day, &tx);
                    }
                }
                KeyAction::Continue => {}
            },
            TermEvent::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                if app.event_form.is_none()
                    && !app.show_help
                    && let Some(hit) = geometry.hit(mouse.column, mouse.row)
                {
                    handle_hit(app, hit);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use day_grid::calendar::{Resource, ResourceFields};
    use pretty_assertions::assert_eq;
    use serde_json::Value;

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, hour, 0, 0).unwrap()
    }

    fn state() -> AppState {
        let mut app = AppState::new();
        app.selected_date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        app
    }

    #[test]
    fn channel_handle_replays_onto_state() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut handle = ChannelHandle { tx };
        let mut app = state();

        handle.trigger_loading(true);
        handle.handle_events(vec![Event::new("e1", "Remote", at(9), at(10))]);
        handle.trigger_loading(false);
        while let Ok(update) = rx.try_recv() {
            apply_update(&mut app, update);
        }

        assert!(!app.loading);
        assert_eq!(app.events.len(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Loaded 1 events"));
    }

    #[test]
    fn failure_is_reported_in_status() {
        let mut app = state();

        apply_update(&mut app, StateUpdate::Failed("boom".to_string()));

        assert_eq!(app.status_message.as_deref(), Some("Fetch failed: boom"));
    }

    #[test]
    fn day_navigation_requests_refetch() {
        let mut app = state();

        assert_eq!(handle_key(KeyCode::Char('l'), &mut app), KeyAction::Refetch);
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        assert_eq!(handle_key(KeyCode::Left, &mut app), KeyAction::Refetch);
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(handle_key(KeyCode::Char('r'), &mut app), KeyAction::Refetch);
        assert_eq!(handle_key(KeyCode::Char('x'), &mut app), KeyAction::Continue);
        assert_eq!(handle_key(KeyCode::Char('q'), &mut app), KeyAction::Quit);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let mut app = state();

        handle_key(KeyCode::Char('?'), &mut app);
        assert!(app.show_help);
        assert_eq!(handle_key(KeyCode::Char('l'), &mut app), KeyAction::Continue);
        assert_eq!(app.selected_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());

        handle_key(KeyCode::Esc, &mut app);
        assert!(!app.show_help);
    }

    #[test]
    fn slot_hit_opens_dialog_for_column_resource() {
        let mut app = state();
        app.resource_fields = ResourceFields {
            id_field: "room".to_string(),
            ..ResourceFields::default()
        };
        app.resources = vec![
            Resource::default().with_field("room", "a"),
            Resource::default().with_field("room", "b"),
        ];

        handle_hit(&mut app, Hit::Slot { column: 1, hour: at(11) });

        let form = app.event_form.as_ref().unwrap();
        assert_eq!(form.seed.start, at(11));
        assert_eq!(form.seed.end, at(12));
        assert_eq!(form.seed.resource_id, Some(Value::from("b")));
    }

    #[test]
    fn typing_in_dialog_then_enter_creates_event() {
        let mut app = state();
        handle_hit(&mut app, Hit::Slot { column: 0, hour: at(9) });

        for c in "Lunchx".chars() {
            handle_key(KeyCode::Char(c), &mut app);
        }
        handle_key(KeyCode::Backspace, &mut app);
        assert_eq!(handle_key(KeyCode::Char('q'), &mut app), KeyAction::Continue);
        handle_key(KeyCode::Enter, &mut app);

        assert!(app.event_form.is_none());
        assert_eq!(app.events.len(), 1);
        assert_eq!(app.events[0].title, "Lunchq");
        assert_eq!(app.events[0].start, at(9));
    }

    #[test]
    fn escape_closes_dialog_without_saving() {
        let mut app = state();
        handle_hit(&mut app, Hit::Slot { column: 0, hour: at(9) });

        handle_key(KeyCode::Esc, &mut app);

        assert!(app.event_form.is_none());
        assert!(app.events.is_empty());
    }

    #[test]
    fn event_hit_shows_details() {
        let mut app = state();
        app.add_event(Event::new("e1", "Review", at(9), at(10)));

        handle_hit(&mut app, Hit::Event("e1".to_string()));

        assert_eq!(
            app.status_message.as_deref(),
            Some("Review: 2024-03-05 09:00 - 2024-03-05 10:00")
        );
    }
}
