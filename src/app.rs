use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use crate::calendar::{Event, FieldSchema, Resource, ResourceFields};
use crate::storage::config::{Config, DayConfig, ViewConfig};
use crate::ui::slot_click::DialogSeed;
use crate::ui::theme::Theme;

/// Mutation requests emitted by the day grid. The grid only reads
/// `AppState`; every change goes through these calls.
#[cfg_attr(test, mockall::automock)]
pub trait SchedulerHandle {
    fn trigger_loading(&mut self, loading: bool);
    fn handle_events(&mut self, events: Vec<Event>);
    fn trigger_dialog(&mut self, open: bool, seed: Option<DialogSeed>);
}

pub struct AppState {
    pub selected_date: NaiveDate,
    pub events: Vec<Event>,
    pub resources: Vec<Resource>,
    pub resource_fields: ResourceFields,
    pub fields: Vec<FieldSchema>,
    pub day: DayConfig,
    pub height: f64,
    pub view: ViewConfig,
    pub theme: Theme,
    pub loading: bool,
    pub event_form: Option<EventForm>,
    pub show_help: bool,
    pub status_message: Option<String>,
}

/// Creation dialog opened from an empty slot.
#[derive(Debug, Clone, PartialEq)]
pub struct EventForm {
    pub seed: DialogSeed,
    pub title: String,
}

impl EventForm {
    pub fn new(seed: DialogSeed) -> Self {
        Self {
            seed,
            title: String::new(),
        }
    }

    pub fn into_event(self) -> Event {
        let title = if self.title.trim().is_empty() {
            "New event".to_string()
        } else {
            self.title.trim().to_string()
        };
        let mut event = Event::new(Uuid::new_v4().to_string(), title, self.seed.start, self.seed.end);
        if let Some(resource_id) = self.seed.resource_id {
            event.fields.insert(self.seed.resource_field, resource_id);
        }
        event
    }
}

impl AppState {
    pub fn new() -> Self {
        let view = ViewConfig::default();
        Self {
            selected_date: Utc::now().date_naive(),
            events: Vec::new(),
            resources: Vec::new(),
            resource_fields: ResourceFields::default(),
            fields: Vec::new(),
            day: DayConfig::default(),
            height: view.height,
            view,
            theme: Theme::default(),
            loading: false,
            event_form: None,
            show_help: false,
            status_message: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            resources: config.resources.items.clone(),
            resource_fields: config.resources.fields.clone(),
            fields: config.resources.schema.clone(),
            day: config.day,
            height: config.view.height,
            view: config.view.clone(),
            theme: Theme::get_by_name(&config.view.theme),
            ..Self::new()
        }
    }

    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn next_day(&mut self) {
        if let Some(next) = self.selected_date.succ_opt() {
            self.selected_date = next;
        }
    }

    pub fn prev_day(&mut self) {
        if let Some(prev) = self.selected_date.pred_opt() {
            self.selected_date = prev;
        }
    }

    pub fn go_to_today(&mut self) {
        self.selected_date = Utc::now().date_naive();
    }

    /// Closes the dialog and stores the event it describes.
    pub fn save_event_form(&mut self) -> Option<Event> {
        let form = self.event_form.take()?;
        let event = form.into_event();
        let mut events = self.events.clone();
        events.push(event.clone());
        self.handle_events(events);
        Some(event)
    }
}

impl SchedulerHandle for AppState {
    fn trigger_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn handle_events(&mut self, events: Vec<Event>) {
        self.events = events;
    }

    fn trigger_dialog(&mut self, open: bool, seed: Option<DialogSeed>) {
        self.event_form = match (open, seed) {
            (true, Some(seed)) => Some(EventForm::new(seed)),
            _ => None,
        };
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
