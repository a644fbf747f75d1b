pub mod app;
pub mod calendar;
pub mod storage;
pub mod sync;
pub mod ui;

pub use app::{AppState, EventForm, SchedulerHandle};
pub use calendar::{Event, Resource, ResourceFields};
