use chrono::{DateTime, NaiveDate, Utc};

use crate::app::AppState;
use crate::calendar::{Event, Resource, events_for_resource};
use crate::storage::config::{Direction, LayoutMode};
use crate::ui::event_layout::{LayoutSlot, layout_events, same_day_events};
use crate::ui::multi_day::{BandSlot, layout_bands, strip_height};
use crate::ui::time_axis::{TimeAxis, hour_label};

#[derive(Debug, Clone, PartialEq)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub title: String,
    pub is_today: bool,
    pub now_offset: Option<f64>,
    pub direction: Direction,
    pub axis: TimeAxis,
    pub rows: Vec<HourRow>,
    pub columns: Vec<ResourceColumn>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourRow {
    pub instant: DateTime<Utc>,
    pub label: String,
    pub top: f64,
}

/// One column of the grid: a single resource, or every event when no
/// resources are configured.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceColumn {
    pub resource: Option<Resource>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub bands: Vec<BandSlot>,
    pub band_height: f64,
    pub slots: Vec<LayoutSlot>,
}

impl DayLayout {
    /// Height of the multi-day strip, shared by all columns.
    pub fn band_strip_height(&self) -> f64 {
        self.columns
            .iter()
            .map(|c| c.band_height)
            .fold(0.0, f64::max)
    }
}

pub fn calculate_layout(state: &AppState) -> DayLayout {
    calculate_layout_at(state, Utc::now())
}

pub fn calculate_layout_at(state: &AppState, now: DateTime<Utc>) -> DayLayout {
    let date = state.selected_date;
    let axis = TimeAxis::build(date, &state.day, state.height, state.view.calibration);
    let events = events_by_latest_end(&state.events);
    let mode = state.view.layout_mode;

    let columns = if state.resources.is_empty() {
        vec![build_column(None, &events, &axis, mode, state)]
    } else {
        state
            .resources
            .iter()
            .map(|resource| {
                let assigned = events_for_resource(&events, resource, &state.resource_fields, &state.fields);
                build_column(Some(resource), &assigned, &axis, mode, state)
            })
            .collect()
    };

    let rows = axis
        .hours
        .iter()
        .enumerate()
        .map(|(i, instant)| HourRow {
            instant: *instant,
            label: hour_label(*instant, state.view.hour_format),
            top: i as f64 * axis.row_height,
        })
        .collect();

    let is_today = date == now.date_naive();

    DayLayout {
        date,
        title: state.view.date_title(date),
        is_today,
        now_offset: if is_today { axis.now_offset(now) } else { None },
        direction: state.view.direction,
        axis,
        rows,
        columns,
    }
}

/// Local copy sorted by descending end time. The sort is stable, so events
/// ending together keep their incoming order.
fn events_by_latest_end(events: &[Event]) -> Vec<Event> {
    let mut sorted: Vec<Event> = events
        .iter()
        .filter(|event| {
            let ok = event.is_well_formed();
            if !ok {
                tracing::warn!("Skipping event {} that ends before it starts", event.id);
            }
            ok
        })
        .cloned()
        .collect();
    sorted.sort_by(|a, b| b.end.cmp(&a.end));
    sorted
}

fn build_column(
    resource: Option<&Resource>,
    events: &[Event],
    axis: &TimeAxis,
    mode: LayoutMode,
    state: &AppState,
) -> ResourceColumn {
    let bands = layout_bands(events, axis.date);
    let day_events = same_day_events(events, axis.date);
    let slots = layout_events(&day_events, axis, mode);

    ResourceColumn {
        resource: resource.cloned(),
        title: resource.and_then(|r| r.text(&state.resource_fields.text_field)),
        subtitle: state
            .resource_fields
            .subtext_field
            .as_deref()
            .and_then(|field| resource.and_then(|r| r.text(field))),
        band_height: strip_height(bands.len()),
        bands,
        slots,
    }
}
