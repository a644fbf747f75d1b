use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::calendar::Event;
use crate::storage::config::LayoutMode;
use crate::ui::time_axis::TimeAxis;

/// Position of one timed event inside a column. `width` and `inset` are
/// percentages of the column width; `None` means full width at the start
/// edge. The inset is measured from the leading edge of the column, which is
/// the right edge in right-to-left layouts.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSlot {
    pub event: Event,
    pub top: f64,
    pub height: f64,
    pub width: Option<f64>,
    pub inset: Option<f64>,
}

pub fn is_same_day_event(event: &Event, date: NaiveDate) -> bool {
    !event.is_multi_day() && event.start.date_naive() == date
}

pub fn same_day_events(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| is_same_day_event(event, date))
        .collect()
}

fn within(instant: DateTime<Utc>, event: &Event) -> bool {
    event.start <= instant && instant <= event.end
}

/// Other events whose interval holds a point one minute inside either end
/// of `event`. Exactly touching events do not cross.
pub fn crossing_events<'a>(event: &Event, day_events: &[&'a Event]) -> Vec<&'a Event> {
    let probe_start = event.start + Duration::minutes(1);
    let probe_end = event.end - Duration::minutes(1);

    day_events
        .iter()
        .copied()
        .filter(|other| other.id != event.id)
        .filter(|other| within(probe_start, other) || within(probe_end, other))
        .collect()
}

pub fn layout_events(day_events: &[&Event], axis: &TimeAxis, mode: LayoutMode) -> Vec<LayoutSlot> {
    let slots = match mode {
        LayoutMode::Legacy => layout_legacy(day_events, axis),
        LayoutMode::Columns => layout_columns(day_events, axis),
    };
    tracing::debug!("Laid out {} events on {} ({:?})", slots.len(), axis.date, mode);
    slots
}

fn positioned(event: &Event, axis: &TimeAxis, width: Option<f64>, inset: Option<f64>) -> LayoutSlot {
    LayoutSlot {
        event: event.clone(),
        top: axis.offset_of(event.start),
        height: axis.span_height(event.start, event.end),
        width,
        inset,
    }
}

/// Greedy placement in arrival order. An event that crosses others is
/// narrowed to `100 / (n + 1) + 10` percent, which exceeds 100 for a single
/// crossing, and is pushed right by the number of its crossings already
/// placed.
pub fn layout_legacy(day_events: &[&Event], axis: &TimeAxis) -> Vec<LayoutSlot> {
    let mut crossing_ids: Vec<&str> = Vec::with_capacity(day_events.len());
    let mut slots = Vec::with_capacity(day_events.len());

    for event in day_events {
        let crossing = crossing_events(event, day_events);

        let width = (!crossing.is_empty()).then(|| 100.0 / (crossing.len() as f64 + 1.0) + 10.0);

        let already_rendered = crossing
            .iter()
            .filter(|other| crossing_ids.contains(&other.id.as_str()))
            .count();
        let inset = (already_rendered > 0).then(|| {
            let n = already_rendered as f64;
            n * (100.0 / (n + 1.7))
        });

        slots.push(positioned(event, axis, width, inset));
        crossing_ids.push(&event.id);
    }

    slots
}

/// Lane assignment per cluster of transitively overlapping events. Each
/// event takes the first lane that is free at its start; lanes split the
/// column evenly so blocks never cover each other.
pub fn layout_columns(day_events: &[&Event], axis: &TimeAxis) -> Vec<LayoutSlot> {
    let n = day_events.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        day_events[a]
            .start
            .cmp(&day_events[b].start)
            .then(day_events[b].end.cmp(&day_events[a].end))
    });

    let mut lane_of = vec![0usize; n];
    let mut lanes_in_cluster = vec![1usize; n];

    let mut cluster: Vec<usize> = Vec::new();
    let mut lane_ends: Vec<DateTime<Utc>> = Vec::new();
    let mut cluster_end: Option<DateTime<Utc>> = None;

    for &i in &order {
        let event = day_events[i];

        if cluster_end.is_some_and(|end| event.start >= end) {
            for &member in &cluster {
                lanes_in_cluster[member] = lane_ends.len();
            }
            cluster.clear();
            lane_ends.clear();
            cluster_end = None;
        }

        let lane = match lane_ends.iter().position(|end| *end <= event.start) {
            Some(free) => {
                lane_ends[free] = event.end;
                free
            }
            None => {
                lane_ends.push(event.end);
                lane_ends.len() - 1
            }
        };

        lane_of[i] = lane;
        cluster.push(i);
        cluster_end = Some(cluster_end.map_or(event.end, |end| end.max(event.end)));
    }
    for &member in &cluster {
        lanes_in_cluster[member] = lane_ends.len();
    }

    day_events
        .iter()
        .enumerate()
        .map(|(i, event)| {
            let lanes = lanes_in_cluster[i];
            if lanes <= 1 {
                return positioned(event, axis, None, None);
            }
            let width = 100.0 / lanes as f64;
            let inset = (lane_of[i] > 0).then(|| lane_of[i] as f64 * width);
            positioned(event, axis, Some(width), inset)
        })
        .collect()
}
