use chrono::NaiveDate;

use crate::calendar::Event;

pub const MULTI_DAY_EVENT_HEIGHT: f64 = 28.0;

/// A banner in the multi-day strip above the hour grid.
#[derive(Debug, Clone, PartialEq)]
pub struct BandSlot {
    pub event: Event,
    pub top: f64,
    pub height: f64,
    /// Started before the displayed day.
    pub has_prev: bool,
    /// Ends after the displayed day.
    pub has_next: bool,
}

pub fn is_band_event(event: &Event, date: NaiveDate) -> bool {
    event.is_multi_day() && event.touches_date(date)
}

pub fn layout_bands(events: &[Event], date: NaiveDate) -> Vec<BandSlot> {
    events
        .iter()
        .filter(|event| is_band_event(event, date))
        .enumerate()
        .map(|(index, event)| BandSlot {
            event: event.clone(),
            top: index as f64 * MULTI_DAY_EVENT_HEIGHT,
            height: MULTI_DAY_EVENT_HEIGHT,
            has_prev: event.start.date_naive() < date,
            has_next: event.end.date_naive() > date,
        })
        .collect()
}

pub fn strip_height(band_count: usize) -> f64 {
    band_count as f64 * MULTI_DAY_EVENT_HEIGHT
}
