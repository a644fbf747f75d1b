use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Timelike, Utc};

use crate::storage::config::{DayConfig, HourFormat};

pub const STEP_MINUTES: i64 = 60;

/// Hour boundaries of the displayed day and the pixel scale derived from
/// the container height.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeAxis {
    pub date: NaiveDate,
    pub hours: Vec<DateTime<Utc>>,
    pub row_height: f64,
    pub minute_height: f64,
}

impl TimeAxis {
    /// Rows run from `start_hour:00` to `end_hour:00` inclusive. When
    /// `end_hour <= start_hour` the axis holds the start row only.
    pub fn build(date: NaiveDate, day: &DayConfig, container_height: f64, calibration: f64) -> Self {
        let midnight = date.and_time(NaiveTime::MIN).and_utc();
        let first = midnight + Duration::hours(i64::from(day.start_hour));
        let count = if day.end_hour > day.start_hour {
            i64::from(day.end_hour - day.start_hour) + 1
        } else {
            1
        };

        let hours: Vec<DateTime<Utc>> = (0..count)
            .map(|i| first + Duration::minutes(i * STEP_MINUTES))
            .collect();

        let row_height = container_height.max(0.0) / hours.len() as f64;
        let minute_height = row_height.ceil() * calibration / 60.0;

        Self {
            date,
            hours,
            row_height,
            minute_height,
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.hours[0]
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.hours[self.hours.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.hours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hours.is_empty()
    }

    /// Vertical pixel offset of `instant` from the axis start.
    pub fn offset_of(&self, instant: DateTime<Utc>) -> f64 {
        (instant - self.start()).num_minutes() as f64 * self.minute_height
    }

    pub fn span_height(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
        (end - start).num_minutes() as f64 * self.minute_height
    }

    /// Index of the hour row under vertical offset `y`.
    pub fn row_at(&self, y: f64) -> Option<usize> {
        if y < 0.0 || self.row_height <= 0.0 {
            return None;
        }
        let row = (y / self.row_height).floor() as usize;
        (row < self.hours.len()).then_some(row)
    }

    /// Offset of `now` when it falls inside the axis.
    pub fn now_offset(&self, now: DateTime<Utc>) -> Option<f64> {
        (self.start() <= now && now <= self.end()).then(|| self.offset_of(now))
    }
}

pub fn hour_label(instant: DateTime<Utc>, format: HourFormat) -> String {
    match format {
        HourFormat::TwentyFour => instant.format("%H:%M").to_string(),
        HourFormat::Twelve => {
            let (pm, hour) = instant.hour12();
            format!("{} {}", hour, if pm { "PM" } else { "AM" })
        }
    }
}
