use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default)]
    pub all_day: bool,
    /// Free-form fields, including resource assignments keyed by the
    /// configured resource id field.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Event {
    pub fn new(id: impl Into<String>, title: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            color: None,
            all_day: false,
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Whole 24-hour periods between start and end. An overnight event
    /// shorter than a day spans zero days.
    pub fn day_span(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn is_multi_day(&self) -> bool {
        self.all_day || self.day_span() >= 1
    }

    pub fn overlaps(&self, other: &Event) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn is_well_formed(&self) -> bool {
        self.start <= self.end
    }

    pub fn touches_date(&self, date: NaiveDate) -> bool {
        self.start.date_naive() <= date && date <= self.end.date_naive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
    }

    #[test]
    fn event_duration_calculated_correctly() {
        let event = Event::new("e1", "Meeting", at(5, 9, 0), at(5, 10, 30));

        assert_eq!(event.duration_minutes(), 90);
    }

    #[test]
    fn same_day_event_has_zero_day_span() {
        let event = Event::new("e1", "Standup", at(5, 9, 0), at(5, 9, 15));

        assert_eq!(event.day_span(), 0);
        assert!(!event.is_multi_day());
    }

    #[test]
    fn overnight_event_under_a_day_is_not_multi_day() {
        let event = Event::new("e1", "Night shift", at(5, 22, 0), at(6, 6, 0));

        assert_eq!(event.day_span(), 0);
        assert!(!event.is_multi_day());
    }

    #[test]
    fn event_lasting_a_full_day_is_multi_day() {
        let event = Event::new("e1", "Conference", at(5, 22, 0), at(6, 22, 0));

        assert_eq!(event.day_span(), 1);
        assert!(event.is_multi_day());
    }

    #[test]
    fn all_day_flag_makes_event_multi_day() {
        let mut event = Event::new("e1", "Holiday", at(5, 0, 0), at(5, 23, 59));
        event.all_day = true;

        assert!(event.is_multi_day());
    }

    #[test]
    fn event_does_not_overlap_when_adjacent() {
        let first = Event::new("e1", "Event 1", at(5, 9, 0), at(5, 10, 0));
        let second = Event::new("e2", "Event 2", at(5, 10, 0), at(5, 11, 0));

        assert!(!first.overlaps(&second));
    }

    #[test]
    fn reversed_event_is_not_well_formed() {
        let event = Event::new("e1", "Broken", at(5, 11, 0), at(5, 10, 0));

        assert!(!event.is_well_formed());
    }

    #[test]
    fn extra_fields_are_kept_when_deserializing() {
        let json = r#"{
            "id": "e1",
            "title": "Review",
            "start": "2024-03-05T09:00:00Z",
            "end": "2024-03-05T10:00:00Z",
            "admin_id": 2
        }"#;

        let event: Event = serde_json::from_str(json).unwrap();

        assert_eq!(event.field("admin_id"), Some(&Value::from(2)));
        assert_eq!(event.start, at(5, 9, 0));
        assert!(!event.all_day);
    }
}
