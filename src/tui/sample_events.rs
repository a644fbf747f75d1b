use chrono::{DateTime, Duration, NaiveDate, Utc};
use day_grid::{app::AppState, calendar::Event};

fn at(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    date.and_hms_opt(hour, minute, 0).map(|dt| dt.and_utc())
}

/// Seeds the selected day with a mix of overlapping, multi-day and all-day
/// events. When resources are configured, events are spread across them.
pub fn add_sample_events(app: &mut AppState) {
    let date = app.selected_date;
    let Some(yesterday) = date.pred_opt() else { return };
    let Some(tomorrow) = date.succ_opt() else { return };

    let timed = vec![
        ("Morning Standup", date, (9, 0), date, (9, 30)),
        ("Design Review", date, (10, 0), date, (11, 30)),
        ("Customer Call", date, (10, 30), date, (11, 0)),
        ("Pairing", date, (11, 0), date, (12, 0)),
        ("Team Sync", date, (14, 0), date, (15, 0)),
        ("Offsite", yesterday, (13, 0), tomorrow, (12, 0)),
    ];

    let resource_ids: Vec<_> = app
        .resources
        .iter()
        .filter_map(|r| r.field(&app.resource_fields.id_field).cloned())
        .collect();
    let id_field = app.resource_fields.id_field.clone();

    let mut events = Vec::new();
    for (i, (title, start_date, (sh, sm), end_date, (eh, em))) in timed.into_iter().enumerate() {
        let (Some(start), Some(end)) = (at(start_date, sh, sm), at(end_date, eh, em)) else {
            continue;
        };
        events.push(Event::new(format!("sample_{}", i), title, start, end));
    }

    if let Some(midnight) = at(date, 0, 0) {
        let mut holiday = Event::new("sample_all_day", "Company Holiday", midnight, midnight + Duration::days(1));
        holiday.all_day = true;
        events.push(holiday.with_color("#b16286"));
    }

    for (i, mut event) in events.into_iter().enumerate() {
        if !resource_ids.is_empty() {
            event.fields.insert(id_field.clone(), resource_ids[i % resource_ids.len()].clone());
        }
        app.add_event(event);
    }
}
