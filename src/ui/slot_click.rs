use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde_json::{Map, Value};

use crate::app::SchedulerHandle;
use crate::calendar::{Resource, ResourceFields};

/// Values pre-filled into the creation dialog for a clicked slot.
#[derive(Debug, Clone, PartialEq)]
pub struct DialogSeed {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub resource_field: String,
    pub resource_id: Option<Value>,
}

impl DialogSeed {
    /// Flat field map; the resource key is always present, `null` when the
    /// slot has no resource.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("start".to_string(), Value::String(self.start.to_rfc3339()));
        fields.insert("end".to_string(), Value::String(self.end.to_rfc3339()));
        fields.insert(
            self.resource_field.clone(),
            self.resource_id.clone().unwrap_or(Value::Null),
        );
        fields
    }
}

pub fn slot_seed(
    selected_date: NaiveDate,
    hour: DateTime<Utc>,
    resource: Option<&Resource>,
    resource_fields: &ResourceFields,
) -> DialogSeed {
    let start = selected_date.and_time(hour.time()).and_utc();
    DialogSeed {
        start,
        end: start + Duration::hours(1),
        resource_field: resource_fields.id_field.clone(),
        resource_id: resource.and_then(|r| r.field(&resource_fields.id_field)).cloned(),
    }
}

/// Opens the creation dialog for the hour row `hour`. No validation or
/// conflict checks happen here.
pub fn handle_slot_click<H: SchedulerHandle + ?Sized>(
    handle: &mut H,
    selected_date: NaiveDate,
    hour: DateTime<Utc>,
    resource: Option<&Resource>,
    resource_fields: &ResourceFields,
) {
    let seed = slot_seed(selected_date, hour, resource, resource_fields);
    tracing::debug!("Slot clicked: {} - {}", seed.start, seed.end);
    handle.trigger_dialog(true, Some(seed));
}
