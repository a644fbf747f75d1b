use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::calendar::Event;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Resource {
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Resource {
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.field(name).map(|value| match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}

/// Names of the resource fields used for matching and display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceFields {
    pub id_field: String,
    pub text_field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subtext_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_field: Option<String>,
}

impl Default for ResourceFields {
    fn default() -> Self {
        Self {
            id_field: "id".to_string(),
            text_field: "title".to_string(),
            subtext_field: None,
            color_field: None,
        }
    }
}

/// Schema entry for an event field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub name: String,
    #[serde(default)]
    pub multiple: bool,
}

fn is_multiple(fields: &[FieldSchema], name: &str) -> bool {
    fields.iter().any(|f| f.name == name && f.multiple)
}

fn assignment_matches(assigned: &Value, resource_id: &Value, multiple: bool) -> bool {
    match assigned {
        Value::Array(ids) if multiple => ids.iter().any(|id| id == resource_id),
        other => other == resource_id,
    }
}

/// Events assigned to `resource`, in input order. Matched events take the
/// resource colour when a colour field is configured and present.
pub fn events_for_resource(
    events: &[Event],
    resource: &Resource,
    resource_fields: &ResourceFields,
    fields: &[FieldSchema],
) -> Vec<Event> {
    let key = resource_fields.id_field.as_str();
    let Some(resource_id) = resource.field(key) else {
        return Vec::new();
    };
    let multiple = is_multiple(fields, key);
    let resource_color = resource_fields
        .color_field
        .as_deref()
        .and_then(|name| resource.field(name))
        .and_then(Value::as_str);

    events
        .iter()
        .filter(|event| {
            event
                .field(key)
                .is_some_and(|assigned| assignment_matches(assigned, resource_id, multiple))
        })
        .map(|event| {
            let mut event = event.clone();
            if let Some(color) = resource_color {
                event.color = Some(color.to_string());
            }
            event
        })
        .collect()
}
