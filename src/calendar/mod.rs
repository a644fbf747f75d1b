pub mod event;
pub mod resource;

pub use event::Event;
pub use resource::{FieldSchema, Resource, ResourceFields, events_for_resource};
