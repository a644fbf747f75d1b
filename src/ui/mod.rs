pub mod day_view;
pub mod event_layout;
pub mod multi_day;
pub mod slot_click;
pub mod theme;
pub mod time_axis;
