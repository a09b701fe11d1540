//! Shaping API payloads into chat replies

pub mod errors;
pub mod events;
pub mod people;
pub mod relative_time;

pub use errors::translate_error;
pub use events::{format_event_property_stats, format_event_stats};
pub use people::format_people;
