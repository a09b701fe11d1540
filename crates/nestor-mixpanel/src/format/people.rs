//! People report: the most recently active users

use super::errors::translate_error;
use super::relative_time::describe;
use crate::api::{EngageResponse, PersonRecord};
use crate::interface::{DisplayEntry, DisplayField, Reply};
use chrono::{DateTime, Utc};
use md5::{Digest, Md5};
use std::cmp::Ordering;

/// Maximum number of people in one report
pub const PEOPLE_LIMIT: usize = 10;

/// Avatar service the profile thumbnails point at
pub const GRAVATAR_BASE: &str = "https://www.gravatar.com/avatar/";

/// A profile value stored under one of several property keys
///
/// Keys are tried in order and the first non-empty value wins.
#[derive(Debug, Clone, Copy)]
pub struct PropertyField {
    keys: &'static [&'static str],
}

impl PropertyField {
    pub const fn new(keys: &'static [&'static str]) -> Self {
        Self { keys }
    }

    pub fn lookup(&self, record: &PersonRecord) -> Option<String> {
        self.keys.iter().find_map(|key| record.property(key))
    }
}

pub const IDENTIFIER: PropertyField = PropertyField::new(&[
    "$name",
    "$full_name",
    "$first_name",
    "full_name",
    "first_name",
    "$email",
    "email",
    "nickname",
    "$username",
]);
pub const EMAIL: PropertyField = PropertyField::new(&["$email", "email"]);
pub const FIRST_NAME: PropertyField = PropertyField::new(&["first_name"]);
pub const FULL_NAME: PropertyField = PropertyField::new(&["full_name"]);
pub const LAST_SEEN: PropertyField = PropertyField::new(&["$last_seen"]);
pub const SIGNED_UP: PropertyField = PropertyField::new(&["created"]);
pub const INITIAL_REFERRER: PropertyField = PropertyField::new(&["$initial_referring_domain"]);

const LOCATION_KEYS: [&str; 3] = ["$region", "$city", "$country_code"];

/// Most recent `$last_seen` first; profiles never seen go last
pub fn by_last_seen_desc(a: &PersonRecord, b: &PersonRecord) -> Ordering {
    LAST_SEEN.lookup(b).cmp(&LAST_SEEN.lookup(a))
}

/// Gravatar URL for the profile's email (empty email when there is none)
pub fn gravatar_url(record: &PersonRecord) -> String {
    let email = EMAIL.lookup(record).unwrap_or_default();
    format!("{GRAVATAR_BASE}{}", hex::encode(Md5::digest(email.as_bytes())))
}

/// "Region, City, CC" from whichever parts are present
pub fn location(record: &PersonRecord) -> String {
    LOCATION_KEYS
        .iter()
        .filter_map(|key| record.property(key))
        .collect::<Vec<_>>()
        .join(", ")
}

fn person_entry(record: &PersonRecord, now: DateTime<Utc>) -> DisplayEntry {
    let text = |field: PropertyField| field.lookup(record).unwrap_or_default();

    DisplayEntry::titled(text(IDENTIFIER))
        .with_field(DisplayField::short("Email", text(EMAIL)))
        .with_field(DisplayField::short("First Name", text(FIRST_NAME)))
        .with_field(DisplayField::short("Full Name", text(FULL_NAME)))
        .with_field(DisplayField::short(
            "Last Seen",
            describe(LAST_SEEN.lookup(record).as_deref(), now),
        ))
        .with_field(DisplayField::short("Location", location(record)))
        .with_field(DisplayField::short(
            "Signed Up",
            describe(SIGNED_UP.lookup(record).as_deref(), now),
        ))
        .with_field(DisplayField::short("Initial Referrer", text(INITIAL_REFERRER)))
        .with_thumb_url(gravatar_url(record))
}

/// Build the people report from an `engage` response
pub fn format_people(response: &EngageResponse, now: DateTime<Utc>) -> Reply {
    if let Some(error) = response.error_message() {
        return translate_error(&error);
    }

    let mut records: Vec<&PersonRecord> = response.results.iter().collect();
    records.sort_by(|a, b| by_last_seen_desc(a, b));

    Reply::Entries(
        records
            .into_iter()
            .take(PEOPLE_LIMIT)
            .map(|record| person_entry(record, now))
            .collect(),
    )
}
