//! Event reports: counts over time, optionally split by a property

use super::errors::translate_error;
use crate::api::SegmentationResponse;
use crate::interface::{DisplayEntry, Reply};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One event count on one date
#[derive(Debug, Clone, PartialEq)]
pub struct EventSeriesPoint {
    pub date: String,
    pub value: f64,
}

/// One property value's count on one date
#[derive(Debug, Clone, PartialEq)]
pub struct EventPropertySeriesPoint {
    pub date: String,
    pub property_value: String,
    pub value: f64,
}

/// Render a count, dropping the fraction when it is integral
pub fn format_count(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

/// Chronological order over ISO date keys
pub fn by_date(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Largest count first; equal counts keep their order
pub fn by_value_desc(a: &EventPropertySeriesPoint, b: &EventPropertySeriesPoint) -> Ordering {
    b.value.total_cmp(&a.value)
}

/// Build the single-event report
pub fn format_event_stats(event: &str, response: &SegmentationResponse) -> Reply {
    if let Some(error) = response.error_message() {
        return translate_error(&error);
    }

    let mut points: Vec<EventSeriesPoint> = response
        .data
        .get(event)
        .into_iter()
        .flatten()
        .filter_map(|(date, value)| {
            (*value).map(|value| EventSeriesPoint {
                date: date.clone(),
                value,
            })
        })
        .collect();

    if points.iter().all(|p| p.value == 0.0) {
        return Reply::Text(format!(
            "Oops, couldn't find any data for the event '{event}' for this time period"
        ));
    }

    points.sort_by(|a, b| by_date(&a.date, &b.date));

    Reply::Entries(
        points
            .into_iter()
            .map(|point| {
                let count = format_count(point.value);
                DisplayEntry::titled(point.date.clone())
                    .with_fallback(format!("• {}: {count}", point.date))
                    .with_text(format!("{event}: {count}"))
            })
            .collect(),
    )
}

/// Build the event-by-property report
pub fn format_event_property_stats(
    event: &str,
    property: &str,
    response: &SegmentationResponse,
) -> Reply {
    if let Some(error) = response.error_message() {
        return translate_error(&error);
    }

    let mut dates: BTreeMap<&str, Vec<EventPropertySeriesPoint>> = BTreeMap::new();
    let mut all_zero = true;

    // Stable sorts below keep the API's key order among equal counts.
    for (property_value, series) in &response.data.values {
        for (date, value) in series {
            let Some(value) = *value else { continue };
            if value != 0.0 {
                all_zero = false;
            }
            dates.entry(date).or_default().push(EventPropertySeriesPoint {
                date: date.clone(),
                property_value: property_value.clone(),
                value,
            });
        }
    }

    if all_zero {
        return Reply::Text(format!(
            "Oops, couldn't find anything for this event {event} for this property: {property}"
        ));
    }

    let mut dates: Vec<(&str, Vec<EventPropertySeriesPoint>)> = dates.into_iter().collect();
    dates.sort_by(|a, b| by_date(a.0, b.0));

    Reply::Entries(
        dates
            .into_iter()
            .map(|(date, mut points)| {
                points.sort_by(by_value_desc);
                let ranked = points
                    .iter()
                    .map(|p| format!("{}: {}", p.property_value, format_count(p.value)))
                    .collect::<Vec<_>>()
                    .join(", ");

                DisplayEntry::titled(date)
                    .with_fallback(format!("• {date}: {ranked}"))
                    .with_text(format!("• {ranked}"))
            })
            .collect(),
    )
}
