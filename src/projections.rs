use chrono::NaiveDate;

use crate::models::{EventDetail, EventRow, ProjectedEvent};

/// Longest summary shown on a card.
pub const SUMMARY_MAX_CHARS: usize = 200;

/// Cuts a description down to the card summary length, counting characters
/// rather than bytes so a multibyte character is never split.
pub fn summarize(description: &str) -> String {
    match description.char_indices().nth(SUMMARY_MAX_CHARS) {
        Some((byte_idx, _)) => description[..byte_idx].to_string(),
        None => description.to_string(),
    }
}

/// An event is past when its date is strictly before today; today's events
/// still count as upcoming.
pub fn is_past(date: NaiveDate, today: NaiveDate) -> bool {
    date < today
}

pub fn project_event(row: &EventRow, today: NaiveDate) -> ProjectedEvent {
    ProjectedEvent {
        id: row.id,
        title: row.title.clone(),
        summary: summarize(&row.description),
        date: row.date,
        area: row.area.clone(),
        event_type: row.event_type.clone(),
        venue: row.venue.clone(),
        image_url: row.image_url.clone(),
        is_past: is_past(row.date, today),
    }
}

pub fn project_detail(row: EventRow, today: NaiveDate) -> EventDetail {
    let past = is_past(row.date, today);
    EventDetail {
        id: row.id,
        area_id: row.area_id,
        type_id: row.type_id,
        title: row.title,
        description: row.description,
        date: row.date,
        venue: row.venue,
        image_url: row.image_url,
        area: row.area,
        event_type: row.event_type,
        is_past: past,
    }
}
