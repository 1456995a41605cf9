use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A thematic category event listings are grouped under, e.g. "Sports" or
/// "Arts & Culture". Seeded at setup time and immutable afterwards.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Area {
    pub id: i64,
    pub name: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct EventType {
    pub id: i64,
    pub name: String,
}

/// A stored event joined with its area name and optional type name.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct EventRow {
    pub id: i64,
    pub area_id: i64,
    pub type_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub area: String,
    pub event_type: Option<String>,
}

/// Input shape for data entry; the store assigns the id.
#[derive(Deserialize, Clone, Debug)]
pub struct NewEvent {
    pub area_id: i64,
    pub type_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub venue: Option<String>,
    pub image_url: Option<String>,
}

/// Card-sized public view of an event. `summary` is the description cut down
/// to a bounded length; `image_url` is passed through unchecked.
#[derive(Serialize, Clone, Debug)]
pub struct ProjectedEvent {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub date: NaiveDate,
    pub area: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub is_past: bool,
}

/// Full detail view for a single event page.
#[derive(Serialize, Clone, Debug)]
pub struct EventDetail {
    pub id: i64,
    pub area_id: i64,
    pub type_id: Option<i64>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub venue: Option<String>,
    pub image_url: Option<String>,
    pub area: String,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub is_past: bool,
}

/// One page of filtered results. `total` counts every match, ignoring
/// pagination.
#[derive(Serialize, Debug)]
pub struct ResultPage {
    pub items: Vec<ProjectedEvent>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

/// Unpaged listing for a single area page.
#[derive(Serialize, Debug)]
pub struct AreaEvents {
    pub items: Vec<ProjectedEvent>,
}

/// Values the filter dropdowns are built from.
#[derive(Serialize, Debug)]
pub struct FilterOptions {
    pub years: Vec<i32>,
    pub areas: Vec<Area>,
    pub types: Vec<EventType>,
}
