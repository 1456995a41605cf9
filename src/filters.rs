use chrono::NaiveDate;
use serde::Deserialize;

pub const DEFAULT_LIMIT: u32 = 12;
pub const MAX_LIMIT: u32 = 50;

/// Past/upcoming classification requested by the caller. "Today" always
/// counts as upcoming.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Temporal {
    Any,
    PastOnly,
    UpcomingOnly,
}

/// Raw query parameters exactly as an HTTP layer would hand them over:
/// everything is an optional string until the normalizer has seen it.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct RawEventQuery {
    pub q: Option<String>,
    pub year: Option<String>,
    pub area_id: Option<String>,
    pub type_id: Option<String>,
    pub past: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct RawAreaQuery {
    pub year: Option<String>,
    pub past: Option<String>,
}

/// The validated, typed form of a filter request. Construction is a pure
/// transformation; malformed numeric input degrades to the default instead
/// of failing, which is deliberate for a public filter UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterCriteria {
    pub text: Option<String>,
    pub year_range: Option<(NaiveDate, NaiveDate)>,
    pub area_id: Option<i64>,
    pub type_id: Option<i64>,
    pub temporal: Temporal,
    pub page: u32,
    pub limit: u32,
}

impl FilterCriteria {
    pub fn from_raw(raw: &RawEventQuery) -> Self {
        Self {
            text: parse_text(raw.q.as_deref()),
            year_range: parse_year_range(raw.year.as_deref()),
            area_id: parse_positive_id(raw.area_id.as_deref()),
            type_id: parse_positive_id(raw.type_id.as_deref()),
            temporal: parse_temporal(raw.past.as_deref()),
            page: parse_page(raw.page.as_deref()),
            limit: parse_limit(raw.limit.as_deref()),
        }
    }
}

fn parse_text(raw: Option<&str>) -> Option<String> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A 4-digit year expands to the inclusive range Jan 1 ..= Dec 31. Anything
/// else leaves the year dimension unconstrained.
pub(crate) fn parse_year_range(raw: Option<&str>) -> Option<(NaiveDate, NaiveDate)> {
    let trimmed = raw?.trim();
    if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = trimmed.parse().ok()?;
    let start = NaiveDate::from_ymd_opt(year, 1, 1)?;
    let end = NaiveDate::from_ymd_opt(year, 12, 31)?;
    Some((start, end))
}

/// Non-numeric or non-positive ids mean "no filter", not an error.
fn parse_positive_id(raw: Option<&str>) -> Option<i64> {
    let id: i64 = raw?.trim().parse().ok()?;
    if id > 0 {
        Some(id)
    } else {
        None
    }
}

pub(crate) fn parse_temporal(raw: Option<&str>) -> Temporal {
    match raw.map(str::trim) {
        Some("true") => Temporal::PastOnly,
        Some("false") => Temporal::UpcomingOnly,
        _ => Temporal::Any,
    }
}

fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(1, |page| page.clamp(1, i64::from(u32::MAX)) as u32)
}

fn parse_limit(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .map_or(DEFAULT_LIMIT, |limit| {
            limit.clamp(1, i64::from(MAX_LIMIT)) as u32
        })
}
