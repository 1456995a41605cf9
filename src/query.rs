use chrono::NaiveDate;
use rusqlite::ToSql;

use crate::filters::{FilterCriteria, Temporal};

/// The predicate set the store evaluates: every supplied dimension ANDs in,
/// omitted dimensions impose nothing. `today` pins the temporal
/// classification for the whole request so count and fetch agree.
#[derive(Debug, Clone)]
pub struct EventFilter {
    pub text: Option<String>,
    pub year_range: Option<(NaiveDate, NaiveDate)>,
    pub area_id: Option<i64>,
    pub type_id: Option<i64>,
    pub temporal: Temporal,
    pub today: NaiveDate,
}

impl EventFilter {
    pub fn from_criteria(criteria: &FilterCriteria, today: NaiveDate) -> Self {
        Self {
            text: criteria.text.clone(),
            year_range: criteria.year_range,
            area_id: criteria.area_id,
            type_id: criteria.type_id,
            temporal: criteria.temporal,
            today,
        }
    }

    /// Unfiltered listing, classified against `today`.
    pub fn any(today: NaiveDate) -> Self {
        Self {
            text: None,
            year_range: None,
            area_id: None,
            type_id: None,
            temporal: Temporal::Any,
            today,
        }
    }

    /// Renders the WHERE clause (empty string when no criteria are supplied)
    /// and the bound parameters in clause order. Dates are bound as ISO text,
    /// which compares correctly against the store's date column.
    pub(crate) fn where_clause(&self) -> (String, Vec<Box<dyn ToSql>>) {
        let mut clauses: Vec<&'static str> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(id) = self.area_id {
            clauses.push("ev.area_id = ?");
            params.push(Box::new(id));
        }
        if let Some(id) = self.type_id {
            clauses.push("ev.type_id = ?");
            params.push(Box::new(id));
        }
        if let Some((start, end)) = self.year_range {
            clauses.push("ev.date >= ? AND ev.date <= ?");
            params.push(Box::new(start));
            params.push(Box::new(end));
        }
        if let Some(text) = &self.text {
            clauses.push("(ev.title LIKE ? ESCAPE '\\' OR ev.description LIKE ? ESCAPE '\\')");
            let pattern = like_pattern(text);
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }
        match self.temporal {
            Temporal::Any => {}
            Temporal::PastOnly => {
                clauses.push("ev.date < ?");
                params.push(Box::new(self.today));
            }
            Temporal::UpcomingOnly => {
                clauses.push("ev.date >= ?");
                params.push(Box::new(self.today));
            }
        }

        let sql = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        (sql, params)
    }
}

/// Wraps user text for a literal substring LIKE: the wildcards `%` and `_`
/// (and the escape character itself) are escaped so they match themselves.
fn like_pattern(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 2);
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    format!("%{escaped}%")
}
