use thiserror::Error;

use crate::areas;
use crate::clock::{Clock, SystemClock};
use crate::contacts::{self, ContactError, ContactInput};
use crate::db::Store;
use crate::filters::{self, FilterCriteria, RawAreaQuery, RawEventQuery};
use crate::models::{AreaEvents, EventDetail, FilterOptions, ProjectedEvent, ResultPage};
use crate::pagination;
use crate::projections;
use crate::query::EventFilter;

/// Only store failures and contact validation cross this boundary. Soft
/// not-founds (unknown area, unknown event, empty matches) come back as
/// empty results or `None`, and malformed filter input degrades to defaults
/// before it gets here.
#[derive(Debug, Error)]
pub enum PortalError {
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("{0}")]
    Contact(#[from] ContactError),
}

/// The portal core: a store handle plus a clock. One instance serves one
/// request scope; nothing in here is shared mutable state.
pub struct Portal<C: Clock = SystemClock> {
    store: Store,
    clock: C,
}

impl Portal<SystemClock> {
    pub fn new(store: Store) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<C: Clock> Portal<C> {
    pub fn with_clock(store: Store, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The main events listing: normalize the raw parameters, count the full
    /// match set, fetch one page, project for display.
    pub fn list_events(&self, raw: &RawEventQuery) -> Result<ResultPage, PortalError> {
        let criteria = FilterCriteria::from_raw(raw);
        let today = self.clock.today();
        let filter = EventFilter::from_criteria(&criteria, today);

        let total = self.store.count_events(&filter)?;
        let offset = pagination::offset(criteria.page, criteria.limit);
        let rows = self.store.find_events(&filter, criteria.limit, offset)?;
        let items = rows
            .iter()
            .map(|row| projections::project_event(row, today))
            .collect();

        Ok(ResultPage {
            items,
            total,
            page: criteria.page,
            limit: criteria.limit,
        })
    }

    /// Unpaged listing for an area page. The identifier may be a slug or a
    /// display-name variant; an unresolvable one yields an empty listing.
    pub fn list_events_for_area(
        &self,
        identifier: &str,
        raw: &RawAreaQuery,
    ) -> Result<AreaEvents, PortalError> {
        let candidates = self.store.list_areas()?;
        let Some(area) = areas::resolve_area(identifier, &candidates) else {
            return Ok(AreaEvents { items: Vec::new() });
        };

        let today = self.clock.today();
        let filter = EventFilter {
            text: None,
            year_range: filters::parse_year_range(raw.year.as_deref()),
            area_id: Some(area.id),
            type_id: None,
            temporal: filters::parse_temporal(raw.past.as_deref()),
            today,
        };
        let rows = self.store.find_all_events(&filter)?;
        let items = rows
            .iter()
            .map(|row| projections::project_event(row, today))
            .collect();
        Ok(AreaEvents { items })
    }

    pub fn event_detail(&self, id: i64) -> Result<Option<EventDetail>, PortalError> {
        let today = self.clock.today();
        Ok(self
            .store
            .find_event_by_id(id)?
            .map(|row| projections::project_detail(row, today)))
    }

    /// Dropdown data for the events explorer page.
    pub fn filter_options(&self) -> Result<FilterOptions, PortalError> {
        Ok(FilterOptions {
            years: self.store.distinct_years()?,
            areas: self.store.list_areas()?,
            types: self.store.list_event_types()?,
        })
    }

    /// Soonest-first upcoming events for the home page; element 0 is the
    /// featured "next event".
    pub fn upcoming_events(&self, limit: u32) -> Result<Vec<ProjectedEvent>, PortalError> {
        let today = self.clock.today();
        let rows = self.store.find_upcoming(today, limit)?;
        Ok(rows
            .iter()
            .map(|row| projections::project_event(row, today))
            .collect())
    }

    pub fn submit_contact(&self, input: &ContactInput) -> Result<(), PortalError> {
        let cleaned = contacts::validate(input)?;
        self.store.insert_contact(
            &cleaned.subject,
            &cleaned.name,
            &cleaned.email,
            &cleaned.message,
        )?;
        Ok(())
    }
}

// Convenience for handlers that only need the clamp rules.
pub fn page_count_for(page: &ResultPage) -> u64 {
    pagination::page_count(page.total, page.limit)
}
