//! Core of a small community-events portal: browse and filter events by
//! area, type, year, free text, and past/upcoming status; look up event
//! detail; accept contact messages. The HTTP layer and page rendering live
//! elsewhere and talk to this crate through [`Portal`].

pub mod areas;
pub mod clock;
pub mod contacts;
pub mod db;
pub mod filters;
pub mod models;
pub mod pagination;
pub mod portal;
pub mod projections;
pub mod query;
mod utils;

pub use clock::{Clock, FixedClock, SystemClock};
pub use db::Store;
pub use filters::{FilterCriteria, RawAreaQuery, RawEventQuery, Temporal};
pub use models::{Area, EventDetail, EventType, ProjectedEvent, ResultPage};
pub use portal::{Portal, PortalError};
