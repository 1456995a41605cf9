use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, ToSql};

use crate::models::{Area, EventRow, EventType, NewEvent};
use crate::query::EventFilter;
use crate::utils;

const EVENT_SELECT: &str = "SELECT ev.id, ev.area_id, ev.type_id, ev.title, ev.description,
            ev.date, ev.venue, ev.image_url, ar.name, et.name
     FROM events ev
     JOIN areas ar ON ar.id = ev.area_id
     LEFT JOIN event_types et ON et.id = ev.type_id";

const EVENT_COUNT: &str = "SELECT COUNT(*)
     FROM events ev
     JOIN areas ar ON ar.id = ev.area_id
     LEFT JOIN event_types et ON et.id = ev.type_id";

// Date descending for the listings, id ascending so repeated queries page
// identically when several events share a date.
const EVENT_ORDER: &str = "ORDER BY ev.date DESC, ev.id ASC";

/// Handle on the portal database. Constructed once per request scope and
/// injected into the portal; reads are safe to run concurrently across
/// handles under SQLite's own locking.
pub struct Store {
    conn: Connection,
}

impl Store {
    pub fn open_default() -> rusqlite::Result<Self> {
        let path = utils::database_path();
        utils::ensure_parent(&path);
        Self::open(path)
    }

    pub fn open<P: AsRef<std::path::Path>>(path: P) -> rusqlite::Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> rusqlite::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> rusqlite::Result<Self> {
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> rusqlite::Result<()> {
        self.conn.execute_batch(
            "PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS areas(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS event_types(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );
            CREATE TABLE IF NOT EXISTS events(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                area_id INTEGER NOT NULL,
                type_id INTEGER,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                venue TEXT,
                image_url TEXT,
                FOREIGN KEY (area_id) REFERENCES areas(id) ON DELETE CASCADE,
                FOREIGN KEY (type_id) REFERENCES event_types(id) ON DELETE SET NULL
            );
            CREATE TABLE IF NOT EXISTS contacts(
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                subject TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                message TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )?;
        Ok(())
    }

    // ----- data entry (seed/admin path) -----

    pub fn insert_area(&self, name: &str) -> rusqlite::Result<i64> {
        self.conn
            .execute("INSERT INTO areas (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_event_type(&self, name: &str) -> rusqlite::Result<i64> {
        self.conn
            .execute("INSERT INTO event_types (name) VALUES (?1)", params![name])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_event(&self, event: &NewEvent) -> rusqlite::Result<i64> {
        self.conn.execute(
            "INSERT INTO events (area_id, type_id, title, description, date, venue, image_url)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.area_id,
                event.type_id,
                event.title,
                event.description,
                event.date,
                event.venue,
                event.image_url
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn insert_contact(
        &self,
        subject: &str,
        name: &str,
        email: &str,
        message: &str,
    ) -> rusqlite::Result<()> {
        self.conn.execute(
            "INSERT INTO contacts (subject, name, email, message) VALUES (?1, ?2, ?3, ?4)",
            params![subject, name, email, message],
        )?;
        Ok(())
    }

    // ----- read path -----

    /// Count of every event matching the filter, ignoring pagination.
    pub fn count_events(&self, filter: &EventFilter) -> rusqlite::Result<u64> {
        let (where_sql, bound) = filter.where_clause();
        let sql = format!("{EVENT_COUNT} {where_sql}");
        let params_ref: Vec<&dyn ToSql> = bound.iter().map(AsRef::as_ref).collect();
        let total: i64 = self
            .conn
            .query_row(&sql, params_from_iter(params_ref), |row| row.get(0))?;
        Ok(total as u64)
    }

    /// One page of matching events in listing order.
    pub fn find_events(
        &self,
        filter: &EventFilter,
        limit: u32,
        offset: u64,
    ) -> rusqlite::Result<Vec<EventRow>> {
        let (where_sql, mut bound) = filter.where_clause();
        let sql = format!("{EVENT_SELECT} {where_sql} {EVENT_ORDER} LIMIT ? OFFSET ?");
        bound.push(Box::new(i64::from(limit)));
        bound.push(Box::new(offset as i64));
        self.query_events(&sql, bound)
    }

    /// Every matching event, for the unpaged area listings.
    pub fn find_all_events(&self, filter: &EventFilter) -> rusqlite::Result<Vec<EventRow>> {
        let (where_sql, bound) = filter.where_clause();
        let sql = format!("{EVENT_SELECT} {where_sql} {EVENT_ORDER}");
        self.query_events(&sql, bound)
    }

    /// Events dated `today` or later, soonest first, for the home page.
    pub fn find_upcoming(&self, today: NaiveDate, limit: u32) -> rusqlite::Result<Vec<EventRow>> {
        let sql = format!(
            "{EVENT_SELECT} WHERE ev.date >= ? ORDER BY ev.date ASC, ev.id ASC LIMIT ?"
        );
        let bound: Vec<Box<dyn ToSql>> = vec![Box::new(today), Box::new(i64::from(limit))];
        self.query_events(&sql, bound)
    }

    pub fn find_event_by_id(&self, id: i64) -> rusqlite::Result<Option<EventRow>> {
        let sql = format!("{EVENT_SELECT} WHERE ev.id = ?1");
        self.conn
            .query_row(&sql, params![id], row_to_event)
            .optional()
    }

    pub fn find_area(&self, id: i64) -> rusqlite::Result<Option<Area>> {
        self.conn
            .query_row(
                "SELECT id, name FROM areas WHERE id = ?1",
                params![id],
                |row| {
                    Ok(Area {
                        id: row.get(0)?,
                        name: row.get(1)?,
                    })
                },
            )
            .optional()
    }

    pub fn list_areas(&self) -> rusqlite::Result<Vec<Area>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM areas ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(Area {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect()
    }

    pub fn list_event_types(&self) -> rusqlite::Result<Vec<EventType>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM event_types ORDER BY name")?;
        let rows = stmt.query_map([], |row| {
            Ok(EventType {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        rows.collect()
    }

    /// Distinct event years, newest first, for the year dropdown.
    pub fn distinct_years(&self) -> rusqlite::Result<Vec<i32>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT CAST(strftime('%Y', date) AS INTEGER) AS y
             FROM events ORDER BY y DESC",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        rows.collect()
    }

    fn query_events(
        &self,
        sql: &str,
        bound: Vec<Box<dyn ToSql>>,
    ) -> rusqlite::Result<Vec<EventRow>> {
        let mut stmt = self.conn.prepare(sql)?;
        let params_ref: Vec<&dyn ToSql> = bound.iter().map(AsRef::as_ref).collect();
        let rows = stmt.query_map(params_from_iter(params_ref), row_to_event)?;
        rows.collect()
    }
}

fn row_to_event(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok(EventRow {
        id: row.get(0)?,
        area_id: row.get(1)?,
        type_id: row.get(2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        date: row.get(5)?,
        venue: row.get(6)?,
        image_url: row.get(7)?,
        area: row.get(8)?,
        event_type: row.get(9)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::Temporal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn event(area_id: i64, type_id: Option<i64>, title: &str, desc: &str, on: NaiveDate) -> NewEvent {
        NewEvent {
            area_id,
            type_id,
            title: title.to_string(),
            description: desc.to_string(),
            date: on,
            venue: None,
            image_url: None,
        }
    }

    /// Mirrors the production seed: four areas, a handful of 2024/2025 events.
    fn seeded_store() -> Store {
        let store = Store::open_in_memory().expect("in-memory store");
        let sports = store.insert_area("Sports").expect("area");
        let health = store.insert_area("Health").expect("area");
        let education = store.insert_area("Education").expect("area");
        let arts = store.insert_area("Arts & Culture").expect("area");

        let concert = store.insert_event_type("Concert").expect("type");
        let fair = store.insert_event_type("Fair").expect("type");
        let workshop = store.insert_event_type("Workshop").expect("type");
        let talk = store.insert_event_type("Talk").expect("type");

        for new_event in [
            event(sports, None, "Community Football Match", "Friendly 7-a-side at Riverside Park.", date(2025, 9, 26)),
            event(arts, Some(concert), "Autumn Jazz Night", "Local bands and open mic.", date(2025, 10, 12)),
            event(education, Some(workshop), "Intro to Coding Workshop", "Learn web basics in a day.", date(2025, 11, 5)),
            event(health, Some(fair), "Wellbeing Fair", "Stalls, talks and free health checks.", date(2025, 10, 2)),
            event(arts, Some(talk), "Local Authors Talk", "Meet and Q&A with local writers.", date(2024, 5, 15)),
            event(sports, None, "Summer Tennis Meetup", "Casual doubles and coaching tips.", date(2024, 8, 20)),
        ] {
            store.insert_event(&new_event).expect("event");
        }
        store
    }

    fn filter(today: NaiveDate) -> EventFilter {
        EventFilter::any(today)
    }

    #[test]
    fn count_and_find_agree_without_filters() {
        let store = seeded_store();
        let all = filter(date(2025, 1, 1));
        assert_eq!(store.count_events(&all).expect("count"), 6);
        let rows = store.find_events(&all, 50, 0).expect("rows");
        assert_eq!(rows.len(), 6);
    }

    #[test]
    fn listing_is_date_descending_with_id_tiebreak() {
        let store = seeded_store();
        let arts = store
            .list_areas()
            .expect("areas")
            .into_iter()
            .find(|a| a.name == "Arts & Culture")
            .expect("arts area");
        // Two events on the same date in the same area; insertion order must
        // decide their relative position.
        let first = store
            .insert_event(&event(arts.id, None, "Morning Craft Market", "Stalls.", date(2025, 3, 3)))
            .expect("event");
        let second = store
            .insert_event(&event(arts.id, None, "Evening Craft Market", "More stalls.", date(2025, 3, 3)))
            .expect("event");

        let rows = store
            .find_events(&filter(date(2025, 1, 1)), 50, 0)
            .expect("rows");
        let dates: Vec<NaiveDate> = rows.iter().map(|r| r.date).collect();
        let mut sorted = dates.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(dates, sorted, "dates must descend");

        let tied: Vec<i64> = rows
            .iter()
            .filter(|r| r.date == date(2025, 3, 3))
            .map(|r| r.id)
            .collect();
        assert_eq!(tied, vec![first, second]);
    }

    #[test]
    fn text_filter_matches_title_or_description_case_insensitively() {
        let store = seeded_store();
        let mut by_text = filter(date(2025, 1, 1));
        by_text.text = Some("JAZZ".to_string());
        let rows = store.find_events(&by_text, 50, 0).expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Autumn Jazz Night");

        by_text.text = Some("coaching".to_string());
        let rows = store.find_events(&by_text, 50, 0).expect("rows");
        assert_eq!(rows.len(), 1, "description text must match too");
        assert_eq!(rows[0].title, "Summer Tennis Meetup");
    }

    #[test]
    fn like_wildcards_in_user_text_are_literal() {
        let store = seeded_store();
        let mut by_text = filter(date(2025, 1, 1));
        by_text.text = Some("%".to_string());
        let rows = store.find_events(&by_text, 50, 0).expect("rows");
        assert!(rows.is_empty(), "a bare %% must not match everything");
    }

    #[test]
    fn year_range_is_inclusive_of_december_31() {
        let store = seeded_store();
        let arts = store.list_areas().expect("areas")[0].id;
        store
            .insert_event(&event(arts, None, "New Year's Eve Gala", "Fireworks at midnight.", date(2025, 12, 31)))
            .expect("event");

        let mut by_year = filter(date(2025, 1, 1));
        by_year.year_range = crate::filters::parse_year_range(Some("2025"));
        let rows = store.find_events(&by_year, 50, 0).expect("rows");
        assert!(rows.iter().any(|r| r.title == "New Year's Eve Gala"));
        assert!(rows.iter().all(|r| r.date.format("%Y").to_string() == "2025"));
    }

    #[test]
    fn temporal_filters_split_on_today() {
        let store = seeded_store();
        let today = date(2025, 1, 1);

        let mut past = filter(today);
        past.temporal = Temporal::PastOnly;
        let rows = store.find_events(&past, 50, 0).expect("rows");
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.date < today));

        let mut upcoming = filter(today);
        upcoming.temporal = Temporal::UpcomingOnly;
        let rows = store.find_events(&upcoming, 50, 0).expect("rows");
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| r.date >= today));
    }

    #[test]
    fn area_and_type_filters_compose() {
        let store = seeded_store();
        let arts = store
            .list_areas()
            .expect("areas")
            .into_iter()
            .find(|a| a.name == "Arts & Culture")
            .expect("arts area");
        let concert = store
            .list_event_types()
            .expect("types")
            .into_iter()
            .find(|t| t.name == "Concert")
            .expect("concert type");

        let mut combined = filter(date(2025, 1, 1));
        combined.area_id = Some(arts.id);
        combined.type_id = Some(concert.id);
        let rows = store.find_events(&combined, 50, 0).expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Autumn Jazz Night");
        assert_eq!(rows[0].event_type.as_deref(), Some("Concert"));
    }

    #[test]
    fn count_respects_the_filter_not_the_page() {
        let store = seeded_store();
        let all = filter(date(2025, 1, 1));
        let page = store.find_events(&all, 2, 0).expect("rows");
        assert_eq!(page.len(), 2);
        assert_eq!(store.count_events(&all).expect("count"), 6);
    }

    #[test]
    fn event_lookup_by_id_joins_names() {
        let store = seeded_store();
        let rows = store
            .find_events(&filter(date(2025, 1, 1)), 50, 0)
            .expect("rows");
        let jazz = rows
            .iter()
            .find(|r| r.title == "Autumn Jazz Night")
            .expect("jazz row");
        let found = store
            .find_event_by_id(jazz.id)
            .expect("lookup")
            .expect("present");
        assert_eq!(found.area, "Arts & Culture");
        assert_eq!(found.event_type.as_deref(), Some("Concert"));
        assert!(store.find_event_by_id(9999).expect("lookup").is_none());
    }

    #[test]
    fn upcoming_listing_is_soonest_first() {
        let store = seeded_store();
        let rows = store.find_upcoming(date(2025, 1, 1), 3).expect("rows");
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].title, "Community Football Match");
        assert!(rows.windows(2).all(|pair| pair[0].date <= pair[1].date));
    }

    #[test]
    fn distinct_years_are_newest_first() {
        let store = seeded_store();
        assert_eq!(store.distinct_years().expect("years"), vec![2025, 2024]);
    }

    #[test]
    fn contacts_are_inserted() {
        let store = seeded_store();
        store
            .insert_contact("Broken link", "Sam", "sam@example.org", "The FAQ page 404s.")
            .expect("insert");
        let count: i64 = store
            .conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
            .expect("count");
        assert_eq!(count, 1);
    }

    #[test]
    fn file_backed_store_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("portal.sqlite");
        {
            let store = Store::open(&path).expect("open");
            let area = store.insert_area("Sports").expect("area");
            store
                .insert_event(&event(area, None, "Fun Run", "5k around the park.", date(2025, 6, 1)))
                .expect("event");
        }
        let reopened = Store::open(&path).expect("reopen");
        let rows = reopened
            .find_events(&filter(date(2025, 1, 1)), 10, 0)
            .expect("rows");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].title, "Fun Run");
    }
}
