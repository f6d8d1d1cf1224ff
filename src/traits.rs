use std::error::Error;

use async_trait::async_trait;
use url::Url;

use crate::calendar::Calendar;
use crate::event::{CalendarObject, Event, TimeWindow};

/// A source of calendar data.
///
/// This is implemented by the actual CalDAV [`Client`](crate::client::Client), and menus and
/// operations are written against this trait, so that tests can run them against an
/// in-memory source instead of a live server.
#[async_trait]
pub trait CalendarSource {
    /// Resolve the path of the currently authenticated principal.
    ///
    /// This is the first network round-trip of a session: an authentication failure
    /// surfaces here. It either returns a non-empty principal path or an error, never both.
    async fn find_current_user_principal(&self) -> Result<String, Box<dyn Error>>;

    /// Resolve the path the principal's calendar collections live under
    async fn find_calendar_home_set(&self, principal: &str) -> Result<String, Box<dyn Error>>;

    /// List the calendar collections under a home set, in the order the server returns them
    async fn find_calendars(&self, home_set: &str) -> Result<Vec<Calendar>, Box<dyn Error>>;

    /// Create a new (empty) calendar collection under the home set
    async fn create_calendar(&self, home_set: &str, name: &str) -> Result<(), Box<dyn Error>>;

    /// Fetch the event objects of a calendar, optionally restricted to a time window
    async fn query_events(&self, calendar_url: &Url, window: Option<&TimeWindow>) -> Result<Vec<CalendarObject>, Box<dyn Error>>;

    /// Store a new event in its own object under the calendar collection.
    ///
    /// The object path is derived from the event UID, and the request must not overwrite
    /// an object that already exists there.
    async fn add_event(&self, calendar_url: &Url, event: &Event) -> Result<(), Box<dyn Error>>;

    /// Rewrite an existing calendar object with the given content
    async fn update_calendar_object(&self, object: &CalendarObject) -> Result<(), Box<dyn Error>>;
}
