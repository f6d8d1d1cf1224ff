//! Calendar events (iCal `VEVENT` components) and the server objects that hold them

use chrono::{DateTime, Duration, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// How far back the default event listing looks
const RECENT_PAST_HOURS: i64 = 92;
/// How far ahead the default event listing looks
const NEAR_FUTURE_HOURS: i64 = 24;

/// A calendar event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Persistent, globally unique identifier for the calendar component.
    /// The [RFC](https://tools.ietf.org/html/rfc5545#page-117) recommends concatenating a timestamp with the server's domain name, but UUID are even better.
    /// It is picked at creation and never changes; deletion looks events up by this key only.
    uid: String,

    /// The display summary of the event
    summary: String,

    /// `DTSTART`, in floating local time
    start: NaiveDateTime,

    /// `DTEND`, in floating local time
    end: NaiveDateTime,

    /// `DTSTAMP`: the time this event record was created
    stamp: DateTime<Utc>,
}

impl Event {
    /// Create a brand new event that is not on a server yet.
    /// This will pick a new (random) UID and stamp the event with the current UTC time.
    pub fn new(summary: String, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let new_uid = Uuid::new_v4().to_hyphenated().to_string();
        Self::new_with_parameters(new_uid, summary, start, end, Utc::now())
    }

    /// Create an event from data that already exists (e.g. that has been fetched from a server)
    pub fn new_with_parameters(uid: String, summary: String, start: NaiveDateTime, end: NaiveDateTime, stamp: DateTime<Utc>) -> Self {
        Self { uid, summary, start, end, stamp }
    }

    pub fn uid(&self) -> &str { &self.uid }
    pub fn summary(&self) -> &str { &self.summary }
    pub fn start(&self) -> NaiveDateTime { self.start }
    pub fn end(&self) -> NaiveDateTime { self.end }
    pub fn stamp(&self) -> DateTime<Utc> { self.stamp }
}


/// One calendar resource (an `.ics` file) on the server, and the events it aggregates.
///
/// Objects created by this client hold a single event each, but servers may also store
/// objects that aggregate several events, so this models a list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalendarObject {
    url: Url,
    events: Vec<Event>,
}

impl CalendarObject {
    pub fn new(url: Url, events: Vec<Event>) -> Self {
        Self { url, events }
    }

    /// The URL this object can be fetched from (and rewritten to)
    pub fn url(&self) -> &Url { &self.url }

    pub fn events(&self) -> &[Event] { &self.events }

    pub fn contains_uid(&self, uid: &str) -> bool {
        self.events.iter().any(|event| event.uid() == uid)
    }
}


/// The time range a calendar query is restricted to
#[derive(Clone, Debug, PartialEq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The rolling window the event listing uses: from the recent past to the near future
    pub fn recent() -> Self {
        let now = Utc::now();
        Self::new(now - Duration::hours(RECENT_PAST_HOURS), now + Duration::hours(NEAR_FUTURE_HOURS))
    }

    pub fn start(&self) -> DateTime<Utc> { self.start }
    pub fn end(&self) -> DateTime<Utc> { self.end }

    /// Whether a floating local timestamp falls within this window
    pub fn contains_local(&self, timestamp: NaiveDateTime) -> bool {
        let start = self.start.with_timezone(&Local).naive_local();
        let end = self.end.with_timezone(&Local).naive_local();
        start <= timestamp && timestamp <= end
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_events_get_distinct_uids() {
        let start = NaiveDateTime::parse_from_str("2024.01.01 09.00.00", "%Y.%m.%d %H.%M.%S").unwrap();
        let end = NaiveDateTime::parse_from_str("2024.01.01 09.15.00", "%Y.%m.%d %H.%M.%S").unwrap();

        let first = Event::new("Standup".to_string(), start, end);
        let second = Event::new("Standup".to_string(), start, end);

        assert!(first.uid().is_empty() == false);
        assert_ne!(first.uid(), second.uid());
    }

    #[test]
    fn test_recent_window_bounds() {
        let window = TimeWindow::recent();
        let now = Local::now().naive_local();

        assert!(window.contains_local(now));
        assert!(window.contains_local(now - Duration::hours(91)));
        assert!(window.contains_local(now - Duration::hours(100)) == false);
        assert!(window.contains_local(now + Duration::hours(30)) == false);
    }
}
