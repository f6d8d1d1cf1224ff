//! The operations behind the menu entries.
//!
//! These are thin orchestrations over a [`CalendarSource`]: fetch, scan, rewrite. Errors
//! from the source propagate unchanged, the menu is the recovery boundary.

use std::error::Error;

use crate::calendar::Calendar;
use crate::error::{CalendarNotFound, EventNotFound};
use crate::event::{CalendarObject, Event, TimeWindow};
use crate::traits::CalendarSource;

/// What a delete request ended up doing
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeleteOutcome {
    /// The event was removed and the object was rewritten on the server
    Deleted,
    /// The delete was refused, since it would have left the calendar object empty.
    /// The server object has not been touched.
    RefusedLastEvent,
}

/// Find a calendar under the home set by its exact display name.
///
/// The whole list is scanned in server order and the first exact (case-sensitive) match
/// wins. A full scan without a match is a [`CalendarNotFound`] error, which is distinct
/// from the transport errors a failed listing produces.
pub async fn find_calendar<S: CalendarSource>(source: &S, home_set: &str, name: &str) -> Result<Calendar, Box<dyn Error>> {
    let calendars = source.find_calendars(home_set).await?;
    for calendar in calendars {
        if calendar.name() == name {
            return Ok(calendar);
        }
    }
    Err(Box::new(CalendarNotFound{ name: name.to_string() }))
}

/// Fetch the events of a calendar, in the order the server returns them.
///
/// A failure to decode any single event aborts the whole listing, there is no partial
/// result.
pub async fn list_events<S: CalendarSource>(source: &S, calendar: &Calendar, window: Option<&TimeWindow>) -> Result<Vec<Event>, Box<dyn Error>> {
    let objects = source.query_events(calendar.url(), window).await?;

    let mut events = Vec::new();
    for object in objects {
        events.extend(object.events().iter().cloned());
    }
    Ok(events)
}

/// Remove the event with this UID from the calendar.
///
/// The object holding the event is fetched, its events are filtered, and the object is
/// rewritten without the matching event. A delete that would leave the object with zero
/// events is refused (the server object stays untouched); this is an outcome, not an
/// error.
pub async fn delete_event<S: CalendarSource>(source: &S, calendar: &Calendar, uid: &str) -> Result<DeleteOutcome, Box<dyn Error>> {
    let objects = source.query_events(calendar.url(), None).await?;

    for object in objects {
        if object.contains_uid(uid) == false {
            continue;
        }

        let remaining: Vec<Event> = object.events().iter()
            .filter(|event| event.uid() != uid)
            .cloned()
            .collect();
        if remaining.is_empty() {
            return Ok(DeleteOutcome::RefusedLastEvent);
        }

        let updated = CalendarObject::new(object.url().clone(), remaining);
        source.update_calendar_object(&updated).await?;
        return Ok(DeleteOutcome::Deleted);
    }

    Err(Box::new(EventNotFound{
        uid: uid.to_string(),
        calendar: calendar.name().to_string(),
    }))
}
