//! Domain errors that callers need to tell apart from plain transport failures.
//!
//! Transport and protocol errors travel as boxed ad-hoc errors; the menu only prints them.
//! The types here cover the few conditions that have a meaning of their own (a lookup that
//! found nothing, an event property that could not be decoded), so they can be matched on
//! with [`Error::downcast_ref`](std::error::Error).

use thiserror::Error;

/// No calendar with this display name exists under the home set.
///
/// Returned after a full, successful scan of the server's calendar list. The match is
/// case-sensitive.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("calendar with name {name} not found")]
pub struct CalendarNotFound {
    pub name: String,
}

/// No event with this UID exists in the calendar.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("event with UID {uid} not found in calendar {calendar}")]
pub struct EventNotFound {
    pub uid: String,
    pub calendar: String,
}

/// A VEVENT property that this client requires was missing or malformed.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("cannot decode {property} in {url}: {detail}")]
pub struct EventDecodeError {
    pub property: &'static str,
    pub url: String,
    pub detail: String,
}
