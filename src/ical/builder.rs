//! A module to build ICal files

use std::error::Error;

use chrono::{DateTime, NaiveDateTime, Utc};
use ics::properties::{CalScale, DtEnd, DtStart, Summary};
use ics::{Event as IcsEvent, ICalendar};

use crate::event::Event;

/// Create an iCal object from a list of [`crate::event::Event`]
pub fn build_from(events: &[Event]) -> Result<String, Box<dyn Error>> {
    let mut calendar = ICalendar::new("2.0", crate::ical::default_prod_id());
    calendar.push(CalScale::new("GREGORIAN"));

    for event in events {
        let mut ics_event = IcsEvent::new(event.uid().to_string(), format_utc_date_time(event.stamp()));
        ics_event.push(Summary::new(event.summary().to_string()));
        ics_event.push(DtStart::new(format_date_time(event.start())));
        ics_event.push(DtEnd::new(format_date_time(event.end())));
        calendar.add_event(ics_event);
    }

    Ok(calendar.to_string())
}

fn format_date_time(dt: NaiveDateTime) -> String {
    dt.format("%Y%m%dT%H%M%S").to_string()
}

fn format_utc_date_time(dt: DateTime<Utc>) -> String {
    dt.format("%Y%m%dT%H%M%SZ").to_string()
}
