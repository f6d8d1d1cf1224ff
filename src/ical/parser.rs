//! A module to parse ICal files

use std::error::Error;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use ical::parser::ical::component::IcalEvent;
use url::Url;

use crate::error::EventDecodeError;
use crate::event::{CalendarObject, Event};

const DATE_TIME_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Parse an iCal file into the internal representation [`crate::event::CalendarObject`]
pub fn parse(content: &str, object_url: Url) -> Result<CalendarObject, Box<dyn Error>> {
    let mut reader = ical::IcalParser::new(content.as_bytes());
    let parsed_object = match reader.next() {
        None => return Err(format!("Invalid iCal data to parse for object {}", object_url).into()),
        Some(object) => match object {
            Err(err) => return Err(format!("Unable to parse iCal data for object {}: {}", object_url, err).into()),
            Ok(object) => object,
        }
    };

    // This client only manages event objects
    if parsed_object.todos.is_empty() == false || parsed_object.journals.is_empty() == false {
        return Err(format!("Object {} contains components that are not VEVENTs, this is not supported", object_url).into());
    }

    let mut events = Vec::new();
    for ical_event in &parsed_object.events {
        events.push(parse_event(ical_event, &object_url)?);
    }

    // What to do with multiple objects?
    if reader.next().map(|r| r.is_ok()) == Some(true) {
        return Err("Parsing multiple objects is not supported".into());
    }

    Ok(CalendarObject::new(object_url, events))
}

fn parse_event(ical_event: &IcalEvent, url: &Url) -> Result<Event, Box<dyn Error>> {
    let summary = required_prop(ical_event, "SUMMARY", url)?;
    let uid = required_prop(ical_event, "UID", url)?;
    let start = parse_date_time(&required_prop(ical_event, "DTSTART", url)?, "DTSTART", url)?;
    let end = parse_date_time(&required_prop(ical_event, "DTEND", url)?, "DTEND", url)?;

    // DTSTAMP is required by RFC 5545, but some servers leave it out anyway
    let stamp = match prop_value(ical_event, "DTSTAMP") {
        Some(value) => parse_utc_stamp(&value, url)?,
        None => Utc::now(),
    };

    Ok(Event::new_with_parameters(uid, summary, start, end, stamp))
}

fn prop_value(ical_event: &IcalEvent, name: &str) -> Option<String> {
    for prop in &ical_event.properties {
        if prop.name == name {
            return prop.value.clone();
        }
    }
    None
}

fn required_prop(ical_event: &IcalEvent, property: &'static str, url: &Url) -> Result<String, Box<dyn Error>> {
    match prop_value(ical_event, property) {
        Some(value) => Ok(value),
        None => Err(Box::new(EventDecodeError{
            property,
            url: url.to_string(),
            detail: "missing property".to_string(),
        })),
    }
}

/// Decode a date-time property value into the local time zone.
///
/// Values in UTC (`...Z`) are converted, floating values are taken as-is.
fn parse_date_time(value: &str, property: &'static str, url: &Url) -> Result<NaiveDateTime, Box<dyn Error>> {
    match value.strip_suffix('Z') {
        Some(utc_value) => {
            let naive = NaiveDateTime::parse_from_str(utc_value, DATE_TIME_FORMAT)
                .map_err(|err| decode_error(property, url, &err.to_string()))?;
            Ok(Utc.from_utc_datetime(&naive).with_timezone(&Local).naive_local())
        },
        None => {
            NaiveDateTime::parse_from_str(value, DATE_TIME_FORMAT)
                .map_err(|err| decode_error(property, url, &err.to_string()).into())
        },
    }
}

fn parse_utc_stamp(value: &str, url: &Url) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let trimmed = value.strip_suffix('Z').unwrap_or(value);
    let naive = NaiveDateTime::parse_from_str(trimmed, DATE_TIME_FORMAT)
        .map_err(|err| decode_error("DTSTAMP", url, &err.to_string()))?;
    Ok(Utc.from_utc_datetime(&naive))
}

fn decode_error(property: &'static str, url: &Url, detail: &str) -> EventDecodeError {
    EventDecodeError{
        property,
        url: url.to_string(),
        detail: detail.to_string(),
    }
}


#[cfg(test)]
mod test {
    const EXAMPLE_ICAL: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Nextcloud Calendar v2.0.4
BEGIN:VEVENT
UID:0633de27-8c32-42be-bcb8-63bc879c6185
DTSTAMP:20240101T080000Z
SUMMARY:Team standup
DTSTART:20240101T090000
DTEND:20240101T091500
END:VEVENT
END:VCALENDAR
"#;

    const EXAMPLE_ICAL_WITHOUT_UID: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Nextcloud Calendar v2.0.4
BEGIN:VEVENT
DTSTAMP:20240101T080000Z
SUMMARY:Team standup
DTSTART:20240101T090000
DTEND:20240101T091500
END:VEVENT
END:VCALENDAR
"#;

    const EXAMPLE_ICAL_WITH_TODO: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
PRODID:-//Nextcloud Tasks v0.13.6
BEGIN:VTODO
UID:0633de27-8c32-42be-bcb8-63bc879c6185
DTSTAMP:20210321T001600
SUMMARY:Do not forget to do this
END:VTODO
END:VCALENDAR
"#;

    const EXAMPLE_MULTIPLE_ICAL: &str = r#"BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:0633de27-8c32-42be-bcb8-63bc879c6185
DTSTAMP:20240101T080000Z
SUMMARY:First object
DTSTART:20240101T090000
DTEND:20240101T091500
END:VEVENT
END:VCALENDAR
BEGIN:VCALENDAR
VERSION:2.0
BEGIN:VEVENT
UID:29c3c2f7-1f91-4c89-b1f6-5a9bd25a9a42
DTSTAMP:20240101T080000Z
SUMMARY:Second object
DTSTART:20240102T090000
DTEND:20240102T091500
END:VEVENT
END:VCALENDAR
"#;

    use super::*;

    fn example_url() -> Url {
        "http://some.id/for/testing.ics".parse().unwrap()
    }

    #[test]
    fn test_ical_parsing() {
        let object = parse(EXAMPLE_ICAL, example_url()).unwrap();
        assert_eq!(object.url(), &example_url());
        assert_eq!(object.events().len(), 1);

        let event = &object.events()[0];
        assert_eq!(event.uid(), "0633de27-8c32-42be-bcb8-63bc879c6185");
        assert_eq!(event.summary(), "Team standup");
        assert_eq!(event.start(), NaiveDateTime::parse_from_str("20240101T090000", DATE_TIME_FORMAT).unwrap());
        assert_eq!(event.end(), NaiveDateTime::parse_from_str("20240101T091500", DATE_TIME_FORMAT).unwrap());
        assert_eq!(event.stamp(), Utc.from_utc_datetime(&NaiveDateTime::parse_from_str("20240101T080000", DATE_TIME_FORMAT).unwrap()));
    }

    #[test]
    fn test_missing_uid_is_a_decode_error() {
        let result = parse(EXAMPLE_ICAL_WITHOUT_UID, example_url());
        let err = result.unwrap_err();
        let decode_err = err.downcast_ref::<EventDecodeError>().expect("should be an EventDecodeError");
        assert_eq!(decode_err.property, "UID");
    }

    #[test]
    fn test_utc_date_times_are_converted_to_local() {
        let utc_ical = EXAMPLE_ICAL.replace("DTSTART:20240101T090000", "DTSTART:20240101T090000Z");
        let object = parse(&utc_ical, example_url()).unwrap();

        let expected_start = Utc.from_utc_datetime(&NaiveDateTime::parse_from_str("20240101T090000", DATE_TIME_FORMAT).unwrap())
            .with_timezone(&Local)
            .naive_local();
        assert_eq!(object.events()[0].start(), expected_start);
    }

    #[test]
    fn test_todo_objects_are_rejected() {
        assert!(parse(EXAMPLE_ICAL_WITH_TODO, example_url()).is_err());
    }

    #[test]
    fn test_multiple_objects_in_ical() {
        assert!(parse(EXAMPLE_MULTIPLE_ICAL, example_url()).is_err());
    }
}
