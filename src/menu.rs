//! The interactive menu loops.
//!
//! Three nested states (main menu, calendar menu, event menu), each one a loop that reads
//! an integer choice and dispatches on it. Unrecognized entries just redisplay the menu.
//! Operation errors are printed in red and the loop goes on: the menus are the recovery
//! boundary for everything the server can throw at us. Only input failures tear a menu
//! down, since there is no way to go on without a user.

use std::error::Error;
use std::io::{BufRead, Write};

use chrono::NaiveDateTime;
use colored::Colorize;

use crate::calendar::Calendar;
use crate::credentials::{self, Credentials};
use crate::event::{Event, TimeWindow};
use crate::ops::{self, DeleteOutcome};
use crate::traits::CalendarSource;

fn blue_line(text: &str) {
    println!("{}", text.blue());
}

fn red_line<E: std::fmt::Display + ?Sized>(err: &E) {
    println!("{}", err.to_string().red());
}

/// Read one line of input. `None` means the input is exhausted and the menu should close.
fn read_choice<R: BufRead>(input: &mut R) -> Result<Option<String>, Box<dyn Error>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn prompt_string<R: BufRead>(input: &mut R, message: &str) -> Result<String, Box<dyn Error>> {
    print!("{}", message);
    std::io::stdout().flush()?;

    match read_choice(input)? {
        None => Err("end of input".into()),
        Some(line) => Ok(line),
    }
}

/// Ask for a date and a time, insisting until they parse
fn prompt_date_time<R: BufRead>(input: &mut R, which: &str) -> Result<NaiveDateTime, Box<dyn Error>> {
    loop {
        let date = prompt_string(input, &format!("Enter event {} date (YYYY.MM.DD): ", which))?;
        let time = prompt_string(input, &format!("Enter event {} time (HH.MM.SS): ", which))?;

        match NaiveDateTime::parse_from_str(&format!("{} {}", date, time), "%Y.%m.%d %H.%M.%S") {
            Ok(date_time) => return Ok(date_time),
            Err(_) => println!("invalid {} date/time format", which),
        }
    }
}

/// Collect a brand new event from the user
fn prompt_event<R: BufRead>(input: &mut R) -> Result<Event, Box<dyn Error>> {
    let summary = prompt_string(input, "Enter event summary: ")?;
    let start = prompt_date_time(input, "start")?;
    let end = prompt_date_time(input, "end")?;
    Ok(Event::new(summary, start, end))
}

/// Extract the username out of a principal path such as `/principals/users/john/`.
/// Falls back to the whole path when the expected marker is absent.
pub fn extract_username(principal: &str) -> &str {
    const MARKER: &str = "/principals/users/";
    match principal.find(MARKER) {
        Some(start_pos) => principal[start_pos + MARKER.len()..].trim_end_matches('/'),
        None => principal,
    }
}

/// The main menu: log in (with a user-driven retry on failures) or exit.
///
/// `connect` builds a source out of the credentials the user typed; the first network
/// round-trip happens right after, when the principal is resolved. Credential read
/// failures are fatal and propagate out, so the caller can turn them into a non-zero
/// exit.
pub async fn main_menu<R, S, F>(input: &mut R, mask_password: bool, connect: F) -> Result<(), Box<dyn Error>>
where
    R: BufRead,
    S: CalendarSource,
    F: Fn(Credentials) -> S,
{
    blue_line("Main menu:");
    loop {
        println!("1. Log in");
        println!("0. Exit");
        let choice = match read_choice(input)? {
            None => return Ok(()),
            Some(choice) => choice,
        };
        match choice.parse::<u32>() {
            Ok(1) => {
                'login: loop {
                    let credentials = credentials::read_from(input, mask_password)?;
                    let source = connect(credentials);
                    match source.find_current_user_principal().await {
                        Ok(principal) => {
                            if let Err(err) = calendar_menu(&source, &principal, input).await {
                                red_line(&err);
                                return Ok(());
                            }
                            break 'login;
                        },
                        Err(err) => {
                            red_line(&err);
                            loop {
                                println!("Wrong username or password, try again? ([y/n])");
                                let answer = match read_choice(input)? {
                                    None => return Ok(()),
                                    Some(answer) => answer,
                                };
                                match answer.to_lowercase().as_str() {
                                    "y" => continue 'login,
                                    "n" => {
                                        blue_line("Shutting down...");
                                        return Ok(());
                                    },
                                    _ => continue,
                                }
                            }
                        },
                    }
                }
            },
            Ok(0) => {
                blue_line("Shutting down...");
                return Ok(());
            },
            _ => {},
        }
    }
}

/// The calendar menu of a logged-in session
pub async fn calendar_menu<R, S>(source: &S, principal: &str, input: &mut R) -> Result<(), Box<dyn Error>>
where
    R: BufRead,
    S: CalendarSource,
{
    let home_set = source.find_calendar_home_set(principal).await?;

    blue_line(&format!("Current user: {}", extract_username(principal)));
    loop {
        println!("1. List calendars");
        println!("2. Goto calendar");
        println!("3. Create calendar");
        println!("0. Log out");
        let choice = match read_choice(input)? {
            None => return Ok(()),
            Some(choice) => choice,
        };
        match choice.parse::<u32>() {
            Ok(1) => {
                match source.find_calendars(&home_set).await {
                    Ok(calendars) => {
                        for calendar in &calendars {
                            println!("Calendar: {}", calendar.name());
                        }
                    },
                    Err(err) => red_line(&err),
                }
            },
            Ok(2) => {
                let name = prompt_string(input, "Enter calendar name: ")?;
                match ops::find_calendar(source, &home_set, &name).await {
                    Ok(calendar) => event_menu(source, &calendar, input).await?,
                    Err(err) => red_line(&err),
                }
            },
            Ok(3) => {
                let name = prompt_string(input, "Enter new calendar name: ")?;
                match source.create_calendar(&home_set, &name).await {
                    Ok(()) => blue_line("Calendar created"),
                    Err(err) => red_line(&err),
                }
            },
            Ok(0) => {
                blue_line("Logging out...");
                return Ok(());
            },
            _ => {},
        }
    }
}

/// The event menu of one calendar
pub async fn event_menu<R, S>(source: &S, calendar: &Calendar, input: &mut R) -> Result<(), Box<dyn Error>>
where
    R: BufRead,
    S: CalendarSource,
{
    blue_line(&format!("Current calendar: {} ({})", calendar.name(), calendar.url()));
    loop {
        println!("1. List events");
        println!("2. Create event");
        println!("3. Delete event");
        println!("0. Back to calendar menu");
        let choice = match read_choice(input)? {
            None => return Ok(()),
            Some(choice) => choice,
        };
        match choice.parse::<u32>() {
            Ok(1) => {
                let window = TimeWindow::recent();
                match ops::list_events(source, calendar, Some(&window)).await {
                    Ok(events) => {
                        for event in &events {
                            println!("Summary: {},\tUID: {},\tStart: {},\tEnd: {}",
                                event.summary(), event.uid(), event.start(), event.end());
                        }
                    },
                    Err(err) => red_line(&err),
                }
            },
            Ok(2) => {
                let event = prompt_event(input)?;
                println!("Event created with UID {}", event.uid());
                if let Err(err) = source.add_event(calendar.url(), &event).await {
                    red_line(&err);
                }
            },
            Ok(3) => {
                let uid = prompt_string(input, "Enter event UID: ")?;
                match ops::delete_event(source, calendar, &uid).await {
                    Ok(DeleteOutcome::Deleted) => println!("Event deleted"),
                    Ok(DeleteOutcome::RefusedLastEvent) => {
                        println!("Cannot delete the event as it would leave the calendar empty.");
                    },
                    Err(err) => red_line(&err),
                }
            },
            Ok(0) => {
                blue_line("Returning to calendar menu...");
                return Ok(());
            },
            _ => {},
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_extract_username() {
        assert_eq!(extract_username("/principals/users/john/"), "john");
        assert_eq!(extract_username("/principals/users/john"), "john");
        assert_eq!(extract_username("https://server.com/principals/users/daisy/"), "daisy");
        assert_eq!(extract_username("/some/other/shape"), "/some/other/shape");
    }

    #[test]
    fn test_prompt_event_insists_on_valid_dates() {
        let mut input = Cursor::new("Standup\n\
            2024-01-01\n09:00:00\n\
            2024.01.01\n09.00.00\n\
            2024.01.01\n09.15.00\n");

        let event = prompt_event(&mut input).unwrap();
        assert_eq!(event.summary(), "Standup");
        assert_eq!(event.start(), NaiveDateTime::parse_from_str("2024.01.01 09.00.00", "%Y.%m.%d %H.%M.%S").unwrap());
        assert_eq!(event.end(), NaiveDateTime::parse_from_str("2024.01.01 09.15.00", "%Y.%m.%d %H.%M.%S").unwrap());
    }

    #[test]
    fn test_prompt_event_fails_on_end_of_input() {
        let mut input = Cursor::new("Standup\n2024.01.01\n");
        assert!(prompt_event(&mut input).is_err());
    }
}
