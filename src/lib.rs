//! This crate provides an interactive client to manage calendars on a CalDAV server.
//!
//! The [`client`] module speaks the small WebDAV/CalDAV subset this client needs
//! (discovery, calendar listing, calendar-queries, object uploads). It can be used as a
//! stand-alone module.
//!
//! The [`menu`] module wires it into nested text menus (log in, browse calendars, manage
//! events). Menus and operations are written against the [`traits::CalendarSource`]
//! trait, so they can run against something else than a live server (this is how the
//! integration tests work).
//!
//! Conversion between iCal files and the internal event representation lives in the
//! [`ical`] module.

pub mod calendar;
pub use calendar::Calendar;
pub mod client;
pub use client::Client;
pub mod config;
pub mod credentials;
pub use credentials::Credentials;
pub mod error;
pub mod event;
pub use event::Event;
pub mod ical;
pub mod menu;
pub mod ops;
pub mod resource;
pub mod traits;
pub mod utils;
