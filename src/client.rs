//! This module provides a client to connect to a CalDAV server

use std::convert::TryFrom;
use std::error::Error;

use async_trait::async_trait;
use minidom::Element;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use reqwest::Method;
use url::Url;

use crate::calendar::{Calendar, SupportedComponents};
use crate::credentials::Credentials;
use crate::event::{CalendarObject, Event, TimeWindow};
use crate::resource::Resource;
use crate::traits::CalendarSource;
use crate::utils::{escape_xml, find_elem, find_elems};


static PRINCIPAL_BODY: &str = r#"
    <d:propfind xmlns:d="DAV:">
       <d:prop>
           <d:current-user-principal />
       </d:prop>
    </d:propfind>
"#;

static HOMESET_BODY: &str = r#"
    <d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav" >
      <d:self/>
      <d:prop>
        <c:calendar-home-set />
      </d:prop>
    </d:propfind>
"#;

static CALENDARS_BODY: &str = r#"
    <d:propfind xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav" >
       <d:prop>
         <d:displayname />
         <d:resourcetype />
         <c:supported-calendar-component-set />
       </d:prop>
    </d:propfind>
"#;

fn mkcalendar_body(display_name: &str) -> String {
    format!(r#"
    <c:mkcalendar xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
      <d:set>
        <d:prop>
          <d:displayname>{}</d:displayname>
        </d:prop>
      </d:set>
    </c:mkcalendar>
"#, escape_xml(display_name))
}

fn calendar_query_body(window: Option<&TimeWindow>) -> String {
    let time_range = match window {
        None => String::new(),
        Some(window) => format!(r#"<c:time-range start="{}" end="{}"/>"#,
            window.start().format("%Y%m%dT%H%M%SZ"),
            window.end().format("%Y%m%dT%H%M%SZ")),
    };

    format!(r#"
    <c:calendar-query xmlns:d="DAV:" xmlns:c="urn:ietf:params:xml:ns:caldav">
        <d:prop>
            <d:getetag />
            <c:calendar-data />
        </d:prop>
        <c:filter>
            <c:comp-filter name="VCALENDAR">
                <c:comp-filter name="VEVENT">{}</c:comp-filter>
            </c:comp-filter>
        </c:filter>
    </c:calendar-query>
"#, time_range)
}


/// A CalDAV client for one server and one set of credentials
pub struct Client {
    resource: Resource,
}

impl Client {
    /// Create a client. This does not start a connection: the first server round-trip
    /// (and thus the first chance for an authentication error) is
    /// [`find_current_user_principal`](CalendarSource::find_current_user_principal)
    pub fn new(url: Url, credentials: Credentials) -> Self {
        Self {
            resource: Resource::new(url, credentials),
        }
    }

    async fn sub_request(&self, url: &Url, method: &str, depth: u32, body: String) -> Result<String, Box<dyn Error>> {
        let method = Method::from_bytes(method.as_bytes())
            .expect("invalid HTTP method");

        let res = reqwest::Client::new()
            .request(method, url.as_str())
            .header("Depth", depth)
            .header(CONTENT_TYPE, "application/xml")
            .basic_auth(self.resource.username(), Some(self.resource.password()))
            .body(body)
            .send()
            .await?;
        if res.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", res.status()).into());
        }
        let text = res.text().await?;
        Ok(text)
    }

    async fn sub_request_and_process(&self, url: &Url, body: String, items: &[&str]) -> Result<String, Box<dyn Error>> {
        let text = self.sub_request(url, "PROPFIND", 0, body).await?;

        let root: Element = text.parse()?;
        let mut current_element = &root;
        for item in items {
            current_element = find_elem(current_element, item)
                .ok_or_else(|| format!("missing <{}> in the response from {}", item, url))?;
        }

        Ok(current_element.text())
    }

    async fn put(&self, url: &Url, ical_text: String, create_new: bool) -> Result<(), Box<dyn Error>> {
        let mut request = reqwest::Client::new()
            .put(url.clone())
            .header(CONTENT_TYPE, "text/calendar")
            .header(CONTENT_LENGTH, ical_text.len())
            .basic_auth(self.resource.username(), Some(self.resource.password()));
        if create_new {
            request = request.header("If-None-Match", "*");
        }

        let response = request
            .body(ical_text)
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(format!("Unexpected HTTP status code {:?}", response.status()).into());
        }
        Ok(())
    }
}

#[async_trait]
impl CalendarSource for Client {
    async fn find_current_user_principal(&self) -> Result<String, Box<dyn Error>> {
        let href = self.sub_request_and_process(self.resource.url(), PRINCIPAL_BODY.into(), &["current-user-principal", "href"]).await?;
        log::debug!("Principal path is {}", href);
        Ok(href)
    }

    async fn find_calendar_home_set(&self, principal: &str) -> Result<String, Box<dyn Error>> {
        let principal_url = self.resource.combine(principal);
        let href = self.sub_request_and_process(&principal_url, HOMESET_BODY.into(), &["calendar-home-set", "href"]).await?;
        log::debug!("Calendar home set path is {}", href);
        Ok(href)
    }

    async fn find_calendars(&self, home_set: &str) -> Result<Vec<Calendar>, Box<dyn Error>> {
        let home_set_url = self.resource.combine(home_set);
        let text = self.sub_request(&home_set_url, "PROPFIND", 1, CALENDARS_BODY.into()).await?;

        let root: Element = text.parse()?;
        let reps = find_elems(&root, "response");
        let mut calendars = Vec::new();
        for rep in reps {
            let display_name = find_elem(rep, "displayname").map(|e| e.text()).unwrap_or("<no name>".to_string());
            log::debug!("Considering calendar {}", display_name);

            // We filter out non-calendar items
            let resource_types = match find_elem(rep, "resourcetype") {
                None => continue,
                Some(rt) => rt,
            };
            let mut found_calendar_type = false;
            for resource_type in resource_types.children() {
                if resource_type.name() == "calendar" {
                    found_calendar_type = true;
                    break;
                }
            }
            if found_calendar_type == false {
                continue;
            }

            // We filter out the root calendar collection, that has an empty supported-calendar-component-set
            let el_supported_comps = match find_elem(rep, "supported-calendar-component-set") {
                None => continue,
                Some(comps) => comps,
            };
            if el_supported_comps.children().count() == 0 {
                continue;
            }

            let calendar_href = match find_elem(rep, "href") {
                None => {
                    log::warn!("Calendar {} has no URL! Ignoring it.", display_name);
                    continue;
                },
                Some(h) => h.text(),
            };

            let this_calendar_url = self.resource.combine(&calendar_href);

            let supported_components = match SupportedComponents::try_from(el_supported_comps.clone()) {
                Err(err) => {
                    log::warn!("Calendar {} has invalid supported components ({})! Ignoring it.", display_name, err);
                    continue;
                },
                Ok(sc) => sc,
            };
            let this_calendar = Calendar::new(display_name, this_calendar_url, supported_components);
            log::debug!("Found calendar {}", this_calendar.name());
            calendars.push(this_calendar);
        }

        Ok(calendars)
    }

    async fn create_calendar(&self, home_set: &str, name: &str) -> Result<(), Box<dyn Error>> {
        let mut path = home_set.to_string();
        if path.ends_with('/') == false {
            path.push('/');
        }
        path.push_str(&sanitize_filename::sanitize(name));
        path.push('/');

        let url = self.resource.combine(&path);
        log::debug!("Creating calendar {} at {}", name, url);
        self.sub_request(&url, "MKCALENDAR", 0, mkcalendar_body(name)).await?;
        Ok(())
    }

    async fn query_events(&self, calendar_url: &Url, window: Option<&TimeWindow>) -> Result<Vec<CalendarObject>, Box<dyn Error>> {
        let text = self.sub_request(calendar_url, "REPORT", 1, calendar_query_body(window)).await?;

        let root: Element = text.parse()?;
        let mut objects = Vec::new();
        for response in find_elems(&root, "response") {
            let href = match find_elem(response, "href") {
                None => {
                    log::warn!("Unable to extract HREF from a response of {}, ignoring it", calendar_url);
                    continue;
                },
                Some(h) => h.text(),
            };
            let calendar_data = match find_elem(response, "calendar-data") {
                None => {
                    log::warn!("No calendar data for object {}, ignoring it", href);
                    continue;
                },
                Some(data) => data.text(),
            };

            let object_url = self.resource.combine(&href);
            objects.push(crate::ical::parse(&calendar_data, object_url)?);
        }

        Ok(objects)
    }

    async fn add_event(&self, calendar_url: &Url, event: &Event) -> Result<(), Box<dyn Error>> {
        let mut path = calendar_url.path().to_string();
        if path.ends_with('/') == false {
            path.push('/');
        }
        path.push_str(&format!("{}.ics", event.uid()));

        let object_url = self.resource.combine(&path);
        let ical_text = crate::ical::build_from(std::slice::from_ref(event))?;
        self.put(&object_url, ical_text, true).await
    }

    async fn update_calendar_object(&self, object: &CalendarObject) -> Result<(), Box<dyn Error>> {
        let ical_text = crate::ical::build_from(object.events())?;
        self.put(object.url(), ical_text, false).await
    }
}
