//! Calendar collections, as discovered on a CalDAV server

use std::convert::TryFrom;
use std::error::Error;

use serde::{Deserialize, Serialize};
use url::Url;

use bitflags::bitflags;

bitflags! {
    #[derive(Serialize, Deserialize)]
    pub struct SupportedComponents: u8 {
        /// An event, such as a calendar meeting
        const EVENT = 1;
        /// A to-do item, such as a reminder
        const TODO = 2;
    }
}

impl TryFrom<minidom::Element> for SupportedComponents {
    type Error = Box<dyn Error>;

    /// Create an instance from an XML <supported-calendar-component-set> element
    fn try_from(element: minidom::Element) -> Result<Self, Self::Error> {
        if element.name() != "supported-calendar-component-set" {
            return Err("Element must be a <supported-calendar-component-set>".into());
        }

        let mut flags = Self::empty();
        for child in element.children() {
            match child.attr("name") {
                None => continue,
                Some("VEVENT") => flags.insert(Self::EVENT),
                Some("VTODO") => flags.insert(Self::TODO),
                Some(other) => {
                    log::warn!("Unimplemented supported component type: {:?}. Ignoring it", other);
                    continue
                },
            };
        }

        Ok(flags)
    }
}


/// A reference to a calendar collection on the server.
///
/// References are fetched fresh from the home set on every listing, they are never cached
/// across menu navigations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Calendar {
    name: String,
    url: Url,
    supported_components: SupportedComponents,
}

impl Calendar {
    pub fn new(name: String, url: Url, supported_components: SupportedComponents) -> Self {
        Self { name, url, supported_components }
    }

    /// The display name, as the server advertises it
    pub fn name(&self) -> &str { &self.name }

    /// The URL of this collection on the server
    pub fn url(&self) -> &Url { &self.url }

    pub fn supported_components(&self) -> SupportedComponents {
        self.supported_components
    }

    pub fn supports_events(&self) -> bool {
        self.supported_components.contains(SupportedComponents::EVENT)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supported_components_from_xml() {
        let xml: minidom::Element = r#"
            <supported-calendar-component-set xmlns="urn:ietf:params:xml:ns:caldav">
                <comp name="VEVENT" />
                <comp name="VJOURNAL" />
            </supported-calendar-component-set>"#.parse().unwrap();

        let flags = SupportedComponents::try_from(xml).unwrap();
        assert!(flags.contains(SupportedComponents::EVENT));
        assert!(flags.contains(SupportedComponents::TODO) == false);
    }

    #[test]
    fn test_wrong_element_is_rejected() {
        let xml: minidom::Element = r#"<resourcetype xmlns="DAV:" />"#.parse().unwrap();
        assert!(SupportedComponents::try_from(xml).is_err());
    }
}
