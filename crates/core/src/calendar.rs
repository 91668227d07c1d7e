//! Calendar domain constants and the calendar entity feature set.
//!
//! Event field names follow RFC 5545 where one exists.

use serde::{Deserialize, Serialize};

pub const DOMAIN: &str = "calendar";

pub const CONF_EVENT: &str = "event";
pub const CALENDAR_TEMPLATE: &str = "calendar_template";
pub const TEMPLATE_EVENTS: &str = "template_events";
pub const TEMPLATE_NAME: &str = "template_name";
pub const TEMPLATE_ID: &str = "template_id";
pub const TEMPLATE_VIEW_EVENTS: &str = "template_view_events";

pub const EVENT_ATTENDEES: &str = "attendees";

// rfc5545 fields
pub const EVENT_UID: &str = "uid";
pub const EVENT_START: &str = "dtstart";
pub const EVENT_END: &str = "dtend";
pub const EVENT_SUMMARY: &str = "summary";
pub const EVENT_DESCRIPTION: &str = "description";
pub const EVENT_LOCATION: &str = "location";
pub const EVENT_RECURRENCE_ID: &str = "recurrence_id";
pub const EVENT_RECURRENCE_RANGE: &str = "recurrence_range";
pub const EVENT_RRULE: &str = "rrule";

// Service call fields
pub const EVENT_START_DATE: &str = "start_date";
pub const EVENT_END_DATE: &str = "end_date";
pub const EVENT_START_DATETIME: &str = "start_date_time";
pub const EVENT_END_DATETIME: &str = "end_date_time";
pub const EVENT_IN: &str = "in";
pub const EVENT_IN_DAYS: &str = "days";
pub const EVENT_IN_WEEKS: &str = "weeks";
pub const EVENT_TYPES: &str = "event_types";
pub const EVENT_DURATION: &str = "duration";

/// Fields that select the time span of a new event.
pub const EVENT_TIME_FIELDS: [&str; 5] = [
    EVENT_START_DATE,
    EVENT_END_DATE,
    EVENT_START_DATETIME,
    EVENT_END_DATETIME,
    EVENT_IN,
];

/// Fields returned by the list events service.
pub const LIST_EVENT_FIELDS: [&str; 5] = [
    "start",
    "end",
    EVENT_SUMMARY,
    EVENT_DESCRIPTION,
    EVENT_LOCATION,
];

pub const ENTITY_NOT_FOUND_ERROR: &str = "Entity not found";

bitflags::bitflags! {
    /// Supported features of a calendar entity, as a bitmask.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct CalendarEntityFeature: u32 {
        const CREATE_EVENT = 1;
        const DELETE_EVENT = 2;
        const UPDATE_EVENT = 4;
    }
}
