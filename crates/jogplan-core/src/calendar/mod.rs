//! Calendar capabilities consumed by the scheduler and the booker.
//!
//! The scheduler only reads (`BusyCalendar`); booking writes go through
//! `EventStore`. Both are passed in by the caller, never looked up
//! globally.

mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

pub use memory::InMemoryCalendar;

/// A calendar event as reported by the device calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[serde(default)]
    pub all_day: bool,
}

impl CalendarEvent {
    /// Create a new timed calendar event
    pub fn new(id: String, title: String, start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            id,
            title,
            start_time,
            end_time,
            all_day: false,
        }
    }

    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Check if this event overlaps with a time range
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && self.end_time > start
    }
}

/// Read access to the user's calendar.
pub trait BusyCalendar {
    /// Events overlapping `[start, end)`. All-day events may be included;
    /// callers filter them.
    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError>;
}

/// Write access used to book sessions.
pub trait EventStore {
    /// Create an event and return its identifier.
    fn create_event(
        &mut self,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, CalendarError>;

    fn update_event_times(
        &mut self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), CalendarError>;

    fn delete_event(&mut self, id: &str) -> Result<(), CalendarError>;
}

impl<T: BusyCalendar + ?Sized> BusyCalendar for &T {
    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        (**self).fetch_events(start, end)
    }
}

impl<T: EventStore + ?Sized> EventStore for &mut T {
    fn create_event(
        &mut self,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, CalendarError> {
        (**self).create_event(title, start, end)
    }

    fn update_event_times(
        &mut self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), CalendarError> {
        (**self).update_event_times(id, start, end)
    }

    fn delete_event(&mut self, id: &str) -> Result<(), CalendarError> {
        (**self).delete_event(id)
    }
}

impl<T: BusyCalendar + ?Sized> BusyCalendar for &mut T {
    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        (**self).fetch_events(start, end)
    }
}
