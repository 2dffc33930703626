use std::path::Path;

use chrono::{DateTime, Utc};

use super::{BusyCalendar, CalendarEvent, EventStore};
use crate::error::{CalendarError, CoreError};

/// Calendar kept in memory, optionally backed by a JSON file.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCalendar {
    events: Vec<CalendarEvent>,
}

impl InMemoryCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: Vec<CalendarEvent>) -> Self {
        Self { events }
    }

    /// Load events from a JSON array; a missing file is an empty calendar.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Self::with_events(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let content = serde_json::to_string_pretty(&self.events)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn add(&mut self, event: CalendarEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn find(&self, id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == id)
    }
}

impl BusyCalendar for InMemoryCalendar {
    fn fetch_events(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<CalendarEvent>, CalendarError> {
        Ok(self
            .events
            .iter()
            .filter(|e| e.overlaps(start, end))
            .cloned()
            .collect())
    }
}

impl EventStore for InMemoryCalendar {
    fn create_event(
        &mut self,
        title: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<String, CalendarError> {
        let id = uuid::Uuid::new_v4().to_string();
        self.events
            .push(CalendarEvent::new(id.clone(), title.to_string(), start, end));
        Ok(id)
    }

    fn update_event_times(
        &mut self,
        id: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), CalendarError> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))?;
        event.start_time = start;
        event.end_time = end;
        Ok(())
    }

    fn delete_event(&mut self, id: &str) -> Result<(), CalendarError> {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() == before {
            return Err(CalendarError::EventNotFound(id.to_string()));
        }
        Ok(())
    }
}
