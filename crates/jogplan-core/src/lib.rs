//! # Jogplan Core Library
//!
//! This library provides the scheduling logic for booking jogging sessions
//! into free calendar time. The `jogplan` CLI is a thin layer over it.
//!
//! ## Architecture
//!
//! - **Timeline**: Validated time intervals and free-gap extraction
//! - **Scheduler**: Day-by-day slot search honoring operating hours,
//!   day-part and weekday preferences, and the goal window
//! - **Calendar**: Read and write capabilities injected by the caller, with
//!   an in-memory/JSON-file implementation
//! - **Booking**: Turning planned sessions into calendar events, moving and
//!   rescheduling them as a group
//! - **Stats**: Goal and jog counts for progress views
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`AvailabilityScheduler`]: Finds the next free slot
//! - [`FreeIntervalExtractor`]: Gap detection over sorted busy intervals
//! - [`SessionBooker`]: Books session groups into an [`EventStore`]
//! - [`Config`]: Application configuration management

pub mod booking;
pub mod calendar;
pub mod error;
pub mod goal;
pub mod schedule;
pub mod scheduler;
pub mod stats;
pub mod storage;
pub mod timeline;

pub use booking::{BookedSession, SessionBooker, SessionStatus};
pub use calendar::{BusyCalendar, CalendarEvent, EventStore, InMemoryCalendar};
pub use error::{CalendarError, ConfigError, CoreError, ValidationError};
pub use goal::{current_goal, Goal, GoalStatus};
pub use schedule::{DayPart, GoalWindow, Preference, Preferences, SessionKind, SessionPlan};
pub use scheduler::{
    layout_sessions, plan_sessions, AvailabilityScheduler, DayPartStrategy, PlannedSession,
    SchedulerConfig, MAX_LOOKAHEAD_DAYS,
};
pub use stats::{GoalTally, JogStats, WeeklyProgress};
pub use storage::{Config, SessionsConfig};
pub use timeline::{find_free_slot, FreeIntervalExtractor, GapBoundary, Interval};
