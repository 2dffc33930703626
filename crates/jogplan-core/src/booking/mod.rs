//! Booking planned sessions into the user's calendar.
//!
//! This module provides:
//! - Booking a planned group (pre-jog, jog, post-jog) as calendar events
//! - Moving or rescheduling a booked group as a unit
//! - Cancelling a group, or every session of a goal
//! - Tracking completion against a goal
//!
//! Calendar writes go through an injected `EventStore`. The scheduler never
//! writes; only this module does.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::calendar::{BusyCalendar, EventStore};
use crate::error::{Result, ValidationError};
use crate::goal::Goal;
use crate::schedule::{GoalWindow, Preferences, SessionKind};
use crate::scheduler::{AvailabilityScheduler, PlannedSession, SchedulerConfig};

/// Sessions closer than this are treated as one group.
const ADJACENCY_TOLERANCE_SECS: i64 = 60;

/// Completion state of a booked session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Upcoming,
    Completed,
    Missed,
}

/// A sub-session that has a calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedSession {
    pub event_id: String,
    pub kind: SessionKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    #[serde(default)]
    pub status: SessionStatus,
}

impl BookedSession {
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }
}

/// Writes sessions into an event store.
pub struct SessionBooker<S> {
    store: S,
}

impl<S: EventStore> SessionBooker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Create one calendar event per planned session.
    ///
    /// If any create fails, events created by this call are removed again
    /// before the error is returned.
    pub fn book(&mut self, planned: &[PlannedSession]) -> Result<Vec<BookedSession>> {
        let mut booked: Vec<BookedSession> = Vec::with_capacity(planned.len());

        for session in planned {
            match self
                .store
                .create_event(session.kind.title(), session.start, session.end)
            {
                Ok(event_id) => booked.push(BookedSession {
                    event_id,
                    kind: session.kind,
                    start: session.start,
                    end: session.end,
                    status: SessionStatus::Upcoming,
                }),
                Err(e) => {
                    warn!(error = %e, created = booked.len(), "booking failed, rolling back");
                    for done in &booked {
                        if let Err(rollback) = self.store.delete_event(&done.event_id) {
                            warn!(event_id = %done.event_id, error = %rollback, "rollback delete failed");
                        }
                    }
                    return Err(e.into());
                }
            }
        }

        info!(count = booked.len(), "booked sessions");
        Ok(booked)
    }

    /// Shift a group so its first session starts at `new_start`.
    ///
    /// Durations and order are kept. With a goal, the move is rejected if
    /// the group would start before or end after the goal window. If an
    /// update fails, events already moved are put back and `group` is left
    /// unchanged.
    pub fn move_group(
        &mut self,
        group: &mut [BookedSession],
        new_start: DateTime<Utc>,
        goal: Option<&GoalWindow>,
    ) -> Result<()> {
        group.sort_by_key(|s| s.start);
        let (Some(first), Some(last)) = (group.first(), group.last()) else {
            return Ok(());
        };

        let offset = new_start - first.start;
        let new_end = last.end + offset;
        if let Some(goal) = goal {
            if new_start < goal.start() || new_end > goal.end() {
                return Err(ValidationError::OutsideGoal {
                    start: new_start,
                    goal_start: goal.start(),
                    goal_end: goal.end(),
                }
                .into());
            }
        }

        for moved in 0..group.len() {
            let session = &group[moved];
            let (start, end) = (session.start + offset, session.end + offset);
            if let Err(e) = self.store.update_event_times(&session.event_id, start, end) {
                warn!(error = %e, moved, "move failed, restoring earlier sessions");
                for done in &group[..moved] {
                    if let Err(restore) =
                        self.store.update_event_times(&done.event_id, done.start, done.end)
                    {
                        warn!(event_id = %done.event_id, error = %restore, "restore failed");
                    }
                }
                return Err(e.into());
            }
        }

        for session in group.iter_mut() {
            session.start += offset;
            session.end += offset;
        }
        Ok(())
    }

    /// Delete every event of a group.
    pub fn cancel(&mut self, group: &[BookedSession]) -> Result<()> {
        for session in group {
            self.store.delete_event(&session.event_id)?;
        }
        info!(count = group.len(), "cancelled sessions");
        Ok(())
    }

    /// Delete every session starting inside `goal` and drop it from
    /// `sessions`. Returns how many were removed.
    ///
    /// Stops at the first failed delete; sessions deleted before it are
    /// already gone from both the store and `sessions`.
    pub fn clear_goal(
        &mut self,
        sessions: &mut Vec<BookedSession>,
        goal: &GoalWindow,
    ) -> Result<usize> {
        let mut removed = 0;
        let mut failure = None;
        sessions.retain(|session| {
            if failure.is_some() || !goal.contains(session.start) {
                return true;
            }
            match self.store.delete_event(&session.event_id) {
                Ok(()) => {
                    removed += 1;
                    false
                }
                Err(e) => {
                    failure = Some(e);
                    true
                }
            }
        });

        if let Some(e) = failure {
            warn!(error = %e, removed, "clearing goal sessions failed");
            return Err(e.into());
        }
        info!(removed, "cleared goal sessions");
        Ok(removed)
    }
}

impl<S: EventStore + BusyCalendar> SessionBooker<S> {
    /// Move a group to the next free slot after its current end.
    ///
    /// Returns `false` and leaves the group untouched when no slot exists.
    pub fn reschedule<Tz: TimeZone>(
        &mut self,
        group: &mut [BookedSession],
        tz: Tz,
        config: &SchedulerConfig,
        preferences: &Preferences,
        goal: &GoalWindow,
    ) -> Result<bool> {
        let (Some(group_start), Some(group_end)) = (
            group.iter().map(|s| s.start).min(),
            group.iter().map(|s| s.end).max(),
        ) else {
            return Ok(false);
        };

        let slot = AvailabilityScheduler::new(&self.store, tz)
            .with_config(config.clone())
            .find_slot(group_end, group_end - group_start, preferences, goal)?;

        match slot {
            Some(slot) => {
                self.move_group(group, slot.start(), None)?;
                info!(start = %slot.start(), "rescheduled session group");
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Sessions directly before or after `anchor`, sorted by start.
pub fn related_sessions(anchor: &BookedSession, all: &[BookedSession]) -> Vec<BookedSession> {
    let adjacent = |a: DateTime<Utc>, b: DateTime<Utc>| {
        (a - b).num_seconds().abs() < ADJACENCY_TOLERANCE_SECS
    };
    let mut related: Vec<BookedSession> = all
        .iter()
        .filter(|s| s.event_id != anchor.event_id)
        .filter(|s| adjacent(s.end, anchor.start) || adjacent(s.start, anchor.end))
        .cloned()
        .collect();
    related.sort_by_key(|s| s.start);
    related
}

/// Sessions starting inside the goal window (bounds inclusive).
pub fn sessions_in_goal<'a>(
    sessions: &'a [BookedSession],
    goal: &'a GoalWindow,
) -> impl Iterator<Item = &'a BookedSession> + 'a {
    sessions.iter().filter(move |s| goal.contains(s.start))
}

/// End of the latest session that starts inside the goal window.
pub fn latest_session_end(sessions: &[BookedSession], goal: &GoalWindow) -> Option<DateTime<Utc>> {
    sessions_in_goal(sessions, goal).map(|s| s.end).max()
}

/// The earliest upcoming jog together with its adjacent upcoming pre-jog
/// and post-jog, sorted by start.
pub fn next_upcoming_group(sessions: &[BookedSession]) -> Option<Vec<BookedSession>> {
    let jog = sessions
        .iter()
        .filter(|s| s.kind == SessionKind::Jog && s.status == SessionStatus::Upcoming)
        .min_by_key(|s| s.start)?;

    let mut group: Vec<BookedSession> = related_sessions(jog, sessions)
        .into_iter()
        .filter(|s| s.kind != SessionKind::Jog && s.status == SessionStatus::Upcoming)
        .collect();
    group.push(jog.clone());
    group.sort_by_key(|s| s.start);
    Some(group)
}

/// Mark a group completed and count it towards the goal.
///
/// Returns whether the goal target has been reached.
pub fn complete_group(group: &mut [BookedSession], goal: &mut Goal) -> bool {
    for session in group.iter_mut() {
        session.status = SessionStatus::Completed;
    }
    goal.record_completion()
}

/// Mark upcoming sessions that ended before `now` as missed.
pub fn mark_missed(sessions: &mut [BookedSession], now: DateTime<Utc>) -> usize {
    let mut count = 0;
    for session in sessions
        .iter_mut()
        .filter(|s| s.status == SessionStatus::Upcoming && s.end < now)
    {
        session.status = SessionStatus::Missed;
        count += 1;
    }
    count
}
