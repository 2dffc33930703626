//! Session-sequence composition: one search for the combined length of
//! pre-jog, jog and post-jog, laid out back to back.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::AvailabilityScheduler;
use crate::calendar::BusyCalendar;
use crate::error::Result;
use crate::schedule::{GoalWindow, Preferences, SessionKind, SessionPlan};

/// A sub-session placed on the timeline but not yet booked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedSession {
    pub kind: SessionKind,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// Lay out the non-empty parts of `plan` back to back from `start`.
pub fn layout_sessions(plan: &SessionPlan, start: DateTime<Utc>) -> Vec<PlannedSession> {
    let mut cursor = start;
    plan.parts()
        .into_iter()
        .map(|(kind, duration)| {
            let session = PlannedSession {
                kind,
                start: cursor,
                end: cursor + duration,
            };
            cursor = session.end;
            session
        })
        .collect()
}

/// Find one slot for the whole plan and split it into sub-sessions.
///
/// Returns `None` when no slot exists; nothing is booked here.
pub fn plan_sessions<C: BusyCalendar, Tz: TimeZone>(
    scheduler: &AvailabilityScheduler<C, Tz>,
    plan: &SessionPlan,
    search_from: DateTime<Utc>,
    preferences: &Preferences,
    goal: &GoalWindow,
) -> Result<Option<Vec<PlannedSession>>> {
    let slot = scheduler.find_slot(search_from, plan.total(), preferences, goal)?;
    Ok(slot.map(|slot| layout_sessions(plan, slot.start())))
}
