//! Progress figures over goals and booked sessions.

use chrono::{DateTime, Datelike, TimeZone};
use serde::Serialize;

use crate::booking::{BookedSession, SessionStatus};
use crate::goal::{current_goal, Goal, GoalStatus};
use crate::schedule::SessionKind;

/// Completed vs remaining sessions of the current goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyProgress {
    pub completed: u32,
    pub remaining: u32,
}

/// Settled goals by outcome; goals still in progress are not counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GoalTally {
    pub completed: usize,
    pub incomplete: usize,
}

/// Summary shown on the progress screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JogStats {
    pub weekly: Option<WeeklyProgress>,
    pub goals: GoalTally,
    pub jogs_this_month: usize,
    pub total_jogs: usize,
}

impl JogStats {
    /// Compute every figure; `now` fixes the month and its time zone.
    pub fn compute<Tz: TimeZone>(goals: &[Goal], sessions: &[BookedSession], now: &DateTime<Tz>) -> Self {
        Self {
            weekly: weekly_progress(goals),
            goals: goal_tally(goals),
            jogs_this_month: completed_jogs_in_month(sessions, now),
            total_jogs: completed_jogs(sessions).count(),
        }
    }
}

pub fn weekly_progress(goals: &[Goal]) -> Option<WeeklyProgress> {
    current_goal(goals).map(|goal| WeeklyProgress {
        completed: goal.progress,
        remaining: goal.remaining(),
    })
}

pub fn goal_tally(goals: &[Goal]) -> GoalTally {
    goals.iter().fold(GoalTally::default(), |mut tally, goal| {
        match goal.status {
            GoalStatus::Completed => tally.completed += 1,
            GoalStatus::Incomplete => tally.incomplete += 1,
            GoalStatus::InProgress => {}
        }
        tally
    })
}

fn completed_jogs(sessions: &[BookedSession]) -> impl Iterator<Item = &BookedSession> {
    sessions
        .iter()
        .filter(|s| s.kind == SessionKind::Jog && s.status == SessionStatus::Completed)
}

/// Completed jogs starting in the same local calendar month as `now`.
pub fn completed_jogs_in_month<Tz: TimeZone>(sessions: &[BookedSession], now: &DateTime<Tz>) -> usize {
    let tz = now.timezone();
    completed_jogs(sessions)
        .filter(|s| {
            let local = s.start.with_timezone(&tz);
            local.year() == now.year() && local.month() == now.month()
        })
        .count()
}
