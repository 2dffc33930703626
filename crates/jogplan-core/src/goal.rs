//! Weekly jogging goals: a target number of sessions inside a window.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::schedule::GoalWindow;

/// Lifecycle of a goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    InProgress,
    Completed,
    Incomplete,
}

/// A goal such as "jog 3 times this week".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub target_frequency: u32,
    pub window: GoalWindow,
    #[serde(default)]
    pub progress: u32,
    #[serde(default)]
    pub status: GoalStatus,
}

impl Goal {
    pub fn new(target_frequency: u32, window: GoalWindow) -> Self {
        Self {
            target_frequency,
            window,
            progress: 0,
            status: GoalStatus::InProgress,
        }
    }

    /// Count one completed session. Returns whether the target is reached.
    pub fn record_completion(&mut self) -> bool {
        self.progress += 1;
        self.is_completed()
    }

    pub fn is_completed(&self) -> bool {
        self.progress >= self.target_frequency
    }

    /// Sessions still needed to reach the target.
    pub fn remaining(&self) -> u32 {
        self.target_frequency.saturating_sub(self.progress)
    }

    /// Replace target and window; progress starts over.
    pub fn edit(&mut self, target_frequency: u32, window: GoalWindow) {
        self.target_frequency = target_frequency;
        self.window = window;
        self.progress = 0;
        self.status = GoalStatus::InProgress;
    }

    pub fn mark_completed(&mut self) {
        self.status = GoalStatus::Completed;
    }

    /// Settle the status once the window has passed.
    pub fn close(&mut self) {
        self.status = if self.is_completed() {
            GoalStatus::Completed
        } else {
            GoalStatus::Incomplete
        };
    }

    /// The week following this goal: one day after its end, spanning a week.
    pub fn next_window(&self) -> Result<GoalWindow, ValidationError> {
        let end = self.window.end();
        GoalWindow::new(end + Duration::days(1), end + Duration::days(8))
    }

    /// A fresh goal with the same target over the next window.
    pub fn next_goal(&self) -> Result<Goal, ValidationError> {
        Ok(Goal::new(self.target_frequency, self.next_window()?))
    }
}

/// The goal with the latest start.
pub fn current_goal(goals: &[Goal]) -> Option<&Goal> {
    goals.iter().max_by_key(|g| g.window.start())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn goal(target: u32) -> Goal {
        let start = Utc.with_ymd_and_hms(2025, 4, 7, 0, 0, 0).unwrap();
        Goal::new(target, GoalWindow::new(start, start + Duration::days(6)).unwrap())
    }

    #[test]
    fn progress_reaches_target() {
        let mut g = goal(2);
        assert!(!g.record_completion());
        assert_eq!(g.remaining(), 1);
        assert!(g.record_completion());
        assert_eq!(g.remaining(), 0);
    }

    #[test]
    fn close_settles_status() {
        let mut g = goal(3);
        g.record_completion();
        g.close();
        assert_eq!(g.status, GoalStatus::Incomplete);

        let mut done = goal(1);
        done.record_completion();
        done.close();
        assert_eq!(done.status, GoalStatus::Completed);
    }

    #[test]
    fn next_goal_rolls_window_forward() {
        let g = goal(3);
        let next = g.next_goal().unwrap();
        assert_eq!(next.window.start(), g.window.end() + Duration::days(1));
        assert_eq!(next.window.end(), g.window.end() + Duration::days(8));
        assert_eq!(next.target_frequency, 3);
        assert_eq!(next.progress, 0);
    }

    #[test]
    fn edit_resets_progress() {
        let mut g = goal(3);
        g.record_completion();
        g.record_completion();
        g.close();

        let window = g.next_window().unwrap();
        g.edit(5, window);
        assert_eq!(g.progress, 0);
        assert_eq!(g.target_frequency, 5);
        assert_eq!(g.window, window);
        assert_eq!(g.status, GoalStatus::InProgress);
    }

    #[test]
    fn current_goal_is_latest_start() {
        let first = goal(3);
        let second = first.next_goal().unwrap();
        let goals = vec![second.clone(), first];
        assert_eq!(current_goal(&goals), Some(&second));
        assert_eq!(current_goal(&[]), None);
    }
}
