//! Availability scheduler for jogging sessions.
//!
//! This module finds the next free slot for a session:
//! - Bounds each day by operating hours and reads busy events from the
//!   injected calendar
//! - Tries preferred day parts before the whole day
//! - Walks forward day by day, preferred weekdays first, then any weekday,
//!   never leaving the goal window

mod sequence;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calendar::BusyCalendar;
use crate::error::Result;
use crate::schedule::{DayPart, GoalWindow, Preferences};
use crate::timeline::{FreeIntervalExtractor, GapBoundary, Interval};

pub use sequence::{layout_sessions, plan_sessions, PlannedSession};

/// How preferred day parts are tried before the whole-day fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayPartStrategy {
    /// Only the highest-priority preferred day part is tried.
    #[default]
    FirstMatch,
    /// Every preferred day part is tried in canonical order.
    AllInPriority,
}

/// Scheduler configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Earliest local time a session may start
    #[serde(default = "default_day_start")]
    pub day_start: NaiveTime,
    /// Latest local time a session may end
    #[serde(default = "default_day_end")]
    pub day_end: NaiveTime,
    /// Days searched after the anchor day (inclusive range 0..=n)
    #[serde(default = "default_lookahead_days")]
    pub lookahead_days: u32,
    #[serde(default)]
    pub day_part_strategy: DayPartStrategy,
    /// Whether gaps may run past the end of the searched window
    #[serde(default)]
    pub gap_boundary: GapBoundary,
}

/// Upper bound accepted for `lookahead_days` in configuration files.
pub const MAX_LOOKAHEAD_DAYS: u32 = 366;

fn default_day_start() -> NaiveTime {
    NaiveTime::from_hms_opt(6, 0, 0).unwrap_or_default()
}
fn default_day_end() -> NaiveTime {
    NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default()
}
fn default_lookahead_days() -> u32 {
    7
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            day_start: default_day_start(),
            day_end: default_day_end(),
            lookahead_days: default_lookahead_days(),
            day_part_strategy: DayPartStrategy::default(),
            gap_boundary: GapBoundary::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    PreferredWeekdays,
    AnyWeekday,
}

/// Finds free slots in a calendar.
///
/// The calendar and the time zone are capabilities supplied by the caller.
/// The scheduler holds no mutable state; identical inputs give identical
/// results.
pub struct AvailabilityScheduler<C, Tz: TimeZone> {
    calendar: C,
    tz: Tz,
    config: SchedulerConfig,
}

impl<C: BusyCalendar, Tz: TimeZone> AvailabilityScheduler<C, Tz> {
    /// Create a new scheduler with default config
    pub fn new(calendar: C, tz: Tz) -> Self {
        Self {
            calendar,
            tz,
            config: SchedulerConfig::default(),
        }
    }

    /// Create with custom config
    pub fn with_config(mut self, config: SchedulerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Find the next slot of `min_duration`.
    ///
    /// # Arguments
    /// * `search_from` - Anchor; day offsets are counted from it and no slot
    ///   starts at or before it
    /// * `min_duration` - Length of the slot
    /// * `preferences` - Day-part and weekday preferences
    /// * `goal` - Window the slot must start in
    ///
    /// # Returns
    /// The first feasible slot, or `None` when every candidate day is full
    pub fn find_slot(
        &self,
        search_from: DateTime<Utc>,
        min_duration: Duration,
        preferences: &Preferences,
        goal: &GoalWindow,
    ) -> Result<Option<Interval>> {
        FreeIntervalExtractor::new(min_duration)?;

        for pass in [Pass::PreferredWeekdays, Pass::AnyWeekday] {
            // Without a weekday preference the second pass repeats the first
            if pass == Pass::AnyWeekday && preferences.days_of_week.is_any() {
                break;
            }

            for offset in 0..=self.config.lookahead_days {
                let Some(candidate) = Duration::try_days(i64::from(offset))
                    .and_then(|delta| search_from.checked_add_signed(delta))
                else {
                    break;
                };
                if candidate > goal.end() {
                    break;
                }
                if !goal.contains(candidate) {
                    continue;
                }

                let local = candidate.with_timezone(&self.tz);
                if pass == Pass::PreferredWeekdays
                    && !preferences.days_of_week.admits(local.weekday())
                {
                    continue;
                }

                let day = local.date_naive();
                let Some(slot) = self.find_slot_on_day(day, min_duration, preferences, search_from)?
                else {
                    continue;
                };

                if goal.contains(slot.start()) {
                    info!(%day, start = %slot.start(), ?pass, "found slot");
                    return Ok(Some(slot));
                }
                debug!(%day, start = %slot.start(), "slot starts outside goal window");
            }
        }

        debug!(%search_from, "no slot in lookahead window");
        Ok(None)
    }

    /// Find a slot on a single local day.
    ///
    /// Preferred day parts are tried first according to the configured
    /// strategy, then the whole operating window.
    pub fn find_slot_on_day(
        &self,
        day: NaiveDate,
        min_duration: Duration,
        preferences: &Preferences,
        not_before: DateTime<Utc>,
    ) -> Result<Option<Interval>> {
        let extractor =
            FreeIntervalExtractor::new(min_duration)?.with_boundary(self.config.gap_boundary);

        let Some(operating) = self.local_window(day, self.config.day_start, self.config.day_end)?
        else {
            debug!(%day, "operating hours do not exist on this day");
            return Ok(None);
        };

        let busy = self.busy_intervals(operating)?;

        let day_parts: Vec<DayPart> = match self.config.day_part_strategy {
            DayPartStrategy::FirstMatch => preferences.time_of_day.first().into_iter().collect(),
            DayPartStrategy::AllInPriority => preferences.time_of_day.items().to_vec(),
        };

        for part in day_parts {
            let (start, end) = part.window();
            let window = self
                .local_window(day, start, end)?
                .and_then(|w| w.intersection(&operating));
            let Some(window) = window else {
                continue;
            };

            if let Some(slot) = extractor.first_slot(&busy, window, not_before)? {
                debug!(%day, part = part.label(), "slot in preferred day part");
                return Ok(Some(slot));
            }
            debug!(%day, part = part.label(), "preferred day part is full");
        }

        Ok(extractor.first_slot(&busy, operating, not_before)?)
    }

    /// Start of the next search: the local day after the latest session,
    /// or the goal start when nothing has been booked yet.
    pub fn next_search_anchor(
        &self,
        goal: &GoalWindow,
        latest_session_end: Option<DateTime<Utc>>,
    ) -> DateTime<Utc> {
        let Some(latest) = latest_session_end else {
            return goal.start();
        };

        latest
            .with_timezone(&self.tz)
            .date_naive()
            .succ_opt()
            .and_then(|next| self.local_instant(next, NaiveTime::default()))
            .unwrap_or(latest + Duration::days(1))
    }

    fn busy_intervals(&self, window: Interval) -> Result<Vec<Interval>> {
        let mut busy = self
            .calendar
            .fetch_events(window.start(), window.end())?
            .into_iter()
            .filter(|event| !event.all_day)
            .map(|event| Interval::new(event.start_time, event.end_time))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        busy.sort_by_key(|interval| interval.start());
        Ok(busy)
    }

    fn local_window(
        &self,
        day: NaiveDate,
        start: NaiveTime,
        end: NaiveTime,
    ) -> Result<Option<Interval>> {
        match (self.local_instant(day, start), self.local_instant(day, end)) {
            (Some(start), Some(end)) => Ok(Some(Interval::new(start, end)?)),
            _ => Ok(None),
        }
    }

    fn local_instant(&self, day: NaiveDate, time: NaiveTime) -> Option<DateTime<Utc>> {
        self.tz
            .from_local_datetime(&day.and_time(time))
            .earliest()
            .map(|local| local.with_timezone(&Utc))
    }
}
