use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, TimeZone, Utc};
use clap::Subcommand;
use jogplan_core::{
    plan_sessions, AvailabilityScheduler, CalendarEvent, Config, CoreError, GoalWindow,
    InMemoryCalendar, PlannedSession, SessionBooker, SessionKind,
};
use tracing::debug;

use super::{load_config, GoalArgs};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Plan the next session group
    Next {
        /// Calendar file (JSON array of events)
        #[arg(long)]
        calendar: PathBuf,
        /// Search start (RFC 3339); defaults to the day after the latest
        /// booked session in the goal, or now
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Write the planned sessions into the calendar file
        #[arg(long)]
        book: bool,
        #[command(flatten)]
        goal: GoalArgs,
    },
}

pub fn run(action: PlanAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        PlanAction::Next {
            calendar: calendar_path,
            from,
            book,
            goal,
        } => {
            let config = load_config(config_path)?;
            let mut calendar = InMemoryCalendar::load(&calendar_path)?;
            let now = Utc::now();
            let window = goal.window(from.unwrap_or(now))?;

            let planned = if goal.utc {
                plan_next(Utc, &calendar, &config, from, now, &window)?
            } else {
                plan_next(Local, &calendar, &config, from, now, &window)?
            };

            let Some(planned) = planned else {
                println!("no slot found");
                return Ok(());
            };

            if book {
                let booked = SessionBooker::new(&mut calendar).book(&planned)?;
                calendar.save(&calendar_path)?;
                println!("{}", serde_json::to_string_pretty(&booked)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&planned)?);
            }
        }
    }
    Ok(())
}

fn plan_next<Tz: TimeZone>(
    tz: Tz,
    calendar: &InMemoryCalendar,
    config: &Config,
    from: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    goal: &GoalWindow,
) -> Result<Option<Vec<PlannedSession>>, CoreError> {
    let scheduler = AvailabilityScheduler::new(calendar, tz).with_config(config.scheduler.clone());

    let search_from = match from {
        Some(from) => from,
        None => {
            let latest = latest_booked_end(calendar.events(), goal);
            let anchor = scheduler.next_search_anchor(goal, latest);
            debug!(%anchor, ?latest, "derived search anchor");
            anchor.max(now)
        }
    };

    let plan = config.sessions.plan()?;
    plan_sessions(&scheduler, &plan, search_from, &config.preferences, goal)
}

/// End of the latest jogging event starting inside the goal.
fn latest_booked_end(events: &[CalendarEvent], goal: &GoalWindow) -> Option<DateTime<Utc>> {
    let titles = [SessionKind::PreJog, SessionKind::Jog, SessionKind::PostJog].map(|k| k.title());
    events
        .iter()
        .filter(|e| titles.contains(&e.title.as_str()) && goal.contains(e.start_time))
        .map(|e| e.end_time)
        .max()
}
