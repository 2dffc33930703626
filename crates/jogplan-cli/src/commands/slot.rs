use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use clap::Subcommand;
use jogplan_core::{AvailabilityScheduler, Config, CoreError, GoalWindow, InMemoryCalendar, Interval};

use super::{load_config, GoalArgs};

#[derive(Subcommand)]
pub enum SlotAction {
    /// Find the next free slot
    Find {
        /// Calendar file (JSON array of events)
        #[arg(long)]
        calendar: PathBuf,
        /// Search start (RFC 3339); defaults to now
        #[arg(long)]
        from: Option<DateTime<Utc>>,
        /// Slot length in minutes; defaults to the configured session total
        #[arg(long)]
        minutes: Option<i64>,
        #[command(flatten)]
        goal: GoalArgs,
    },
}

pub fn run(action: SlotAction, config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        SlotAction::Find {
            calendar,
            from,
            minutes,
            goal,
        } => {
            let config = load_config(config_path)?;
            let calendar = InMemoryCalendar::load(&calendar)?;
            let from = from.unwrap_or_else(Utc::now);
            let window = goal.window(from)?;
            let duration = match minutes {
                Some(m) => Duration::try_minutes(m)
                    .ok_or_else(|| format!("--minutes out of range: {m}"))?,
                None => config.sessions.plan()?.total(),
            };

            let slot = if goal.utc {
                find(Utc, &calendar, &config, from, duration, &window)?
            } else {
                find(Local, &calendar, &config, from, duration, &window)?
            };

            match slot {
                Some(slot) => println!("{}", serde_json::to_string_pretty(&slot)?),
                None => println!("no slot found"),
            }
        }
    }
    Ok(())
}

fn find<Tz: TimeZone>(
    tz: Tz,
    calendar: &InMemoryCalendar,
    config: &Config,
    from: DateTime<Utc>,
    duration: Duration,
    goal: &GoalWindow,
) -> Result<Option<Interval>, CoreError> {
    AvailabilityScheduler::new(calendar, tz)
        .with_config(config.scheduler.clone())
        .find_slot(from, duration, &config.preferences, goal)
}
