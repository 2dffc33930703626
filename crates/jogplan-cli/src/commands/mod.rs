pub mod config;
pub mod plan;
pub mod slot;

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use clap::Args;
use jogplan_core::{Config, ConfigError, GoalWindow, ValidationError};

/// Load the config from an explicit path or the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Goal window arguments shared by search commands.
#[derive(Args)]
pub struct GoalArgs {
    /// Goal window start (RFC 3339); defaults to the search start
    #[arg(long)]
    pub goal_start: Option<DateTime<Utc>>,
    /// Goal window end (RFC 3339); defaults to one week after the goal start
    #[arg(long)]
    pub goal_end: Option<DateTime<Utc>>,
    /// Search with UTC operating hours instead of the local time zone
    #[arg(long)]
    pub utc: bool,
}

impl GoalArgs {
    pub fn window(&self, from: DateTime<Utc>) -> Result<GoalWindow, ValidationError> {
        let start = self.goal_start.unwrap_or(from);
        let end = self.goal_end.unwrap_or(start + Duration::days(7));
        GoalWindow::new(start, end)
    }
}
