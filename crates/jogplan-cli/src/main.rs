use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "jogplan", version, about = "Schedule jogging sessions into free calendar time")]
struct Cli {
    /// Config file (defaults to ~/.config/jogplan/config.toml)
    #[arg(long = "config", global = true, value_name = "FILE")]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Free slot search
    Slot {
        #[command(subcommand)]
        action: commands::slot::SlotAction,
    },
    /// Session planning and booking
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("JOGPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let config = cli.config_file.as_deref();
    let result = match cli.command {
        Commands::Slot { action } => commands::slot::run(action, config),
        Commands::Plan { action } => commands::plan::run(action, config),
        Commands::Config { action } => commands::config::run(action, config),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
