mod commands;

use anyhow::{Context, Result};
use cadence_core::{Settings, WorkoutConfig};
use clap::{Parser, Subcommand};
use commands::config::ConfigAction;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "cadence")]
#[command(about = "Interval workout timer", long_about = None)]
struct Cli {
    /// Settings file to use instead of the default location
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show every frame of the workout
    Plan {
        /// Print the sequence as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run the workout in the foreground (Ctrl-C stops it)
    Run,
    /// Control the workout interactively from stdin
    Console,
    /// Settings file management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings_path = match cli.settings {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let settings = Settings::load(&settings_path)
        .with_context(|| format!("Failed to load settings from {}", settings_path.display()))?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(settings.log_level.as_str()),
    )
    .format_timestamp_secs()
    .init();

    let config = WorkoutConfig::default();

    match cli.command {
        Commands::Plan { json } => commands::plan::plan_command(&config, json),
        Commands::Run => commands::run::run_command(config, &settings).await,
        Commands::Console => commands::console::console_command(config, &settings).await,
        Commands::Config { action } => {
            commands::config::handle_config_command(&action, &settings_path)
        }
    }
}
