/// Settings file command handlers
use anyhow::{Context, Result};
use cadence_core::Settings;
use clap::Subcommand;
use std::path::Path;

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Print the settings file location
    Path,
    /// Write a settings file with default values
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

pub fn handle_config_command(action: &ConfigAction, path: &Path) -> Result<()> {
    match action {
        ConfigAction::Show => show_settings(path),
        ConfigAction::Path => {
            println!("{}", path.display());
            Ok(())
        }
        ConfigAction::Init { force } => init_settings(path, *force),
    }
}

fn show_settings(path: &Path) -> Result<()> {
    let settings = Settings::load(path)?;
    let encoded = settings.to_toml()?;

    println!("# {}", path.display());
    if !path.exists() {
        println!("# (file not found, showing defaults)");
    }
    print!("{encoded}");
    Ok(())
}

fn init_settings(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Settings file already exists at {} (use --force to overwrite)",
            path.display()
        );
    }

    Settings::default()
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("Wrote default settings to {}", path.display());
    Ok(())
}
