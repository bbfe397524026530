//! Print the frame sequence of the workout

use super::helpers::{format_clock, session_of};
use anyhow::{Context, Result};
use cadence_core::{frames, WorkoutConfig};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct PlanRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "At")]
    at: String,
    #[tabled(rename = "Session")]
    session: usize,
    #[tabled(rename = "Phase")]
    phase: &'static str,
    #[tabled(rename = "Timer")]
    timer: u32,
}

/// Show every frame of the workout as a table or as JSON
///
/// # Errors
///
/// Returns an error if JSON serialization fails
pub fn plan_command(config: &WorkoutConfig, json: bool) -> Result<()> {
    let frames = frames::generate_for(config);

    if json {
        let encoded =
            serde_json::to_string_pretty(&frames).context("Failed to encode frame sequence")?;
        println!("{encoded}");
        return Ok(());
    }

    let rows: Vec<PlanRow> = frames
        .iter()
        .enumerate()
        .map(|(index, frame)| PlanRow {
            index,
            at: format_clock(u32::try_from(index + 1).unwrap_or(u32::MAX)),
            session: session_of(config, index),
            phase: frame.description(),
            timer: frame.timer,
        })
        .collect();

    println!(
        "Workout: {} x ({}s work + {}s break)\n",
        config.number_of_sessions(),
        config.work_duration(),
        config.break_duration()
    );
    println!("{}", Table::new(rows));
    println!("\nTotal: {} frames", frames.len());
    Ok(())
}
