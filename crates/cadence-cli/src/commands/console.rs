//! Line-driven control of the engine over stdin

use super::{
    helpers::render_status,
    plan::plan_command,
    run::{classify, Printer, Received},
};
use anyhow::{Context, Result};
use cadence_core::{Engine, RunOutcome, Settings, WorkoutConfig, WorkoutState};
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "commands: start | stop | status | plan | help | quit";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleCommand {
    Start,
    Stop,
    Status,
    Plan,
    Help,
    Quit,
}

impl ConsoleCommand {
    pub fn parse(line: &str) -> Option<Self> {
        match line.trim().to_lowercase().as_str() {
            "start" | "s" | "restart" => Some(Self::Start),
            "stop" | "x" => Some(Self::Stop),
            "status" | "st" => Some(Self::Status),
            "plan" | "p" => Some(Self::Plan),
            "help" | "h" | "?" => Some(Self::Help),
            "quit" | "q" | "exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Interactive session: read commands from stdin while printing frames
///
/// # Errors
///
/// Returns an error if stdin cannot be read
pub async fn console_command(config: WorkoutConfig, settings: &Settings) -> Result<()> {
    let mut engine = Engine::new(config);
    let mut session = engine.session();
    let mut counts = engine.session_count();
    let mut watch = engine.watch();
    let mut printer = Printer::new(&config, settings);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut announced = None;

    println!("{HELP}");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    engine.stop();
                    break;
                };

                match ConsoleCommand::parse(&line) {
                    Some(ConsoleCommand::Start) => {
                        printer.drain(&mut session, &mut counts);
                        printer.reset();
                        engine.start();
                    }
                    Some(ConsoleCommand::Stop) => {
                        if engine.stop() {
                            printer.drain(&mut session, &mut counts);
                            println!("Stopped");
                        } else {
                            println!("Nothing to stop");
                        }
                    }
                    Some(ConsoleCommand::Status) => {
                        println!("{}", render_status(&engine.workout(), engine.frames().len()));
                    }
                    Some(ConsoleCommand::Plan) => plan_command(&config, false)?,
                    Some(ConsoleCommand::Help) => println!("{HELP}"),
                    Some(ConsoleCommand::Quit) => {
                        engine.stop();
                        break;
                    }
                    None if line.trim().is_empty() => {}
                    None => println!("Unknown command '{}'. {HELP}", line.trim()),
                }
            }
            received = session.recv() => match classify(received) {
                Received::Value(frame) => printer.frame(&frame),
                Received::Lagged(n) => log::warn!("Skipped {n} frames"),
                Received::Closed => break,
            },
            received = counts.recv() => match classify(received) {
                Received::Value(count) => printer.session(count),
                Received::Lagged(n) => log::warn!("Skipped {n} session updates"),
                Received::Closed => break,
            },
            Some(workout) = watch.changed() => {
                let finished = workout.state == WorkoutState::Completed
                    && workout.last_outcome == Some(RunOutcome::Exhausted);
                if finished && announced != workout.run_id {
                    printer.drain(&mut session, &mut counts);
                    println!("Workout complete ({} sessions so far)", workout.elapsed_sessions);
                    announced = workout.run_id;
                }
            }
        }
    }

    log::debug!("Console closed");
    Ok(())
}
