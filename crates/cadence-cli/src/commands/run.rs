//! Run one workout in the foreground

use super::helpers::{format_clock, render_frame, render_status};
use anyhow::Result;
use cadence_core::{Engine, Frame, Settings, WorkoutConfig, WorkoutState};
use tokio::sync::broadcast::{self, error::RecvError};

/// Outcome of waiting on one of the engine's output streams
pub enum Received<T> {
    Value(T),
    Lagged(u64),
    Closed,
}

pub fn classify<T>(result: std::result::Result<T, RecvError>) -> Received<T> {
    match result {
        Ok(value) => Received::Value(value),
        Err(RecvError::Lagged(n)) => Received::Lagged(n),
        Err(RecvError::Closed) => Received::Closed,
    }
}

/// Prints frames and completed sessions as they arrive
pub struct Printer<'a> {
    config: &'a WorkoutConfig,
    settings: &'a Settings,
    next_index: usize,
}

impl<'a> Printer<'a> {
    pub fn new(config: &'a WorkoutConfig, settings: &'a Settings) -> Self {
        Self {
            config,
            settings,
            next_index: 0,
        }
    }

    /// A new run replays from the first frame
    pub fn reset(&mut self) {
        self.next_index = 0;
    }

    pub fn frame(&mut self, frame: &Frame) {
        println!(
            "{}",
            render_frame(self.next_index, frame, self.config, self.settings.output)
        );
        self.next_index += 1;
    }

    pub fn session(&self, count: u32) {
        if self.settings.announce_sessions {
            println!(
                "-- session {count} of {} done --",
                self.config.number_of_sessions()
            );
        }
    }

    /// Print whatever is still buffered on the receivers
    pub fn drain(
        &mut self,
        session: &mut broadcast::Receiver<Frame>,
        counts: &mut broadcast::Receiver<u32>,
    ) {
        while let Ok(frame) = session.try_recv() {
            self.frame(&frame);
        }
        while let Ok(count) = counts.try_recv() {
            self.session(count);
        }
    }
}

/// Start a workout and print it until it completes or Ctrl-C stops it
///
/// # Errors
///
/// Returns an error if the Ctrl-C handler cannot be installed
pub async fn run_command(config: WorkoutConfig, settings: &Settings) -> Result<()> {
    let mut engine = Engine::new(config);
    let mut session = engine.session();
    let mut counts = engine.session_count();
    let mut watch = engine.watch();
    let mut printer = Printer::new(&config, settings);

    println!(
        "Starting workout: {} sessions of {}s work / {}s break (Ctrl-C to stop)",
        config.number_of_sessions(),
        config.work_duration(),
        config.break_duration()
    );
    engine.start();

    loop {
        tokio::select! {
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
            _ = watch.wait_for_state(WorkoutState::Completed) => break,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                log::info!("Received Ctrl-C, stopping workout...");
                engine.stop();
                break;
            }
        }
    }

    printer.drain(&mut session, &mut counts);

    let workout = engine.workout();
    let wall = workout
        .wall_elapsed(chrono::Utc::now())
        .and_then(|d| u32::try_from(d.num_seconds()).ok())
        .unwrap_or_default();
    println!("\n{}", render_status(&workout, engine.frames().len()));
    println!("Wall time: {}", format_clock(wall));
    Ok(())
}
