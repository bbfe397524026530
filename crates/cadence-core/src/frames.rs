//! Frame sequence generation
//!
//! A workout is a flat list of one-second frames: `number_of_sessions`
//! repetitions of a work run followed by a break run. Each frame carries its
//! 1-based position inside its own phase run, not a global index.

use crate::config::WorkoutConfig;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which half of a session a frame belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Work,
    Break,
}

impl Phase {
    /// Label used on the wire and in the terminal
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Break => "break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

/// One second of the workout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// 1-based index within the current phase run
    pub timer: u32,
    pub description: Phase,
}

impl Frame {
    #[must_use]
    pub const fn new(timer: u32, description: Phase) -> Self {
        Self { timer, description }
    }

    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.description
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description.description()
    }
}

fn phase_run(duration: u32, phase: Phase) -> Vec<Frame> {
    (1..=duration).map(|timer| Frame::new(timer, phase)).collect()
}

/// Build the full frame sequence for a workout.
///
/// A zero duration produces an empty phase and zero sessions produce an empty
/// sequence; [`WorkoutConfig::new`] is where zero values are rejected.
#[must_use]
pub fn generate(work_duration: u32, break_duration: u32, number_of_sessions: u32) -> Vec<Frame> {
    let work_run = phase_run(work_duration, Phase::Work);
    let break_run = phase_run(break_duration, Phase::Break);

    let session_len = work_run.len() + break_run.len();
    let mut frames = Vec::with_capacity(session_len * number_of_sessions as usize);
    for _ in 0..number_of_sessions {
        frames.extend_from_slice(&work_run);
        frames.extend_from_slice(&break_run);
    }
    frames
}

/// Build the frame sequence described by `config`
#[must_use]
pub fn generate_for(config: &WorkoutConfig) -> Vec<Frame> {
    generate(
        config.work_duration(),
        config.break_duration(),
        config.number_of_sessions(),
    )
}
