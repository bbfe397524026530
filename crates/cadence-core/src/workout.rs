use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a workout as seen by consumers
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkoutState {
    /// Never started
    #[default]
    Idle,
    /// A run is emitting frames
    Started,
    /// The last run ended, either exhausted or stopped
    Completed,
}

impl WorkoutState {
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Started => "started",
            Self::Completed => "completed",
        }
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunOutcome {
    /// Every frame was emitted
    Exhausted,
    /// `stop()` was called mid-run
    Stopped,
    /// A new `start()` replaced the run
    Superseded,
}

/// Per-frame status relative to the active frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameStatus {
    Inactive,
    Active,
    Past,
}

/// Snapshot of the workout aggregate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workout {
    pub state: WorkoutState,
    /// Zero-based pulse index of the current run
    pub timer: u32,
    /// Index of the last emitted frame in this run
    pub active_frame: Option<usize>,
    /// Work sessions completed across all runs
    pub elapsed_sessions: u32,
    pub run_id: Option<Uuid>,
    pub started_at: Option<DateTime<Utc>>,
    pub last_outcome: Option<RunOutcome>,
}

impl Workout {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self.state, WorkoutState::Started)
    }

    /// Status of frame `index` for display
    #[must_use]
    pub fn frame_status(&self, index: usize) -> FrameStatus {
        match self.active_frame {
            Some(active) if index == active => FrameStatus::Active,
            Some(active) if index < active => FrameStatus::Past,
            _ => FrameStatus::Inactive,
        }
    }

    /// Wall-clock time since the current run started
    #[must_use]
    pub fn wall_elapsed(&self, now: DateTime<Utc>) -> Option<chrono::Duration> {
        self.started_at.map(|start| now.signed_duration_since(start))
    }
}
