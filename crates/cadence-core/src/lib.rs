pub mod config;
pub mod counter;
pub mod engine;
pub mod error;
pub mod frames;
pub mod workout;

pub use config::{OutputFormat, Settings, WorkoutConfig};
pub use counter::SessionCounter;
pub use engine::{Engine, WorkoutWatch, PULSE_INTERVAL};
pub use error::{Error, Result};
pub use frames::{generate, Frame, Phase};
pub use workout::{FrameStatus, RunOutcome, Workout, WorkoutState};
