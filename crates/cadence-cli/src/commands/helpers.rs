//! Formatting shared by the CLI commands

use cadence_core::{Frame, OutputFormat, Phase, Workout, WorkoutConfig};
use serde::Serialize;

/// Format seconds as `mm:ss`
pub fn format_clock(secs: u32) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Length of the phase run `frame` belongs to
pub fn phase_length(config: &WorkoutConfig, phase: Phase) -> u32 {
    match phase {
        Phase::Work => config.work_duration(),
        Phase::Break => config.break_duration(),
    }
}

/// 1-based session number of the frame at `index`
pub fn session_of(config: &WorkoutConfig, index: usize) -> usize {
    let session_len = (config.work_duration() + config.break_duration()) as usize;
    index / session_len.max(1) + 1
}

#[derive(Serialize)]
struct FrameLine<'a> {
    index: usize,
    session: usize,
    timer: u32,
    description: &'a str,
    elapsed: String,
}

/// One line of `run`/`console` output for an emitted frame
pub fn render_frame(
    index: usize,
    frame: &Frame,
    config: &WorkoutConfig,
    format: OutputFormat,
) -> String {
    // Pulse n fires n + 1 seconds after start
    let elapsed = format_clock(u32::try_from(index + 1).unwrap_or(u32::MAX));
    let session = session_of(config, index);

    match format {
        OutputFormat::Text => format!(
            "{elapsed}  session {session}/{}  {:<5} {}/{}",
            config.number_of_sessions(),
            frame.description(),
            frame.timer,
            phase_length(config, frame.phase()),
        ),
        OutputFormat::Json => serde_json::to_string(&FrameLine {
            index,
            session,
            timer: frame.timer,
            description: frame.description(),
            elapsed,
        })
        .unwrap_or_default(),
    }
}

/// Short status line for a workout snapshot
pub fn render_status(workout: &Workout, total_frames: usize) -> String {
    let position = workout
        .active_frame
        .map_or_else(|| "-".to_string(), |i| format!("{}/{total_frames}", i + 1));
    let outcome = workout
        .last_outcome
        .map_or_else(|| "-".to_string(), |o| format!("{o:?}").to_lowercase());

    format!(
        "state: {}  timer: {}  frame: {position}  sessions: {}  last run: {outcome}",
        workout.state.description(),
        workout.timer,
        workout.elapsed_sessions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_core::{RunOutcome, WorkoutState};

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(7), "00:07");
        assert_eq!(format_clock(65), "01:05");
        assert_eq!(format_clock(3600), "60:00");
    }

    #[test]
    fn test_session_of() {
        let config = WorkoutConfig::default();
        assert_eq!(session_of(&config, 0), 1);
        assert_eq!(session_of(&config, 7), 1);
        assert_eq!(session_of(&config, 8), 2);
        assert_eq!(session_of(&config, 23), 3);
    }

    #[test]
    fn test_render_frame_text() {
        let config = WorkoutConfig::default();
        let line = render_frame(5, &Frame::new(1, Phase::Break), &config, OutputFormat::Text);
        assert_eq!(line, "00:06  session 1/3  break 1/3");
    }

    #[test]
    fn test_render_frame_json() {
        let config = WorkoutConfig::default();
        let line = render_frame(8, &Frame::new(1, Phase::Work), &config, OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["session"], 2);
        assert_eq!(value["description"], "work");
        assert_eq!(value["elapsed"], "00:09");
    }

    #[test]
    fn test_render_status() {
        let workout = Workout {
            state: WorkoutState::Completed,
            timer: 4,
            active_frame: Some(4),
            elapsed_sessions: 0,
            last_outcome: Some(RunOutcome::Stopped),
            ..Workout::default()
        };
        assert_eq!(
            render_status(&workout, 24),
            "state: completed  timer: 4  frame: 5/24  sessions: 0  last run: stopped"
        );
    }

    #[test]
    fn test_render_status_idle() {
        assert_eq!(
            render_status(&Workout::default(), 24),
            "state: idle  timer: 0  frame: -  sessions: 0  last run: -"
        );
    }
}
