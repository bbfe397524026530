//! Session timer engine
//!
//! Drives one run at a time over an immutable frame sequence. A run is an
//! owned tokio task that emits one frame per pulse; `start` replaces the task
//! and `stop` cancels it. Workout state sits behind a `watch` channel and every
//! emission happens while that state is locked and the run is confirmed live,
//! so nothing from a canceled run is observed once `start`/`stop` returns.

use crate::{
    config::WorkoutConfig,
    counter::SessionCounter,
    frames::{self, Frame},
    workout::{RunOutcome, Workout, WorkoutState},
};
use chrono::Utc;
use std::{sync::Arc, time::Duration};
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use uuid::Uuid;

/// Time between two emitted frames
pub const PULSE_INTERVAL: Duration = Duration::from_secs(1);

const MIN_CHANNEL_CAPACITY: usize = 16;

/// Workout state plus the running session tally
#[derive(Debug, Default)]
struct Tracker {
    workout: Workout,
    counter: SessionCounter,
}

impl Tracker {
    fn is_live(&self, run: Uuid) -> bool {
        self.workout.run_id == Some(run) && self.workout.is_running()
    }

    /// Reset for a new run. Returns the run that was superseded, if any.
    fn begin(&mut self, run: Uuid) -> Option<Uuid> {
        let superseded = if self.workout.is_running() {
            self.workout.last_outcome = Some(RunOutcome::Superseded);
            self.workout.run_id
        } else {
            None
        };

        self.workout.state = WorkoutState::Started;
        self.workout.timer = 0;
        self.workout.active_frame = None;
        self.workout.run_id = Some(run);
        self.workout.started_at = Some(Utc::now());
        superseded
    }

    fn pulse(&mut self, run: Uuid, n: usize, frame: &Frame, outputs: &Outputs) -> bool {
        if !self.is_live(run) {
            return false;
        }

        self.workout.timer = u32::try_from(n).unwrap_or(u32::MAX);
        self.workout.active_frame = Some(n);
        log::debug!("Run {run} pulse {n}: {} {}", frame.description, frame.timer);
        outputs.send_frame(*frame);

        if let Some(count) = self.counter.observe(frame) {
            self.workout.elapsed_sessions = count;
            log::info!("Session {count} completed");
            outputs.send_count(count);
        }
        true
    }

    fn finish(&mut self, run: Uuid, outcome: RunOutcome) -> bool {
        if !self.is_live(run) {
            return false;
        }
        self.workout.state = WorkoutState::Completed;
        self.workout.last_outcome = Some(outcome);
        true
    }

    fn stop(&mut self) -> Option<Uuid> {
        let run = self.workout.run_id?;
        self.finish(run, RunOutcome::Stopped).then_some(run)
    }
}

/// Broadcast ends of the two output streams
#[derive(Debug, Clone)]
struct Outputs {
    session: broadcast::Sender<Frame>,
    session_count: broadcast::Sender<u32>,
}

impl Outputs {
    fn new(capacity: usize) -> Self {
        let (session, _) = broadcast::channel(capacity);
        let (session_count, _) = broadcast::channel(capacity);
        Self {
            session,
            session_count,
        }
    }

    // A send only fails when nobody is subscribed, which is fine
    fn send_frame(&self, frame: Frame) {
        if self.session.send(frame).is_err() {
            log::trace!("No session subscribers");
        }
    }

    fn send_count(&self, count: u32) {
        if self.session_count.send(count).is_err() {
            log::trace!("No session count subscribers");
        }
    }
}

/// Read side of the workout state with change notification
#[derive(Debug, Clone)]
pub struct WorkoutWatch {
    rx: watch::Receiver<Tracker>,
}

impl WorkoutWatch {
    /// Latest workout snapshot
    #[must_use]
    pub fn current(&self) -> Workout {
        self.rx.borrow().workout.clone()
    }

    /// Wait for the next change and return the new snapshot.
    ///
    /// Returns `None` once the engine has been dropped.
    pub async fn changed(&mut self) -> Option<Workout> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().workout.clone())
    }

    /// Wait until the workout is in `state`, returning immediately if it already is.
    ///
    /// Returns `None` if the engine is dropped first.
    pub async fn wait_for_state(&mut self, state: WorkoutState) -> Option<Workout> {
        let tracker = self.rx.wait_for(|t| t.workout.state == state).await.ok()?;
        Some(tracker.workout.clone())
    }
}

/// Interval timer engine over a fixed frame sequence
#[derive(Debug)]
pub struct Engine {
    frames: Arc<[Frame]>,
    tracker: Arc<watch::Sender<Tracker>>,
    outputs: Outputs,
    run: Option<JoinHandle<()>>,
}

impl Engine {
    /// Build the frame sequence for `config` and an idle engine over it
    #[must_use]
    pub fn new(config: WorkoutConfig) -> Self {
        Self::from_frames(frames::generate_for(&config))
    }

    /// Idle engine over an already generated frame sequence
    #[must_use]
    pub fn from_frames(frames: Vec<Frame>) -> Self {
        let capacity = frames.len().max(MIN_CHANNEL_CAPACITY);
        let (tracker, _) = watch::channel(Tracker::default());
        Self {
            frames: frames.into(),
            tracker: Arc::new(tracker),
            outputs: Outputs::new(capacity),
            run: None,
        }
    }

    /// Start a new run from the first frame.
    ///
    /// Any in-flight run is canceled first. Must be called from within a tokio
    /// runtime.
    pub fn start(&mut self) -> Uuid {
        let run = Uuid::new_v4();
        let mut superseded = None;
        self.tracker.send_modify(|t| superseded = t.begin(run));

        if let Some(handle) = self.run.take() {
            handle.abort();
        }
        match superseded {
            Some(old) => log::info!("Run {old} superseded by run {run}"),
            None => log::info!("Run {run} started ({} frames)", self.frames.len()),
        }

        self.run = Some(tokio::spawn(drive(
            run,
            Arc::clone(&self.frames),
            Arc::clone(&self.tracker),
            self.outputs.clone(),
        )));
        run
    }

    /// Cancel the active run.
    ///
    /// Returns `false` when there was nothing to stop.
    pub fn stop(&mut self) -> bool {
        let mut stopped = None;
        self.tracker.send_if_modified(|t| {
            stopped = t.stop();
            stopped.is_some()
        });

        if let Some(handle) = self.run.take() {
            handle.abort();
        }

        if let Some(run) = stopped {
            log::info!("Run {run} stopped");
            true
        } else {
            log::debug!("Stop ignored, no active run");
            false
        }
    }

    /// The immutable frame sequence every run replays
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Snapshot of the workout aggregate
    #[must_use]
    pub fn workout(&self) -> Workout {
        self.tracker.borrow().workout.clone()
    }

    #[must_use]
    pub fn state(&self) -> WorkoutState {
        self.tracker.borrow().workout.state
    }

    /// Frames emitted from now on, one per pulse while a run is active
    #[must_use]
    pub fn session(&self) -> broadcast::Receiver<Frame> {
        self.outputs.session.subscribe()
    }

    /// Session tally emitted at every work -> break boundary
    #[must_use]
    pub fn session_count(&self) -> broadcast::Receiver<u32> {
        self.outputs.session_count.subscribe()
    }

    #[must_use]
    pub fn watch(&self) -> WorkoutWatch {
        WorkoutWatch {
            rx: self.tracker.subscribe(),
        }
    }

    /// Wait until the workout reaches `Completed`.
    ///
    /// Resolves immediately when no run is active and a previous one completed.
    pub async fn wait_until_completed(&self) -> Workout {
        let mut watch = self.watch();
        match watch.wait_for_state(WorkoutState::Completed).await {
            Some(workout) => workout,
            None => self.workout(),
        }
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        if let Some(handle) = self.run.take() {
            handle.abort();
        }
    }
}

async fn drive(
    run: Uuid,
    frames: Arc<[Frame]>,
    tracker: Arc<watch::Sender<Tracker>>,
    outputs: Outputs,
) {
    let mut pulses = interval_at(Instant::now() + PULSE_INTERVAL, PULSE_INTERVAL);
    pulses.set_missed_tick_behavior(MissedTickBehavior::Delay);

    for (n, frame) in frames.iter().enumerate() {
        pulses.tick().await;
        if !tracker.send_if_modified(|t| t.pulse(run, n, frame, &outputs)) {
            log::debug!("Run {run} canceled before pulse {n}");
            return;
        }
    }

    if tracker.send_if_modified(|t| t.finish(run, RunOutcome::Exhausted)) {
        log::info!("Run {run} completed after {} frames", frames.len());
    }
}

#[cfg(test)]
mod tests;
