use super::*;
use crate::{frames::Phase, workout::FrameStatus};
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

fn engine(work: u32, brk: u32, sessions: u32) -> Engine {
    Engine::new(WorkoutConfig::new(work, brk, sessions).unwrap())
}

async fn take_frames(rx: &mut broadcast::Receiver<Frame>, n: usize) -> Vec<Frame> {
    let mut frames = Vec::with_capacity(n);
    for _ in 0..n {
        frames.push(rx.recv().await.unwrap());
    }
    frames
}

// ==================== Full runs ====================

#[tokio::test(start_paused = true)]
async fn test_run_emits_every_frame_then_completes() {
    let mut engine = engine(5, 3, 1);
    let mut session = engine.session();

    engine.start();
    assert_eq!(engine.state(), WorkoutState::Started);

    let emitted = take_frames(&mut session, 8).await;
    assert_eq!(emitted, frames::generate(5, 3, 1));

    let workout = engine.wait_until_completed().await;
    assert_eq!(workout.state, WorkoutState::Completed);
    assert_eq!(workout.last_outcome, Some(RunOutcome::Exhausted));
    assert_eq!(workout.timer, 7);
    assert_eq!(workout.active_frame, Some(7));

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert_eq!(session.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn test_session_count_emits_once_per_boundary() {
    let mut engine = engine(5, 3, 3);
    let mut counts = engine.session_count();

    engine.start();
    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(counts.recv().await.unwrap());
    }
    assert_eq!(seen, vec![1, 2, 3]);

    let workout = engine.wait_until_completed().await;
    assert_eq!(workout.elapsed_sessions, 3);
    assert_eq!(counts.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn test_one_frame_per_pulse() {
    let mut engine = engine(2, 1, 1);
    let mut session = engine.session();
    let started = Instant::now();

    engine.start();
    session.recv().await.unwrap();
    assert_eq!(started.elapsed(), PULSE_INTERVAL);

    session.recv().await.unwrap();
    assert_eq!(started.elapsed(), PULSE_INTERVAL * 2);
}

#[tokio::test(start_paused = true)]
async fn test_timer_tracks_pulse_index() {
    let mut engine = engine(5, 3, 1);
    let mut session = engine.session();

    engine.start();
    assert_eq!(engine.workout().timer, 0);
    assert_eq!(engine.workout().active_frame, None);

    take_frames(&mut session, 4).await;
    let workout = engine.workout();
    assert_eq!(workout.timer, 3);
    assert_eq!(workout.frame_status(2), FrameStatus::Past);
    assert_eq!(workout.frame_status(3), FrameStatus::Active);
    assert_eq!(workout.frame_status(4), FrameStatus::Inactive);
}

#[tokio::test(start_paused = true)]
async fn test_empty_sequence_completes_immediately() {
    let mut engine = Engine::from_frames(Vec::new());
    engine.start();

    let workout = engine.wait_until_completed().await;
    assert_eq!(workout.last_outcome, Some(RunOutcome::Exhausted));
}

// ==================== Stop ====================

#[tokio::test(start_paused = true)]
async fn test_stop_truncates_the_run() {
    let mut engine = engine(5, 3, 3);
    let mut session = engine.session();

    engine.start();
    let emitted = take_frames(&mut session, 6).await;
    assert!(engine.stop());

    let workout = engine.workout();
    assert_eq!(workout.state, WorkoutState::Completed);
    assert_eq!(workout.last_outcome, Some(RunOutcome::Stopped));
    assert_eq!(workout.timer, 5);
    assert_eq!(emitted, engine.frames()[..6].to_vec());

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(session.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn test_stop_truncates_counting() {
    let mut engine = engine(5, 3, 3);
    let mut session = engine.session();
    let mut counts = engine.session_count();

    engine.start();
    // Index 13 would be the second work -> break boundary
    take_frames(&mut session, 13).await;
    engine.stop();

    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(counts.try_recv(), Ok(1));
    assert_eq!(counts.try_recv(), Err(TryRecvError::Empty));
    assert_eq!(engine.workout().elapsed_sessions, 1);
}

#[tokio::test(start_paused = true)]
async fn test_stop_twice_is_same_as_once() {
    let mut engine = engine(5, 3, 1);
    let mut session = engine.session();

    engine.start();
    take_frames(&mut session, 3).await;

    assert!(engine.stop());
    let after_first = engine.workout();
    assert!(!engine.stop());
    assert_eq!(engine.workout(), after_first);
}

#[tokio::test(start_paused = true)]
async fn test_stop_without_run_is_noop() {
    let mut engine = engine(5, 3, 1);
    assert!(!engine.stop());
    assert_eq!(engine.workout(), Workout::default());
}

#[tokio::test(start_paused = true)]
async fn test_stop_after_completion_is_noop() {
    let mut engine = engine(1, 1, 1);
    engine.start();
    engine.wait_until_completed().await;

    assert!(!engine.stop());
    assert_eq!(engine.workout().last_outcome, Some(RunOutcome::Exhausted));
}

// ==================== Restart ====================

#[tokio::test(start_paused = true)]
async fn test_restart_after_completion_replays_from_first_frame() {
    let mut engine = engine(2, 1, 2);
    let mut session = engine.session();

    let first_run = engine.start();
    take_frames(&mut session, 6).await;
    engine.wait_until_completed().await;

    let second_run = engine.start();
    assert_ne!(first_run, second_run);
    assert_eq!(engine.state(), WorkoutState::Started);
    assert_eq!(engine.workout().timer, 0);

    let first = session.recv().await.unwrap();
    assert_eq!(first, engine.frames()[0]);
    assert_eq!(first, Frame::new(1, Phase::Work));
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_stop_replays_from_first_frame() {
    let mut engine = engine(5, 3, 1);
    let mut session = engine.session();

    engine.start();
    take_frames(&mut session, 7).await;
    engine.stop();

    engine.start();
    let replay = take_frames(&mut session, 8).await;
    assert_eq!(replay, engine.frames().to_vec());
}

#[tokio::test(start_paused = true)]
async fn test_start_while_running_supersedes() {
    let mut engine = engine(5, 3, 1);
    let mut session = engine.session();
    let watch = engine.watch();

    let first_run = engine.start();
    take_frames(&mut session, 4).await;

    let second_run = engine.start();
    let workout = watch.current();
    assert_eq!(workout.state, WorkoutState::Started);
    assert_eq!(workout.run_id, Some(second_run));
    assert_ne!(workout.run_id, Some(first_run));
    assert_eq!(workout.last_outcome, Some(RunOutcome::Superseded));

    // The old run never emits again; the new one starts over
    let replay = take_frames(&mut session, 8).await;
    assert_eq!(replay, engine.frames().to_vec());

    let workout = engine.wait_until_completed().await;
    assert_eq!(workout.last_outcome, Some(RunOutcome::Exhausted));
    assert_eq!(session.try_recv(), Err(TryRecvError::Empty));
}

#[tokio::test(start_paused = true)]
async fn test_session_count_accumulates_across_runs() {
    let mut engine = engine(2, 1, 2);
    let mut counts = engine.session_count();

    engine.start();
    engine.wait_until_completed().await;
    engine.start();
    engine.wait_until_completed().await;

    let mut seen = Vec::new();
    while let Ok(count) = counts.try_recv() {
        seen.push(count);
    }
    assert_eq!(seen, vec![1, 2, 3, 4]);
    assert_eq!(engine.workout().elapsed_sessions, 4);
}

// ==================== Lifecycle ====================

#[tokio::test(start_paused = true)]
async fn test_watch_reports_each_pulse() {
    let mut engine = engine(3, 1, 1);
    let mut watch = engine.watch();

    engine.start();
    // The last pulse and completion land in a single update
    let mut timers = Vec::new();
    while let Some(workout) = watch.changed().await {
        if workout.state == WorkoutState::Completed {
            break;
        }
        if workout.active_frame.is_some() {
            timers.push(workout.timer);
        }
    }
    assert_eq!(timers, vec![0, 1, 2]);
}

#[tokio::test(start_paused = true)]
async fn test_dropping_engine_cancels_run() {
    let mut engine = engine(5, 3, 3);
    let mut session = engine.session();

    engine.start();
    session.recv().await.unwrap();
    drop(engine);

    assert_eq!(session.recv().await, Err(RecvError::Closed));
}
