//! Transition scheduler
//!
//! Drives one timeline transition at a time across display-refresh frames.
//!
//! ```text
//!            start()                    progress >= 1
//!   Idle ───────────────▶ Running ─────────────────────▶ Idle
//!    ▲                     │  ▲  │
//!    │      cancel()       │  └──┘ progress < 1: render, request next frame
//!    └─────────────────────┘
//! ```
//!
//! Starting while running replaces the active transition in the same call:
//! its pending frame request is canceled before the new one is made, and
//! frames delivered for a replaced request are ignored.

use crate::clock::Timestamp;
use crate::frame::{FrameLoop, FrameRequestId};
use crate::timeline::{Blend, Timeline};
use tracing::{debug, trace};

/// Consumer of render states
///
/// Implementations draw the state they are given and keep no scene state
/// between calls; the scheduler may call them many times per second.
pub trait Renderer<S> {
    fn render(&mut self, state: &S);
}

/// Scheduler phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Running,
}

/// The single in-flight transition
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveTransition {
    pub from: usize,
    pub to: usize,
    pub started_at: Timestamp,
    /// Frame request this transition is waiting on
    pub frame: FrameRequestId,
    /// Last progress handed to the renderer
    pub progress: f32,
}

/// Result of delivering a frame to the scheduler
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    /// The request was not the active one (stale or foreign); nothing drawn
    Ignored,
    /// An intermediate state was drawn and another frame requested
    Rendered { progress: f32 },
    /// The destination keyframe was drawn and the scheduler went idle
    Finished { to: usize },
}

/// Owns at most one [`ActiveTransition`]
#[derive(Debug)]
pub struct TransitionScheduler {
    duration_ms: f32,
    active: Option<ActiveTransition>,
}

impl TransitionScheduler {
    /// # Panics
    ///
    /// Panics if `duration_ms` is negative or not finite.
    pub fn new(duration_ms: f32) -> Self {
        assert!(
            duration_ms.is_finite() && duration_ms >= 0.0,
            "transition duration must be a non-negative number of milliseconds"
        );
        Self {
            duration_ms,
            active: None,
        }
    }

    pub fn duration_ms(&self) -> f32 {
        self.duration_ms
    }

    pub fn phase(&self) -> TransitionPhase {
        if self.active.is_some() {
            TransitionPhase::Running
        } else {
            TransitionPhase::Idle
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&ActiveTransition> {
        self.active.as_ref()
    }

    /// Begin transitioning `from` → `to`, replacing any in-flight transition.
    pub fn start(&mut self, frames: &mut FrameLoop, from: usize, to: usize, now: Timestamp) {
        self.cancel(frames);
        let frame = frames.request();
        debug!(from, to, duration_ms = self.duration_ms, "transition started");
        self.active = Some(ActiveTransition {
            from,
            to,
            started_at: now,
            frame,
            progress: 0.0,
        });
    }

    /// Drop the active transition and its pending frame. No-op when idle.
    pub fn cancel(&mut self, frames: &mut FrameLoop) {
        if let Some(active) = self.active.take() {
            frames.cancel(active.frame);
            debug!(
                from = active.from,
                to = active.to,
                progress = active.progress,
                "transition canceled"
            );
        }
    }

    /// Deliver a display-refresh callback.
    pub fn on_frame<K, R>(
        &mut self,
        request: FrameRequestId,
        now: Timestamp,
        frames: &mut FrameLoop,
        timeline: &Timeline<K>,
        renderer: &mut R,
    ) -> FrameOutcome
    where
        K: Blend,
        R: Renderer<K::Output> + ?Sized,
    {
        let duration_ms = self.duration_ms;
        let Some(active) = self.active.as_mut() else {
            return FrameOutcome::Ignored;
        };
        if active.frame != request {
            return FrameOutcome::Ignored;
        }

        let progress = progress_at(duration_ms, active.started_at, now).max(active.progress);

        if progress >= 1.0 {
            let to = active.to;
            self.active = None;
            renderer.render(&timeline.snapshot(to));
            debug!(to, "transition finished");
            return FrameOutcome::Finished { to };
        }

        active.progress = progress;
        renderer.render(&timeline.sample(active.from, active.to, progress));
        active.frame = frames.request();
        trace!(progress, "transition frame");
        FrameOutcome::Rendered { progress }
    }
}

/// Linear progress of a transition, clamped to 1. Zero duration is complete.
fn progress_at(duration_ms: f32, started_at: Timestamp, now: Timestamp) -> f32 {
    if duration_ms <= 0.0 {
        return 1.0;
    }
    (now.millis_since(started_at) / duration_ms).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::Easing;
    use crate::interpolate::lerp;

    #[derive(Debug)]
    struct Level(f32);

    impl Blend for Level {
        type Output = f32;

        fn snapshot(&self) -> f32 {
            self.0
        }

        fn blend(from: &Self, to: &Self, t: f32) -> f32 {
            lerp(from.0, to.0, t)
        }
    }

    #[derive(Default)]
    struct Recorder(Vec<f32>);

    impl Renderer<f32> for Recorder {
        fn render(&mut self, state: &f32) {
            self.0.push(*state);
        }
    }

    fn timeline() -> Timeline<Level> {
        Timeline::new(vec![Level(0.0), Level(100.0), Level(-50.0)], Easing::Linear)
    }

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    /// Pump frames every `step` ms until the scheduler goes idle.
    fn run(
        scheduler: &mut TransitionScheduler,
        frames: &mut FrameLoop,
        timeline: &Timeline<Level>,
        recorder: &mut Recorder,
        mut now: u64,
        step: u64,
    ) -> Vec<FrameOutcome> {
        let mut outcomes = Vec::new();
        while scheduler.is_running() {
            for id in frames.begin_frame() {
                outcomes.push(scheduler.on_frame(id, ms(now), frames, timeline, recorder));
            }
            now += step;
        }
        outcomes
    }

    #[test]
    fn test_runs_to_completion() {
        let timeline = timeline();
        let mut frames = FrameLoop::new();
        let mut scheduler = TransitionScheduler::new(100.0);
        let mut recorder = Recorder::default();

        scheduler.start(&mut frames, 0, 1, ms(0));
        assert_eq!(scheduler.phase(), TransitionPhase::Running);

        let outcomes = run(&mut scheduler, &mut frames, &timeline, &mut recorder, 0, 25);
        assert_eq!(outcomes.last(), Some(&FrameOutcome::Finished { to: 1 }));
        assert_eq!(recorder.0, vec![0.0, 25.0, 50.0, 75.0, 100.0]);
        assert_eq!(scheduler.phase(), TransitionPhase::Idle);
        assert!(!frames.has_pending());
    }

    #[test]
    fn test_progress_is_monotonic_even_if_clock_jitters() {
        let timeline = timeline();
        let mut frames = FrameLoop::new();
        let mut scheduler = TransitionScheduler::new(100.0);
        let mut recorder = Recorder::default();

        scheduler.start(&mut frames, 0, 1, ms(10));
        let id = frames.begin_frame()[0];
        scheduler.on_frame(id, ms(60), &mut frames, &timeline, &mut recorder);
        let id = frames.begin_frame()[0];
        let outcome = scheduler.on_frame(id, ms(40), &mut frames, &timeline, &mut recorder);
        assert_eq!(outcome, FrameOutcome::Rendered { progress: 0.5 });
    }

    #[test]
    fn test_restart_replaces_active_transition() {
        let timeline = timeline();
        let mut frames = FrameLoop::new();
        let mut scheduler = TransitionScheduler::new(100.0);
        let mut recorder = Recorder::default();

        scheduler.start(&mut frames, 0, 1, ms(0));
        let stale = scheduler.active().unwrap().frame;
        scheduler.start(&mut frames, 0, 2, ms(5));

        assert!(!frames.is_pending(stale));
        assert_eq!(
            scheduler.on_frame(stale, ms(200), &mut frames, &timeline, &mut recorder),
            FrameOutcome::Ignored
        );

        run(&mut scheduler, &mut frames, &timeline, &mut recorder, 5, 50);
        assert!(!recorder.0.contains(&100.0));
        assert_eq!(recorder.0.last(), Some(&-50.0));
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let mut frames = FrameLoop::new();
        let mut scheduler = TransitionScheduler::new(100.0);
        scheduler.cancel(&mut frames);

        scheduler.start(&mut frames, 1, 2, ms(0));
        scheduler.cancel(&mut frames);
        scheduler.cancel(&mut frames);
        assert_eq!(scheduler.phase(), TransitionPhase::Idle);
        assert!(frames.begin_frame().is_empty());
    }

    #[test]
    fn test_zero_duration_finishes_on_first_frame() {
        let timeline = timeline();
        let mut frames = FrameLoop::new();
        let mut scheduler = TransitionScheduler::new(0.0);
        let mut recorder = Recorder::default();

        scheduler.start(&mut frames, 0, 2, ms(0));
        let outcomes = run(&mut scheduler, &mut frames, &timeline, &mut recorder, 0, 16);
        assert_eq!(outcomes, vec![FrameOutcome::Finished { to: 2 }]);
        assert_eq!(recorder.0, vec![-50.0]);
    }

    #[test]
    #[should_panic]
    fn test_negative_duration_is_rejected() {
        TransitionScheduler::new(-1.0);
    }
}
