//! Step navigation and auto-play over the buoyancy timeline

use super::step::{buoyancy_timeline, RenderState, SceneStep};
use crate::config::BuoyancyConfig;
use flask_animation::{
    FrameLoop, FrameOutcome, FrameRequestId, Renderer, Timeline, TimerId, TimerQueue, Timestamp,
    TransitionScheduler,
};
use tracing::debug;

/// Which controls are enabled
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Controls {
    pub prev: bool,
    pub next: bool,
    pub play: bool,
    pub pause: bool,
    pub reset: bool,
}

impl Controls {
    pub fn for_step(index: usize, last: usize, playing: bool) -> Self {
        Self {
            prev: index > 0,
            next: index < last,
            play: !playing,
            pause: playing,
            reset: true,
        }
    }
}

/// Sequences the buoyancy steps and drives transitions between them.
///
/// `current` always names the step being shown or animated towards, so
/// controls reflect the target as soon as a transition starts.
pub struct StepNavigator<R> {
    timeline: Timeline<SceneStep>,
    scheduler: TransitionScheduler,
    renderer: R,
    current: usize,
    autoplay: bool,
    dwell_ms: u64,
    timers: TimerQueue<()>,
    dwell: Option<TimerId>,
}

impl<R: Renderer<RenderState>> StepNavigator<R> {
    pub fn new(config: &BuoyancyConfig, renderer: R) -> Self {
        Self {
            timeline: buoyancy_timeline(config.easing),
            scheduler: TransitionScheduler::new(config.transition_ms as f32),
            renderer,
            current: 0,
            autoplay: false,
            dwell_ms: config.autoplay_dwell_ms,
            timers: TimerQueue::new(),
            dwell: None,
        }
    }

    /// Draw the current step without animating
    pub fn show_current(&mut self) {
        self.renderer.render(&self.timeline.snapshot(self.current));
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn step(&self) -> &SceneStep {
        &self.timeline.keyframes()[self.current]
    }

    pub fn last_index(&self) -> usize {
        self.timeline.last_index()
    }

    pub fn is_playing(&self) -> bool {
        self.autoplay
    }

    pub fn is_animating(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn scheduler(&self) -> &TransitionScheduler {
        &self.scheduler
    }

    pub fn timeline(&self) -> &Timeline<SceneStep> {
        &self.timeline
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn controls(&self) -> Controls {
        Controls::for_step(self.current, self.last_index(), self.autoplay)
    }

    pub fn next(&mut self, frames: &mut FrameLoop, now: Timestamp) {
        if self.current < self.last_index() {
            self.transition_to(self.current + 1, frames, now);
        }
    }

    pub fn prev(&mut self, frames: &mut FrameLoop, now: Timestamp) {
        if self.current > 0 {
            self.transition_to(self.current - 1, frames, now);
        }
    }

    /// Animate to `index`. Out-of-range indices are ignored; the step already
    /// shown is drawn directly.
    pub fn go_to(&mut self, index: usize, frames: &mut FrameLoop, now: Timestamp) {
        if !self.timeline.contains(index) {
            return;
        }
        if index == self.current {
            self.skip_animation(frames);
        } else {
            self.transition_to(index, frames, now);
        }
    }

    /// Jump to the end of the running transition
    pub fn skip_animation(&mut self, frames: &mut FrameLoop) {
        self.scheduler.cancel(frames);
        self.show_current();
    }

    /// Back to the first step, auto-play off
    pub fn reset(&mut self, frames: &mut FrameLoop) {
        self.pause_autoplay();
        self.current = 0;
        self.skip_animation(frames);
        debug!("buoyancy reset");
    }

    /// Start auto-play. From the last step it restarts at the first.
    pub fn play(&mut self, frames: &mut FrameLoop, now: Timestamp) {
        if self.autoplay {
            return;
        }
        self.autoplay = true;
        debug!(from = self.current, "autoplay started");
        if self.current == self.last_index() {
            self.current = 0;
            self.skip_animation(frames);
        }
        if !self.scheduler.is_running() {
            self.next(frames, now);
        }
    }

    /// Stop auto-play; a running transition still completes.
    pub fn pause_autoplay(&mut self) {
        if let Some(id) = self.dwell.take() {
            self.timers.cancel(id);
        }
        if self.autoplay {
            self.autoplay = false;
            debug!(at = self.current, "autoplay paused");
        }
    }

    /// Deliver a display-refresh callback
    pub fn on_frame(
        &mut self,
        request: FrameRequestId,
        now: Timestamp,
        frames: &mut FrameLoop,
    ) -> FrameOutcome {
        let outcome =
            self.scheduler
                .on_frame(request, now, frames, &self.timeline, &mut self.renderer);
        if let FrameOutcome::Finished { to } = outcome {
            if self.autoplay {
                if to >= self.last_index() {
                    self.autoplay = false;
                    debug!("autoplay reached the last step");
                } else {
                    self.dwell = Some(self.timers.schedule_at(now.add_millis(self.dwell_ms), ()));
                }
            }
        }
        outcome
    }

    /// Fire the auto-play dwell timer if it is due
    pub fn advance(&mut self, now: Timestamp, frames: &mut FrameLoop) {
        while let Some(fired) = self.timers.pop_due(now) {
            if self.dwell != Some(fired.id) {
                continue;
            }
            self.dwell = None;
            if self.autoplay && !self.scheduler.is_running() {
                self.next(frames, fired.due);
            }
        }
    }

    /// Drop pending work without drawing (view teardown)
    pub fn detach(&mut self, frames: &mut FrameLoop) {
        self.pause_autoplay();
        self.scheduler.cancel(frames);
        self.timers.clear();
    }

    fn transition_to(&mut self, index: usize, frames: &mut FrameLoop, now: Timestamp) {
        debug_assert!(
            index < self.timeline.len(),
            "step {index} out of range for {} steps",
            self.timeline.len()
        );
        if let Some(id) = self.dwell.take() {
            self.timers.cancel(id);
        }
        self.scheduler.start(frames, self.current, index, now);
        self.current = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flask_animation::Blend;

    #[derive(Default)]
    struct Recorder(Vec<RenderState>);

    impl Renderer<RenderState> for Recorder {
        fn render(&mut self, state: &RenderState) {
            self.0.push(*state);
        }
    }

    fn navigator() -> StepNavigator<Recorder> {
        StepNavigator::new(&BuoyancyConfig::default(), Recorder::default())
    }

    fn ms(millis: u64) -> Timestamp {
        Timestamp::from_millis(millis)
    }

    /// Deliver frames every 16ms starting at `now` until idle; returns the end time.
    fn settle(nav: &mut StepNavigator<Recorder>, frames: &mut FrameLoop, mut now: u64) -> u64 {
        while nav.is_animating() {
            for id in frames.begin_frame() {
                nav.on_frame(id, ms(now), frames);
            }
            now += 16;
        }
        now
    }

    #[test]
    fn test_controls_table() {
        assert_eq!(
            Controls::for_step(0, 3, false),
            Controls {
                prev: false,
                next: true,
                play: true,
                pause: false,
                reset: true
            }
        );
        let last = Controls::for_step(3, 3, true);
        assert!(last.prev && !last.next && !last.play && last.pause && last.reset);
    }

    #[test]
    fn test_next_and_prev_are_bounds_guarded() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.prev(&mut frames, ms(0));
        assert_eq!(nav.current(), 0);
        assert!(!nav.is_animating());

        nav.next(&mut frames, ms(0));
        assert_eq!(nav.current(), 1);
        assert!(nav.controls().prev);
        settle(&mut nav, &mut frames, 0);

        nav.go_to(3, &mut frames, ms(2000));
        settle(&mut nav, &mut frames, 2000);
        nav.next(&mut frames, ms(5000));
        assert_eq!(nav.current(), 3);
        assert!(!nav.is_animating());
    }

    #[test]
    fn test_transition_ends_on_destination() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.next(&mut frames, ms(0));
        settle(&mut nav, &mut frames, 0);
        let renders = &nav.renderer().0;
        assert!(renders.len() > 2);
        assert_eq!(renders.last(), Some(&nav.timeline().snapshot(1)));
    }

    #[test]
    fn test_go_to_current_renders_directly() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.go_to(0, &mut frames, ms(0));
        assert!(!nav.is_animating());
        assert_eq!(nav.renderer().0, vec![nav.timeline().snapshot(0)]);

        nav.go_to(9, &mut frames, ms(0));
        assert_eq!(nav.renderer().0.len(), 1);
    }

    #[test]
    fn test_skip_animation_shows_target() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.go_to(2, &mut frames, ms(0));
        nav.skip_animation(&mut frames);
        assert!(!nav.is_animating());
        assert!(!frames.has_pending());
        assert_eq!(nav.renderer().0.last(), Some(&nav.step().snapshot()));
        assert_eq!(nav.current(), 2);
    }

    #[test]
    fn test_reset_returns_to_first_step() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.play(&mut frames, ms(0));
        nav.reset(&mut frames);
        assert_eq!(nav.current(), 0);
        assert!(!nav.is_playing());
        assert!(!nav.is_animating());
        assert_eq!(nav.renderer().0.last(), Some(&nav.timeline().snapshot(0)));
    }

    #[test]
    fn test_autoplay_walks_to_last_step_and_stops() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.play(&mut frames, ms(0));
        assert!(nav.is_playing());
        assert_eq!(nav.current(), 1);

        let mut now = 0;
        while nav.is_playing() {
            now = settle(&mut nav, &mut frames, now);
            now += 2500;
            nav.advance(ms(now), &mut frames);
        }
        assert_eq!(nav.current(), 3);
        assert!(nav.controls().play);
        assert!(!nav.is_animating());
    }

    #[test]
    fn test_autoplay_waits_for_dwell() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.play(&mut frames, ms(0));
        let finished = settle(&mut nav, &mut frames, 0);

        nav.advance(ms(finished + 1000), &mut frames);
        assert_eq!(nav.current(), 1);
        assert!(!nav.is_animating());

        nav.advance(ms(finished + 2500), &mut frames);
        assert_eq!(nav.current(), 2);
        assert!(nav.is_animating());
    }

    #[test]
    fn test_play_from_last_step_restarts() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.go_to(3, &mut frames, ms(0));
        nav.skip_animation(&mut frames);

        nav.play(&mut frames, ms(100));
        assert_eq!(nav.renderer().0.last(), Some(&nav.timeline().snapshot(0)));
        assert_eq!(nav.current(), 1);
        assert!(nav.is_animating());
    }

    #[test]
    fn test_pause_lets_transition_finish() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        nav.play(&mut frames, ms(0));
        nav.pause_autoplay();
        assert!(nav.is_animating());
        let end = settle(&mut nav, &mut frames, 0);
        nav.advance(ms(end + 10_000), &mut frames);
        assert_eq!(nav.current(), 1);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic]
    fn test_transition_past_last_step_fails_fast() {
        let mut nav = navigator();
        let mut frames = FrameLoop::new();
        let past = nav.last_index() + 1;
        nav.transition_to(past, &mut frames, ms(0));
    }
}
