//! Demo session: owns all per-page animation state
//!
//! A host creates one session per mounted page, forwards display-refresh
//! callbacks to [`DemoSession::frame`] and wall-clock time to
//! [`DemoSession::advance`], and maps its buttons onto the control methods.
//! Unmounting cancels every pending frame request and timer.

use crate::buoyancy::{Controls, RenderState, StepNavigator};
use crate::config::SceneConfig;
use crate::evaporation::{EvaporationScheduler, ParticleVisuals};
use flask_animation::{FrameLoop, FrameOutcome, Renderer, Timestamp};
use smallvec::SmallVec;
use tracing::debug;

pub struct DemoSession<R, V> {
    frames: FrameLoop,
    buoyancy: StepNavigator<R>,
    evaporation: EvaporationScheduler,
    visuals: V,
    mounted: bool,
}

impl<R, V> DemoSession<R, V>
where
    R: Renderer<RenderState>,
    V: ParticleVisuals,
{
    pub fn new(config: &SceneConfig, seed: u64, renderer: R, visuals: V) -> Self {
        Self {
            frames: FrameLoop::new(),
            buoyancy: StepNavigator::new(&config.buoyancy, renderer),
            evaporation: EvaporationScheduler::new(config.evaporation.clone(), seed),
            visuals,
            mounted: false,
        }
    }

    /// Draw the first step and build the particle scene
    pub fn mount(&mut self, now: Timestamp) {
        if self.mounted {
            return;
        }
        self.mounted = true;
        self.buoyancy.show_current();
        self.evaporation.mount(now, &mut self.visuals);
        debug!("session mounted");
    }

    /// Cancel everything pending and remove the particle visuals
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.buoyancy.detach(&mut self.frames);
        self.evaporation.unmount(&mut self.visuals);
        self.frames.clear();
        self.mounted = false;
        debug!("session unmounted");
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Deliver one display refresh
    pub fn frame(&mut self, now: Timestamp) -> SmallVec<[FrameOutcome; 4]> {
        self.frames
            .begin_frame()
            .into_iter()
            .map(|request| self.buoyancy.on_frame(request, now, &mut self.frames))
            .collect()
    }

    /// Fire wall-clock timers due at or before `now`
    pub fn advance(&mut self, now: Timestamp) {
        if !self.mounted {
            return;
        }
        self.buoyancy.advance(now, &mut self.frames);
        self.evaporation.advance(now, &mut self.visuals);
    }

    /// Whether a display refresh is wanted
    pub fn wants_frame(&self) -> bool {
        self.frames.has_pending()
    }

    // === Buoyancy controls ===

    pub fn next_step(&mut self, now: Timestamp) {
        if self.mounted {
            self.buoyancy.next(&mut self.frames, now);
        }
    }

    pub fn prev_step(&mut self, now: Timestamp) {
        if self.mounted {
            self.buoyancy.prev(&mut self.frames, now);
        }
    }

    pub fn go_to_step(&mut self, index: usize, now: Timestamp) {
        if self.mounted {
            self.buoyancy.go_to(index, &mut self.frames, now);
        }
    }

    pub fn skip_animation(&mut self) {
        if self.mounted {
            self.buoyancy.skip_animation(&mut self.frames);
        }
    }

    pub fn reset_steps(&mut self) {
        if self.mounted {
            self.buoyancy.reset(&mut self.frames);
        }
    }

    pub fn play(&mut self, now: Timestamp) {
        if self.mounted {
            self.buoyancy.play(&mut self.frames, now);
        }
    }

    pub fn pause_autoplay(&mut self) {
        self.buoyancy.pause_autoplay();
    }

    pub fn controls(&self) -> Controls {
        self.buoyancy.controls()
    }

    // === Evaporation controls ===

    pub fn start_evaporation(&mut self, now: Timestamp) {
        if self.mounted {
            self.evaporation.start(now, &mut self.visuals);
        }
    }

    pub fn pause_evaporation(&mut self) {
        self.evaporation.pause(&mut self.visuals);
    }

    pub fn reset_evaporation(&mut self, now: Timestamp) {
        if self.mounted {
            self.evaporation.reset(now, &mut self.visuals);
        }
    }

    // === Accessors ===

    pub fn buoyancy(&self) -> &StepNavigator<R> {
        &self.buoyancy
    }

    pub fn evaporation(&self) -> &EvaporationScheduler {
        &self.evaporation
    }

    pub fn renderer(&self) -> &R {
        self.buoyancy.renderer()
    }

    pub fn visuals(&self) -> &V {
        &self.visuals
    }

    pub fn visuals_mut(&mut self) -> &mut V {
        &mut self.visuals
    }

    pub fn frames(&self) -> &FrameLoop {
        &self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buoyancy::ScenePainter;
    use crate::evaporation::VisualLog;

    fn session() -> DemoSession<ScenePainter, VisualLog> {
        DemoSession::new(&SceneConfig::default(), 9, ScenePainter::new(), VisualLog::new())
    }

    #[test]
    fn test_controls_ignored_until_mounted() {
        let mut session = session();
        session.next_step(Timestamp::zero());
        session.start_evaporation(Timestamp::zero());
        assert!(!session.wants_frame());
        assert!(!session.evaporation().is_running());

        session.mount(Timestamp::zero());
        assert_eq!(session.renderer().renders(), 1);
        session.next_step(Timestamp::zero());
        assert!(session.wants_frame());
    }

    #[test]
    fn test_unmount_cancels_everything() {
        let mut session = session();
        session.mount(Timestamp::zero());
        session.play(Timestamp::zero());
        session.start_evaporation(Timestamp::zero());
        session.advance(Timestamp::from_millis(2000));

        session.unmount();
        assert!(!session.wants_frame());
        assert!(!session.buoyancy().is_animating());
        assert!(!session.buoyancy().is_playing());
        assert!(!session.evaporation().is_running());
        assert_eq!(session.evaporation().pending_timers(), 0);
        assert!(session.evaporation().vapors().is_empty());
        assert!(session.frame(Timestamp::from_millis(2016)).is_empty());
    }
}
