//! Draws the evaporation scene from scheduler state

use super::scheduler::EvaporationScheduler;
use super::vapor::{Vapor, VaporPhase};
use flask_animation::Timestamp;
use flask_paint::{palette, Color, PaintContext, Point, Rect};

const WIDTH: f32 = 500.0;
const HEIGHT: f32 = 400.0;
/// Top of the bowl; liquid coordinates count up from `LIQUID_BOTTOM`
const BOWL: Rect = Rect::new(120.0, 280.0, 260.0, 100.0);
const LIQUID_BOTTOM: f32 = 380.0;
const MOLECULE_RADIUS: f32 = 4.0;
const VAPOR_RADIUS: f32 = 5.0;

/// Opacity a vapor is drawn at, counting down through its fade
pub fn vapor_alpha(vapor: &Vapor, fade_ms: u64, now: Timestamp) -> f32 {
    match (vapor.phase, vapor.fade_started) {
        (VaporPhase::Fading, Some(started)) if fade_ms > 0 => {
            let t = (now.millis_since(started) / fade_ms as f32).min(1.0);
            vapor.opacity * (1.0 - t)
        }
        (VaporPhase::Fading, _) => 0.0,
        (VaporPhase::Visible, _) => vapor.opacity,
    }
}

/// Paint the whole scene at `now`
pub fn paint_evaporation(scheduler: &EvaporationScheduler, now: Timestamp, ctx: &mut PaintContext) {
    ctx.fill_rect(Rect::new(0.0, 0.0, WIDTH, HEIGHT), palette::SKY);

    let sun = if scheduler.is_running() {
        palette::SUN_ACTIVE
    } else {
        palette::SUN_IDLE
    };
    ctx.fill_circle(Point::new(60.0, 50.0), 30.0, sun);

    ctx.fill_rounded_rect(BOWL, 16.0, palette::WATER);
    for particle in scheduler.particles() {
        let [x, y] = particle.position(now);
        ctx.fill_circle(
            Point::new(BOWL.x + x, LIQUID_BOTTOM - y),
            MOLECULE_RADIUS,
            palette::MOLECULE,
        );
    }

    let fade_ms = scheduler.config().vapor_fade_ms;
    for vapor in scheduler.vapors().iter() {
        let alpha = vapor_alpha(vapor, fade_ms, now);
        ctx.fill_circle(
            Point::from(vapor.position),
            VAPOR_RADIUS,
            palette::VAPOR.faded(alpha),
        );
    }

    let label = if scheduler.is_running() {
        "Heating"
    } else {
        "Paused"
    };
    ctx.draw_text(label, Point::new(20.0, HEIGHT - 16.0), 12.0, Color::BLACK);
}
