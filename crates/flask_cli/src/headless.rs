//! Headless runs driven by a virtual clock

use anyhow::{ensure, Result};
use flask_animation::{FrameOutcome, Timestamp, VirtualClock};
use flask_paint::PaintContext;
use flask_scenes::buoyancy::ScenePainter;
use flask_scenes::evaporation::{paint_evaporation, EvaporationScheduler, VisualEvent, VisualLog};
use flask_scenes::{DemoSession, SceneConfig};
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

/// Upper bound on simulated time for one buoyancy run
const BUOYANCY_TIME_LIMIT_MS: u64 = 120_000;

/// Highest refresh rate with a whole-millisecond frame interval
const MAX_FPS: u32 = 1_000;

#[derive(Debug, Serialize)]
pub struct TransitionReport {
    pub to: usize,
    pub title: String,
    pub frames: u32,
    pub finished_at_ms: f32,
}

#[derive(Debug, Serialize)]
pub struct BuoyancyReport {
    pub final_step: usize,
    pub renders: u64,
    pub frames_delivered: u64,
    pub transitions: Vec<TransitionReport>,
}

#[derive(Debug, Serialize)]
pub struct EvaporationReport {
    pub duration_ms: u64,
    pub ticks: u64,
    pub departures: u64,
    pub cycles: u64,
    pub vapors_spawned: u64,
    pub vapors_alive: usize,
    pub evictions: u64,
    pub paint_commands: usize,
}

fn frame_interval(fps: u32) -> Result<Duration> {
    ensure!(fps > 0, "--fps must be at least 1");
    ensure!(fps <= MAX_FPS, "--fps must be at most {MAX_FPS}");
    Ok(Duration::from_micros(1_000_000 / u64::from(fps)))
}

/// Walk the buoyancy steps, either by auto-play or `steps` times "next".
pub fn run_buoyancy(
    config: &SceneConfig,
    fps: u32,
    autoplay: bool,
    steps: usize,
) -> Result<BuoyancyReport> {
    let interval = frame_interval(fps)?;
    let mut clock = VirtualClock::manual();
    let mut session = DemoSession::new(config, 0, ScenePainter::new(), VisualLog::new());
    session.mount(clock.now());

    let mut transitions = Vec::new();
    let mut frames_in_transition = 0u32;
    let mut remaining = steps;

    if autoplay {
        session.play(clock.now());
    }

    loop {
        if !autoplay && !session.wants_frame() {
            if remaining == 0 || !session.controls().next {
                break;
            }
            remaining -= 1;
            session.next_step(clock.now());
        }
        if autoplay && !session.buoyancy().is_playing() && !session.wants_frame() {
            break;
        }
        ensure!(
            clock.now() < Timestamp::from_millis(BUOYANCY_TIME_LIMIT_MS),
            "buoyancy run did not settle within {BUOYANCY_TIME_LIMIT_MS}ms"
        );

        let now = clock.advance(interval);
        session.advance(now);
        for outcome in session.frame(now) {
            match outcome {
                FrameOutcome::Rendered { .. } => frames_in_transition += 1,
                FrameOutcome::Finished { to } => {
                    let title = session.buoyancy().timeline().keyframes()[to].title;
                    info!(to, title, frames = frames_in_transition + 1, "step reached");
                    transitions.push(TransitionReport {
                        to,
                        title: title.to_string(),
                        frames: frames_in_transition + 1,
                        finished_at_ms: now.as_millis_f32(),
                    });
                    frames_in_transition = 0;
                }
                FrameOutcome::Ignored => {}
            }
        }
    }

    Ok(BuoyancyReport {
        final_step: session.buoyancy().current(),
        renders: session.renderer().renders(),
        frames_delivered: session.frames().frame_count(),
        transitions,
    })
}

/// Run the particle scheduler for `duration_ms` of simulated time.
pub fn run_evaporation(
    config: &SceneConfig,
    duration_ms: u64,
    seed: u64,
    fps: u32,
) -> Result<EvaporationReport> {
    let interval = frame_interval(fps)?;
    let mut clock = VirtualClock::manual();
    let mut visuals = VisualLog::new();
    let mut scheduler = EvaporationScheduler::new(config.evaporation.clone(), seed);
    scheduler.mount(clock.now(), &mut visuals);
    scheduler.start(clock.now(), &mut visuals);

    let end = Timestamp::from_millis(duration_ms);
    let mut ctx = PaintContext::new();
    let mut paint_commands = 0;
    while clock.now() < end {
        let now = clock.advance(interval).min(end);
        scheduler.advance(now, &mut visuals);
        paint_evaporation(&scheduler, now, &mut ctx);
        paint_commands = ctx.take_commands().len();

        let spawned = visuals.count(|e| matches!(e, VisualEvent::SpawnVapor { .. }));
        if spawned > 0 {
            debug!(spawned, at_ms = now.as_millis_f32(), "vapor spawned");
        }
        visuals.clear();
    }

    let stats = scheduler.stats();
    Ok(EvaporationReport {
        duration_ms,
        ticks: stats.ticks,
        departures: stats.departures,
        cycles: stats.cycles,
        vapors_spawned: stats.vapors_spawned,
        vapors_alive: scheduler.vapors().len(),
        evictions: scheduler.vapors().evictions(),
        paint_commands,
    })
}
