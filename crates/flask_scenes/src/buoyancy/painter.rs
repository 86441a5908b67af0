//! Draws a buoyancy [`RenderState`] as paint commands

use super::step::RenderState;
use flask_animation::Renderer;
use flask_paint::{palette, Color, PaintCommand, PaintContext, Point, Rect, StrokeStyle};

const WIDTH: f32 = 500.0;
const HEIGHT: f32 = 300.0;
const WATERLINE: f32 = 180.0;

const HULL_X: f32 = 140.0;
const HULL_WIDTH: f32 = 220.0;
const HULL_HEIGHT: f32 = 80.0;

const STONE_SIZE: f32 = 14.0;
const STONES_PER_ROW: usize = 6;

/// Painter for the buoyancy scene.
///
/// Every render replaces the recorded frame; nothing about the scene is kept
/// between renders.
#[derive(Debug, Default)]
pub struct ScenePainter {
    ctx: PaintContext,
    frame: Vec<PaintCommand>,
    last_state: Option<RenderState>,
    renders: u64,
}

impl ScenePainter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands of the most recent render
    pub fn frame(&self) -> &[PaintCommand] {
        &self.frame
    }

    pub fn last_state(&self) -> Option<&RenderState> {
        self.last_state.as_ref()
    }

    /// Total renders so far
    pub fn renders(&self) -> u64 {
        self.renders
    }

    fn paint(&mut self, state: &RenderState) {
        let ctx = &mut self.ctx;
        ctx.fill_rect(Rect::new(0.0, 0.0, WIDTH, WATERLINE), palette::SKY);

        let hull_top = WATERLINE - HULL_HEIGHT + state.sink_depth;
        ctx.translate(HULL_X, hull_top);
        ctx.fill_rounded_rect(Rect::new(0.0, 0.0, HULL_WIDTH, HULL_HEIGHT), 12.0, palette::HULL);

        // Mark sits where the waterline was with the elephant aboard.
        ctx.line(
            Point::new(0.0, HULL_HEIGHT - 60.0),
            Point::new(HULL_WIDTH, HULL_HEIGHT - 60.0),
            StrokeStyle {
                color: palette::MARK.faded(state.water_mark),
                width: 2.0,
                dash: Some(6.0),
            },
        );

        ctx.fill_rounded_rect(
            Rect::new(70.0, -70.0, 90.0, 70.0),
            18.0,
            palette::ELEPHANT.faded(state.actor),
        );

        paint_stones(ctx, state.load);

        ctx.fill_rounded_rect(
            Rect::new(HULL_WIDTH - 20.0, -40.0, 16.0, 40.0),
            6.0,
            palette::WORKER.faded(state.helper),
        );
        ctx.pop_transform();

        ctx.fill_rect(
            Rect::new(0.0, WATERLINE, WIDTH, HEIGHT - WATERLINE),
            palette::WATER,
        );

        let scale = palette::SCALE.faded(state.readout);
        ctx.fill_rect(Rect::new(400.0, 60.0, 80.0, 40.0), scale);
        ctx.draw_text(
            format!("{:.0} kg", state.readout_value),
            Point::new(410.0, 85.0),
            14.0,
            Color::WHITE.faded(state.readout),
        );
    }
}

/// Whole stones at full opacity; a fractional load draws one more stone at
/// the fraction.
fn paint_stones(ctx: &mut PaintContext, load: f32) {
    let load = load.max(0.0);
    let whole = load.floor() as usize;
    let partial = load.fract();

    let stone = |ctx: &mut PaintContext, i: usize, alpha: f32| {
        let col = (i % STONES_PER_ROW) as f32;
        let row = (i / STONES_PER_ROW) as f32;
        ctx.fill_rounded_rect(
            Rect::new(
                20.0 + col * (STONE_SIZE + 2.0),
                -STONE_SIZE * (row + 1.0),
                STONE_SIZE,
                STONE_SIZE,
            ),
            3.0,
            palette::STONE.faded(alpha),
        );
    };

    for i in 0..whole {
        stone(ctx, i, 1.0);
    }
    if partial > 0.0 {
        stone(ctx, whole, partial);
    }
}

impl Renderer<RenderState> for ScenePainter {
    fn render(&mut self, state: &RenderState) {
        self.paint(state);
        self.frame = self.ctx.take_commands();
        self.last_state = Some(*state);
        self.renders += 1;
    }
}
