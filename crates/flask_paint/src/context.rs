//! Paint context - the main drawing API

use crate::color::Color;
use crate::primitives::{Circle, Point, Rect};

/// Stroke style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// Dash length; `None` draws a solid line
    pub dash: Option<f32>,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            dash: None,
        }
    }
}

/// 2D affine transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::identity()
    }
}

impl Transform2D {
    pub const fn identity() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }

    pub fn translate(x: f32, y: f32) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::identity()
        }
    }
}

/// A paint command for the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    FillRoundedRect {
        rect: Rect,
        radius: f32,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        style: StrokeStyle,
    },
    FillCircle {
        circle: Circle,
        color: Color,
    },
    Line {
        from: Point,
        to: Point,
        style: StrokeStyle,
    },
    DrawText {
        text: String,
        position: Point,
        size: f32,
        color: Color,
    },
    PushTransform {
        transform: Transform2D,
    },
    PopTransform,
}

impl PaintCommand {
    /// Color this command paints with, if any
    pub fn color(&self) -> Option<Color> {
        match self {
            PaintCommand::FillRect { color, .. }
            | PaintCommand::FillRoundedRect { color, .. }
            | PaintCommand::FillCircle { color, .. }
            | PaintCommand::DrawText { color, .. } => Some(*color),
            PaintCommand::StrokeRect { style, .. } | PaintCommand::Line { style, .. } => {
                Some(style.color)
            }
            PaintCommand::PushTransform { .. } | PaintCommand::PopTransform => None,
        }
    }
}

/// The paint context used for custom drawing
///
/// Shapes whose color is fully transparent are not recorded, so an element
/// drawn at zero intensity produces no command at all.
#[derive(Debug, Default)]
pub struct PaintContext {
    commands: Vec<PaintCommand>,
    transform_depth: usize,
}

impl PaintContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    fn push_visible(&mut self, color: Color, command: PaintCommand) {
        if !color.is_transparent() {
            self.commands.push(command);
        }
    }

    // === Shape drawing ===

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.push_visible(color, PaintCommand::FillRect { rect, color });
    }

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, color: Color) {
        self.push_visible(
            color,
            PaintCommand::FillRoundedRect {
                rect,
                radius,
                color,
            },
        );
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        self.push_visible(
            color,
            PaintCommand::StrokeRect {
                rect,
                style: StrokeStyle {
                    color,
                    width,
                    dash: None,
                },
            },
        );
    }

    pub fn fill_circle(&mut self, center: Point, radius: f32, color: Color) {
        self.push_visible(
            color,
            PaintCommand::FillCircle {
                circle: Circle::new(center, radius),
                color,
            },
        );
    }

    pub fn line(&mut self, from: Point, to: Point, style: StrokeStyle) {
        self.push_visible(style.color, PaintCommand::Line { from, to, style });
    }

    // === Text ===

    pub fn draw_text(&mut self, text: impl Into<String>, position: Point, size: f32, color: Color) {
        self.push_visible(
            color,
            PaintCommand::DrawText {
                text: text.into(),
                position,
                size,
                color,
            },
        );
    }

    // === Transforms ===

    pub fn push_transform(&mut self, transform: Transform2D) {
        self.transform_depth += 1;
        self.commands.push(PaintCommand::PushTransform { transform });
    }

    pub fn pop_transform(&mut self) {
        debug_assert!(self.transform_depth > 0, "pop_transform without push");
        self.transform_depth = self.transform_depth.saturating_sub(1);
        self.commands.push(PaintCommand::PopTransform);
    }

    pub fn translate(&mut self, x: f32, y: f32) {
        self.push_transform(Transform2D::translate(x, y));
    }

    /// Number of transforms pushed and not yet popped
    pub fn transform_depth(&self) -> usize {
        self.transform_depth
    }
}
