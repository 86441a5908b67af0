//! Flask Paint API
//!
//! A small 2D drawing API used by the demonstration scenes. Drawing calls are
//! recorded as [`PaintCommand`]s so a backend (or a test) can consume them.
//!
//! # Features
//!
//! - Shape primitives (rect, rounded rect, circle, line)
//! - Solid fills and strokes with per-shape opacity
//! - Text labels
//! - Transform stack for drawing sub-scenes at an offset

pub mod color;
pub mod context;
pub mod primitives;

pub use color::{palette, Color};
pub use context::{PaintCommand, PaintContext, StrokeStyle, Transform2D};
pub use primitives::*;
