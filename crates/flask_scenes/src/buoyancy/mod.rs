//! Buoyancy demonstration: weighing an elephant with a boat
//!
//! Four authored [`SceneStep`]s are blended by a [`flask_animation::Timeline`];
//! the [`StepNavigator`] moves between them and the [`ScenePainter`] draws the
//! result.

mod navigator;
mod painter;
mod step;

pub use navigator::{Controls, StepNavigator};
pub use painter::ScenePainter;
pub use step::{buoyancy_timeline, interpolate, RenderState, SceneStep, STEPS};
