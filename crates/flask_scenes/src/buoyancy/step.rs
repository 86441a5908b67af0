//! Buoyancy scene keyframes and their blended render state

use flask_animation::{lerp, Blend, Easing, Timeline};

/// One authored state of the buoyancy scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneStep {
    pub index: usize,
    pub title: &'static str,
    pub description: &'static str,
    /// How far the hull sits below the waterline
    pub sink_depth: f32,
    /// Line painted on the hull at the waterline
    pub water_mark: bool,
    /// The elephant stands on the deck
    pub actor: bool,
    /// Stones on the deck
    pub load_count: u32,
    /// Worker carrying stones on board
    pub helper: bool,
    /// Scale with the weight readout
    pub readout: bool,
    /// Weight shown on the scale, only meaningful with `readout`
    pub readout_value: f32,
}

/// The four steps of the weighing story, in order.
pub const STEPS: [SceneStep; 4] = [
    SceneStep {
        index: 0,
        title: "Elephant on the boat",
        description: "The boat sinks under the elephant's weight; the waterline is marked on the hull.",
        sink_depth: 60.0,
        water_mark: true,
        actor: true,
        load_count: 0,
        helper: false,
        readout: false,
        readout_value: 0.0,
    },
    SceneStep {
        index: 1,
        title: "Elephant leaves the boat",
        description: "Without the elephant the boat floats higher and the mark rises above the water.",
        sink_depth: 20.0,
        water_mark: true,
        actor: false,
        load_count: 0,
        helper: false,
        readout: false,
        readout_value: 0.0,
    },
    SceneStep {
        index: 2,
        title: "Loading stones to the mark",
        description: "Stones are carried aboard until the water reaches the mark again.",
        sink_depth: 60.0,
        water_mark: true,
        actor: false,
        load_count: 12,
        helper: true,
        readout: false,
        readout_value: 0.0,
    },
    SceneStep {
        index: 3,
        title: "Weighing the stones",
        description: "The stones weigh as much as the elephant did.",
        sink_depth: 20.0,
        water_mark: true,
        actor: false,
        load_count: 0,
        helper: false,
        readout: true,
        readout_value: 5000.0,
    },
];

/// Continuous scene state handed to the painter.
///
/// Boolean keyframe fields become intensities in `[0, 1]`; a painter draws a
/// non-zero intensity at that opacity. `load` keeps its fractional part so the
/// last stone can be drawn partially.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RenderState {
    pub sink_depth: f32,
    pub water_mark: f32,
    pub actor: f32,
    pub load: f32,
    pub helper: f32,
    pub readout: f32,
    pub readout_value: f32,
}

fn intensity(flag: bool) -> f32 {
    if flag {
        1.0
    } else {
        0.0
    }
}

impl Blend for SceneStep {
    type Output = RenderState;

    fn snapshot(&self) -> RenderState {
        RenderState {
            sink_depth: self.sink_depth,
            water_mark: intensity(self.water_mark),
            actor: intensity(self.actor),
            load: self.load_count as f32,
            helper: intensity(self.helper),
            readout: intensity(self.readout),
            readout_value: self.readout_value,
        }
    }

    fn blend(from: &Self, to: &Self, t: f32) -> RenderState {
        RenderState {
            sink_depth: lerp(from.sink_depth, to.sink_depth, t),
            // The mark never fades; it shows whenever either end shows it.
            water_mark: intensity(from.water_mark || to.water_mark),
            actor: lerp(intensity(from.actor), intensity(to.actor), t),
            load: lerp(from.load_count as f32, to.load_count as f32, t),
            helper: lerp(intensity(from.helper), intensity(to.helper), t),
            readout: lerp(intensity(from.readout), intensity(to.readout), t),
            readout_value: lerp(from.readout_value, to.readout_value, t),
        }
    }
}

/// Blend two steps at raw `progress` through the cubic ease-in-out curve.
///
/// `progress` is not clamped. Blending a step with itself returns its direct
/// state. At `progress == 1.0` the result equals `to.snapshot()` only when both
/// steps agree on `water_mark`, since the mark is the OR of the endpoints; a
/// finished transition renders the destination snapshot directly.
pub fn interpolate(from: &SceneStep, to: &SceneStep, progress: f32) -> RenderState {
    if from == to {
        return from.snapshot();
    }
    SceneStep::blend(from, to, Easing::EaseInOutCubic.apply(progress))
}

/// Timeline over [`STEPS`]
pub fn buoyancy_timeline(easing: Easing) -> Timeline<SceneStep> {
    Timeline::new(STEPS.to_vec(), easing)
}
