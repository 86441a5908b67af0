//! Flask Animation Engine
//!
//! Keyframe interpolation and timed rendering for small, declarative scenes.
//!
//! # Features
//!
//! - **Easing**: cubic and quadratic ease curves
//! - **Keyframe Tracks**: looping value tracks sampled by elapsed time
//! - **Timelines**: ordered keyframes blended through an eased progress value
//! - **Transitions**: one cancelable transition driven by display-refresh callbacks
//! - **Timers**: fixed-period and one-shot wall-clock timers with cancelation

pub mod clock;
pub mod easing;
pub mod frame;
pub mod interpolate;
pub mod keyframe;
pub mod timeline;
pub mod timer;
pub mod transition;

pub use clock::{Timestamp, VirtualClock};
pub use easing::Easing;
pub use frame::{FrameLoop, FrameRequestId};
pub use interpolate::{lerp, Lerp};
pub use keyframe::{KeyframeTrack, KeyframeTrackBuilder};
pub use timeline::{Blend, Timeline};
pub use timer::{FiredTimer, TimerId, TimerQueue};
pub use transition::{ActiveTransition, FrameOutcome, Renderer, TransitionPhase, TransitionScheduler};
