//! Keyframe tracks
//!
//! A track is a list of timed values sampled by elapsed time. Tracks are
//! stateless: callers pass the elapsed milliseconds and get the value back, so
//! the same track can be shared by many animated elements with different
//! start times.

use crate::easing::Easing;
use crate::interpolate::Lerp;

/// A point in time with a value
#[derive(Clone, Debug)]
pub struct KeyframePoint<V> {
    /// Time in milliseconds from the start of one iteration
    pub time_ms: u32,
    pub value: V,
    /// Easing used when transitioning TO this point
    pub easing: Easing,
}

/// Builder for keyframe tracks
///
/// # Example
///
/// ```
/// use flask_animation::{Easing, KeyframeTrack};
///
/// let wobble = KeyframeTrack::builder()
///     .ease(Easing::EaseInOutCubic)
///     .at(0, [0.0, 0.0])
///     .at(750, [3.0, -2.0])
///     .at(1500, [-2.0, 2.0])
///     .at(3000, [0.0, 0.0])
///     .loop_infinite()
///     .build();
///
/// assert_eq!(wobble.sample(750.0), [3.0, -2.0]);
/// ```
#[derive(Clone, Debug)]
pub struct KeyframeTrackBuilder<V> {
    points: Vec<KeyframePoint<V>>,
    default_easing: Easing,
    /// Number of iterations (-1 for infinite)
    iterations: i32,
    delay_ms: u32,
}

impl<V: Lerp> Default for KeyframeTrackBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Lerp> KeyframeTrackBuilder<V> {
    pub fn new() -> Self {
        Self {
            points: Vec::new(),
            default_easing: Easing::Linear,
            iterations: 1,
            delay_ms: 0,
        }
    }

    /// Add a keyframe at a time (milliseconds) using the default easing
    pub fn at(mut self, time_ms: u32, value: V) -> Self {
        self.points.push(KeyframePoint {
            time_ms,
            value,
            easing: self.default_easing,
        });
        self
    }

    /// Add a keyframe with its own easing
    pub fn at_with_ease(mut self, time_ms: u32, value: V, easing: Easing) -> Self {
        self.points.push(KeyframePoint {
            time_ms,
            value,
            easing,
        });
        self
    }

    /// Set the default easing; also applied to points already added
    pub fn ease(mut self, easing: Easing) -> Self {
        self.default_easing = easing;
        for point in &mut self.points {
            point.easing = easing;
        }
        self
    }

    pub fn loop_count(mut self, count: i32) -> Self {
        self.iterations = count;
        self
    }

    pub fn loop_infinite(mut self) -> Self {
        self.iterations = -1;
        self
    }

    /// Delay before the first iteration starts (milliseconds)
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    pub fn build(mut self) -> KeyframeTrack<V> {
        self.points.sort_by_key(|p| p.time_ms);
        let duration_ms = self.points.iter().map(|p| p.time_ms).max().unwrap_or(0);
        KeyframeTrack {
            points: self.points,
            duration_ms,
            iterations: self.iterations,
            delay_ms: self.delay_ms,
        }
    }
}

/// A sampled keyframe track with looping and delay
#[derive(Clone, Debug)]
pub struct KeyframeTrack<V> {
    points: Vec<KeyframePoint<V>>,
    duration_ms: u32,
    iterations: i32,
    delay_ms: u32,
}

impl<V: Lerp> KeyframeTrack<V> {
    pub fn builder() -> KeyframeTrackBuilder<V> {
        KeyframeTrackBuilder::new()
    }

    /// Duration of one iteration in milliseconds
    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn delay_ms(&self) -> u32 {
        self.delay_ms
    }

    pub fn is_infinite(&self) -> bool {
        self.iterations < 0
    }

    /// Copy of this track with a different start delay.
    pub fn with_delay(&self, delay_ms: u32) -> Self {
        Self {
            delay_ms,
            ..self.clone()
        }
    }

    /// Sample the track `elapsed_ms` after it was started.
    ///
    /// Before the delay the first value is held; after the last iteration the
    /// final value is held.
    ///
    /// # Panics
    ///
    /// Panics if the track has no keyframes.
    pub fn sample(&self, elapsed_ms: f32) -> V {
        let first = self.points.first().expect("keyframe track has no points");
        let local = elapsed_ms - self.delay_ms as f32;
        if local <= 0.0 || self.duration_ms == 0 {
            return first.value;
        }

        let duration = self.duration_ms as f32;
        let iteration = (local / duration).floor();
        if self.iterations >= 0 && iteration >= self.iterations as f32 {
            return self.points[self.points.len() - 1].value;
        }
        let time = local - iteration * duration;
        self.value_at(time)
    }

    fn value_at(&self, time_ms: f32) -> V {
        let mut prev = &self.points[0];
        let mut next = &self.points[0];
        for point in &self.points {
            if point.time_ms as f32 <= time_ms {
                prev = point;
            }
            if point.time_ms as f32 >= time_ms {
                next = point;
                break;
            }
        }

        if prev.time_ms == next.time_ms {
            return prev.value;
        }

        let local = (time_ms - prev.time_ms as f32) / (next.time_ms - prev.time_ms) as f32;
        prev.value.lerp(next.value, next.easing.apply(local))
    }
}
