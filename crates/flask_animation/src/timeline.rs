//! Timelines: ordered keyframe states blended through eased progress
//!
//! A [`Timeline`] holds a fixed list of scene keyframes. Any two of them can be
//! blended at a progress value; the timeline applies its easing curve and hands
//! the eased value to the keyframe type's [`Blend`] implementation.

use crate::easing::Easing;

/// A keyframe type that can produce a render state, directly or blended.
pub trait Blend {
    /// The continuous state handed to a renderer
    type Output;

    /// Render state of this keyframe on its own
    fn snapshot(&self) -> Self::Output;

    /// Blend two keyframes at an already-eased `t`
    fn blend(from: &Self, to: &Self, t: f32) -> Self::Output;
}

/// An ordered, immutable list of keyframes with an easing curve.
#[derive(Clone, Debug)]
pub struct Timeline<K> {
    keyframes: Vec<K>,
    easing: Easing,
}

impl<K: Blend> Timeline<K> {
    /// Create a timeline.
    ///
    /// # Panics
    ///
    /// Panics if `keyframes` is empty.
    pub fn new(keyframes: Vec<K>, easing: Easing) -> Self {
        assert!(!keyframes.is_empty(), "timeline needs at least one keyframe");
        Self { keyframes, easing }
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    /// Always false; a timeline cannot be built empty.
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.keyframes.len() - 1
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.keyframes.len()
    }

    pub fn easing(&self) -> Easing {
        self.easing
    }

    pub fn get(&self, index: usize) -> Option<&K> {
        self.keyframes.get(index)
    }

    pub fn keyframes(&self) -> &[K] {
        &self.keyframes
    }

    /// Render state of a single keyframe.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn snapshot(&self, index: usize) -> K::Output {
        self.keyframes[index].snapshot()
    }

    /// Blend keyframe `from` into keyframe `to` at `progress`.
    ///
    /// `progress` must already be clamped to `[0, 1]`. Sampling a keyframe
    /// against itself returns its snapshot regardless of progress.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn sample(&self, from: usize, to: usize, progress: f32) -> K::Output {
        if from == to {
            return self.snapshot(from);
        }
        let eased = self.easing.apply(progress);
        K::blend(&self.keyframes[from], &self.keyframes[to], eased)
    }
}
