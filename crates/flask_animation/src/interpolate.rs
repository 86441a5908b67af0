//! Linear interpolation helpers

/// Linear interpolation: `a + (b - a) * t`.
///
/// `t` is not clamped.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Values that can be linearly interpolated by keyframe tracks.
pub trait Lerp: Copy {
    fn lerp(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(self, other: Self, t: f32) -> Self {
        lerp(self, other, t)
    }
}

/// 2D offsets `[x, y]`
impl Lerp for [f32; 2] {
    fn lerp(self, other: Self, t: f32) -> Self {
        [lerp(self[0], other[0], t), lerp(self[1], other[1], t)]
    }
}
