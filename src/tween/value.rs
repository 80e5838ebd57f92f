//! Interpolable property values.

use std::fmt::Debug;

use glam::Vec3;

use crate::components::color::Color;

/// A value a leaf tween can interpolate and back-solve.
pub trait TweenValue: Copy + Debug + PartialEq + Send + Sync + 'static {
    /// Unclamped linear interpolation.
    fn lerp(a: Self, b: Self, t: f32) -> Self;

    /// Interpolation factor placing `current` between `start` and `end`.
    ///
    /// Solved on a single component: the axis with the largest delta for
    /// vectors, the first channel that changes for colors. `None` when
    /// start and end are equal.
    fn fraction(start: Self, end: Self, current: Self) -> Option<f32>;
}

fn fraction_f32(start: f32, end: f32, current: f32) -> Option<f32> {
    let delta = end - start;
    if delta == 0.0 {
        None
    } else {
        Some((current - start) / delta)
    }
}

impl TweenValue for f32 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }

    fn fraction(start: Self, end: Self, current: Self) -> Option<f32> {
        fraction_f32(start, end, current)
    }
}

impl TweenValue for Vec3 {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        a + (b - a) * t
    }

    fn fraction(start: Self, end: Self, current: Self) -> Option<f32> {
        let delta = (end - start).abs();
        let axis = if delta.x >= delta.y && delta.x >= delta.z {
            0
        } else if delta.y >= delta.z {
            1
        } else {
            2
        };
        fraction_f32(start[axis], end[axis], current[axis])
    }
}

impl TweenValue for Color {
    fn lerp(a: Self, b: Self, t: f32) -> Self {
        Color::new(
            <f32 as TweenValue>::lerp(a.r, b.r, t),
            <f32 as TweenValue>::lerp(a.g, b.g, t),
            <f32 as TweenValue>::lerp(a.b, b.b, t),
            <f32 as TweenValue>::lerp(a.a, b.a, t),
        )
    }

    fn fraction(start: Self, end: Self, current: Self) -> Option<f32> {
        channel_fraction(start, end, current, 4)
    }
}

/// First changing channel among the first `channels` of `r, g, b, a`.
pub(crate) fn channel_fraction(start: Color, end: Color, current: Color, channels: usize) -> Option<f32> {
    let (s, e, c) = (start.to_array(), end.to_array(), current.to_array());
    (0..channels.min(4)).find_map(|i| fraction_f32(s[i], e[i], c[i]))
}
