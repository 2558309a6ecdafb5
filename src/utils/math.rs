//! Small 2D math helpers layered on top of `glam`.

use glam::Vec2;

/// Unit vector pointing from `a` to `b`, or `None` when the points are too
/// close to define a direction.
pub fn direction_between(a: Vec2, b: Vec2) -> Option<Vec2> {
    let delta = b - a;
    let len = delta.length();
    if len < 1e-6 {
        return None;
    }
    Some(delta / len)
}

/// Linear interpolation between two scalars.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps a scalar to the unit interval.
pub fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}
