//! Interpolation helpers:
//! - lerp_* (component-wise affine blend)
//! - lerp_rotation (Euler degrees, optional shortest path per axis)
//! - interpolate (dispatch across Value kinds, fail-soft on mismatch)
//! - travel_distance (length of the path `interpolate` takes)
//! - interp_to (frame-rate driven approach toward a goal)

use crate::value::Value;

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[inline]
pub fn lerp_vec2(a: [f32; 2], b: [f32; 2], t: f32) -> [f32; 2] {
    [lerp_f32(a[0], b[0], t), lerp_f32(a[1], b[1], t)]
}

#[inline]
pub fn lerp_vec3(a: [f32; 3], b: [f32; 3], t: f32) -> [f32; 3] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
    ]
}

#[inline]
pub fn lerp_vec4(a: [f32; 4], b: [f32; 4], t: f32) -> [f32; 4] {
    [
        lerp_f32(a[0], b[0], t),
        lerp_f32(a[1], b[1], t),
        lerp_f32(a[2], b[2], t),
        lerp_f32(a[3], b[3], t),
    ]
}

/// Wrap an angle difference in degrees into (-180, 180].
#[inline]
pub fn normalize_axis(degrees: f32) -> f32 {
    let a = degrees % 360.0;
    if a > 180.0 {
        a - 360.0
    } else if a <= -180.0 {
        a + 360.0
    } else {
        a
    }
}

/// Euler rotation blend. With `shortest_path` each axis travels the wrapped
/// difference, so 350 -> 10 turns +20 instead of -340.
#[inline]
pub fn lerp_rotation(a: [f32; 3], b: [f32; 3], t: f32, shortest_path: bool) -> [f32; 3] {
    if !shortest_path {
        return lerp_vec3(a, b, t);
    }
    let mut out = a;
    for i in 0..3 {
        out[i] = a[i] + normalize_axis(b[i] - a[i]) * t;
    }
    out
}

/// Interpolate `from -> to` at eased progress `t`.
/// On kind mismatch the left value is returned (fail-soft).
pub fn interpolate(from: &Value, to: &Value, t: f32, shortest_path: bool) -> Value {
    match (from, to) {
        (Value::Float(a), Value::Float(b)) => Value::Float(lerp_f32(*a, *b, t)),
        (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2(lerp_vec2(*a, *b, t)),
        (Value::Vec3(a), Value::Vec3(b)) => Value::Vec3(lerp_vec3(*a, *b, t)),
        (Value::Rotation(a), Value::Rotation(b)) => {
            Value::Rotation(lerp_rotation(*a, *b, t, shortest_path))
        }
        (Value::Color(a), Value::Color(b)) => Value::Color(lerp_vec4(*a, *b, t)),
        _ => *from,
    }
}

/// Squared gap below which `interp_to` snaps to the goal.
const SNAP_DISTANCE_SQ: f32 = 1e-4;

/// Close `dt * speed` of the remaining gap between `current` and `goal`
/// (clamped to the whole gap), snapping once the gap is negligible. A
/// non-positive speed jumps straight to `goal`. Rotations travel the shortest
/// path and come back with each axis in (-180, 180]. On kind mismatch
/// `current` is returned.
pub fn interp_to(current: &Value, goal: &Value, dt: f32, speed: f32) -> Value {
    if current.kind() != goal.kind() {
        return *current;
    }
    if speed <= 0.0 {
        return *goal;
    }
    let alpha = (dt * speed).clamp(0.0, 1.0);
    match (current, goal) {
        (Value::Rotation(a), Value::Rotation(b)) => {
            let gap = [0, 1, 2].map(|i| normalize_axis(b[i] - a[i]));
            if gap.iter().map(|d| d * d).sum::<f32>() < SNAP_DISTANCE_SQ {
                return *goal;
            }
            Value::Rotation([0, 1, 2].map(|i| normalize_axis(a[i] + gap[i] * alpha)))
        }
        _ => match current.distance(goal) {
            Some(d) if d * d >= SNAP_DISTANCE_SQ => interpolate(current, goal, alpha, false),
            _ => *goal,
        },
    }
}

/// Distance covered going `from -> to` the way [`interpolate`] goes: rotations
/// with `shortest_path` measure the wrapped per-axis differences.
/// `None` on kind mismatch.
pub fn travel_distance(from: &Value, to: &Value, shortest_path: bool) -> Option<f32> {
    match (from, to) {
        (Value::Rotation(a), Value::Rotation(b)) if shortest_path => {
            let sum: f32 = (0..3).map(|i| normalize_axis(b[i] - a[i]).powi(2)).sum();
            Some(sum.sqrt())
        }
        _ => from.distance(to),
    }
}
