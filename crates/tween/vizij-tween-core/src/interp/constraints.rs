//! Axis constraints.
//!
//! A constraint names the axes a tween is allowed to write. Masked-out axes are
//! restored from the previous value. For rotations x/y/z are pitch/yaw/roll.

use serde::{Deserialize, Serialize};

use crate::value::Value;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisConstraint {
    #[default]
    None,
    XOnly,
    YOnly,
    ZOnly,
    XyOnly,
    YzOnly,
    XzOnly,
}

impl AxisConstraint {
    /// Writable axes as (x, y, z).
    #[inline]
    pub fn mask(self) -> [bool; 3] {
        match self {
            AxisConstraint::None => [true, true, true],
            AxisConstraint::XOnly => [true, false, false],
            AxisConstraint::YOnly => [false, true, false],
            AxisConstraint::ZOnly => [false, false, true],
            AxisConstraint::XyOnly => [true, true, false],
            AxisConstraint::YzOnly => [false, true, true],
            AxisConstraint::XzOnly => [true, false, true],
        }
    }

    /// Accepts vector (`xOnly`, `xz`) and rotation (`pitchOnly`, `yawRoll`) spellings.
    pub fn parse(name: &str) -> Option<Self> {
        let n: String = name
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        let n = n.strip_suffix("only").unwrap_or(&n);
        let c = match n {
            "" | "none" => AxisConstraint::None,
            "x" | "pitch" => AxisConstraint::XOnly,
            "y" | "yaw" => AxisConstraint::YOnly,
            "z" | "roll" => AxisConstraint::ZOnly,
            "xy" | "pitchyaw" => AxisConstraint::XyOnly,
            "yz" | "yawroll" => AxisConstraint::YzOnly,
            "xz" | "pitchroll" => AxisConstraint::XzOnly,
            _ => return None,
        };
        Some(c)
    }
}

impl From<&str> for AxisConstraint {
    fn from(s: &str) -> Self {
        Self::parse(s).unwrap_or_else(|| {
            log::warn!("unknown axis constraint '{s}', writing all axes");
            AxisConstraint::None
        })
    }
}

#[inline]
fn pick<const N: usize>(new: [f32; N], prev: [f32; N], mask: [bool; 3]) -> [f32; N] {
    let mut out = new;
    for i in 0..N.min(3) {
        if !mask[i] {
            out[i] = prev[i];
        }
    }
    out
}

/// Substitute masked-out components of `value` with those of `previous`.
/// Floats and colors pass through; a kind mismatch returns `value` untouched.
pub fn apply_constraint(value: Value, previous: &Value, constraint: AxisConstraint) -> Value {
    if constraint == AxisConstraint::None {
        return value;
    }
    let mask = constraint.mask();
    match (value, previous) {
        (Value::Vec2(v), Value::Vec2(p)) => Value::Vec2(pick(v, *p, mask)),
        (Value::Vec3(v), Value::Vec3(p)) => Value::Vec3(pick(v, *p, mask)),
        (Value::Rotation(v), Value::Rotation(p)) => Value::Rotation(pick(v, *p, mask)),
        _ => value,
    }
}
