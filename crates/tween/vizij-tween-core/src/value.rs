//! Value kinds a tween can interpolate.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Float,
    Vec2,
    Vec3,
    Rotation,
    Color,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// Scalar float
    Float(f32),

    /// 2D vector
    Vec2([f32; 2]),

    /// 3D vector
    Vec3([f32; 3]),

    /// Euler rotation in degrees: (pitch, yaw, roll)
    Rotation([f32; 3]),

    /// Linear RGBA color
    Color([f32; 4]),
}

impl Value {
    /// Return the coarse kind of this value.
    #[inline]
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Float(_) => ValueKind::Float,
            Value::Vec2(_) => ValueKind::Vec2,
            Value::Vec3(_) => ValueKind::Vec3,
            Value::Rotation(_) => ValueKind::Rotation,
            Value::Color(_) => ValueKind::Color,
        }
    }

    /// Zero value of the given kind (identity for [`Value::add`]).
    pub fn zero(kind: ValueKind) -> Self {
        match kind {
            ValueKind::Float => Value::Float(0.0),
            ValueKind::Vec2 => Value::Vec2([0.0; 2]),
            ValueKind::Vec3 => Value::Vec3([0.0; 3]),
            ValueKind::Rotation => Value::Rotation([0.0; 3]),
            ValueKind::Color => Value::Color([0.0; 4]),
        }
    }

    pub fn components(&self) -> &[f32] {
        match self {
            Value::Float(v) => std::slice::from_ref(v),
            Value::Vec2(v) => &v[..],
            Value::Vec3(v) | Value::Rotation(v) => &v[..],
            Value::Color(v) => &v[..],
        }
    }

    /// Euclidean distance between two values of the same kind.
    /// Returns `None` on kind mismatch.
    pub fn distance(&self, other: &Value) -> Option<f32> {
        if self.kind() != other.kind() {
            return None;
        }
        let sum: f32 = self
            .components()
            .iter()
            .zip(other.components())
            .map(|(a, b)| (b - a) * (b - a))
            .sum();
        Some(sum.sqrt())
    }

    /// Component-wise sum; on kind mismatch the left value is returned (fail-soft).
    pub fn add(&self, other: &Value) -> Value {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) => Value::Float(a + b),
            (Value::Vec2(a), Value::Vec2(b)) => Value::Vec2([a[0] + b[0], a[1] + b[1]]),
            (Value::Vec3(a), Value::Vec3(b)) => {
                Value::Vec3([a[0] + b[0], a[1] + b[1], a[2] + b[2]])
            }
            (Value::Rotation(a), Value::Rotation(b)) => {
                Value::Rotation([a[0] + b[0], a[1] + b[1], a[2] + b[2]])
            }
            (Value::Color(a), Value::Color(b)) => {
                Value::Color([a[0] + b[0], a[1] + b[1], a[2] + b[2], a[3] + b[3]])
            }
            _ => *self,
        }
    }

    /// Convenience constructors
    pub fn f(v: f32) -> Self {
        Value::Float(v)
    }

    pub fn vec2(x: f32, y: f32) -> Self {
        Value::Vec2([x, y])
    }

    pub fn vec3(x: f32, y: f32, z: f32) -> Self {
        Value::Vec3([x, y, z])
    }

    pub fn rotation(pitch: f32, yaw: f32, roll: f32) -> Self {
        Value::Rotation([pitch, yaw, roll])
    }

    pub fn color(r: f32, g: f32, b: f32, a: f32) -> Self {
        Value::Color([r, g, b, a])
    }

    pub fn as_float(&self) -> Option<f32> {
        match self {
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_vec3(&self) -> Option<[f32; 3]> {
        match self {
            Value::Vec3(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_rotation(&self) -> Option<[f32; 3]> {
        match self {
            Value::Rotation(v) => Some(*v),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_requires_matching_kinds() {
        let a = Value::vec3(0.0, 0.0, 0.0);
        let b = Value::vec3(3.0, 4.0, 0.0);
        assert_eq!(a.distance(&b), Some(5.0));
        assert_eq!(a.distance(&Value::f(1.0)), None);
    }

    #[test]
    fn add_is_component_wise() {
        let a = Value::color(0.1, 0.2, 0.3, 0.4);
        let b = Value::color(0.1, 0.1, 0.1, 0.1);
        match a.add(&b) {
            Value::Color(c) => assert!((c[3] - 0.5).abs() < 1e-6),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(Value::f(1.0).add(&Value::vec2(1.0, 1.0)), Value::f(1.0));
    }
}
