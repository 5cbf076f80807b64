//! Target binding and host collaborator traits.
//!
//! The core never owns the objects it animates. It names them with a
//! [`TweenTarget`], says which [`TargetProperty`] to write, and goes through the
//! host traits below to read, write and validate. Adapters (Bevy, tests)
//! implement the traits and pass themselves into `TweenEngine::update()`.

use serde::{Deserialize, Serialize};

use crate::callback::CallbackInvoker;
use crate::ids::TargetId;
use crate::value::{Value, ValueKind};

/// What a tween is bound to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TweenTarget {
    /// Scene object driven through its root transform.
    Actor(TargetId),
    /// Sub-object transform (attached to an actor).
    Component(TargetId),
    /// UI element driven through its render transform.
    Widget(TargetId),
    /// Data-only tween: values are reported through callbacks and outputs.
    #[default]
    None,
}

impl TweenTarget {
    #[inline]
    pub fn id(&self) -> Option<TargetId> {
        match self {
            TweenTarget::Actor(id) | TweenTarget::Component(id) | TweenTarget::Widget(id) => {
                Some(*id)
            }
            TweenTarget::None => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            TweenTarget::Actor(_) => "actor",
            TweenTarget::Component(_) => "component",
            TweenTarget::Widget(_) => "widget",
            TweenTarget::None => "none",
        }
    }
}

/// Which property of the target a tween writes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetProperty {
    Location,
    Rotation,
    Scale,
    WidgetTranslation,
    WidgetAngle,
    WidgetScale,
    WidgetShear,
    /// Location sampled from a spline at the tweened distance.
    SplineLocation,
    /// Rotation sampled from a spline at the tweened distance.
    SplineRotation,
    /// No write; value goes to update callbacks only.
    #[default]
    Data,
}

impl TargetProperty {
    /// Kind of the tweened quantity, `None` when any kind is accepted.
    /// Spline properties tween a distance along the path.
    pub fn value_kind(self) -> Option<ValueKind> {
        match self {
            TargetProperty::Location | TargetProperty::Scale => Some(ValueKind::Vec3),
            TargetProperty::Rotation => Some(ValueKind::Rotation),
            TargetProperty::WidgetTranslation
            | TargetProperty::WidgetScale
            | TargetProperty::WidgetShear => Some(ValueKind::Vec2),
            TargetProperty::WidgetAngle => Some(ValueKind::Float),
            TargetProperty::SplineLocation | TargetProperty::SplineRotation => {
                Some(ValueKind::Float)
            }
            TargetProperty::Data => None,
        }
    }

    #[inline]
    pub fn is_widget(self) -> bool {
        matches!(
            self,
            TargetProperty::WidgetTranslation
                | TargetProperty::WidgetAngle
                | TargetProperty::WidgetScale
                | TargetProperty::WidgetShear
        )
    }

    #[inline]
    pub fn is_spline(self) -> bool {
        matches!(
            self,
            TargetProperty::SplineLocation | TargetProperty::SplineRotation
        )
    }

    /// Properties after which orientation-while-moving is applied.
    #[inline]
    pub fn moves_target(self) -> bool {
        matches!(
            self,
            TargetProperty::Location | TargetProperty::SplineLocation
        )
    }

    /// Whether `target` can carry this property.
    pub fn accepts(self, target: &TweenTarget) -> bool {
        match (self, target) {
            (TargetProperty::Data, _) => true,
            (_, TweenTarget::None) => false,
            (p, TweenTarget::Widget(_)) => p.is_widget(),
            (p, _) => !p.is_widget(),
        }
    }
}

/// Space in which location/rotation values are expressed.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CoordinateSpace {
    #[default]
    World,
    Parent,
    /// Tweened values are offsets added to the target's value when the tween starts.
    Relative,
}

impl CoordinateSpace {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "world" | "worldspace" => Some(CoordinateSpace::World),
            "parent" | "parentspace" | "local" => Some(CoordinateSpace::Parent),
            "relative" | "self" | "relativespace" => Some(CoordinateSpace::Relative),
            _ => None,
        }
    }

    /// Space forwarded to the host; relative offsets are resolved in the core.
    #[inline]
    pub fn host_space(self) -> CoordinateSpace {
        match self {
            CoordinateSpace::Relative => CoordinateSpace::Parent,
            other => other,
        }
    }
}

/// One spline evaluation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SplineSample {
    pub location: [f32; 3],
    /// Euler degrees (pitch, yaw, roll).
    pub rotation: [f32; 3],
}

/// Host object directory: validity, names, visibility and time context.
pub trait TargetDirectory {
    fn is_valid(&self, target: TargetId) -> bool;

    fn display_name(&self, target: TargetId) -> Option<String>;

    /// Whether the target was rendered recently. Used for culling.
    fn is_rendered(&self, _target: TargetId) -> bool {
        true
    }

    /// Whether the host context (game, world) is paused.
    fn is_paused(&self) -> bool {
        false
    }

    /// Global time dilation factor.
    fn time_dilation(&self) -> f32 {
        1.0
    }

    /// World location of an arbitrary object, used as an orientation target.
    fn location_of(&self, target: TargetId) -> Option<[f32; 3]>;
}

/// Target binding adapter: reads and writes properties.
pub trait TargetWriter {
    fn current_value(
        &self,
        target: TweenTarget,
        property: TargetProperty,
        space: CoordinateSpace,
    ) -> Option<Value>;

    fn write(
        &mut self,
        target: TweenTarget,
        property: TargetProperty,
        space: CoordinateSpace,
        value: Value,
    );

    /// Euler rotation (pitch, yaw, roll) that faces from `eye` toward `at`.
    /// Default convention is Z-up with X forward.
    fn look_rotation(&self, eye: [f32; 3], at: [f32; 3]) -> Option<[f32; 3]> {
        let d = [at[0] - eye[0], at[1] - eye[1], at[2] - eye[2]];
        let planar = (d[0] * d[0] + d[1] * d[1]).sqrt();
        if planar <= f32::EPSILON && d[2].abs() <= f32::EPSILON {
            return None;
        }
        let yaw = d[1].atan2(d[0]).to_degrees();
        let pitch = d[2].atan2(planar).to_degrees();
        Some([pitch, yaw, 0.0])
    }
}

/// Spline evaluation for path tweens.
pub trait SplineEvaluator {
    fn spline_length(&self, spline: TargetId) -> Option<f32>;

    /// Distance along the spline of control point `point`.
    fn distance_at_point(&self, spline: TargetId, point: usize) -> Option<f32>;

    fn evaluate_at_distance(
        &self,
        spline: TargetId,
        distance: f32,
        space: CoordinateSpace,
    ) -> Option<SplineSample>;

    /// Called when a finished tween asked for its spline to be destroyed.
    fn release_spline(&mut self, _spline: TargetId) {}
}

/// Everything the engine needs from a host during `update()`.
pub trait TweenHost: TargetDirectory + TargetWriter + SplineEvaluator + CallbackInvoker {}

impl<T> TweenHost for T where T: TargetDirectory + TargetWriter + SplineEvaluator + CallbackInvoker {}

/// Host with no objects. Enough for data-only tweens.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullHost;

impl TargetDirectory for NullHost {
    fn is_valid(&self, _target: TargetId) -> bool {
        false
    }

    fn display_name(&self, _target: TargetId) -> Option<String> {
        None
    }

    fn location_of(&self, _target: TargetId) -> Option<[f32; 3]> {
        None
    }
}

impl TargetWriter for NullHost {
    fn current_value(
        &self,
        _target: TweenTarget,
        _property: TargetProperty,
        _space: CoordinateSpace,
    ) -> Option<Value> {
        None
    }

    fn write(
        &mut self,
        _target: TweenTarget,
        _property: TargetProperty,
        _space: CoordinateSpace,
        _value: Value,
    ) {
    }
}

impl SplineEvaluator for NullHost {
    fn spline_length(&self, _spline: TargetId) -> Option<f32> {
        None
    }

    fn distance_at_point(&self, _spline: TargetId, _point: usize) -> Option<f32> {
        None
    }

    fn evaluate_at_distance(
        &self,
        _spline: TargetId,
        _distance: f32,
        _space: CoordinateSpace,
    ) -> Option<SplineSample> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widget_properties_need_widget_targets() {
        let actor = TweenTarget::Actor(TargetId(1));
        let widget = TweenTarget::Widget(TargetId(2));
        assert!(TargetProperty::WidgetShear.accepts(&widget));
        assert!(!TargetProperty::WidgetShear.accepts(&actor));
        assert!(!TargetProperty::Location.accepts(&widget));
        assert!(TargetProperty::Data.accepts(&TweenTarget::None));
        assert!(!TargetProperty::Scale.accepts(&TweenTarget::None));
    }

    #[test]
    fn default_look_rotation_is_z_up() {
        let rot = NullHost
            .look_rotation([0.0, 0.0, 0.0], [0.0, 10.0, 0.0])
            .unwrap();
        assert!((rot[1] - 90.0).abs() < 1e-4);
        assert!(rot[0].abs() < 1e-4);
        assert!(NullHost.look_rotation([1.0; 3], [1.0; 3]).is_none());
    }
}
