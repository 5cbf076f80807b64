//! Per-frame followers.
//!
//! A [`Follow`] has no lifecycle. Each call to [`Follow::step`] reads the
//! target's current value, closes `dt * speed` of the gap to the goal with
//! [`interp_to`], applies the axis constraint and writes the result. Location
//! followers then turn the target like a moving tween does. Callers step a
//! follower every frame for as long as it should chase its goal.

use serde::{Deserialize, Serialize};

use crate::binding::{CoordinateSpace, TargetProperty, TweenHost, TweenTarget};
use crate::error::TweenError;
use crate::event::orient;
use crate::ids::TargetId;
use crate::interp::{apply_constraint, interp_to, AxisConstraint};
use crate::request::Orientation;
use crate::value::Value;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Follow {
    pub target: TweenTarget,
    pub property: TargetProperty,
    pub goal: Value,
    /// Fraction of the remaining gap closed per second. 0 or less snaps.
    pub speed: f32,
    /// `Parent` expresses the goal in the parent's space. `Relative` is
    /// treated as `Parent`.
    pub space: CoordinateSpace,
    pub constraint: AxisConstraint,
    /// Only used by location followers.
    pub orientation: Orientation,
}

impl Follow {
    fn bound(target: TweenTarget, property: TargetProperty, goal: Value, speed: f32) -> Self {
        Self {
            target,
            property,
            goal,
            speed,
            space: CoordinateSpace::World,
            constraint: AxisConstraint::None,
            orientation: Orientation::default(),
        }
    }

    pub fn actor_move(actor: TargetId, to: [f32; 3], speed: f32) -> Self {
        let target = TweenTarget::Actor(actor);
        Self::bound(target, TargetProperty::Location, Value::Vec3(to), speed)
    }

    pub fn actor_rotate(actor: TargetId, to: [f32; 3], speed: f32) -> Self {
        let target = TweenTarget::Actor(actor);
        Self::bound(target, TargetProperty::Rotation, Value::Rotation(to), speed)
    }

    pub fn actor_scale(actor: TargetId, to: [f32; 3], speed: f32) -> Self {
        let target = TweenTarget::Actor(actor);
        Self::bound(target, TargetProperty::Scale, Value::Vec3(to), speed)
    }

    pub fn component_move(component: TargetId, to: [f32; 3], speed: f32) -> Self {
        let target = TweenTarget::Component(component);
        Self::bound(target, TargetProperty::Location, Value::Vec3(to), speed)
    }

    pub fn component_rotate(component: TargetId, to: [f32; 3], speed: f32) -> Self {
        let target = TweenTarget::Component(component);
        Self::bound(target, TargetProperty::Rotation, Value::Rotation(to), speed)
    }

    pub fn component_scale(component: TargetId, to: [f32; 3], speed: f32) -> Self {
        let target = TweenTarget::Component(component);
        Self::bound(target, TargetProperty::Scale, Value::Vec3(to), speed)
    }

    pub fn widget_move(widget: TargetId, to: [f32; 2], speed: f32) -> Self {
        let target = TweenTarget::Widget(widget);
        Self::bound(target, TargetProperty::WidgetTranslation, Value::Vec2(to), speed)
    }

    pub fn widget_rotate(widget: TargetId, to_angle: f32, speed: f32) -> Self {
        let target = TweenTarget::Widget(widget);
        Self::bound(target, TargetProperty::WidgetAngle, Value::Float(to_angle), speed)
    }

    pub fn widget_scale(widget: TargetId, to: [f32; 2], speed: f32) -> Self {
        let target = TweenTarget::Widget(widget);
        Self::bound(target, TargetProperty::WidgetScale, Value::Vec2(to), speed)
    }

    pub fn widget_shear(widget: TargetId, to: [f32; 2], speed: f32) -> Self {
        let target = TweenTarget::Widget(widget);
        Self::bound(target, TargetProperty::WidgetShear, Value::Vec2(to), speed)
    }

    pub fn constrained(mut self, constraint: AxisConstraint) -> Self {
        self.constraint = constraint;
        self
    }

    pub fn in_space(mut self, space: CoordinateSpace) -> Self {
        self.space = space;
        self
    }

    pub fn oriented(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Checks that the follower names a target that can carry its property.
    pub fn validate(&self) -> Result<TargetId, TweenError> {
        let property = self.property;
        if property == TargetProperty::Data || property.is_spline() {
            return Err(TweenError::NotFollowable { property });
        }
        let id = self
            .target
            .id()
            .ok_or(TweenError::MissingTarget { property })?;
        if !property.accepts(&self.target) {
            return Err(TweenError::TargetKindMismatch {
                property,
                target_kind: self.target.kind_name(),
            });
        }
        match property.value_kind() {
            Some(expected) if expected != self.goal.kind() => Err(TweenError::ValueKindMismatch {
                property,
                expected,
                actual: self.goal.kind(),
            }),
            _ => Ok(id),
        }
    }

    /// Move the target one frame toward the goal and return the written value.
    pub fn step(&self, dt: f32, host: &mut dyn TweenHost) -> Result<Value, TweenError> {
        let id = self.validate()?;
        let unavailable = TweenError::TargetUnavailable { target: id };
        if !host.is_valid(id) {
            return Err(unavailable);
        }
        let space = self.space.host_space();
        let current = host
            .current_value(self.target, self.property, space)
            .ok_or(unavailable)?;
        let next = interp_to(&current, &self.goal, dt, self.speed);
        let next = apply_constraint(next, &current, self.constraint);
        host.write(self.target, self.property, space, next);
        if self.property.moves_target() {
            orient(
                &self.orientation,
                self.target,
                space,
                Some(current),
                next,
                dt,
                host,
            );
        }
        Ok(next)
    }
}
