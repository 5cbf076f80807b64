//! `TweenHost` over a Bevy `World`.
//!
//! Targets are entities encoded with `Entity::to_bits()`. Actor and component
//! targets drive `Transform`; widget targets drive `WidgetRenderTransform`.
//! Rotations cross the boundary as Euler degrees `[pitch, yaw, roll]` applied
//! in YXZ order (Y-up). [`WorldDirectory`] is the read-only half, used for
//! lookups by name outside an update.

use bevy::prelude::*;
use vizij_tween_core::{
    CallbackArgs, CallbackError, CallbackInvoker, CallbackTable, CoordinateSpace,
    SplineEvaluator, SplineSample, TargetDirectory, TargetId, TargetProperty, TargetWriter,
    TweenTarget, Value,
};

use crate::components::{SplinePath, TweenVisibility, WidgetRenderTransform};

#[inline]
pub fn target_of(entity: Entity) -> TargetId {
    TargetId(entity.to_bits())
}

#[inline]
pub fn entity_of(target: TargetId) -> Option<Entity> {
    Entity::try_from_bits(target.0).ok()
}

pub fn euler_degrees(rotation: Quat) -> [f32; 3] {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    [pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees()]
}

pub fn quat_from_degrees(euler: [f32; 3]) -> Quat {
    let [pitch, yaw, roll] = euler;
    Quat::from_euler(
        EulerRot::YXZ,
        yaw.to_radians(),
        pitch.to_radians(),
        roll.to_radians(),
    )
}

/// Read-only directory over a world: validity, names, visibility, clocks.
/// Enough for lookups and bulk operations outside an update.
#[derive(Clone, Copy)]
pub struct WorldDirectory<'w> {
    world: &'w World,
}

impl<'w> WorldDirectory<'w> {
    pub fn new(world: &'w World) -> Self {
        Self { world }
    }

    fn entity(&self, target: TargetId) -> Option<Entity> {
        entity_of(target).filter(|e| self.world.get_entity(*e).is_some())
    }

    fn parent_global(&self, entity: Entity) -> Option<GlobalTransform> {
        let parent = self.world.get::<Parent>(entity)?;
        self.world.get::<GlobalTransform>(parent.get()).copied()
    }

    fn location(&self, entity: Entity, space: CoordinateSpace) -> Option<Vec3> {
        let local = self.world.get::<Transform>(entity)?.translation;
        Some(match (space, self.parent_global(entity)) {
            (CoordinateSpace::World, Some(parent)) => parent.transform_point(local),
            _ => local,
        })
    }
}

impl TargetDirectory for WorldDirectory<'_> {
    fn is_valid(&self, target: TargetId) -> bool {
        self.entity(target).is_some()
    }

    fn display_name(&self, target: TargetId) -> Option<String> {
        let name = self.world.get::<Name>(self.entity(target)?)?;
        Some(name.as_str().to_string())
    }

    fn is_rendered(&self, target: TargetId) -> bool {
        self.entity(target)
            .and_then(|e| self.world.get::<TweenVisibility>(e))
            .map_or(true, |v| v.rendered)
    }

    fn is_paused(&self) -> bool {
        self.world
            .get_resource::<Time<Virtual>>()
            .is_some_and(|t| t.is_paused())
    }

    fn time_dilation(&self) -> f32 {
        self.world
            .get_resource::<Time<Virtual>>()
            .map_or(1.0, |t| t.relative_speed())
    }

    fn location_of(&self, target: TargetId) -> Option<[f32; 3]> {
        let e = self.entity(target)?;
        if let Some(global) = self.world.get::<GlobalTransform>(e) {
            return Some(global.translation().to_array());
        }
        self.location(e, CoordinateSpace::World).map(|v| v.to_array())
    }
}

/// Borrowed view of a world for one engine update. The callback table is held
/// outside the world while the host is alive.
pub struct WorldHost<'w> {
    world: &'w mut World,
    callbacks: &'w CallbackTable<World>,
}

impl<'w> WorldHost<'w> {
    pub fn new(world: &'w mut World, callbacks: &'w CallbackTable<World>) -> Self {
        Self { world, callbacks }
    }

    fn directory(&self) -> WorldDirectory<'_> {
        WorldDirectory::new(&*self.world)
    }

    fn entity(&self, target: TargetId) -> Option<Entity> {
        self.directory().entity(target)
    }

    fn set_location(&mut self, entity: Entity, space: CoordinateSpace, at: Vec3) {
        let local = match (space, self.directory().parent_global(entity)) {
            (CoordinateSpace::World, Some(parent)) => {
                parent.affine().inverse().transform_point3(at)
            }
            _ => at,
        };
        if let Some(mut tf) = self.world.get_mut::<Transform>(entity) {
            tf.translation = local;
        }
    }

    fn widget_value(&self, entity: Entity, property: TargetProperty) -> Option<Value> {
        let w = self.world.get::<WidgetRenderTransform>(entity)?;
        Some(match property {
            TargetProperty::WidgetTranslation => Value::Vec2(w.translation.to_array()),
            TargetProperty::WidgetAngle => Value::Float(w.angle),
            TargetProperty::WidgetScale => Value::Vec2(w.scale.to_array()),
            TargetProperty::WidgetShear => Value::Vec2(w.shear.to_array()),
            _ => return None,
        })
    }

    fn write_widget(&mut self, entity: Entity, property: TargetProperty, value: Value) {
        let Some(mut w) = self.world.get_mut::<WidgetRenderTransform>(entity) else {
            return;
        };
        match (property, value) {
            (TargetProperty::WidgetTranslation, Value::Vec2(v)) => w.translation = Vec2::from(v),
            (TargetProperty::WidgetAngle, Value::Float(a)) => w.angle = a,
            (TargetProperty::WidgetScale, Value::Vec2(v)) => w.scale = Vec2::from(v),
            (TargetProperty::WidgetShear, Value::Vec2(v)) => w.shear = Vec2::from(v),
            _ => {}
        }
    }

    fn spline(&self, spline: TargetId) -> Option<&SplinePath> {
        self.world.get::<SplinePath>(self.entity(spline)?)
    }
}

impl TargetDirectory for WorldHost<'_> {
    fn is_valid(&self, target: TargetId) -> bool {
        self.directory().is_valid(target)
    }

    fn display_name(&self, target: TargetId) -> Option<String> {
        self.directory().display_name(target)
    }

    fn is_rendered(&self, target: TargetId) -> bool {
        self.directory().is_rendered(target)
    }

    fn is_paused(&self) -> bool {
        self.directory().is_paused()
    }

    fn time_dilation(&self) -> f32 {
        self.directory().time_dilation()
    }

    fn location_of(&self, target: TargetId) -> Option<[f32; 3]> {
        self.directory().location_of(target)
    }
}

impl TargetWriter for WorldHost<'_> {
    fn current_value(
        &self,
        target: TweenTarget,
        property: TargetProperty,
        space: CoordinateSpace,
    ) -> Option<Value> {
        let e = self.entity(target.id()?)?;
        if property.is_widget() {
            return self.widget_value(e, property);
        }
        match property {
            TargetProperty::Location | TargetProperty::SplineLocation => self
                .directory()
                .location(e, space)
                .map(|p| Value::Vec3(p.to_array())),
            TargetProperty::Rotation | TargetProperty::SplineRotation => {
                let tf = self.world.get::<Transform>(e)?;
                Some(Value::Rotation(euler_degrees(tf.rotation)))
            }
            TargetProperty::Scale => {
                let tf = self.world.get::<Transform>(e)?;
                Some(Value::Vec3(tf.scale.to_array()))
            }
            _ => None,
        }
    }

    fn write(
        &mut self,
        target: TweenTarget,
        property: TargetProperty,
        space: CoordinateSpace,
        value: Value,
    ) {
        let Some(e) = target.id().and_then(|id| self.entity(id)) else {
            return;
        };
        if property.is_widget() {
            self.write_widget(e, property, value);
            return;
        }
        match (property, value) {
            (TargetProperty::Location | TargetProperty::SplineLocation, Value::Vec3(p)) => {
                self.set_location(e, space, Vec3::from(p));
            }
            (TargetProperty::Rotation | TargetProperty::SplineRotation, Value::Rotation(r)) => {
                if let Some(mut tf) = self.world.get_mut::<Transform>(e) {
                    tf.rotation = quat_from_degrees(r);
                }
            }
            (TargetProperty::Scale, Value::Vec3(s)) => {
                if let Some(mut tf) = self.world.get_mut::<Transform>(e) {
                    tf.scale = Vec3::from(s);
                }
            }
            (property, value) => {
                log::debug!("ignoring {:?} write of {:?} to {e:?}", property, value.kind());
            }
        }
    }

    /// Y-up, looking down -Z (Bevy's convention).
    fn look_rotation(&self, eye: [f32; 3], at: [f32; 3]) -> Option<[f32; 3]> {
        let d = Vec3::from(at) - Vec3::from(eye);
        if d.length_squared() <= f32::EPSILON {
            return None;
        }
        let yaw = (-d.x).atan2(-d.z).to_degrees();
        let pitch = d.y.atan2(d.x.hypot(d.z)).to_degrees();
        Some([pitch, yaw, 0.0])
    }
}

impl SplineEvaluator for WorldHost<'_> {
    fn spline_length(&self, spline: TargetId) -> Option<f32> {
        self.spline(spline).map(SplinePath::length)
    }

    fn distance_at_point(&self, spline: TargetId, point: usize) -> Option<f32> {
        self.spline(spline)?.distance_at_point(point)
    }

    fn evaluate_at_distance(
        &self,
        spline: TargetId,
        distance: f32,
        space: CoordinateSpace,
    ) -> Option<SplineSample> {
        let (mut location, mut dir) = self.spline(spline)?.sample(distance)?;
        if space == CoordinateSpace::World {
            if let Some(global) = self
                .entity(spline)
                .and_then(|e| self.world.get::<GlobalTransform>(e))
            {
                location = global.transform_point(location);
                dir = global.affine().transform_vector3(dir);
            }
        }
        let rotation = self
            .look_rotation([0.0; 3], dir.to_array())
            .unwrap_or([0.0; 3]);
        Some(SplineSample {
            location: location.to_array(),
            rotation,
        })
    }

    fn release_spline(&mut self, spline: TargetId) {
        if let Some(e) = self.entity(spline) {
            self.world.despawn(e);
        }
    }
}

impl CallbackInvoker for WorldHost<'_> {
    fn invoke(
        &mut self,
        receiver: TargetId,
        function: &str,
        args: &CallbackArgs,
    ) -> Result<(), CallbackError> {
        self.callbacks.invoke(self.world, receiver, function, args)
    }
}
