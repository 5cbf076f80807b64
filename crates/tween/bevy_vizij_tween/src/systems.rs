use bevy::prelude::*;

use vizij_tween_core::{CallbackTable, TweenEngine};

use crate::components::TweenFollower;
use crate::host::{WorldDirectory, WorldHost};
use crate::{TweenCallbacks, TweenNotification, TweenOutputs, VizijTweenEngine};

/// Advance every tween by `dt` real seconds. Virtual-time pause and relative
/// speed are applied per tween by the core.
pub fn step_tweens(world: &mut World, dt: f32) {
    if !world.contains_resource::<VizijTweenEngine>() {
        return;
    }
    world.resource_scope(|world, mut engine: Mut<VizijTweenEngine>| {
        // Handlers get `&mut World`, so the table lives outside it for the tick.
        let callbacks = world
            .remove_resource::<TweenCallbacks>()
            .unwrap_or_default();
        let outputs = {
            let mut host = WorldHost::new(world, &callbacks.0);
            engine.0.update(dt, &mut host).clone()
        };
        world.insert_resource(callbacks);

        if world.contains_resource::<Events<TweenNotification>>() {
            for event in &outputs.events {
                world.send_event(TweenNotification(event.clone()));
            }
        }
        world.insert_resource(TweenOutputs(outputs));
    });
}

/// Run `f` against the engine with a directory over the rest of the world,
/// e.g. for `stop_all` by target name. `None` without the plugin.
pub fn with_engine<R>(
    world: &mut World,
    f: impl FnOnce(&mut TweenEngine, &WorldDirectory) -> R,
) -> Option<R> {
    if !world.contains_resource::<VizijTweenEngine>() {
        return None;
    }
    Some(
        world.resource_scope(|world, mut engine: Mut<VizijTweenEngine>| {
            f(&mut engine.0, &WorldDirectory::new(world))
        }),
    )
}

pub fn tick_tweens_system(world: &mut World) {
    let dt = world
        .get_resource::<Time<Real>>()
        .map_or(0.0, |t| t.delta_seconds());
    step_tweens(world, dt);
}

/// Step every [`TweenFollower`] once by `dt`. Followers that cannot be applied
/// this frame are skipped.
pub fn step_followers(world: &mut World, dt: f32) {
    let followers: Vec<(Entity, TweenFollower)> = world
        .query::<(Entity, &TweenFollower)>()
        .iter(world)
        .map(|(e, f)| (e, *f))
        .collect();
    if followers.is_empty() {
        return;
    }
    let callbacks = CallbackTable::new();
    let mut host = WorldHost::new(world, &callbacks);
    for (entity, TweenFollower(follow)) in followers {
        if let Err(err) = follow.step(dt, &mut host) {
            log::debug!("follower on {entity:?} skipped: {err}");
        }
    }
}

/// Followers run on virtual time, so they stop while it is paused.
pub fn follow_targets_system(world: &mut World) {
    let dt = world
        .get_resource::<Time<Virtual>>()
        .map_or(0.0, |t| t.delta_seconds());
    step_followers(world, dt);
}
