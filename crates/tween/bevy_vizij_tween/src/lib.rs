//! Bevy adapter for `vizij-tween-core`.
//!
//! The plugin owns a [`TweenEngine`] as a resource and advances it once per
//! frame against the world through [`WorldHost`]. Named callbacks are looked up
//! in [`TweenCallbacks`] and receive the world; closure callbacks receive the
//! engine as usual. Entities carrying a [`TweenFollower`] are stepped toward
//! their goal every frame on virtual time.

use bevy::prelude::*;
use vizij_tween_core::{CallbackTable, Config, CoreEvent, Outputs, TweenEngine};

pub mod components;
pub mod host;
mod systems;

pub use components::{
    SplineBundle, SplinePath, TweenFollower, TweenVisibility, WidgetRenderTransform,
};
pub use host::{entity_of, target_of, WorldDirectory, WorldHost};
pub use systems::{
    follow_targets_system, step_followers, step_tweens, tick_tweens_system, with_engine,
};

#[derive(Resource, Default)]
pub struct VizijTweenEngine(pub TweenEngine);

/// Named callback handlers keyed by receiver entity and function name.
#[derive(Resource, Default)]
pub struct TweenCallbacks(pub CallbackTable<World>);

/// Outputs of the most recent tick.
#[derive(Resource, Default, Clone)]
pub struct TweenOutputs(pub Outputs);

/// Each `CoreEvent` of a tick, re-sent as a Bevy event.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TweenNotification(pub CoreEvent);

#[derive(Default)]
pub struct VizijTweenPlugin {
    pub config: Config,
}

impl Plugin for VizijTweenPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(VizijTweenEngine(TweenEngine::new(self.config.clone())))
            .init_resource::<TweenCallbacks>()
            .init_resource::<TweenOutputs>()
            .add_event::<TweenNotification>()
            .add_systems(Update, (follow_targets_system, tick_tweens_system));
    }
}
