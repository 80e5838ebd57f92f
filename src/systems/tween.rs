//! Tween playback system.
//!
//! [`update_tweens`] drains the pending [`TweenCmd`] messages, advances every
//! playing tween in the [`TweenStore`] by the frame delta from
//! [`WorldTime`] and triggers a [`TweenFinishedEvent`] for each run that
//! settled during the frame.

use bevy_ecs::prelude::*;
use log::trace;

use crate::events::tween::{TweenCmd, TweenFinishedEvent};
use crate::resources::tweenconfig::TweenConfig;
use crate::resources::tweenstore::TweenStore;
use crate::resources::worldtime::WorldTime;

/// Exclusive system: tweens write arbitrary components, so they need the whole world.
///
/// The delta is clamped by [`TweenConfig::max_delta`] when that resource is present.
/// Does nothing without a [`TweenStore`].
pub fn update_tweens(world: &mut World) {
    if !world.contains_resource::<TweenStore>() {
        return;
    }
    let cmds: Vec<TweenCmd> = world
        .get_resource_mut::<Messages<TweenCmd>>()
        .map(|mut msgs| msgs.drain().collect())
        .unwrap_or_default();

    let dt = world.get_resource::<WorldTime>().map_or(0.0, |t| t.delta);
    let dt = world
        .get_resource::<TweenConfig>()
        .map_or(dt, |config| config.clamp_delta(dt));

    let finished = world.resource_scope(|world, mut store: Mut<TweenStore>| {
        for cmd in cmds {
            store.apply(world, cmd);
        }
        store.tick_all(world, dt)
    });

    for (id, outcome) in finished {
        trace!(target: "tween", "{id:?} settled: {outcome:?}");
        world.trigger(TweenFinishedEvent { id, outcome });
    }
}
