//! Tween playback commands and notifications.
//!
//! Gameplay code writes [`TweenCmd`] messages addressed by
//! [`TweenId`](crate::resources::tweenstore::TweenId); the
//! [`update_tweens`](crate::systems::tween::update_tweens) system drains them
//! at the start of each frame. When a run settles, a [`TweenFinishedEvent`]
//! is triggered.
//!
//! # Example
//!
//! ```ignore
//! world.add_observer(|trigger: On<TweenFinishedEvent>| {
//!     if trigger.outcome == Outcome::Completed {
//!         // chain the next animation
//!     }
//! });
//! ```

use bevy_ecs::message::Message;
use bevy_ecs::prelude::*;

use crate::resources::tweenstore::TweenId;
use crate::tween::{Outcome, PlayOptions};

/// Commands sent *to* the tween store.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub enum TweenCmd {
    Play { id: TweenId, options: PlayOptions },
    Cancel { id: TweenId },
    Reset { id: TweenId },
    JumpToEnd { id: TweenId },
    /// Show the tween at normalized time `u` of its length.
    Scrub { id: TweenId, u: f32 },
}

/// Triggered once per settled run.
#[derive(Event, Debug, Clone, PartialEq)]
pub struct TweenFinishedEvent {
    pub id: TweenId,
    pub outcome: Outcome,
}
