//! Tween composition and playback.
//!
//! A [`Tween`] is a leaf ([`SimpleTween`]) driving one property of one entity,
//! a [`GroupTween`] playing children in sequence or in parallel, or a
//! [`MultiTween`] replicating a template across the children of a parent
//! entity with a stagger delay.
//!
//! Playback is cooperative. [`Tween::play`] installs a run and returns
//! immediately; [`Tween::tick`] advances the run by a frame delta up to its
//! next suspension point. Starting a new play cancels the run in flight
//! first, so a tween never has two runs writing its target. Every run is
//! linked to an optional parent [`CancelToken`] and settles with an
//! [`Outcome`] that stays queryable afterwards.
//!
//! The [`update_tweens`](crate::systems::tween::update_tweens) system ticks
//! every tween stored in the [`TweenStore`](crate::resources::tweenstore::TweenStore).

pub mod cancel;
pub mod curve;
pub mod error;
pub mod factory;
pub mod group;
pub mod multi;
pub mod path;
pub mod primitives;
pub mod simple;
pub mod value;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use cancel::CancelToken;
use error::TweenError;
pub use group::GroupTween;
pub use multi::MultiTween;
pub use simple::SimpleTween;

/// Determines how a leaf tween behaves when it reaches the end of a pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    /// Play once and stop.
    #[default]
    Once,
    /// Restart from the beginning when finished.
    Loop,
    /// Reverse direction when reaching either end. One duration covers a
    /// full forward and backward cycle.
    PingPong,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayOptions {
    /// Play from `to` back to `from` using the mirrored curve.
    pub reverse: bool,
    /// Skip the initial snap and continue from the target's current value.
    pub from_current: bool,
}

impl PlayOptions {
    pub fn forward() -> Self {
        Self::default()
    }

    pub fn reversed() -> Self {
        Self {
            reverse: true,
            ..Self::default()
        }
    }

    pub fn with_from_current(mut self, from_current: bool) -> Self {
        self.from_current = from_current;
        self
    }
}

/// Result of advancing a run.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Step {
    Running,
    /// The run settled. `leftover` is the part of the delta it did not use.
    Done { leftover: f32 },
}

/// How the last run of a tween ended.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
    Completed,
    Cancelled,
    /// The tween could not animate its target. Siblings are unaffected.
    Aborted(TweenError),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Tween {
    Simple(SimpleTween),
    Group(GroupTween),
    Multi(MultiTween),
}

impl Tween {
    pub fn is_playing(&self) -> bool {
        match self {
            Tween::Simple(t) => t.is_playing(),
            Tween::Group(t) => t.is_playing(),
            Tween::Multi(t) => t.is_playing(),
        }
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            Tween::Simple(t) => t.outcome(),
            Tween::Group(t) => t.outcome(),
            Tween::Multi(t) => t.outcome(),
        }
    }

    /// Start playback, cancelling the run in flight if any.
    pub fn play(&mut self, world: &mut World, options: PlayOptions, parent: Option<&CancelToken>) {
        match self {
            Tween::Simple(t) => t.play(world, options, parent),
            Tween::Group(t) => t.play(world, options, parent),
            Tween::Multi(t) => t.play(world, options, parent),
        }
    }

    pub fn tick(&mut self, world: &mut World, dt: f32) -> Step {
        match self {
            Tween::Simple(t) => t.tick(world, dt),
            Tween::Group(t) => t.tick(world, dt),
            Tween::Multi(t) => t.tick(world, dt),
        }
    }

    pub fn cancel(&mut self) {
        match self {
            Tween::Simple(t) => t.cancel(),
            Tween::Group(t) => t.cancel(),
            Tween::Multi(t) => t.cancel(),
        }
    }

    pub fn reset_to_start(&mut self, world: &mut World) {
        match self {
            Tween::Simple(t) => t.reset_to_start(world),
            Tween::Group(t) => t.reset_to_start(world),
            Tween::Multi(t) => t.reset_to_start(world),
        }
    }

    pub fn jump_to_end(&mut self, world: &mut World) {
        match self {
            Tween::Simple(t) => t.jump_to_end(world),
            Tween::Group(t) => t.jump_to_end(world),
            Tween::Multi(t) => t.jump_to_end(world),
        }
    }

    /// Total playback time in seconds.
    pub fn length(&self) -> f32 {
        match self {
            Tween::Simple(t) => t.length(),
            Tween::Group(t) => t.length(),
            Tween::Multi(t) => t.length(),
        }
    }

    /// Show the state at local time `secs`, clamped to the tween's extent.
    pub fn scrub_seconds(&mut self, world: &mut World, secs: f32) {
        match self {
            Tween::Simple(t) => t.scrub_seconds(world, secs),
            Tween::Group(t) => t.scrub_seconds(world, secs),
            Tween::Multi(t) => t.scrub_seconds(world, secs),
        }
    }

    /// Show the state at normalized time `u` of [`length`](Self::length).
    pub fn scrub(&mut self, world: &mut World, u: f32) {
        let secs = u.clamp(0.0, 1.0) * self.length();
        self.scrub_seconds(world, secs);
    }

    /// Structural copy without playback state.
    ///
    /// `Some(entity)` rebinds every leaf (or the fan-out parent) to `entity`;
    /// `None` keeps the current bindings.
    pub fn clone_for(&self, target: Option<Entity>) -> Tween {
        match self {
            Tween::Simple(t) => Tween::Simple(t.clone_for(target)),
            Tween::Group(t) => Tween::Group(t.clone_for(target)),
            Tween::Multi(t) => Tween::Multi(t.clone_for(target)),
        }
    }

    /// Check every configuration value, recursively.
    pub fn validate(&self) -> Result<(), TweenError> {
        match self {
            Tween::Simple(t) => t.validate(),
            Tween::Group(t) => t.validate(),
            Tween::Multi(t) => t.validate(),
        }
    }
}

impl From<SimpleTween> for Tween {
    fn from(t: SimpleTween) -> Self {
        Tween::Simple(t)
    }
}

impl From<GroupTween> for Tween {
    fn from(t: GroupTween) -> Self {
        Tween::Group(t)
    }
}

impl From<MultiTween> for Tween {
    fn from(t: MultiTween) -> Self {
        Tween::Multi(t)
    }
}
