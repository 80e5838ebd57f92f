//! Storage for the tweens driven by the engine.
//!
//! Tweens are addressed by a [`TweenId`] handed out on insertion. The store
//! remembers runs that settled outside of a tick (aborted at play or
//! cancelled) so every settled run is reported exactly once by
//! [`TweenStore::tick_all`].

use bevy_ecs::prelude::*;
use log::debug;
use rustc_hash::FxHashMap;

use crate::events::tween::TweenCmd;
use crate::tween::{Outcome, PlayOptions, Step, Tween};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TweenId(pub u64);

#[derive(Resource, Default)]
pub struct TweenStore {
    tweens: FxHashMap<TweenId, Tween>,
    next_id: u64,
    settled: Vec<TweenId>,
}

impl TweenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tween: impl Into<Tween>) -> TweenId {
        let id = TweenId(self.next_id);
        self.next_id += 1;
        self.tweens.insert(id, tween.into());
        id
    }

    pub fn get(&self, id: TweenId) -> Option<&Tween> {
        self.tweens.get(&id)
    }

    pub fn get_mut(&mut self, id: TweenId) -> Option<&mut Tween> {
        self.tweens.get_mut(&id)
    }

    /// Remove a tween, cancelling its run. The cancellation is not reported.
    pub fn remove(&mut self, id: TweenId) -> Option<Tween> {
        self.settled.retain(|s| *s != id);
        let mut tween = self.tweens.remove(&id)?;
        tween.cancel();
        Some(tween)
    }

    pub fn contains(&self, id: TweenId) -> bool {
        self.tweens.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// Ids of the tweens with a run in flight, ascending.
    pub fn playing(&self) -> Vec<TweenId> {
        let mut ids: Vec<_> = self
            .tweens
            .iter()
            .filter(|(_, t)| t.is_playing())
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Start (or restart) a tween. Returns false for an unknown id.
    pub fn play(&mut self, world: &mut World, id: TweenId, options: PlayOptions) -> bool {
        let Some(tween) = self.tweens.get_mut(&id) else {
            return false;
        };
        if tween.is_playing() {
            debug!(target: "tween", "{id:?} restarted while playing");
        }
        tween.play(world, options, None);
        if !tween.is_playing() && tween.outcome().is_some() {
            self.settled.push(id);
        }
        true
    }

    pub fn cancel(&mut self, id: TweenId) -> bool {
        let Some(tween) = self.tweens.get_mut(&id) else {
            return false;
        };
        if tween.is_playing() {
            tween.cancel();
            self.settled.push(id);
        }
        true
    }

    /// Apply one command. Commands for unknown ids are ignored.
    pub fn apply(&mut self, world: &mut World, cmd: TweenCmd) {
        let known = match cmd {
            TweenCmd::Play { id, options } => self.play(world, id, options),
            TweenCmd::Cancel { id } => self.cancel(id),
            TweenCmd::Reset { id } => self.with_tween(id, |t| t.reset_to_start(world)),
            TweenCmd::JumpToEnd { id } => self.with_tween(id, |t| t.jump_to_end(world)),
            TweenCmd::Scrub { id, u } => self.with_tween(id, |t| t.scrub(world, u)),
        };
        if !known {
            debug!(target: "tween", "ignoring {cmd:?}: unknown tween");
        }
    }

    fn with_tween(&mut self, id: TweenId, f: impl FnOnce(&mut Tween)) -> bool {
        match self.tweens.get_mut(&id) {
            Some(tween) => {
                f(tween);
                true
            }
            None => false,
        }
    }

    /// Advance every playing tween by `dt`.
    ///
    /// Returns the runs that settled since the last call, with their outcome.
    pub fn tick_all(&mut self, world: &mut World, dt: f32) -> Vec<(TweenId, Outcome)> {
        for id in self.playing() {
            let Some(tween) = self.tweens.get_mut(&id) else {
                continue;
            };
            if let Step::Done { .. } = tween.tick(world, dt) {
                self.settled.push(id);
            }
        }
        self.settled
            .drain(..)
            .filter_map(|id| {
                let outcome = self.tweens.get(&id)?.outcome()?.clone();
                Some((id, outcome))
            })
            .collect()
    }
}
