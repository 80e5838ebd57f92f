//! Fan-out: one template replicated over the children of a parent entity.
//!
//! The instance list is built lazily on first use and kept until
//! [`MultiTween::reinitialize`] is called. Children added, removed or
//! toggled afterwards are not picked up on their own;
//! [`MultiTween::is_stale`] tells when the cached list no longer matches.

use bevy_ecs::hierarchy::Children;
use bevy_ecs::prelude::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::cancel::{CancelScope, CancelToken};
use super::error::TweenError;
use super::{Outcome, PlayOptions, Step, Tween};
use crate::components::inactive::Inactive;

/// Slack allowed when matching the stagger wait against the frame budget.
const LAUNCH_EPSILON: f32 = 1e-5;

#[derive(Debug)]
struct MultiRun {
    scope: CancelScope,
    options: PlayOptions,
    /// Instances started so far.
    launched: usize,
    /// Time until the next instance starts.
    wait: f32,
    running: SmallVec<[bool; 8]>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MultiTween {
    #[serde(skip)]
    parent: Option<Entity>,
    #[serde(default)]
    per_object_delay: f32,
    template: Box<Tween>,
    #[serde(skip)]
    instances: Vec<Tween>,
    /// Children the instances were built for, in order.
    #[serde(skip)]
    snapshot: Vec<Entity>,
    #[serde(skip)]
    run: Option<MultiRun>,
    #[serde(skip)]
    outcome: Option<Outcome>,
}

/// Direct children of `parent` without [`Inactive`], in hierarchy order.
pub fn active_children(world: &World, parent: Entity) -> Vec<Entity> {
    world
        .get::<Children>(parent)
        .map(|children| {
            children
                .iter()
                .filter(|child| world.get::<Inactive>(*child).is_none())
                .collect()
        })
        .unwrap_or_default()
}

impl MultiTween {
    pub fn new(template: impl Into<Tween>) -> Self {
        Self {
            parent: None,
            per_object_delay: 0.0,
            template: Box::new(template.into()),
            instances: Vec::new(),
            snapshot: Vec::new(),
            run: None,
            outcome: None,
        }
    }

    pub fn with_parent(mut self, parent: Entity) -> Self {
        self.set_parent(Some(parent));
        self
    }

    pub fn with_per_object_delay(mut self, delay: f32) -> Result<Self, TweenError> {
        self.set_per_object_delay(delay)?;
        Ok(self)
    }

    pub fn parent(&self) -> Option<Entity> {
        self.parent
    }

    /// Change the parent. Instances are rebuilt on next use.
    pub fn set_parent(&mut self, parent: Option<Entity>) {
        self.cancel();
        self.parent = parent;
        self.instances.clear();
        self.snapshot.clear();
    }

    pub fn per_object_delay(&self) -> f32 {
        self.per_object_delay
    }

    pub fn set_per_object_delay(&mut self, delay: f32) -> Result<(), TweenError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(TweenError::InvalidDelay(delay));
        }
        self.per_object_delay = delay;
        Ok(())
    }

    pub fn template(&self) -> &Tween {
        &self.template
    }

    /// Edit the template. Existing instances keep the old configuration
    /// until [`reinitialize`](Self::reinitialize).
    pub fn template_mut(&mut self) -> &mut Tween {
        &mut self.template
    }

    pub fn instances(&self) -> &[Tween] {
        &self.instances
    }

    /// Children the current instances are bound to.
    pub fn bound_children(&self) -> &[Entity] {
        &self.snapshot
    }

    pub fn is_playing(&self) -> bool {
        self.run.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// True when the parent's active children differ from the cached instance list.
    pub fn is_stale(&self, world: &World) -> bool {
        match self.parent {
            Some(parent) => active_children(world, parent) != self.snapshot,
            None => !self.snapshot.is_empty(),
        }
    }

    /// Rebuild the instance list from the parent's current active children.
    pub fn reinitialize(&mut self, world: &World) -> Result<(), TweenError> {
        self.cancel();
        let parent = self.parent.ok_or(TweenError::NoParent)?;
        if world.get_entity(parent).is_err() {
            return Err(TweenError::TargetDespawned(parent));
        }
        self.snapshot = active_children(world, parent);
        self.instances = self
            .snapshot
            .iter()
            .map(|&child| self.template.clone_for(Some(child)))
            .collect();
        debug!(target: "tween", "fan-out bound to {} children of {parent}", self.instances.len());
        Ok(())
    }

    fn ensure_initialized(&mut self, world: &World) -> Result<(), TweenError> {
        if self.instances.is_empty() {
            self.reinitialize(world)?;
        }
        Ok(())
    }

    /// `n * per_object_delay + template length` for `n` instances, 0 before initialization.
    pub fn length(&self) -> f32 {
        let n = self.instances.len();
        if n == 0 {
            return 0.0;
        }
        n as f32 * self.per_object_delay + self.template.length()
    }

    pub fn validate(&self) -> Result<(), TweenError> {
        if !self.per_object_delay.is_finite() || self.per_object_delay < 0.0 {
            return Err(TweenError::InvalidDelay(self.per_object_delay));
        }
        self.template.validate()
    }

    /// Start the instances one after another, `per_object_delay` apart.
    ///
    /// The first instance also waits one delay. The run completes once every
    /// instance has finished.
    pub fn play(&mut self, world: &mut World, options: PlayOptions, parent: Option<&CancelToken>) {
        self.cancel();
        self.outcome = None;
        if let Err(e) = self.ensure_initialized(world) {
            warn!(target: "tween", "fan-out tween aborted: {e}");
            self.outcome = Some(Outcome::Aborted(e));
            return;
        }
        self.run = Some(MultiRun {
            scope: CancelScope::linked(parent),
            options,
            launched: 0,
            wait: self.per_object_delay,
            running: SmallVec::from_elem(false, self.instances.len()),
        });
    }

    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            run.scope.cancel();
            for instance in &mut self.instances {
                instance.cancel();
            }
            self.outcome = Some(Outcome::Cancelled);
        }
    }

    pub fn tick(&mut self, world: &mut World, dt: f32) -> Step {
        let Some(mut run) = self.run.take() else {
            return Step::Done { leftover: dt };
        };
        if run.scope.is_cancelled() {
            self.run = Some(run);
            self.cancel();
            return Step::Done { leftover: dt };
        }

        let mut budget = dt.max(0.0);
        let leftover;
        loop {
            if run.launched < self.instances.len() && run.wait <= budget + LAUNCH_EPSILON {
                let slice = run.wait.min(budget);
                self.tick_instances(world, &mut run.running, slice);
                budget -= slice;
                let i = run.launched;
                self.instances[i].play(world, run.options, Some(run.scope.token()));
                run.running[i] = true;
                run.launched += 1;
                run.wait = self.per_object_delay;
                continue;
            }
            leftover = self.tick_instances(world, &mut run.running, budget);
            if run.launched < self.instances.len() {
                run.wait -= budget;
            }
            break;
        }

        let all_launched = run.launched >= self.instances.len();
        if all_launched && !run.running.iter().any(|live| *live) {
            self.outcome = Some(Outcome::Completed);
            return Step::Done {
                leftover: leftover.unwrap_or(budget),
            };
        }
        self.run = Some(run);
        Step::Running
    }

    /// Advance every live instance. Returns the smallest leftover among the
    /// instances that finished.
    fn tick_instances(&mut self, world: &mut World, running: &mut [bool], dt: f32) -> Option<f32> {
        let mut leftover: Option<f32> = None;
        for (instance, live) in self.instances.iter_mut().zip(running.iter_mut()) {
            if !*live {
                continue;
            }
            if let Step::Done { leftover: l } = instance.tick(world, dt) {
                *live = false;
                leftover = Some(leftover.map_or(l, |m| m.min(l)));
            }
        }
        leftover
    }

    /// Snap every instance to its start, last first.
    pub fn reset_to_start(&mut self, world: &mut World) {
        if let Err(e) = self.ensure_initialized(world) {
            warn!(target: "tween", "cannot reset fan-out tween: {e}");
            return;
        }
        for instance in self.instances.iter_mut().rev() {
            instance.reset_to_start(world);
        }
    }

    pub fn jump_to_end(&mut self, world: &mut World) {
        if let Err(e) = self.ensure_initialized(world) {
            warn!(target: "tween", "cannot finish fan-out tween: {e}");
            return;
        }
        for instance in &mut self.instances {
            instance.jump_to_end(world);
        }
    }

    /// Show the state at `secs` after play. Instance `k` starts at `(k + 1) * per_object_delay`.
    pub fn scrub_seconds(&mut self, world: &mut World, secs: f32) {
        if let Err(e) = self.ensure_initialized(world) {
            warn!(target: "tween", "cannot scrub fan-out tween: {e}");
            return;
        }
        let delay = self.per_object_delay;
        for (k, instance) in self.instances.iter_mut().enumerate() {
            instance.scrub_seconds(world, secs - (k + 1) as f32 * delay);
        }
    }

    pub fn clone_for(&self, target: Option<Entity>) -> MultiTween {
        MultiTween {
            parent: target.or(self.parent),
            per_object_delay: self.per_object_delay,
            template: Box::new(self.template.clone_for(None)),
            instances: Vec::new(),
            snapshot: Vec::new(),
            run: None,
            outcome: None,
        }
    }
}
