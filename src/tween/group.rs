//! Sequential and parallel composition.

use bevy_ecs::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::cancel::{CancelScope, CancelToken};
use super::error::TweenError;
use super::{Outcome, PlayOptions, Step, Tween};

#[derive(Debug)]
enum GroupPhase {
    Delay { remaining: f32 },
    Sequence { index: usize, started: bool },
    Parallel { running: SmallVec<[bool; 8]> },
}

#[derive(Debug)]
struct GroupRun {
    scope: CancelScope,
    options: PlayOptions,
    phase: GroupPhase,
}

/// Plays its children one after another, or all at once when `parallel`.
///
/// The group owns its children. Cancelling the group cancels them, and a
/// child that aborts never fails the group.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct GroupTween {
    #[serde(default)]
    pub parallel: bool,
    #[serde(default)]
    start_delay: f32,
    #[serde(default)]
    children: Vec<Tween>,
    #[serde(skip)]
    run: Option<GroupRun>,
    #[serde(skip)]
    outcome: Option<Outcome>,
}

impl GroupTween {
    pub fn sequence() -> Self {
        Self::default()
    }

    pub fn parallel() -> Self {
        Self {
            parallel: true,
            ..Self::default()
        }
    }

    pub fn with_start_delay(mut self, delay: f32) -> Result<Self, TweenError> {
        self.set_start_delay(delay)?;
        Ok(self)
    }

    pub fn with_child(mut self, child: impl Into<Tween>) -> Self {
        self.push(child);
        self
    }

    pub fn start_delay(&self) -> f32 {
        self.start_delay
    }

    pub fn set_start_delay(&mut self, delay: f32) -> Result<(), TweenError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(TweenError::InvalidDelay(delay));
        }
        self.start_delay = delay;
        Ok(())
    }

    pub fn push(&mut self, child: impl Into<Tween>) {
        self.children.push(child.into());
    }

    /// Remove and return the child at `index`, cancelling it.
    pub fn remove(&mut self, index: usize) -> Option<Tween> {
        if index >= self.children.len() {
            return None;
        }
        let mut child = self.children.remove(index);
        child.cancel();
        Some(child)
    }

    pub fn children(&self) -> &[Tween] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [Tween] {
        &mut self.children
    }

    pub fn is_playing(&self) -> bool {
        self.run.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Longest child when parallel, sum of children otherwise.
    ///
    /// Computed from the children every call. The group's own start delay is
    /// not included.
    pub fn length(&self) -> f32 {
        let lengths = self.children.iter().map(Tween::length);
        if self.parallel {
            lengths.fold(0.0, f32::max)
        } else {
            lengths.sum()
        }
    }

    pub fn validate(&self) -> Result<(), TweenError> {
        if !self.start_delay.is_finite() || self.start_delay < 0.0 {
            return Err(TweenError::InvalidDelay(self.start_delay));
        }
        self.children.iter().try_for_each(Tween::validate)
    }

    pub fn play(&mut self, world: &mut World, options: PlayOptions, parent: Option<&CancelToken>) {
        self.cancel();
        self.outcome = None;
        if !options.from_current {
            if options.reverse {
                self.jump_to_end(world);
            } else {
                self.reset_to_start(world);
            }
        }
        debug!(
            target: "tween",
            "play {} group of {} ({options:?})",
            if self.parallel { "parallel" } else { "sequential" },
            self.children.len()
        );
        self.run = Some(GroupRun {
            scope: CancelScope::linked(parent),
            options,
            phase: GroupPhase::Delay {
                remaining: self.start_delay,
            },
        });
    }

    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            run.scope.cancel();
            for child in &mut self.children {
                child.cancel();
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
        if let GroupPhase::Delay { remaining } = run.phase {
            if budget < remaining {
                run.phase = GroupPhase::Delay {
                    remaining: remaining - budget,
                };
                self.run = Some(run);
                return Step::Running;
            }
            budget -= remaining;
            run.phase = if self.parallel {
                for child in &mut self.children {
                    child.play(world, run.options, Some(run.scope.token()));
                }
                GroupPhase::Parallel {
                    running: SmallVec::from_elem(true, self.children.len()),
                }
            } else {
                GroupPhase::Sequence {
                    index: 0,
                    started: false,
                }
            };
        }

        let step = if self.parallel {
            self.tick_parallel(world, &mut run, budget)
        } else {
            self.tick_sequence(world, &mut run, budget)
        };
        match step {
            Step::Running => self.run = Some(run),
            Step::Done { .. } if run.scope.is_cancelled() => {
                self.run = Some(run);
                self.cancel();
            }
            Step::Done { .. } => self.outcome = Some(Outcome::Completed),
        }
        step
    }

    fn tick_sequence(&mut self, world: &mut World, run: &mut GroupRun, mut budget: f32) -> Step {
        let GroupPhase::Sequence { index, started } = &mut run.phase else {
            return Step::Done { leftover: budget };
        };
        loop {
            // A cancelled group never starts further children.
            if run.scope.is_cancelled() {
                return Step::Done { leftover: budget };
            }
            let Some(child) = self.children.get_mut(*index) else {
                return Step::Done { leftover: budget };
            };
            if !*started {
                child.play(world, run.options, Some(run.scope.token()));
                *started = true;
            }
            match child.tick(world, budget) {
                Step::Running => return Step::Running,
                Step::Done { leftover } => {
                    budget = leftover;
                    *index += 1;
                    *started = false;
                }
            }
        }
    }

    fn tick_parallel(&mut self, world: &mut World, run: &mut GroupRun, budget: f32) -> Step {
        let GroupPhase::Parallel { running } = &mut run.phase else {
            return Step::Done { leftover: budget };
        };
        let mut leftover: Option<f32> = None;
        for (child, live) in self.children.iter_mut().zip(running.iter_mut()) {
            if !*live {
                continue;
            }
            if let Step::Done { leftover: l } = child.tick(world, budget) {
                *live = false;
                leftover = Some(leftover.map_or(l, |m| m.min(l)));
            }
        }
        if running.iter().any(|live| *live) {
            Step::Running
        } else {
            Step::Done {
                leftover: leftover.unwrap_or(budget),
            }
        }
    }

    /// Snap every child to its start, last child first.
    pub fn reset_to_start(&mut self, world: &mut World) {
        for child in self.children.iter_mut().rev() {
            child.reset_to_start(world);
        }
    }

    /// Snap every child to its end, in order.
    pub fn jump_to_end(&mut self, world: &mut World) {
        for child in &mut self.children {
            child.jump_to_end(world);
        }
    }

    /// Show the state at `secs` after play.
    ///
    /// Children that have not started yet are applied first, last to first,
    /// so that children already under way win over their rest pose.
    ///
    /// Like [`length`](Self::length), this ignores the group's own start
    /// delay: `secs` is measured from the end of that delay, while playback
    /// waits for it. A delayed group nested in a sequence therefore scrubs
    /// earlier than it plays by its delay.
    pub fn scrub_seconds(&mut self, world: &mut World, secs: f32) {
        if self.parallel {
            for child in &mut self.children {
                child.scrub_seconds(world, secs);
            }
            return;
        }
        let mut offsets = Vec::with_capacity(self.children.len());
        let mut offset = 0.0;
        for child in &self.children {
            offsets.push(offset);
            offset += child.length();
        }
        for (child, &start) in self.children.iter_mut().zip(&offsets).rev() {
            if start > secs {
                child.scrub_seconds(world, secs - start);
            }
        }
        for (child, &start) in self.children.iter_mut().zip(&offsets) {
            if start <= secs {
                child.scrub_seconds(world, secs - start);
            }
        }
    }

    pub fn clone_for(&self, target: Option<Entity>) -> GroupTween {
        GroupTween {
            parallel: self.parallel,
            start_delay: self.start_delay,
            children: self.children.iter().map(|c| c.clone_for(target)).collect(),
            run: None,
            outcome: None,
        }
    }
}
