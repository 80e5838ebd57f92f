//! Primitives that interpolate a single value between two endpoints.

use bevy_ecs::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};

use super::Primitive;
use super::accessor::PropertyAccessor;
use crate::tween::error::TweenError;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "A: Serialize, A::Value: Serialize",
    deserialize = "A: Deserialize<'de>, A::Value: Deserialize<'de>"
))]
pub struct LerpTween<A: PropertyAccessor> {
    pub from: A::Value,
    pub to: A::Value,
    #[serde(flatten)]
    pub access: A,
    /// Start and end of the pass being played.
    #[serde(skip)]
    pass: Option<(A::Value, A::Value)>,
}

impl<A: PropertyAccessor> LerpTween<A> {
    pub fn new(from: A::Value, to: A::Value, access: A) -> Self {
        Self {
            from,
            to,
            access,
            pass: None,
        }
    }

    fn write_endpoint(&mut self, world: &mut World, target: Entity, end: bool) {
        self.access.capture(world, target);
        match self.access.endpoints(world, target, self.from, self.to) {
            Ok((start, stop)) => {
                let value = if end { stop } else { start };
                self.access.write(world, target, value);
            }
            Err(e) => warn!(target: "tween", "cannot snap {}: {e}", self.access.component()),
        }
    }
}

impl<A: PropertyAccessor> Primitive for LerpTween<A> {
    fn prepare(&mut self, world: &World, target: Entity) -> Result<(), TweenError> {
        self.access.validate()?;
        if !self.access.is_bound(world, target) {
            return Err(TweenError::MissingComponent {
                entity: target,
                component: self.access.component(),
            });
        }
        self.access.capture(world, target);
        Ok(())
    }

    fn reset(&mut self, world: &mut World, target: Entity) {
        self.write_endpoint(world, target, false);
    }

    fn finish(&mut self, world: &mut World, target: Entity) {
        self.write_endpoint(world, target, true);
    }

    fn begin(&mut self, world: &World, target: Entity, reverse: bool) -> Result<(), TweenError> {
        let (start, end) = self.access.endpoints(world, target, self.from, self.to)?;
        self.pass = Some(if reverse { (end, start) } else { (start, end) });
        Ok(())
    }

    fn resume_fraction(&self, world: &World, target: Entity) -> Option<f32> {
        let (start, end) = self.pass?;
        let current = self.access.read(world, target)?;
        self.access.fraction(start, end, current)
    }

    fn go_to_start(&mut self, world: &mut World, target: Entity) {
        if let Some((start, _)) = self.pass {
            self.access.write(world, target, start);
        }
    }

    fn apply(&mut self, world: &mut World, target: Entity, factor: f32) {
        if let Some((start, end)) = self.pass {
            self.access.write_between(world, target, start, end, factor);
        }
    }

    fn ping_pong(&mut self, world: &World, target: Entity) {
        if let Some((start, end)) = self.pass {
            let current = self.access.read(world, target).unwrap_or(end);
            self.pass = Some((current, start));
        }
    }

    fn scrub(&mut self, world: &mut World, target: Entity, factor: f32) {
        self.access.capture(world, target);
        match self.access.endpoints(world, target, self.from, self.to) {
            Ok((start, end)) => self.access.write_between(world, target, start, end, factor),
            Err(e) => warn!(target: "tween", "cannot scrub {}: {e}", self.access.component()),
        }
    }

    fn clear_runtime(&mut self) {
        self.pass = None;
        self.access.clear_runtime();
    }
}
