//! Local-space position component.
//!
//! For root entities this is the world position. For entities with a
//! [`ChildOf`](bevy_ecs::hierarchy::ChildOf) parent it is relative to the parent,
//! see [`GlobalTransform`](super::globaltransform::GlobalTransform).

use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct MapPosition {
    pub pos: Vec3,
}

impl MapPosition {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self {
            pos: Vec3::new(x, y, z),
        }
    }
}
