//! Computed world-space transform for entities in a hierarchy.
//!
//! When an entity has a [`ChildOf`](bevy_ecs::hierarchy::ChildOf) parent, its
//! [`MapPosition`](super::mapposition::MapPosition), [`Rotation`](super::rotation::Rotation),
//! and [`Scale`](super::scale::Scale) are interpreted as local to the parent.
//! The [`propagate_transforms`](crate::systems::propagate_transforms::propagate_transforms)
//! system computes the resulting world-space values and stores them here.

use bevy_ecs::prelude::*;
use glam::Vec3;

/// Computed world-space transform for hierarchical entities.
///
/// For root entities (no parent), it mirrors the local MapPosition/Rotation/Scale.
/// For child entities, it contains the composed result of the full ancestor chain.
/// Tweens that work in world space do not wait for this component: they use
/// [`world_position`](crate::systems::propagate_transforms::world_position) instead.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct GlobalTransform {
    /// World-space position.
    pub position: Vec3,
    /// World-space rotation around z in degrees.
    pub rotation_degrees: f32,
    /// World-space scale.
    pub scale: Vec3,
}

impl Default for GlobalTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation_degrees: 0.0,
            scale: Vec3::ONE,
        }
    }
}
