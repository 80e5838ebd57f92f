use bevy_ecs::prelude::Component;

/// Marks an entity as disabled.
///
/// Fan-out tweens skip inactive children when building their instance list.
#[derive(Component, Clone, Copy, Debug, Default)]
pub struct Inactive;
