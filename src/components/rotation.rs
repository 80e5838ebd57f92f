use bevy_ecs::prelude::Component;
use glam::Vec3;

/// Euler rotation in degrees, applied in x, y, z order.
///
/// Hierarchy propagation only composes the `z` angle.
#[derive(Component, Clone, Debug, Copy, Default, PartialEq)]
pub struct Rotation {
    pub degrees: Vec3,
}

impl Rotation {
    /// Rotation around the z axis only.
    pub fn z(degrees: f32) -> Self {
        Self {
            degrees: Vec3::new(0.0, 0.0, degrees),
        }
    }
}
