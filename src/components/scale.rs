use bevy_ecs::prelude::Component;
use glam::Vec3;

#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Scale {
    pub scale: Vec3,
}
impl Scale {
    pub fn new(sx: f32, sy: f32, sz: f32) -> Self {
        Self {
            scale: Vec3::new(sx, sy, sz),
        }
    }
}
impl Default for Scale {
    fn default() -> Self {
        Self { scale: Vec3::ONE }
    }
}
