//! Anchored position of a UI element relative to its anchors.

use bevy_ecs::prelude::Component;
use glam::Vec2;

#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct AnchoredPosition {
    pub pos: Vec2,
}

impl AnchoredPosition {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
        }
    }
}
