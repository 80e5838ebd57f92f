//! Sprite renderer color.
//!
//! The [`Tint`] component modulates a sprite's texture color. The color tweens
//! `sprite_color` and `sprite_alpha` write into it.

use bevy_ecs::prelude::Component;

use super::color::Color;

#[derive(Component, Clone, Debug, Copy, PartialEq)]
pub struct Tint {
    pub color: Color,
}

impl Tint {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            color: Color::new(r, g, b, a),
        }
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
        }
    }
}
