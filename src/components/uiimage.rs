//! UI graphic component.
//!
//! Holds the graphic's color and the fill amount used by radial/linear
//! filled images. Written by the `image_color`, `image_alpha` and
//! `image_fill` tweens.

use bevy_ecs::prelude::Component;

use super::color::Color;

#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct UiImage {
    pub color: Color,
    /// Visible fraction of the image, usually in `[0, 1]`.
    pub fill_amount: f32,
}

impl Default for UiImage {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            fill_amount: 1.0,
        }
    }
}
