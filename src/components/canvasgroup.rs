use bevy_ecs::prelude::Component;

/// Alpha multiplier shared by a whole UI subtree.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct CanvasGroup {
    pub alpha: f32,
}

impl Default for CanvasGroup {
    fn default() -> Self {
        Self { alpha: 1.0 }
    }
}
