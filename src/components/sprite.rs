use bevy_ecs::prelude::Component;

/// Sprite is identified by a texture key. Frame-by-frame tweens swap the key.
#[derive(Component, Clone, Debug, Default, PartialEq)]
pub struct Sprite {
    pub tex_key: String,
}

impl Sprite {
    pub fn new(tex_key: impl Into<String>) -> Self {
        Self {
            tex_key: tex_key.into(),
        }
    }
}
