//! Copy/paste buffer for tween configurations.

use bevy_ecs::prelude::*;

use crate::tween::Tween;

/// Holds one structural copy of a tween, without playback state.
#[derive(Resource, Default)]
pub struct TweenClipboard {
    content: Option<Tween>,
}

impl TweenClipboard {
    pub fn copy(&mut self, tween: &Tween) {
        self.content = Some(tween.clone_for(None));
    }

    /// A fresh copy of the clipboard content, rebound to `target` when given.
    pub fn paste(&self, target: Option<Entity>) -> Option<Tween> {
        self.content.as_ref().map(|t| t.clone_for(target))
    }

    pub fn clear(&mut self) {
        self.content = None;
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }
}
