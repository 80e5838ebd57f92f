//! Registry of leaf tween constructors, keyed by kind name.
//!
//! Each constructor produces a [`TweenKind`] with neutral endpoints; the
//! factory wraps it in a [`SimpleTween`] carrying the configured duration
//! and delay. Hosts may register extra presets under their own names.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::{debug, error};
use rustc_hash::FxHashMap;

use super::SimpleTween;
use super::primitives::accessor::{
    AlphaAccess, ColorAccess, FillAccess, FrameAccess, OffsetAccess, OrderAccess, PositionAccess,
    PositionSpace, RotationAccess, ScaleAccess,
};
use super::primitives::lerp::LerpTween;
use super::primitives::path::{BezierShape, MultiShape, PathTween};
use super::primitives::TweenKind;
use crate::components::color::Color;
use crate::resources::tweenconfig::TweenConfig;

pub type KindConstructor = fn(&TweenConfig) -> TweenKind;

#[derive(Resource)]
pub struct TweenFactory {
    constructors: FxHashMap<&'static str, KindConstructor>,
    config: TweenConfig,
}

impl Default for TweenFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl TweenFactory {
    /// Factory with every built-in kind and default settings.
    pub fn new() -> Self {
        Self::from_config(&TweenConfig::new())
    }

    pub fn from_config(config: &TweenConfig) -> Self {
        let mut factory = TweenFactory {
            constructors: FxHashMap::default(),
            config: config.clone(),
        };
        factory.register("position", position);
        factory.register("offset_position", offset_position);
        factory.register("bezier_position", bezier_position);
        factory.register("multi_position", multi_position);
        factory.register("rotation", rotation);
        factory.register("scale", scale);
        factory.register("image_color", image_color);
        factory.register("sprite_color", sprite_color);
        factory.register("image_alpha", image_alpha);
        factory.register("sprite_alpha", sprite_alpha);
        factory.register("canvas_group_alpha", canvas_group_alpha);
        factory.register("image_fill", image_fill);
        factory.register("frame_by_frame", frame_by_frame);
        factory.register("sorting_order", sorting_order);
        factory
    }

    /// Insert a constructor, replacing any previous one with the same name.
    pub fn register(&mut self, name: &'static str, constructor: KindConstructor) {
        if self.constructors.insert(name, constructor).is_some() {
            debug!(target: "tween", "replaced tween constructor '{name}'");
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Build a leaf tween of kind `name` bound to `target`.
    pub fn create(&self, name: &str, target: Option<Entity>) -> Option<SimpleTween> {
        let constructor = self.constructors.get(name)?;
        let mut tween = SimpleTween::new(constructor(&self.config));
        tween.set_target(target);
        if let Err(e) = tween.set_duration(self.config.duration) {
            error!(target: "tween", "configured duration rejected: {e}");
        }
        if let Err(e) = tween.set_start_delay(self.config.delay) {
            error!(target: "tween", "configured delay rejected: {e}");
        }
        Some(tween)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.constructors.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn config(&self) -> &TweenConfig {
        &self.config
    }
}

fn position(_: &TweenConfig) -> TweenKind {
    TweenKind::Position(LerpTween::new(Vec3::ZERO, Vec3::ZERO, PositionAccess::default()))
}

fn offset_position(_: &TweenConfig) -> TweenKind {
    TweenKind::OffsetPosition(LerpTween::new(Vec3::ZERO, Vec3::ZERO, OffsetAccess::default()))
}

fn bezier_position(config: &TweenConfig) -> TweenKind {
    let shape = BezierShape {
        precision: config.path_precision,
        ..BezierShape::default()
    };
    TweenKind::BezierPosition(PathTween::new(PositionSpace::Local, shape))
}

fn multi_position(config: &TweenConfig) -> TweenKind {
    let shape = MultiShape {
        precision: config.path_precision,
        alpha: config.path_alpha,
        ..MultiShape::default()
    };
    TweenKind::MultiPosition(PathTween::new(PositionSpace::Local, shape))
}

fn rotation(_: &TweenConfig) -> TweenKind {
    TweenKind::Rotation(LerpTween::new(Vec3::ZERO, Vec3::ZERO, RotationAccess::default()))
}

fn scale(_: &TweenConfig) -> TweenKind {
    TweenKind::Scale(LerpTween::new(Vec3::ZERO, Vec3::ONE, ScaleAccess::default()))
}

fn image_color(_: &TweenConfig) -> TweenKind {
    TweenKind::ImageColor(LerpTween::new(Color::WHITE, Color::BLACK, ColorAccess::new(false)))
}

fn sprite_color(_: &TweenConfig) -> TweenKind {
    TweenKind::SpriteColor(LerpTween::new(Color::WHITE, Color::BLACK, ColorAccess::new(false)))
}

fn image_alpha(_: &TweenConfig) -> TweenKind {
    TweenKind::ImageAlpha(LerpTween::new(1.0, 0.0, AlphaAccess::default()))
}

fn sprite_alpha(_: &TweenConfig) -> TweenKind {
    TweenKind::SpriteAlpha(LerpTween::new(1.0, 0.0, AlphaAccess::default()))
}

fn canvas_group_alpha(_: &TweenConfig) -> TweenKind {
    TweenKind::CanvasGroupAlpha(LerpTween::new(1.0, 0.0, AlphaAccess::default()))
}

fn image_fill(_: &TweenConfig) -> TweenKind {
    TweenKind::ImageFill(LerpTween::new(0.0, 1.0, FillAccess::default()))
}

fn frame_by_frame(_: &TweenConfig) -> TweenKind {
    TweenKind::FrameByFrame(LerpTween::new(0.0, 0.0, FrameAccess::default()))
}

fn sorting_order(_: &TweenConfig) -> TweenKind {
    TweenKind::SortingOrder(LerpTween::new(0.0, 0.0, OrderAccess::default()))
}
