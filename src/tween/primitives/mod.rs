//! The closed set of primitive (leaf) tween kinds.
//!
//! Every kind implements [`Primitive`], the capability interface the leaf
//! drive loop in [`SimpleTween`](crate::tween::simple::SimpleTween) runs
//! against. Adding a kind means adding a [`TweenKind`] variant, its dispatch
//! arms below and a constructor in the [`TweenFactory`](crate::tween::factory::TweenFactory).

pub mod accessor;
pub mod lerp;
pub mod path;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::canvasgroup::CanvasGroup;
use crate::components::tint::Tint;
use crate::components::uiimage::UiImage;
use crate::tween::error::TweenError;
use accessor::{
    AlphaAccess, ColorAccess, FillAccess, FrameAccess, OffsetAccess, OrderAccess, PositionAccess,
    RotationAccess, ScaleAccess,
};
use lerp::LerpTween;
use path::{BezierShape, MultiShape, PathTween};

/// What a leaf tween does to its target, one step at a time.
///
/// `factor` is the eased interpolation factor of the current pass: 0 at the
/// pass start, the curve's last key value at its end.
pub trait Primitive: Send + Sync {
    /// Check the target and refresh caches. Called when playback starts.
    fn prepare(&mut self, world: &World, target: Entity) -> Result<(), TweenError>;

    /// Snap to the configured start.
    fn reset(&mut self, world: &mut World, target: Entity);

    /// Snap to the configured end.
    fn finish(&mut self, world: &mut World, target: Entity);

    /// Fix the endpoints of the first pass.
    fn begin(&mut self, world: &World, target: Entity, reverse: bool) -> Result<(), TweenError>;

    /// Interpolation factor matching the target's current value.
    fn resume_fraction(&self, world: &World, target: Entity) -> Option<f32>;

    fn go_to_start(&mut self, world: &mut World, target: Entity);

    fn apply(&mut self, world: &mut World, target: Entity, factor: f32);

    /// Turn around: the next pass starts where the target is now.
    fn ping_pong(&mut self, world: &World, target: Entity);

    /// Write the value at `factor` between the configured endpoints.
    fn scrub(&mut self, world: &mut World, target: Entity, factor: f32);

    /// Forget everything derived during playback.
    fn clear_runtime(&mut self);
}

pub type PositionTween = LerpTween<PositionAccess>;
pub type OffsetPositionTween = LerpTween<OffsetAccess>;
pub type BezierPositionTween = PathTween<BezierShape>;
pub type MultiPositionTween = PathTween<MultiShape>;
pub type RotationTween = LerpTween<RotationAccess>;
pub type ScaleTween = LerpTween<ScaleAccess>;
pub type ImageColorTween = LerpTween<ColorAccess<UiImage>>;
pub type SpriteColorTween = LerpTween<ColorAccess<Tint>>;
pub type ImageAlphaTween = LerpTween<AlphaAccess<UiImage>>;
pub type SpriteAlphaTween = LerpTween<AlphaAccess<Tint>>;
pub type CanvasGroupAlphaTween = LerpTween<AlphaAccess<CanvasGroup>>;
pub type ImageFillTween = LerpTween<FillAccess>;
pub type FrameByFrameTween = LerpTween<FrameAccess>;
pub type SortingOrderTween = LerpTween<OrderAccess>;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TweenKind {
    Position(PositionTween),
    OffsetPosition(OffsetPositionTween),
    BezierPosition(BezierPositionTween),
    MultiPosition(MultiPositionTween),
    Rotation(RotationTween),
    Scale(ScaleTween),
    ImageColor(ImageColorTween),
    SpriteColor(SpriteColorTween),
    ImageAlpha(ImageAlphaTween),
    SpriteAlpha(SpriteAlphaTween),
    CanvasGroupAlpha(CanvasGroupAlphaTween),
    ImageFill(ImageFillTween),
    FrameByFrame(FrameByFrameTween),
    SortingOrder(SortingOrderTween),
}

impl TweenKind {
    /// Registry name of the kind, identical to its serialized tag.
    pub fn name(&self) -> &'static str {
        match self {
            TweenKind::Position(_) => "position",
            TweenKind::OffsetPosition(_) => "offset_position",
            TweenKind::BezierPosition(_) => "bezier_position",
            TweenKind::MultiPosition(_) => "multi_position",
            TweenKind::Rotation(_) => "rotation",
            TweenKind::Scale(_) => "scale",
            TweenKind::ImageColor(_) => "image_color",
            TweenKind::SpriteColor(_) => "sprite_color",
            TweenKind::ImageAlpha(_) => "image_alpha",
            TweenKind::SpriteAlpha(_) => "sprite_alpha",
            TweenKind::CanvasGroupAlpha(_) => "canvas_group_alpha",
            TweenKind::ImageFill(_) => "image_fill",
            TweenKind::FrameByFrame(_) => "frame_by_frame",
            TweenKind::SortingOrder(_) => "sorting_order",
        }
    }

    pub fn primitive(&self) -> &dyn Primitive {
        match self {
            TweenKind::Position(p) => p,
            TweenKind::OffsetPosition(p) => p,
            TweenKind::BezierPosition(p) => p,
            TweenKind::MultiPosition(p) => p,
            TweenKind::Rotation(p) => p,
            TweenKind::Scale(p) => p,
            TweenKind::ImageColor(p) => p,
            TweenKind::SpriteColor(p) => p,
            TweenKind::ImageAlpha(p) => p,
            TweenKind::SpriteAlpha(p) => p,
            TweenKind::CanvasGroupAlpha(p) => p,
            TweenKind::ImageFill(p) => p,
            TweenKind::FrameByFrame(p) => p,
            TweenKind::SortingOrder(p) => p,
        }
    }

    pub fn primitive_mut(&mut self) -> &mut dyn Primitive {
        match self {
            TweenKind::Position(p) => p,
            TweenKind::OffsetPosition(p) => p,
            TweenKind::BezierPosition(p) => p,
            TweenKind::MultiPosition(p) => p,
            TweenKind::Rotation(p) => p,
            TweenKind::Scale(p) => p,
            TweenKind::ImageColor(p) => p,
            TweenKind::SpriteColor(p) => p,
            TweenKind::ImageAlpha(p) => p,
            TweenKind::SpriteAlpha(p) => p,
            TweenKind::CanvasGroupAlpha(p) => p,
            TweenKind::ImageFill(p) => p,
            TweenKind::FrameByFrame(p) => p,
            TweenKind::SortingOrder(p) => p,
        }
    }

    /// Deep copy of the configuration without any playback state.
    pub fn clone_config(&self) -> TweenKind {
        let mut kind = self.clone();
        kind.primitive_mut().clear_runtime();
        kind
    }
}
