//! Property accessors: how each primitive reads and writes its target.
//!
//! An accessor names the component it needs, converts between the component
//! and the interpolated value, and may reshape the configured endpoints
//! (offsets, endpoint entities) before a pass starts.

use std::fmt::Debug;
use std::marker::PhantomData;

use bevy_ecs::component::Mutable;
use bevy_ecs::prelude::*;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::anchoredposition::AnchoredPosition;
use crate::components::canvasgroup::CanvasGroup;
use crate::components::color::Color;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;
use crate::components::sprite::Sprite;
use crate::components::tint::Tint;
use crate::components::uiimage::UiImage;
use crate::components::zindex::ZIndex;
use crate::systems::propagate_transforms::{set_world_position, world_position};
use crate::tween::error::TweenError;
use crate::tween::value::{TweenValue, channel_fraction};

pub trait PropertyAccessor: Clone + Debug + Send + Sync + 'static {
    type Value: TweenValue;

    /// Component the accessor needs on the target, for error reporting.
    fn component(&self) -> &'static str;

    fn read(&self, world: &World, target: Entity) -> Option<Self::Value>;

    fn write(&self, world: &mut World, target: Entity, value: Self::Value);

    /// True if `target` carries what the accessor needs.
    fn is_bound(&self, world: &World, target: Entity) -> bool {
        self.read(world, target).is_some()
    }

    fn validate(&self) -> Result<(), TweenError> {
        Ok(())
    }

    /// Called before any value is written: at play, snaps and scrubs.
    fn capture(&mut self, _world: &World, _target: Entity) {}

    /// Absolute start and end values for the configured `from` and `to`.
    fn endpoints(
        &self,
        _world: &World,
        _target: Entity,
        from: Self::Value,
        to: Self::Value,
    ) -> Result<(Self::Value, Self::Value), TweenError> {
        Ok((from, to))
    }

    /// Write the value at `factor` between `start` and `end`.
    fn write_between(
        &self,
        world: &mut World,
        target: Entity,
        start: Self::Value,
        end: Self::Value,
        factor: f32,
    ) {
        self.write(world, target, Self::Value::lerp(start, end, factor));
    }

    fn fraction(&self, start: Self::Value, end: Self::Value, current: Self::Value) -> Option<f32> {
        Self::Value::fraction(start, end, current)
    }

    /// Drop state captured during playback.
    fn clear_runtime(&mut self) {}
}

// ==================== POSITION ====================

/// Which position a position tween reads and writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSpace {
    /// [`MapPosition`], relative to the parent.
    #[default]
    Local,
    /// World position through the hierarchy.
    Global,
    /// [`AnchoredPosition`] of a UI element; z is ignored.
    Anchored,
    /// World position, with endpoints taken from other entities.
    Target,
}

impl PositionSpace {
    pub fn component(self) -> &'static str {
        match self {
            PositionSpace::Anchored => "AnchoredPosition",
            _ => "MapPosition",
        }
    }
}

pub fn read_position(world: &World, target: Entity, space: PositionSpace) -> Option<Vec3> {
    match space {
        PositionSpace::Local => world.get::<MapPosition>(target).map(|p| p.pos),
        PositionSpace::Global | PositionSpace::Target => world_position(world, target),
        PositionSpace::Anchored => world.get::<AnchoredPosition>(target).map(|p| p.pos.extend(0.0)),
    }
}

pub fn write_position(world: &mut World, target: Entity, space: PositionSpace, pos: Vec3) {
    match space {
        PositionSpace::Local => {
            if let Some(mut p) = world.get_mut::<MapPosition>(target) {
                p.pos = pos;
            }
        }
        PositionSpace::Global | PositionSpace::Target => {
            set_world_position(world, target, pos);
        }
        PositionSpace::Anchored => {
            if let Some(mut p) = world.get_mut::<AnchoredPosition>(target) {
                p.pos = pos.truncate();
            }
        }
    }
}

/// World position of an endpoint entity.
pub(crate) fn endpoint_position(
    world: &World,
    entity: Option<Entity>,
    which: &'static str,
) -> Result<Vec3, TweenError> {
    entity
        .and_then(|e| world_position(world, e))
        .ok_or(TweenError::MissingEndpoint(which))
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PositionAccess {
    #[serde(default)]
    pub space: PositionSpace,
    /// Start entity in [`PositionSpace::Target`].
    #[serde(skip)]
    pub from_target: Option<Entity>,
    /// End entity in [`PositionSpace::Target`].
    #[serde(skip)]
    pub to_target: Option<Entity>,
}

impl PropertyAccessor for PositionAccess {
    type Value = Vec3;

    fn component(&self) -> &'static str {
        self.space.component()
    }

    fn read(&self, world: &World, target: Entity) -> Option<Vec3> {
        read_position(world, target, self.space)
    }

    fn write(&self, world: &mut World, target: Entity, value: Vec3) {
        write_position(world, target, self.space, value);
    }

    fn endpoints(&self, world: &World, _target: Entity, from: Vec3, to: Vec3) -> Result<(Vec3, Vec3), TweenError> {
        if self.space != PositionSpace::Target {
            return Ok((from, to));
        }
        Ok((
            endpoint_position(world, self.from_target, "from")?,
            endpoint_position(world, self.to_target, "to")?,
        ))
    }
}

/// Local position relative to where the target was when the tween first
/// touched it.
///
/// The base is taken by the first play, reset, end snap or scrub and kept
/// until the runtime state is cleared, so a group resetting its children
/// ahead of their play does not shift the base.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OffsetAccess {
    #[serde(skip)]
    base: Option<Vec3>,
}

impl OffsetAccess {
    /// Captured base position, if any.
    pub fn base(&self) -> Option<Vec3> {
        self.base
    }
}

impl PropertyAccessor for OffsetAccess {
    type Value = Vec3;

    fn component(&self) -> &'static str {
        "MapPosition"
    }

    fn read(&self, world: &World, target: Entity) -> Option<Vec3> {
        world.get::<MapPosition>(target).map(|p| p.pos)
    }

    fn write(&self, world: &mut World, target: Entity, value: Vec3) {
        if let Some(mut p) = world.get_mut::<MapPosition>(target) {
            p.pos = value;
        }
    }

    fn capture(&mut self, world: &World, target: Entity) {
        if self.base.is_none() {
            self.base = self.read(world, target);
        }
    }

    fn endpoints(&self, world: &World, target: Entity, from: Vec3, to: Vec3) -> Result<(Vec3, Vec3), TweenError> {
        let base = self
            .base
            .or_else(|| self.read(world, target))
            .unwrap_or(Vec3::ZERO);
        Ok((base + from, base + to))
    }

    fn clear_runtime(&mut self) {
        self.base = None;
    }
}

// ==================== TRANSFORM ====================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RotationAccess {}

impl PropertyAccessor for RotationAccess {
    type Value = Vec3;

    fn component(&self) -> &'static str {
        "Rotation"
    }

    fn read(&self, world: &World, target: Entity) -> Option<Vec3> {
        world.get::<Rotation>(target).map(|r| r.degrees)
    }

    fn write(&self, world: &mut World, target: Entity, value: Vec3) {
        if let Some(mut r) = world.get_mut::<Rotation>(target) {
            r.degrees = value;
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ScaleAccess {}

impl PropertyAccessor for ScaleAccess {
    type Value = Vec3;

    fn component(&self) -> &'static str {
        "Scale"
    }

    fn read(&self, world: &World, target: Entity) -> Option<Vec3> {
        world.get::<Scale>(target).map(|s| s.scale)
    }

    fn write(&self, world: &mut World, target: Entity, value: Vec3) {
        if let Some(mut s) = world.get_mut::<Scale>(target) {
            s.scale = value;
        }
    }
}

// ==================== COLOR ====================

/// Component carrying a color a tween can drive.
pub trait ColorComponent: Component<Mutability = Mutable> + Clone + Debug + Default {
    const NAME: &'static str;
    fn color(&self) -> Color;
    fn color_mut(&mut self) -> &mut Color;
}

impl ColorComponent for UiImage {
    const NAME: &'static str = "UiImage";
    fn color(&self) -> Color {
        self.color
    }
    fn color_mut(&mut self) -> &mut Color {
        &mut self.color
    }
}

impl ColorComponent for Tint {
    const NAME: &'static str = "Tint";
    fn color(&self) -> Color {
        self.color
    }
    fn color_mut(&mut self) -> &mut Color {
        &mut self.color
    }
}

/// RGBA color of a graphic. With `ignore_alpha` the current alpha is kept.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ColorAccess<C: ColorComponent> {
    #[serde(default)]
    pub ignore_alpha: bool,
    #[serde(skip)]
    marker: PhantomData<fn() -> C>,
}

impl<C: ColorComponent> ColorAccess<C> {
    pub fn new(ignore_alpha: bool) -> Self {
        Self {
            ignore_alpha,
            marker: PhantomData,
        }
    }
}

impl<C: ColorComponent> PropertyAccessor for ColorAccess<C> {
    type Value = Color;

    fn component(&self) -> &'static str {
        C::NAME
    }

    fn read(&self, world: &World, target: Entity) -> Option<Color> {
        world.get::<C>(target).map(|c| c.color())
    }

    fn write(&self, world: &mut World, target: Entity, value: Color) {
        if let Some(mut c) = world.get_mut::<C>(target) {
            let color = c.color_mut();
            *color = if self.ignore_alpha {
                value.with_alpha(color.a)
            } else {
                value
            };
        }
    }

    fn fraction(&self, start: Color, end: Color, current: Color) -> Option<f32> {
        channel_fraction(start, end, current, if self.ignore_alpha { 3 } else { 4 })
    }
}

/// Component carrying an opacity a tween can drive.
pub trait AlphaComponent: Component<Mutability = Mutable> + Clone + Debug + Default {
    const NAME: &'static str;
    fn alpha(&self) -> f32;
    fn set_alpha(&mut self, alpha: f32);
}

impl AlphaComponent for UiImage {
    const NAME: &'static str = "UiImage";
    fn alpha(&self) -> f32 {
        self.color.a
    }
    fn set_alpha(&mut self, alpha: f32) {
        self.color.a = alpha;
    }
}

impl AlphaComponent for Tint {
    const NAME: &'static str = "Tint";
    fn alpha(&self) -> f32 {
        self.color.a
    }
    fn set_alpha(&mut self, alpha: f32) {
        self.color.a = alpha;
    }
}

impl AlphaComponent for CanvasGroup {
    const NAME: &'static str = "CanvasGroup";
    fn alpha(&self) -> f32 {
        self.alpha
    }
    fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AlphaAccess<C: AlphaComponent> {
    #[serde(skip)]
    marker: PhantomData<fn() -> C>,
}

impl<C: AlphaComponent> PropertyAccessor for AlphaAccess<C> {
    type Value = f32;

    fn component(&self) -> &'static str {
        C::NAME
    }

    fn read(&self, world: &World, target: Entity) -> Option<f32> {
        world.get::<C>(target).map(|c| c.alpha())
    }

    fn write(&self, world: &mut World, target: Entity, value: f32) {
        if let Some(mut c) = world.get_mut::<C>(target) {
            c.set_alpha(value);
        }
    }
}

// ==================== IMAGE / SPRITE ====================

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FillAccess {}

impl PropertyAccessor for FillAccess {
    type Value = f32;

    fn component(&self) -> &'static str {
        "UiImage"
    }

    fn read(&self, world: &World, target: Entity) -> Option<f32> {
        world.get::<UiImage>(target).map(|i| i.fill_amount)
    }

    fn write(&self, world: &mut World, target: Entity, value: f32) {
        if let Some(mut i) = world.get_mut::<UiImage>(target) {
            i.fill_amount = value;
        }
    }
}

/// Sprite key chosen from an ordered frame list. Values are frame indices.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FrameAccess {
    #[serde(default)]
    pub frames: Vec<String>,
}

impl FrameAccess {
    fn set_frame(&self, world: &mut World, target: Entity, index: f32) {
        let Some(last) = self.frames.len().checked_sub(1) else {
            return;
        };
        let index = (index.max(0.0) as usize).min(last);
        if let Some(mut sprite) = world.get_mut::<Sprite>(target) {
            if sprite.tex_key != self.frames[index] {
                sprite.tex_key = self.frames[index].clone();
            }
        }
    }
}

impl PropertyAccessor for FrameAccess {
    type Value = f32;

    fn component(&self) -> &'static str {
        "Sprite"
    }

    /// Index of the current sprite in the frame list, if it is one of them.
    fn read(&self, world: &World, target: Entity) -> Option<f32> {
        let sprite = world.get::<Sprite>(target)?;
        self.frames
            .iter()
            .position(|f| *f == sprite.tex_key)
            .map(|i| i as f32)
    }

    fn write(&self, world: &mut World, target: Entity, value: f32) {
        self.set_frame(world, target, value.round());
    }

    fn is_bound(&self, world: &World, target: Entity) -> bool {
        world.get::<Sprite>(target).is_some()
    }

    fn validate(&self) -> Result<(), TweenError> {
        if self.frames.is_empty() {
            Err(TweenError::NoFrames)
        } else {
            Ok(())
        }
    }

    fn write_between(&self, world: &mut World, target: Entity, start: f32, end: f32, factor: f32) {
        let index = <f32 as TweenValue>::lerp(start, end, factor);
        let index = if end > start { index.ceil() } else { index.floor() };
        self.set_frame(world, target, index);
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct OrderAccess {}

impl PropertyAccessor for OrderAccess {
    type Value = f32;

    fn component(&self) -> &'static str {
        "ZIndex"
    }

    fn read(&self, world: &World, target: Entity) -> Option<f32> {
        world.get::<ZIndex>(target).map(|z| z.0 as f32)
    }

    fn write(&self, world: &mut World, target: Entity, value: f32) {
        if let Some(mut z) = world.get_mut::<ZIndex>(target) {
            z.0 = value.round() as i32;
        }
    }
}
