//! Aberred Tween library.
//!
//! A tween composition engine on top of `bevy_ecs`: leaf tweens animate one
//! property of one entity, groups play children in sequence or in parallel,
//! and fan-out tweens replicate a template over the children of a parent.
//!
//! This module exposes the engine's ECS components, resources, systems, and
//! events for use in integration tests and as a reusable library.

pub mod components;
pub mod events;
pub mod resources;
pub mod systems;
pub mod tween;
