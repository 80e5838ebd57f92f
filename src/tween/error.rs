//! Error type shared by tween construction and playback.

use bevy_ecs::entity::Entity;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TweenError {
    #[error("easing curve has no keyframes")]
    EmptyCurve,
    #[error("easing curve keyframes are not sorted by time")]
    UnsortedCurve,
    #[error("easing curve contains a non-finite value")]
    NonFiniteCurve,
    #[error("easing curve key time {0} is outside [0, 1]")]
    CurveKeyOutOfRange(f32),
    #[error("duration must be greater than zero, got {0}")]
    InvalidDuration(f32),
    #[error("start delay must not be negative, got {0}")]
    InvalidDelay(f32),
    #[error("path precision must be in ({min}, {max}], got {value}")]
    InvalidPrecision { value: f32, min: f32, max: f32 },
    #[error("catmull-rom alpha must be in [0, 1], got {0}")]
    InvalidAlpha(f32),
    #[error("path needs at least {needed} points, got {got}")]
    NotEnoughPoints { needed: usize, got: usize },
    #[error("frame-by-frame tween has no frames")]
    NoFrames,
    #[error("tween has no target entity")]
    NoTarget,
    #[error("target entity {0} does not exist")]
    TargetDespawned(Entity),
    #[error("entity {entity} has no {component} component")]
    MissingComponent {
        entity: Entity,
        component: &'static str,
    },
    #[error("{0} endpoint entity is missing or has no position")]
    MissingEndpoint(&'static str),
    #[error("fan-out tween has no parent entity")]
    NoParent,
}
