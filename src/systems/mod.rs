//! Engine systems.
//!
//! Submodules overview
//! - [`propagate_transforms`] – compute world transforms for parent/child hierarchies
//! - [`time`] – update simulation time and delta
//! - [`tween`] – drive every stored tween by the frame delta

pub mod propagate_transforms;
pub mod time;
pub mod tween;
