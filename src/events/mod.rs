//! Event types exchanged with the tween engine.
//!
//! Submodules:
//! - [`tween`] – playback commands and run completion notifications
pub mod tween;
