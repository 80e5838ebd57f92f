//! ECS resources made available to systems.
//!
//! Overview
//! - `clipboard` – copy/paste buffer for tween configurations
//! - `tweenconfig` – defaults for new tweens, loaded from an INI file
//! - `tweenstore` – the tweens driven by the engine, addressed by id
//! - `worldtime` – simulation time and delta
pub mod clipboard;
pub mod tweenconfig;
pub mod tweenstore;
pub mod worldtime;
