//! Tween defaults resource.
//!
//! Holds the values new tweens are created with, loaded from an INI file.
//! Missing keys keep their defaults.
//!
//! # Configuration File Format
//!
//! ```ini
//! [tween]
//! duration = 1.0
//! delay = 0.0
//!
//! [path]
//! precision = 0.05
//! alpha = 1.0
//!
//! [fanout]
//! delay = 0.1
//!
//! [playback]
//! max_delta = 0.1
//! ```

use bevy_ecs::prelude::*;
use configparser::ini::Ini;
use log::{info, warn};
use std::path::PathBuf;

use crate::tween::path::MAX_PRECISION;

/// Default safe values for startup
const DEFAULT_DURATION: f32 = 1.0;
const DEFAULT_DELAY: f32 = 0.0;
const DEFAULT_PATH_PRECISION: f32 = 0.05;
const DEFAULT_PATH_ALPHA: f32 = 1.0;
const DEFAULT_FANOUT_DELAY: f32 = 0.1;
const DEFAULT_MAX_DELTA: f32 = 0.1;
const DEFAULT_CONFIG_PATH: &str = "./tween.ini";

#[derive(Resource, Debug, Clone)]
pub struct TweenConfig {
    /// Duration of newly created leaf tweens, in seconds.
    pub duration: f32,
    /// Start delay of newly created leaf tweens.
    pub delay: f32,
    /// Sampling step of Bézier and Catmull-Rom paths.
    pub path_precision: f32,
    /// Catmull-Rom parameterization (0 uniform, 0.5 centripetal, 1 chordal).
    pub path_alpha: f32,
    /// Stagger between fan-out instances.
    pub fanout_delay: f32,
    /// Largest frame delta fed to tweens. 0 disables the clamp.
    pub max_delta: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for TweenConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl TweenConfig {
    pub fn new() -> Self {
        Self {
            duration: DEFAULT_DURATION,
            delay: DEFAULT_DELAY,
            path_precision: DEFAULT_PATH_PRECISION,
            path_alpha: DEFAULT_PATH_ALPHA,
            fanout_delay: DEFAULT_FANOUT_DELAY,
            max_delta: DEFAULT_MAX_DELTA,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a configuration bound to a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Out-of-range values are ignored with a warning and keep their
    /// current value. Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;

        let get = |section: &str, key: &str| -> Option<f32> {
            config.getfloat(section, key).ok().flatten().map(|v| v as f32)
        };

        // [tween] section
        if let Some(duration) = get("tween", "duration") {
            accept(&mut self.duration, duration, "tween.duration", |v| v > 0.0);
        }
        if let Some(delay) = get("tween", "delay") {
            accept(&mut self.delay, delay, "tween.delay", |v| v >= 0.0);
        }

        // [path] section
        if let Some(precision) = get("path", "precision") {
            accept(&mut self.path_precision, precision, "path.precision", |v| {
                v > 0.0 && v <= MAX_PRECISION
            });
        }
        if let Some(alpha) = get("path", "alpha") {
            accept(&mut self.path_alpha, alpha, "path.alpha", |v| (0.0..=1.0).contains(&v));
        }

        // [fanout] section
        if let Some(delay) = get("fanout", "delay") {
            accept(&mut self.fanout_delay, delay, "fanout.delay", |v| v >= 0.0);
        }

        // [playback] section
        if let Some(max_delta) = get("playback", "max_delta") {
            accept(&mut self.max_delta, max_delta, "playback.max_delta", |v| v >= 0.0);
        }

        info!(
            "Loaded tween config: duration={}, delay={}, precision={}, alpha={}, fanout delay={}, max_delta={}",
            self.duration,
            self.delay,
            self.path_precision,
            self.path_alpha,
            self.fanout_delay,
            self.max_delta
        );

        Ok(())
    }

    /// Save configuration to the INI file.
    ///
    /// Creates the file if it doesn't exist.
    pub fn save_to_file(&self) -> Result<(), String> {
        let mut config = Ini::new();

        config.set("tween", "duration", Some(self.duration.to_string()));
        config.set("tween", "delay", Some(self.delay.to_string()));
        config.set("path", "precision", Some(self.path_precision.to_string()));
        config.set("path", "alpha", Some(self.path_alpha.to_string()));
        config.set("fanout", "delay", Some(self.fanout_delay.to_string()));
        config.set("playback", "max_delta", Some(self.max_delta.to_string()));

        config
            .write(&self.config_path)
            .map_err(|e| format!("Failed to save config file: {}", e))?;

        info!("Saved tween config to {:?}", self.config_path);
        Ok(())
    }

    /// Clamp a frame delta to `max_delta` when the clamp is enabled.
    pub fn clamp_delta(&self, dt: f32) -> f32 {
        if self.max_delta > 0.0 {
            dt.min(self.max_delta)
        } else {
            dt
        }
    }
}

fn accept(slot: &mut f32, value: f32, key: &str, valid: impl Fn(f32) -> bool) {
    if value.is_finite() && valid(value) {
        *slot = value;
    } else {
        warn!("Ignoring out-of-range config value {key} = {value}");
    }
}
