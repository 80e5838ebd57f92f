use bevy_ecs::prelude::Resource;

/// Simulation clock shared by the systems.
#[derive(Resource, Clone, Copy, Debug)]
pub struct WorldTime {
    pub elapsed: f32,
    /// Scaled delta of the current frame.
    pub delta: f32,
    pub time_scale: f32,
}

impl Default for WorldTime {
    fn default() -> Self {
        WorldTime {
            elapsed: 0.0,
            delta: 0.0,
            time_scale: 1.0,
        }
    }
}

impl WorldTime {
    /// Clock running at `time_scale`. Pausing all tweens is `with_scale(0.0)`.
    pub fn with_scale(time_scale: f32) -> Self {
        WorldTime {
            time_scale,
            ..Self::default()
        }
    }
}
