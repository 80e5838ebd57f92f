//! Position tweens that follow an arc-length parameterized path.

use bevy_ecs::prelude::*;
use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use super::Primitive;
use super::accessor::{PositionSpace, endpoint_position, read_position, write_position};
use crate::tween::error::TweenError;
use crate::tween::path::{MAX_PRECISION, PathTable, check_precision};

/// Default sampling step for curved paths.
pub const DEFAULT_PRECISION: f32 = 0.05;
/// Smallest sampling step accepted for multi-point paths.
pub const MIN_MULTI_PRECISION: f32 = 0.001;
/// Default Catmull-Rom knot exponent.
pub const DEFAULT_ALPHA: f32 = 1.0;

/// Source geometry of a path tween.
pub trait PathShape: Clone + std::fmt::Debug + Send + Sync + 'static {
    fn build(&self, world: &World, space: PositionSpace) -> Result<PathTable, TweenError>;

    /// Reject configurations that can never produce a path.
    fn validate(&self) -> Result<(), TweenError> {
        Ok(())
    }

    fn clear_runtime(&mut self) {}
}

/// Cubic Bézier between `from` and `to`.
///
/// The inner control points are `from + offset1` and `to + offset2`. In
/// [`PositionSpace::Target`] the endpoints come from `targets` instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BezierShape {
    pub from: Vec3,
    pub to: Vec3,
    #[serde(default)]
    pub offset1: Vec3,
    #[serde(default)]
    pub offset2: Vec3,
    #[serde(default = "default_precision")]
    pub precision: f32,
    /// Start and end entities in [`PositionSpace::Target`].
    #[serde(skip)]
    pub targets: Option<[Entity; 2]>,
}

fn default_precision() -> f32 {
    DEFAULT_PRECISION
}

fn default_alpha() -> f32 {
    DEFAULT_ALPHA
}

impl Default for BezierShape {
    fn default() -> Self {
        Self {
            from: Vec3::ZERO,
            to: Vec3::ZERO,
            offset1: Vec3::ZERO,
            offset2: Vec3::ZERO,
            precision: DEFAULT_PRECISION,
            targets: None,
        }
    }
}

impl PathShape for BezierShape {
    fn build(&self, world: &World, space: PositionSpace) -> Result<PathTable, TweenError> {
        let (b0, b3) = if space == PositionSpace::Target {
            let [from, to] = self.targets.map_or([None, None], |[a, b]| [Some(a), Some(b)]);
            (
                endpoint_position(world, from, "from")?,
                endpoint_position(world, to, "to")?,
            )
        } else {
            (self.from, self.to)
        };
        PathTable::bezier(b0, b0 + self.offset1, b3 + self.offset2, b3, self.precision)
    }

    fn validate(&self) -> Result<(), TweenError> {
        check_precision(self.precision)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineType {
    /// Straight segments between waypoints.
    #[default]
    Line,
    /// Smooth spline through every waypoint.
    CatmullRom,
}

/// Path through two or more waypoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MultiShape {
    #[serde(default)]
    pub line_type: LineType,
    #[serde(default)]
    pub waypoints: Vec<Vec3>,
    #[serde(default = "default_precision")]
    pub precision: f32,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    /// Waypoint entities in [`PositionSpace::Target`].
    #[serde(skip)]
    pub targets: Vec<Entity>,
}

impl Default for MultiShape {
    fn default() -> Self {
        Self {
            line_type: LineType::Line,
            waypoints: Vec::new(),
            precision: DEFAULT_PRECISION,
            alpha: DEFAULT_ALPHA,
            targets: Vec::new(),
        }
    }
}

impl PathShape for MultiShape {
    fn build(&self, world: &World, space: PositionSpace) -> Result<PathTable, TweenError> {
        let points = if space == PositionSpace::Target {
            self.targets
                .iter()
                .map(|&e| endpoint_position(world, Some(e), "waypoint"))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            self.waypoints.clone()
        };
        match self.line_type {
            LineType::Line => PathTable::line(&points),
            LineType::CatmullRom => PathTable::catmull_rom(&points, self.precision, self.alpha),
        }
    }

    fn validate(&self) -> Result<(), TweenError> {
        if self.line_type == LineType::CatmullRom && self.precision < MIN_MULTI_PRECISION {
            return Err(TweenError::InvalidPrecision {
                value: self.precision,
                min: MIN_MULTI_PRECISION,
                max: MAX_PRECISION,
            });
        }
        Ok(())
    }
}

/// A position tween moving along `shape` at constant speed.
///
/// The sample table is built lazily and dropped whenever the shape is edited
/// through [`shape_mut`](Self::shape_mut). In [`PositionSpace::Target`] it is
/// rebuilt at every play since the endpoint entities may have moved.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathTween<S: PathShape> {
    #[serde(default)]
    pub space: PositionSpace,
    #[serde(flatten)]
    shape: S,
    #[serde(skip)]
    table: Option<PathTable>,
    #[serde(skip)]
    reverse: bool,
}

impl<S: PathShape> PathTween<S> {
    pub fn new(space: PositionSpace, shape: S) -> Self {
        Self {
            space,
            shape,
            table: None,
            reverse: false,
        }
    }

    pub fn shape(&self) -> &S {
        &self.shape
    }

    /// Edit the shape. Invalidates the sample table.
    pub fn shape_mut(&mut self) -> &mut S {
        self.table = None;
        &mut self.shape
    }

    /// The current sample table, if one has been built.
    pub fn table(&self) -> Option<&PathTable> {
        self.table.as_ref()
    }

    fn ensure_table(&mut self, world: &World) -> Option<&PathTable> {
        if self.table.is_none() {
            match self.shape.build(world, self.space) {
                Ok(table) => self.table = Some(table),
                Err(e) => {
                    warn!(target: "tween", "cannot build path: {e}");
                    return None;
                }
            }
        }
        self.table.as_ref()
    }

    fn write_at(&self, world: &mut World, target: Entity, s: f32) {
        if let Some(table) = &self.table {
            let pos = table.sample(s);
            write_position(world, target, self.space, pos);
        }
    }
}

impl<S: PathShape> Primitive for PathTween<S> {
    fn prepare(&mut self, world: &World, target: Entity) -> Result<(), TweenError> {
        self.shape.validate()?;
        if read_position(world, target, self.space).is_none() {
            return Err(TweenError::MissingComponent {
                entity: target,
                component: self.space.component(),
            });
        }
        if self.table.is_none() || self.space == PositionSpace::Target {
            self.table = Some(self.shape.build(world, self.space)?);
        }
        Ok(())
    }

    fn reset(&mut self, world: &mut World, target: Entity) {
        if let Some(first) = self.ensure_table(world).map(PathTable::first) {
            write_position(world, target, self.space, first);
        }
    }

    fn finish(&mut self, world: &mut World, target: Entity) {
        if let Some(last) = self.ensure_table(world).map(PathTable::last) {
            write_position(world, target, self.space, last);
        }
    }

    fn begin(&mut self, _world: &World, _target: Entity, reverse: bool) -> Result<(), TweenError> {
        self.reverse = reverse;
        Ok(())
    }

    fn resume_fraction(&self, world: &World, target: Entity) -> Option<f32> {
        let table = self.table.as_ref()?;
        let s = table.locate(read_position(world, target, self.space)?);
        Some(if self.reverse { 1.0 - s } else { s })
    }

    fn go_to_start(&mut self, world: &mut World, target: Entity) {
        self.apply(world, target, 0.0);
    }

    fn apply(&mut self, world: &mut World, target: Entity, factor: f32) {
        let s = if self.reverse { 1.0 - factor } else { factor };
        self.write_at(world, target, s);
    }

    fn ping_pong(&mut self, _world: &World, _target: Entity) {
        self.reverse = !self.reverse;
    }

    fn scrub(&mut self, world: &mut World, target: Entity, factor: f32) {
        if self.ensure_table(world).is_some() {
            self.write_at(world, target, factor);
        }
    }

    fn clear_runtime(&mut self) {
        self.table = None;
        self.reverse = false;
        self.shape.clear_runtime();
    }
}
