//! Leaf tween: one primitive driven by the delay / pass / loop state machine.

use bevy_ecs::prelude::*;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::cancel::{CancelScope, CancelToken};
use super::curve::EasingCurve;
use super::error::TweenError;
use super::primitives::TweenKind;
use super::{LoopMode, Outcome, PlayOptions, Step};

/// Shortest pass the drive loop will run, in seconds.
const MIN_PASS: f32 = 1e-4;

pub const DEFAULT_DURATION: f32 = 1.0;

fn default_duration() -> f32 {
    DEFAULT_DURATION
}

#[derive(Debug, Clone, Copy)]
enum LeafPhase {
    Delay { remaining: f32 },
    Pass { time: f32 },
}

#[derive(Debug)]
struct LeafRun {
    scope: CancelScope,
    target: Entity,
    reverse: bool,
    /// Still to resume from the current value; cleared after the first pass starts.
    from_current: bool,
    phase: LeafPhase,
}

/// A leaf tween.
///
/// The target is a weak handle: the tween never despawns it, and a target
/// that disappears mid-run aborts only this tween.
#[derive(Debug, Serialize, Deserialize)]
pub struct SimpleTween {
    #[serde(skip)]
    target: Option<Entity>,
    #[serde(default)]
    start_delay: f32,
    #[serde(default = "default_duration")]
    duration: f32,
    #[serde(default)]
    loop_mode: LoopMode,
    #[serde(default)]
    curve: EasingCurve,
    #[serde(flatten)]
    kind: TweenKind,
    #[serde(skip)]
    reverse_curve: Option<EasingCurve>,
    #[serde(skip)]
    run: Option<LeafRun>,
    #[serde(skip)]
    outcome: Option<Outcome>,
}

impl SimpleTween {
    /// A tween with a one second duration, no delay, a single pass and a linear curve.
    pub fn new(kind: TweenKind) -> Self {
        Self {
            target: None,
            start_delay: 0.0,
            duration: DEFAULT_DURATION,
            loop_mode: LoopMode::Once,
            curve: EasingCurve::linear(),
            kind,
            reverse_curve: None,
            run: None,
            outcome: None,
        }
    }

    pub fn with_target(mut self, target: Entity) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_duration(mut self, duration: f32) -> Result<Self, TweenError> {
        self.set_duration(duration)?;
        Ok(self)
    }

    pub fn with_start_delay(mut self, delay: f32) -> Result<Self, TweenError> {
        self.set_start_delay(delay)?;
        Ok(self)
    }

    pub fn with_loop_mode(mut self, mode: LoopMode) -> Self {
        self.loop_mode = mode;
        self
    }

    pub fn with_curve(mut self, curve: EasingCurve) -> Self {
        self.set_curve(curve);
        self
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }

    pub fn start_delay(&self) -> f32 {
        self.start_delay
    }

    pub fn set_start_delay(&mut self, delay: f32) -> Result<(), TweenError> {
        if !delay.is_finite() || delay < 0.0 {
            return Err(TweenError::InvalidDelay(delay));
        }
        self.start_delay = delay;
        Ok(())
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: f32) -> Result<(), TweenError> {
        if !duration.is_finite() || duration <= 0.0 {
            return Err(TweenError::InvalidDuration(duration));
        }
        self.duration = duration;
        Ok(())
    }

    pub fn loop_mode(&self) -> LoopMode {
        self.loop_mode
    }

    pub fn set_loop_mode(&mut self, mode: LoopMode) {
        self.loop_mode = mode;
    }

    pub fn curve(&self) -> &EasingCurve {
        &self.curve
    }

    /// Replace the curve. The mirrored curve is derived again on the next reverse play.
    pub fn set_curve(&mut self, curve: EasingCurve) {
        self.curve = curve;
        self.reverse_curve = None;
    }

    /// Mirrored curve, once a reverse play has derived it.
    pub fn reverse_curve(&self) -> Option<&EasingCurve> {
        self.reverse_curve.as_ref()
    }

    pub fn kind(&self) -> &TweenKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut TweenKind {
        &mut self.kind
    }

    pub fn is_playing(&self) -> bool {
        self.run.is_some()
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// `start_delay + duration`.
    pub fn length(&self) -> f32 {
        self.start_delay + self.duration
    }

    pub fn validate(&self) -> Result<(), TweenError> {
        if !self.start_delay.is_finite() || self.start_delay < 0.0 {
            return Err(TweenError::InvalidDelay(self.start_delay));
        }
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(TweenError::InvalidDuration(self.duration));
        }
        Ok(())
    }

    /// Seconds covered by one pass.
    fn pass_duration(&self) -> f32 {
        let d = match self.loop_mode {
            LoopMode::PingPong => self.duration * 0.5,
            _ => self.duration,
        };
        d.max(MIN_PASS)
    }

    fn resolve_target(&self, world: &World) -> Result<Entity, TweenError> {
        let target = self.target.ok_or(TweenError::NoTarget)?;
        if world.get_entity(target).is_err() {
            return Err(TweenError::TargetDespawned(target));
        }
        Ok(target)
    }

    fn abort(&mut self, error: TweenError) {
        warn!(target: "tween", "{} tween aborted: {error}", self.kind.name());
        self.run = None;
        self.outcome = Some(Outcome::Aborted(error));
    }

    pub fn play(&mut self, world: &mut World, options: PlayOptions, parent: Option<&CancelToken>) {
        self.cancel();
        self.outcome = None;

        let target = match self.resolve_target(world) {
            Ok(target) => target,
            Err(e) => return self.abort(e),
        };
        if let Err(e) = self.kind.primitive_mut().prepare(world, target) {
            return self.abort(e);
        }
        if options.reverse && self.reverse_curve.is_none() {
            self.reverse_curve = Some(self.curve.reversed());
        }
        if !options.from_current {
            if options.reverse {
                self.kind.primitive_mut().finish(world, target);
            } else {
                self.kind.primitive_mut().reset(world, target);
            }
        }

        debug!(target: "tween", "play {} on {target} ({options:?})", self.kind.name());
        self.run = Some(LeafRun {
            scope: CancelScope::linked(parent),
            target,
            reverse: options.reverse,
            from_current: options.from_current,
            phase: LeafPhase::Delay {
                remaining: self.start_delay,
            },
        });
    }

    /// Stop the run in flight. The target keeps its current value.
    pub fn cancel(&mut self) {
        if let Some(run) = self.run.take() {
            debug!(target: "tween", "cancel {} on {}", self.kind.name(), run.target);
            self.outcome = Some(Outcome::Cancelled);
        }
    }

    pub fn tick(&mut self, world: &mut World, dt: f32) -> Step {
        let Some(mut run) = self.run.take() else {
            return Step::Done { leftover: dt };
        };
        if run.scope.is_cancelled() {
            debug!(target: "tween", "{} run cancelled by its parent", self.kind.name());
            self.outcome = Some(Outcome::Cancelled);
            return Step::Done { leftover: dt };
        }
        if world.get_entity(run.target).is_err() {
            self.abort(TweenError::TargetDespawned(run.target));
            return Step::Done { leftover: dt };
        }
        match self.advance(world, &mut run, dt.max(0.0)) {
            Ok(Step::Running) => {
                self.run = Some(run);
                Step::Running
            }
            Ok(done) => {
                self.outcome = Some(Outcome::Completed);
                done
            }
            Err(e) => {
                self.abort(e);
                Step::Done { leftover: dt }
            }
        }
    }

    fn advance(&mut self, world: &mut World, run: &mut LeafRun, mut budget: f32) -> Result<Step, TweenError> {
        let span = self.pass_duration();
        let target = run.target;
        let curve = match (run.reverse, &self.reverse_curve) {
            (true, Some(reverse)) => reverse,
            _ => &self.curve,
        };
        let primitive = self.kind.primitive_mut();

        let mut time = match run.phase {
            LeafPhase::Delay { remaining } => {
                if budget < remaining {
                    run.phase = LeafPhase::Delay {
                        remaining: remaining - budget,
                    };
                    return Ok(Step::Running);
                }
                budget -= remaining;
                primitive.begin(world, target, run.reverse)?;
                let resumed = if run.from_current {
                    run.from_current = false;
                    primitive
                        .resume_fraction(world, target)
                        .map(|fraction| curve.solve(fraction).clamp(0.0, 1.0) * span)
                } else {
                    None
                };
                resumed.unwrap_or_else(|| {
                    primitive.go_to_start(world, target);
                    0.0
                })
            }
            LeafPhase::Pass { time } => time,
        };

        time += budget;
        loop {
            if time < span {
                primitive.apply(world, target, curve.evaluate(time / span));
                run.phase = LeafPhase::Pass { time };
                return Ok(Step::Running);
            }
            primitive.apply(world, target, curve.last_value());
            time -= span;
            let period = match self.loop_mode {
                LoopMode::Once => return Ok(Step::Done { leftover: time }),
                LoopMode::Loop => {
                    primitive.go_to_start(world, target);
                    span
                }
                LoopMode::PingPong => {
                    primitive.ping_pong(world, target);
                    2.0 * span
                }
            };
            // Whole periods leave the state unchanged.
            if time >= period {
                time %= period;
            }
        }
    }

    /// Snap the target to the start value.
    pub fn reset_to_start(&mut self, world: &mut World) {
        match self.resolve_target(world) {
            Ok(target) => self.kind.primitive_mut().reset(world, target),
            Err(e) => warn!(target: "tween", "cannot reset {}: {e}", self.kind.name()),
        }
    }

    /// Snap the target to the end value.
    pub fn jump_to_end(&mut self, world: &mut World) {
        match self.resolve_target(world) {
            Ok(target) => self.kind.primitive_mut().finish(world, target),
            Err(e) => warn!(target: "tween", "cannot finish {}: {e}", self.kind.name()),
        }
    }

    /// Write the value the curve gives at normalized time `t`.
    ///
    /// Playback state is left untouched.
    pub fn set_normalized_time(&mut self, world: &mut World, t: f32) {
        let factor = self.curve.evaluate(t);
        match self.resolve_target(world) {
            Ok(target) => self.kind.primitive_mut().scrub(world, target, factor),
            Err(e) => warn!(target: "tween", "cannot scrub {}: {e}", self.kind.name()),
        }
    }

    /// Show the state at `secs` after play, ignoring loops.
    pub fn scrub_seconds(&mut self, world: &mut World, secs: f32) {
        let t = ((secs - self.start_delay) / self.duration).clamp(0.0, 1.0);
        self.set_normalized_time(world, t);
    }

    pub fn clone_for(&self, target: Option<Entity>) -> SimpleTween {
        SimpleTween {
            target: target.or(self.target),
            start_delay: self.start_delay,
            duration: self.duration,
            loop_mode: self.loop_mode,
            curve: self.curve.clone(),
            kind: self.kind.clone_config(),
            reverse_curve: None,
            run: None,
            outcome: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::mapposition::MapPosition;
    use crate::components::zindex::ZIndex;
    use crate::tween::curve::Keyframe;
    use crate::tween::primitives::PositionTween;
    use crate::tween::primitives::SortingOrderTween;
    use crate::tween::primitives::OffsetPositionTween;
    use crate::tween::primitives::accessor::{OffsetAccess, OrderAccess, PositionAccess};
    use glam::Vec3;

    const EPSILON: f32 = 1e-3;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn position_tween(target: Entity, to_x: f32) -> SimpleTween {
        SimpleTween::new(TweenKind::Position(PositionTween::new(
            Vec3::ZERO,
            Vec3::new(to_x, 0.0, 0.0),
            PositionAccess::default(),
        )))
        .with_target(target)
    }

    fn x(world: &World, e: Entity) -> f32 {
        world.get::<MapPosition>(e).unwrap().pos.x
    }

    fn run_for(tween: &mut SimpleTween, world: &mut World, dt: f32, frames: usize) {
        for _ in 0..frames {
            tween.tick(world, dt);
        }
    }

    // ==================== CONFIGURATION TESTS ====================

    #[test]
    fn test_defaults() {
        let t = SimpleTween::new(TweenKind::Position(PositionTween::new(
            Vec3::ZERO,
            Vec3::ONE,
            PositionAccess::default(),
        )));
        assert_eq!(t.duration(), 1.0);
        assert_eq!(t.start_delay(), 0.0);
        assert_eq!(t.loop_mode(), LoopMode::Once);
        assert!(approx_eq(t.curve().evaluate(0.3), 0.3));
        assert!(!t.is_playing());
    }

    #[test]
    fn test_invalid_duration_and_delay_are_rejected() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 1.0);
        assert_eq!(t.set_duration(0.0), Err(TweenError::InvalidDuration(0.0)));
        assert_eq!(t.set_start_delay(-1.0), Err(TweenError::InvalidDelay(-1.0)));
        assert_eq!(t.duration(), 1.0);
    }

    #[test]
    fn test_set_curve_invalidates_reverse_curve() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 1.0);
        t.play(&mut world, PlayOptions::reversed(), None);
        assert!(t.reverse_curve().is_some());
        t.set_curve(EasingCurve::linear());
        assert!(t.reverse_curve().is_none());
    }

    // ==================== PLAYBACK TESTS ====================

    #[test]
    fn test_play_once_reaches_end() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::new(5.0, 0.0, 0.0)).id();
        let mut t = position_tween(e, 10.0);
        t.play(&mut world, PlayOptions::forward(), None);
        assert!(approx_eq(x(&world, e), 0.0), "play must snap to start");
        t.tick(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 2.5), "expected 2.5, got {}", x(&world, e));
        run_for(&mut t, &mut world, 0.25, 4);
        assert!(approx_eq(x(&world, e), 10.0));
        assert!(!t.is_playing());
        assert_eq!(t.outcome(), Some(&Outcome::Completed));
    }

    #[test]
    fn test_start_delay_holds_value() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0).with_start_delay(0.5).unwrap();
        t.play(&mut world, PlayOptions::forward(), None);
        t.tick(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 0.0));
        // 0.25 of delay left, then 0.25 into the pass
        t.tick(&mut world, 0.5);
        assert!(approx_eq(x(&world, e), 2.5), "expected 2.5, got {}", x(&world, e));
    }

    #[test]
    fn test_leftover_time_is_reported() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0);
        t.play(&mut world, PlayOptions::forward(), None);
        match t.tick(&mut world, 1.25) {
            Step::Done { leftover } => assert!(approx_eq(leftover, 0.25)),
            Step::Running => panic!("expected the pass to finish"),
        }
    }

    #[test]
    fn test_reverse_plays_backwards() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0);
        t.play(&mut world, PlayOptions::reversed(), None);
        assert!(approx_eq(x(&world, e), 10.0));
        t.tick(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 7.5), "expected 7.5, got {}", x(&world, e));
        t.tick(&mut world, 1.0);
        assert!(approx_eq(x(&world, e), 0.0));
    }

    #[test]
    fn test_pass_end_respects_last_key_value() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let curve = EasingCurve::from_keys(vec![
            Keyframe::new(0.0, 0.0, 0.5, 0.5),
            Keyframe::new(1.0, 0.5, 0.5, 0.5),
        ])
        .unwrap();
        let mut t = position_tween(e, 10.0).with_curve(curve);
        t.play(&mut world, PlayOptions::forward(), None);
        t.tick(&mut world, 2.0);
        assert!(approx_eq(x(&world, e), 5.0), "expected 5.0, got {}", x(&world, e));
    }

    #[test]
    fn test_loop_carries_overflow() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0).with_loop_mode(LoopMode::Loop);
        t.play(&mut world, PlayOptions::forward(), None);
        t.tick(&mut world, 1.25);
        assert!(approx_eq(x(&world, e), 2.5), "expected 2.5, got {}", x(&world, e));
        assert!(t.is_playing());
        // many periods at once
        t.tick(&mut world, 100.0);
        assert!(approx_eq(x(&world, e), 2.5), "expected 2.5, got {}", x(&world, e));
    }

    #[test]
    fn test_ping_pong_halves_pass_and_turns_around() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0).with_loop_mode(LoopMode::PingPong);
        t.play(&mut world, PlayOptions::forward(), None);
        t.tick(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 5.0), "expected 5.0, got {}", x(&world, e));
        t.tick(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 10.0));
        t.tick(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 5.0), "expected 5.0 on the way back, got {}", x(&world, e));
        t.tick(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 0.0));
    }

    #[test]
    fn test_resume_from_current_value() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::new(4.0, 0.0, 0.0)).id();
        let mut t = position_tween(e, 10.0);
        t.play(&mut world, PlayOptions::forward().with_from_current(true), None);
        assert!(approx_eq(x(&world, e), 4.0), "resume must not snap");
        t.tick(&mut world, 0.1);
        assert!(approx_eq(x(&world, e), 5.0), "expected 5.0, got {}", x(&world, e));
        t.tick(&mut world, 0.6);
        assert_eq!(t.outcome(), Some(&Outcome::Completed));
    }

    #[test]
    fn test_replay_supersedes_previous_run() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0);
        t.play(&mut world, PlayOptions::forward(), None);
        t.tick(&mut world, 0.5);
        t.play(&mut world, PlayOptions::reversed(), None);
        assert!(t.is_playing());
        t.tick(&mut world, 0.5);
        assert!(approx_eq(x(&world, e), 5.0));
        t.tick(&mut world, 0.5);
        assert!(approx_eq(x(&world, e), 0.0));
        assert_eq!(t.outcome(), Some(&Outcome::Completed));
    }

    #[test]
    fn test_parent_cancellation_stops_run() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let parent = CancelToken::new();
        let mut t = position_tween(e, 10.0);
        t.play(&mut world, PlayOptions::forward(), Some(&parent));
        t.tick(&mut world, 0.5);
        parent.cancel();
        assert!(matches!(t.tick(&mut world, 0.25), Step::Done { .. }));
        assert!(approx_eq(x(&world, e), 5.0), "cancel must leave the value in place");
        assert_eq!(t.outcome(), Some(&Outcome::Cancelled));
    }

    // ==================== FAILURE TESTS ====================

    #[test]
    fn test_missing_target_aborts() {
        let mut world = World::new();
        let mut t = SimpleTween::new(TweenKind::Position(PositionTween::new(
            Vec3::ZERO,
            Vec3::ONE,
            PositionAccess::default(),
        )));
        t.play(&mut world, PlayOptions::forward(), None);
        assert!(!t.is_playing());
        assert_eq!(t.outcome(), Some(&Outcome::Aborted(TweenError::NoTarget)));
    }

    #[test]
    fn test_missing_component_aborts() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = SimpleTween::new(TweenKind::SortingOrder(SortingOrderTween::new(
            0.0,
            5.0,
            OrderAccess::default(),
        )))
        .with_target(e);
        t.play(&mut world, PlayOptions::forward(), None);
        assert_eq!(
            t.outcome(),
            Some(&Outcome::Aborted(TweenError::MissingComponent {
                entity: e,
                component: "ZIndex"
            }))
        );
        world.entity_mut(e).insert(ZIndex(0));
        t.play(&mut world, PlayOptions::forward(), None);
        assert!(t.is_playing());
    }

    #[test]
    fn test_despawned_target_aborts_mid_run() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0);
        t.play(&mut world, PlayOptions::forward(), None);
        t.tick(&mut world, 0.1);
        world.despawn(e);
        t.tick(&mut world, 0.1);
        assert_eq!(t.outcome(), Some(&Outcome::Aborted(TweenError::TargetDespawned(e))));
    }

    // ==================== SNAP AND SCRUB TESTS ====================

    #[test]
    fn test_reset_is_idempotent() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::new(3.0, 0.0, 0.0)).id();
        let mut t = position_tween(e, 10.0);
        t.reset_to_start(&mut world);
        let once = x(&world, e);
        t.reset_to_start(&mut world);
        assert_eq!(once, x(&world, e));
        assert!(approx_eq(once, 0.0));
    }

    #[test]
    fn test_offset_snaps_keep_their_first_base() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = SimpleTween::new(TweenKind::OffsetPosition(OffsetPositionTween::new(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 0.0, 0.0),
            OffsetAccess::default(),
        )))
        .with_target(e);

        t.reset_to_start(&mut world);
        assert!(approx_eq(x(&world, e), 1.0));
        t.reset_to_start(&mut world);
        assert!(approx_eq(x(&world, e), 1.0));

        t.set_normalized_time(&mut world, 0.5);
        t.set_normalized_time(&mut world, 0.5);
        assert!(approx_eq(x(&world, e), 1.5));

        t.jump_to_end(&mut world);
        t.jump_to_end(&mut world);
        assert!(approx_eq(x(&world, e), 2.0));

        t.play(&mut world, PlayOptions::forward(), None);
        run_for(&mut t, &mut world, 0.1, 20);
        assert!(approx_eq(x(&world, e), 2.0));
    }

    #[test]
    fn test_set_normalized_time_does_not_start_playback() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0);
        t.set_normalized_time(&mut world, 0.3);
        assert!(approx_eq(x(&world, e), 3.0));
        assert!(!t.is_playing());
    }

    #[test]
    fn test_scrub_seconds_accounts_for_delay() {
        let mut world = World::new();
        let e = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(e, 10.0).with_start_delay(0.5).unwrap();
        t.scrub_seconds(&mut world, 0.25);
        assert!(approx_eq(x(&world, e), 0.0));
        t.scrub_seconds(&mut world, 1.0);
        assert!(approx_eq(x(&world, e), 5.0));
        t.scrub_seconds(&mut world, 9.0);
        assert!(approx_eq(x(&world, e), 10.0));
    }

    #[test]
    fn test_clone_for_rebinds_and_drops_runtime() {
        let mut world = World::new();
        let a = world.spawn(MapPosition::default()).id();
        let b = world.spawn(MapPosition::default()).id();
        let mut t = position_tween(a, 10.0);
        t.play(&mut world, PlayOptions::reversed(), None);
        let c = t.clone_for(Some(b));
        assert_eq!(c.target(), Some(b));
        assert!(!c.is_playing());
        assert!(c.reverse_curve().is_none());
        assert_eq!(t.clone_for(None).target(), Some(a));
    }
}
