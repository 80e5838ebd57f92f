//! Fan-out integration tests: staggered starts over a parent's active
//! children, sticky instance lists and staleness detection.

use bevy_ecs::prelude::*;
use glam::Vec3;

use aberredtween::components::inactive::Inactive;
use aberredtween::components::mapposition::MapPosition;
use aberredtween::tween::error::TweenError;
use aberredtween::tween::multi::active_children;
use aberredtween::tween::primitives::accessor::{OffsetAccess, PositionAccess};
use aberredtween::tween::primitives::{OffsetPositionTween, PositionTween, TweenKind};
use aberredtween::tween::{GroupTween, MultiTween, Outcome, PlayOptions, SimpleTween, Step, Tween};

const EPSILON: f32 = 1e-3;

fn approx_eq(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn slide_x() -> SimpleTween {
    SimpleTween::new(TweenKind::Position(PositionTween::new(
        Vec3::ZERO,
        Vec3::new(10.0, 0.0, 0.0),
        PositionAccess::default(),
    )))
}

fn x(world: &World, e: Entity) -> f32 {
    world.get::<MapPosition>(e).unwrap().pos.x
}

fn spawn_family(world: &mut World, n: usize) -> (Entity, Vec<Entity>) {
    let parent = world.spawn(MapPosition::default()).id();
    let children = (0..n)
        .map(|_| world.spawn((MapPosition::default(), ChildOf(parent))).id())
        .collect();
    (parent, children)
}

fn fan_out(parent: Entity, delay: f32) -> MultiTween {
    MultiTween::new(slide_x())
        .with_parent(parent)
        .with_per_object_delay(delay)
        .unwrap()
}

// =============================================================================
// Staggering
// =============================================================================

#[test]
fn instances_start_one_delay_apart() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 3);
    let mut tween = fan_out(parent, 0.2);
    tween.play(&mut world, PlayOptions::forward(), None);

    assert_eq!(tween.tick(&mut world, 1.0), Step::Running);
    assert!(approx_eq(x(&world, kids[0]), 8.0));
    assert!(approx_eq(x(&world, kids[1]), 6.0));
    assert!(approx_eq(x(&world, kids[2]), 4.0));
}

#[test]
fn stagger_does_not_depend_on_frame_rate() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 3);
    let mut tween = fan_out(parent, 0.2);
    tween.play(&mut world, PlayOptions::forward(), None);

    for _ in 0..20 {
        tween.tick(&mut world, 0.05);
    }
    assert!(approx_eq(x(&world, kids[0]), 8.0));
    assert!(approx_eq(x(&world, kids[1]), 6.0));
    assert!(approx_eq(x(&world, kids[2]), 4.0));
}

#[test]
fn nothing_moves_before_first_delay() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 2);
    world.get_mut::<MapPosition>(kids[0]).unwrap().pos.x = 3.0;
    let mut tween = fan_out(parent, 0.5);
    tween.play(&mut world, PlayOptions::forward(), None);
    tween.tick(&mut world, 0.25);
    assert!(approx_eq(x(&world, kids[0]), 3.0));
}

#[test]
fn completes_when_every_instance_finished() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 3);
    let mut tween = fan_out(parent, 0.2);
    tween.play(&mut world, PlayOptions::forward(), None);
    assert!(approx_eq(tween.length(), 1.6));

    assert_eq!(tween.tick(&mut world, 1.5), Step::Running);
    let Step::Done { leftover } = tween.tick(&mut world, 0.2) else {
        panic!("fan-out should have finished");
    };
    assert!(approx_eq(leftover, 0.1));
    assert_eq!(tween.outcome(), Some(&Outcome::Completed));
    for kid in kids {
        assert!(approx_eq(x(&world, kid), 10.0));
    }
}

#[test]
fn inactive_children_are_skipped() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 3);
    world.entity_mut(kids[1]).insert(Inactive);
    assert_eq!(active_children(&world, parent), vec![kids[0], kids[2]]);

    let mut tween = fan_out(parent, 0.2);
    tween.play(&mut world, PlayOptions::forward(), None);
    assert_eq!(tween.instances().len(), 2);
    tween.tick(&mut world, 1.0);
    assert!(approx_eq(x(&world, kids[0]), 8.0));
    assert!(approx_eq(x(&world, kids[1]), 0.0));
    assert!(approx_eq(x(&world, kids[2]), 6.0));
}

#[test]
fn offset_template_moves_each_child_from_its_own_position() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 2);
    world.get_mut::<MapPosition>(kids[1]).unwrap().pos.x = 100.0;
    let template = SimpleTween::new(TweenKind::OffsetPosition(OffsetPositionTween::new(
        Vec3::ZERO,
        Vec3::new(5.0, 0.0, 0.0),
        OffsetAccess::default(),
    )));
    let mut tween = MultiTween::new(template).with_parent(parent);
    tween.play(&mut world, PlayOptions::forward(), None);
    let mut frames = 0;
    while let Step::Running = tween.tick(&mut world, 0.1) {
        frames += 1;
        assert!(frames < 100);
    }
    assert!(approx_eq(x(&world, kids[0]), 5.0));
    assert!(approx_eq(x(&world, kids[1]), 105.0));
}

// =============================================================================
// Instance list caching
// =============================================================================

#[test]
fn instance_list_is_sticky_and_staleness_is_observable() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 2);
    let mut tween = fan_out(parent, 0.1);
    assert_eq!(tween.length(), 0.0);

    tween.play(&mut world, PlayOptions::forward(), None);
    assert_eq!(tween.bound_children(), kids.as_slice());
    assert!(!tween.is_stale(&world));

    let late = world.spawn((MapPosition::default(), ChildOf(parent))).id();
    assert!(tween.is_stale(&world));

    tween.play(&mut world, PlayOptions::forward(), None);
    assert_eq!(tween.instances().len(), 2);
    tween.tick(&mut world, 5.0);
    assert!(approx_eq(x(&world, late), 0.0));

    tween.reinitialize(&world).unwrap();
    assert!(!tween.is_stale(&world));
    assert_eq!(tween.instances().len(), 3);
    tween.play(&mut world, PlayOptions::forward(), None);
    tween.tick(&mut world, 5.0);
    assert!(approx_eq(x(&world, late), 10.0));
}

#[test]
fn toggling_inactive_marks_stale() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 2);
    let mut tween = fan_out(parent, 0.1);
    tween.reinitialize(&world).unwrap();
    world.entity_mut(kids[0]).insert(Inactive);
    assert!(tween.is_stale(&world));
}

#[test]
fn missing_parent_aborts() {
    let mut world = World::new();
    let mut tween = MultiTween::new(slide_x());
    tween.play(&mut world, PlayOptions::forward(), None);
    assert_eq!(tween.outcome(), Some(&Outcome::Aborted(TweenError::NoParent)));
    assert!(!tween.is_playing());

    let (parent, _) = spawn_family(&mut world, 1);
    world.despawn(parent);
    let mut tween = MultiTween::new(slide_x()).with_parent(parent);
    tween.play(&mut world, PlayOptions::forward(), None);
    assert_eq!(
        tween.outcome(),
        Some(&Outcome::Aborted(TweenError::TargetDespawned(parent)))
    );
}

#[test]
fn parent_without_children_completes_at_once() {
    let mut world = World::new();
    let parent = world.spawn(MapPosition::default()).id();
    let mut tween = fan_out(parent, 0.2);
    tween.play(&mut world, PlayOptions::forward(), None);
    assert!(matches!(tween.tick(&mut world, 0.1), Step::Done { .. }));
    assert_eq!(tween.outcome(), Some(&Outcome::Completed));
}

// =============================================================================
// Reset, scrub, cancel and composition
// =============================================================================

#[test]
fn scrub_applies_per_instance_offsets() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 3);
    let mut tween = Tween::from(fan_out(parent, 0.2));
    tween.scrub_seconds(&mut world, 0.6);
    assert!(approx_eq(x(&world, kids[0]), 4.0));
    assert!(approx_eq(x(&world, kids[1]), 2.0));
    assert!(approx_eq(x(&world, kids[2]), 0.0));

    tween.scrub(&mut world, 1.0);
    for kid in &kids {
        assert!(approx_eq(x(&world, *kid), 10.0));
    }
    tween.reset_to_start(&mut world);
    for kid in &kids {
        assert!(approx_eq(x(&world, *kid), 0.0));
    }
}

#[test]
fn cancel_stops_every_instance() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 2);
    let mut tween = fan_out(parent, 0.2);
    tween.play(&mut world, PlayOptions::forward(), None);
    tween.tick(&mut world, 0.7);
    tween.cancel();
    assert_eq!(tween.outcome(), Some(&Outcome::Cancelled));
    assert!(tween.instances().iter().all(|i| !i.is_playing()));
    let before = x(&world, kids[0]);
    tween.tick(&mut world, 1.0);
    assert!(approx_eq(x(&world, kids[0]), before));
}

#[test]
fn fan_out_inside_sequence() {
    let mut world = World::new();
    let (parent, kids) = spawn_family(&mut world, 2);
    let mut tween = Tween::from(
        GroupTween::sequence()
            .with_child(fan_out(parent, 0.0))
            .with_child(slide_x().with_target(parent)),
    );
    tween.play(&mut world, PlayOptions::forward(), None);
    tween.tick(&mut world, 1.5);
    assert!(approx_eq(x(&world, kids[0]), 10.0));
    assert!(approx_eq(x(&world, kids[1]), 10.0));
    assert!(approx_eq(x(&world, parent), 5.0));
}

#[test]
fn clone_for_rebinds_parent() {
    let mut world = World::new();
    let (a, _) = spawn_family(&mut world, 1);
    let (b, b_kids) = spawn_family(&mut world, 2);
    let original = fan_out(a, 0.1);
    let mut copy = original.clone_for(Some(b));
    assert_eq!(copy.parent(), Some(b));
    assert!(copy.instances().is_empty());
    copy.jump_to_end(&mut world);
    for kid in b_kids {
        assert!(approx_eq(x(&world, kid), 10.0));
    }
}
