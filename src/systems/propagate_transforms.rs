//! Transform propagation for parent-child entity hierarchies.
//!
//! Computes [`GlobalTransform`] for every entity participating in a hierarchy
//! (root parents with [`Children`] and descendants with [`ChildOf`]), and
//! offers on-demand helpers ([`world_position`], [`set_world_position`]) that
//! walk the ancestor chain directly. World-space tweens use the helpers so
//! their reads and writes are exact within the same frame.
//!
//! # Schedule position
//!
//! Should run **after** [`update_tweens`](crate::systems::tween::update_tweens)
//! so that downstream systems see up-to-date world positions.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;
use glam::Vec3;

use crate::components::globaltransform::GlobalTransform;
use crate::components::mapposition::MapPosition;
use crate::components::rotation::Rotation;
use crate::components::scale::Scale;

/// Rotate the xy part of a vector around z by `angle_degrees`.
fn rotate_z(v: Vec3, angle_degrees: f32) -> Vec3 {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    Vec3::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos, v.z)
}

/// Compose a child's local transform onto its parent's world transform.
fn compose(parent: &GlobalTransform, pos: Vec3, rot_z: f32, scale: Vec3) -> GlobalTransform {
    GlobalTransform {
        position: parent.position + rotate_z(pos * parent.scale, parent.rotation_degrees),
        rotation_degrees: parent.rotation_degrees + rot_z,
        scale: parent.scale * scale,
    }
}

fn local_parts(world: &World, entity: Entity) -> (Vec3, f32, Vec3) {
    let pos = world.get::<MapPosition>(entity).map(|p| p.pos).unwrap_or(Vec3::ZERO);
    let rot = world.get::<Rotation>(entity).map(|r| r.degrees.z).unwrap_or(0.0);
    let scale = world.get::<Scale>(entity).map(|s| s.scale).unwrap_or(Vec3::ONE);
    (pos, rot, scale)
}

/// World transform of `entity`, composed from its ancestors' local components.
///
/// Returns `None` if the entity does not exist or has no [`MapPosition`].
pub fn global_transform_of(world: &World, entity: Entity) -> Option<GlobalTransform> {
    world.get::<MapPosition>(entity)?;
    let mut chain = vec![entity];
    let mut current = entity;
    while let Some(child_of) = world.get::<ChildOf>(current) {
        current = child_of.parent();
        chain.push(current);
    }
    let mut gt = GlobalTransform::default();
    for e in chain.into_iter().rev() {
        let (pos, rot, scale) = local_parts(world, e);
        gt = compose(&gt, pos, rot, scale);
    }
    Some(gt)
}

/// World-space position of `entity`.
pub fn world_position(world: &World, entity: Entity) -> Option<Vec3> {
    global_transform_of(world, entity).map(|gt| gt.position)
}

/// Move `entity` so that its world-space position becomes `pos`.
///
/// Rewrites the local [`MapPosition`] through the inverse of the parent's world
/// transform. Axes where the parent's scale is zero keep a zero offset.
/// Returns `false` if the entity has no `MapPosition`.
pub fn set_world_position(world: &mut World, entity: Entity, pos: Vec3) -> bool {
    let parent_gt = world
        .get::<ChildOf>(entity)
        .map(|c| c.parent())
        .and_then(|parent| global_transform_of(world, parent))
        .unwrap_or_default();
    let unrotated = rotate_z(pos - parent_gt.position, -parent_gt.rotation_degrees);
    let div = |v: f32, s: f32| if s != 0.0 { v / s } else { 0.0 };
    let local = Vec3::new(
        div(unrotated.x, parent_gt.scale.x),
        div(unrotated.y, parent_gt.scale.y),
        div(unrotated.z, parent_gt.scale.z),
    );
    let Some(mut mp) = world.get_mut::<MapPosition>(entity) else {
        return false;
    };
    mp.pos = local;
    if let Some(mut gt) = world.get_mut::<GlobalTransform>(entity) {
        gt.position = pos;
    }
    true
}

/// Propagate transforms from root parents down through the hierarchy.
///
/// For each root entity (has [`Children`] but no [`ChildOf`]):
/// 1. Compute its [`GlobalTransform`] from local components.
/// 2. Recursively traverse children, composing transforms at each level.
///
/// Entities that already have a `GlobalTransform` are updated in place.
/// Entities missing the component get it inserted via deferred [`Commands`]
/// (visible next frame).
pub fn propagate_transforms(
    roots: Query<
        (
            Entity,
            &MapPosition,
            Option<&Rotation>,
            Option<&Scale>,
            &Children,
        ),
        Without<ChildOf>,
    >,
    children_query: Query<
        (
            &MapPosition,
            Option<&Rotation>,
            Option<&Scale>,
            Option<&Children>,
        ),
        With<ChildOf>,
    >,
    mut globals: Query<&mut GlobalTransform>,
    mut commands: Commands,
) {
    for (root_entity, pos, rot, scale, children) in roots.iter() {
        let root_gt = compose(
            &GlobalTransform::default(),
            pos.pos,
            rot.map(|r| r.degrees.z).unwrap_or(0.0),
            scale.map(|s| s.scale).unwrap_or(Vec3::ONE),
        );

        if let Ok(mut gt) = globals.get_mut(root_entity) {
            *gt = root_gt;
        } else {
            commands.entity(root_entity).insert(root_gt);
        }

        propagate_children(
            &root_gt,
            children,
            &children_query,
            &mut globals,
            &mut commands,
        );
    }
}

fn propagate_children(
    parent_gt: &GlobalTransform,
    children: &Children,
    children_query: &Query<
        (
            &MapPosition,
            Option<&Rotation>,
            Option<&Scale>,
            Option<&Children>,
        ),
        With<ChildOf>,
    >,
    globals: &mut Query<&mut GlobalTransform>,
    commands: &mut Commands,
) {
    for child_entity in children.iter() {
        let Ok((pos, rot, scale, maybe_grandchildren)) = children_query.get(child_entity) else {
            continue;
        };

        let child_gt = compose(
            parent_gt,
            pos.pos,
            rot.map(|r| r.degrees.z).unwrap_or(0.0),
            scale.map(|s| s.scale).unwrap_or(Vec3::ONE),
        );

        if let Ok(mut gt) = globals.get_mut(child_entity) {
            *gt = child_gt;
        } else {
            commands.entity(child_entity).insert(child_gt);
        }

        if let Some(grandchildren) = maybe_grandchildren {
            propagate_children(&child_gt, grandchildren, children_query, globals, commands);
        }
    }
}
