//! Shape attachment and fixture refresh systems.
//!
//! The entity stands in for the scene node: these functions are the node's
//! attach, detach and enable notifications, and make sure a shape releases
//! its fixture before its body or the entity goes away.

use anyhow::Context;

use crate::ecs::components::physics::RigidBody2d;
use crate::physics::{BodyDef, BodyHandle, CollisionShape2d, FixtureHost, PhysicsWorld2d};

/// The body on the same entity, if any.
fn sibling_body(world: &hecs::World, entity: hecs::Entity) -> Option<BodyHandle> {
    world.get::<&RigidBody2d>(entity).ok().map(|rb| rb.handle)
}

/// Put `shape` on `entity` and attach it to the entity's body.
///
/// A shape already on the entity is detached and dropped first. Without a
/// body the shape waits until [`attach_body`] provides one.
pub fn attach_shape<H: FixtureHost + ?Sized>(
    world: &mut hecs::World,
    entity: hecs::Entity,
    shape: CollisionShape2d,
    host: &mut H,
) -> anyhow::Result<()> {
    if !world.contains(entity) {
        anyhow::bail!("cannot attach shape: entity {:?} does not exist", entity);
    }
    detach_shape(world, entity, host);

    let body = sibling_body(world, entity);
    world
        .insert_one(entity, shape)
        .context("failed to insert collision shape")?;
    let mut shape = world
        .get::<&mut CollisionShape2d>(entity)
        .context("collision shape missing after insert")?;
    shape.on_attach(body, host);
    Ok(())
}

/// Remove the shape from `entity`, releasing its fixture.
///
/// The returned shape keeps its geometry, material and filter and can be
/// attached again.
pub fn detach_shape<H: FixtureHost + ?Sized>(
    world: &mut hecs::World,
    entity: hecs::Entity,
    host: &mut H,
) -> Option<CollisionShape2d> {
    let mut shape = world.remove_one::<CollisionShape2d>(entity).ok()?;
    shape.on_detach(host);
    Some(shape)
}

/// Enable or disable the shape on `entity`.
///
/// Enabling re-resolves the entity's body, since disabling forgets it.
pub fn set_shape_enabled<H: FixtureHost + ?Sized>(
    world: &mut hecs::World,
    entity: hecs::Entity,
    enabled: bool,
    host: &mut H,
) -> anyhow::Result<()> {
    let body = sibling_body(world, entity);
    let mut shape = world
        .get::<&mut CollisionShape2d>(entity)
        .with_context(|| format!("entity {:?} has no collision shape", entity))?;
    shape.on_enabled_changed(enabled, host);
    if enabled {
        shape.on_attach(body, host);
    }
    Ok(())
}

/// Create a body for `entity` and attach the entity's shape to it.
///
/// An existing body on the entity is replaced.
pub fn attach_body(
    world: &mut hecs::World,
    entity: hecs::Entity,
    def: BodyDef,
    physics: &mut PhysicsWorld2d,
) -> anyhow::Result<BodyHandle> {
    if !world.contains(entity) {
        anyhow::bail!("cannot attach body: entity {:?} does not exist", entity);
    }
    detach_body(world, entity, physics);

    let handle = physics.create_body(def);
    let component = RigidBody2d {
        handle,
        body_type: def.body_type,
    };
    if let Err(err) = world.insert_one(entity, component) {
        physics.destroy_body(handle);
        return Err(err).context("failed to insert rigid body");
    }

    if let Ok(mut shape) = world.get::<&mut CollisionShape2d>(entity) {
        if shape.is_enabled() {
            shape.on_attach(Some(handle), physics);
        }
    }
    Ok(handle)
}

/// Remove and destroy the body on `entity`.
///
/// The entity's shape releases its fixture first and stays on the entity,
/// waiting for a new body. Returns `false` if there was no live body.
pub fn detach_body(
    world: &mut hecs::World,
    entity: hecs::Entity,
    physics: &mut PhysicsWorld2d,
) -> bool {
    let Ok(body) = world.remove_one::<RigidBody2d>(entity) else {
        return false;
    };
    if let Ok(mut shape) = world.get::<&mut CollisionShape2d>(entity) {
        shape.on_detach(physics);
    }
    physics.destroy_body(body.handle)
}

/// Bring every shape in line with its entity and rebuild dirty fixtures.
///
/// Shapes spawned together with a body, or whose body component was
/// swapped out directly, are re-attached here. Shapes whose body was
/// destroyed directly are detached, and fixtures of shapes dropped since
/// the last pass are destroyed.
pub fn refresh_shapes_system<H: FixtureHost + ?Sized>(world: &mut hecs::World, host: &mut H) {
    host.flush_released();
    for (_, (shape, body)) in world.query_mut::<(&mut CollisionShape2d, Option<&RigidBody2d>)>() {
        let body = body
            .map(|rb| rb.handle)
            .filter(|&handle| host.is_alive(handle));
        if shape.is_enabled() && shape.owner() != body {
            shape.on_attach(body, host);
        } else {
            shape.refresh(host);
        }
    }
}

/// Detach shape and body from `entity`, then despawn it.
pub fn despawn_entity(
    world: &mut hecs::World,
    entity: hecs::Entity,
    physics: &mut PhysicsWorld2d,
) -> anyhow::Result<()> {
    detach_shape(world, entity, physics);
    detach_body(world, entity, physics);
    world
        .despawn(entity)
        .with_context(|| format!("failed to despawn entity {:?}", entity))
}
