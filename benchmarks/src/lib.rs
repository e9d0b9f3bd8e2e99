//! Shared setup helpers for rein2d benchmarks.
//!
//! ## Running
//!
//! All groups (criterion):
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench shapes
//!
//! Filter by group:
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench shapes -- refresh
//!   cargo bench --manifest-path benchmarks/Cargo.toml --bench shapes -- mass

use glam::Vec2;
use rein2d::ecs::systems::{attach_body, attach_shape};
use rein2d::physics::{BodyDef, CollisionShape2d, PhysicsWorld2d};

// ---------------------------------------------------------------------------
// Shapes
// ---------------------------------------------------------------------------

/// Regular convex polygon with `sides` vertices on a circle of `radius`.
pub fn regular_polygon(sides: usize, radius: f32) -> Vec<Vec2> {
    (0..sides)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / sides as f32;
            Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// A shape cycling through circle, box and polygon geometry by index.
pub fn mixed_shape(i: usize) -> CollisionShape2d {
    let mut shape = CollisionShape2d::new();
    let result = match i % 3 {
        0 => shape.set_circle(0.5, Vec2::ZERO),
        1 => shape.set_box_size(0.5, 0.25, Vec2::ZERO),
        _ => shape.set_polygon(&regular_polygon(6, 0.5)),
    };
    result.expect("benchmark geometry is valid");
    shape
}

// ---------------------------------------------------------------------------
// Scenes
// ---------------------------------------------------------------------------

/// `n` entities, each with a dynamic body and one attached shape.
pub fn setup_shape_world(n: usize) -> anyhow::Result<(hecs::World, PhysicsWorld2d)> {
    let mut world = hecs::World::new();
    let mut physics = PhysicsWorld2d::default();

    for i in 0..n {
        let entity = world.spawn(());
        attach_body(&mut world, entity, BodyDef::new_dynamic(), &mut physics)?;
        attach_shape(&mut world, entity, mixed_shape(i), &mut physics)?;
    }
    Ok((world, physics))
}
