//! Rein 2D collision shapes
//!
//! Collision shapes for 2D scene entities and the fixtures they build inside
//! rigid bodies.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! 1. **physics** - Shapes, fixtures, bodies, mass properties and the
//!    [`CollisionShape2d`] component with its lazy fixture lifecycle
//! 2. **ecs** - hecs ECS integration: components and attach/detach systems
//!    (feature = "ecs")

pub mod physics;

#[cfg(feature = "ecs")]
pub mod ecs;

// Re-export commonly used types
pub use physics::{
    BodyDef, BodyHandle, BodyType, CollisionFilter, CollisionShape2d, Fixture, FixtureDef,
    FixtureHandle, FixtureHost, MassData, Material2d, PhysicsConfig, PhysicsWorld2d, Shape2d,
    ShapeError, ShapeState,
};

#[cfg(feature = "ecs")]
pub use ecs::prelude::*;

// Re-export glam for convenience
pub use glam;
