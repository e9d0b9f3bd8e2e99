//! Physics components for ECS entities.

use crate::physics::{BodyHandle, BodyType};

pub use crate::physics::CollisionShape2d;

/// Rigid body component. Points at a body stored in the physics world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RigidBody2d {
    pub handle: BodyHandle,
    pub body_type: BodyType,
}
