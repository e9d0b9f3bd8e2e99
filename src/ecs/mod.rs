//! Entity Component System integration with hecs.
//!
//! An entity plays the role of the scene node: a [`RigidBody2d`] component
//! is the node's body and a [`CollisionShape2d`] component its shape. The
//! systems here deliver attach, detach and enable notifications to shapes.
//!
//! [`RigidBody2d`]: components::RigidBody2d
//! [`CollisionShape2d`]: components::CollisionShape2d

pub mod components;
pub mod systems;

pub mod prelude {
    pub use super::components::*;
    pub use super::systems::{
        attach_body, attach_shape, despawn_entity, detach_body, detach_shape,
        refresh_shapes_system, set_shape_enabled,
    };
}
