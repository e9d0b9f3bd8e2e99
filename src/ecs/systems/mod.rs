//! ECS systems (shape attachment and fixture refresh).

pub mod shape;

pub use shape::{
    attach_body, attach_shape, despawn_entity, detach_body, detach_shape, refresh_shapes_system,
    set_shape_enabled,
};
