//! ECS components (bodies and collision shapes).

pub mod physics;

pub use physics::*;
