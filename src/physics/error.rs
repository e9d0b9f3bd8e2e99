//! Errors reported by shape and material setters.

use glam::Vec2;
use thiserror::Error;

/// Rejection of a geometry or material value.
///
/// Returned synchronously by the setter that received the value; the shape
/// that was being edited keeps its previous state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("shape coordinates must be finite")]
    NonFinite,
    #[error("circle radius must be positive, got {0}")]
    InvalidRadius(f32),
    #[error("box half extents must be positive, got {0}")]
    InvalidHalfExtents(Vec2),
    #[error("shape needs at least {min} vertices, got {count}")]
    TooFewVertices { count: usize, min: usize },
    #[error("shape supports at most {max} vertices, got {count}")]
    TooManyVertices { count: usize, max: usize },
    #[error("vertex {index} is within the linear slop of another vertex")]
    DuplicateVertex { index: usize },
    #[error("polygon has zero area")]
    ZeroArea,
    #[error("polygon is not convex")]
    NotConvex,
    #[error("edge endpoints are within the linear slop of each other")]
    DegenerateEdge,
    #[error("{property} must be finite and non-negative, got {value}")]
    InvalidMaterial { property: &'static str, value: f32 },
}
