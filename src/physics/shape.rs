//! 2D shape geometry and the validation applied before a shape can back a fixture.

use glam::Vec2;

use super::error::ShapeError;
use super::mass::{self, MassData};

/// Maximum number of vertices in a polygon shape.
pub const MAX_POLYGON_VERTICES: usize = 8;

/// Collision tolerance. Vertices closer than this are treated as coincident.
pub const LINEAR_SLOP: f32 = 0.005;

/// Geometry of a collision shape.
///
/// Values built through the constructors ([`Shape2d::circle`],
/// [`Shape2d::rect`], ...) are validated. A value assembled by hand can be
/// checked with [`Shape2d::validated`].
#[derive(Debug, Clone, PartialEq)]
pub enum Shape2d {
    /// Solid circle.
    Circle { radius: f32, center: Vec2 },
    /// Axis-aligned solid box.
    Box { half_extents: Vec2, center: Vec2 },
    /// Solid convex polygon, vertices in counter-clockwise order.
    Polygon { vertices: Vec<Vec2> },
    /// Open polyline. Has no area and so no mass.
    Chain { vertices: Vec<Vec2> },
    /// Single line segment.
    Edge { vertex_a: Vec2, vertex_b: Vec2 },
}

impl Shape2d {
    /// Create a circle of the given radius around `center`.
    pub fn circle(radius: f32, center: Vec2) -> Result<Self, ShapeError> {
        if !radius.is_finite() || !center.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if radius <= 0.0 {
            return Err(ShapeError::InvalidRadius(radius));
        }
        Ok(Shape2d::Circle { radius, center })
    }

    /// Create a box with the given half extents around `center`.
    pub fn rect(half_extents: Vec2, center: Vec2) -> Result<Self, ShapeError> {
        if !half_extents.is_finite() || !center.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if half_extents.x <= 0.0 || half_extents.y <= 0.0 {
            return Err(ShapeError::InvalidHalfExtents(half_extents));
        }
        Ok(Shape2d::Box {
            half_extents,
            center,
        })
    }

    /// Create a convex polygon.
    ///
    /// Clockwise input is reversed. Collinear vertices are rejected as
    /// not convex rather than welded away.
    pub fn polygon(vertices: &[Vec2]) -> Result<Self, ShapeError> {
        let count = vertices.len();
        if count < 3 {
            return Err(ShapeError::TooFewVertices { count, min: 3 });
        }
        if count > MAX_POLYGON_VERTICES {
            return Err(ShapeError::TooManyVertices {
                count,
                max: MAX_POLYGON_VERTICES,
            });
        }
        check_finite(vertices)?;

        for j in 1..count {
            for i in 0..j {
                if vertices[i].distance_squared(vertices[j]) < LINEAR_SLOP * LINEAR_SLOP {
                    return Err(ShapeError::DuplicateVertex { index: j });
                }
            }
        }

        let mut vertices = vertices.to_vec();
        let area = signed_area(&vertices);
        if area.abs() <= f32::EPSILON {
            return Err(ShapeError::ZeroArea);
        }
        if area < 0.0 {
            vertices.reverse();
        }
        if !is_strictly_convex(&vertices) {
            return Err(ShapeError::NotConvex);
        }

        Ok(Shape2d::Polygon { vertices })
    }

    /// Create an open chain through `vertices`.
    pub fn chain(vertices: &[Vec2]) -> Result<Self, ShapeError> {
        let count = vertices.len();
        if count < 2 {
            return Err(ShapeError::TooFewVertices { count, min: 2 });
        }
        check_finite(vertices)?;
        for (index, pair) in vertices.windows(2).enumerate() {
            if pair[0].distance_squared(pair[1]) < LINEAR_SLOP * LINEAR_SLOP {
                return Err(ShapeError::DuplicateVertex { index: index + 1 });
            }
        }
        Ok(Shape2d::Chain {
            vertices: vertices.to_vec(),
        })
    }

    /// Create a segment from `vertex_a` to `vertex_b`.
    pub fn edge(vertex_a: Vec2, vertex_b: Vec2) -> Result<Self, ShapeError> {
        if !vertex_a.is_finite() || !vertex_b.is_finite() {
            return Err(ShapeError::NonFinite);
        }
        if vertex_a.distance_squared(vertex_b) < LINEAR_SLOP * LINEAR_SLOP {
            return Err(ShapeError::DegenerateEdge);
        }
        Ok(Shape2d::Edge { vertex_a, vertex_b })
    }

    /// Run the constructor checks on a shape built by hand.
    ///
    /// Returns the normalized shape (polygons are made counter-clockwise).
    pub fn validated(self) -> Result<Self, ShapeError> {
        match self {
            Shape2d::Circle { radius, center } => Self::circle(radius, center),
            Shape2d::Box {
                half_extents,
                center,
            } => Self::rect(half_extents, center),
            Shape2d::Polygon { vertices } => Self::polygon(&vertices),
            Shape2d::Chain { vertices } => Self::chain(&vertices),
            Shape2d::Edge { vertex_a, vertex_b } => Self::edge(vertex_a, vertex_b),
        }
    }

    /// Whether the shape encloses an area and can carry mass.
    pub fn is_solid(&self) -> bool {
        matches!(
            self,
            Shape2d::Circle { .. } | Shape2d::Box { .. } | Shape2d::Polygon { .. }
        )
    }

    /// Corners of a box, counter-clockwise starting at the bottom-left.
    pub fn box_vertices(half_extents: Vec2, center: Vec2) -> [Vec2; 4] {
        let Vec2 { x: hx, y: hy } = half_extents;
        [
            center + Vec2::new(-hx, -hy),
            center + Vec2::new(hx, -hy),
            center + Vec2::new(hx, hy),
            center + Vec2::new(-hx, hy),
        ]
    }

    /// Mass properties of the shape at the given density.
    ///
    /// Chains and edges have no area and report zero mass.
    pub fn compute_mass(&self, density: f32) -> MassData {
        match self {
            Shape2d::Circle { radius, center } => mass::circle_mass(*radius, *center, density),
            Shape2d::Box {
                half_extents,
                center,
            } => mass::polygon_mass(&Self::box_vertices(*half_extents, *center), density),
            Shape2d::Polygon { vertices } => mass::polygon_mass(vertices, density),
            Shape2d::Chain { .. } => MassData::default(),
            Shape2d::Edge { vertex_a, vertex_b } => MassData {
                mass: 0.0,
                center: (*vertex_a + *vertex_b) * 0.5,
                inertia: 0.0,
            },
        }
    }
}

fn check_finite(vertices: &[Vec2]) -> Result<(), ShapeError> {
    if vertices.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(ShapeError::NonFinite)
    }
}

/// Signed area; positive for counter-clockwise winding.
fn signed_area(vertices: &[Vec2]) -> f32 {
    let n = vertices.len();
    let twice: f32 = (0..n)
        .map(|i| vertices[i].perp_dot(vertices[(i + 1) % n]))
        .sum();
    twice * 0.5
}

/// Every vertex must lie strictly left of every edge it is not part of.
fn is_strictly_convex(vertices: &[Vec2]) -> bool {
    let n = vertices.len();
    (0..n).all(|i| {
        let a = vertices[i];
        let edge = vertices[(i + 1) % n] - a;
        (0..n)
            .filter(|&j| j != i && j != (i + 1) % n)
            .all(|j| edge.perp_dot(vertices[j] - a) > 0.0)
    })
}
