//! Mass properties derived from shape geometry and density.

use std::f32::consts::PI;

use glam::Vec2;

/// Mass, centroid and rotational inertia of a shape or body.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MassData {
    /// Mass, density times area.
    pub mass: f32,
    /// Center of mass relative to the local origin.
    pub center: Vec2,
    /// Rotational inertia about the local origin.
    pub inertia: f32,
}

impl MassData {
    /// Rotational inertia about the center of mass instead of the origin.
    pub fn central_inertia(&self) -> f32 {
        self.inertia - self.mass * self.center.length_squared()
    }

    /// Combine parts expressed in the same local frame.
    ///
    /// The center is mass-weighted; inertia stays about the shared origin.
    pub fn combine<I>(parts: I) -> MassData
    where
        I: IntoIterator<Item = MassData>,
    {
        let mut total = MassData::default();
        let mut weighted_center = Vec2::ZERO;
        for part in parts {
            total.mass += part.mass;
            total.inertia += part.inertia;
            weighted_center += part.center * part.mass;
        }
        if total.mass > 0.0 {
            total.center = weighted_center / total.mass;
        }
        total
    }
}

/// Solid circle.
pub fn circle_mass(radius: f32, center: Vec2, density: f32) -> MassData {
    let radius_sq = radius * radius;
    let mass = density * PI * radius_sq;
    MassData {
        mass,
        center,
        // Disc inertia about its center, shifted to the origin.
        inertia: mass * (0.5 * radius_sq + center.length_squared()),
    }
}

/// Solid convex polygon with counter-clockwise vertices.
///
/// The polygon is fanned into triangles from its first vertex, which keeps
/// the sums well conditioned for shapes far from the origin.
pub fn polygon_mass(vertices: &[Vec2], density: f32) -> MassData {
    const INV_3: f32 = 1.0 / 3.0;

    let Some(&reference) = vertices.first() else {
        return MassData::default();
    };

    let n = vertices.len();
    let mut area = 0.0;
    let mut center = Vec2::ZERO;
    let mut inertia = 0.0;

    for i in 0..n {
        let e1 = vertices[i] - reference;
        let e2 = vertices[(i + 1) % n] - reference;
        let d = e1.perp_dot(e2);

        let triangle_area = 0.5 * d;
        area += triangle_area;
        center += (e1 + e2) * (triangle_area * INV_3);

        let int_x2 = e1.x * e1.x + e2.x * e1.x + e2.x * e2.x;
        let int_y2 = e1.y * e1.y + e2.y * e1.y + e2.y * e2.y;
        inertia += (0.25 * INV_3 * d) * (int_x2 + int_y2);
    }

    if area <= f32::EPSILON {
        return MassData {
            mass: 0.0,
            center: reference,
            inertia: 0.0,
        };
    }

    let mass = density * area;
    center /= area;
    let centroid = center + reference;

    // `inertia` is about the reference vertex: move it to the centroid, then to the origin.
    let inertia = density * inertia + mass * (centroid.length_squared() - center.length_squared());

    MassData {
        mass,
        center: centroid,
        inertia,
    }
}
