//! Fixtures: a shape bound to a body together with its material and filter.

use super::body::BodyHandle;
use super::error::ShapeError;
use super::mass::MassData;
use super::shape::Shape2d;

/// Surface and bulk properties of a fixture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material2d {
    /// Mass per unit area (default: 1.0).
    pub density: f32,
    /// Coulomb friction coefficient (default: 0.2).
    pub friction: f32,
    /// Coefficient of restitution, usually 0.0 - 1.0 (default: 0.0).
    pub restitution: f32,
}

impl Default for Material2d {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.2,
            restitution: 0.0,
        }
    }
}

impl Material2d {
    /// Check that every property is finite and non-negative.
    pub fn validate(&self) -> Result<(), ShapeError> {
        check_property("density", self.density)?;
        check_property("friction", self.friction)?;
        check_property("restitution", self.restitution)
    }
}

/// Reject negative and non-finite material values.
pub(crate) fn check_property(property: &'static str, value: f32) -> Result<(), ShapeError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ShapeError::InvalidMaterial { property, value })
    }
}

/// Contact filtering data.
///
/// Two fixtures with the same non-zero `group_index` always collide when the
/// group is positive and never collide when it is negative. Otherwise each
/// fixture's mask must accept the other's category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CollisionFilter {
    /// Categories this fixture belongs to (default: 0x0001).
    pub category_bits: u16,
    /// Categories this fixture accepts contacts with (default: 0xFFFF).
    pub mask_bits: u16,
    /// Group override (default: 0, no group).
    pub group_index: i16,
}

impl Default for CollisionFilter {
    fn default() -> Self {
        Self {
            category_bits: 0x0001,
            mask_bits: 0xFFFF,
            group_index: 0,
        }
    }
}

impl CollisionFilter {
    /// Whether fixtures carrying these two filters may touch.
    pub fn should_collide(&self, other: &CollisionFilter) -> bool {
        if self.group_index == other.group_index && self.group_index != 0 {
            return self.group_index > 0;
        }
        (self.mask_bits & other.category_bits) != 0 && (other.mask_bits & self.category_bits) != 0
    }
}

/// Everything needed to create a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureDef {
    pub shape: Shape2d,
    pub material: Material2d,
    pub filter: CollisionFilter,
    /// Sensors report overlaps but produce no collision response.
    pub is_sensor: bool,
}

impl FixtureDef {
    /// A solid fixture with default material and filter.
    pub fn new(shape: Shape2d) -> Self {
        Self {
            shape,
            material: Material2d::default(),
            filter: CollisionFilter::default(),
            is_sensor: false,
        }
    }
}

/// A live fixture stored inside a body.
#[derive(Debug, Clone)]
pub struct Fixture {
    body: BodyHandle,
    shape: Shape2d,
    material: Material2d,
    filter: CollisionFilter,
    is_sensor: bool,
}

impl Fixture {
    pub(crate) fn new(body: BodyHandle, def: FixtureDef) -> Self {
        Self {
            body,
            shape: def.shape,
            material: def.material,
            filter: def.filter,
            is_sensor: def.is_sensor,
        }
    }

    /// The body this fixture is attached to.
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    pub fn shape(&self) -> &Shape2d {
        &self.shape
    }

    pub fn material(&self) -> Material2d {
        self.material
    }

    pub fn filter(&self) -> CollisionFilter {
        self.filter
    }

    pub fn is_sensor(&self) -> bool {
        self.is_sensor
    }

    pub fn set_sensor(&mut self, is_sensor: bool) {
        self.is_sensor = is_sensor;
    }

    pub fn set_filter(&mut self, filter: CollisionFilter) {
        self.filter = filter;
    }

    pub fn set_material(&mut self, material: Material2d) {
        self.material = material;
    }

    /// Mass properties from the current shape and density.
    pub fn mass_data(&self) -> MassData {
        self.shape.compute_mass(self.material.density)
    }
}

/// Owned token for one fixture inside a [`FixtureHost`].
///
/// Not `Clone`: whoever holds the token is the only party that may destroy
/// the fixture, and destroying it consumes the token.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct FixtureHandle(u32);

impl FixtureHandle {
    /// Wrap a host-assigned fixture id. Only hosts should call this.
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn id(&self) -> u32 {
        self.0
    }
}

/// Sending half of a host's queue of fixtures whose shape was dropped while
/// still holding them.
pub type ReleaseSender = crossbeam_channel::Sender<(BodyHandle, FixtureHandle)>;

/// The body side of the fixture boundary.
///
/// Implemented by [`PhysicsWorld2d`](super::PhysicsWorld2d); any other
/// physics binding can stand in by implementing it.
pub trait FixtureHost {
    /// Whether `body` still refers to a live body.
    fn is_alive(&self, body: BodyHandle) -> bool;

    /// Create a fixture on `body`. Returns `None` when the body is gone.
    fn create_fixture(&mut self, body: BodyHandle, def: FixtureDef) -> Option<FixtureHandle>;

    /// Destroy a fixture previously created on `body`.
    fn destroy_fixture(&mut self, body: BodyHandle, fixture: FixtureHandle);

    /// Look up a live fixture.
    fn fixture(&self, body: BodyHandle, fixture: &FixtureHandle) -> Option<&Fixture>;

    /// Look up a live fixture for in-place property updates.
    fn fixture_mut(&mut self, body: BodyHandle, fixture: &FixtureHandle) -> Option<&mut Fixture>;

    /// Where a shape dropped with a live fixture sends it for destruction.
    ///
    /// Hosts returning `None` leak such fixtures.
    fn release_sender(&self) -> Option<ReleaseSender> {
        None
    }

    /// Destroy the fixtures sent by dropped shapes.
    fn flush_released(&mut self) {}
}
