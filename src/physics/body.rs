//! Bodies and the generation-checked handles that refer to them.

use super::fixture::{Fixture, FixtureHandle};
use super::mass::MassData;

/// Rigid body type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Affected by forces and collisions.
    Dynamic,
    /// Immovable.
    Static,
    /// Position controlled by user, but affects dynamic bodies.
    Kinematic,
}

/// Parameters for creating a body.
#[derive(Debug, Clone, Copy)]
pub struct BodyDef {
    pub body_type: BodyType,
}

impl BodyDef {
    pub fn new_dynamic() -> Self {
        Self {
            body_type: BodyType::Dynamic,
        }
    }

    pub fn new_static() -> Self {
        Self {
            body_type: BodyType::Static,
        }
    }

    pub fn new_kinematic() -> Self {
        Self {
            body_type: BodyType::Kinematic,
        }
    }
}

/// Weak reference to a body.
///
/// Copying the handle does not keep the body alive. Once the body is
/// destroyed its slot generation moves on and every outstanding handle
/// reports dead, even if the slot is reused by a new body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl BodyHandle {
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

/// A body stored in the physics world.
#[derive(Debug)]
pub struct Body {
    body_type: BodyType,
    fixtures: Vec<(u32, Fixture)>,
}

impl Body {
    pub(crate) fn new(def: &BodyDef) -> Self {
        Self {
            body_type: def.body_type,
            fixtures: Vec::new(),
        }
    }

    pub fn body_type(&self) -> BodyType {
        self.body_type
    }

    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }

    /// Iterate live fixtures in creation order.
    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.fixtures.iter().map(|(_, fixture)| fixture)
    }

    pub(crate) fn insert_fixture(&mut self, id: u32, fixture: Fixture) {
        self.fixtures.push((id, fixture));
    }

    pub(crate) fn remove_fixture(&mut self, handle: &FixtureHandle) -> Option<Fixture> {
        let pos = self.fixtures.iter().position(|(id, _)| *id == handle.id())?;
        Some(self.fixtures.remove(pos).1)
    }

    pub(crate) fn fixture(&self, handle: &FixtureHandle) -> Option<&Fixture> {
        self.fixtures
            .iter()
            .find(|(id, _)| *id == handle.id())
            .map(|(_, fixture)| fixture)
    }

    pub(crate) fn fixture_mut(&mut self, handle: &FixtureHandle) -> Option<&mut Fixture> {
        self.fixtures
            .iter_mut()
            .find(|(id, _)| *id == handle.id())
            .map(|(_, fixture)| fixture)
    }

    /// Aggregate mass of all fixtures, in body-local coordinates.
    ///
    /// Only dynamic bodies carry mass; static and kinematic bodies report zero.
    pub fn mass_data(&self) -> MassData {
        if self.body_type != BodyType::Dynamic {
            return MassData::default();
        }
        MassData::combine(self.fixtures().map(Fixture::mass_data))
    }
}
