//! 2D physics core: shapes, fixtures, bodies and the collision shape component.
//!
//! # Architecture
//!
//! A [`CollisionShape2d`] owns at most one fixture, created lazily inside
//! the body it is attached to:
//!
//! 1. Geometry setters validate and mark the shape dirty
//! 2. Attaching to a body (or an explicit refresh) rebuilds the fixture
//! 3. Material and filter setters update the live fixture in place
//! 4. Mass queries read the live fixture
//!
//! Bodies live in [`PhysicsWorld2d`] and are referred to by
//! generation-checked [`BodyHandle`]s, so a shape whose body was destroyed
//! first notices instead of touching freed state. The world does not step;
//! it only stores bodies and fixtures.
//!
//! A shape dropped while it still holds a fixture sends it back to the
//! world, which destroys it on the next [`FixtureHost::flush_released`].

pub mod body;
pub mod collision_shape;
pub mod error;
pub mod fixture;
pub mod mass;
pub mod shape;

use crossbeam_channel::{Receiver, Sender};

pub use self::body::{Body, BodyDef, BodyHandle, BodyType};
pub use self::collision_shape::{CollisionShape2d, ShapeState};
pub use self::error::ShapeError;
pub use self::fixture::{
    CollisionFilter, Fixture, FixtureDef, FixtureHandle, FixtureHost, Material2d, ReleaseSender,
};
pub use self::mass::MassData;
pub use self::shape::{Shape2d, LINEAR_SLOP, MAX_POLYGON_VERTICES};

/// Configuration for the physics world.
#[derive(Debug, Clone, Default)]
pub struct PhysicsConfig {
    /// Material given to shapes built with [`PhysicsWorld2d::new_shape`].
    pub default_material: Material2d,
}

#[derive(Debug)]
struct BodySlot {
    generation: u32,
    body: Option<Body>,
}

/// Storage for bodies and their fixtures.
#[derive(Debug)]
pub struct PhysicsWorld2d {
    config: PhysicsConfig,
    slots: Vec<BodySlot>,
    free_slots: Vec<u32>,
    next_fixture_id: u32,
    release_tx: Sender<(BodyHandle, FixtureHandle)>,
    release_rx: Receiver<(BodyHandle, FixtureHandle)>,
}

impl Default for PhysicsWorld2d {
    fn default() -> Self {
        Self::new(PhysicsConfig::default())
    }
}

impl PhysicsWorld2d {
    /// Create an empty physics world with the given configuration.
    pub fn new(config: PhysicsConfig) -> Self {
        let (release_tx, release_rx) = crossbeam_channel::unbounded();
        Self {
            config,
            slots: Vec::new(),
            free_slots: Vec::new(),
            next_fixture_id: 0,
            release_tx,
            release_rx,
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// A detached shape carrying the configured default material.
    pub fn new_shape(&self) -> CollisionShape2d {
        CollisionShape2d::new().with_material(self.config.default_material)
    }

    /// Create a body. Freed slots are reused under a new generation.
    pub fn create_body(&mut self, def: BodyDef) -> BodyHandle {
        self.flush_released();
        let body = Body::new(&def);
        let handle = if let Some(index) = self.free_slots.pop() {
            let slot = &mut self.slots[index as usize];
            slot.body = Some(body);
            BodyHandle {
                index,
                generation: slot.generation,
            }
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(BodySlot {
                generation: 0,
                body: Some(body),
            });
            BodyHandle {
                index,
                generation: 0,
            }
        };
        tracing::debug!(?handle, body_type = ?def.body_type, "created body");
        handle
    }

    /// Destroy a body and every fixture on it.
    ///
    /// Returns `false` if the handle was already stale. Shapes still holding
    /// fixture tokens for this body detect the stale owner on their next
    /// release.
    pub fn destroy_body(&mut self, handle: BodyHandle) -> bool {
        self.flush_released();
        let Some(slot) = self.slots.get_mut(handle.index as usize) else {
            return false;
        };
        if slot.generation != handle.generation {
            return false;
        }
        let Some(body) = slot.body.take() else {
            return false;
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free_slots.push(handle.index);
        tracing::debug!(
            ?handle,
            fixtures = body.fixture_count(),
            "destroyed body"
        );
        true
    }

    pub fn body(&self, handle: BodyHandle) -> Option<&Body> {
        let slot = self.slots.get(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_ref()
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        let slot = self.slots.get_mut(handle.index as usize)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.body.as_mut()
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.body.is_some()).count()
    }

    /// Aggregate mass of a body's fixtures. Zero for stale handles.
    pub fn body_mass_data(&self, handle: BodyHandle) -> MassData {
        self.body(handle).map(Body::mass_data).unwrap_or_default()
    }

    /// Apply the filter rules to two live fixtures.
    ///
    /// Fixtures on the same body never collide. Returns `false` if either
    /// fixture is gone.
    pub fn should_collide(
        &self,
        (body_a, fixture_a): (BodyHandle, &FixtureHandle),
        (body_b, fixture_b): (BodyHandle, &FixtureHandle),
    ) -> bool {
        if body_a == body_b {
            return false;
        }
        match (self.fixture(body_a, fixture_a), self.fixture(body_b, fixture_b)) {
            (Some(a), Some(b)) => a.filter().should_collide(&b.filter()),
            _ => false,
        }
    }
}

impl FixtureHost for PhysicsWorld2d {
    fn is_alive(&self, body: BodyHandle) -> bool {
        self.body(body).is_some()
    }

    fn create_fixture(&mut self, body: BodyHandle, def: FixtureDef) -> Option<FixtureHandle> {
        self.flush_released();
        let id = self.next_fixture_id;
        let target = self.body_mut(body)?;
        target.insert_fixture(id, Fixture::new(body, def));
        self.next_fixture_id = self.next_fixture_id.wrapping_add(1);
        tracing::trace!(?body, fixture = id, "created fixture");
        Some(FixtureHandle::from_raw(id))
    }

    fn destroy_fixture(&mut self, body: BodyHandle, fixture: FixtureHandle) {
        let removed = self
            .body_mut(body)
            .and_then(|target| target.remove_fixture(&fixture));
        if removed.is_none() {
            tracing::warn!(?body, fixture = fixture.id(), "fixture not found on destroy");
        }
    }

    fn fixture(&self, body: BodyHandle, fixture: &FixtureHandle) -> Option<&Fixture> {
        self.body(body)?.fixture(fixture)
    }

    fn fixture_mut(&mut self, body: BodyHandle, fixture: &FixtureHandle) -> Option<&mut Fixture> {
        self.body_mut(body)?.fixture_mut(fixture)
    }

    fn release_sender(&self) -> Option<ReleaseSender> {
        Some(self.release_tx.clone())
    }

    fn flush_released(&mut self) {
        let released: Vec<_> = self.release_rx.try_iter().collect();
        for (body, fixture) in released {
            // A body destroyed since then took the fixture with it.
            let removed = self
                .body_mut(body)
                .and_then(|target| target.remove_fixture(&fixture));
            if removed.is_some() {
                tracing::debug!(?body, fixture = fixture.id(), "destroyed dropped shape's fixture");
            }
        }
    }
}
