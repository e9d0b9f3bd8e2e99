//! Collision shape component: shape, material and filter state plus the
//! fixture built from them.

use glam::Vec2;

use super::body::BodyHandle;
use super::error::ShapeError;
use super::fixture::{
    check_property, CollisionFilter, Fixture, FixtureDef, FixtureHandle, FixtureHost, Material2d,
    ReleaseSender,
};
use super::mass::MassData;
use super::shape::Shape2d;

/// Where a shape is in its fixture lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeState {
    /// No live owning body, or disabled.
    Detached,
    /// Has an owner but the fixture is missing or out of date.
    PendingRefresh,
    /// Fixture exists and matches the current geometry.
    Live,
}

/// A 2D collision shape attached to a scene entity.
///
/// Geometry setters only mark the shape dirty; the fixture is rebuilt on the
/// next [`refresh`](Self::refresh), so several edits in a row cost one
/// rebuild. Material, filter and sensor setters update a live fixture in
/// place.
///
/// Release the fixture with [`on_detach`](Self::on_detach) before dropping
/// the shape. A shape dropped with a live fixture sends it back to its
/// host, which destroys it on the next [`FixtureHost::flush_released`].
#[derive(Debug)]
pub struct CollisionShape2d {
    geometry: Option<Shape2d>,
    material: Material2d,
    filter: CollisionFilter,
    is_sensor: bool,
    enabled: bool,
    owner: Option<BodyHandle>,
    fixture: Option<FixtureHandle>,
    dirty: bool,
    release_tx: Option<ReleaseSender>,
}

impl Default for CollisionShape2d {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionShape2d {
    /// An enabled, detached shape with no geometry.
    pub fn new() -> Self {
        Self {
            geometry: None,
            material: Material2d::default(),
            filter: CollisionFilter::default(),
            is_sensor: false,
            enabled: true,
            owner: None,
            fixture: None,
            dirty: false,
            release_tx: None,
        }
    }

    /// Start from a validated shape.
    pub fn from_shape(shape: Shape2d) -> Result<Self, ShapeError> {
        let mut this = Self::new();
        this.set_shape(shape)?;
        Ok(this)
    }

    /// Set the material before the shape is attached.
    pub fn with_material(mut self, material: Material2d) -> Self {
        self.material = material;
        self
    }

    /// Set the filter before the shape is attached.
    pub fn with_filter(mut self, filter: CollisionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Set the sensor flag before the shape is attached.
    pub fn with_sensor(mut self, is_sensor: bool) -> Self {
        self.is_sensor = is_sensor;
        self
    }

    // ---------------------------------------------------------------------
    // Geometry
    // ---------------------------------------------------------------------

    pub fn set_circle(&mut self, radius: f32, center: Vec2) -> Result<(), ShapeError> {
        self.replace_geometry(Shape2d::circle(radius, center)?);
        Ok(())
    }

    pub fn set_box(&mut self, half_extents: Vec2, center: Vec2) -> Result<(), ShapeError> {
        self.replace_geometry(Shape2d::rect(half_extents, center)?);
        Ok(())
    }

    pub fn set_box_size(
        &mut self,
        half_width: f32,
        half_height: f32,
        center: Vec2,
    ) -> Result<(), ShapeError> {
        self.set_box(Vec2::new(half_width, half_height), center)
    }

    pub fn set_polygon(&mut self, vertices: &[Vec2]) -> Result<(), ShapeError> {
        self.replace_geometry(Shape2d::polygon(vertices)?);
        Ok(())
    }

    pub fn set_chain(&mut self, vertices: &[Vec2]) -> Result<(), ShapeError> {
        self.replace_geometry(Shape2d::chain(vertices)?);
        Ok(())
    }

    pub fn set_edge(&mut self, vertex_a: Vec2, vertex_b: Vec2) -> Result<(), ShapeError> {
        self.replace_geometry(Shape2d::edge(vertex_a, vertex_b)?);
        Ok(())
    }

    /// Replace the geometry with any shape variant.
    pub fn set_shape(&mut self, shape: Shape2d) -> Result<(), ShapeError> {
        self.replace_geometry(shape.validated()?);
        Ok(())
    }

    fn replace_geometry(&mut self, shape: Shape2d) {
        self.geometry = Some(shape);
        self.dirty = true;
    }

    // ---------------------------------------------------------------------
    // Material & filter
    // ---------------------------------------------------------------------

    pub fn set_sensor<H: FixtureHost + ?Sized>(&mut self, is_sensor: bool, host: &mut H) {
        self.is_sensor = is_sensor;
        self.update_fixture(host, |fixture| fixture.set_sensor(is_sensor));
    }

    pub fn set_category_bits<H: FixtureHost + ?Sized>(&mut self, bits: u16, host: &mut H) {
        self.set_filter(
            CollisionFilter {
                category_bits: bits,
                ..self.filter
            },
            host,
        );
    }

    pub fn set_mask_bits<H: FixtureHost + ?Sized>(&mut self, bits: u16, host: &mut H) {
        self.set_filter(
            CollisionFilter {
                mask_bits: bits,
                ..self.filter
            },
            host,
        );
    }

    pub fn set_group_index<H: FixtureHost + ?Sized>(&mut self, group: i16, host: &mut H) {
        self.set_filter(
            CollisionFilter {
                group_index: group,
                ..self.filter
            },
            host,
        );
    }

    pub fn set_filter<H: FixtureHost + ?Sized>(&mut self, filter: CollisionFilter, host: &mut H) {
        self.filter = filter;
        self.update_fixture(host, |fixture| fixture.set_filter(filter));
    }

    pub fn set_density<H: FixtureHost + ?Sized>(
        &mut self,
        density: f32,
        host: &mut H,
    ) -> Result<(), ShapeError> {
        check_property("density", density)?;
        self.set_material(
            Material2d {
                density,
                ..self.material
            },
            host,
        )
    }

    pub fn set_friction<H: FixtureHost + ?Sized>(
        &mut self,
        friction: f32,
        host: &mut H,
    ) -> Result<(), ShapeError> {
        check_property("friction", friction)?;
        self.set_material(
            Material2d {
                friction,
                ..self.material
            },
            host,
        )
    }

    pub fn set_restitution<H: FixtureHost + ?Sized>(
        &mut self,
        restitution: f32,
        host: &mut H,
    ) -> Result<(), ShapeError> {
        check_property("restitution", restitution)?;
        self.set_material(
            Material2d {
                restitution,
                ..self.material
            },
            host,
        )
    }

    pub fn set_material<H: FixtureHost + ?Sized>(
        &mut self,
        material: Material2d,
        host: &mut H,
    ) -> Result<(), ShapeError> {
        material.validate()?;
        self.material = material;
        self.update_fixture(host, |fixture| fixture.set_material(material));
        Ok(())
    }

    /// Apply a property change to the live fixture, if there is one.
    fn update_fixture<H, F>(&self, host: &mut H, update: F)
    where
        H: FixtureHost + ?Sized,
        F: FnOnce(&mut Fixture),
    {
        let (Some(body), Some(handle)) = (self.owner, self.fixture.as_ref()) else {
            return;
        };
        match host.fixture_mut(body, handle) {
            Some(fixture) => update(fixture),
            None => tracing::trace!(?body, "fixture gone, property kept for next rebuild"),
        }
    }

    // ---------------------------------------------------------------------
    // Fixture lifecycle
    // ---------------------------------------------------------------------

    /// Rebuild the fixture if the shape is dirty.
    ///
    /// A destroyed owner is forgotten first, along with the fixture it took
    /// down. Without geometry, an owner or while disabled, the shape stays
    /// pending until those become available.
    pub fn refresh<H: FixtureHost + ?Sized>(&mut self, host: &mut H) {
        self.forget_stale_owner(host);
        if !self.dirty {
            return;
        }
        self.release(host);

        let Some(shape) = self.geometry.clone() else {
            return;
        };
        if !self.enabled {
            return;
        }
        let Some(body) = self.owner else {
            tracing::trace!("no owning body yet, fixture creation deferred");
            return;
        };

        let def = FixtureDef {
            shape,
            material: self.material,
            filter: self.filter,
            is_sensor: self.is_sensor,
        };
        match host.create_fixture(body, def) {
            Some(handle) => {
                tracing::debug!(?body, fixture = handle.id(), "created shape fixture");
                self.fixture = Some(handle);
                self.dirty = false;
                self.release_tx = host.release_sender();
            }
            None => {
                tracing::warn!(?body, "owning body refused fixture creation");
                self.owner = None;
            }
        }
    }

    /// Destroy the fixture, if any.
    ///
    /// The native destroy only runs while the owning body is alive; a
    /// fixture on a destroyed body is already gone and only the local token
    /// is dropped. Calling this again is a no-op.
    pub fn release<H: FixtureHost + ?Sized>(&mut self, host: &mut H) {
        let Some(handle) = self.fixture.take() else {
            return;
        };
        self.dirty = true;

        match self.owner {
            Some(body) if host.is_alive(body) => {
                tracing::debug!(?body, fixture = handle.id(), "released shape fixture");
                host.destroy_fixture(body, handle);
            }
            owner => {
                tracing::warn!(
                    ?owner,
                    fixture = handle.id(),
                    "owning body already destroyed, dropping fixture reference"
                );
            }
        }
    }

    /// Drop the owner, and the fixture token with it, once the body is gone.
    fn forget_stale_owner<H: FixtureHost + ?Sized>(&mut self, host: &mut H) {
        let Some(body) = self.owner else {
            return;
        };
        if host.is_alive(body) {
            return;
        }
        self.release(host);
        self.owner = None;
        tracing::debug!(?body, "forgot destroyed owning body");
    }

    // ---------------------------------------------------------------------
    // Node notifications
    // ---------------------------------------------------------------------

    /// The shape was attached to a node, or the node gained a body.
    ///
    /// `body` is the node's sibling body, if it has one.
    pub fn on_attach<H: FixtureHost + ?Sized>(&mut self, body: Option<BodyHandle>, host: &mut H) {
        if self.owner != body {
            self.release(host);
            self.owner = body;
        }
        self.refresh(host);
    }

    /// The shape was detached from its node or lost its body.
    pub fn on_detach<H: FixtureHost + ?Sized>(&mut self, host: &mut H) {
        self.release(host);
        self.owner = None;
    }

    /// The component was enabled or disabled.
    ///
    /// Disabling behaves like a detach. Enabling rebuilds against the
    /// current owner; the node re-resolves its body through
    /// [`on_attach`](Self::on_attach) when the owner was cleared.
    pub fn on_enabled_changed<H: FixtureHost + ?Sized>(&mut self, enabled: bool, host: &mut H) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            self.refresh(host);
        } else {
            self.on_detach(host);
        }
    }

    // ---------------------------------------------------------------------
    // Derived queries
    // ---------------------------------------------------------------------

    /// The live fixture, looked up through the host.
    pub fn live_fixture<'h, H: FixtureHost + ?Sized>(&self, host: &'h H) -> Option<&'h Fixture> {
        host.fixture(self.owner?, self.fixture.as_ref()?)
    }

    /// Mass properties of the live fixture; zero when there is none.
    pub fn mass_data<H: FixtureHost + ?Sized>(&self, host: &H) -> MassData {
        self.live_fixture(host)
            .map(Fixture::mass_data)
            .unwrap_or_default()
    }

    pub fn mass<H: FixtureHost + ?Sized>(&self, host: &H) -> f32 {
        self.mass_data(host).mass
    }

    /// Rotational inertia about the shape origin.
    pub fn inertia<H: FixtureHost + ?Sized>(&self, host: &H) -> f32 {
        self.mass_data(host).inertia
    }

    pub fn mass_center<H: FixtureHost + ?Sized>(&self, host: &H) -> Vec2 {
        self.mass_data(host).center
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn geometry(&self) -> Option<&Shape2d> {
        self.geometry.as_ref()
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

    pub fn category_bits(&self) -> u16 {
        self.filter.category_bits
    }

    pub fn mask_bits(&self) -> u16 {
        self.filter.mask_bits
    }

    pub fn group_index(&self) -> i16 {
        self.filter.group_index
    }

    pub fn density(&self) -> f32 {
        self.material.density
    }

    pub fn friction(&self) -> f32 {
        self.material.friction
    }

    pub fn restitution(&self) -> f32 {
        self.material.restitution
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn owner(&self) -> Option<BodyHandle> {
        self.owner
    }

    pub fn fixture(&self) -> Option<&FixtureHandle> {
        self.fixture.as_ref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Lifecycle state from the shape's own bookkeeping.
    ///
    /// A body destroyed behind the shape's back is only noticed on the next
    /// [`refresh`](Self::refresh); use [`state_in`](Self::state_in) to check
    /// the owner against the host.
    pub fn state(&self) -> ShapeState {
        if !self.enabled {
            return ShapeState::Detached;
        }
        match (self.owner, &self.fixture) {
            (None, _) => ShapeState::Detached,
            (Some(_), Some(_)) if !self.dirty => ShapeState::Live,
            (Some(_), _) => ShapeState::PendingRefresh,
        }
    }

    /// Lifecycle state with the owner's liveness checked through `host`.
    pub fn state_in<H: FixtureHost + ?Sized>(&self, host: &H) -> ShapeState {
        match self.owner {
            Some(body) if !host.is_alive(body) => ShapeState::Detached,
            _ => self.state(),
        }
    }
}

impl Drop for CollisionShape2d {
    fn drop(&mut self) {
        let Some(handle) = self.fixture.take() else {
            return;
        };
        let (Some(body), Some(tx)) = (self.owner, self.release_tx.as_ref()) else {
            tracing::warn!(
                owner = ?self.owner,
                fixture = handle.id(),
                "collision shape dropped without releasing its fixture"
            );
            return;
        };
        let fixture = handle.id();
        if tx.send((body, handle)).is_err() {
            tracing::trace!(?body, fixture, "host gone, fixture dropped with it");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BodyDef, PhysicsWorld2d};
    use std::f32::consts::PI;

    const EPS: f32 = 1e-4;

    /// Host wrapper that counts native fixture calls.
    #[derive(Default)]
    struct RecordingHost {
        world: PhysicsWorld2d,
        created: usize,
        destroyed: usize,
    }

    impl FixtureHost for RecordingHost {
        fn is_alive(&self, body: BodyHandle) -> bool {
            self.world.is_alive(body)
        }

        fn create_fixture(&mut self, body: BodyHandle, def: FixtureDef) -> Option<FixtureHandle> {
            self.created += 1;
            self.world.create_fixture(body, def)
        }

        fn destroy_fixture(&mut self, body: BodyHandle, fixture: FixtureHandle) {
            self.destroyed += 1;
            self.world.destroy_fixture(body, fixture);
        }

        fn fixture(&self, body: BodyHandle, fixture: &FixtureHandle) -> Option<&Fixture> {
            self.world.fixture(body, fixture)
        }

        fn fixture_mut(
            &mut self,
            body: BodyHandle,
            fixture: &FixtureHandle,
        ) -> Option<&mut Fixture> {
            self.world.fixture_mut(body, fixture)
        }

        fn release_sender(&self) -> Option<ReleaseSender> {
            self.world.release_sender()
        }

        fn flush_released(&mut self) {
            self.world.flush_released();
        }
    }

    fn host_with_body() -> (RecordingHost, BodyHandle) {
        let mut host = RecordingHost::default();
        let body = host.world.create_body(BodyDef::new_dynamic());
        (host, body)
    }

    fn fixture_count(host: &RecordingHost, body: BodyHandle) -> usize {
        host.world.body(body).map_or(0, |b| b.fixture_count())
    }

    #[test]
    fn test_new_shape_is_detached() {
        let shape = CollisionShape2d::new();
        assert_eq!(shape.state(), ShapeState::Detached);
        assert!(shape.geometry().is_none());
        assert!(shape.is_enabled());
        assert!(!shape.is_dirty());
        assert_eq!(shape.filter(), CollisionFilter::default());
    }

    #[test]
    fn test_attach_builds_one_matching_fixture() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_edge(Vec2::ZERO, Vec2::new(4.0, 0.0)).unwrap();
        assert!(shape.is_dirty());

        shape.on_attach(Some(body), &mut host);

        assert_eq!(shape.state(), ShapeState::Live);
        assert_eq!(host.created, 1);
        assert_eq!(fixture_count(&host, body), 1);
        let fixture = shape.live_fixture(&host).unwrap();
        assert_eq!(
            fixture.shape(),
            &Shape2d::edge(Vec2::ZERO, Vec2::new(4.0, 0.0)).unwrap()
        );
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_circle_mass_scenario() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.set_density(2.0, &mut host).unwrap();
        shape.on_attach(Some(body), &mut host);

        assert!((shape.mass(&host) - PI * 2.0).abs() < EPS);
        assert!((shape.inertia(&host) - PI).abs() < EPS);
        assert_eq!(shape.mass_center(&host), Vec2::ZERO);
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_geometry_setters_coalesce_until_refresh() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.on_attach(Some(body), &mut host);
        assert_eq!(host.created, 0);

        let triangle = [Vec2::ZERO, Vec2::new(2.0, 0.0), Vec2::new(0.0, 2.0)];
        shape.set_box_size(1.0, 1.0, Vec2::ZERO).unwrap();
        shape.set_polygon(&triangle).unwrap();
        shape.refresh(&mut host);
        shape.refresh(&mut host);

        assert_eq!(host.created, 1);
        assert_eq!(fixture_count(&host, body), 1);
        assert!(matches!(
            shape.live_fixture(&host).unwrap().shape(),
            Shape2d::Polygon { .. }
        ));
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_geometry_change_keeps_old_fixture_until_refresh() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::from_shape(Shape2d::circle(1.0, Vec2::ZERO).unwrap())
            .unwrap();
        shape.on_attach(Some(body), &mut host);

        shape.set_circle(2.0, Vec2::ZERO).unwrap();
        assert_eq!(shape.state(), ShapeState::PendingRefresh);
        assert_eq!(fixture_count(&host, body), 1);
        assert_eq!(host.destroyed, 0);

        shape.refresh(&mut host);
        assert_eq!(shape.state(), ShapeState::Live);
        assert_eq!(host.destroyed, 1);
        assert_eq!(host.created, 2);
        assert_eq!(fixture_count(&host, body), 1);
        assert!((shape.mass(&host) - 4.0 * PI).abs() < EPS);
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_invalid_geometry_keeps_previous_state() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);

        assert_eq!(
            shape.set_circle(-1.0, Vec2::ZERO),
            Err(ShapeError::InvalidRadius(-1.0))
        );
        assert!(shape.set_polygon(&[Vec2::ZERO, Vec2::X]).is_err());
        assert!(shape.set_edge(Vec2::ONE, Vec2::ONE).is_err());

        assert!(!shape.is_dirty());
        assert_eq!(shape.state(), ShapeState::Live);
        assert_eq!(
            shape.geometry(),
            Some(&Shape2d::circle(1.0, Vec2::ZERO).unwrap())
        );
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_release_is_idempotent() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);

        shape.release(&mut host);
        let after_once = (shape.state(), shape.is_dirty(), host.destroyed);
        shape.release(&mut host);
        let after_twice = (shape.state(), shape.is_dirty(), host.destroyed);

        assert_eq!(after_once, after_twice);
        assert_eq!(host.destroyed, 1);
        assert!(shape.fixture().is_none());
        assert_eq!(fixture_count(&host, body), 0);
    }

    #[test]
    fn test_material_and_filter_update_in_place() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_box(Vec2::ONE, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);

        shape.set_sensor(true, &mut host);
        shape.set_category_bits(0x0004, &mut host);
        shape.set_mask_bits(0x00F0, &mut host);
        shape.set_group_index(-7, &mut host);
        shape.set_density(3.0, &mut host).unwrap();
        shape.set_friction(0.9, &mut host).unwrap();
        shape.set_restitution(0.5, &mut host).unwrap();
        shape.set_category_bits(0x0008, &mut host);

        assert_eq!(host.created, 1);
        assert_eq!(host.destroyed, 0);
        assert!(!shape.is_dirty());

        let fixture = shape.live_fixture(&host).unwrap();
        assert!(fixture.is_sensor());
        assert_eq!(
            fixture.filter(),
            CollisionFilter {
                category_bits: 0x0008,
                mask_bits: 0x00F0,
                group_index: -7,
            }
        );
        assert_eq!(
            fixture.material(),
            Material2d {
                density: 3.0,
                friction: 0.9,
                restitution: 0.5,
            }
        );
        // 2x2 box at density 3.
        assert!((shape.mass(&host) - 12.0).abs() < EPS);
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_invalid_material_is_rejected() {
        let mut host = RecordingHost::default();
        let mut shape = CollisionShape2d::new();
        assert_eq!(
            shape.set_density(-1.0, &mut host),
            Err(ShapeError::InvalidMaterial {
                property: "density",
                value: -1.0
            })
        );
        assert!(shape.set_friction(f32::INFINITY, &mut host).is_err());
        assert_eq!(shape.material(), Material2d::default());
    }

    #[test]
    fn test_detach_reattach_round_trip() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new()
            .with_filter(CollisionFilter {
                category_bits: 0x0002,
                mask_bits: 0x0003,
                group_index: 4,
            })
            .with_sensor(true);
        shape.set_circle(0.5, Vec2::new(1.0, 0.0)).unwrap();
        shape.on_attach(Some(body), &mut host);
        let before = shape.live_fixture(&host).unwrap().clone();

        shape.on_detach(&mut host);
        assert_eq!(shape.state(), ShapeState::Detached);
        assert_eq!(fixture_count(&host, body), 0);
        assert_eq!(shape.mass(&host), 0.0);

        shape.on_attach(Some(body), &mut host);
        assert_eq!(shape.state(), ShapeState::Live);
        let after = shape.live_fixture(&host).unwrap();
        assert_eq!(after.shape(), before.shape());
        assert_eq!(after.filter(), before.filter());
        assert_eq!(after.material(), before.material());
        assert_eq!(after.is_sensor(), before.is_sensor());
        assert_eq!(host.created, 2);
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_unattached_queries_are_zero() {
        let host = RecordingHost::default();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ONE).unwrap();
        assert_eq!(shape.mass(&host), 0.0);
        assert_eq!(shape.inertia(&host), 0.0);
        assert_eq!(shape.mass_center(&host), Vec2::ZERO);
        assert!(shape.live_fixture(&host).is_none());
    }

    #[test]
    fn test_refresh_without_owner_is_deferred() {
        let mut host = RecordingHost::default();
        let mut shape = CollisionShape2d::new();
        shape.refresh(&mut host);
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.refresh(&mut host);

        assert_eq!(host.created, 0);
        assert!(shape.is_dirty());
        assert_eq!(shape.state(), ShapeState::Detached);

        // The body shows up later.
        let body = host.world.create_body(BodyDef::new_dynamic());
        shape.on_attach(Some(body), &mut host);
        assert_eq!(shape.state(), ShapeState::Live);
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_attach_without_geometry_is_noop() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.on_attach(Some(body), &mut host);
        assert_eq!(host.created, 0);
        assert_eq!(shape.state(), ShapeState::PendingRefresh);
    }

    #[test]
    fn test_stale_owner_release_skips_native_call() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);

        host.world.destroy_body(body);
        assert_eq!(shape.mass(&host), 0.0);

        shape.release(&mut host);
        assert_eq!(host.destroyed, 0);
        assert!(shape.fixture().is_none());

        // Refreshing against the dead owner forgets it instead of recreating.
        shape.refresh(&mut host);
        assert_eq!(host.created, 1);
        assert_eq!(shape.state(), ShapeState::Detached);
    }

    #[test]
    fn test_stale_owner_slot_reuse_is_not_confused() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);

        host.world.destroy_body(body);
        let replacement = host.world.create_body(BodyDef::new_dynamic());
        assert_eq!(replacement.index(), body.index());

        shape.on_detach(&mut host);
        assert_eq!(host.destroyed, 0);
        assert_eq!(fixture_count(&host, replacement), 0);
    }

    #[test]
    fn test_disable_and_enable() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);

        shape.on_enabled_changed(false, &mut host);
        assert!(!shape.is_enabled());
        assert_eq!(shape.state(), ShapeState::Detached);
        assert_eq!(fixture_count(&host, body), 0);

        // Disabled shapes do not build even when given a body.
        shape.on_attach(Some(body), &mut host);
        assert_eq!(host.created, 1);
        assert_eq!(shape.owner(), Some(body));
        assert_eq!(shape.state(), ShapeState::Detached);

        shape.on_enabled_changed(true, &mut host);
        assert_eq!(shape.state(), ShapeState::Live);
        assert_eq!(host.created, 2);
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_destroyed_owner_is_noticed_on_refresh() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);
        assert_eq!(shape.state_in(&host), ShapeState::Live);

        host.world.destroy_body(body);
        assert_eq!(shape.state_in(&host), ShapeState::Detached);

        // Not dirty, yet the refresh still drops the dead fixture token.
        assert!(!shape.is_dirty());
        shape.refresh(&mut host);
        assert_eq!(shape.state(), ShapeState::Detached);
        assert!(shape.fixture().is_none());
        assert!(shape.owner().is_none());
        assert_eq!(host.destroyed, 0);
        assert_eq!(host.created, 1);
    }

    #[test]
    fn test_dropped_shape_returns_fixture_to_host() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);
        assert_eq!(fixture_count(&host, body), 1);

        drop(shape);
        host.flush_released();
        assert_eq!(fixture_count(&host, body), 0);
        assert_eq!(host.world.body_mass_data(body), MassData::default());
    }

    #[test]
    fn test_chain_fixture_has_no_mass() {
        let (mut host, body) = host_with_body();
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();
        shape.on_attach(Some(body), &mut host);
        assert!(shape.mass(&host) > 0.0);

        let ground = [Vec2::new(-4.0, 0.0), Vec2::ZERO, Vec2::new(4.0, 1.0)];
        shape.set_chain(&ground).unwrap();
        shape.refresh(&mut host);

        assert_eq!(shape.state(), ShapeState::Live);
        assert_eq!(fixture_count(&host, body), 1);
        assert_eq!(
            shape.live_fixture(&host).unwrap().shape(),
            &Shape2d::chain(&ground).unwrap()
        );
        assert_eq!(shape.mass_data(&host), MassData::default());
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_moving_to_another_body() {
        let (mut host, first) = host_with_body();
        let second = host.world.create_body(BodyDef::new_dynamic());
        let mut shape = CollisionShape2d::new();
        shape.set_circle(1.0, Vec2::ZERO).unwrap();

        shape.on_attach(Some(first), &mut host);
        shape.on_attach(Some(second), &mut host);

        assert_eq!(fixture_count(&host, first), 0);
        assert_eq!(fixture_count(&host, second), 1);
        assert_eq!(shape.owner(), Some(second));
        shape.on_detach(&mut host);
    }

    #[test]
    fn test_group_index_forces_collision() {
        let mut physics = PhysicsWorld2d::default();
        let a_body = physics.create_body(BodyDef::new_dynamic());
        let b_body = physics.create_body(BodyDef::new_dynamic());

        let mut a = physics.new_shape();
        let mut b = physics.new_shape();
        a.set_circle(1.0, Vec2::ZERO).unwrap();
        b.set_circle(1.0, Vec2::ZERO).unwrap();
        a.on_attach(Some(a_body), &mut physics);
        b.on_attach(Some(b_body), &mut physics);

        // Disjoint categories: no contact.
        a.set_category_bits(0x0001, &mut physics);
        a.set_mask_bits(0x0001, &mut physics);
        b.set_category_bits(0x0002, &mut physics);
        b.set_mask_bits(0x0002, &mut physics);
        let pair = |a: &CollisionShape2d, b: &CollisionShape2d, physics: &PhysicsWorld2d| {
            physics.should_collide(
                (a_body, a.fixture().unwrap()),
                (b_body, b.fixture().unwrap()),
            )
        };
        assert!(!pair(&a, &b, &physics));

        // Same positive group wins over the masks.
        a.set_group_index(5, &mut physics);
        b.set_group_index(5, &mut physics);
        assert!(pair(&a, &b, &physics));

        // Same negative group never collides, even with matching masks.
        a.set_filter(CollisionFilter::default(), &mut physics);
        b.set_filter(CollisionFilter::default(), &mut physics);
        assert!(pair(&a, &b, &physics));
        a.set_group_index(-5, &mut physics);
        b.set_group_index(-5, &mut physics);
        assert!(!pair(&a, &b, &physics));

        a.on_detach(&mut physics);
        b.on_detach(&mut physics);
    }
}
