use glam::Vec2;
use rein2d::ecs::components::physics::CollisionShape2d;
use rein2d::ecs::systems::{
    attach_body, attach_shape, despawn_entity, refresh_shapes_system, set_shape_enabled,
};
use rein2d::physics::{BodyDef, CollisionFilter, PhysicsConfig, PhysicsWorld2d};
use tracing::info;
use tracing_subscriber::EnvFilter;

const GROUND: u16 = 0x0001;
const CRATE: u16 = 0x0002;
const TRIGGER: u16 = 0x0004;

fn report(world: &hecs::World, physics: &PhysicsWorld2d, label: &str, entity: hecs::Entity) {
    if let Ok(shape) = world.get::<&CollisionShape2d>(entity) {
        info!(
            label,
            state = ?shape.state_in(physics),
            mass = shape.mass(physics),
            inertia = shape.inertia(physics),
            center = ?shape.mass_center(physics),
            "shape"
        );
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut world = hecs::World::new();
    let mut physics = PhysicsWorld2d::new(PhysicsConfig::default());

    // Ground: an open chain on a static body.
    let ground = world.spawn(());
    attach_body(&mut world, ground, BodyDef::new_static(), &mut physics)?;
    let mut ground_shape = physics.new_shape().with_filter(CollisionFilter {
        category_bits: GROUND,
        mask_bits: CRATE,
        group_index: 0,
    });
    ground_shape.set_chain(&[
        Vec2::new(-10.0, 2.0),
        Vec2::new(-10.0, 0.0),
        Vec2::new(10.0, 0.0),
        Vec2::new(10.0, 2.0),
    ])?;
    attach_shape(&mut world, ground, ground_shape, &mut physics)?;

    // A crate whose shape is configured before its body exists.
    let crate_entity = world.spawn(());
    let mut crate_shape = physics.new_shape().with_filter(CollisionFilter {
        category_bits: CRATE,
        mask_bits: GROUND | CRATE | TRIGGER,
        group_index: 0,
    });
    crate_shape.set_box_size(0.5, 0.5, Vec2::ZERO)?;
    attach_shape(&mut world, crate_entity, crate_shape, &mut physics)?;
    report(&world, &physics, "crate before body", crate_entity);

    let crate_body = attach_body(&mut world, crate_entity, BodyDef::new_dynamic(), &mut physics)?;
    report(&world, &physics, "crate", crate_entity);

    // Swap the crate's geometry and density; one rebuild on refresh.
    {
        let mut shape = world.get::<&mut CollisionShape2d>(crate_entity)?;
        shape.set_polygon(&[
            Vec2::new(-0.5, -0.5),
            Vec2::new(0.5, -0.5),
            Vec2::new(0.0, 0.75),
        ])?;
        shape.set_density(4.0, &mut physics)?;
    }
    refresh_shapes_system(&mut world, &mut physics);
    report(&world, &physics, "crate as triangle", crate_entity);
    info!(mass_data = ?physics.body_mass_data(crate_body), "crate body");

    // A sensor that is switched off and back on.
    let trigger = world.spawn(());
    attach_body(&mut world, trigger, BodyDef::new_kinematic(), &mut physics)?;
    let mut trigger_shape = physics.new_shape().with_sensor(true).with_filter(CollisionFilter {
        category_bits: TRIGGER,
        mask_bits: CRATE,
        group_index: 0,
    });
    trigger_shape.set_circle(2.0, Vec2::new(0.0, 1.0))?;
    attach_shape(&mut world, trigger, trigger_shape, &mut physics)?;
    set_shape_enabled(&mut world, trigger, false, &mut physics)?;
    report(&world, &physics, "trigger disabled", trigger);
    set_shape_enabled(&mut world, trigger, true, &mut physics)?;
    report(&world, &physics, "trigger enabled", trigger);

    for entity in [trigger, crate_entity, ground] {
        despawn_entity(&mut world, entity, &mut physics)?;
    }
    info!(bodies = physics.body_count(), "scene torn down");
    Ok(())
}
