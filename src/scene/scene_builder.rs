//! Named test scenes
//!
//! Each scene populates a fresh physics world. The shapes here stand in for
//! the mesh-to-hull conversion an asset pipeline would provide: box hulls
//! and compound bodies assembled from several hulls.

use satbox_math::{Pose, Quat, Vec3};
use satbox_physics::{
    BodyKey, Collider, ConvexHull, HullError, PhysicsConfig, PhysicsWorld, RigidBody,
};
use std::fmt;

/// Error type for scene construction
#[derive(Debug)]
pub enum SceneError {
    /// The requested scene name is not a known scene
    UnknownScene(String),
    /// A collider's hull failed geometric validation
    Hull(HullError),
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::UnknownScene(name) => write!(f, "unknown scene '{}'", name),
            SceneError::Hull(err) => write!(f, "hull construction failed: {}", err),
        }
    }
}

impl std::error::Error for SceneError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SceneError::UnknownScene(_) => None,
            SceneError::Hull(err) => Some(err),
        }
    }
}

impl From<HullError> for SceneError {
    fn from(err: HullError) -> Self {
        SceneError::Hull(err)
    }
}

/// Build a named scene into a new physics world
pub fn build_scene(name: &str, config: &PhysicsConfig) -> Result<PhysicsWorld, SceneError> {
    let world = match name {
        "drop_test" => drop_test(config)?,
        "collision_test" => collision_test(config)?,
        other => return Err(SceneError::UnknownScene(other.to_string())),
    };
    log::info!(
        "scene '{}': {} bodies, {} colliders",
        name,
        world.body_count(),
        world.collider_count()
    );
    Ok(world)
}

/// A box dropping onto a static floor with an explicitly supplied velocity
fn drop_test(config: &PhysicsConfig) -> Result<PhysicsWorld, SceneError> {
    let mut world = PhysicsWorld::with_config(config.clone());

    add_static_floor(&mut world, -1.0)?;

    let falling = world.add_body(
        RigidBody::new()
            .with_position(Vec3::new(0.0, 5.0, 0.0))
            .with_linear_velocity(Vec3::new(0.0, -3.0, 0.0)),
    );
    attach_box(&mut world, falling, Vec3::new(1.0, 1.0, 1.0), Pose::identity())?;

    Ok(world)
}

/// The collision-detection probe scene: a static floor, a tilted box, and a
/// compound table body built from several hulls
fn collision_test(config: &PhysicsConfig) -> Result<PhysicsWorld, SceneError> {
    let mut world = PhysicsWorld::with_config(config.clone());

    add_static_floor(&mut world, -10.0)?;

    let tilted = world.add_body(
        RigidBody::new()
            .with_position(Vec3::new(10.0, 0.0, 0.0))
            .with_orientation(Quat::from_axis_angle(Vec3::Z, 0.78)),
    );
    attach_box(&mut world, tilted, Vec3::new(1.0, 1.0, 1.0), Pose::identity())?;

    let table = world.add_body(
        RigidBody::new()
            .with_position(Vec3::new(0.0, 20.0, 0.0))
            .with_orientation(Quat::from_axis_angle(Vec3::Z, 0.78)),
    );
    // Tabletop plus four legs, one hull each
    attach_box(
        &mut world,
        table,
        Vec3::new(1.5, 0.1, 1.0),
        Pose::from_position(Vec3::new(0.0, 1.0, 0.0)),
    )?;
    for (x, z) in [(-1.3, -0.8), (1.3, -0.8), (-1.3, 0.8), (1.3, 0.8)] {
        attach_box(
            &mut world,
            table,
            Vec3::new(0.1, 0.5, 0.1),
            Pose::from_position(Vec3::new(x, 0.4, z)),
        )?;
    }

    Ok(world)
}

/// Static slab with its top face at `top_y`
fn add_static_floor(world: &mut PhysicsWorld, top_y: f32) -> Result<(), SceneError> {
    let half = Vec3::new(20.0, 1.0, 20.0);
    let floor = world.add_body(RigidBody::new_static(Vec3::new(0.0, top_y - half.y, 0.0)));
    attach_box(world, floor, half, Pose::identity())?;
    Ok(())
}

fn attach_box(
    world: &mut PhysicsWorld,
    body: BodyKey,
    half_extents: Vec3,
    local_pose: Pose,
) -> Result<(), SceneError> {
    let hull = ConvexHull::cuboid(half_extents)?;
    // The body key was just created by the caller, so attach cannot fail
    world.attach_collider(body, Collider::hull(hull).with_local_pose(local_pose));
    Ok(())
}
