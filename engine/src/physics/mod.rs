//! Physics module
//!
//! Kinematic movement against the block grid. Bodies are the [`Rigidbody`]
//! components attached to scene objects; this module drives them through the
//! scene so the object transform follows the body.
//!
//! # Unit System
//!
//! **1 unit = 1 block.** Velocities are blocks/s, accelerations blocks/s².
//!
//! Physics runs in grid space. Positions and directions are converted with
//! the scene's [`GridAxes`](crate::math::GridAxes) on the way in and out.

pub mod collision;
pub mod rigidbody;

pub use collision::{Aabb, BodyShape, probe_ground, sweep_axis};
pub use rigidbody::Rigidbody;

use glam::Vec3;

use crate::config::PhysicsConfig;
use crate::error::EngineResult;
use crate::scene::{ObjectId, Scene};
use crate::world::BlockWorld;

/// Step the rigidbody on `id` and move the object by the result.
///
/// Returns the new world position. Fails with a contract violation when the
/// object has no rigidbody.
pub fn move_body(
    scene: &mut Scene,
    id: ObjectId,
    world: &dyn BlockWorld,
    direction: Vec3,
    speed_cap: f32,
    dt: f32,
    config: &PhysicsConfig,
) -> EngineResult<Vec3> {
    let axes = scene.grid_axes();
    let position = scene.world_position(id)?;
    let body = scene.require_component_mut::<Rigidbody>(id)?;
    let moved = body.step(
        world,
        axes.apply(position),
        axes.apply(direction),
        speed_cap,
        dt,
        config,
    );
    let new_position = axes.apply(moved);
    if new_position != position {
        scene.set_world_position(id, new_position)?;
    }
    Ok(new_position)
}

/// Physics phase of a tick: integrate every body its owner did not move this
/// tick (gravity only), then clear the per-tick step marks.
///
/// Returns how many bodies were integrated here.
pub fn integrate_idle_bodies(
    scene: &mut Scene,
    world: &dyn BlockWorld,
    dt: f32,
    config: &PhysicsConfig,
) -> EngineResult<usize> {
    let mut integrated = 0;
    for id in scene.objects_with::<Rigidbody>() {
        let already_stepped = match scene.component_mut::<Rigidbody>(id) {
            Some(body) => std::mem::take(&mut body.stepped),
            None => continue,
        };
        if already_stepped {
            continue;
        }
        move_body(scene, id, world, Vec3::ZERO, 0.0, dt, config)?;
        if let Some(body) = scene.component_mut::<Rigidbody>(id) {
            body.stepped = false;
        }
        integrated += 1;
    }
    Ok(integrated)
}
