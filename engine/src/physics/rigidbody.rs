//! Kinematic Rigidbody
//!
//! A box-shaped body that falls, jumps and walks against the block grid.
//! There is no rotation and no body-to-body contact: the only collider is
//! the world.
//!
//! # Step order
//!
//! 1. Pending impulses are added to the velocity and cleared.
//! 2. Gravity pulls the vertical velocity toward terminal velocity.
//! 3. The requested direction sets the horizontal velocity, capped at the
//!    speed limit.
//! 4. The displacement is swept per axis (Y, X, Z). A blocked axis is
//!    cancelled and a blocked Y also zeroes the vertical velocity.
//! 5. A short probe below the base refreshes the grounded flag.
//!
//! The body does not scale its input by grounded state. Reduced air control
//! is the caller's policy.

use glam::{Vec2, Vec3};

use crate::config::PhysicsConfig;
use crate::world::BlockWorld;

use super::collision::{Aabb, BodyShape, probe_ground, sweep_axis};

#[derive(Debug, Clone, PartialEq)]
pub struct Rigidbody {
    velocity: Vec3,
    pending_impulse: Vec3,
    grounded: bool,
    shape: BodyShape,
    /// Set when stepped during the current tick; cleared by the physics phase.
    pub(crate) stepped: bool,
}

impl Rigidbody {
    /// Body with the given half width (X/Z) and height.
    pub fn new(half_width: f32, height: f32) -> Self {
        Self::with_shape(BodyShape::new(half_width, height))
    }

    pub fn with_shape(shape: BodyShape) -> Self {
        Self {
            velocity: Vec3::ZERO,
            pending_impulse: Vec3::ZERO,
            grounded: false,
            shape,
            stepped: false,
        }
    }

    #[inline]
    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }

    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Impulse waiting for the next step.
    #[inline]
    pub fn pending_impulse(&self) -> Vec3 {
        self.pending_impulse
    }

    /// Result of the most recent ground probe.
    #[inline]
    pub fn grounded(&self) -> bool {
        self.grounded
    }

    #[inline]
    pub fn shape(&self) -> BodyShape {
        self.shape
    }

    pub fn aabb_at(&self, position: Vec3) -> Aabb {
        self.shape.aabb_at(position)
    }

    /// Horizontal speed of the last step.
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }

    /// Queue an instantaneous velocity change. Impulses add up and are
    /// consumed by the next step.
    pub fn add_force(&mut self, impulse: Vec3) {
        if impulse.is_finite() {
            self.pending_impulse += impulse;
        }
    }

    /// Re-probe the ground without moving.
    pub fn refresh_grounded(&mut self, world: &dyn BlockWorld, position: Vec3, config: &PhysicsConfig) -> bool {
        self.grounded = probe_ground(world, self.shape, position, config.ground_probe);
        self.grounded
    }

    /// Integrate one step from `position` and return the new base position.
    ///
    /// `direction` is read on X/Z only and is expected to have length ≤ 1.
    /// A zero direction means no horizontal motion while gravity still acts.
    pub fn step(
        &mut self,
        world: &dyn BlockWorld,
        position: Vec3,
        direction: Vec3,
        speed_cap: f32,
        dt: f32,
        config: &PhysicsConfig,
    ) -> Vec3 {
        self.stepped = true;
        if !(dt > 0.0 && dt.is_finite()) {
            self.refresh_grounded(world, position, config);
            return position;
        }

        let impulse = std::mem::take(&mut self.pending_impulse);
        let vertical = (self.velocity.y + impulse.y - config.gravity * dt)
            .max(-config.terminal_velocity.abs());

        let cap = speed_cap.max(0.0);
        let wish = if direction.is_finite() {
            Vec2::new(direction.x, direction.z) * cap
        } else {
            Vec2::ZERO
        };
        let horizontal = wish.clamp_length_max(cap) + Vec2::new(impulse.x, impulse.z);
        self.velocity = Vec3::new(horizontal.x, vertical, horizontal.y);

        let displacement = self.velocity * dt;
        let mut position = position;
        for axis in [1, 0, 2] {
            let (moved, blocked) = sweep_axis(
                world,
                self.shape,
                position,
                axis,
                displacement[axis],
                config.max_substep,
                config.skin,
            );
            position = moved;
            if blocked {
                self.velocity[axis] = 0.0;
            }
        }

        self.refresh_grounded(world, position, config);
        log::trace!(
            "rigidbody step: pos={:?} vel={:?} grounded={}",
            position,
            self.velocity,
            self.grounded
        );
        position
    }
}
