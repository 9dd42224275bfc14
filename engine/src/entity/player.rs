//! Player Entity
//!
//! First-person player: a body that walks, runs and jumps, a `Camera` child
//! that mouselook rotates, and block editing along the camera ray (left
//! click removes the struck block, right click places bedrock in front of
//! the struck face).
//!
//! Movement is relative to where the camera looks, flattened onto the XZ
//! plane. While airborne the requested direction is damped by
//! `PhysicsConfig::air_control`.

use glam::{Vec2, Vec3};

use crate::camera::Camera;
use crate::config::PlayerConfig;
use crate::error::{EngineError, EngineResult};
use crate::input::{KeyCode, MouseButton};
use crate::math::wrap_degrees;
use crate::physics::{self, BodyShape, Rigidbody};
use crate::scene::{ObjectId, Scene};
use crate::world::{BlockType, raycast};

use super::{Entity, EntityAttributes, EntityContext, EntityCore, flatten};

/// Name of the camera-bearing child object.
pub const CAMERA_NAME: &str = "Camera";

pub struct EntityPlayer {
    core: EntityCore,
    settings: PlayerConfig,
    camera: Option<ObjectId>,
}

impl EntityPlayer {
    pub const REGISTRY_NAME: &'static str = "entity_player";

    pub fn new(object: ObjectId, settings: &PlayerConfig) -> Self {
        let attributes = EntityAttributes::new(
            settings.max_health,
            settings.walking_speed,
            settings.running_speed,
            BodyShape::new(settings.half_width, settings.height),
        );
        Self {
            core: EntityCore::new(Self::REGISTRY_NAME, object, attributes),
            settings: *settings,
            camera: None,
        }
    }

    /// Camera child, once initialized.
    pub fn camera(&self) -> Option<ObjectId> {
        self.camera
    }

    pub fn mouse_sensitivity(&self) -> f32 {
        self.settings.mouse_sensitivity
    }

    fn camera_id(&self) -> EngineResult<ObjectId> {
        self.camera
            .ok_or_else(|| EngineError::contract("player camera used before initialize"))
    }

    /// Block edits along the camera ray.
    fn update_controls(&mut self, ctx: &mut EntityContext<'_>, camera: ObjectId) -> EngineResult<()> {
        let remove = ctx.input.mouse_pressed(MouseButton::Left);
        let place = ctx.input.mouse_pressed(MouseButton::Right);
        if !remove && !place {
            return Ok(());
        }

        let origin = ctx.scene.world_position_transposed(camera)?;
        let direction = ctx.scene.forward_transposed(camera)?;
        let Some(hit) = raycast::cast(&*ctx.world, origin, direction, self.settings.reach) else {
            return Ok(());
        };

        if remove {
            let cell = hit.struck_cell();
            if ctx.world.set_block(cell, BlockType::AIR, false) {
                log::debug!("removed {} at {}", hit.block_type.name(), cell);
            }
        }
        if place {
            let cell = hit.adjacent_cell();
            if ctx.world.set_block(cell, BlockType::BEDROCK, true) {
                log::debug!("placed bedrock at {}", cell);
            } else {
                log::warn!("cannot place at {}: cell is occupied", cell);
            }
        }
        Ok(())
    }

    /// Rotate the camera by the mouse delta, clamp pitch, wrap yaw.
    fn update_mouselook(&mut self, ctx: &mut EntityContext<'_>, camera: ObjectId) -> EngineResult<()> {
        let delta = ctx.input.mouse_delta();
        if delta != Vec2::ZERO && delta.is_finite() {
            let scale = self.settings.mouse_sensitivity * ctx.dt;
            ctx.scene
                .rotate(camera, Vec3::new(delta.y * scale, delta.x * scale, 0.0))?;
        }

        let rotation = ctx.scene.transform(camera)?.local_rotation();
        let limit = self.settings.pitch_limit;
        let clamped = Vec3::new(
            rotation.x.clamp(-limit, limit),
            wrap_degrees(rotation.y),
            rotation.z,
        );
        if clamped != rotation {
            ctx.scene.set_local_rotation(camera, clamped)?;
        }
        ctx.input.reset_mouse_delta();
        Ok(())
    }

    /// WASD relative to the camera, jump on Space, run on Shift.
    fn update_movement(&mut self, ctx: &mut EntityContext<'_>, camera: ObjectId) -> EngineResult<()> {
        let object = self.core.object();
        let forward = flatten(ctx.scene.forward(camera)?);
        let right = flatten(ctx.scene.right(camera)?);

        let mut direction = Vec3::ZERO;
        if ctx.input.key_held(KeyCode::W) {
            direction += forward;
        }
        if ctx.input.key_held(KeyCode::S) {
            direction -= forward;
        }
        if ctx.input.key_held(KeyCode::D) {
            direction += right;
        }
        if ctx.input.key_held(KeyCode::A) {
            direction -= right;
        }

        let body = ctx.scene.require_component_mut::<Rigidbody>(object)?;
        let grounded = body.grounded();
        if grounded && ctx.input.key_held(KeyCode::Space) {
            body.add_force(Vec3::new(0.0, self.settings.jump_impulse, 0.0));
        }

        let mut direction = direction.normalize_or_zero();
        if !grounded {
            direction *= ctx.config.physics.air_control;
        }

        let running = ctx.input.key_held(KeyCode::ShiftLeft) || ctx.input.key_held(KeyCode::ShiftRight);
        let speed = if running {
            self.running_speed()
        } else {
            self.walking_speed()
        };

        physics::move_body(
            ctx.scene,
            object,
            &*ctx.world,
            direction,
            speed,
            ctx.dt,
            &ctx.config.physics,
        )?;
        Ok(())
    }
}

impl Entity for EntityPlayer {
    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn on_initialize(&mut self, ctx: &mut EntityContext<'_>) -> EngineResult<()> {
        ctx.input.set_cursor_locked(true);

        let camera = ctx.scene.create(CAMERA_NAME);
        if let Err(err) = ctx.scene.add_child(self.core.object(), camera) {
            ctx.scene.destroy(camera)?;
            return Err(err);
        }
        ctx.scene
            .set_local_position(camera, Vec3::new(0.0, self.settings.camera_height, 0.0))?;
        ctx.scene.add_component(
            camera,
            Camera::new(
                self.settings.camera_fov,
                self.settings.camera_near,
                self.settings.camera_far,
            ),
        )?;
        self.camera = Some(camera);
        Ok(())
    }

    fn on_update(&mut self, ctx: &mut EntityContext<'_>) -> EngineResult<()> {
        let camera = self.camera_id()?;
        self.update_controls(ctx, camera)?;
        self.update_mouselook(ctx, camera)?;
        self.update_movement(ctx, camera)
    }

    fn on_destroy(&mut self, _scene: &mut Scene) {
        self.camera = None;
    }
}
