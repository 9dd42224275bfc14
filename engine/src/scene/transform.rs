//! Local transform state with a lazily cached world matrix.
//!
//! A `Transform` only knows its own local TRS. The hierarchy (parent and
//! children) lives on the owning [`GameObject`](super::GameObject), and world
//! composition is driven by [`Scene`](super::Scene) so that invalidation can
//! reach every descendant. Local setters are crate-private for that reason:
//! mutating through the scene is the only way to keep descendants consistent.

use std::cell::Cell;

use glam::{Mat4, Quat, Vec3};

use crate::math::euler_degrees_to_quat;

/// Position / rotation / scale relative to the parent object.
#[derive(Debug, Clone)]
pub struct Transform {
    local_position: Vec3,
    /// Euler degrees: x = pitch, y = yaw, z = roll.
    local_rotation: Vec3,
    local_scale: Vec3,
    /// Cached world matrix; `None` means dirty.
    world: Cell<Option<Mat4>>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            local_position: Vec3::ZERO,
            local_rotation: Vec3::ZERO,
            local_scale: Vec3::ONE,
            world: Cell::new(None),
        }
    }
}

impl Transform {
    /// Identity transform, dirty until first read.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transform at a local position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            local_position: position,
            ..Default::default()
        }
    }

    #[inline]
    pub fn local_position(&self) -> Vec3 {
        self.local_position
    }

    /// Local rotation in Euler degrees.
    #[inline]
    pub fn local_rotation(&self) -> Vec3 {
        self.local_rotation
    }

    #[inline]
    pub fn local_scale(&self) -> Vec3 {
        self.local_scale
    }

    /// Local rotation as a quaternion.
    pub fn local_quat(&self) -> Quat {
        euler_degrees_to_quat(self.local_rotation)
    }

    /// Build the local `T * R * S` matrix.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.local_scale,
            self.local_quat(),
            self.local_position,
        )
    }

    /// Whether the cached world matrix must be recomputed.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.world.get().is_none()
    }

    pub(crate) fn set_local_position(&mut self, position: Vec3) {
        self.local_position = position;
    }

    pub(crate) fn set_local_rotation(&mut self, degrees: Vec3) {
        self.local_rotation = degrees;
    }

    pub(crate) fn set_local_scale(&mut self, scale: Vec3) {
        self.local_scale = scale;
    }

    #[inline]
    pub(crate) fn cached_world(&self) -> Option<Mat4> {
        self.world.get()
    }

    #[inline]
    pub(crate) fn store_world(&self, world: Mat4) {
        self.world.set(Some(world));
    }

    #[inline]
    pub(crate) fn invalidate(&self) {
        self.world.set(None);
    }
}
