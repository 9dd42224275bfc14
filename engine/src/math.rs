//! Math helpers shared by the scene graph, physics and raycaster.
//!
//! Rotations are stored as Euler angles in **degrees** (`x` = pitch,
//! `y` = yaw, `z` = roll) and composed as `Ry * Rx * Rz`, so yaw turns around
//! world up and pitch tilts around the already-yawed right axis.
//!
//! Canonical axes: forward = +Z, right = +X, up = +Y.

use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Canonical forward axis before any rotation.
pub const FORWARD: Vec3 = Vec3::Z;
/// Canonical right axis before any rotation.
pub const RIGHT: Vec3 = Vec3::X;
/// Canonical up axis before any rotation.
pub const UP: Vec3 = Vec3::Y;

/// Convert an Euler-degree rotation into a quaternion.
#[inline]
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        degrees.y.to_radians(),
        degrees.x.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Convert a quaternion back into Euler degrees (`x` pitch, `y` yaw, `z` roll).
#[inline]
pub fn quat_to_euler_degrees(rotation: Quat) -> Vec3 {
    let (yaw, pitch, roll) = rotation.to_euler(EulerRot::YXZ);
    Vec3::new(pitch.to_degrees(), yaw.to_degrees(), roll.to_degrees())
}

/// Fixed axis convention adapter between scene space and block-grid space.
///
/// The transform hierarchy keeps a single source of truth; consumers that
/// address the collision grid (the raycaster, the rigidbody) convert at the
/// call site. Every variant is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridAxes {
    /// Grid and scene share axes.
    #[default]
    Identity,
    /// Grid stored with the opposite handedness (Z mirrored).
    MirrorZ,
    /// Grid stored with X and Z exchanged.
    SwapXZ,
}

impl GridAxes {
    /// Map a point or direction between scene space and grid space.
    #[inline]
    pub fn apply(self, v: Vec3) -> Vec3 {
        match self {
            GridAxes::Identity => v,
            GridAxes::MirrorZ => Vec3::new(v.x, v.y, -v.z),
            GridAxes::SwapXZ => Vec3::new(v.z, v.y, v.x),
        }
    }
}

/// Wrap an angle in degrees with the remainder operator (keeps the sign,
/// so -370 becomes -10).
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    angle % 360.0
}
