//! Voxel Raycasting
//!
//! Incremental grid traversal (Amanatides & Woo) over unit blocks. Each step
//! advances to the nearest lattice plane crossing, so exactly one face is
//! crossed per step and the entered face gives the hit normal.

use glam::{IVec3, Vec3};

use super::block::{BlockCoord, BlockType, BlockWorld};

/// First solid block along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    /// Block that was struck.
    pub block: BlockCoord,
    /// What was there when the ray hit it.
    pub block_type: BlockType,
    /// Point where the ray entered the block.
    pub point: Vec3,
    /// Outward normal of the entered face (one of the six axis units).
    pub normal: IVec3,
    /// Distance from the origin to `point`.
    pub distance: f32,
}

impl RaycastHit {
    /// Block behind the hit face (half a block inward from `point`).
    ///
    /// Taken from the traversal cell rather than re-flooring `point`, which
    /// picks a neighbour when the hit lies on an edge or corner.
    pub fn struck_cell(&self) -> BlockCoord {
        self.block
    }

    /// Block in front of the hit face (where a placed block goes).
    pub fn adjacent_cell(&self) -> BlockCoord {
        self.block + self.normal
    }
}

/// Upper bound on traversal steps for a ray of `max_distance`.
///
/// Longest ray `cast` will walk; larger distances are clamped to this.
pub const MAX_RAY_DISTANCE: f32 = 4096.0;

/// A unit-length ray crosses at most three planes per block of travel.
/// Saturates instead of overflowing for huge distances.
#[inline]
pub fn step_ceiling(max_distance: f32) -> usize {
    (max_distance.max(0.0).ceil() as usize)
        .saturating_mul(3)
        .saturating_add(3)
}

/// Cast a ray and return the first solid block within `max_distance`.
///
/// A block that strictly contains `origin` is never reported, because a hit
/// needs an entered face. An origin lying exactly on a block face counts as
/// entering the block on the far side of that face at distance zero. A zero
/// or non-finite direction, a non-finite origin, or a non-positive distance
/// yields `None`.
pub fn cast(
    world: &dyn BlockWorld,
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
) -> Option<RaycastHit> {
    let dir = direction.normalize_or_zero();
    if dir == Vec3::ZERO || !origin.is_finite() || !max_distance.is_finite() || max_distance <= 0.0
    {
        return None;
    }
    let max_distance = max_distance.min(MAX_RAY_DISTANCE);

    let step = IVec3::new(sign_i(dir.x), sign_i(dir.y), sign_i(dir.z));
    let mut cell = IVec3::new(
        start_cell(origin.x, step.x),
        start_cell(origin.y, step.y),
        start_cell(origin.z, step.z),
    );

    let mut t_max = Vec3::new(
        dda_t_max(origin.x, dir.x, cell.x, step.x),
        dda_t_max(origin.y, dir.y, cell.y, step.y),
        dda_t_max(origin.z, dir.z, cell.z, step.z),
    );
    let t_delta = Vec3::new(dda_t_delta(dir.x), dda_t_delta(dir.y), dda_t_delta(dir.z));

    if let Some(axis) = (0..3).find(|&axis| step[axis] != 0 && origin[axis] == origin[axis].floor()) {
        let block_type = world.block(cell);
        if block_type.is_solid() {
            let mut normal = IVec3::ZERO;
            normal[axis] = -step[axis];
            return Some(RaycastHit {
                block: cell,
                block_type,
                point: origin,
                normal,
                distance: 0.0,
            });
        }
    }

    for _ in 0..step_ceiling(max_distance) {
        let (t, normal) = if t_max.x <= t_max.y && t_max.x <= t_max.z {
            cell.x += step.x;
            let t = t_max.x;
            t_max.x += t_delta.x;
            (t, IVec3::new(-step.x, 0, 0))
        } else if t_max.y <= t_max.z {
            cell.y += step.y;
            let t = t_max.y;
            t_max.y += t_delta.y;
            (t, IVec3::new(0, -step.y, 0))
        } else {
            cell.z += step.z;
            let t = t_max.z;
            t_max.z += t_delta.z;
            (t, IVec3::new(0, 0, -step.z))
        };

        if t > max_distance {
            return None;
        }

        let block_type = world.block(cell);
        if block_type.is_solid() {
            return Some(RaycastHit {
                block: cell,
                block_type,
                point: origin + dir * t,
                normal,
                distance: t,
            });
        }
    }

    None
}

fn sign_i(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

/// Starting cell on one axis. A coordinate lying exactly on a plane belongs
/// to the cell in the direction of travel.
fn start_cell(origin: f32, step: i32) -> i32 {
    let floor = origin.floor();
    if step < 0 && origin == floor {
        floor as i32 - 1
    } else {
        floor as i32
    }
}

fn dda_t_delta(dir_component: f32) -> f32 {
    if dir_component == 0.0 {
        f32::INFINITY
    } else {
        1.0 / dir_component.abs()
    }
}

fn dda_t_max(origin_component: f32, dir_component: f32, cell: i32, step: i32) -> f32 {
    if step == 0 {
        return f32::INFINITY;
    }
    let boundary = if step > 0 { cell as f32 + 1.0 } else { cell as f32 };
    (boundary - origin_component) / dir_component
}
