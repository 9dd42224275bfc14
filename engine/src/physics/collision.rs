//! Collision queries between axis-aligned bodies and the block grid.
//!
//! # Cell coverage
//!
//! A box covers cells `floor(min) ..= ceil(max) - 1` on each axis, so a box
//! whose face lies exactly on a lattice plane does not overlap the cell on
//! the far side of that plane. A body resting with its feet at `y = 1.0` on
//! block `y = 0` therefore does not collide with it.
//!
//! # Sweeping
//!
//! Movement is resolved one axis at a time in sub-steps shorter than one
//! block. A sub-step can then enter at most one new layer of cells, and only
//! that layer is tested. A body that already overlaps a block (for example
//! one placed inside it) can still move out of it.

use std::ops::RangeInclusive;

use glam::{IVec3, Vec3};

use crate::world::BlockWorld;

/// Smallest and largest sub-step the sweep accepts, in blocks.
const SUBSTEP_RANGE: (f32, f32) = (0.01, 0.99);

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.min + offset, self.max + offset)
    }

    /// Inclusive range of covered cells `(lo, hi)`.
    pub fn cell_range(&self) -> (IVec3, IVec3) {
        let lo = self.min.floor().as_ivec3();
        let hi = self.max.ceil().as_ivec3() - IVec3::ONE;
        (lo, hi)
    }

    /// True if any covered cell is solid.
    pub fn intersects_solid(&self, world: &dyn BlockWorld) -> bool {
        let (lo, hi) = self.cell_range();
        self.layer_blocked(world, 1, lo.y..=hi.y)
    }

    /// True if a solid cell exists in the given layers of `axis`, restricted
    /// to the box's coverage on the two other axes.
    fn layer_blocked(&self, world: &dyn BlockWorld, axis: usize, layers: RangeInclusive<i32>) -> bool {
        let (lo, hi) = self.cell_range();
        let (a, b) = other_axes(axis);
        for layer in layers {
            for i in lo[a]..=hi[a] {
                for j in lo[b]..=hi[b] {
                    let mut cell = IVec3::ZERO;
                    cell[axis] = layer;
                    cell[a] = i;
                    cell[b] = j;
                    if world.is_solid(cell) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

/// Collision shape of a kinematic body: a box standing on its base centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyShape {
    /// Half extent on X and Z
    pub half_width: f32,
    /// Extent on Y, measured up from the base
    pub height: f32,
}

impl BodyShape {
    pub fn new(half_width: f32, height: f32) -> Self {
        Self { half_width, height }
    }

    /// Box of a body whose base centre is at `position`.
    pub fn aabb_at(&self, position: Vec3) -> Aabb {
        Aabb::new(
            position - Vec3::new(self.half_width, 0.0, self.half_width),
            position + Vec3::new(self.half_width, self.height, self.half_width),
        )
    }
}

fn other_axes(axis: usize) -> (usize, usize) {
    match axis {
        0 => (1, 2),
        1 => (0, 2),
        _ => (0, 1),
    }
}

/// Layers of `axis` newly covered when `current` moves to `moved`.
fn entered_layers(current: &Aabb, moved: &Aabb, axis: usize, step: f32) -> RangeInclusive<i32> {
    let (lo, hi) = current.cell_range();
    let (new_lo, new_hi) = moved.cell_range();
    if step > 0.0 {
        (hi[axis] + 1)..=new_hi[axis]
    } else {
        new_lo[axis]..=(lo[axis] - 1)
    }
}

/// Move a body along one axis, stopping flush against the first solid face.
///
/// Returns the new base position and whether the motion was blocked. A body
/// stopped while falling lands exactly on the block top; every other stop
/// leaves a gap of `skin` so the next query does not see an overlap.
pub fn sweep_axis(
    world: &dyn BlockWorld,
    shape: BodyShape,
    mut position: Vec3,
    axis: usize,
    delta: f32,
    max_substep: f32,
    skin: f32,
) -> (Vec3, bool) {
    if !delta.is_finite() {
        return (position, false);
    }
    let max_substep = max_substep.clamp(SUBSTEP_RANGE.0, SUBSTEP_RANGE.1);
    let mut remaining = delta;

    while remaining != 0.0 {
        let step = remaining.clamp(-max_substep, max_substep);
        let current = shape.aabb_at(position);
        let mut offset = Vec3::ZERO;
        offset[axis] = step;
        let moved = current.translated(offset);

        let layers = entered_layers(&current, &moved, axis, step);
        if !layers.is_empty() && current.layer_blocked(world, axis, layers.clone()) {
            if step > 0.0 {
                let face = *layers.start() as f32;
                position[axis] += (face - skin - current.max[axis]).max(0.0);
            } else {
                let face = (*layers.end() + 1) as f32;
                if axis == 1 {
                    position[axis] = face;
                } else {
                    position[axis] += (face + skin - current.min[axis]).min(0.0);
                }
            }
            return (position, true);
        }

        position[axis] += step;
        remaining -= step;
    }

    (position, false)
}

/// True if a solid cell lies within `distance` below the body's base.
pub fn probe_ground(world: &dyn BlockWorld, shape: BodyShape, position: Vec3, distance: f32) -> bool {
    let current = shape.aabb_at(position);
    let probe = current.translated(Vec3::new(0.0, -distance.max(0.0), 0.0));
    let layers = entered_layers(&current, &probe, 1, -1.0);
    !layers.is_empty() && current.layer_blocked(world, 1, layers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{BlockType, VoxelGrid};

    const SKIN: f32 = 0.001;

    fn floor_world() -> VoxelGrid {
        let mut world = VoxelGrid::new();
        world.fill(IVec3::new(-4, 0, -4), IVec3::new(4, 0, 4), BlockType::BEDROCK);
        world
    }

    #[test]
    fn touching_faces_do_not_overlap() {
        let aabb = Aabb::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0));
        let (lo, hi) = aabb.cell_range();
        assert_eq!(lo, IVec3::new(0, 1, 0));
        assert_eq!(hi, IVec3::new(0, 1, 0));
        assert!(!aabb.intersects_solid(&floor_world()));
        assert!(aabb.translated(Vec3::new(0.0, -0.5, 0.0)).intersects_solid(&floor_world()));
    }

    #[test]
    fn falling_body_lands_on_block_top() {
        let world = floor_world();
        let shape = BodyShape::new(0.3, 1.8);
        let (pos, blocked) = sweep_axis(&world, shape, Vec3::new(0.5, 3.2, 0.5), 1, -5.0, 0.45, SKIN);
        assert!(blocked);
        assert_eq!(pos.y, 1.0);
        assert!(probe_ground(&world, shape, pos, 0.01));
    }

    #[test]
    fn wall_stops_body_with_skin_gap() {
        let mut world = VoxelGrid::new();
        world.set_block(IVec3::new(2, 1, 0), BlockType::STONE, false);
        let shape = BodyShape::new(0.3, 1.8);
        let (pos, blocked) = sweep_axis(&world, shape, Vec3::new(0.5, 1.0, 0.5), 0, 3.0, 0.45, SKIN);
        assert!(blocked);
        assert!((pos.x + 0.3 - (2.0 - SKIN)).abs() < 1e-4);
        assert!(!shape.aabb_at(pos).intersects_solid(&world));
    }

    #[test]
    fn free_motion_is_not_blocked() {
        let world = VoxelGrid::new();
        let shape = BodyShape::new(0.3, 1.8);
        let (pos, blocked) = sweep_axis(&world, shape, Vec3::ZERO, 2, -2.5, 0.45, SKIN);
        assert!(!blocked);
        assert!((pos.z + 2.5).abs() < 1e-5);
    }

    #[test]
    fn airborne_body_is_not_grounded() {
        let world = floor_world();
        let shape = BodyShape::new(0.3, 1.8);
        assert!(!probe_ground(&world, shape, Vec3::new(0.5, 1.5, 0.5), 0.01));
    }
}
