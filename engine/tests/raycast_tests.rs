//! Raycast Tests - Voxel Traversal and Hit Faces
//!
//! Tests for `world::raycast::cast` against a `VoxelGrid`.

use glam::{IVec3, Vec3};
use invasion_engine::world::raycast::{cast, step_ceiling};
use invasion_engine::world::{BlockType, BlockWorld, VoxelGrid};

fn world_with(blocks: &[IVec3]) -> VoxelGrid {
    let mut world = VoxelGrid::new();
    for &coord in blocks {
        world.set_block(coord, BlockType::STONE, false);
    }
    world
}

// ============================================================================
// Hit Face Tests
// ============================================================================

#[test]
fn test_cast_down_hits_top_face() {
    let world = world_with(&[IVec3::new(3, 0, -2)]);
    let hit = cast(&world, Vec3::new(3.5, 5.0, -1.5), Vec3::NEG_Y, 10.0).unwrap();

    assert_eq!(hit.block, IVec3::new(3, 0, -2));
    assert_eq!(hit.normal, IVec3::Y);
    assert!((hit.point.y - 1.0).abs() < 1e-5);
    assert!((hit.distance - 4.0).abs() < 1e-5);
}

#[test]
fn test_cast_along_positive_x_hits_west_face() {
    let world = world_with(&[IVec3::new(3, 0, 0)]);
    let hit = cast(&world, Vec3::splat(0.5), Vec3::X, 10.0).unwrap();
    assert_eq!(hit.block, IVec3::new(3, 0, 0));
    assert_eq!(hit.normal, IVec3::NEG_X);
    assert!((hit.point.x - 3.0).abs() < 1e-5);
}

#[test]
fn test_cast_along_negative_x_hits_east_face() {
    let world = world_with(&[IVec3::new(-3, 0, 0)]);
    let hit = cast(&world, Vec3::splat(0.5), Vec3::NEG_X, 10.0).unwrap();
    assert_eq!(hit.block, IVec3::new(-3, 0, 0));
    assert_eq!(hit.normal, IVec3::X);
    assert!((hit.point.x + 2.0).abs() < 1e-5);
}

#[test]
fn test_cast_along_negative_z_hits_south_face() {
    let world = world_with(&[IVec3::new(0, 0, -2)]);
    let hit = cast(&world, Vec3::splat(0.5), Vec3::NEG_Z, 10.0).unwrap();
    assert_eq!(hit.block, IVec3::new(0, 0, -2));
    assert_eq!(hit.normal, IVec3::Z);
    assert!((hit.distance - 1.5).abs() < 1e-5);
}

#[test]
fn test_unnormalized_direction_reports_world_distance() {
    let world = world_with(&[IVec3::new(0, 0, 4)]);
    let hit = cast(&world, Vec3::splat(0.5), Vec3::new(0.0, 0.0, 25.0), 10.0).unwrap();
    assert!((hit.distance - 3.5).abs() < 1e-5);
}

// ============================================================================
// Miss Tests
// ============================================================================

#[test]
fn test_axis_aligned_ray_in_empty_world_misses() {
    let world = VoxelGrid::new();
    // Two zero components: both axes get an infinite step
    assert!(cast(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::X, 50.0).is_none());
    assert!(cast(&world, Vec3::new(-7.25, 3.0, 2.0), Vec3::NEG_Y, 50.0).is_none());
    assert!(cast(&world, Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 1.0, 1.0), 50.0).is_none());
}

#[test]
fn test_block_beyond_reach_is_a_miss() {
    let world = world_with(&[IVec3::new(0, -12, 0)]);
    assert!(cast(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::NEG_Y, 10.0).is_none());
    assert!(cast(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::NEG_Y, 13.0).is_some());
}

// ============================================================================
// Boundary Tests
// ============================================================================

#[test]
fn test_diagonal_tie_steps_x_first() {
    // The ray passes exactly through the shared edge of (1,0,0) and (0,1,0)
    let world = world_with(&[IVec3::new(1, 0, 0), IVec3::new(0, 1, 0)]);
    let hit = cast(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 1.0, 0.0), 10.0).unwrap();
    assert_eq!(hit.block, IVec3::new(1, 0, 0));
    assert_eq!(hit.normal, IVec3::NEG_X);
}

#[test]
fn test_origin_on_plane_belongs_to_travel_direction() {
    // Origin on the x = 2 plane, travelling -X: the first cell is x = 1
    let world = world_with(&[IVec3::new(0, 0, 0)]);
    let hit = cast(&world, Vec3::new(2.0, 0.5, 0.5), Vec3::NEG_X, 10.0).unwrap();
    assert_eq!(hit.block, IVec3::ZERO);
    assert_eq!(hit.normal, IVec3::X);
    assert!((hit.distance - 1.0).abs() < 1e-5);
}

#[test]
fn test_origin_inside_block_is_not_reported() {
    let world = world_with(&[IVec3::ZERO, IVec3::new(0, 0, 3)]);
    let hit = cast(&world, Vec3::splat(0.5), Vec3::Z, 10.0).unwrap();
    assert_eq!(hit.block, IVec3::new(0, 0, 3));
}

// ============================================================================
// Edit Cell Tests
// ============================================================================

#[test]
fn test_struck_and_adjacent_cells() {
    let world = world_with(&[IVec3::new(0, 1, 3)]);
    let hit = cast(&world, Vec3::new(0.5, 1.9, 0.5), Vec3::Z, 10.0).unwrap();

    assert_eq!(hit.struck_cell(), IVec3::new(0, 1, 3));
    assert_eq!(hit.adjacent_cell(), IVec3::new(0, 1, 2));
    assert_eq!(hit.struck_cell(), hit.block);
}

#[test]
fn test_edge_hit_edits_the_reported_block() {
    let mut world = world_with(&[IVec3::new(1, 0, 0), IVec3::new(0, 1, 0)]);
    let hit = cast(&world, Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.0, 1.0, 0.0), 10.0).unwrap();

    // The hit point sits on the edge shared by both blocks
    assert_eq!(hit.struck_cell(), IVec3::new(1, 0, 0));
    assert_eq!(hit.adjacent_cell(), IVec3::ZERO);

    assert!(world.set_block(hit.struck_cell(), BlockType::AIR, false));
    assert!(!world.is_solid(IVec3::new(1, 0, 0)));
    assert!(world.is_solid(IVec3::new(0, 1, 0)));

    assert!(world.set_block(hit.adjacent_cell(), BlockType::BEDROCK, true));
    assert_eq!(world.block(IVec3::ZERO), BlockType::BEDROCK);
}

#[test]
fn test_huge_reach_is_clamped() {
    let world = world_with(&[]);
    assert!(cast(&world, Vec3::splat(0.5), Vec3::new(0.3, -0.2, 1.0), 1.0e20).is_none());
    assert_eq!(step_ceiling(1.0e20), usize::MAX);
}

#[test]
fn test_place_only_into_air() {
    let mut world = world_with(&[IVec3::new(0, 1, 3)]);
    let hit = cast(&world, Vec3::new(0.5, 1.9, 0.5), Vec3::Z, 10.0).unwrap();

    assert!(world.set_block(hit.adjacent_cell(), BlockType::BEDROCK, true));
    assert_eq!(world.block(IVec3::new(0, 1, 2)), BlockType::BEDROCK);

    // Occupied cells refuse a guarded write
    assert!(!world.set_block(hit.struck_cell(), BlockType::BEDROCK, true));
    assert_eq!(world.block(IVec3::new(0, 1, 3)), BlockType::STONE);
}
