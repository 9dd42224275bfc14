//! World Module
//!
//! Block types, the block-world interface the core edits through, a sparse
//! chunked reference grid, and voxel raycasting.

pub mod block;
pub mod grid;
pub mod raycast;

pub use block::{BlockCoord, BlockType, BlockWorld, block_at};
pub use grid::{CHUNK_EDGE, VoxelGrid};
pub use raycast::{RaycastHit, cast};
