//! Sparse chunked block storage.
//!
//! Blocks live in 16³ chunks created on first write. Every edit marks its
//! chunk dirty so an external mesher can rebuild only what changed.

use std::collections::{HashMap, HashSet};

use glam::IVec3;

use super::block::{BlockCoord, BlockType, BlockWorld};

pub const CHUNK_EDGE: i32 = 16;
const CHUNK_CELL_COUNT: usize = (CHUNK_EDGE as usize).pow(3);

#[derive(Clone)]
struct Chunk {
    cells: Vec<BlockType>,
    solid: usize,
}

impl Default for Chunk {
    fn default() -> Self {
        Self {
            cells: vec![BlockType::AIR; CHUNK_CELL_COUNT],
            solid: 0,
        }
    }
}

impl Chunk {
    #[inline]
    fn local_index(local: IVec3) -> usize {
        let edge = CHUNK_EDGE as usize;
        local.x as usize + local.y as usize * edge + local.z as usize * edge * edge
    }

    #[inline]
    fn get(&self, local: IVec3) -> BlockType {
        self.cells[Self::local_index(local)]
    }

    /// Returns the previous block.
    fn set(&mut self, local: IVec3, block: BlockType) -> BlockType {
        let slot = &mut self.cells[Self::local_index(local)];
        let previous = std::mem::replace(slot, block);
        match (previous.is_solid(), block.is_solid()) {
            (false, true) => self.solid += 1,
            (true, false) => self.solid -= 1,
            _ => {}
        }
        previous
    }
}

/// Reference [`BlockWorld`] implementation.
#[derive(Default, Clone)]
pub struct VoxelGrid {
    chunks: HashMap<IVec3, Chunk>,
    dirty_chunks: HashSet<IVec3>,
}

impl VoxelGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Split a block coordinate into (chunk key, chunk-local coordinate).
    pub fn chunk_and_local(coord: BlockCoord) -> (IVec3, IVec3) {
        let chunk = IVec3::new(
            coord.x.div_euclid(CHUNK_EDGE),
            coord.y.div_euclid(CHUNK_EDGE),
            coord.z.div_euclid(CHUNK_EDGE),
        );
        let local = IVec3::new(
            coord.x.rem_euclid(CHUNK_EDGE),
            coord.y.rem_euclid(CHUNK_EDGE),
            coord.z.rem_euclid(CHUNK_EDGE),
        );
        (chunk, local)
    }

    /// Fill the inclusive box `min..=max` with `block`. Returns cells changed.
    pub fn fill(&mut self, min: BlockCoord, max: BlockCoord, block: BlockType) -> usize {
        let lo = min.min(max);
        let hi = min.max(max);
        let mut changed = 0;
        for z in lo.z..=hi.z {
            for y in lo.y..=hi.y {
                for x in lo.x..=hi.x {
                    if self.set_block(IVec3::new(x, y, z), block, false) {
                        changed += 1;
                    }
                }
            }
        }
        changed
    }

    /// Number of non-air blocks stored.
    pub fn solid_count(&self) -> usize {
        self.chunks.values().map(|c| c.solid).sum()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Take the set of chunks edited since the last drain.
    pub fn drain_dirty_chunks(&mut self) -> Vec<IVec3> {
        let mut chunks = Vec::with_capacity(self.dirty_chunks.len());
        chunks.extend(self.dirty_chunks.drain());
        chunks
    }

    /// Every non-air block with its coordinate.
    pub fn solid_blocks(&self) -> Vec<(BlockCoord, BlockType)> {
        let mut out = Vec::with_capacity(self.solid_count());
        for (key, chunk) in &self.chunks {
            if chunk.solid == 0 {
                continue;
            }
            for z in 0..CHUNK_EDGE {
                for y in 0..CHUNK_EDGE {
                    for x in 0..CHUNK_EDGE {
                        let local = IVec3::new(x, y, z);
                        let block = chunk.get(local);
                        if block.is_solid() {
                            out.push((*key * CHUNK_EDGE + local, block));
                        }
                    }
                }
            }
        }
        out
    }
}

impl BlockWorld for VoxelGrid {
    fn block(&self, coord: BlockCoord) -> BlockType {
        let (key, local) = Self::chunk_and_local(coord);
        self.chunks
            .get(&key)
            .map_or(BlockType::AIR, |chunk| chunk.get(local))
    }

    fn set_block(&mut self, coord: BlockCoord, block: BlockType, only_if_air: bool) -> bool {
        let (key, local) = Self::chunk_and_local(coord);
        let current = self.block(coord);
        if only_if_air && !current.is_air() {
            return false;
        }
        if current == block {
            return false;
        }
        // Clearing a block in an unallocated chunk is a no-op handled above.
        let chunk = self.chunks.entry(key).or_default();
        chunk.set(local, block);
        if chunk.solid == 0 {
            // Still dirty so the mesher drops the chunk's mesh
            self.chunks.remove(&key);
        }
        self.dirty_chunks.insert(key);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unloaded_space_reads_as_air() {
        let grid = VoxelGrid::new();
        assert_eq!(grid.block(IVec3::new(1000, -5, 3)), BlockType::AIR);
        assert_eq!(grid.chunk_count(), 0);
    }

    #[test]
    fn set_get_clear_roundtrip() {
        let mut grid = VoxelGrid::new();
        let coord = IVec3::new(2, 3, -1);
        assert!(grid.set_block(coord, BlockType::STONE, false));
        assert_eq!(grid.block(coord), BlockType::STONE);
        assert_eq!(grid.solid_count(), 1);
        assert!(grid.set_block(coord, BlockType::AIR, false));
        assert!(!grid.is_solid(coord));
        assert_eq!(grid.solid_count(), 0);
    }

    #[test]
    fn emptied_chunk_is_freed_but_reported_dirty() {
        let mut grid = VoxelGrid::new();
        let coord = IVec3::new(40, -3, 7);
        grid.set_block(coord, BlockType::STONE, false);
        grid.set_block(coord + IVec3::X, BlockType::DIRT, false);
        grid.drain_dirty_chunks();
        assert_eq!(grid.chunk_count(), 1);

        grid.set_block(coord, BlockType::AIR, false);
        assert_eq!(grid.chunk_count(), 1);
        grid.set_block(coord + IVec3::X, BlockType::AIR, false);
        assert_eq!(grid.chunk_count(), 0);
        assert_eq!(grid.drain_dirty_chunks().len(), 1);

        // Dig-and-refill churn across many chunks leaves nothing allocated
        for x in 0..200 {
            let c = IVec3::new(x * CHUNK_EDGE, 0, 0);
            grid.set_block(c, BlockType::STONE, false);
            grid.set_block(c, BlockType::AIR, false);
        }
        assert_eq!(grid.chunk_count(), 0);
        assert_eq!(grid.block(coord), BlockType::AIR);
    }

    #[test]
    fn only_if_air_refuses_to_replace() {
        let mut grid = VoxelGrid::new();
        let coord = IVec3::ZERO;
        grid.set_block(coord, BlockType::DIRT, false);
        assert!(!grid.set_block(coord, BlockType::BEDROCK, true));
        assert_eq!(grid.block(coord), BlockType::DIRT);
        assert!(grid.set_block(IVec3::Y, BlockType::BEDROCK, true));
    }

    #[test]
    fn negative_coordinates_map_to_their_own_chunk() {
        let (key, local) = VoxelGrid::chunk_and_local(IVec3::new(-1, 16, 0));
        assert_eq!(key, IVec3::new(-1, 1, 0));
        assert_eq!(local, IVec3::new(15, 0, 0));
    }

    #[test]
    fn edits_mark_chunks_dirty_once() {
        let mut grid = VoxelGrid::new();
        grid.fill(IVec3::new(0, 0, 0), IVec3::new(3, 0, 3), BlockType::BEDROCK);
        grid.set_block(IVec3::new(-1, 0, 0), BlockType::STONE, false);
        let mut dirty = grid.drain_dirty_chunks();
        dirty.sort_by_key(|k| (k.x, k.y, k.z));
        assert_eq!(dirty, vec![IVec3::new(-1, 0, 0), IVec3::ZERO]);
        assert!(grid.drain_dirty_chunks().is_empty());

        // A no-op write does not dirty anything.
        grid.set_block(IVec3::ZERO, BlockType::BEDROCK, false);
        assert!(grid.drain_dirty_chunks().is_empty());
    }

    #[test]
    fn solid_blocks_lists_world_coordinates() {
        let mut grid = VoxelGrid::new();
        grid.set_block(IVec3::new(-17, 2, 5), BlockType::GRASS, false);
        assert_eq!(
            grid.solid_blocks(),
            vec![(IVec3::new(-17, 2, 5), BlockType::GRASS)]
        );
    }
}
