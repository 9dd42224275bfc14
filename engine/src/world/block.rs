//! Block types and the world interface the gameplay core consumes.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

/// Integer lattice coordinate of a unit block. Cell `(x, y, z)` covers
/// `[x, x+1) × [y, y+1) × [z, z+1)`.
pub type BlockCoord = IVec3;

/// Opaque block identifier supplied by the block registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockType(pub u16);

impl BlockType {
    pub const AIR: BlockType = BlockType(0);
    pub const BEDROCK: BlockType = BlockType(1);
    pub const STONE: BlockType = BlockType(2);
    pub const DIRT: BlockType = BlockType(3);
    pub const GRASS: BlockType = BlockType(4);

    #[inline]
    pub const fn is_air(self) -> bool {
        self.0 == Self::AIR.0
    }

    /// Every non-air block collides.
    #[inline]
    pub const fn is_solid(self) -> bool {
        !self.is_air()
    }

    /// Registry name for the built-in ids, `"unknown"` otherwise.
    pub fn name(self) -> &'static str {
        match self {
            Self::AIR => "air",
            Self::BEDROCK => "bedrock",
            Self::STONE => "stone",
            Self::DIRT => "dirt",
            Self::GRASS => "grass",
            _ => "unknown",
        }
    }
}

/// Block containing a world-space point.
#[inline]
pub fn block_at(point: Vec3) -> BlockCoord {
    point.floor().as_ivec3()
}

/// Block storage the gameplay core reads and edits.
pub trait BlockWorld {
    /// Block at `coord`; unloaded or empty space reads as air.
    fn block(&self, coord: BlockCoord) -> BlockType;

    #[inline]
    fn is_solid(&self, coord: BlockCoord) -> bool {
        self.block(coord).is_solid()
    }

    /// Write `block` at `coord`. With `only_if_air` the write only happens
    /// when the cell currently holds air. Returns whether the cell changed.
    fn set_block(&mut self, coord: BlockCoord, block: BlockType, only_if_air: bool) -> bool;
}
