use voxels_blocks::{BlockId, AIR};

use crate::coord::{chunk_to_world_origin, local_to_index, ChunkCoord};

/// A dense cube of block cells. Immutable once handed to the mesher;
/// edits arrive as a fresh chunk for the same coordinate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chunk {
    coord: ChunkCoord,
    size: usize,
    blocks: Vec<BlockId>,
}

impl Chunk {
    /// Creates an Air-filled chunk.
    pub fn new(coord: ChunkCoord, size: usize) -> Self {
        Self {
            coord,
            size,
            blocks: vec![AIR; size * size * size],
        }
    }

    /// Takes ownership of a dense block grid in `x·S² + y·S + z` order.
    /// A grid of the wrong length is padded or truncated to fit.
    pub fn from_blocks(coord: ChunkCoord, size: usize, mut blocks: Vec<BlockId>) -> Self {
        let expect = size * size * size;
        if blocks.len() != expect {
            blocks.resize(expect, AIR);
        }
        Self {
            coord,
            size,
            blocks,
        }
    }

    #[inline]
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Block at a local cell; out-of-bounds reads are Air.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> BlockId {
        let s = self.size as i32;
        if x < 0 || y < 0 || z < 0 || x >= s || y >= s || z >= s {
            return AIR;
        }
        self.blocks[local_to_index(x as usize, y as usize, z as usize, self.size)]
    }

    /// Sets a local cell; out-of-bounds writes are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, id: BlockId) {
        let s = self.size as i32;
        if x < 0 || y < 0 || z < 0 || x >= s || y >= s || z >= s {
            return;
        }
        let idx = local_to_index(x as usize, y as usize, z as usize, self.size);
        self.blocks[idx] = id;
    }

    /// Sets every cell to the given identifier.
    pub fn fill(&mut self, id: BlockId) {
        self.blocks.fill(id);
    }

    /// World-space corner of this chunk.
    #[inline]
    pub fn world_origin(&self) -> (i32, i32, i32) {
        chunk_to_world_origin(self.coord, self.size)
    }

    /// `Some(id)` iff every cell holds the same identifier. Early-exit scan.
    pub fn is_mono(&self) -> Option<BlockId> {
        let first = *self.blocks.first()?;
        if self.blocks.iter().any(|&b| b != first) {
            return None;
        }
        Some(first)
    }

    #[inline]
    pub fn is_all_air(&self) -> bool {
        self.is_mono() == Some(AIR)
    }

    /// Calls `f` for each of the 26 neighboring chunk coordinates.
    pub fn for_each_neighbor(&self, mut f: impl FnMut(ChunkCoord)) {
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    f(self.coord.offset(dx, dy, dz));
                }
            }
        }
    }
}
