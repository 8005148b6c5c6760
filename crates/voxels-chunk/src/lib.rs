//! Chunk coordinates, world/local conversions, and the dense block store.
#![forbid(unsafe_code)]

mod coord;
mod store;

pub use coord::{
    chunk_to_world_origin, index_to_local, local_to_index, world_to_chunk, world_to_local,
    ChunkCoord,
};
pub use store::Chunk;

/// Side length of every chunk, in cells.
pub const CHUNK_SIZE: usize = 16;

/// Cells per chunk.
pub const CHUNK_VOLUME: usize = CHUNK_SIZE * CHUNK_SIZE * CHUNK_SIZE;
