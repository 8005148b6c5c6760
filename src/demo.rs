//! Offline fallback world: a few chunks so the render path runs without a
//! server.

use voxels_blocks::Block;
use voxels_chunk::{local_to_index, ChunkCoord, CHUNK_SIZE, CHUNK_VOLUME};
use voxels_pipeline::{ChunkPayload, MeshPipeline};

/// Submits a 4x4 patch of surface chunks over a mono stone base.
pub fn submit_world(pipeline: &MeshPipeline) {
    for cx in -2..2 {
        for cz in -2..2 {
            pipeline.submit(
                ChunkCoord::new(cx, -1, cz),
                ChunkPayload::Mono(Block::Stone.id()),
            );
            pipeline.submit(
                ChunkCoord::new(cx, 0, cz),
                ChunkPayload::Dense(surface_chunk(cx, cz)),
            );
        }
    }
}

fn surface_chunk(cx: i32, cz: i32) -> Vec<u8> {
    let mut blocks = vec![Block::Air.id(); CHUNK_VOLUME];
    let s = CHUNK_SIZE as i32;
    for x in 0..CHUNK_SIZE {
        for z in 0..CHUNK_SIZE {
            let wx = cx * s + x as i32;
            let wz = cz * s + z as i32;
            let h = ((wx * 7 + wz * 13).rem_euclid(5)) as usize + 2;
            for y in 0..=h {
                let id = if y == h {
                    Block::Grass.id()
                } else {
                    Block::Dirt.id()
                };
                blocks[local_to_index(x, y, z, CHUNK_SIZE)] = id;
            }
        }
    }
    // A landmark pillar in the origin chunk.
    if cx == 0 && cz == 0 {
        for y in 0..12 {
            blocks[local_to_index(8, y, 8, CHUNK_SIZE)] = Block::StoneBricks.id();
        }
    }
    blocks
}
