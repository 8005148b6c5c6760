use criterion::{black_box, criterion_group, criterion_main, Criterion};
use voxels_blocks::Block;
use voxels_chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
use voxels_mesh::{mesh_chunk, mono_mesh};

fn terrain_chunk() -> Chunk {
    // A rolling surface with a dirt shell over stone, the shape network
    // chunks tend to have.
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), CHUNK_SIZE);
    let s = CHUNK_SIZE as i32;
    for x in 0..s {
        for z in 0..s {
            let h = 6 + ((x * 3 + z * 5) % 7);
            for y in 0..=h {
                let id = if y == h {
                    Block::Grass.id()
                } else if y + 3 >= h {
                    Block::Dirt.id()
                } else {
                    Block::Stone.id()
                };
                chunk.set(x, y, z, id);
            }
        }
    }
    chunk
}

fn checkerboard_chunk() -> Chunk {
    // Worst case: every face of every cell is visible.
    let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), CHUNK_SIZE);
    let s = CHUNK_SIZE as i32;
    for x in 0..s {
        for y in 0..s {
            for z in 0..s {
                if (x + y + z) % 2 == 0 {
                    chunk.set(x, y, z, Block::Stone.id());
                }
            }
        }
    }
    chunk
}

fn bench_mesh_chunk(c: &mut Criterion) {
    let mut group = c.benchmark_group("mesh_chunk");
    let terrain = terrain_chunk();
    group.bench_function("terrain_16", |b| {
        b.iter(|| black_box(mesh_chunk(black_box(&terrain))))
    });
    let checker = checkerboard_chunk();
    group.bench_function("checkerboard_16", |b| {
        b.iter(|| black_box(mesh_chunk(black_box(&checker))))
    });
    group.finish();
}

fn bench_mono_mesh(c: &mut Criterion) {
    let mut filled = Chunk::new(ChunkCoord::new(0, 0, 0), CHUNK_SIZE);
    filled.fill(Block::Stone.id());
    c.bench_function("mono_mesh_16", |b| {
        b.iter(|| black_box(mono_mesh(black_box(&filled), Block::Stone.id())))
    });
}

criterion_group!(benches, bench_mesh_chunk, bench_mono_mesh);
criterion_main!(benches);
