use proptest::prelude::*;
use voxels_blocks::AIR;
use voxels_chunk::{
    chunk_to_world_origin, index_to_local, local_to_index, world_to_chunk, world_to_local, Chunk,
    ChunkCoord,
};

fn dim() -> impl Strategy<Value = usize> {
    1usize..=8
}

fn small_i32() -> impl Strategy<Value = i32> {
    -1_000_000i32..=1_000_000
}

proptest! {
    // local_to_index maps each (x,y,z) within bounds to unique in-range indices
    #[test]
    fn index_is_unique_and_in_range(s in dim()) {
        let expect = s * s * s;
        let mut seen = vec![false; expect];
        for x in 0..s { for y in 0..s { for z in 0..s {
            let i = local_to_index(x, y, z, s);
            prop_assert!(i < expect);
            prop_assert!(!seen[i]);
            seen[i] = true;
        }}}
        prop_assert!(seen.into_iter().all(|b| b));
    }

    #[test]
    fn index_round_trips(s in dim()) {
        for i in 0..s * s * s {
            let (x, y, z) = index_to_local(i, s);
            prop_assert_eq!(local_to_index(x, y, z, s), i);
        }
    }

    // Floored chunk coordinate and positive-biased local remainder agree
    #[test]
    fn world_split_reassembles(wx in small_i32(), wy in small_i32(), wz in small_i32(), s in dim()) {
        let coord = world_to_chunk(wx, wy, wz, s);
        let (lx, ly, lz) = world_to_local(wx, wy, wz, s);
        prop_assert!(lx < s && ly < s && lz < s);
        let (ox, oy, oz) = chunk_to_world_origin(coord, s);
        prop_assert_eq!(ox + lx as i32, wx);
        prop_assert_eq!(oy + ly as i32, wy);
        prop_assert_eq!(oz + lz as i32, wz);
    }

    // Out-of-bounds reads are Air; out-of-bounds writes are dropped
    #[test]
    fn oob_access_is_air(s in dim(), id in 1u8..=17) {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), s);
        chunk.fill(id);
        let edge = s as i32;
        for probe in [(-1, 0, 0), (0, -1, 0), (0, 0, -1), (edge, 0, 0), (0, edge, 0), (0, 0, edge)] {
            prop_assert_eq!(chunk.get(probe.0, probe.1, probe.2), AIR);
        }
        chunk.set(-1, 0, 0, id);
        chunk.set(0, 0, edge, id);
        prop_assert_eq!(chunk.get(0, 0, 0), id);
    }

    // from_blocks pads or truncates to the expected volume
    #[test]
    fn from_blocks_fixes_length(s in dim(), extra in 0usize..4) {
        let expect = s * s * s;
        let short = Chunk::from_blocks(ChunkCoord::new(1, 2, 3), s, vec![3u8; expect.saturating_sub(1)]);
        prop_assert_eq!(short.blocks().len(), expect);
        let long = Chunk::from_blocks(ChunkCoord::new(1, 2, 3), s, vec![3u8; expect + extra]);
        prop_assert_eq!(long.blocks().len(), expect);
    }

    // is_mono detects uniform fills and rejects any single deviation
    #[test]
    fn mono_scan(s in 2usize..=8, id in 0u8..=17, other in 1u8..=17, cell in 0usize..8) {
        let mut chunk = Chunk::new(ChunkCoord::new(0, 0, 0), s);
        chunk.fill(id);
        prop_assert_eq!(chunk.is_mono(), Some(id));
        let flip = if other == id { other.wrapping_add(1).max(1) } else { other };
        let (x, y, z) = index_to_local(cell % (s * s * s), s);
        chunk.set(x as i32, y as i32, z as i32, flip);
        prop_assert_eq!(chunk.is_mono(), None);
    }
}

#[test]
fn world_origin_scales_by_size() {
    let chunk = Chunk::new(ChunkCoord::new(-2, 1, 3), 16);
    assert_eq!(chunk.world_origin(), (-32, 16, 48));
}

#[test]
fn neighbor_iteration_covers_26() {
    let chunk = Chunk::new(ChunkCoord::new(5, -1, 0), 16);
    let mut seen = std::collections::HashSet::new();
    chunk.for_each_neighbor(|c| {
        seen.insert(c);
    });
    assert_eq!(seen.len(), 26);
    assert!(!seen.contains(&ChunkCoord::new(5, -1, 0)));
}
