use std::time::{Duration, Instant};

use voxels_blocks::{Block, AIR};
use voxels_chunk::{local_to_index, ChunkCoord, CHUNK_SIZE, CHUNK_VOLUME};
use voxels_pipeline::{ChunkPayload, ChunkUpdate, MeshPipeline};

const WAIT: Duration = Duration::from_secs(5);

fn drain_until(
    pipeline: &MeshPipeline,
    mut until: impl FnMut(&[ChunkUpdate]) -> bool,
) -> Vec<ChunkUpdate> {
    let deadline = Instant::now() + WAIT;
    let mut all = Vec::new();
    loop {
        all.extend(pipeline.drain_ready());
        if until(&all) {
            return all;
        }
        assert!(Instant::now() < deadline, "timed out; got {all:?}");
        std::thread::sleep(Duration::from_millis(5));
    }
}

fn single_block_payload() -> ChunkPayload {
    let mut blocks = vec![AIR; CHUNK_VOLUME];
    blocks[local_to_index(3, 4, 5, CHUNK_SIZE)] = Block::Stone.id();
    ChunkPayload::Dense(blocks)
}

#[test]
fn dense_submit_yields_mesh() {
    let pipeline = MeshPipeline::with_workers(2);
    let coord = ChunkCoord::new(1, 0, -1);
    pipeline.submit(coord, single_block_payload());

    let updates = drain_until(&pipeline, |got| !got.is_empty());
    match &updates[0] {
        ChunkUpdate::Meshed(c, mesh) => {
            assert_eq!(*c, coord);
            assert_eq!(mesh.quad_count(), 6);
        }
        other => panic!("expected a mesh, got {other:?}"),
    }
    // Nothing queued or meshing once the result is out.
    assert_eq!(pipeline.queue_depths(), (0, 0));
}

#[test]
fn mono_submit_uses_fast_path() {
    let pipeline = MeshPipeline::with_workers(1);
    let coord = ChunkCoord::new(0, 2, 0);
    pipeline.submit(coord, ChunkPayload::Mono(Block::Stone.id()));

    let updates = drain_until(&pipeline, |got| !got.is_empty());
    match &updates[0] {
        ChunkUpdate::Meshed(_, mesh) => assert_eq!(mesh.quad_count(), 6),
        other => panic!("expected a mesh, got {other:?}"),
    }
}

#[test]
fn latest_submission_wins() {
    // One worker processes the two jobs in order; the first result must be
    // discarded at drain time because a newer submission exists.
    let pipeline = MeshPipeline::with_workers(1);
    let coord = ChunkCoord::new(4, 0, 4);
    pipeline.submit(coord, single_block_payload());
    pipeline.submit(coord, ChunkPayload::Mono(Block::Grass.id()));

    let updates = drain_until(&pipeline, |got| {
        got.iter().any(|u| matches!(u, ChunkUpdate::Meshed(..)))
    });
    let meshed: Vec<_> = updates
        .iter()
        .filter_map(|u| match u {
            ChunkUpdate::Meshed(_, mesh) => Some(mesh),
            _ => None,
        })
        .collect();
    assert_eq!(meshed.len(), 1, "stale mesh leaked through: {updates:?}");
    assert_eq!(meshed[0].quad_count(), 6);

    // Grace period: the discarded first job must not resurface.
    std::thread::sleep(Duration::from_millis(50));
    assert!(pipeline.drain_ready().is_empty());
}

#[test]
fn evict_propagates_and_stales_inflight_meshes() {
    let pipeline = MeshPipeline::with_workers(1);
    let coord = ChunkCoord::new(-3, 1, 2);
    pipeline.submit(coord, single_block_payload());
    pipeline.evict(coord);

    let updates = drain_until(&pipeline, |got| {
        got.iter().any(|u| matches!(u, ChunkUpdate::Removed(_)))
    });
    assert!(updates
        .iter()
        .any(|u| matches!(u, ChunkUpdate::Removed(c) if *c == coord)));

    // The in-flight mesh was superseded by the eviction and must be dropped.
    std::thread::sleep(Duration::from_millis(100));
    let late: Vec<_> = pipeline.drain_ready();
    assert!(
        late.iter().all(|u| !matches!(u, ChunkUpdate::Meshed(..))),
        "evicted chunk re-surfaced: {late:?}"
    );
}

#[test]
fn has_changed_is_edge_triggered() {
    let pipeline = MeshPipeline::with_workers(1);
    assert!(!pipeline.has_changed());

    pipeline.submit(ChunkCoord::new(0, 0, 0), ChunkPayload::Mono(Block::Sand.id()));
    let deadline = Instant::now() + WAIT;
    while !pipeline.has_changed() {
        assert!(Instant::now() < deadline, "change flag never set");
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(!pipeline.has_changed(), "flag must clear on read");
}

#[test]
fn shutdown_joins_and_later_submits_are_dropped() {
    let mut pipeline = MeshPipeline::with_workers(2);
    let coord = ChunkCoord::new(7, 0, 7);
    pipeline.submit(coord, ChunkPayload::Mono(Block::Stone.id()));
    pipeline.shutdown();

    // Workers drain the queue before exiting, so the job completed.
    let updates = pipeline.drain_ready();
    assert_eq!(updates.len(), 1);

    // A post-shutdown submit is a no-op, not a panic.
    pipeline.submit(coord, ChunkPayload::Mono(Block::Dirt.id()));
}
