//! Mesh pipeline: runs chunk meshing on worker threads off the render thread.
#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use voxels_blocks::BlockId;
use voxels_chunk::{Chunk, ChunkCoord, CHUNK_SIZE};
use voxels_mesh::{mesh_chunk, mono_mesh, ChunkMesh};

/// Upper bound on queued-but-unstarted mesh jobs. A full queue blocks
/// `submit`, pushing backpressure onto the network reader.
pub const JOB_QUEUE_CAPACITY: usize = 100;

/// Incoming chunk content, as delivered by the network layer.
#[derive(Clone, Debug)]
pub enum ChunkPayload {
    /// Dense block grid in `x·S² + y·S + z` order.
    Dense(Vec<BlockId>),
    /// Every cell holds the same identifier.
    Mono(BlockId),
}

/// A change to the resident chunk set, ready for the renderer.
#[derive(Clone, Debug)]
pub enum ChunkUpdate {
    Meshed(ChunkCoord, ChunkMesh),
    Removed(ChunkCoord),
}

struct MeshJob {
    coord: ChunkCoord,
    payload: ChunkPayload,
    version: u64,
}

struct MeshJobOut {
    coord: ChunkCoord,
    mesh: ChunkMesh,
    version: u64,
}

pub struct MeshPipeline {
    job_tx: Option<Sender<MeshJob>>,
    done_rx: Receiver<MeshJobOut>,
    // Latest submitted version per coordinate; results carrying an older
    // version are discarded at drain time so the newest payload wins.
    versions: Mutex<HashMap<ChunkCoord, u64>>,
    removals: Mutex<Vec<ChunkCoord>>,
    changed: Arc<AtomicBool>,
    queued: Arc<AtomicUsize>,
    inflight: Arc<AtomicUsize>,
    workers: Vec<JoinHandle<()>>,
}

impl MeshPipeline {
    pub fn new() -> Self {
        let workers = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(8)
            .saturating_sub(1)
            .max(1);
        Self::with_workers(workers)
    }

    pub fn with_workers(worker_count: usize) -> Self {
        let (job_tx, job_rx) = bounded::<MeshJob>(JOB_QUEUE_CAPACITY);
        let (done_tx, done_rx) = unbounded::<MeshJobOut>();
        let changed = Arc::new(AtomicBool::new(false));
        let queued = Arc::new(AtomicUsize::new(0));
        let inflight = Arc::new(AtomicUsize::new(0));
        let mut workers = Vec::with_capacity(worker_count.max(1));
        for _ in 0..worker_count.max(1) {
            let job_rx = job_rx.clone();
            let done_tx = done_tx.clone();
            let changed = Arc::clone(&changed);
            let queued = Arc::clone(&queued);
            let inflight = Arc::clone(&inflight);
            workers.push(thread::spawn(move || {
                while let Ok(job) = job_rx.recv() {
                    queued.fetch_sub(1, Ordering::Relaxed);
                    inflight.fetch_add(1, Ordering::Relaxed);
                    let MeshJob {
                        coord,
                        payload,
                        version,
                    } = job;
                    let result = panic::catch_unwind(AssertUnwindSafe(|| build_mesh(coord, payload)));
                    inflight.fetch_sub(1, Ordering::Relaxed);
                    match result {
                        Ok(mesh) => {
                            let _ = done_tx.send(MeshJobOut {
                                coord,
                                mesh,
                                version,
                            });
                            changed.store(true, Ordering::Release);
                        }
                        Err(_) => {
                            log::warn!("mesh job for chunk {coord:?} panicked; job dropped");
                        }
                    }
                }
            }));
        }
        Self {
            job_tx: Some(job_tx),
            done_rx,
            versions: Mutex::new(HashMap::new()),
            removals: Mutex::new(Vec::new()),
            changed,
            queued,
            inflight,
            workers,
        }
    }

    /// Queues a chunk for meshing and returns once it is enqueued. Blocks
    /// while the queue is full. Jobs start in FIFO order; for a single
    /// coordinate the most recent submission is the one that becomes
    /// resident, regardless of completion order.
    pub fn submit(&self, coord: ChunkCoord, payload: ChunkPayload) {
        let version = {
            let mut versions = self.versions.lock().unwrap();
            let slot = versions.entry(coord).or_insert(0);
            *slot += 1;
            *slot
        };
        if let Some(tx) = &self.job_tx {
            let job = MeshJob {
                coord,
                payload,
                version,
            };
            self.queued.fetch_add(1, Ordering::Relaxed);
            if tx.send(job).is_err() {
                self.queued.fetch_sub(1, Ordering::Relaxed);
                log::warn!("mesh pipeline is shut down; dropping submit for {coord:?}");
            }
        }
    }

    /// Debug counters: jobs waiting in the queue and jobs being meshed.
    pub fn queue_depths(&self) -> (usize, usize) {
        (
            self.queued.load(Ordering::Relaxed),
            self.inflight.load(Ordering::Relaxed),
        )
    }

    /// Requests removal of a chunk. The removal reaches the renderer on the
    /// next drain; any in-flight mesh for the coordinate is staled out.
    pub fn evict(&self, coord: ChunkCoord) {
        {
            let mut versions = self.versions.lock().unwrap();
            *versions.entry(coord).or_insert(0) += 1;
        }
        self.removals.lock().unwrap().push(coord);
        self.changed.store(true, Ordering::Release);
    }

    /// Returns the updates completed since the last call. Never blocks.
    pub fn drain_ready(&self) -> Vec<ChunkUpdate> {
        let mut out: Vec<ChunkUpdate> = self
            .removals
            .lock()
            .unwrap()
            .drain(..)
            .map(ChunkUpdate::Removed)
            .collect();
        for done in self.done_rx.try_iter() {
            let latest = self
                .versions
                .lock()
                .unwrap()
                .get(&done.coord)
                .copied()
                .unwrap_or(0);
            if done.version != latest {
                log::debug!(
                    "discarding stale mesh for chunk {:?} (v{} superseded by v{})",
                    done.coord,
                    done.version,
                    latest
                );
                continue;
            }
            out.push(ChunkUpdate::Meshed(done.coord, done.mesh));
        }
        out
    }

    /// Edge-triggered change flag: true once after updates are delivered,
    /// cleared by the read.
    pub fn has_changed(&self) -> bool {
        self.changed.swap(false, Ordering::AcqRel)
    }

    /// Closes the submission queue and waits for running jobs to finish.
    pub fn shutdown(&mut self) {
        self.job_tx = None;
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::warn!("mesh worker exited via panic");
            }
        }
    }
}

impl Default for MeshPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MeshPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn build_mesh(coord: ChunkCoord, payload: ChunkPayload) -> ChunkMesh {
    match payload {
        ChunkPayload::Mono(id) => {
            let mut chunk = Chunk::new(coord, CHUNK_SIZE);
            chunk.fill(id);
            mono_mesh(&chunk, id)
        }
        ChunkPayload::Dense(blocks) => {
            let chunk = Chunk::from_blocks(coord, CHUNK_SIZE, blocks);
            // Uniform grids slip through the fast path even when the server
            // sent them dense.
            match chunk.is_mono() {
                Some(id) => mono_mesh(&chunk, id),
                None => mesh_chunk(&chunk),
            }
        }
    }
}
