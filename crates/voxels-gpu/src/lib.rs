//! GPU chunk residency: a persistent-mapped vertex ring, fence-gated slot
//! table, and the single indirect multi-draw submission path.

mod cbm;
mod device;
mod frame;
mod headless;

pub use cbm::{
    ChunkBufferManager, DrawElementsIndirectCommand, CHUNK_VERTEX_CAPACITY, FENCE_TIMEOUT,
    INDICES_PER_QUAD, MAX_CHUNKS, MAX_QUADS_PER_CHUNK, N_BUFFERS, VERTEX_BYTES_PER_QUAD,
};
pub use device::{BufferKind, Device, DeviceError, FenceStatus};
pub use frame::submit_frame;
pub use headless::{BufferId, FenceId, FencePolicy, HeadlessDevice};
