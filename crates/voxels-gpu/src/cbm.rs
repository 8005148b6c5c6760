use std::mem;
use std::time::Duration;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use hashbrown::HashMap;
use voxels_chunk::{chunk_to_world_origin, ChunkCoord, CHUNK_SIZE};

use crate::device::{BufferKind, Device, DeviceError, FenceStatus};

/// Regions in the vertex ring; one frame of device reads per region.
pub const N_BUFFERS: usize = 3;
/// Chunk slots managed by default.
pub const MAX_CHUNKS: usize = 1024;
/// Quads a single chunk mesh may hold by default.
pub const MAX_QUADS_PER_CHUNK: usize = 4096;
/// Four packed 4-byte vertices per quad.
pub const VERTEX_BYTES_PER_QUAD: usize = 16;
/// Vertex bytes reserved per chunk slot.
pub const CHUNK_VERTEX_CAPACITY: usize = MAX_QUADS_PER_CHUNK * VERTEX_BYTES_PER_QUAD;
/// Two triangles per quad.
pub const INDICES_PER_QUAD: usize = 6;
/// Upper bound on a single client fence wait; on expiry the write proceeds.
pub const FENCE_TIMEOUT: Duration = Duration::from_millis(10);

const POSITION_STRIDE: usize = mem::size_of::<[f32; 4]>();
const COMMAND_STRIDE: usize = mem::size_of::<DrawElementsIndirectCommand>();

/// One indirect draw record, laid out as the device consumes it.
/// A free slot keeps `instance_count = 0` and is skipped by the draw.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Pod, Zeroable)]
pub struct DrawElementsIndirectCommand {
    /// Indices to draw, six per quad.
    pub count: u32,
    pub instance_count: u32,
    /// Always 0: every slot reads the shared index pattern from the start.
    pub first_index: u32,
    /// Word offset of the slot's vertex data from the start of the ring.
    pub base_vertex: i32,
    /// The slot index; the vertex stage uses it to fetch the chunk origin.
    pub base_instance: u32,
}

/// Owns the four device buffers chunks render from and the slot table that
/// binds chunk coordinates to fixed-size vertex regions.
///
/// The vertex ring is persistently mapped and split into [`N_BUFFERS`]
/// regions. Every write pass targets one region, gated by that region's
/// fence, and rotates to the next; the device never reads the region
/// currently being written.
pub struct ChunkBufferManager<D: Device> {
    device: D,
    max_chunks: usize,
    max_quads_per_chunk: usize,
    chunk_capacity: usize,

    vertex_buffer: D::Buffer,
    index_buffer: D::Buffer,
    indirect_buffer: D::Buffer,
    position_buffer: D::Buffer,

    fences: Vec<Option<D::Fence>>,
    region: usize,

    chunk_to_slot: HashMap<ChunkCoord, usize>,
    slot_to_chunk: Vec<Option<ChunkCoord>>,
    commands: Vec<DrawElementsIndirectCommand>,
    viewer: Vec3,
}

impl<D: Device> ChunkBufferManager<D> {
    /// Allocates the device buffers for `max_chunks` slots of
    /// `max_quads_per_chunk` quads each. Fails only on allocation or
    /// mapping failure, which is fatal at startup.
    pub fn new(
        mut device: D,
        max_chunks: usize,
        max_quads_per_chunk: usize,
    ) -> Result<Self, DeviceError> {
        let chunk_capacity = max_quads_per_chunk * VERTEX_BYTES_PER_QUAD;

        let vertex_buffer = device
            .create_persistent_buffer(BufferKind::Vertex, N_BUFFERS * max_chunks * chunk_capacity)?;

        let indices = shared_index_pattern(max_quads_per_chunk);
        let index_buffer =
            device.create_buffer(BufferKind::Index, indices.len() * mem::size_of::<u32>())?;
        device.upload(index_buffer, 0, bytemuck::cast_slice(&indices));

        let indirect_buffer =
            device.create_buffer(BufferKind::Indirect, max_chunks * COMMAND_STRIDE)?;
        let position_buffer =
            device.create_buffer(BufferKind::Position, max_chunks * POSITION_STRIDE)?;

        Ok(Self {
            device,
            max_chunks,
            max_quads_per_chunk,
            chunk_capacity,
            vertex_buffer,
            index_buffer,
            indirect_buffer,
            position_buffer,
            fences: (0..N_BUFFERS).map(|_| None).collect(),
            region: 0,
            chunk_to_slot: HashMap::new(),
            slot_to_chunk: vec![None; max_chunks],
            commands: vec![DrawElementsIndirectCommand::default(); max_chunks],
            viewer: Vec3::ZERO,
        })
    }

    /// The canonical configuration: 1024 slots of 4096 quads.
    pub fn with_defaults(device: D) -> Result<Self, DeviceError> {
        Self::new(device, MAX_CHUNKS, MAX_QUADS_PER_CHUNK)
    }

    /// Updates the viewer position the replacement policy measures against.
    /// Called once per frame.
    pub fn set_viewer(&mut self, viewer: Vec3) {
        self.viewer = viewer;
    }

    /// Uploads a chunk's packed vertices, binding the coordinate to a slot.
    /// A coordinate that is already resident keeps its slot; otherwise the
    /// first free slot is taken, evicting the farthest chunk at capacity.
    ///
    /// Panics if `quad_count` exceeds the per-chunk maximum or `vertices`
    /// is not four words per quad; both are broken caller contracts.
    pub fn add_chunk(&mut self, coord: ChunkCoord, vertices: &[u32], quad_count: usize) {
        assert!(
            quad_count <= self.max_quads_per_chunk,
            "chunk at {coord:?} has {quad_count} quads, over the {}-quad slot capacity",
            self.max_quads_per_chunk
        );
        assert!(
            vertices.len() == quad_count * 4,
            "packed vertex data must carry four words per quad ({} words for {quad_count} quads)",
            vertices.len()
        );

        self.begin_write_pass();

        let slot = self.slot_for(coord);
        let offset = self.slot_offset(slot);
        debug_assert!(vertices.len() * 4 <= self.chunk_capacity);
        self.device
            .write_mapped(self.vertex_buffer, offset, bytemuck::cast_slice(vertices));

        let command = DrawElementsIndirectCommand {
            count: (quad_count * INDICES_PER_QUAD) as u32,
            instance_count: 1,
            first_index: 0,
            base_vertex: (offset / 4) as i32,
            base_instance: slot as u32,
        };
        self.commands[slot] = command;
        self.device.upload(
            self.indirect_buffer,
            slot * COMMAND_STRIDE,
            bytemuck::bytes_of(&command),
        );

        let (ox, oy, oz) = chunk_to_world_origin(coord, CHUNK_SIZE);
        let position: [f32; 4] = [ox as f32, oy as f32, oz as f32, 1.0];
        self.device.upload(
            self.position_buffer,
            slot * POSITION_STRIDE,
            bytemuck::cast_slice(&position),
        );

        self.end_write_pass();
    }

    /// Releases a chunk's slot and disables its draw command. Unknown
    /// coordinates are a no-op.
    pub fn remove_chunk(&mut self, coord: ChunkCoord) {
        let Some(slot) = self.chunk_to_slot.remove(&coord) else {
            return;
        };
        self.slot_to_chunk[slot] = None;

        self.begin_write_pass();

        // Clear the incoming region's sub-region so a reused slot cannot
        // briefly draw stale geometry before its fence retires.
        let offset = self.slot_offset(slot);
        let zeros = vec![0u8; self.chunk_capacity];
        self.device.write_mapped(self.vertex_buffer, offset, &zeros);

        self.commands[slot].instance_count = 0;
        let command = self.commands[slot];
        self.device.upload(
            self.indirect_buffer,
            slot * COMMAND_STRIDE,
            bytemuck::bytes_of(&command),
        );

        let cleared: [f32; 4] = [0.0; 4];
        self.device.upload(
            self.position_buffer,
            slot * POSITION_STRIDE,
            bytemuck::cast_slice(&cleared),
        );

        self.end_write_pass();
    }

    /// Binds the chunk buffers and issues the one multi-draw-indirect call
    /// covering every slot; free slots have `instance_count = 0` and cost
    /// nothing.
    pub fn render(&mut self) {
        self.device.bind_chunk_buffers(
            self.vertex_buffer,
            self.index_buffer,
            self.indirect_buffer,
            self.position_buffer,
        );
        self.device.multi_draw_indirect(self.max_chunks);
    }

    /// Deletes fences, unmaps the ring, and frees the buffers, handing the
    /// device back.
    pub fn shutdown(mut self) -> D {
        for fence in &mut self.fences {
            if let Some(fence) = fence.take() {
                self.device.delete_fence(fence);
            }
        }
        self.device.unmap_buffer(self.vertex_buffer);
        self.device.delete_buffer(self.vertex_buffer);
        self.device.delete_buffer(self.index_buffer);
        self.device.delete_buffer(self.indirect_buffer);
        self.device.delete_buffer(self.position_buffer);
        self.device
    }

    // Write passes rotate through the ring: wait out the incoming region's
    // fence, write, fence the region again, advance.

    fn begin_write_pass(&mut self) {
        if let Some(fence) = self.fences[self.region].take() {
            if self.device.wait_fence(&fence, FENCE_TIMEOUT) == FenceStatus::TimedOut {
                log::warn!(
                    "fence wait for region {} timed out after {:?}; writing anyway",
                    self.region,
                    FENCE_TIMEOUT
                );
            }
            self.device.delete_fence(fence);
        }
    }

    fn end_write_pass(&mut self) {
        self.fences[self.region] = Some(self.device.insert_fence());
        self.region = (self.region + 1) % N_BUFFERS;
    }

    fn slot_offset(&self, slot: usize) -> usize {
        self.region * self.max_chunks * self.chunk_capacity + slot * self.chunk_capacity
    }

    fn slot_for(&mut self, coord: ChunkCoord) -> usize {
        if let Some(&slot) = self.chunk_to_slot.get(&coord) {
            return slot;
        }
        let slot = match self.slot_to_chunk.iter().position(Option::is_none) {
            Some(free) => free,
            None => self.evict_farthest(),
        };
        self.chunk_to_slot.insert(coord, slot);
        self.slot_to_chunk[slot] = Some(coord);
        slot
    }

    /// Frees the live slot whose chunk origin is farthest from the viewer,
    /// lowest slot index on ties.
    fn evict_farthest(&mut self) -> usize {
        let mut best_slot = 0;
        let mut best_d2 = f32::NEG_INFINITY;
        for (slot, chunk) in self.slot_to_chunk.iter().enumerate() {
            let Some(coord) = chunk else { continue };
            let (ox, oy, oz) = chunk_to_world_origin(*coord, CHUNK_SIZE);
            let d2 = Vec3::new(ox as f32, oy as f32, oz as f32).distance_squared(self.viewer);
            if d2 > best_d2 {
                best_d2 = d2;
                best_slot = slot;
            }
        }
        let evicted = self.slot_to_chunk[best_slot]
            .take()
            .expect("eviction only runs on a full slot table");
        self.chunk_to_slot.remove(&evicted);
        self.commands[best_slot].instance_count = 0;
        log::info!("chunk slots full; evicting {evicted:?} from slot {best_slot}");
        best_slot
    }

    // Inspection used by the frame loop and the test suite.

    pub fn slot_of(&self, coord: ChunkCoord) -> Option<usize> {
        self.chunk_to_slot.get(&coord).copied()
    }

    pub fn contains(&self, coord: ChunkCoord) -> bool {
        self.chunk_to_slot.contains_key(&coord)
    }

    /// The indirect command shadow for a slot. Panics on a slot outside
    /// `[0, max_chunks)`.
    pub fn command(&self, slot: usize) -> DrawElementsIndirectCommand {
        self.commands[slot]
    }

    pub fn live_count(&self) -> usize {
        self.chunk_to_slot.len()
    }

    /// Coordinates currently resident, in no particular order.
    pub fn coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.chunk_to_slot.keys().copied()
    }

    /// The region the next write pass will target.
    pub fn incoming_region(&self) -> usize {
        self.region
    }

    pub fn max_chunks(&self) -> usize {
        self.max_chunks
    }

    pub fn chunk_capacity_bytes(&self) -> usize {
        self.chunk_capacity
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }
}

/// The repeating quad index pattern shared by every slot:
/// `[0,1,2, 0,2,3, 4,5,6, 4,6,7, …]`.
fn shared_index_pattern(max_quads: usize) -> Vec<u32> {
    let mut indices = Vec::with_capacity(max_quads * INDICES_PER_QUAD);
    for quad in 0..max_quads as u32 {
        let base = quad * 4;
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    indices
}
