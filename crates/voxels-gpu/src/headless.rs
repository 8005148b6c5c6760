use std::time::Duration;

use glam::{Mat4, Vec3};

use crate::device::{BufferKind, Device, DeviceError, FenceStatus};

/// Handle to a headless buffer.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct BufferId(u32);

/// Handle to a headless fence.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FenceId(u64);

impl FenceId {
    #[inline]
    pub fn id(self) -> u64 {
        self.0
    }
}

/// How headless fences answer client waits.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FencePolicy {
    /// Every wait reports completion, the common case for a device with no
    /// actual work in flight.
    Signal,
    /// Every wait runs to its timeout, for exercising the stall path.
    RefuseToSignal,
}

struct HeadlessBuffer {
    kind: BufferKind,
    data: Vec<u8>,
    persistent: bool,
    mapped: bool,
}

/// In-memory stand-in for the graphics device. Buffers are plain byte
/// vectors and every operation is recorded, so tests can inspect exactly
/// what a real device would have received.
pub struct HeadlessDevice {
    buffers: Vec<Option<HeadlessBuffer>>,
    policy: FencePolicy,
    next_fence: u64,
    live_fences: usize,
    waits: Vec<(u64, FenceStatus)>,
    draw_calls: Vec<usize>,
    bound: Option<(BufferId, BufferId, BufferId, BufferId)>,
    last_view_proj: Mat4,
    last_viewer: Vec3,
    presented: usize,
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::with_fence_policy(FencePolicy::Signal)
    }

    pub fn with_fence_policy(policy: FencePolicy) -> Self {
        Self {
            buffers: Vec::new(),
            policy,
            next_fence: 0,
            live_fences: 0,
            waits: Vec::new(),
            draw_calls: Vec::new(),
            bound: None,
            last_view_proj: Mat4::IDENTITY,
            last_viewer: Vec3::ZERO,
            presented: 0,
        }
    }

    fn buffer(&self, id: BufferId) -> &HeadlessBuffer {
        self.buffers[id.0 as usize]
            .as_ref()
            .expect("buffer was deleted")
    }

    fn buffer_mut(&mut self, id: BufferId) -> &mut HeadlessBuffer {
        self.buffers[id.0 as usize]
            .as_mut()
            .expect("buffer was deleted")
    }

    fn alloc(&mut self, kind: BufferKind, size: usize, persistent: bool) -> BufferId {
        let id = BufferId(self.buffers.len() as u32);
        self.buffers.push(Some(HeadlessBuffer {
            kind,
            data: vec![0; size],
            persistent,
            mapped: persistent,
        }));
        id
    }

    /// Raw contents of a buffer, for inspection.
    pub fn buffer_bytes(&self, id: BufferId) -> &[u8] {
        &self.buffer(id).data
    }

    /// First live buffer of the given kind, if any.
    pub fn buffer_of_kind(&self, kind: BufferKind) -> Option<BufferId> {
        self.buffers.iter().enumerate().find_map(|(i, buf)| {
            buf.as_ref()
                .filter(|b| b.kind == kind)
                .map(|_| BufferId(i as u32))
        })
    }

    pub fn buffer_kind(&self, id: BufferId) -> BufferKind {
        self.buffer(id).kind
    }

    /// Every client wait so far, as `(fence id, outcome)` pairs.
    pub fn waits(&self) -> &[(u64, FenceStatus)] {
        &self.waits
    }

    /// Command counts of the multi-draw calls issued so far.
    pub fn draw_calls(&self) -> &[usize] {
        &self.draw_calls
    }

    pub fn live_fences(&self) -> usize {
        self.live_fences
    }

    pub fn bound_buffers(&self) -> Option<(BufferId, BufferId, BufferId, BufferId)> {
        self.bound
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn last_viewer(&self) -> Vec3 {
        self.last_viewer
    }

    pub fn last_view_proj(&self) -> Mat4 {
        self.last_view_proj
    }
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl Device for HeadlessDevice {
    type Buffer = BufferId;
    type Fence = FenceId;

    fn create_buffer(
        &mut self,
        kind: BufferKind,
        size: usize,
    ) -> Result<Self::Buffer, DeviceError> {
        Ok(self.alloc(kind, size, false))
    }

    fn create_persistent_buffer(
        &mut self,
        kind: BufferKind,
        size: usize,
    ) -> Result<Self::Buffer, DeviceError> {
        Ok(self.alloc(kind, size, true))
    }

    fn upload(&mut self, buffer: Self::Buffer, offset: usize, data: &[u8]) {
        let buf = self.buffer_mut(buffer);
        buf.data[offset..offset + data.len()].copy_from_slice(data);
    }

    fn write_mapped(&mut self, buffer: Self::Buffer, offset: usize, data: &[u8]) {
        let buf = self.buffer_mut(buffer);
        assert!(buf.persistent && buf.mapped, "buffer is not mapped");
        buf.data[offset..offset + data.len()].copy_from_slice(data);
    }

    fn insert_fence(&mut self) -> Self::Fence {
        let fence = FenceId(self.next_fence);
        self.next_fence += 1;
        self.live_fences += 1;
        fence
    }

    fn wait_fence(&mut self, fence: &Self::Fence, _timeout: Duration) -> FenceStatus {
        // No device work is ever actually pending, so a wait resolves
        // immediately either way; the policy picks which answer.
        let status = match self.policy {
            FencePolicy::Signal => FenceStatus::Signaled,
            FencePolicy::RefuseToSignal => FenceStatus::TimedOut,
        };
        self.waits.push((fence.0, status));
        status
    }

    fn delete_fence(&mut self, _fence: Self::Fence) {
        self.live_fences -= 1;
    }

    fn bind_chunk_buffers(
        &mut self,
        vertex: Self::Buffer,
        index: Self::Buffer,
        indirect: Self::Buffer,
        positions: Self::Buffer,
    ) {
        self.bound = Some((vertex, index, indirect, positions));
    }

    fn multi_draw_indirect(&mut self, count: usize) {
        assert!(self.bound.is_some(), "draw without bound buffers");
        self.draw_calls.push(count);
    }

    fn set_frame_uniforms(&mut self, view_proj: Mat4, viewer: Vec3) {
        self.last_view_proj = view_proj;
        self.last_viewer = viewer;
    }

    fn present(&mut self) {
        self.presented += 1;
    }

    fn unmap_buffer(&mut self, buffer: Self::Buffer) {
        self.buffer_mut(buffer).mapped = false;
    }

    fn delete_buffer(&mut self, buffer: Self::Buffer) {
        self.buffers[buffer.0 as usize] = None;
    }
}
