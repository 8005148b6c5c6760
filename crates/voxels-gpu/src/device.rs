use std::fmt::Debug;
use std::time::Duration;

use glam::{Mat4, Vec3};
use thiserror::Error;

/// Fatal device failures. Buffer creation or mapping failures surface at
/// startup; everything after that is either fenced or a programming error.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("allocating a {size}-byte {kind:?} buffer failed: {reason}")]
    Allocation {
        kind: BufferKind,
        size: usize,
        reason: String,
    },
    #[error("persistent mapping failed: {0}")]
    Mapping(String),
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum BufferKind {
    Vertex,
    Index,
    Indirect,
    Position,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FenceStatus {
    Signaled,
    TimedOut,
}

/// The slice of a modern graphics API the chunk renderer drives: immutable
/// buffer storage, persistent write-only coherent mapping, fence sync
/// objects with bounded client waits, and indirect multi-draw where each
/// command carries its own base vertex and base instance.
///
/// A windowed OpenGL binding is an external adapter, like the window
/// itself; the in-tree [`HeadlessDevice`](crate::HeadlessDevice) backs
/// tests and headless runs.
pub trait Device {
    type Buffer: Copy + Eq + Debug;
    type Fence: Debug;

    /// Allocates an immutable buffer of `size` zeroed bytes.
    fn create_buffer(&mut self, kind: BufferKind, size: usize)
        -> Result<Self::Buffer, DeviceError>;

    /// Allocates an immutable buffer and maps it persistently,
    /// write-only and host-coherent, for the buffer's lifetime.
    fn create_persistent_buffer(
        &mut self,
        kind: BufferKind,
        size: usize,
    ) -> Result<Self::Buffer, DeviceError>;

    /// Overwrites a byte range of a buffer (sub-data upload).
    fn upload(&mut self, buffer: Self::Buffer, offset: usize, data: &[u8]);

    /// Writes through the persistent mapping. Valid only on buffers from
    /// [`create_persistent_buffer`](Self::create_persistent_buffer);
    /// exclusivity against in-flight device reads is the caller's fence
    /// protocol, not a lock.
    fn write_mapped(&mut self, buffer: Self::Buffer, offset: usize, data: &[u8]);

    /// Inserts a completion marker after all submitted device work.
    fn insert_fence(&mut self) -> Self::Fence;

    /// Blocks the host until the fence signals or the timeout expires.
    fn wait_fence(&mut self, fence: &Self::Fence, timeout: Duration) -> FenceStatus;

    fn delete_fence(&mut self, fence: Self::Fence);

    /// Binds the vertex/index/indirect buffers and exposes the position
    /// buffer as shader-readable storage at binding point 0.
    fn bind_chunk_buffers(
        &mut self,
        vertex: Self::Buffer,
        index: Self::Buffer,
        indirect: Self::Buffer,
        positions: Self::Buffer,
    );

    /// Issues one multi-draw-indirect call covering `count` commands.
    fn multi_draw_indirect(&mut self, count: usize);

    /// Pushes the per-frame view/projection and viewer uniforms.
    fn set_frame_uniforms(&mut self, view_proj: Mat4, viewer: Vec3);

    fn present(&mut self);

    fn unmap_buffer(&mut self, buffer: Self::Buffer);

    fn delete_buffer(&mut self, buffer: Self::Buffer);
}
