//! CPU meshing: packed-vertex quads from chunk snapshots via greedy face merging.
#![forbid(unsafe_code)]

mod face;
mod greedy;
mod vertex;

pub use face::{Face, ALL_FACES};
pub use greedy::{mesh_chunk, mono_mesh};
pub use vertex::{pack_vertex, AO_FULL};

/// An ordered list of quads for one chunk, four packed words per quad.
/// Byte layout in memory is `4 bytes × 4 vertices × quad_count`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkMesh {
    packed: Vec<u32>,
}

impl ChunkMesh {
    pub fn with_quad_capacity(quads: usize) -> Self {
        Self {
            packed: Vec::with_capacity(quads * 4),
        }
    }

    /// The packed vertex stream, four words per quad.
    #[inline]
    pub fn packed(&self) -> &[u32] {
        &self.packed
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.packed.len() / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.packed.is_empty()
    }

    /// Iterates quads as `[v0, v1, v2, v3]` packed words.
    pub fn quads(&self) -> impl Iterator<Item = [u32; 4]> + '_ {
        self.packed.chunks_exact(4).map(|q| [q[0], q[1], q[2], q[3]])
    }

    #[inline]
    pub(crate) fn push_quad(&mut self, quad: [u32; 4]) {
        self.packed.extend_from_slice(&quad);
    }
}
