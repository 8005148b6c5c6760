use glam::{Mat4, Vec3};
use voxels_pipeline::{ChunkUpdate, MeshPipeline};

use crate::cbm::ChunkBufferManager;
use crate::device::Device;

/// Runs one frame against the buffer manager: drains the pipeline, applies
/// each finished mesh or removal, pushes the frame uniforms, and issues the
/// single indirect multi-draw. Returns whether the resident chunk set
/// changed this frame, for upstream telemetry.
///
/// Meshes are transient: each one is dropped as soon as its vertices are
/// copied into the ring.
pub fn submit_frame<D: Device>(
    manager: &mut ChunkBufferManager<D>,
    pipeline: &MeshPipeline,
    viewer: Vec3,
    view_proj: Mat4,
) -> bool {
    manager.set_viewer(viewer);

    let updates = pipeline.drain_ready();
    let changed = pipeline.has_changed() || !updates.is_empty();
    for update in updates {
        match update {
            ChunkUpdate::Meshed(coord, mesh) => {
                manager.add_chunk(coord, mesh.packed(), mesh.quad_count());
            }
            ChunkUpdate::Removed(coord) => manager.remove_chunk(coord),
        }
    }

    manager.device_mut().set_frame_uniforms(view_proj, viewer);
    manager.render();
    manager.device_mut().present();
    changed
}
