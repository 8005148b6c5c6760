use voxels_blocks::{BlockId, AIR};
use voxels_chunk::Chunk;

use crate::face::{Face, ALL_FACES};
use crate::vertex::{pack_vertex, AO_FULL};
use crate::ChunkMesh;

/// Meshes the visible outer surface of a chunk's non-Air cells.
///
/// A face is visible iff the neighbor one step along its normal holds a
/// different identifier; out-of-chunk neighbors read as Air, so boundary
/// faces are always emitted (seams between touching chunks overlap).
///
/// Per face direction, each slab perpendicular to the normal becomes a 2D
/// mask of visible face identifiers, merged into maximal rectangles with a
/// u-major, v-minor scan: the run ("width") extends along v, rows
/// ("height") accumulate along u while every cell of the next row matches.
pub fn mesh_chunk(chunk: &Chunk) -> ChunkMesh {
    let s = chunk.size();
    let mut mesh = ChunkMesh::with_quad_capacity(64);
    let mut mask: Vec<Option<BlockId>> = vec![None; s * s];
    let mut seen: Vec<bool> = vec![false; s * s];

    for face in ALL_FACES {
        let (dx, dy, dz) = face.delta();
        for w in 0..s {
            let mut any = false;
            for u in 0..s {
                for v in 0..s {
                    let (x, y, z) = face.cell(w, u, v);
                    let id = chunk.get(x, y, z);
                    mask[u * s + v] = if id != AIR && chunk.get(x + dx, y + dy, z + dz) != id {
                        any = true;
                        Some(id)
                    } else {
                        None
                    };
                }
            }
            if !any {
                continue;
            }
            seen.fill(false);
            extract_rects(&mask, &mut seen, s, face, w, &mut mesh);
        }
    }
    mesh
}

/// Greedy rectangle extraction over one slab mask.
fn extract_rects(
    mask: &[Option<BlockId>],
    seen: &mut [bool],
    s: usize,
    face: Face,
    w: usize,
    mesh: &mut ChunkMesh,
) {
    for u0 in 0..s {
        for v0 in 0..s {
            let Some(id) = mask[u0 * s + v0] else {
                continue;
            };
            if seen[u0 * s + v0] {
                continue;
            }

            let mut width = 1;
            while v0 + width < s {
                let i = u0 * s + v0 + width;
                if mask[i] != Some(id) || seen[i] {
                    break;
                }
                width += 1;
            }

            let mut height = 1;
            'rows: while u0 + height < s {
                for v in v0..v0 + width {
                    let i = (u0 + height) * s + v;
                    if mask[i] != Some(id) || seen[i] {
                        break 'rows;
                    }
                }
                height += 1;
            }

            for u in u0..u0 + height {
                for v in v0..v0 + width {
                    seen[u * s + v] = true;
                }
            }

            emit_rect(mesh, face, w, u0, v0, height, width, id);
        }
    }
}

/// Surface mesh for a chunk known to be uniformly filled with `id`:
/// six full faces, one per direction. Air yields an empty mesh.
pub fn mono_mesh(chunk: &Chunk, id: BlockId) -> ChunkMesh {
    let mut mesh = ChunkMesh::with_quad_capacity(6);
    if id == AIR {
        return mesh;
    }
    let s = chunk.size();
    for face in ALL_FACES {
        let w = if face.positive() { s - 1 } else { 0 };
        emit_rect(&mut mesh, face, w, 0, 0, s, s, id);
    }
    mesh
}

/// Emits one quad for a `height × width` rectangle in the slab plane.
/// Corners wind counter-clockwise seen from outside, with texture corners
/// (0,0)(1,0)(1,1)(0,1); positive-normal faces sit one cell past the slab.
fn emit_rect(
    mesh: &mut ChunkMesh,
    face: Face,
    w: usize,
    u0: usize,
    v0: usize,
    height: usize,
    width: usize,
    id: BlockId,
) {
    let p = (w + usize::from(face.positive())) as u32;
    let (ua, ub) = (u0 as u32, (u0 + height) as u32);
    let (va, vb) = (v0 as u32, (v0 + width) as u32);

    let corners: [(u32, u32, u32); 4] = match face {
        Face::PosX => [(p, ua, va), (p, ub, va), (p, ub, vb), (p, ua, vb)],
        Face::NegX => [(p, ua, va), (p, ua, vb), (p, ub, vb), (p, ub, va)],
        Face::PosY => [(ua, p, va), (ua, p, vb), (ub, p, vb), (ub, p, va)],
        Face::NegY => [(ua, p, va), (ub, p, va), (ub, p, vb), (ua, p, vb)],
        Face::PosZ => [(ua, va, p), (ub, va, p), (ub, vb, p), (ua, vb, p)],
        Face::NegZ => [(ua, va, p), (ua, vb, p), (ub, vb, p), (ub, va, p)],
    };
    const CORNER_UVS: [(u32, u32); 4] = [(0, 0), (1, 0), (1, 1), (0, 1)];

    let o = face.index() as u32;
    let t = id as u32;
    let mut quad = [0u32; 4];
    for i in 0..4 {
        let (x, y, z) = corners[i];
        let (u, v) = CORNER_UVS[i];
        quad[i] = pack_vertex(x, y, z, u, v, o, t, AO_FULL);
    }
    mesh.push_quad(quad);
}
