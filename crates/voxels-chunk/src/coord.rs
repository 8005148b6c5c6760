use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cy: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cy: i32, cz: i32) -> Self {
        Self { cx, cy, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cy: self.cy + dy,
            cz: self.cz + dz,
        }
    }

    #[inline]
    pub fn distance_sq(self, other: ChunkCoord) -> i64 {
        let dx = i64::from(self.cx - other.cx);
        let dy = i64::from(self.cy - other.cy);
        let dz = i64::from(self.cz - other.cz);
        dx * dx + dy * dy + dz * dz
    }
}

impl From<(i32, i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl From<ChunkCoord> for (i32, i32, i32) {
    fn from(value: ChunkCoord) -> Self {
        (value.cx, value.cy, value.cz)
    }
}

/// Converts a world position to the coordinate of the chunk containing it.
/// Floored division, so negative positions land in the right chunk.
#[inline]
pub fn world_to_chunk(wx: i32, wy: i32, wz: i32, size: usize) -> ChunkCoord {
    let s = size as i32;
    ChunkCoord::new(wx.div_euclid(s), wy.div_euclid(s), wz.div_euclid(s))
}

/// Converts a world position to local cell coordinates, each in `[0, size)`.
#[inline]
pub fn world_to_local(wx: i32, wy: i32, wz: i32, size: usize) -> (usize, usize, usize) {
    let s = size as i32;
    (
        wx.rem_euclid(s) as usize,
        wy.rem_euclid(s) as usize,
        wz.rem_euclid(s) as usize,
    )
}

/// World-space corner of the chunk at the given chunk coordinate.
#[inline]
pub fn chunk_to_world_origin(coord: ChunkCoord, size: usize) -> (i32, i32, i32) {
    let s = size as i32;
    (coord.cx * s, coord.cy * s, coord.cz * s)
}

/// Flat index for a local cell, `x`-major.
#[inline]
pub fn local_to_index(x: usize, y: usize, z: usize, size: usize) -> usize {
    x * size * size + y * size + z
}

/// Inverse of [`local_to_index`].
#[inline]
pub fn index_to_local(index: usize, size: usize) -> (usize, usize, usize) {
    let x = index / (size * size);
    let rem = index % (size * size);
    (x, rem / size, rem % size)
}
