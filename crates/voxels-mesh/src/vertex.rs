/// Fixed ambient-occlusion value; the field is reserved until AO is computed.
pub const AO_FULL: u32 = 7;

/// Packs vertex data into a single `u32`:
/// x, y, z: local position in the chunk (5 bits each, 0-31)
/// u, v: quad corner texture coordinate (1 bit each)
/// o: orientation / face direction (3 bits)
/// t: texture id, the block identifier (8 bits)
/// ao: ambient occlusion (3 bits)
///
/// Layout, LSB to MSB: `aaattttttttooouvzzzzzyyyyyxxxxx`.
/// Each field is masked to its width; no other validation.
#[inline]
pub fn pack_vertex(x: u32, y: u32, z: u32, u: u32, v: u32, o: u32, t: u32, ao: u32) -> u32 {
    (x & 31)
        | ((y & 31) << 5)
        | ((z & 31) << 10)
        | ((u & 1) << 15)
        | ((v & 1) << 16)
        | ((o & 7) << 17)
        | ((t & 255) << 20)
        | ((ao & 7) << 28)
}
