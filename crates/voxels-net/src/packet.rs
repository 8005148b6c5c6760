use std::io::{self, Read, Write};

use voxels_blocks::BlockId;
use voxels_chunk::{ChunkCoord, CHUNK_VOLUME};

use crate::NetError;

/// Clientbound packet ids.
pub mod clientbound {
    pub const IDENTIFICATION: u8 = 0x00;
    pub const ADD_ENTITY: u8 = 0x01;
    pub const REMOVE_ENTITY: u8 = 0x02;
    pub const UPDATE_ENTITY_POSITION: u8 = 0x03;
    pub const SEND_CHUNK: u8 = 0x04;
    pub const SEND_MONO_TYPE_CHUNK: u8 = 0x05;
    pub const CHAT: u8 = 0x06;
    pub const UPDATE_ENTITY_METADATA: u8 = 0x07;
}

/// Serverbound packet ids.
pub mod serverbound {
    pub const UPDATE_ENTITY: u8 = 0x00;
    pub const UPDATE_BLOCK: u8 = 0x01;
    pub const BLOCK_BULK_EDIT: u8 = 0x02;
    pub const CHAT_MESSAGE: u8 = 0x03;
    pub const CLIENT_METADATA: u8 = 0x04;
}

/// Fixed width of NUL-padded name fields.
pub const NAME_BYTES: usize = 64;
/// Fixed width of NUL-padded chat fields.
pub const CHAT_BYTES: usize = 4096;

/// A decoded clientbound packet. All wire integers and floats are
/// big-endian; `SendChunk`/`SendMonoTypeChunk` carry chunk coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum Packet {
    Identification {
        entity_id: u32,
    },
    AddEntity {
        entity_id: u32,
        x: f32,
        y: f32,
        z: f32,
        yaw: f32,
        pitch: f32,
        name: String,
    },
    RemoveEntity {
        entity_id: u32,
    },
    UpdateEntityPosition {
        entity_id: u32,
        x: f32,
        y: f32,
        z: f32,
        yaw: f32,
        pitch: f32,
    },
    SendChunk {
        coord: ChunkCoord,
        blocks: Vec<BlockId>,
    },
    SendMonoTypeChunk {
        coord: ChunkCoord,
        block: BlockId,
    },
    Chat {
        message: String,
    },
    UpdateEntityMetadata {
        entity_id: u32,
        name: String,
    },
}

/// One entry of a serverbound bulk block edit.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct BlockEdit {
    pub block: BlockId,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

/// Reads one clientbound packet. End of stream at a packet boundary is
/// reported as [`NetError::Disconnected`].
pub fn read_packet<R: Read>(r: &mut R) -> Result<Packet, NetError> {
    let id = match read_u8(r) {
        Ok(id) => id,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(NetError::Disconnected),
        Err(e) => return Err(NetError::Io(e)),
    };
    match id {
        clientbound::IDENTIFICATION => Ok(Packet::Identification {
            entity_id: read_u32(r)?,
        }),
        clientbound::ADD_ENTITY => Ok(Packet::AddEntity {
            entity_id: read_u32(r)?,
            x: read_f32(r)?,
            y: read_f32(r)?,
            z: read_f32(r)?,
            yaw: read_f32(r)?,
            pitch: read_f32(r)?,
            name: read_padded_string(r, NAME_BYTES)?,
        }),
        clientbound::REMOVE_ENTITY => Ok(Packet::RemoveEntity {
            entity_id: read_u32(r)?,
        }),
        clientbound::UPDATE_ENTITY_POSITION => Ok(Packet::UpdateEntityPosition {
            entity_id: read_u32(r)?,
            x: read_f32(r)?,
            y: read_f32(r)?,
            z: read_f32(r)?,
            yaw: read_f32(r)?,
            pitch: read_f32(r)?,
        }),
        clientbound::SEND_CHUNK => {
            let coord = read_chunk_coord(r)?;
            let mut blocks = vec![0u8; CHUNK_VOLUME];
            r.read_exact(&mut blocks)?;
            Ok(Packet::SendChunk { coord, blocks })
        }
        clientbound::SEND_MONO_TYPE_CHUNK => Ok(Packet::SendMonoTypeChunk {
            coord: read_chunk_coord(r)?,
            block: read_u8(r)?,
        }),
        clientbound::CHAT => Ok(Packet::Chat {
            message: read_padded_string(r, CHAT_BYTES)?,
        }),
        clientbound::UPDATE_ENTITY_METADATA => Ok(Packet::UpdateEntityMetadata {
            entity_id: read_u32(r)?,
            name: read_padded_string(r, NAME_BYTES)?,
        }),
        other => Err(NetError::UnknownPacket(other)),
    }
}

// Serverbound writers. Each emits one complete packet.

pub fn write_client_metadata<W: Write>(
    w: &mut W,
    render_distance: u8,
    name: &str,
) -> io::Result<()> {
    let mut packet = vec![0u8; 2 + NAME_BYTES];
    packet[0] = serverbound::CLIENT_METADATA;
    packet[1] = render_distance;
    copy_padded(&mut packet[2..], name.as_bytes());
    w.write_all(&packet)
}

pub fn write_update_entity<W: Write>(
    w: &mut W,
    x: f32,
    y: f32,
    z: f32,
    yaw: f32,
    pitch: f32,
) -> io::Result<()> {
    let mut packet = Vec::with_capacity(1 + 4 * 5);
    packet.push(serverbound::UPDATE_ENTITY);
    for value in [x, y, z, yaw, pitch] {
        packet.extend_from_slice(&value.to_be_bytes());
    }
    w.write_all(&packet)
}

pub fn write_update_block<W: Write>(
    w: &mut W,
    block: BlockId,
    x: i32,
    y: i32,
    z: i32,
) -> io::Result<()> {
    let mut packet = Vec::with_capacity(2 + 4 * 3);
    packet.push(serverbound::UPDATE_BLOCK);
    packet.push(block);
    for value in [x, y, z] {
        packet.extend_from_slice(&value.to_be_bytes());
    }
    w.write_all(&packet)
}

pub fn write_block_bulk_edit<W: Write>(w: &mut W, edits: &[BlockEdit]) -> io::Result<()> {
    if edits.is_empty() {
        return Ok(());
    }
    let mut packet = Vec::with_capacity(5 + 13 * edits.len());
    packet.push(serverbound::BLOCK_BULK_EDIT);
    packet.extend_from_slice(&(edits.len() as u32).to_be_bytes());
    for edit in edits {
        packet.push(edit.block);
        packet.extend_from_slice(&edit.x.to_be_bytes());
        packet.extend_from_slice(&edit.y.to_be_bytes());
        packet.extend_from_slice(&edit.z.to_be_bytes());
    }
    w.write_all(&packet)
}

pub fn write_chat_message<W: Write>(w: &mut W, message: &str) -> io::Result<()> {
    let mut packet = vec![0u8; 1 + CHAT_BYTES];
    packet[0] = serverbound::CHAT_MESSAGE;
    copy_padded(&mut packet[1..], message.as_bytes());
    w.write_all(&packet)
}

fn copy_padded(dst: &mut [u8], src: &[u8]) {
    let n = src.len().min(dst.len());
    dst[..n].copy_from_slice(&src[..n]);
}

fn read_u8<R: Read>(r: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    r.read_exact(&mut buf)?;
    Ok(buf[0])
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_be_bytes(buf))
}

fn read_i32<R: Read>(r: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}

fn read_f32<R: Read>(r: &mut R) -> io::Result<f32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(f32::from_be_bytes(buf))
}

fn read_chunk_coord<R: Read>(r: &mut R) -> io::Result<ChunkCoord> {
    Ok(ChunkCoord::new(read_i32(r)?, read_i32(r)?, read_i32(r)?))
}

/// Reads a fixed-width field and truncates at the first NUL.
fn read_padded_string<R: Read>(r: &mut R, len: usize) -> io::Result<String> {
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    let end = buf.iter().position(|&b| b == 0).unwrap_or(len);
    buf.truncate(end);
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
