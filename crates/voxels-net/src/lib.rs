//! TCP client for the voxel world feed: big-endian packets, one per frame.
#![forbid(unsafe_code)]

mod packet;

pub use packet::{
    clientbound, read_packet, serverbound, write_block_bulk_edit, write_chat_message,
    write_client_metadata, write_update_block, write_update_entity, BlockEdit, Packet, CHAT_BYTES,
    NAME_BYTES,
};

use std::io::{self, BufReader};
use std::net::TcpStream;

use thiserror::Error;
use voxels_blocks::BlockId;

/// Port appended when the server address names none.
pub const DEFAULT_PORT: u16 = 20000;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },
    #[error("connection closed by server")]
    Disconnected,
    #[error("unknown packet id {0:#04x}")]
    UnknownPacket(u8),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Connection to the voxel game server. The write half lives here; the
/// read loop runs on its own thread through a [`PacketReader`].
pub struct Client {
    stream: TcpStream,
    name: String,
    render_distance: u8,
}

impl Client {
    /// Connects to the server, appending [`DEFAULT_PORT`] when the address
    /// carries no port of its own.
    pub fn connect(address: &str) -> Result<Self, NetError> {
        let addr = if address.contains(':') {
            address.to_string()
        } else {
            format!("{address}:{DEFAULT_PORT}")
        };
        let stream = TcpStream::connect(&addr).map_err(|source| NetError::Connect {
            addr: addr.clone(),
            source,
        })?;
        log::info!("connected to {addr}");
        Ok(Self {
            stream,
            name: "Player".to_string(),
            render_distance: 8,
        })
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn set_render_distance(&mut self, distance: u8) {
        self.render_distance = distance;
    }

    pub fn render_distance(&self) -> u8 {
        self.render_distance
    }

    /// Sends the metadata handshake with the configured name and render
    /// distance.
    pub fn send_client_metadata(&mut self) -> Result<(), NetError> {
        write_client_metadata(&mut self.stream, self.render_distance, &self.name)?;
        Ok(())
    }

    /// Reports the player's position and view angles upstream.
    pub fn send_update_entity(
        &mut self,
        x: f32,
        y: f32,
        z: f32,
        yaw: f32,
        pitch: f32,
    ) -> Result<(), NetError> {
        write_update_entity(&mut self.stream, x, y, z, yaw, pitch)?;
        Ok(())
    }

    pub fn send_update_block(
        &mut self,
        block: BlockId,
        x: i32,
        y: i32,
        z: i32,
    ) -> Result<(), NetError> {
        write_update_block(&mut self.stream, block, x, y, z)?;
        Ok(())
    }

    pub fn send_block_bulk_edit(&mut self, edits: &[BlockEdit]) -> Result<(), NetError> {
        write_block_bulk_edit(&mut self.stream, edits)?;
        Ok(())
    }

    pub fn send_chat(&mut self, message: &str) -> Result<(), NetError> {
        write_chat_message(&mut self.stream, message)?;
        Ok(())
    }

    /// Clones the stream into a buffered reader for the packet loop.
    pub fn packet_reader(&self) -> Result<PacketReader, NetError> {
        Ok(PacketReader {
            stream: BufReader::new(self.stream.try_clone()?),
        })
    }
}

/// Blocking reader over the clientbound packet stream.
pub struct PacketReader {
    stream: BufReader<TcpStream>,
}

impl PacketReader {
    /// Blocks for the next packet. [`NetError::Disconnected`] ends the feed.
    pub fn next_packet(&mut self) -> Result<Packet, NetError> {
        read_packet(&mut self.stream)
    }
}
