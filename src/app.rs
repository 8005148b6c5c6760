//! Wires the network feed, mesh pipeline, and chunk buffer manager into
//! the frame loop.

use std::error::Error;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use glam::{Mat4, Vec3};
use voxels_chunk::{world_to_chunk, ChunkCoord, CHUNK_SIZE};
use voxels_gpu::{submit_frame, ChunkBufferManager, HeadlessDevice};
use voxels_net::{Client, NetError, Packet, PacketReader};
use voxels_pipeline::{ChunkPayload, MeshPipeline};

use crate::demo;
use crate::Args;

const FRAME: Duration = Duration::from_millis(16);
const UPSTREAM_PERIOD: Duration = Duration::from_secs(1);

pub fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut manager = ChunkBufferManager::with_defaults(HeadlessDevice::new())?;
    let pipeline = Arc::new(MeshPipeline::new());

    let mut client = match &args.server {
        Some(addr) => {
            let mut client = Client::connect(addr)?;
            client.set_name(&args.name);
            client.set_render_distance(args.renderdist);
            client.send_client_metadata()?;
            spawn_packet_loop(client.packet_reader()?, Arc::clone(&pipeline));
            Some(client)
        }
        None => {
            log::info!("no server given; loading the built-in demo world");
            demo::submit_world(&pipeline);
            None
        }
    };

    // Fixed viewpoint; camera input lives with the windowing adapter.
    let viewer = Vec3::new(0.0, 25.0, 35.0);
    let view_proj = Mat4::perspective_rh_gl(45f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0)
        * Mat4::look_at_rh(viewer, Vec3::ZERO, Vec3::Y);

    // Runs until the process is stopped; the close signal belongs to the
    // windowing adapter.
    let mut last_upstream = Instant::now();
    loop {
        let frame_start = Instant::now();

        let changed = submit_frame(&mut manager, &pipeline, viewer, view_proj);
        if changed {
            let (queued, meshing) = pipeline.queue_depths();
            log::debug!(
                "resident chunks: {} (queued {queued}, meshing {meshing})",
                manager.live_count()
            );
        }

        if last_upstream.elapsed() >= UPSTREAM_PERIOD {
            last_upstream = Instant::now();
            evict_far_chunks(&manager, &pipeline, viewer, args.renderdist);
            if let Some(client) = client.as_mut() {
                if let Err(e) = client.send_update_entity(viewer.x, viewer.y, viewer.z, 0.0, 0.0) {
                    log::debug!("position update failed: {e}");
                }
            }
        }

        if let Some(remaining) = FRAME.checked_sub(frame_start.elapsed()) {
            thread::sleep(remaining);
        }
    }
}

fn spawn_packet_loop(mut reader: PacketReader, pipeline: Arc<MeshPipeline>) {
    thread::spawn(move || loop {
        match reader.next_packet() {
            Ok(packet) => handle_packet(packet, &pipeline),
            Err(NetError::Disconnected) => {
                log::warn!("server closed the connection; keeping resident chunks");
                break;
            }
            Err(e) => {
                log::warn!("network feed failed: {e}; keeping resident chunks");
                break;
            }
        }
    });
}

fn handle_packet(packet: Packet, pipeline: &MeshPipeline) {
    match packet {
        Packet::SendChunk { coord, blocks } => {
            pipeline.submit(coord, ChunkPayload::Dense(blocks));
        }
        Packet::SendMonoTypeChunk { coord, block } => {
            pipeline.submit(coord, ChunkPayload::Mono(block));
        }
        Packet::Identification { entity_id } => {
            log::info!("identified as entity {entity_id}");
        }
        Packet::Chat { message } => log::info!("[chat] {message}"),
        Packet::AddEntity {
            entity_id, name, ..
        } => log::debug!("entity {entity_id} ({name}) appeared"),
        Packet::RemoveEntity { entity_id } => log::debug!("entity {entity_id} left"),
        Packet::UpdateEntityPosition { .. } | Packet::UpdateEntityMetadata { .. } => {}
    }
}

/// Asks the pipeline to drop resident chunks outside the render distance.
fn evict_far_chunks(
    manager: &ChunkBufferManager<HeadlessDevice>,
    pipeline: &MeshPipeline,
    viewer: Vec3,
    render_distance: u8,
) {
    let center: ChunkCoord =
        world_to_chunk(viewer.x as i32, viewer.y as i32, viewer.z as i32, CHUNK_SIZE);
    let max_d2 = i64::from(render_distance) * i64::from(render_distance);
    for coord in manager.coords() {
        if coord.distance_sq(center) > max_d2 {
            pipeline.evict(coord);
        }
    }
}
