mod app;
mod demo;

use clap::Parser;

/// Voxel world client: streams chunks from a server, meshes them off the
/// render thread, and renders through one indirect multi-draw per frame.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Server address (omit for the offline demo world)
    #[arg(long)]
    pub server: Option<String>,

    /// Player name
    #[arg(long, default_value = "Player")]
    pub name: String,

    /// Render distance in chunks
    #[arg(long, default_value_t = 8)]
    pub renderdist: u8,
}

fn main() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let args = Args::parse();
    if let Err(e) = app::run(args) {
        log::error!("fatal: {e}");
        std::process::exit(1);
    }
}
