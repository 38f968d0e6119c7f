#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The world subsystem of a block-based sandbox renderer: procedural terrain
//! in chunked columns, face-culled chunk meshes, and a streaming working set
//! of chunks around a moving viewer.
//!
//! ## Key Modules
//!
//! * `config` - Build-time defaults and the JSON-loadable `WorldConfig`
//! * `core` - Shared-ownership primitives used throughout the engine
//! * `engine_state` - The frame coordinator, rendering seam and voxel world
//!
//! ## Architecture
//!
//! The crate never opens a window or reads input. A host supplies:
//! * a [`RenderBackend`](engine_state::rendering::RenderBackend) that uploads,
//!   draws and destroys chunk meshes
//! * a [`ViewerInput`](engine_state::viewer::ViewerInput) each frame
//!
//! [`run`] drives the engine headlessly against a bookkeeping backend.
//!
//! ## Usage
//!
//! ```rust,no_run
//! fn main() {
//!     voxel_world::run();
//! }
//! ```
//!
//! ## Performance Considerations
//!
//! * Dense per-chunk block storage with a fixed linearization
//! * Per-frame cap on mesh builds to bound frame-time spikes
//! * GPU buffers released as soon as a chunk leaves the retention radius

use cgmath::{Deg, Point3};
use log::{error, info};
use web_time::Instant;

use crate::config::WorldConfig;
use crate::core::StResource;
use crate::engine_state::{
    rendering::{share_backend, HeadlessRenderBackend},
    viewer::ViewerInput,
    EngineState,
};

pub mod config;
pub mod core;
pub mod engine_state;

/// Frames simulated by [`run`].
pub const HEADLESS_FRAMES: u32 = 600;

/// World units the headless viewer moves along +X each frame.
const HEADLESS_SPEED: f32 = 0.5;

/// Frames between two scripted edits in the headless loop.
const HEADLESS_EDIT_INTERVAL: u32 = 60;

/// Loads the world configuration named by the first command-line argument.
///
/// Falls back to defaults, with an error logged, when the file cannot be
/// used. Without an argument the defaults are used silently.
pub fn load_config_from_args() -> WorldConfig {
    let Some(path) = std::env::args().nth(1) else {
        return WorldConfig::default();
    };
    match WorldConfig::load(&path) {
        Ok(config) => {
            info!("Loaded world config from {}", path);
            config
        }
        Err(err) => {
            error!("{}; falling back to defaults", err);
            WorldConfig::default()
        }
    }
}

/// Runs the engine headlessly: a viewer walks along +X over generated
/// terrain, looking slightly down and breaking the targeted block every
/// [`HEADLESS_EDIT_INTERVAL`] frames.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = load_config_from_args();
    let backend = StResource::new(HeadlessRenderBackend::default());
    let mut engine = match EngineState::new(config, share_backend(&backend)) {
        Ok(engine) => engine,
        Err(err) => {
            error!("{}", err);
            return;
        }
    };

    let start_height = engine.world.generator().height_field().height(0.0, 0.0) as f32;
    let start = Instant::now();
    let mut meshed = 0;
    let mut edits = 0;

    for frame in 0..HEADLESS_FRAMES {
        let position = Point3::new(frame as f32 * HEADLESS_SPEED, start_height + 2.0, 0.0);
        let mut input = ViewerInput::from_angles(position, Deg(0.0), Deg(-40.0));
        input.break_block = frame % HEADLESS_EDIT_INTERVAL == 0;

        let summary = engine.frame(&input);
        meshed += summary.update.meshed;
        if summary.edit.is_some() {
            edits += 1;
        }
        backend.get_mut().take_frame_draws();
    }

    let backend = backend.get();
    info!(
        "Ran {} frames in {:?}: {} chunks resident, {} meshed, {} edits, {} live buffers, {} draws, {} buffers released",
        HEADLESS_FRAMES,
        start.elapsed(),
        engine.world.resident_count(),
        meshed,
        edits,
        backend.live_count(),
        backend.draw_count(),
        backend.destroy_count()
    );
}
