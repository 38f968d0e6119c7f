//! # Voxel World Entry Point
//!
//! Runs the headless frame loop. An optional first argument names a JSON
//! world configuration.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- world.json
//! ```

fn main() {
    voxel_world::run();
}
