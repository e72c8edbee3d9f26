//! # Voxel Sandbox Entry Point
//!
//! Runs the headless simulation loop from the library.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json]
//! ```

fn main() {
    if let Err(err) = voxel_sandbox::run() {
        log::error!("{}", err);
        eprintln!("voxel-sandbox: {}", err);
        std::process::exit(1);
    }
}
