//! Kinetic Engine - physical substrate for a particle-life simulation.
//!
//! Layout:
//! - core/        - vector math and geometry
//! - domain/      - ids, body kinds, contacts
//! - spatial/     - uniform spatial hash
//! - systems/     - bodies, joints, physics backends
//! - simulation/  - the world and its tick
//! - api/         - WASM facade

pub mod core;
pub mod config;
pub mod error;
pub mod domain;
pub mod spatial;
pub mod systems;
pub mod simulation;
pub mod api;

use wasm_bindgen::prelude::*;

// Thread pool initialisation for rayon inside the browser.
#[cfg(all(target_arch = "wasm32", feature = "parallel"))]
pub use wasm_bindgen_rayon::init_thread_pool;

// Better error messages in debug mode
#[cfg(feature = "console_error_panic_hook")]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Initialize the engine
#[wasm_bindgen]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    set_panic_hook();

    web_sys::console::log_1(&"Kinetic WASM engine initialized".into());
}

/// Get engine version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

// Re-export main types
pub use api::wasm::World;
pub use config::PhysicsConfig;
pub use error::{KineticsError, KineticsResult};
pub use simulation::{PerfStats, PhysicsWorld, StepReport, WorldSnapshot};
pub use systems::backend::{KinematicBackend, KinematicBody, PhysicsBackend};
pub use systems::body::Particle;
pub use systems::joints::{JointKind, Joining, JointsManager};
