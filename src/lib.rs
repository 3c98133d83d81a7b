//! O Juízo dos Céus - a 2D side-scrolling action game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, combat, enemy AI, checkpoints)
//! - `input`: Abstract intents merged from pluggable input backends
//! - `camera`: Letterboxed viewport scaling and horizontal follow camera
//! - `renderer`: Draw-list building and the WebGPU presentation pipeline
//! - `session`: Fixed-timestep host loop and outbound event dispatch
//! - `persistence`: Progress stores keyed by player identity
//! - `tuning`: Data-driven game balance

pub mod camera;
pub mod input;
pub mod narrative;
pub mod persistence;
pub mod progress;
pub mod renderer;
pub mod roster;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use progress::ProgressRecord;
pub use roster::{Character, CharacterId};
pub use session::{GameHooks, Session};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz; tuning values are expressed per tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Milliseconds covered by one tick
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed to the accumulator (tab switches, debugger stops)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Logical canvas resolution; everything is simulated and drawn in these units
    pub const CANVAS_WIDTH: f32 = 1200.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;
}

/// Convert a duration in milliseconds to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: f64) -> u32 {
    if ms <= 0.0 {
        0
    } else {
        (ms / consts::TICK_MS).ceil() as u32
    }
}
