//! Waterdrop '88 - a catch-the-drops arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (falling-drop physics, catches, run state)
//! - `render`: Read-only projection of the sim into 2D draw primitives
//! - `highscore`: Persisted high score behind a key-value store trait
//! - `event_store`: RSVP/organization/stats collaborator store
//! - `tuning`: Data-driven game balance

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod event_store;
pub mod highscore;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscore::ScoreStore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Structural game constants (geometry and timing, not balance)
pub mod consts {
    /// Fixed simulation timestep (60 Hz; balance constants are per-tick)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions (pixels, y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Catcher (bucket) geometry
    pub const CATCHER_WIDTH: f32 = 60.0;
    /// Height of the catch band above the playfield floor
    pub const CATCH_BAND_HEIGHT: f32 = 40.0;

    /// Horizontal step per key press/repeat
    pub const KEYBOARD_STEP: f32 = 15.0;
    /// Device tilt is clamped to +/- this many degrees of gamma
    pub const TILT_MAX_DEGREES: f32 = 30.0;
}

/// Clamp a catcher x position so the full bucket stays on the playfield
#[inline]
pub fn clamp_catcher_x(x: f32, half_width: f32) -> f32 {
    x.clamp(half_width, consts::PLAYFIELD_WIDTH - half_width)
}
