//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{horizontal_overlap, in_catch_band, is_caught};
pub use state::{
    Catcher, Drop, DropSize, GameEvent, GamePhase, GameState, Particle, SoundCue, Waveform,
    STARTING_LIVES,
};
pub use tick::{spawn_drop, tick, TickInput};
