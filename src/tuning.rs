//! Data-driven game balance
//!
//! Every gameplay constant that is a balance choice rather than a geometric
//! fact lives here, so tests can run against known defaults and a tuned
//! build can ship different numbers without touching the sim.

use serde::{Deserialize, Serialize};

/// Spawn weights per drop size category. Need not sum to 1; they are
/// normalized when rolled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeWeights {
    pub small: f32,
    pub medium: f32,
    pub large: f32,
}

impl Default for SizeWeights {
    fn default() -> Self {
        // Large 30%, medium 42%, small 28%; small drops are the rarest
        // and worth the most.
        Self {
            small: 0.28,
            medium: 0.42,
            large: 0.30,
        }
    }
}

impl SizeWeights {
    pub fn total(&self) -> f32 {
        self.small + self.medium + self.large
    }
}

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Gravity per tick^2 (added to fall speed each tick)
    pub gravity: f32,
    /// Fall speed cap (pixels per tick)
    pub terminal_velocity: f32,
    /// Base spawn probability per tick
    pub spawn_base_rate: f32,
    /// Spawn rate grows by `1 + level * level_factor`
    pub level_factor: f32,
    /// Score divisor for level derivation (level = score / divisor + 1)
    pub score_per_level: u32,
    /// Spawn weighting per size category
    pub size_weights: SizeWeights,
    /// Point values per size (small drops are hardest to catch)
    pub points_small: u32,
    pub points_medium: u32,
    pub points_large: u32,
    /// Initial fall speed is drawn uniformly from this range (px/tick)
    pub initial_speed_min: f32,
    pub initial_speed_max: f32,
    /// Initial horizontal drift magnitude (uniform in +/- this value)
    pub initial_drift: f32,
    /// Per-tick drift perturbation magnitude (uniform in +/- half this value)
    pub drift_jitter: f32,
    /// Splash particles per unit of burst intensity
    pub particles_per_burst: u32,
    /// Particle lifetime in ticks
    pub particle_life: f32,
    /// Per-tick downward acceleration on particles
    pub particle_gravity: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.5,
            terminal_velocity: 8.0,
            spawn_base_rate: 0.02,
            level_factor: 0.1,
            score_per_level: 100,
            size_weights: SizeWeights::default(),
            points_small: 25,
            points_medium: 15,
            points_large: 10,
            initial_speed_min: 1.0,
            initial_speed_max: 3.0,
            initial_drift: 1.0,
            drift_jitter: 0.1,
            particles_per_burst: 8,
            particle_life: 30.0,
            particle_gravity: 0.3,
        }
    }
}

impl Tuning {
    /// Spawn probability for one tick at the given level
    pub fn spawn_chance(&self, level: u32) -> f32 {
        self.spawn_base_rate * (1.0 + level as f32 * self.level_factor)
    }
}
