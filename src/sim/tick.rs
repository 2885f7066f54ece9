//! Fixed timestep simulation tick
//!
//! Advances one discrete step per call, in a fixed order: physics, floor
//! boundary, catches, particles, spawn, level derivation, terminal check.
//! The shell turns elapsed wall time into whole steps via an accumulator.

use glam::Vec2;
use rand::Rng;

use crate::consts::*;

use super::collision::is_caught;
use super::state::{Drop, DropSize, GameEvent, GamePhase, GameState, Particle};
use crate::tuning::SizeWeights;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Absolute catcher target x (from keyboard step, pointer, or tilt)
    pub target_x: Option<f32>,
    /// Begin a fresh run (start button / space)
    pub start: bool,
    /// Toggle Running <-> Paused
    pub pause: bool,
    /// Clear everything back to Idle
    pub reset: bool,
    /// Attract mode - the bucket chases the lowest drop
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep.
///
/// Control flags are handled at the tick boundary; with no flags set and
/// phase != Running this is a guaranteed no-op.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.reset {
        state.reset();
        return;
    }
    if input.start {
        state.start();
    }
    if input.pause {
        state.toggle_pause();
    }
    if state.phase != GamePhase::Running {
        return;
    }

    state.time_ticks += 1;

    // Catcher input; autopilot only fills in when no real source did
    if let Some(x) = input.target_x {
        state.catcher.set_target(x);
    } else if input.autopilot {
        if let Some(x) = autopilot_target(state) {
            state.catcher.set_target(x);
        }
    }

    // 1. Physics: gravity up to terminal velocity, drift, wind wobble
    let gravity = state.tuning.gravity;
    let terminal = state.tuning.terminal_velocity;
    let jitter = state.tuning.drift_jitter;
    for drop in &mut state.drops {
        drop.fall_speed = (drop.fall_speed + gravity).min(terminal);
        drop.pos.x += drop.drift;
        drop.pos.y += drop.fall_speed;
        drop.drift += (state.rng.random::<f32>() - 0.5) * jitter;
    }

    // 2. Floor boundary: each miss costs one life, never touches score
    let floor_hits: Vec<(f32, f32)> = state
        .drops
        .iter()
        .filter(|d| d.past_floor())
        .map(|d| (d.pos.x, d.size.splash_intensity()))
        .collect();
    state.drops.retain(|d| !d.past_floor());
    for (x, intensity) in floor_hits {
        splash(state, x, PLAYFIELD_HEIGHT, intensity);
        state.lives = state.lives.saturating_sub(1);
        state.events.push(GameEvent::Missed);
    }

    // 3. Catches: every overlapping drop in the band, all in the same tick
    let catcher = state.catcher.clone();
    let mut caught_count = 0u32;
    let mut caught_points = 0u32;
    state.drops.retain(|d| {
        if is_caught(d, &catcher) {
            caught_count += 1;
            caught_points += d.points;
            false
        } else {
            true
        }
    });
    if caught_count > 0 {
        state.score += caught_points;
        for _ in 0..caught_count {
            splash(state, catcher.x, PLAYFIELD_HEIGHT - 20.0, 1.0);
        }
        state.events.push(GameEvent::Caught {
            count: caught_count,
            points: caught_points,
        });
    }

    // 4. Particles: ballistic with gravity, removed at end of life
    let particle_gravity = state.tuning.particle_gravity;
    for particle in &mut state.particles {
        particle.pos += particle.vel;
        particle.vel.y += particle_gravity;
        particle.life -= 1.0;
    }
    state.particles.retain(|p| p.life > 0.0);

    // 5. Spawn decision: rate scales with level
    let chance = state.tuning.spawn_chance(state.level);
    if state.rng.random::<f32>() < chance {
        spawn_drop(state);
    }

    // 6. Level derivation (never regresses within a run); a zeroed
    // score_per_level from a hand-edited config must not divide by zero
    let per_level = state.tuning.score_per_level.max(1);
    state.level = state.level.max(state.score / per_level + 1);

    // 7. Terminal check
    if state.lives == 0 {
        let new_record = state.score > state.high_score;
        if new_record {
            state.high_score = state.score;
        }
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver {
            score: state.score,
            new_record,
        });
    }
}

/// Spawn one drop at the top of the playfield: weighted size roll, random
/// horizontal position that keeps the whole drop in bounds, random initial
/// speed and drift.
pub fn spawn_drop(state: &mut GameState) {
    let size = roll_size(&mut state.rng, &state.tuning.size_weights);
    let diameter = size.diameter();
    let x = state.rng.random_range(0.0..(PLAYFIELD_WIDTH - diameter));
    let fall_speed = state
        .rng
        .random_range(state.tuning.initial_speed_min..state.tuning.initial_speed_max);
    let drift = (state.rng.random::<f32>() - 0.5) * 2.0 * state.tuning.initial_drift;
    let points = size.points(&state.tuning);
    let id = state.next_entity_id();
    state.drops.push(Drop {
        id,
        pos: Vec2::new(x, -diameter),
        size,
        fall_speed,
        drift,
        points,
    });
}

/// Roll a size category from the weight table
fn roll_size(rng: &mut rand_pcg::Pcg32, weights: &SizeWeights) -> DropSize {
    let roll = rng.random::<f32>() * weights.total();
    if roll < weights.large {
        DropSize::Large
    } else if roll < weights.large + weights.medium {
        DropSize::Medium
    } else {
        DropSize::Small
    }
}

/// Emit a splash burst. Intensity 1.0 is a catch splash; misses scale with
/// drop size.
fn splash(state: &mut GameState, x: f32, y: f32, intensity: f32) {
    let count = (intensity * state.tuning.particles_per_burst as f32) as u32;
    let life = state.tuning.particle_life;
    for _ in 0..count {
        let px = x + (state.rng.random::<f32>() - 0.5) * 20.0;
        let vx = (state.rng.random::<f32>() - 0.5) * 4.0;
        let vy = -state.rng.random::<f32>() * 6.0 - 2.0;
        state.particles.push(Particle {
            pos: Vec2::new(px, y),
            vel: Vec2::new(vx, vy),
            life,
            max_life: life,
        });
    }
}

/// Attract-mode target: chase the drop closest to the floor
fn autopilot_target(state: &GameState) -> Option<f32> {
    state
        .drops
        .iter()
        .max_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|d| d.pos.x + d.size.diameter() / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::STARTING_LIVES;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn running_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default(), 0);
        state.start();
        state.take_events();
        state
    }

    fn inject_drop(state: &mut GameState, x: f32, y: f32, size: DropSize) -> u32 {
        let points = size.points(&state.tuning);
        let id = state.next_entity_id();
        state.drops.push(Drop {
            id,
            pos: Vec2::new(x, y),
            size,
            fall_speed: 1.0,
            drift: 0.0,
            points,
        });
        id
    }

    #[test]
    fn test_tick_is_noop_while_idle() {
        let state = GameState::new(42, Tuning::default(), 123);
        let mut ticked = state.clone();
        for _ in 0..5 {
            tick(&mut ticked, &TickInput::default());
        }
        assert_eq!(state, ticked);
    }

    #[test]
    fn test_tick_is_noop_while_game_over() {
        let mut state = running_state(42);
        state.lives = 0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        state.take_events();
        let frozen = state.clone();
        for _ in 0..5 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(frozen, state);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut state = running_state(42);
        inject_drop(&mut state, 100.0, 50.0, DropSize::Medium);
        for _ in 0..20 {
            tick(&mut state, &TickInput::default());
        }
        tick(&mut state, &TickInput { pause: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Paused);

        let frozen = state.clone();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default());
        }
        assert_eq!(frozen, state);

        // Resume picks up where the run left off
        tick(&mut state, &TickInput { pause: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_fall_speed_capped_at_terminal_velocity() {
        let mut state = running_state(42);
        let id = inject_drop(&mut state, 100.0, -2000.0, DropSize::Large);
        let terminal = state.tuning.terminal_velocity;
        for _ in 0..100 {
            tick(&mut state, &TickInput::default());
            if let Some(d) = state.drops.iter().find(|d| d.id == id) {
                assert!(d.fall_speed <= terminal);
            }
        }
    }

    #[test]
    fn test_catch_scores_small_drop_points() {
        let mut state = running_state(42);
        // Spawn nothing this run so the ledger is exact
        state.tuning.spawn_base_rate = 0.0;
        let catcher_x = state.catcher.x;
        let id = inject_drop(
            &mut state,
            catcher_x - 4.0,
            PLAYFIELD_HEIGHT - 35.0,
            DropSize::Small,
        );
        let lives_before = state.lives;

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 25);
        assert_eq!(state.lives, lives_before);
        assert!(!state.drops.iter().any(|d| d.id == id));
        assert!(matches!(
            state.take_events().as_slice(),
            [GameEvent::Caught { count: 1, points: 25 }]
        ));
        // Catch splash spawned at the bucket
        assert!(!state.particles.is_empty());
    }

    #[test]
    fn test_simultaneous_catches_all_score() {
        let mut state = running_state(42);
        state.tuning.spawn_base_rate = 0.0;
        let x = state.catcher.x;
        inject_drop(&mut state, x - 10.0, PLAYFIELD_HEIGHT - 30.0, DropSize::Small);
        inject_drop(&mut state, x + 2.0, PLAYFIELD_HEIGHT - 25.0, DropSize::Large);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.score, 25 + 10);
        assert!(state.drops.is_empty());
    }

    #[test]
    fn test_miss_costs_life_not_score() {
        let mut state = running_state(42);
        state.tuning.spawn_base_rate = 0.0;
        state.score = 40;
        inject_drop(&mut state, 100.0, PLAYFIELD_HEIGHT + 50.0, DropSize::Medium);

        tick(&mut state, &TickInput::default());

        assert_eq!(state.lives, STARTING_LIVES - 1);
        assert_eq!(state.score, 40);
        assert!(state.drops.is_empty());
        assert!(state.events.contains(&GameEvent::Missed));
    }

    #[test]
    fn test_three_misses_end_the_run() {
        let mut state = running_state(42);
        state.tuning.spawn_base_rate = 0.0;
        for i in 0..3 {
            inject_drop(&mut state, 100.0, PLAYFIELD_HEIGHT + 50.0, DropSize::Small);
            tick(&mut state, &TickInput::default());
            assert_eq!(state.lives, STARTING_LIVES - 1 - i);
        }
        assert_eq!(state.lives, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(matches!(
            state.take_events().last(),
            Some(GameEvent::GameOver { new_record: false, .. })
        ));

        // Lives never go negative even if another miss were forced through
        state.lives = 0;
        assert_eq!(state.lives.saturating_sub(1), 0);
    }

    #[test]
    fn test_high_score_updates_only_on_strict_record() {
        // Equal score: no record
        let mut state = GameState::new(1, Tuning::default(), 100);
        state.start();
        state.tuning.spawn_base_rate = 0.0;
        state.score = 100;
        state.lives = 1;
        inject_drop(&mut state, 10.0, PLAYFIELD_HEIGHT + 50.0, DropSize::Small);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.high_score, 100);
        assert!(matches!(
            state.take_events().last(),
            Some(GameEvent::GameOver { new_record: false, .. })
        ));

        // Strictly greater: record
        let mut state = GameState::new(1, Tuning::default(), 100);
        state.start();
        state.tuning.spawn_base_rate = 0.0;
        state.score = 101;
        state.lives = 1;
        inject_drop(&mut state, 10.0, PLAYFIELD_HEIGHT + 50.0, DropSize::Small);
        tick(&mut state, &TickInput::default());
        assert_eq!(state.high_score, 101);
        assert!(matches!(
            state.take_events().last(),
            Some(GameEvent::GameOver { new_record: true, .. })
        ));
    }

    #[test]
    fn test_level_derived_from_score_and_monotonic() {
        let mut state = running_state(42);
        state.tuning.spawn_base_rate = 0.0;
        state.score = 250;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.level, 3);

        // Level never regresses even if score were rolled back
        state.score = 0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.level, 3);
    }

    #[test]
    fn test_zeroed_score_per_level_does_not_panic() {
        let tuning: Tuning = serde_json::from_str(r#"{"score_per_level": 0}"#).unwrap();
        let mut state = GameState::new(42, tuning, 0);
        state.start();
        state.take_events();
        state.score = 50;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.level, 51);
    }

    #[test]
    fn test_particles_expire() {
        let mut state = running_state(42);
        state.tuning.spawn_base_rate = 0.0;
        inject_drop(&mut state, 100.0, PLAYFIELD_HEIGHT + 50.0, DropSize::Large);
        tick(&mut state, &TickInput::default());
        assert!(!state.particles.is_empty());

        let life = state.tuning.particle_life as u32;
        for _ in 0..=life {
            tick(&mut state, &TickInput::default());
        }
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_determinism_same_seed_same_run() {
        let mut a = running_state(99999);
        let mut b = running_state(99999);
        // Force plenty of spawns
        a.tuning.spawn_base_rate = 0.5;
        b.tuning.spawn_base_rate = 0.5;

        let inputs = [
            TickInput { target_x: Some(120.0), ..Default::default() },
            TickInput::default(),
            TickInput { target_x: Some(700.0), ..Default::default() },
        ];
        for _ in 0..200 {
            for input in &inputs {
                tick(&mut a, input);
                tick(&mut b, input);
            }
        }
        assert_eq!(a, b);
        assert!(a.time_ticks > 0);
    }

    #[test]
    fn test_start_flag_restarts_from_game_over() {
        let mut state = running_state(42);
        state.lives = 0;
        tick(&mut state, &TickInput::default());
        assert_eq!(state.phase, GamePhase::GameOver);

        tick(&mut state, &TickInput { start: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
    }

    #[test]
    fn test_reset_flag_returns_to_idle() {
        let mut state = running_state(42);
        inject_drop(&mut state, 100.0, 50.0, DropSize::Small);
        tick(&mut state, &TickInput { reset: true, ..Default::default() });
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.drops.is_empty());
    }

    proptest! {
        #[test]
        fn prop_spawned_drops_stay_in_horizontal_bounds(seed in any::<u64>()) {
            let mut state = running_state(seed);
            for _ in 0..100 {
                spawn_drop(&mut state);
            }
            for drop in &state.drops {
                prop_assert!(drop.pos.x >= 0.0);
                prop_assert!(drop.pos.x + drop.size.diameter() <= PLAYFIELD_WIDTH);
            }
        }

        #[test]
        fn prop_catcher_always_clamped(target in -1.0e6f32..1.0e6f32, seed in any::<u64>()) {
            let mut state = running_state(seed);
            tick(&mut state, &TickInput { target_x: Some(target), ..Default::default() });
            let half = state.catcher.half_width();
            prop_assert!(state.catcher.x >= half);
            prop_assert!(state.catcher.x <= PLAYFIELD_WIDTH - half);
        }

        #[test]
        fn prop_terminal_velocity_holds_over_long_runs(seed in any::<u64>()) {
            let mut state = running_state(seed);
            state.tuning.spawn_base_rate = 0.5;
            for _ in 0..300 {
                tick(&mut state, &TickInput::default());
                let terminal = state.tuning.terminal_velocity;
                for drop in &state.drops {
                    prop_assert!(drop.fall_speed <= terminal);
                }
            }
        }
    }
}
