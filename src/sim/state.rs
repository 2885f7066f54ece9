//! Game state and core simulation types
//!
//! Everything a run needs to advance deterministically lives here.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::clamp_catcher_x;
use crate::consts::*;
use crate::tuning::Tuning;

/// Lives at the start of a run
pub const STARTING_LIVES: u8 = 3;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// No run in progress, waiting for start
    Idle,
    /// Active gameplay
    Running,
    /// Run frozen in place (rendering continues)
    Paused,
    /// Run ended, lives exhausted
    GameOver,
}

/// Drop size category, fixed at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropSize {
    Small,
    Medium,
    Large,
}

impl DropSize {
    /// Visual/hitbox diameter in pixels
    pub fn diameter(&self) -> f32 {
        match self {
            DropSize::Small => 8.0,
            DropSize::Medium => 12.0,
            DropSize::Large => 16.0,
        }
    }

    /// Point value (smaller drops are harder to catch, worth more)
    pub fn points(&self, tuning: &Tuning) -> u32 {
        match self {
            DropSize::Small => tuning.points_small,
            DropSize::Medium => tuning.points_medium,
            DropSize::Large => tuning.points_large,
        }
    }

    /// Splash burst intensity when this drop hits the floor
    pub fn splash_intensity(&self) -> f32 {
        self.diameter() / 8.0
    }
}

/// A falling drop. `pos` is the top-left of its bounding box, in canvas
/// coordinates (y grows downward).
#[derive(Debug, Clone, PartialEq)]
pub struct Drop {
    pub id: u32,
    pub pos: Vec2,
    pub size: DropSize,
    /// Vertical fall speed, px/tick, capped at terminal velocity
    pub fall_speed: f32,
    /// Horizontal drift, px/tick, perturbed each tick (wind wobble)
    pub drift: f32,
    pub points: u32,
}

impl Drop {
    /// True if the drop has fallen entirely past the playfield floor
    pub fn past_floor(&self) -> bool {
        self.pos.y > PLAYFIELD_HEIGHT + self.size.diameter()
    }
}

/// The player-controlled bucket
#[derive(Debug, Clone, PartialEq)]
pub struct Catcher {
    /// Horizontal center, always within [half_width, width - half_width]
    pub x: f32,
    pub width: f32,
}

impl Default for Catcher {
    fn default() -> Self {
        Self {
            x: PLAYFIELD_WIDTH / 2.0,
            width: CATCHER_WIDTH,
        }
    }
}

impl Catcher {
    pub fn half_width(&self) -> f32 {
        self.width / 2.0
    }

    /// Move toward an absolute x target. Out-of-range input is clamped,
    /// never rejected.
    pub fn set_target(&mut self, x: f32) {
        self.x = clamp_catcher_x(x, self.half_width());
    }
}

/// A splash particle. Purely cosmetic, but its lifecycle is part of the
/// simulation contract: removed exactly when `life` reaches zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: f32,
    pub max_life: f32,
}

impl Particle {
    /// Fade-out ratio in [0, 1] for rendering
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Oscillator waveform hint for the audio adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Square,
    Triangle,
    Sine,
}

/// Fire-and-forget sound hint emitted with a game event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub frequency: f32,
    pub duration: f32,
    pub waveform: Waveform,
}

/// Side-effect signals produced by the tick, drained by the shell
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A fresh run began
    Started,
    /// One or more drops caught in the same tick
    Caught { count: u32, points: u32 },
    /// A drop hit the floor and cost a life
    Missed,
    /// Lives exhausted; `new_record` when the run beat the stored high score
    GameOver { score: u32, new_record: bool },
}

impl GameEvent {
    /// Sound hint for this event; catch pitch rises with the combo count
    pub fn cue(&self) -> SoundCue {
        match self {
            GameEvent::Started => SoundCue {
                frequency: 440.0,
                duration: 0.15,
                waveform: Waveform::Sine,
            },
            GameEvent::Caught { count, .. } => SoundCue {
                frequency: 400.0 + *count as f32 * 100.0,
                duration: 0.2,
                waveform: Waveform::Triangle,
            },
            GameEvent::Missed => SoundCue {
                frequency: 150.0,
                duration: 0.1,
                waveform: Waveform::Square,
            },
            GameEvent::GameOver { .. } => SoundCue {
                frequency: 80.0,
                duration: 0.5,
                waveform: Waveform::Square,
            },
        }
    }
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG, the only source of randomness in the sim
    pub rng: Pcg32,
    /// Balance knobs, fixed for the session
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Monotonically non-decreasing while a run is alive
    pub score: u32,
    /// Best completed-run score, loaded once from the score store
    pub high_score: u32,
    /// Decremented on miss, never incremented, floors at 0
    pub lives: u8,
    /// Derived from score, never regresses within a run
    pub level: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub catcher: Catcher,
    pub drops: Vec<Drop>,
    pub particles: Vec<Particle>,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a new idle game state. `high_score` comes from the injected
    /// score store, read exactly once at construction.
    pub fn new(seed: u64, tuning: Tuning, high_score: u32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Idle,
            score: 0,
            high_score,
            lives: STARTING_LIVES,
            level: 1,
            time_ticks: 0,
            catcher: Catcher::default(),
            drops: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (unique within the session)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Begin a fresh run. Valid from any phase; the start button doubles
    /// as restart, abandoning a run in progress.
    pub fn start(&mut self) {
        self.score = 0;
        self.lives = STARTING_LIVES;
        self.level = 1;
        self.time_ticks = 0;
        self.drops.clear();
        self.particles.clear();
        self.events.clear();
        self.events.push(GameEvent::Started);
        self.catcher = Catcher::default();
        self.phase = GamePhase::Running;
    }

    /// Freeze the run; entities hold position but rendering continues
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Running {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Running;
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            _ => {}
        }
    }

    /// Clear all entities and return to Idle. High score is untouched.
    pub fn reset(&mut self) {
        self.drops.clear();
        self.particles.clear();
        self.events.clear();
        self.catcher = Catcher::default();
        self.phase = GamePhase::Idle;
    }

    /// Input adapter entry point: absolute catcher target, clamped.
    /// Safe to call between ticks from any input source.
    pub fn set_catcher_target(&mut self, x: f32) {
        self.catcher.set_target(x);
    }

    /// Drain events accumulated since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catcher_clamps_to_playfield() {
        let mut c = Catcher::default();
        c.set_target(-500.0);
        assert_eq!(c.x, c.half_width());
        c.set_target(5000.0);
        assert_eq!(c.x, PLAYFIELD_WIDTH - c.half_width());
        c.set_target(400.0);
        assert_eq!(c.x, 400.0);
    }

    #[test]
    fn test_start_resets_run_but_not_high_score() {
        let mut state = GameState::new(7, Tuning::default(), 900);
        state.start();
        state.score = 250;
        state.lives = 1;
        state.start();
        assert_eq!(state.score, 0);
        assert_eq!(state.lives, STARTING_LIVES);
        assert_eq!(state.level, 1);
        assert_eq!(state.high_score, 900);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.catcher.x, PLAYFIELD_WIDTH / 2.0);
    }

    #[test]
    fn test_pause_resume_round_trip() {
        let mut state = GameState::new(7, Tuning::default(), 0);
        state.start();
        state.pause();
        assert_eq!(state.phase, GamePhase::Paused);
        state.resume();
        assert_eq!(state.phase, GamePhase::Running);
        // Pause is a no-op outside Running
        state.reset();
        state.pause();
        assert_eq!(state.phase, GamePhase::Idle);
    }

    #[test]
    fn test_reset_preserves_high_score() {
        let mut state = GameState::new(7, Tuning::default(), 555);
        state.start();
        state.reset();
        assert_eq!(state.phase, GamePhase::Idle);
        assert!(state.drops.is_empty());
        assert!(state.particles.is_empty());
        assert_eq!(state.high_score, 555);
    }

    #[test]
    fn test_entity_ids_never_reused() {
        let mut state = GameState::new(7, Tuning::default(), 0);
        let a = state.next_entity_id();
        let b = state.next_entity_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_start_emits_cue_event() {
        let mut state = GameState::new(7, Tuning::default(), 0);
        state.start();
        assert_eq!(state.take_events(), vec![GameEvent::Started]);

        let cue = GameEvent::Started.cue();
        assert_eq!(cue.frequency, 440.0);
        assert_eq!(cue.waveform, Waveform::Sine);

        // Restart replaces any stale events rather than stacking them
        state.start();
        state.start();
        assert_eq!(state.take_events(), vec![GameEvent::Started]);
    }

    #[test]
    fn test_catch_cue_pitch_rises_with_count() {
        let one = GameEvent::Caught { count: 1, points: 25 }.cue();
        let three = GameEvent::Caught { count: 3, points: 50 }.cue();
        assert_eq!(one.frequency, 500.0);
        assert_eq!(three.frequency, 700.0);
        assert_eq!(one.waveform, Waveform::Triangle);
    }
}
