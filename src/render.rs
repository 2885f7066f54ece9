//! Read-only projection of the simulation into 2D draw primitives
//!
//! The shell draws a `Frame` with whatever surface it has (Canvas2D on the
//! web). Capturing a frame never feeds back into the simulation.

use crate::consts::*;
use crate::sim::{GamePhase, GameState};

/// Palette (event site theme)
pub mod colors {
    pub const SKY_TOP: &str = "#1e3a8a";
    pub const SKY_BOTTOM: &str = "#0f172a";
    pub const DROP: &str = "#22d3ee";
    pub const DROP_HIGHLIGHT: &str = "#60a5fa";
    pub const BUCKET_BODY: &str = "#f472b6";
    pub const BUCKET_RIM: &str = "#e879f9";
    pub const HUD_TEXT: &str = "#ffffff";
}

/// Axis-aligned rectangle in playfield pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// One falling drop: an ellipse plus a small specular highlight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropSprite {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
    pub highlight_x: f32,
    pub highlight_y: f32,
}

/// One splash particle square with fade-out alpha
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSprite {
    pub x: f32,
    pub y: f32,
    pub alpha: f32,
}

/// A line of HUD text, centered at (x, y)
#[derive(Debug, Clone, PartialEq)]
pub struct HudLine {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Full-screen prompt drawn over the playfield
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    PressStart,
    Paused,
    GameOver,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub drops: Vec<DropSprite>,
    pub particles: Vec<ParticleSprite>,
    pub bucket_body: Rect,
    pub bucket_rim: Rect,
    pub hud: Vec<HudLine>,
    pub overlay: Option<Overlay>,
}

impl Frame {
    /// Snapshot the current state. Read-only by construction.
    pub fn capture(state: &GameState) -> Self {
        let drops = state
            .drops
            .iter()
            .map(|d| {
                let size = d.size.diameter();
                DropSprite {
                    cx: d.pos.x + size / 2.0,
                    cy: d.pos.y + size / 2.0,
                    rx: size / 2.0,
                    ry: size * 0.8,
                    highlight_x: d.pos.x + size / 4.0,
                    highlight_y: d.pos.y + size / 4.0,
                }
            })
            .collect();

        let particles = state
            .particles
            .iter()
            .map(|p| ParticleSprite {
                x: p.pos.x,
                y: p.pos.y,
                alpha: p.alpha(),
            })
            .collect();

        let catcher = &state.catcher;
        let bucket_body = Rect {
            x: catcher.x - catcher.half_width(),
            y: PLAYFIELD_HEIGHT - 30.0,
            w: catcher.width,
            h: 20.0,
        };
        let bucket_rim = Rect {
            x: catcher.x - catcher.half_width() - 5.0,
            y: PLAYFIELD_HEIGHT - 35.0,
            w: catcher.width + 10.0,
            h: 5.0,
        };

        let hud_x = PLAYFIELD_WIDTH / 2.0;
        let hud = vec![
            HudLine { text: format!("Score: {}", state.score), x: hud_x, y: 30.0 },
            HudLine { text: format!("Lives: {}", state.lives), x: hud_x, y: 50.0 },
            HudLine { text: format!("Level: {}", state.level), x: hud_x, y: 70.0 },
        ];

        let overlay = match state.phase {
            GamePhase::Idle => Some(Overlay::PressStart),
            GamePhase::Paused => Some(Overlay::Paused),
            GamePhase::GameOver => Some(Overlay::GameOver),
            GamePhase::Running => None,
        };

        Self {
            drops,
            particles,
            bucket_body,
            bucket_rim,
            hud,
            overlay,
        }
    }
}
