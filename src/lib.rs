//! Deadline Dash - an endless-runner simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawning, collisions)
//! - `game`: Frame-level driver (fixed-step accumulator, collaborator traits)
//! - `tuning`: Data-driven game balance
//! - `highscores`: Leaderboard persistence

pub mod game;
pub mod highscores;
pub mod sim;
pub mod tuning;

pub use game::{Game, HudFrame, InputEvent, Presenter, Renderer, ScoreStore};
pub use highscores::{FileScoreStore, HighScores};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the accumulator will absorb (tab backgrounding, GC pause)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Play-field dimensions (world units, y grows downward)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 400.0;
    /// Ground line (the y coordinate entity feet rest on)
    pub const GROUND_Y: f32 = 340.0;
    /// A crashed player falling below this ends the run
    pub const FALL_OFF_Y: f32 = 600.0;
}

/// Count a timer down toward zero, never past it
#[inline]
pub fn tick_down(timer: f32, dt: f32) -> f32 {
    (timer - dt).max(0.0)
}
