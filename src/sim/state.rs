//! Aggregate run state
//!
//! Everything one run owns: phase, tick counter, seeded RNG, player, level.
//! Deterministic for a given (seed, input sequence).

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::level::Level;
use super::player::Player;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first input
    Ready,
    /// Active gameplay
    Playing,
    /// Frozen; timers do not advance
    Paused,
    /// Run ended (crash-and-fall or deadline catch)
    GameOver,
}

fn default_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Spawn RNG; rebuilt from the seed on restart
    #[serde(skip, default = "default_rng")]
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub level: Level,
}

impl RunState {
    pub fn new(seed: u64, tuning: &Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let level = Level::new(&mut rng, tuning);
        Self {
            seed,
            rng,
            time_ticks: 0,
            phase: GamePhase::Ready,
            player: Player::new(tuning),
            level,
        }
    }

    /// Reset every counter, timer, and collection to its initial value.
    /// The same seed reproduces the same run.
    pub fn restart(&mut self, tuning: &Tuning) {
        log::info!(
            "restarting run (seed {}, previous score {})",
            self.seed,
            self.player.score()
        );
        *self = Self::new(self.seed, tuning);
    }
}
