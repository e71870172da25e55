//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, I/O, or platform dependencies

pub mod collectible;
pub mod entity;
pub mod level;
pub mod obstacle;
pub mod player;
pub mod state;
pub mod tick;

pub use collectible::{Collectible, CollectibleKind};
pub use entity::{Aabb, Body};
pub use level::{Deadline, Level, LevelOutcome, difficulty_at};
pub use obstacle::{Obstacle, ObstacleKind};
pub use player::{Collected, Player, PlayerState};
pub use state::{GamePhase, RunState};
pub use tick::{TickInput, tick};
