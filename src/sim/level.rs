//! Level director: spawning, difficulty ramp, and deadline pursuit
//!
//! Owns the live obstacle and collectible collections, the independent spawn
//! timers, the procedural difficulty curve, and the deadline that chases the
//! player. Reports deadline-catch as a boolean; acting on it is the game
//! loop's job.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collectible::{Collectible, CollectibleKind};
use super::obstacle::{Obstacle, ObstacleKind};
use super::player::Player;
use crate::consts::{FIELD_WIDTH, GROUND_Y};
use crate::tuning::Tuning;

/// Minimum horizontal gap between a new obstacle and the newest live one,
/// so a navigable path always exists
const MIN_OBSTACLE_GAP: f32 = 220.0;

/// The deadline as a proximity percentage: 0 at run start, the run is lost
/// at 100. Monotonically non-decreasing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Deadline {
    position: f32,
    pub warning: bool,
}

impl Deadline {
    pub fn proximity_percent(&self) -> f32 {
        self.position
    }

    pub fn caught(&self) -> bool {
        self.position >= 100.0
    }
}

/// Fixed multi-entity collectible formations (explicit offsets, not
/// generated, to guarantee fairness)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Formation {
    Row,
    Arc,
    Trail,
    Ring,
}

impl Formation {
    fn offsets(self) -> &'static [Vec2] {
        const ROW: &[Vec2] = &[
            Vec2::new(0.0, 0.0),
            Vec2::new(40.0, 0.0),
            Vec2::new(80.0, 0.0),
            Vec2::new(120.0, 0.0),
            Vec2::new(160.0, 0.0),
        ];
        const ARC: &[Vec2] = &[
            Vec2::new(0.0, 0.0),
            Vec2::new(45.0, -35.0),
            Vec2::new(90.0, -50.0),
            Vec2::new(135.0, -35.0),
            Vec2::new(180.0, 0.0),
        ];
        const TRAIL: &[Vec2] = &[
            Vec2::new(0.0, 0.0),
            Vec2::new(50.0, -30.0),
            Vec2::new(100.0, -60.0),
            Vec2::new(150.0, -90.0),
        ];
        const RING: &[Vec2] = &[
            Vec2::new(40.0, 0.0), // anchor center
            Vec2::new(40.0, -40.0),
            Vec2::new(75.0, -20.0),
            Vec2::new(75.0, 20.0),
            Vec2::new(40.0, 40.0),
            Vec2::new(5.0, 20.0),
            Vec2::new(5.0, -20.0),
        ];
        match self {
            Formation::Row => ROW,
            Formation::Arc => ARC,
            Formation::Trail => TRAIL,
            Formation::Ring => RING,
        }
    }
}

/// Outcome of one level tick
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelOutcome {
    pub deadline_caught: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub theme: String,
    /// World units traveled this run
    pub distance: f32,
    /// Wall-clock run time, drives the grace period
    pub elapsed: f32,
    obstacle_timer: f32,
    obstacle_interval: f32,
    collectible_timer: f32,
    collectible_interval: f32,
    pub deadline: Deadline,
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
}

/// Difficulty for a given distance: 1.0 at the start, saturating at the
/// configured ceiling once `ramp_distance` has been traveled
pub fn difficulty_at(distance: f32, tuning: &Tuning) -> f32 {
    let t = (distance / tuning.ramp_distance).min(1.0);
    1.0 + t * (tuning.max_difficulty - 1.0)
}

impl Level {
    pub fn new<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        Self {
            theme: "office".to_string(),
            distance: 0.0,
            elapsed: 0.0,
            obstacle_timer: 0.0,
            obstacle_interval: roll_interval(
                rng,
                tuning.obstacle_interval_min,
                tuning.obstacle_interval_max,
                1.0,
            ),
            collectible_timer: 0.0,
            collectible_interval: roll_interval(
                rng,
                tuning.collectible_interval_min,
                tuning.collectible_interval_max,
                1.0,
            ),
            deadline: Deadline::default(),
            obstacles: Vec::new(),
            collectibles: Vec::new(),
        }
    }

    pub fn difficulty(&self, tuning: &Tuning) -> f32 {
        difficulty_at(self.distance, tuning)
    }

    /// Obstacle-frequency multiplier: suppressed during the grace period,
    /// then ramping linearly to full effect
    fn obstacle_freq_factor(&self, tuning: &Tuning) -> f32 {
        grace_lerp(
            self.elapsed,
            tuning.grace_period,
            tuning.grace_transition,
            tuning.grace_obstacle_freq,
        )
    }

    /// Deadline-pursuit multiplier, heavily damped early on
    fn deadline_damp_factor(&self, tuning: &Tuning) -> f32 {
        grace_lerp(
            self.elapsed,
            tuning.grace_period,
            tuning.grace_transition,
            tuning.grace_deadline_damp,
        )
    }

    /// Advance the whole level by one timestep
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        player: &mut Player,
        rng: &mut R,
        tuning: &Tuning,
    ) -> LevelOutcome {
        // After a crash the world coasts: entities keep scrolling for the
        // fall animation, but distance, spawning, and the deadline freeze.
        let crashed = player.is_crashed();
        let speed = player.current_speed(tuning);

        if !crashed {
            self.elapsed += dt;
            let delta = speed * dt;
            self.distance += delta;
            player.add_score((delta * tuning.score_per_unit) as f64);

            self.run_spawners(dt, rng, tuning);
        }

        for obstacle in &mut self.obstacles {
            obstacle.set_scroll_speed(speed);
            obstacle.update(dt, tuning);
        }
        for collectible in &mut self.collectibles {
            collectible.set_scroll_speed(speed);
            collectible.update(dt, tuning);
        }

        if !crashed {
            self.collision_pass(player, tuning);
        }

        self.obstacles.retain(|o| o.body.active);
        self.collectibles.retain(|c| c.body.active);

        if !crashed {
            self.advance_deadline(dt, player, tuning);
        }

        LevelOutcome {
            deadline_caught: self.deadline.caught(),
        }
    }

    fn run_spawners<R: Rng>(&mut self, dt: f32, rng: &mut R, tuning: &Tuning) {
        let difficulty = self.difficulty(tuning);

        self.obstacle_timer += dt * self.obstacle_freq_factor(tuning);
        if self.obstacle_timer >= self.obstacle_interval {
            self.obstacle_timer = 0.0;
            self.obstacle_interval = roll_interval(
                rng,
                tuning.obstacle_interval_min,
                tuning.obstacle_interval_max,
                difficulty,
            );
            self.try_spawn_obstacle(rng, tuning);
        }

        self.collectible_timer += dt;
        if self.collectible_timer >= self.collectible_interval {
            self.collectible_timer = 0.0;
            self.collectible_interval = roll_interval(
                rng,
                tuning.collectible_interval_min,
                tuning.collectible_interval_max,
                difficulty,
            );
            self.spawn_collectibles(rng, tuning);
        }
    }

    fn try_spawn_obstacle<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) {
        if self.obstacles.len() >= tuning.max_obstacles {
            return;
        }
        // Keep a navigable gap behind the newest obstacle
        if self
            .obstacles
            .iter()
            .any(|o| o.body.pos.x > FIELD_WIDTH - MIN_OBSTACLE_GAP)
        {
            return;
        }
        let kind = match rng.random_range(0..4) {
            0 => ObstacleKind::Bug,
            1 => ObstacleKind::MergeConflict,
            2 => ObstacleKind::Meeting,
            _ => ObstacleKind::TechnicalDebt,
        };
        log::debug!("spawning obstacle {kind:?} at distance {:.0}", self.distance);
        self.obstacles.push(Obstacle::spawn(
            kind,
            FIELD_WIDTH,
            tuning.base_speed,
            rng,
            tuning,
        ));
    }

    fn spawn_collectibles<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) {
        let capacity = tuning.max_collectibles.saturating_sub(self.collectibles.len());
        if capacity == 0 {
            return;
        }

        let base_y = GROUND_Y - rng.random_range(40.0..160.0);
        let pattern_roll: f32 = rng.random_range(0.0..1.0);

        if pattern_roll < tuning.pattern_chance(self.difficulty(tuning)) {
            let formation = match rng.random_range(0..4) {
                0 => Formation::Row,
                1 => Formation::Arc,
                2 => Formation::Trail,
                _ => Formation::Ring,
            };
            let kind = CollectibleKind::pick(rng, tuning);
            log::debug!("spawning {formation:?} formation of {kind:?}");
            for offset in formation.offsets().iter().take(capacity) {
                let pos = Vec2::new(FIELD_WIDTH + offset.x, base_y + offset.y);
                self.collectibles
                    .push(Collectible::spawn(kind, pos, tuning.base_speed, rng, tuning));
            }
        } else {
            let kind = CollectibleKind::pick(rng, tuning);
            let pos = Vec2::new(FIELD_WIDTH, base_y);
            self.collectibles
                .push(Collectible::spawn(kind, pos, tuning.base_speed, rng, tuning));
        }
    }

    /// Test every live entity against the player and apply effects on hit
    fn collision_pass(&mut self, player: &mut Player, tuning: &Tuning) {
        for obstacle in &mut self.obstacles {
            if obstacle.body.collides_with(&player.body) {
                obstacle.apply_effect(player, tuning);
            }
        }
        for collectible in &mut self.collectibles {
            if collectible.body.collides_with(&player.body) {
                collectible.apply_effect(player, tuning);
            }
        }
    }

    fn advance_deadline(&mut self, dt: f32, player: &Player, tuning: &Tuning) {
        let speed = player.current_speed(tuning);
        // The deadline gains ground when the player is slow, loses ground
        // (advances slower, never retreats) when boosted
        let mut rate =
            tuning.deadline_rate * (tuning.base_speed / speed) * self.difficulty(tuning);
        rate *= self.deadline_damp_factor(tuning);
        if player.speed_boost > 0.0 {
            rate *= tuning.coffee_deadline_damp;
        }
        rate = rate.max(tuning.deadline_min_rate);

        self.deadline.position += rate * dt;
        if !self.deadline.warning && self.deadline.position >= tuning.deadline_warning_percent {
            self.deadline.warning = true;
            log::info!(
                "deadline warning at {:.1}%",
                self.deadline.position
            );
        }
    }
}

/// Roll a randomized spawn interval, shrunk by difficulty
fn roll_interval<R: Rng>(rng: &mut R, min: f32, max: f32, difficulty: f32) -> f32 {
    rng.random_range(min..max) / difficulty.max(1.0)
}

/// Interpolate a grace multiplier: `damped` during the grace window, rising
/// linearly to 1.0 across the transition band
fn grace_lerp(elapsed: f32, grace: f32, transition: f32, damped: f32) -> f32 {
    if elapsed <= grace {
        damped
    } else if elapsed >= grace + transition {
        1.0
    } else {
        let t = (elapsed - grace) / transition;
        damped + t * (1.0 - damped)
    }
}
