//! Obstacle kinds, motion patterns, and collision effects
//!
//! Each kind pairs one motion pattern (stationary scroll, sine oscillation,
//! growth) with exactly one collision effect (crash or timed slow-down). The
//! effect goes through the player's public mutators only.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::player::Player;
use crate::consts::GROUND_Y;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Small, oscillates vertically; slide under it or jump past
    Bug,
    /// Large blocker; strong timed slow-down, consumed on contact
    MergeConflict,
    /// Wide and short; weak timed slow-down, consumed on contact
    Meeting,
    /// Tall, keeps growing until capped
    TechnicalDebt,
}

impl ObstacleKind {
    pub fn base_size(&self, tuning: &Tuning) -> Vec2 {
        let [w, h] = match self {
            ObstacleKind::Bug => tuning.bug_size,
            ObstacleKind::MergeConflict => tuning.merge_conflict_size,
            ObstacleKind::Meeting => tuning.meeting_size,
            ObstacleKind::TechnicalDebt => tuning.technical_debt_size,
        };
        Vec2::new(w, h)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub body: Body,
    pub kind: ObstacleKind,
    /// Oscillation phase (Bug only), randomized at spawn
    phase: f32,
    /// Oscillation center y (Bug only)
    anchor_y: f32,
    /// Growth factor (TechnicalDebt only)
    scale: f32,
    base_size: Vec2,
}

impl Obstacle {
    /// Spawn at the right edge of the play field, scrolling left at the
    /// current level speed
    pub fn spawn<R: Rng>(
        kind: ObstacleKind,
        x: f32,
        scroll_speed: f32,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Self {
        let size = kind.base_size(tuning);
        let (y, phase, anchor_y) = match kind {
            ObstacleKind::Bug => {
                let center = GROUND_Y - tuning.bug_fly_height;
                (center - size.y / 2.0, rng.random_range(0.0..TAU), center)
            }
            _ => (GROUND_Y - size.y, 0.0, 0.0),
        };
        let mut body = Body::new(Vec2::new(x, y), size, tuning.hitbox_inset);
        body.vel.x = -scroll_speed;
        Self {
            body,
            kind,
            phase,
            anchor_y,
            scale: 1.0,
            base_size: size,
        }
    }

    /// Keep scroll speed in step with the level's current speed
    pub fn set_scroll_speed(&mut self, speed: f32) {
        self.body.vel.x = -speed;
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        if !self.body.active {
            return;
        }
        self.body.update(dt);

        match self.kind {
            ObstacleKind::Bug => {
                self.phase += tuning.bug_frequency * dt;
                let center = self.anchor_y + self.phase.sin() * tuning.bug_amplitude;
                self.body.pos.y = center - self.body.size.y / 2.0;
            }
            ObstacleKind::TechnicalDebt => {
                self.scale = (self.scale + tuning.technical_debt_growth * dt)
                    .min(tuning.technical_debt_max_scale);
                self.body.size = self.base_size * self.scale;
                // Grow upward from the ground
                self.body.pos.y = GROUND_Y - self.body.size.y;
            }
            ObstacleKind::MergeConflict | ObstacleKind::Meeting => {}
        }

        if self.body.off_screen_left() {
            self.body.active = false;
        }
    }

    /// Apply this kind's effect to the player. Slow-down kinds consume
    /// themselves; crash kinds stay and let the player's own protection
    /// rules (invincibility, spare lives) decide the outcome.
    pub fn apply_effect(&mut self, player: &mut Player, tuning: &Tuning) {
        match self.kind {
            ObstacleKind::Bug | ObstacleKind::TechnicalDebt => {
                player.crash(tuning);
            }
            ObstacleKind::MergeConflict => {
                player.apply_speed_boost(
                    tuning.merge_conflict_slow,
                    tuning.merge_conflict_slow_duration,
                );
                self.body.active = false;
            }
            ObstacleKind::Meeting => {
                player.apply_speed_boost(tuning.meeting_slow, tuning.meeting_slow_duration);
                self.body.active = false;
            }
        }
    }
}
