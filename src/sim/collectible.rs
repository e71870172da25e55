//! Collectible kinds, idle animations, and pickup effects
//!
//! Collectibles scroll with the world, play a small idle animation, and are
//! always consumed on contact regardless of player state.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Body;
use super::player::Player;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Timed speed boost; also damps the deadline while the boost lasts
    Coffee,
    /// Timed invincibility
    StackOverflow,
    /// One spare life
    GitCommit,
    /// Flat point award
    CodeSnippet,
}

impl CollectibleKind {
    /// Weighted random pick using the configured distribution
    pub fn pick<R: Rng>(rng: &mut R, tuning: &Tuning) -> Self {
        let weights = tuning.collectible_weights;
        let total: u32 = weights.iter().sum();
        let mut roll = rng.random_range(0..total.max(1));
        for (kind, w) in [
            CollectibleKind::Coffee,
            CollectibleKind::StackOverflow,
            CollectibleKind::GitCommit,
            CollectibleKind::CodeSnippet,
        ]
        .into_iter()
        .zip(weights)
        {
            if roll < w {
                return kind;
            }
            roll -= w;
        }
        CollectibleKind::Coffee
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub body: Body,
    pub kind: CollectibleKind,
    /// Bob center for Coffee, unused otherwise
    anchor_y: f32,
    /// Idle animation phase, randomized at spawn
    phase: f32,
    /// Current rotation (GitCommit), radians
    pub spin: f32,
    /// Current pulse scale (StackOverflow), render-only
    pub scale: f32,
}

impl Collectible {
    /// Spawn at a world position, scrolling left at the current level speed
    pub fn spawn<R: Rng>(
        kind: CollectibleKind,
        pos: Vec2,
        scroll_speed: f32,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Self {
        let size = Vec2::splat(tuning.collectible_size);
        let mut body = Body::new(pos, size, tuning.hitbox_inset);
        body.vel.x = -scroll_speed;
        Self {
            body,
            kind,
            anchor_y: pos.y,
            phase: rng.random_range(0.0..TAU),
            spin: 0.0,
            scale: 1.0,
        }
    }

    pub fn set_scroll_speed(&mut self, speed: f32) {
        self.body.vel.x = -speed;
    }

    pub fn update(&mut self, dt: f32, tuning: &Tuning) {
        if !self.body.active {
            return;
        }
        self.body.update(dt);

        match self.kind {
            CollectibleKind::Coffee => {
                self.phase += tuning.bob_frequency * dt;
                self.body.pos.y = self.anchor_y + self.phase.sin() * tuning.bob_amplitude;
            }
            CollectibleKind::StackOverflow => {
                self.phase += tuning.pulse_frequency * dt;
                self.scale = 1.0 + self.phase.sin() * tuning.pulse_scale;
            }
            CollectibleKind::GitCommit => {
                self.spin = (self.spin + tuning.spin_rate * dt) % TAU;
            }
            CollectibleKind::CodeSnippet => {}
        }

        if self.body.off_screen_left() {
            self.body.active = false;
        }
    }

    /// Consume the collectible and apply its benefit
    pub fn apply_effect(&mut self, player: &mut Player, tuning: &Tuning) {
        self.body.active = false;
        match self.kind {
            CollectibleKind::Coffee => {
                player.apply_speed_boost(tuning.coffee_boost, tuning.coffee_duration);
                player.collected.coffee += 1;
            }
            CollectibleKind::StackOverflow => {
                player.grant_invincibility(tuning.invincibility_duration);
                player.collected.stack_overflow += 1;
            }
            CollectibleKind::GitCommit => {
                player.add_spare_life();
                player.collected.git_commit += 1;
            }
            CollectibleKind::CodeSnippet => {
                player.add_score(tuning.code_snippet_points as f64);
                player.collected.code_snippet += 1;
            }
        }
    }
}
