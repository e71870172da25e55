//! Data-driven game balance
//!
//! Every gameplay number lives here rather than in code. The defaults are the
//! shipped rule set; a partial JSON file can override any subset of fields.

use serde::{Deserialize, Serialize};

/// Gameplay tuning parameters
///
/// Durations are in seconds, distances and sizes in world units, speeds in
/// units per second. Positive y points down, so jump impulses are negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player physics ===
    /// Upward velocity applied on a first jump
    pub jump_impulse: f32,
    /// Upward velocity applied on a double jump (smaller magnitude)
    pub double_jump_impulse: f32,
    /// Downward acceleration while airborne
    pub gravity: f32,
    /// Grace window after leaving the ground during which a jump still counts
    pub coyote_time: f32,
    /// Grace window before landing during which an early jump input is queued
    pub jump_buffer: f32,
    /// Standing hitbox
    pub player_width: f32,
    pub player_height: f32,
    /// Hitbox height while sliding
    pub slide_height: f32,
    /// Inset applied to every collision box (forgiving hitboxes)
    pub hitbox_inset: f32,

    // === Speed ===
    /// Forward scroll speed with no modifiers active
    pub base_speed: f32,
    /// Current speed never drops below this, however strong the slow
    pub min_speed: f32,

    // === Timed modifiers ===
    pub coffee_boost: f32,
    pub coffee_duration: f32,
    /// Extra deadline damping while a positive boost is active
    pub coffee_deadline_damp: f32,
    pub invincibility_duration: f32,
    /// Invincibility granted when a spare life absorbs a crash
    pub rescue_invincibility: f32,
    /// Visibility toggle rate while invincible (cosmetic)
    pub flicker_hz: f32,
    pub code_snippet_points: u64,
    pub meeting_slow: f32,
    pub meeting_slow_duration: f32,
    pub merge_conflict_slow: f32,
    pub merge_conflict_slow_duration: f32,

    // === Difficulty ramp ===
    /// Distance over which difficulty climbs from 1.0 to the ceiling
    pub ramp_distance: f32,
    /// Difficulty ceiling
    pub max_difficulty: f32,

    // === Grace period ===
    /// Initial window with suppressed obstacles and a damped deadline
    pub grace_period: f32,
    /// Linear transition band after the grace period
    pub grace_transition: f32,
    /// Obstacle spawn-frequency multiplier during the grace period
    pub grace_obstacle_freq: f32,
    /// Deadline pursuit multiplier during the grace period
    pub grace_deadline_damp: f32,

    // === Spawning ===
    pub obstacle_interval_min: f32,
    pub obstacle_interval_max: f32,
    pub collectible_interval_min: f32,
    pub collectible_interval_max: f32,
    pub max_obstacles: usize,
    pub max_collectibles: usize,
    /// Pattern-spawn probability at difficulty 1.0 and at the ceiling
    pub pattern_chance_base: f32,
    pub pattern_chance_max: f32,
    /// Weighted collectible distribution (coffee, stack overflow, git commit,
    /// code snippet); weights need not sum to anything particular
    pub collectible_weights: [u32; 4],

    // === Obstacles ===
    pub bug_size: [f32; 2],
    /// Height of the bug's oscillation center above the ground
    pub bug_fly_height: f32,
    pub bug_amplitude: f32,
    pub bug_frequency: f32,
    pub merge_conflict_size: [f32; 2],
    pub meeting_size: [f32; 2],
    pub technical_debt_size: [f32; 2],
    /// Growth per second and the capped size multiplier
    pub technical_debt_growth: f32,
    pub technical_debt_max_scale: f32,

    // === Collectibles ===
    pub collectible_size: f32,
    pub bob_amplitude: f32,
    pub bob_frequency: f32,
    pub pulse_scale: f32,
    pub pulse_frequency: f32,
    pub spin_rate: f32,

    // === Deadline ===
    /// Pursuit rate in proximity percent per second, before scaling
    pub deadline_rate: f32,
    /// Rate floor so the deadline never fully stalls
    pub deadline_min_rate: f32,
    /// Proximity percent at which the warning flag raises
    pub deadline_warning_percent: f32,

    // === Score ===
    /// Points per world unit traveled
    pub score_per_unit: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            jump_impulse: -620.0,
            double_jump_impulse: -480.0,
            gravity: 1800.0,
            coyote_time: 0.1,
            jump_buffer: 0.15,
            player_width: 40.0,
            player_height: 60.0,
            slide_height: 30.0,
            hitbox_inset: 4.0,

            base_speed: 300.0,
            min_speed: 60.0,

            coffee_boost: 250.0,
            coffee_duration: 8.0,
            coffee_deadline_damp: 0.5,
            invincibility_duration: 5.0,
            rescue_invincibility: 2.0,
            flicker_hz: 10.0,
            code_snippet_points: 100,
            meeting_slow: -80.0,
            meeting_slow_duration: 2.5,
            merge_conflict_slow: -150.0,
            merge_conflict_slow_duration: 4.0,

            ramp_distance: 10_000.0,
            max_difficulty: 2.5,

            grace_period: 5.0,
            grace_transition: 3.0,
            grace_obstacle_freq: 0.3,
            grace_deadline_damp: 0.1,

            obstacle_interval_min: 1.2,
            obstacle_interval_max: 2.6,
            collectible_interval_min: 0.9,
            collectible_interval_max: 2.0,
            max_obstacles: 3,
            max_collectibles: 5,
            pattern_chance_base: 0.15,
            pattern_chance_max: 0.45,
            collectible_weights: [45, 20, 15, 20],

            bug_size: [30.0, 24.0],
            bug_fly_height: 70.0,
            bug_amplitude: 20.0,
            bug_frequency: 2.0,
            merge_conflict_size: [50.0, 80.0],
            meeting_size: [90.0, 40.0],
            technical_debt_size: [40.0, 70.0],
            technical_debt_growth: 0.15,
            technical_debt_max_scale: 1.3,

            collectible_size: 24.0,
            bob_amplitude: 8.0,
            bob_frequency: 3.0,
            pulse_scale: 0.2,
            pulse_frequency: 4.0,
            spin_rate: 2.0,

            deadline_rate: 1.7,
            deadline_min_rate: 0.2,
            deadline_warning_percent: 70.0,

            score_per_unit: 0.1,
        }
    }
}

impl Tuning {
    /// Pattern-spawn probability for a given difficulty
    pub fn pattern_chance(&self, difficulty: f32) -> f32 {
        let t = ((difficulty - 1.0) / (self.max_difficulty - 1.0)).clamp(0.0, 1.0);
        self.pattern_chance_base + t * (self.pattern_chance_max - self.pattern_chance_base)
    }

    /// Load tuning overrides from a JSON file, falling back to defaults on
    /// any failure (missing file, parse error)
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from {}", path.display());
                    tuning
                }
                Err(e) => {
                    log::warn!("Bad tuning file {}: {e}, using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_chance_bounds() {
        let t = Tuning::default();
        assert!((t.pattern_chance(1.0) - t.pattern_chance_base).abs() < 1e-6);
        assert!((t.pattern_chance(t.max_difficulty) - t.pattern_chance_max).abs() < 1e-6);
        // Clamped outside the ramp
        assert!((t.pattern_chance(99.0) - t.pattern_chance_max).abs() < 1e-6);
    }

    #[test]
    fn test_partial_override_roundtrip() {
        let t: Tuning = serde_json::from_str(r#"{"base_speed": 500.0}"#).unwrap();
        assert_eq!(t.base_speed, 500.0);
        // Untouched fields keep their defaults
        assert_eq!(t.max_obstacles, Tuning::default().max_obstacles);
    }
}
