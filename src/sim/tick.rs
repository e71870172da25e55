//! Fixed timestep simulation tick
//!
//! One call advances the whole simulation by `dt`: input application, player
//! physics, level update, end-of-run detection. Deterministic for a given
//! (seed, input sequence); no I/O happens in here.

use super::obstacle::ObstacleKind;
use super::state::{GamePhase, RunState};
use crate::tuning::Tuning;

/// Normalized input for a single tick. The caller (input source) has already
/// mapped keys/touch zones and detected double presses.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub jump: bool,
    pub slide_start: bool,
    pub slide_end: bool,
    /// Pause toggle
    pub pause: bool,
    /// Restart the run from any phase
    pub restart: bool,
    /// Demo mode: the game plays itself
    pub autopilot: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut RunState, input: &TickInput, dt: f32, tuning: &Tuning) {
    if input.restart {
        state.restart(tuning);
        state.phase = GamePhase::Playing;
        return;
    }

    match state.phase {
        GamePhase::Ready => {
            // First jump input doubles as "start"
            if input.jump {
                state.phase = GamePhase::Playing;
            } else {
                return;
            }
        }
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
            }
            // Timers stay frozen for this tick either way
            return;
        }
        GamePhase::GameOver => return,
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                return;
            }
        }
    }

    let mut input = input.clone();
    if input.autopilot {
        drive_autopilot(state, &mut input, tuning);
    }

    if input.jump {
        state.player.request_jump(tuning);
    }
    if input.slide_start {
        state.player.start_slide(tuning);
    }
    if input.slide_end {
        state.player.end_slide(tuning);
    }

    state.player.update(dt, tuning);
    let outcome = state
        .level
        .update(dt, &mut state.player, &mut state.rng, tuning);
    state.time_ticks += 1;

    if outcome.deadline_caught {
        log::info!(
            "deadline caught the player at distance {:.0}, score {}",
            state.level.distance,
            state.player.score()
        );
        state.phase = GamePhase::GameOver;
    } else if state.player.fallen_off() {
        log::info!(
            "player fell after crashing, score {}",
            state.player.score()
        );
        state.phase = GamePhase::GameOver;
    }
}

/// Demo-mode reactions: slide under flying bugs, hop over ground obstacles.
/// Jumps late (short gap) so the arc clears wide obstacles, and only from
/// the ground so the double jump is not wasted on ascent.
fn drive_autopilot(state: &RunState, input: &mut TickInput, _tuning: &Tuning) {
    let player_front = state.player.body.pos.x + state.player.body.size.x;
    let threat = state
        .level
        .obstacles
        .iter()
        .filter(|o| o.body.active && o.body.pos.x + o.body.size.x > player_front)
        .min_by(|a, b| a.body.pos.x.total_cmp(&b.body.pos.x));

    match threat {
        Some(o) if o.kind == ObstacleKind::Bug && o.body.pos.x - player_front < 160.0 => {
            input.slide_start = true;
            input.jump = false;
        }
        Some(o) if o.body.pos.x - player_front < 60.0 => {
            input.slide_end = true;
            if !state.player.is_airborne() {
                input.jump = true;
            }
        }
        _ => {
            input.slide_end = true;
        }
    }
}
