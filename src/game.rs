//! Frame-level game driver
//!
//! Bridges the presentation layer's animation callback to the fixed-step
//! simulation: accumulates real elapsed time, drains it in `SIM_DT` steps,
//! and hands results to injected collaborators. The collaborators are plain
//! traits; a missing one degrades to "don't do that part", never a panic.

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::sim::{Collected, GamePhase, RunState, TickInput, tick};
use crate::tuning::Tuning;

/// Normalized input events, already zone-mapped and debounced by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    JumpPressed,
    SlideStarted,
    SlideEnded,
    PauseToggled,
    RestartRequested,
}

/// Per-tick HUD payload; the presenter may throttle its own redraw
#[derive(Debug, Clone, PartialEq)]
pub struct HudFrame {
    pub score: u64,
    pub distance: f32,
    /// Remaining fraction of the active positive boost, 0..=100
    pub speed_boost_percent: f32,
    pub deadline_proximity_percent: f32,
    pub deadline_warning: bool,
    pub invincible_remaining: f32,
    pub spare_lives: u32,
    pub collected: Collected,
    pub phase: GamePhase,
}

/// Draws what it is told; nothing it returns affects the simulation
pub trait Renderer {
    fn draw(&mut self, state: &RunState);
}

/// Consumes the HUD payload once per frame
pub trait Presenter {
    fn present(&mut self, hud: &HudFrame);
}

/// High-score persistence, medium unspecified
pub trait ScoreStore {
    fn get_high_score(&self) -> u64;
    /// Returns true if the candidate replaced the stored value
    fn set_high_score(&mut self, candidate: u64) -> bool;
}

pub struct Game {
    tuning: Tuning,
    pub state: RunState,
    accumulator: f32,
    last_time_ms: Option<f64>,
    pending: TickInput,
    /// Demo mode: forwarded into every tick
    pub autopilot: bool,
    renderer: Option<Box<dyn Renderer>>,
    presenter: Option<Box<dyn Presenter>>,
    score_store: Option<Box<dyn ScoreStore>>,
    score_submitted: bool,
}

impl Game {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let state = RunState::new(seed, &tuning);
        Self {
            tuning,
            state,
            accumulator: 0.0,
            last_time_ms: None,
            pending: TickInput::default(),
            autopilot: false,
            renderer: None,
            presenter: None,
            score_store: None,
            score_submitted: false,
        }
    }

    pub fn with_renderer(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_presenter(mut self, presenter: Box<dyn Presenter>) -> Self {
        self.presenter = Some(presenter);
        self
    }

    pub fn with_score_store(mut self, store: Box<dyn ScoreStore>) -> Self {
        self.score_store = Some(store);
        self
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Queue a normalized input event; consumed by the next frame's ticks
    pub fn queue(&mut self, event: InputEvent) {
        match event {
            InputEvent::JumpPressed => self.pending.jump = true,
            InputEvent::SlideStarted => self.pending.slide_start = true,
            InputEvent::SlideEnded => self.pending.slide_end = true,
            InputEvent::PauseToggled => self.pending.pause = true,
            InputEvent::RestartRequested => self.pending.restart = true,
        }
    }

    /// Advance the simulation for one animation frame at `now_ms`.
    ///
    /// Returns the number of fixed steps executed.
    pub fn frame(&mut self, now_ms: f64) -> u32 {
        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time_ms = Some(now_ms);

        if self.state.phase == GamePhase::Paused {
            // Timers freeze; the baseline above is re-anchored every frame
            // so resuming does not produce a compensating jump
            self.accumulator = 0.0;
            // A queued pause toggle still needs to reach the sim
            if self.pending.pause || self.pending.restart {
                let input = self.take_input();
                tick(&mut self.state, &input, SIM_DT, &self.tuning);
            }
            self.publish();
            return 0;
        }

        // Clamp a single slow frame so it cannot snowball into a huge jump
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = self.take_input();
            tick(&mut self.state, &input, SIM_DT, &self.tuning);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        if self.state.phase == GamePhase::GameOver && !self.score_submitted {
            self.score_submitted = true;
            self.submit_score();
        }
        if self.state.phase != GamePhase::GameOver {
            self.score_submitted = false;
        }

        self.publish();
        substeps
    }

    /// Drain pending one-shot inputs into a tick input
    fn take_input(&mut self) -> TickInput {
        let mut input = std::mem::take(&mut self.pending);
        input.autopilot = self.autopilot;
        input
    }

    fn publish(&mut self) {
        if let Some(presenter) = self.presenter.as_mut() {
            let hud = build_hud(&self.state, &self.tuning);
            presenter.present(&hud);
        }
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.draw(&self.state);
        }
    }

    fn submit_score(&mut self) {
        let score = self.state.player.score();
        if let Some(store) = self.score_store.as_mut() {
            if store.set_high_score(score) {
                log::info!("new high score: {score}");
            } else {
                log::info!(
                    "run ended with {score}, high score remains {}",
                    store.get_high_score()
                );
            }
        }
    }

    pub fn hud(&self) -> HudFrame {
        build_hud(&self.state, &self.tuning)
    }
}

fn build_hud(state: &RunState, tuning: &Tuning) -> HudFrame {
    let player = &state.player;
    let boost_percent = if player.speed_boost > 0.0 && tuning.coffee_duration > 0.0 {
        (player.boost_remaining() / tuning.coffee_duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };
    HudFrame {
        score: player.score(),
        distance: state.level.distance,
        speed_boost_percent: boost_percent,
        deadline_proximity_percent: state.level.deadline.proximity_percent().min(100.0),
        deadline_warning: state.level.deadline.warning,
        invincible_remaining: player.invincible_remaining(),
        spare_lives: player.spare_lives,
        collected: player.collected,
        phase: state.phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingPresenter {
        last: Rc<RefCell<Option<HudFrame>>>,
    }

    impl Presenter for RecordingPresenter {
        fn present(&mut self, hud: &HudFrame) {
            *self.last.borrow_mut() = Some(hud.clone());
        }
    }

    struct MemoryStore {
        best: Rc<RefCell<u64>>,
    }

    impl ScoreStore for MemoryStore {
        fn get_high_score(&self) -> u64 {
            *self.best.borrow()
        }
        fn set_high_score(&mut self, candidate: u64) -> bool {
            if candidate > *self.best.borrow() {
                *self.best.borrow_mut() = candidate;
                return true;
            }
            false
        }
    }

    #[test]
    fn test_fixed_step_counts() {
        let mut game = Game::new(1, Tuning::default());
        game.queue(InputEvent::JumpPressed);
        // First frame establishes the baseline, no elapsed time
        assert_eq!(game.frame(0.0), 0);
        // 50 ms at 60 Hz is 3 full steps
        assert_eq!(game.frame(50.0), 3);
    }

    #[test]
    fn test_slow_frame_clamped() {
        let mut game = Game::new(1, Tuning::default());
        game.queue(InputEvent::JumpPressed);
        game.frame(0.0);
        // A 5-second hitch must not produce 300 steps
        let steps = game.frame(5000.0);
        assert!(steps <= crate::consts::MAX_SUBSTEPS);
    }

    #[test]
    fn test_pause_freezes_and_resume_does_not_jump() {
        let mut game = Game::new(1, Tuning::default());
        game.queue(InputEvent::JumpPressed);
        game.frame(0.0);
        game.frame(17.0);
        assert_eq!(game.state.phase, GamePhase::Playing);

        game.queue(InputEvent::PauseToggled);
        game.frame(34.0);
        assert_eq!(game.state.phase, GamePhase::Paused);

        let ticks = game.state.time_ticks;
        // A long wall-clock gap while paused
        assert_eq!(game.frame(10_000.0), 0);
        assert_eq!(game.state.time_ticks, ticks);

        // Resume; the baseline was re-anchored, so no burst of steps
        game.queue(InputEvent::PauseToggled);
        game.frame(10_017.0);
        assert_eq!(game.state.phase, GamePhase::Playing);
        let steps = game.frame(10_034.0);
        assert!(steps <= 2);
    }

    #[test]
    fn test_hud_published_to_presenter() {
        let last = Rc::new(RefCell::new(None));
        let mut game = Game::new(1, Tuning::default()).with_presenter(Box::new(
            RecordingPresenter { last: last.clone() },
        ));
        game.queue(InputEvent::JumpPressed);
        game.frame(0.0);
        game.frame(17.0);
        let hud = last.borrow().clone().expect("presenter saw a frame");
        assert_eq!(hud.phase, GamePhase::Playing);
        assert_eq!(hud.spare_lives, 0);
    }

    #[test]
    fn test_score_submitted_once_at_game_over() {
        let best = Rc::new(RefCell::new(0u64));
        let mut tuning = Tuning::default();
        tuning.deadline_rate = 5_000.0;
        let mut game =
            Game::new(1, tuning).with_score_store(Box::new(MemoryStore { best: best.clone() }));
        game.queue(InputEvent::JumpPressed);
        let mut now = 0.0;
        for _ in 0..600 {
            game.frame(now);
            now += 17.0;
            if game.state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(game.state.phase, GamePhase::GameOver);
        let recorded = *best.borrow();
        assert!(recorded > 0);

        // Further frames do not resubmit
        game.frame(now + 17.0);
        assert_eq!(*best.borrow(), recorded);
    }

    #[test]
    fn test_runs_without_any_collaborators() {
        // No renderer, presenter, or store: the loop must still tick
        let mut game = Game::new(1, Tuning::default());
        game.queue(InputEvent::JumpPressed);
        game.frame(0.0);
        for i in 1..100 {
            game.frame(i as f64 * 17.0);
        }
        assert!(game.state.time_ticks > 0);
    }

    #[test]
    fn test_restart_event_resets_run() {
        let mut game = Game::new(1, Tuning::default());
        game.queue(InputEvent::JumpPressed);
        game.frame(0.0);
        for i in 1..60 {
            game.frame(i as f64 * 17.0);
        }
        assert!(game.state.level.distance > 0.0);
        game.queue(InputEvent::RestartRequested);
        game.frame(60.0 * 17.0);
        assert_eq!(game.state.level.distance, 0.0);
    }
}
