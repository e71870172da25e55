//! Headless demo entry point
//!
//! Runs the simulation under the autopilot with synthetic frame timestamps
//! and logs progress to the terminal. Useful for balance checks and for
//! watching a full run without a presentation layer attached.
//!
//! Usage: `deadline-dash [seed] [max_seconds]`

use std::path::PathBuf;

use deadline_dash::consts::SIM_DT;
use deadline_dash::sim::GamePhase;
use deadline_dash::{FileScoreStore, Game, HudFrame, Presenter, ScoreStore, Tuning};

/// Logs a HUD line every 300 world units (about once per second at base speed)
struct LogPresenter {
    last_logged: i64,
}

impl Presenter for LogPresenter {
    fn present(&mut self, hud: &HudFrame) {
        if hud.phase != GamePhase::Playing {
            return;
        }
        let milestone = (hud.distance / 300.0) as i64;
        if milestone != self.last_logged {
            self.last_logged = milestone;
            log::info!(
                "distance {:>6.0}  score {:>6}  deadline {:>5.1}%{}  lives {}",
                hud.distance,
                hud.score,
                hud.deadline_proximity_percent,
                if hud.deadline_warning { " (!)" } else { "" },
                hud.spare_lives,
            );
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| std::process::id() as u64);
    let max_seconds: f64 = args.next().and_then(|s| s.parse().ok()).unwrap_or(120.0);

    let tuning = Tuning::load_or_default(&PathBuf::from("tuning.json"));
    let store = FileScoreStore::open(PathBuf::from("highscores.json"));
    let previous_best = store.get_high_score();

    log::info!("starting demo run, seed {seed}, up to {max_seconds:.0} s");
    if previous_best > 0 {
        log::info!("high score to beat: {previous_best}");
    }

    let mut game = Game::new(seed, tuning)
        .with_presenter(Box::new(LogPresenter { last_logged: -1 }))
        .with_score_store(Box::new(store));
    game.autopilot = true;
    game.queue(deadline_dash::InputEvent::JumpPressed);

    // Synthetic 60 Hz frame clock
    let frame_ms = f64::from(SIM_DT) * 1000.0;
    let mut now_ms = 0.0;
    game.frame(now_ms);
    while game.state.phase != GamePhase::GameOver && now_ms < max_seconds * 1000.0 {
        now_ms += frame_ms;
        game.frame(now_ms);
    }

    let hud = game.hud();
    match game.state.phase {
        GamePhase::GameOver => log::info!(
            "run over at distance {:.0}, final score {}",
            hud.distance,
            hud.score
        ),
        _ => log::info!(
            "time limit reached, still running at distance {:.0}, score {}",
            hud.distance,
            hud.score
        ),
    }
}
