//! Stock Jumper headless runner
//!
//! Loads a level from the data directory, plays a scripted run (hold right,
//! hop at a fixed cadence) and saves the resulting progress. A finished
//! level is sold into the score book.
//!
//! Usage: `stock-jumper <TICKER> [difficulty] [ticks] [seed]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Stock Jumper (headless) starting...");

    if let Err(e) = runner::run(std::env::args().skip(1).collect()) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The simulation is a library; there is no web front end
}

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use std::path::Path;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use stock_jumper::persistence::{Store, sell_level};
    use stock_jumper::sim::{GameEvent, Session, TickInput, TickOutcome, tick};
    use stock_jumper::{Difficulty, Settings, StoreError};

    const SETTINGS_FILE: &str = "settings.json";
    const DEFAULT_TICKS: u64 = 3600;
    /// Ticks between scripted hops
    const HOP_EVERY: u64 = 45;

    pub fn run(args: Vec<String>) -> Result<(), StoreError> {
        let Some(ticker) = args.first() else {
            eprintln!("usage: stock-jumper <TICKER> [difficulty] [ticks] [seed]");
            return Ok(());
        };

        let settings = Settings::load(Path::new(SETTINGS_FILE));
        let difficulty = match args.get(1) {
            Some(s) => Difficulty::from_str(s).unwrap_or_else(|| {
                log::warn!("Unknown difficulty {s:?}, using {}", settings.difficulty.as_str());
                settings.difficulty
            }),
            None => settings.difficulty,
        };
        let ticks = args
            .get(2)
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TICKS);
        let mut rng = match args.get(3).and_then(|s| s.parse::<u64>().ok()) {
            Some(seed) => Pcg32::seed_from_u64(seed),
            None => Pcg32::from_rng(&mut rand::rng()),
        };

        let store = Store::new(&settings.data_dir);
        let mut level = store.load_level(ticker)?;
        let mut book = store.load_score_book()?;
        let points = store.read_chart(&level, settings.chart_scale)?;

        let mut session = Session::load(
            &points,
            difficulty.config(),
            settings.tuning,
            &level.snapshot(difficulty),
            &mut rng,
        )?;
        level.max_x = session.terrain.max_x;
        level.max_y = session.terrain.max_y;

        let mut outcome = TickOutcome::Running;
        for t in 0..ticks {
            let input = TickInput {
                move_right: true,
                jump_pressed: t % HOP_EVERY == 0,
                escape_pressed: t + 1 == ticks,
                ..Default::default()
            };
            outcome = tick(&mut session, &input);

            for event in session.drain_events() {
                match event {
                    GameEvent::CheckpointReached { position, is_finish } => log::info!(
                        "tick {t}: {} at ({:.0}, {:.0})",
                        if is_finish { "finish" } else { "checkpoint" },
                        position.x,
                        position.y
                    ),
                    GameEvent::ScoreChanged(delta) => {
                        log::debug!("tick {t}: score {delta:+} -> {}", session.score)
                    }
                    GameEvent::Died => log::info!("tick {t}: died"),
                }
            }

            if outcome != TickOutcome::Running {
                break;
            }
        }

        level.record(difficulty, session.snapshot());
        if outcome == TickOutcome::Finished {
            // Finished runs are sold into the wallet
            sell_level(&mut level, &mut book, difficulty);
        }
        log::info!(
            "Run ended: {outcome:?}, level score {}, progress {}%, wallet {}",
            session.score,
            level.progress_percent(difficulty),
            book.get(difficulty)
        );

        store.save_level(&level)?;
        store.save_score_book(&book)?;
        Ok(())
    }
}
