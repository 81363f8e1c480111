//! Junior Watch entry point
//!
//! The browser build is driven from JavaScript through `platform::web`.
//! Natively this runs a headless session: the console boots, a game A is
//! started and played with random presses until it ends or the frame budget
//! runs out.
//!
//! Usage: `junior-watch [FRAMES] [SCORES.json] [SETTINGS.json]`

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use junior_watch::persistence::JsonFileStore;
    use junior_watch::platform::{Button, InputLatch};
    use junior_watch::sim::{Game, GameMode, GameType};
    use junior_watch::{AudioService, Buzzer, Frame, MemoryStore, ScoreStore, Settings};

    const DEFAULT_FRAMES: Frame = 25 * 60 * 5;
    /// Frames between two random presses
    const PRESS_EVERY: Frame = 6;
    const MOVES: [Button; 5] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Primary,
    ];

    pub fn run() {
        let mut args = std::env::args().skip(1);
        let frames = args
            .next()
            .and_then(|a| a.parse().ok())
            .unwrap_or(DEFAULT_FRAMES);
        let scores = args.next().map(PathBuf::from);
        let settings = args
            .next()
            .map(|p| Settings::load_from(&PathBuf::from(p)))
            .unwrap_or_default();

        let mut audio = Buzzer::default();
        audio.set_muted(settings.muted);
        let seed = rand::random();
        log::info!("Headless session: {} frames, seed {}", frames, seed);

        match scores {
            Some(path) => play(
                Game::with_seed(seed, audio, JsonFileStore::open(path)),
                frames,
                seed,
            ),
            None => play(
                Game::with_seed(seed, audio, MemoryStore::default()),
                frames,
                seed,
            ),
        }
    }

    fn play<A: AudioService, S: ScoreStore>(mut game: Game<A, S>, frames: Frame, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed ^ 0x5eed);
        let mut latch = InputLatch::default();
        let mut started = false;

        for frame in 1..=frames {
            latch.release_all();
            match game.mode() {
                GameMode::Demo if !started && frame > 50 => {
                    latch.press(Button::Primary);
                    started = true;
                }
                GameMode::Demo if started => break,
                GameMode::Playing if frame % PRESS_EVERY == 0 => {
                    latch.press(MOVES[rng.random_range(0..MOVES.len())]);
                }
                _ => {}
            }
            game.tick(frame, &latch.latch());
        }

        if game.mode() == GameMode::Playing {
            game.stop_game(frames);
        }

        let score = game.score();
        log::info!(
            "Session over: score {} / misses {} / cages {} / tempo {}",
            score.value(),
            game.misses(),
            game.unlocked_parts(),
            game.tick_interval()
        );
        println!(
            "score {}  best A {}  best B {}",
            score.value(),
            score.best(GameType::A.best_slot()),
            score.best(GameType::B.best_slot())
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Junior Watch (native) starting...");
    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}
