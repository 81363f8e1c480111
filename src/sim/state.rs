//! Game state definitions
//!
//! The `Game` aggregate owns every automaton plus the audio service and the
//! score store it was built with. The per-frame update lives in `tick.rs`,
//! band drawing in `draw.rs`.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::avatar::Avatar;
use super::fruit::Fruit;
use super::lanes::EnemyLanes;
use super::score::Score;
use crate::Frame;
use crate::audio::AudioService;
use crate::consts::FRAME_RATE;
use crate::persistence::{ScoreStore, Slot};

/// Failures allowed before game-over
pub const LIVES: u8 = 3;
/// Cage pieces to unlock per round
pub const CAGE_PARTS: u8 = 4;
/// Fastest metronome (frames per beat)
pub const MIN_TICK: u32 = 8;
/// Slowest metronome, used in Demo and for game A
pub const DEFAULT_TICK: u32 = FRAME_RATE;
/// Boot lasts until the frame counter passes this
pub const BOOT_FRAMES: Frame = FRAME_RATE as Frame;
/// Demo counter switches what it shows this often
pub const SCORE_ROLL_FRAMES: Frame = 4 * FRAME_RATE as Frame;

/// Unlock reward bounds (points)
pub const MIN_UNLOCK_REWARD: u32 = 5;
pub const MAX_UNLOCK_REWARD: u32 = 20;
/// Unlock time window (frames since the last return to origin)
pub const MIN_TIME_TO_UNLOCK: Frame = 150;
pub const MAX_TIME_TO_UNLOCK: Frame = 250;

/// Key swing animation: sprite index per step
pub const KEY_FRAMES: [usize; 7] = [0, 1, 2, 3, 3, 2, 1];

/// Failure cue repeat (bites and falls)
pub const FAILURE_REPEATS: u8 = 5;
pub const FAILURE_REPEAT_DELAY: u8 = 8;

/// Console mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// LCD warm-up
    #[default]
    Boot,
    /// Attract mode
    Demo,
    Playing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameType {
    #[default]
    A,
    B,
}

impl GameType {
    /// Metronome at the start of a game
    pub fn initial_tick(self) -> u32 {
        match self {
            GameType::A => DEFAULT_TICK,
            GameType::B => 3 * FRAME_RATE / 5,
        }
    }

    /// Metronome speed-up per freed captive
    pub fn tick_step(self) -> u32 {
        match self {
            GameType::A => 2,
            GameType::B => 1,
        }
    }

    /// Store slot holding this type's best score
    pub fn best_slot(self) -> Slot {
        match self {
            GameType::A => Slot::BestA,
            GameType::B => Slot::BestB,
        }
    }
}

/// Which score the counter shows (rolls during Demo)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ScoreShown {
    #[default]
    Current,
    BestA,
    BestB,
}

impl ScoreShown {
    pub fn next(self) -> Self {
        match self {
            ScoreShown::Current => ScoreShown::BestA,
            ScoreShown::BestA => ScoreShown::BestB,
            ScoreShown::BestB => ScoreShown::Current,
        }
    }
}

/// What the counter displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CounterDisplay {
    #[default]
    Score,
    /// Current metronome in frames per beat
    Tempo,
}

impl CounterDisplay {
    pub fn toggled(self) -> Self {
        match self {
            CounterDisplay::Score => CounterDisplay::Tempo,
            CounterDisplay::Tempo => CounterDisplay::Score,
        }
    }
}

/// Unlock reward for an attempt that took `elapsed` frames: the full reward
/// up to the fast threshold, the minimum past the slow one, linear between.
pub fn unlock_reward(elapsed: Frame) -> u32 {
    if elapsed < MIN_TIME_TO_UNLOCK {
        MAX_UNLOCK_REWARD
    } else if elapsed > MAX_TIME_TO_UNLOCK {
        MIN_UNLOCK_REWARD
    } else {
        let span = (MAX_UNLOCK_REWARD - MIN_UNLOCK_REWARD) as Frame;
        let drop = span * (elapsed - MIN_TIME_TO_UNLOCK) / (MAX_TIME_TO_UNLOCK - MIN_TIME_TO_UNLOCK);
        MAX_UNLOCK_REWARD - drop as u32
    }
}

/// The console: every automaton plus the injected services
pub struct Game<A: AudioService, S: ScoreStore> {
    pub(crate) mode: GameMode,
    pub(crate) game_type: GameType,
    pub(crate) counter: CounterDisplay,
    pub(crate) shown: ScoreShown,
    /// Frame of the last counter roll in Demo
    pub(crate) roll_timer: Frame,
    /// Latest frame handed to `tick`
    pub(crate) now: Frame,

    /// Frames per metronome beat
    pub(crate) tick: u32,
    pub(crate) key_index: usize,
    pub(crate) misses: u8,
    pub(crate) unlocked: u8,
    /// Current failure episode already counted
    pub(crate) miss_counted: bool,

    pub(crate) avatar: Avatar,
    pub(crate) lanes: EnemyLanes,
    pub(crate) fruit: Fruit,
    pub(crate) score: Score,

    pub(crate) rng: Pcg32,
    pub(crate) audio: A,
    pub(crate) store: S,
}

impl<A: AudioService, S: ScoreStore> Game<A, S> {
    /// Game with an entropy-seeded random source
    pub fn new(audio: A, store: S) -> Self {
        Self::with_seed(rand::random(), audio, store)
    }

    /// Game with a fixed seed (tests, headless runs)
    pub fn with_seed(seed: u64, audio: A, store: S) -> Self {
        let score = Score::load(&store);
        log::info!(
            "Console on: last {} / best A {} / best B {}",
            score.value(),
            score.high_a(),
            score.high_b()
        );
        Self {
            mode: GameMode::Boot,
            game_type: GameType::A,
            counter: CounterDisplay::Score,
            shown: ScoreShown::Current,
            roll_timer: 0,
            now: 0,
            tick: DEFAULT_TICK,
            key_index: 1,
            misses: LIVES,
            unlocked: 0,
            miss_counted: false,
            avatar: Avatar::new(0),
            lanes: EnemyLanes::new(),
            fruit: Fruit::new(),
            score,
            rng: Pcg32::seed_from_u64(seed),
            audio,
            store,
        }
    }

    /// Launch a new game of the given type
    pub fn start_game(&mut self, game_type: GameType, now: Frame) {
        self.game_type = game_type;
        self.mode = GameMode::Playing;
        self.shown = ScoreShown::Current;

        self.tick = game_type.initial_tick();
        self.misses = 0;
        self.unlocked = 0;
        self.miss_counted = false;

        self.score.reset();
        self.lanes.reset();
        self.avatar.reset_to_origin(now);
        self.fruit.reset();

        log::info!("Game {:?} started (tick {})", game_type, self.tick);
    }

    /// End the current game: persist the scores and fall back to Demo
    pub fn stop_game(&mut self, now: Frame) {
        self.mode = GameMode::Demo;
        self.roll_timer = now;
        self.tick = DEFAULT_TICK;

        self.score.save(self.game_type.best_slot(), &mut self.store);
        if let Err(e) = self.store.flush() {
            log::warn!("Failed to save scores: {}", e);
        }

        log::info!(
            "Game {:?} over with {} points (best {})",
            self.game_type,
            self.score.value(),
            self.score.best(self.game_type.best_slot())
        );
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn game_type(&self) -> GameType {
        self.game_type
    }

    pub fn counter_display(&self) -> CounterDisplay {
        self.counter
    }

    pub fn score_shown(&self) -> ScoreShown {
        self.shown
    }

    pub fn tick_interval(&self) -> u32 {
        self.tick
    }

    pub fn key_index(&self) -> usize {
        self.key_index
    }

    /// Sprite index of the swinging key
    pub fn key_frame(&self) -> usize {
        KEY_FRAMES[self.key_index % KEY_FRAMES.len()]
    }

    pub fn misses(&self) -> u8 {
        self.misses
    }

    pub fn unlocked_parts(&self) -> u8 {
        self.unlocked
    }

    pub fn avatar(&self) -> &Avatar {
        &self.avatar
    }

    pub fn lanes(&self) -> &EnemyLanes {
        &self.lanes
    }

    pub fn fruit(&self) -> &Fruit {
        &self.fruit
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Value on the counter right now
    pub fn counter_value(&self) -> u32 {
        match self.counter {
            CounterDisplay::Tempo => self.tick,
            CounterDisplay::Score => match self.shown {
                ScoreShown::Current => self.score.value(),
                ScoreShown::BestA => self.score.high_a(),
                ScoreShown::BestB => self.score.high_b(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Buzzer;
    use crate::persistence::{MemoryStore, SaveSlots};

    #[test]
    fn test_unlock_reward_bounds() {
        assert_eq!(unlock_reward(0), MAX_UNLOCK_REWARD);
        assert_eq!(unlock_reward(149), MAX_UNLOCK_REWARD);
        assert_eq!(unlock_reward(150), MAX_UNLOCK_REWARD);
        assert_eq!(unlock_reward(250), MIN_UNLOCK_REWARD);
        assert_eq!(unlock_reward(251), MIN_UNLOCK_REWARD);
        assert_eq!(unlock_reward(10_000), MIN_UNLOCK_REWARD);
    }

    #[test]
    fn test_unlock_reward_interpolates_with_floored_drop() {
        // 20 - floor(15 * 50 / 100) = 20 - 7
        assert_eq!(unlock_reward(200), 13);
        assert_eq!(unlock_reward(170), 17);
        assert_eq!(unlock_reward(249), 6);
    }

    #[test]
    fn test_game_types() {
        assert_eq!(GameType::A.initial_tick(), 25);
        assert_eq!(GameType::B.initial_tick(), 15);
        assert_eq!(GameType::A.best_slot(), Slot::BestA);
        assert_eq!(GameType::B.tick_step(), 1);
    }

    #[test]
    fn test_new_game_boots_with_full_miss_row() {
        let store = MemoryStore::new(SaveSlots {
            current: 12,
            best_a: 80,
            best_b: 40,
        });
        let game = Game::with_seed(1, Buzzer::default(), store);
        assert_eq!(game.mode(), GameMode::Boot);
        assert_eq!(game.misses(), LIVES);
        assert_eq!(game.tick_interval(), DEFAULT_TICK);
        assert_eq!(game.key_frame(), 1);
        assert_eq!(game.score().value(), 12);
        assert_eq!(game.score().high_a(), 80);
        assert_eq!(game.counter_value(), 12);
    }

    #[test]
    fn test_start_and_stop_persist_best() {
        let mut game = Game::with_seed(1, Buzzer::default(), MemoryStore::default());
        game.start_game(GameType::B, 30);
        assert_eq!(game.mode(), GameMode::Playing);
        assert_eq!(game.tick_interval(), 15);
        assert_eq!(game.misses(), 0);

        game.score.inc(1, &mut game.audio);
        game.score.inc(1, &mut game.audio);
        game.stop_game(400);
        assert_eq!(game.mode(), GameMode::Demo);
        assert_eq!(game.tick_interval(), DEFAULT_TICK);
        assert_eq!(game.store().get(Slot::Current), 2);
        assert_eq!(game.store().get(Slot::BestB), 2);
        assert_eq!(game.store().get(Slot::BestA), 0);
        assert_eq!(game.store().flushes(), 1);
    }
}
