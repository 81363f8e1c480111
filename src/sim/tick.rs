//! Fixed timestep simulation tick
//!
//! One call per displayed frame. Input is handled first, then (outside Boot)
//! the avatar sequencing, key swing, fruit and enemy lanes run in that order,
//! and finally the score and the audio scheduler while a game is on.

use rand::Rng;

use super::avatar::{ArmState, Direction, FallState, Posture, PostureQuery};
use super::collision::cell_crossed;
use super::lanes::LaneKind;
use super::state::{
    BOOT_FRAMES, CAGE_PARTS, FAILURE_REPEAT_DELAY, FAILURE_REPEATS, Game, GameMode, GameType,
    KEY_FRAMES, LIVES, MAX_UNLOCK_REWARD, MIN_TICK, SCORE_ROLL_FRAMES, unlock_reward,
};
use crate::audio::{AudioService, Cue};
use crate::persistence::ScoreStore;
use crate::{Frame, on_beat};

/// Buttons pressed this frame (edge-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Jump / start game A
    pub primary: bool,
    /// Mute toggle / start game B
    pub secondary: bool,
    /// Counter display toggle
    pub menu: bool,
}

impl TickInput {
    pub fn any(&self) -> bool {
        self.left
            || self.right
            || self.up
            || self.down
            || self.primary
            || self.secondary
            || self.menu
    }
}

impl<A: AudioService, S: ScoreStore> Game<A, S> {
    /// Advance the console by one frame
    pub fn tick(&mut self, frame: Frame, input: &TickInput) {
        self.now = frame;

        match self.mode {
            GameMode::Boot => self.update_boot(frame),
            GameMode::Demo => {
                self.demo(frame);
                self.roll_score(frame);
                self.wait_for_start(input, frame);
            }
            GameMode::Playing => self.handle_moves(input, frame),
        }

        if input.secondary {
            let muted = !self.audio.is_muted();
            self.audio.set_muted(muted);
            log::info!("Sound {}", if muted { "off" } else { "on" });
        }

        if input.menu {
            self.counter = self.counter.toggled();
        }

        if self.mode == GameMode::Boot {
            return;
        }

        self.update_jumping(frame);
        self.update_unlocking(frame);
        self.update_falling(frame);
        self.update_key(frame);
        self.update_fruit(frame);
        self.update_creatures(frame);

        if self.mode == GameMode::Playing {
            self.score.tick(frame, &mut self.audio);
            self.audio.update(frame);
        }
    }

    fn update_boot(&mut self, frame: Frame) {
        if frame > BOOT_FRAMES {
            self.mode = GameMode::Demo;
            self.roll_timer = frame;
            log::info!("Boot complete, entering demo");
        }
    }

    /// Attract mode: one random step per beat
    fn demo(&mut self, frame: Frame) {
        if on_beat(frame, self.tick) {
            let direction = Direction::ALL[self.rng.random_range(0..Direction::ALL.len())];
            self.avatar.move_in(direction, frame);
        }
    }

    /// Cycle the counter between the last score and both bests
    fn roll_score(&mut self, frame: Frame) {
        if frame.saturating_sub(self.roll_timer) > SCORE_ROLL_FRAMES {
            self.shown = self.shown.next();
            self.roll_timer = frame;
        }
    }

    fn wait_for_start(&mut self, input: &TickInput, frame: Frame) {
        if input.primary {
            self.start_game(GameType::A, frame);
        } else if input.secondary {
            self.start_game(GameType::B, frame);
        }
    }

    /// Player control. Sideways moves into an enemy are refused and count as a bite.
    fn handle_moves(&mut self, input: &TickInput, frame: Frame) {
        if self.lanes.has_bitten() {
            return;
        }

        if self.avatar.posture() == Posture::Top4 && input.left && input.primary {
            self.avatar.attempt_grab_key(frame);
            self.audio.play(Cue::Move);
        }

        let posture = self.avatar.posture();
        if !posture.is_controllable() {
            return;
        }

        let direction = if input.left {
            Direction::Left
        } else if input.right {
            Direction::Right
        } else if input.up && posture == Posture::BottomJump6 {
            Direction::Up
        } else if input.primary && posture != Posture::BottomJump6 {
            Direction::Up
        } else if input.down && !self.avatar.is_jumping() {
            Direction::Down
        } else {
            return;
        };

        for kind in [LaneKind::Birds, LaneKind::Snapjaws] {
            let cell = cell_crossed(kind, posture, direction);
            if self
                .lanes
                .is_occupied_and_biting(kind, cell, frame, &mut self.audio)
            {
                log::debug!("Bitten stepping {:?} from {:?}", direction, posture);
                return;
            }
        }

        if self.avatar.move_in(direction, frame) {
            self.audio.play(Cue::Move);
        }
    }

    /// Jumps come back down after half a beat
    fn update_jumping(&mut self, frame: Frame) {
        let half_beat = Frame::from(self.tick / 2);
        if self.avatar.is_jumping()
            && !self.lanes.has_bitten()
            && frame.saturating_sub(self.avatar.event_timer()) > half_beat
        {
            self.avatar.move_in(Direction::Down, frame);
        }
    }

    /// Key insertion, reward, then the slide back down
    fn update_unlocking(&mut self, frame: Frame) {
        let elapsed = frame.saturating_sub(self.avatar.event_timer());
        let settled = elapsed > Frame::from(self.tick);

        if self.avatar.is_unlocking() {
            if !settled {
                return;
            }
            if self.avatar.has_arm_up() {
                let time_to_unlock = frame.saturating_sub(self.avatar.origin_timestamp());
                self.unlocked += 1;
                let mut reward = unlock_reward(time_to_unlock);
                if self.unlocked == CAGE_PARTS {
                    reward += MAX_UNLOCK_REWARD;
                }
                log::debug!(
                    "Cage part {} unlocked in {} frames (+{})",
                    self.unlocked,
                    time_to_unlock,
                    reward
                );
                self.score.inc(reward, &mut self.audio);
                self.avatar.begin_unlock(ArmState::Down, frame);
            } else if self.avatar.has_arm_down() && !self.score.is_animating() {
                self.avatar.begin_descent(frame);
            }
        } else if self.avatar.is_descending() && settled {
            if self.unlocked == CAGE_PARTS {
                self.unlocked = 0;
                self.tick = self
                    .tick
                    .saturating_sub(self.game_type.tick_step())
                    .max(MIN_TICK);
                log::info!("Captive freed, tempo now {} frames", self.tick);
            }
            self.avatar.reset_to_origin(frame);
            self.lanes.clear_near_origin();
        }
    }

    /// Two-step fall after a missed key
    fn update_falling(&mut self, frame: Frame) {
        let elapsed = frame.saturating_sub(self.avatar.event_timer());

        if self.avatar.is_falling_down() && self.audio.has_finished_repeating() {
            self.avatar.reset_to_origin(frame);
            self.lanes.clear_near_origin();
            self.miss_counted = false;
            if self.misses >= LIVES {
                self.stop_game(frame);
            }
        } else if self.avatar.is_falling_up() && elapsed > Frame::from(self.tick) {
            self.avatar.begin_fall(FallState::Down, frame);
            self.audio
                .repeat(Cue::Lost, FAILURE_REPEATS, FAILURE_REPEAT_DELAY, frame);
            self.count_miss();
        }
    }

    /// Swing the key, resolving a pending grab first
    fn update_key(&mut self, frame: Frame) {
        if !on_beat(frame, self.tick / 2) {
            return;
        }

        if self.avatar.is_grabbing() {
            if self.key_index == 0 {
                self.avatar.begin_unlock(ArmState::Up, frame);
            } else {
                log::debug!("Missed the key at swing step {}", self.key_index);
                self.avatar.begin_fall(FallState::Up, frame);
                self.miss_counted = false;
            }
        }

        self.key_index = (self.key_index + 1) % KEY_FRAMES.len();
    }

    fn update_fruit(&mut self, frame: Frame) {
        if on_beat(frame, self.tick / 4) {
            self.fruit.update(
                &self.avatar,
                &mut self.lanes,
                &mut self.score,
                &mut self.rng,
                &mut self.audio,
            );
        }
    }

    /// Bite recovery, or the regular lane step
    fn update_creatures(&mut self, frame: Frame) {
        if self.avatar.is_busy() {
            return;
        }

        if self.lanes.has_bitten() {
            if self.audio.has_finished_repeating() {
                self.lanes.clear_bite();
                self.avatar.reset_to_origin(frame);
                self.lanes.clear_near_origin();
                self.miss_counted = false;
                if self.misses >= LIVES {
                    self.stop_game(frame);
                }
            } else {
                self.count_miss();
            }
        } else if on_beat(frame, self.tick / 2) {
            let playing = self.mode == GameMode::Playing;
            self.lanes.update(
                frame,
                playing,
                &self.avatar,
                &mut self.score,
                &mut self.rng,
                &mut self.audio,
            );
        }
    }

    /// One miss per failure episode
    fn count_miss(&mut self) {
        if !self.miss_counted {
            self.misses += 1;
            self.miss_counted = true;
            log::debug!("Miss {}/{}", self.misses, LIVES);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::{MemoryStore, Slot};
    use crate::sim::state::{CounterDisplay, DEFAULT_TICK, ScoreShown};

    /// Audio double: records cues, repeat completion is driven by the test
    #[derive(Debug, Default)]
    struct FakeAudio {
        played: Vec<Cue>,
        repeats: Vec<(Cue, u8, u8, Frame)>,
        finished: bool,
        muted: bool,
    }

    impl AudioService for FakeAudio {
        fn play(&mut self, cue: Cue) {
            self.played.push(cue);
        }

        fn repeat(&mut self, cue: Cue, count: u8, delay: u8, now: Frame) {
            self.repeats.push((cue, count, delay, now));
            self.finished = false;
        }

        fn has_finished_repeating(&self) -> bool {
            self.finished
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn is_muted(&self) -> bool {
            self.muted
        }

        fn update(&mut self, _now: Frame) {}
    }

    type TestGame = Game<FakeAudio, MemoryStore>;

    fn booted() -> TestGame {
        let mut game = Game::with_seed(42, FakeAudio::default(), MemoryStore::default());
        for frame in 0..=BOOT_FRAMES + 1 {
            game.tick(frame, &TickInput::default());
        }
        assert_eq!(game.mode(), GameMode::Demo);
        game
    }

    fn playing(game_type: GameType) -> TestGame {
        let mut game = Game::with_seed(42, FakeAudio::default(), MemoryStore::default());
        game.start_game(game_type, 0);
        game
    }

    fn press(f: impl FnOnce(&mut TickInput)) -> TickInput {
        let mut input = TickInput::default();
        f(&mut input);
        input
    }

    #[test]
    fn test_boot_lasts_one_second() {
        let mut game = Game::with_seed(1, FakeAudio::default(), MemoryStore::default());
        for frame in 0..=BOOT_FRAMES {
            game.tick(frame, &TickInput::default());
            assert_eq!(game.mode(), GameMode::Boot);
        }
        game.tick(BOOT_FRAMES + 1, &TickInput::default());
        assert_eq!(game.mode(), GameMode::Demo);
    }

    #[test]
    fn test_demo_start_buttons() {
        let mut game = booted();
        game.tick(40, &press(|i| i.primary = true));
        assert_eq!(game.mode(), GameMode::Playing);
        assert_eq!(game.game_type(), GameType::A);
        assert_eq!(game.misses(), 0);

        let mut game = booted();
        game.tick(40, &press(|i| i.secondary = true));
        assert_eq!(game.mode(), GameMode::Playing);
        assert_eq!(game.game_type(), GameType::B);
        assert_eq!(game.tick_interval(), 15);
        // Secondary doubles as the mute toggle
        assert!(game.audio().is_muted());
    }

    #[test]
    fn test_demo_rolls_the_counter() {
        let mut game = booted();
        let start = BOOT_FRAMES + 1;
        assert_eq!(game.score_shown(), ScoreShown::Current);
        for frame in start + 1..=start + SCORE_ROLL_FRAMES + 1 {
            game.tick(frame, &TickInput::default());
        }
        assert_eq!(game.score_shown(), ScoreShown::BestA);
    }

    #[test]
    fn test_menu_toggles_counter() {
        let mut game = playing(GameType::A);
        game.tick(1, &press(|i| i.menu = true));
        assert_eq!(game.counter_display(), CounterDisplay::Tempo);
        assert_eq!(game.counter_value(), DEFAULT_TICK);
        game.tick(2, &press(|i| i.menu = true));
        assert_eq!(game.counter_display(), CounterDisplay::Score);
    }

    #[test]
    fn test_player_move_plays_cue_and_jump_times_out() {
        let mut game = playing(GameType::A);
        game.tick(1, &press(|i| i.right = true));
        assert_eq!(game.avatar().posture(), Posture::Bottom2);
        assert_eq!(game.audio().played.last(), Some(&Cue::Move));

        game.tick(2, &press(|i| i.primary = true));
        assert_eq!(game.avatar().posture(), Posture::BottomJump2);

        // Half a beat is 12 frames; the fall back is silent
        let moves = game.audio().played.iter().filter(|c| **c == Cue::Move).count();
        for frame in 3..=14 {
            game.tick(frame, &TickInput::default());
            assert_eq!(game.avatar().posture(), Posture::BottomJump2);
        }
        game.tick(15, &TickInput::default());
        assert_eq!(game.avatar().posture(), Posture::Bottom2);
        let after = game.audio().played.iter().filter(|c| **c == Cue::Move).count();
        assert_eq!(moves, after);
    }

    #[test]
    fn test_down_is_ignored_mid_jump() {
        let mut game = playing(GameType::A);
        game.tick(1, &press(|i| i.right = true));
        game.tick(2, &press(|i| i.primary = true));
        game.tick(3, &press(|i| i.down = true));
        assert_eq!(game.avatar().posture(), Posture::BottomJump2);
    }

    #[test]
    fn test_up_only_climbs_from_last_bottom_jump() {
        let mut game = playing(GameType::A);
        game.tick(1, &press(|i| i.up = true));
        assert_eq!(game.avatar().posture(), Posture::Bottom1);
    }

    #[test]
    fn test_sideways_into_enemy_is_a_bite() {
        let mut game = playing(GameType::A);
        game.lanes.place(LaneKind::Snapjaws, 11, false);

        game.tick(1, &press(|i| i.right = true));
        assert_eq!(game.avatar().posture(), Posture::Bottom1);
        assert!(game.lanes().has_bitten());
        assert_eq!(game.misses(), 1);
        assert_eq!(
            game.audio().repeats.last(),
            Some(&(Cue::Lost, FAILURE_REPEATS, FAILURE_REPEAT_DELAY, 1))
        );

        // Input is dead and the miss is not counted again
        for frame in 2..100 {
            game.tick(frame, &press(|i| i.right = true));
            assert_eq!(game.avatar().posture(), Posture::Bottom1);
            assert_eq!(game.misses(), 1);
        }

        game.audio_mut().finished = true;
        game.tick(100, &TickInput::default());
        assert!(!game.lanes().has_bitten());
        assert!(!game.lanes().lane(LaneKind::Snapjaws).is_occupied(11));
        assert_eq!(game.avatar().origin_timestamp(), 100);
        assert_eq!(game.misses(), 1);
    }

    #[test]
    fn test_unlock_reward_timing() {
        // Fast: grab at 90, unlock step on the beat at 96, settle past 121
        let mut game = playing(GameType::A);
        game.avatar.attempt_grab_key(90);
        game.key_index = 0;
        game.update_key(96);
        assert!(game.avatar().is_unlocking());
        assert!(game.avatar().has_arm_up());
        game.update_unlocking(121);
        assert!(game.avatar().has_arm_up());
        game.update_unlocking(122);
        assert_eq!(game.score().target(), 20);
        assert_eq!(game.unlocked_parts(), 1);
        assert!(game.avatar().has_arm_down());

        // Slow: past the window pays the minimum
        let mut game = playing(GameType::A);
        game.avatar.attempt_grab_key(280);
        game.key_index = 0;
        game.update_key(288);
        game.update_unlocking(314);
        assert_eq!(game.score().target(), 5);

        // Midpoint of the window
        let mut game = playing(GameType::A);
        game.avatar.attempt_grab_key(160);
        game.key_index = 0;
        game.update_key(168);
        game.update_unlocking(200);
        assert_eq!(game.score().target(), 13);
    }

    #[test]
    fn test_descent_waits_for_score_then_resets() {
        let mut game = playing(GameType::A);
        game.avatar.begin_unlock(ArmState::Up, 0);
        game.update_unlocking(26);
        assert!(game.avatar().has_arm_down());

        // Score still rolling: stay on the lock
        game.update_unlocking(60);
        assert!(game.avatar().has_arm_down());

        while game.score().is_animating() {
            let frame = game.now + 1;
            game.now = frame;
            game.score.tick(frame, &mut game.audio);
        }
        game.update_unlocking(61);
        assert!(game.avatar().is_descending());

        game.update_unlocking(86);
        assert!(game.avatar().is_descending());
        game.update_unlocking(87);
        assert_eq!(game.avatar().posture(), Posture::Bottom1);
        assert_eq!(game.avatar().origin_timestamp(), 87);
    }

    #[test]
    fn test_freeing_the_captive_speeds_up() {
        let mut game = playing(GameType::A);
        game.unlocked = CAGE_PARTS - 1;
        game.avatar.begin_unlock(ArmState::Up, 0);
        game.update_unlocking(26);
        // Fast reward plus the full-cage bonus
        assert_eq!(game.score().target(), 40);
        assert_eq!(game.unlocked_parts(), CAGE_PARTS);

        game.score = Default::default();
        game.update_unlocking(52);
        assert!(game.avatar().is_descending());
        game.update_unlocking(78);
        assert_eq!(game.unlocked_parts(), 0);
        assert_eq!(game.tick_interval(), 23);

        let mut game = playing(GameType::B);
        game.unlocked = CAGE_PARTS;
        game.avatar.begin_descent(0);
        game.update_unlocking(16);
        assert_eq!(game.tick_interval(), 14);
    }

    #[test]
    fn test_tempo_never_drops_below_floor() {
        let mut game = playing(GameType::A);
        game.tick = MIN_TICK + 1;
        game.unlocked = CAGE_PARTS;
        game.avatar.begin_descent(0);
        game.update_unlocking(100);
        assert_eq!(game.tick_interval(), MIN_TICK);
    }

    #[test]
    fn test_missed_key_falls_and_counts_once() {
        let mut game = playing(GameType::A);
        game.avatar.attempt_grab_key(10);
        game.key_index = 2;
        game.tick(12, &TickInput::default());
        assert!(game.avatar().is_falling_up());
        assert_eq!(game.misses(), 0);

        for frame in 13..=37 {
            game.tick(frame, &TickInput::default());
            assert!(game.avatar().is_falling_up());
        }
        game.tick(38, &TickInput::default());
        assert!(game.avatar().is_falling_down());
        assert_eq!(game.avatar().posture(), Posture::Fall2);
        assert_eq!(game.misses(), 1);

        for frame in 39..300 {
            game.tick(frame, &TickInput::default());
            assert_eq!(game.misses(), 1);
        }

        game.audio_mut().finished = true;
        game.tick(300, &TickInput::default());
        assert!(!game.avatar().is_falling());
        assert_eq!(game.avatar().posture(), Posture::Bottom1);
        assert_eq!(game.misses(), 1);
        assert_eq!(game.mode(), GameMode::Playing);
    }

    #[test]
    fn test_third_miss_ends_the_game() {
        let mut game = playing(GameType::A);
        game.score.inc(1, &mut game.audio);
        game.misses = LIVES - 1;
        game.avatar.begin_fall(FallState::Up, 0);
        game.update_falling(26);
        assert_eq!(game.misses(), LIVES);

        game.audio_mut().finished = true;
        game.update_falling(27);
        assert_eq!(game.mode(), GameMode::Demo);
        assert_eq!(game.tick_interval(), DEFAULT_TICK);
        assert_eq!(game.store().get(Slot::Current), 1);
        assert_eq!(game.store().get(Slot::BestA), 1);
    }

    #[test]
    fn test_key_swings_on_half_beats() {
        let mut game = playing(GameType::A);
        let start = game.key_index();
        game.update_key(11);
        assert_eq!(game.key_index(), start);
        game.update_key(12);
        assert_eq!(game.key_index(), (start + 1) % KEY_FRAMES.len());
    }

    #[test]
    fn test_demo_is_silent_and_never_bites() {
        let mut game = booted();
        for frame in BOOT_FRAMES + 2..3000 {
            game.tick(frame, &TickInput::default());
            assert!(!game.lanes().has_bitten());
            assert!(game.avatar().posture().is_controllable());
        }
        assert_eq!(game.mode(), GameMode::Demo);
        assert!(game.audio().played.is_empty());
    }
}
