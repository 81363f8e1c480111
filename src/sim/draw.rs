//! Which sprites are lit on the current frame
//!
//! The game only chooses sprites; the [`SliceRenderer`] owns the pixels.

use super::avatar::{Posture, PostureQuery};
use super::lanes::LaneKind;
use super::state::{CAGE_PARTS, CounterDisplay, Game, GameMode, GameType, ScoreShown};
use crate::audio::AudioService;
use crate::blink_on;
use crate::persistence::ScoreStore;
use crate::renderer::sprites::{
    BIRDS, CAGE, CROCS, FRUITS, HEADS, INFO, JUNIOR, KEYS, MARIO, SMILE,
};
use crate::renderer::{SliceRenderer, Sprite, Stage, counter_digits};

const INFO_GAME_A: usize = 0;
const INFO_GAME_B: usize = 1;
const INFO_MISS: usize = 2;

impl<A: AudioService, S: ScoreStore> Game<A, S> {
    /// Background for the current mode
    pub fn stage(&self) -> Stage {
        match self.mode {
            GameMode::Boot => Stage::Boot,
            _ => Stage::Play,
        }
    }

    /// Every lit sprite, back to front. Empty while booting.
    pub fn visible_sprites(&self) -> Vec<&'static Sprite> {
        let mut lit = Vec::new();
        if self.mode == GameMode::Boot {
            return lit;
        }
        let blink = blink_on(self.now);

        lit.push(&MARIO);

        if !self.lanes.has_bitten() || blink {
            lit.push(&JUNIOR[self.avatar.posture().index()]);
        }

        if self.fruit.has_appeared() {
            lit.push(&FRUITS[self.fruit.stage().index()]);
        }

        if self.avatar.is_unlocking() {
            if self.avatar.has_arm_up() {
                lit.push(&JUNIOR[Posture::ArmUp.index()]);
            } else if self.avatar.has_arm_down() {
                lit.push(&JUNIOR[Posture::ArmDown.index()]);
            }
        }

        if !self.avatar.is_unlocking() && !self.avatar.is_descending() {
            lit.push(&KEYS[self.key_frame()]);
        }

        if self.unlocked >= CAGE_PARTS {
            if blink {
                lit.push(&SMILE);
            }
        } else {
            lit.extend(
                CAGE.iter()
                    .enumerate()
                    .filter(|(i, _)| *i >= usize::from(self.unlocked) || blink)
                    .map(|(_, part)| part),
            );
        }

        match (self.mode, self.counter, self.shown) {
            (GameMode::Playing, _, _) => lit.push(match self.game_type {
                GameType::A => &INFO[INFO_GAME_A],
                GameType::B => &INFO[INFO_GAME_B],
            }),
            (GameMode::Demo, CounterDisplay::Score, ScoreShown::BestA) => {
                lit.push(&INFO[INFO_GAME_A])
            }
            (GameMode::Demo, CounterDisplay::Score, ScoreShown::BestB) => {
                lit.push(&INFO[INFO_GAME_B])
            }
            _ => {}
        }

        if self.misses > 0 {
            lit.push(&INFO[INFO_MISS]);
            lit.extend(HEADS.iter().take(usize::from(self.misses)));
        }

        for (kind, table) in [(LaneKind::Snapjaws, &CROCS[..]), (LaneKind::Birds, &BIRDS[..])] {
            let lane = self.lanes.lane(kind);
            lit.extend(
                table
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| lane.is_occupied(*i))
                    .map(|(_, sprite)| sprite),
            );
        }

        lit
    }

    /// Fill one band: background, then sprites and counter unless booting
    pub fn draw_on_slice<R: SliceRenderer + ?Sized>(
        &self,
        slice_y: u32,
        buffer: &mut [u16],
        renderer: &R,
    ) {
        renderer.draw_stage(self.stage(), slice_y, buffer);
        if self.mode == GameMode::Boot {
            return;
        }

        for sprite in self.visible_sprites() {
            if sprite.rows_in_slice(slice_y).is_some() {
                renderer.draw_sprite(sprite, slice_y, buffer);
            }
        }

        let digits = counter_digits(self.counter_value());
        let n = digits.len() as u32;
        for (i, digit) in digits.into_iter().enumerate() {
            renderer.draw_digit(digit, n - i as u32 - 1, slice_y, buffer);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::audio::{Buzzer, NullSynth};
    use crate::persistence::MemoryStore;
    use crate::sim::avatar::ArmState;

    type TestGame = Game<Buzzer<NullSynth>, MemoryStore>;

    fn demo() -> TestGame {
        let mut game = Game::with_seed(7, Buzzer::default(), MemoryStore::default());
        game.mode = GameMode::Demo;
        game
    }

    fn playing() -> TestGame {
        let mut game = demo();
        game.start_game(GameType::A, 0);
        game
    }

    fn lit(game: &TestGame, sprite: &Sprite) -> bool {
        game.visible_sprites().iter().any(|s| std::ptr::eq(*s, sprite))
    }

    /// Records calls instead of drawing pixels
    #[derive(Default)]
    struct Recorder {
        stages: RefCell<Vec<Stage>>,
        sprites: RefCell<Vec<Sprite>>,
        digits: RefCell<Vec<(u8, u32)>>,
    }

    impl SliceRenderer for Recorder {
        fn draw_stage(&self, stage: Stage, _slice_y: u32, _buffer: &mut [u16]) {
            self.stages.borrow_mut().push(stage);
        }

        fn draw_sprite(&self, sprite: &Sprite, _slice_y: u32, _buffer: &mut [u16]) {
            self.sprites.borrow_mut().push(*sprite);
        }

        fn draw_digit(&self, digit: u8, position: u32, _slice_y: u32, _buffer: &mut [u16]) {
            self.digits.borrow_mut().push((digit, position));
        }
    }

    #[test]
    fn test_boot_draws_only_the_boot_stage() {
        let game = Game::with_seed(7, Buzzer::default(), MemoryStore::default());
        let recorder = Recorder::default();
        let mut buffer = [0u16; 1280];
        game.draw_on_slice(48, &mut buffer, &recorder);
        assert_eq!(*recorder.stages.borrow(), vec![Stage::Boot]);
        assert!(recorder.sprites.borrow().is_empty());
        assert!(recorder.digits.borrow().is_empty());
    }

    #[test]
    fn test_demo_shows_full_miss_row() {
        let game = demo();
        assert!(lit(&game, &INFO[INFO_MISS]));
        assert!(HEADS.iter().all(|head| lit(&game, head)));
        // Demo with the current score on the counter shows no game label
        assert!(!lit(&game, &INFO[INFO_GAME_A]));
    }

    #[test]
    fn test_playing_labels_and_first_sprites() {
        let game = playing();
        let sprites = game.visible_sprites();
        assert!(std::ptr::eq(sprites[0], &MARIO));
        assert!(std::ptr::eq(sprites[1], &JUNIOR[Posture::Bottom1.index()]));
        assert!(lit(&game, &INFO[INFO_GAME_A]));
        assert!(!lit(&game, &INFO[INFO_MISS]));
        assert!(CAGE.iter().all(|part| lit(&game, part)));
    }

    #[test]
    fn test_bitten_avatar_blinks() {
        let mut game = playing();
        game.lanes.place(LaneKind::Birds, 0, false);
        game.lanes.is_occupied_and_biting(LaneKind::Birds, Some(0), 0, &mut game.audio);
        assert!(game.lanes.has_bitten());

        game.now = 0;
        assert!(lit(&game, &JUNIOR[Posture::Bottom1.index()]));
        game.now = 12;
        assert!(!lit(&game, &JUNIOR[Posture::Bottom1.index()]));
    }

    #[test]
    fn test_unlocked_parts_blink_and_smile_when_free() {
        let mut game = playing();
        game.unlocked = 2;
        game.now = 13;
        assert!(!lit(&game, &CAGE[0]));
        assert!(!lit(&game, &CAGE[1]));
        assert!(lit(&game, &CAGE[2]));
        game.now = 25;
        assert!(lit(&game, &CAGE[0]));

        game.unlocked = CAGE_PARTS;
        assert!(lit(&game, &SMILE));
        assert!(CAGE.iter().all(|part| !lit(&game, part)));
        game.now = 40;
        assert!(!lit(&game, &SMILE));
    }

    #[test]
    fn test_key_hidden_while_unlocking() {
        let mut game = playing();
        let key = &KEYS[game.key_frame()];
        assert!(lit(&game, key));

        game.avatar.begin_unlock(ArmState::Up, 0);
        assert!(!lit(&game, key));
        assert!(lit(&game, &JUNIOR[Posture::ArmUp.index()]));
    }

    #[test]
    fn test_occupied_cells_are_lit() {
        let mut game = playing();
        game.lanes.place(LaneKind::Snapjaws, 6, false);
        game.lanes.place(LaneKind::Birds, 3, true);
        assert!(lit(&game, &CROCS[6]));
        assert!(lit(&game, &BIRDS[3]));
        assert!(!lit(&game, &CROCS[5]));
    }

    #[test]
    fn test_demo_high_score_label_rolls() {
        let mut game = demo();
        game.shown = ScoreShown::BestB;
        assert!(lit(&game, &INFO[INFO_GAME_B]));
        game.counter = CounterDisplay::Tempo;
        assert!(!lit(&game, &INFO[INFO_GAME_B]));
    }

    #[test]
    fn test_counter_digits_right_aligned() {
        let mut game = playing();
        game.score.inc(1, &mut game.audio);
        for _ in 0..122 {
            game.score.inc(1, &mut game.audio);
        }
        let recorder = Recorder::default();
        let mut buffer = [0u16; 1280];
        game.draw_on_slice(0, &mut buffer, &recorder);
        assert_eq!(*recorder.stages.borrow(), vec![Stage::Play]);
        assert_eq!(*recorder.digits.borrow(), vec![(1, 2), (2, 1), (3, 0)]);
    }

    #[test]
    fn test_only_sprites_touching_the_band_are_drawn() {
        let game = playing();
        let recorder = Recorder::default();
        let mut buffer = [0u16; 1280];
        game.draw_on_slice(120, &mut buffer, &recorder);
        assert!(
            recorder
                .sprites
                .borrow()
                .iter()
                .all(|s| s.rows_in_slice(120).is_some())
        );
        assert!(recorder.sprites.borrow().contains(&JUNIOR[Posture::Bottom1.index()]));
    }
}
