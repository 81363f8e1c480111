//! Fruit hanging over the top platform
//!
//! Knocked loose by a jump from the right spot, it drops through three
//! levels and takes out whatever enemy sits on its path at each one.

use rand::Rng;

use super::avatar::{Posture, PostureQuery};
use super::lanes::{EnemyLanes, LaneKind};
use super::score::Award;
use crate::audio::AudioService;

/// Appearance chance per update is one in this many
const APPEAR_ODDS: u32 = 24;

/// Drop stage, also the sprite index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FruitStage {
    #[default]
    Hanging,
    /// Level of the upper snapjaw path
    Upper,
    /// Level of the bird path
    Middle,
    /// Level of the lower snapjaw path
    Lower,
}

impl FruitStage {
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Default)]
pub struct Fruit {
    appeared: bool,
    stage: FruitStage,
}

impl Fruit {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.appeared = false;
        self.stage = FruitStage::Hanging;
    }

    pub fn has_appeared(&self) -> bool {
        self.appeared
    }

    pub fn stage(&self) -> FruitStage {
        self.stage
    }

    /// One fruit step
    pub fn update<P, W, R, A>(
        &mut self,
        avatar: &P,
        lanes: &mut EnemyLanes,
        score: &mut W,
        rng: &mut R,
        audio: &mut A,
    ) where
        P: PostureQuery,
        W: Award,
        R: Rng,
        A: AudioService,
    {
        if !self.appeared {
            self.appeared = rng.random_ratio(1, APPEAR_ODDS);
            self.stage = FruitStage::Hanging;
            if self.appeared {
                log::debug!("fruit appeared");
            }
            return;
        }

        match self.stage {
            FruitStage::Hanging => {
                if avatar.posture() == Posture::TopJump2 {
                    self.stage = FruitStage::Upper;
                }
            }
            FruitStage::Upper => {
                lanes.try_kill_at(LaneKind::Snapjaws, 2, score, audio);
                self.stage = FruitStage::Middle;
            }
            FruitStage::Middle => {
                lanes.try_kill_at(LaneKind::Birds, 4, score, audio);
                self.stage = FruitStage::Lower;
            }
            FruitStage::Lower => {
                lanes.try_kill_at(LaneKind::Snapjaws, 9, score, audio);
                self.reset();
            }
        }
    }
}
