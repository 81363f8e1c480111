//! Score counter with catch-up animation
//!
//! `target` is the authoritative total; `value` is what the LCD shows. Single
//! points land immediately, batched rewards roll up one point every other frame.

use serde::{Deserialize, Serialize};

use crate::Frame;
use crate::audio::{AudioService, Cue};
use crate::persistence::{ScoreStore, Slot};

/// Something that accepts points (the score, seen from the lanes and the fruit)
pub trait Award {
    /// Add `points`, playing the score cue through `audio` when it lands at once
    fn award<A: AudioService>(&mut self, points: u32, audio: &mut A);

    /// Currently displayed total (drives enemy capacity)
    fn shown(&self) -> u32;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Score {
    value: u32,
    target: u32,
    high_a: u32,
    high_b: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the counter and both bests from the store
    pub fn load(store: &impl ScoreStore) -> Self {
        let value = store.get(Slot::Current);
        Self {
            value,
            target: value,
            high_a: store.get(Slot::BestA),
            high_b: store.get(Slot::BestB),
        }
    }

    /// Zero the running score (bests are kept)
    pub fn reset(&mut self) {
        self.value = 0;
        self.target = 0;
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn high_a(&self) -> u32 {
        self.high_a
    }

    pub fn high_b(&self) -> u32 {
        self.high_b
    }

    pub fn best(&self, slot: Slot) -> u32 {
        match slot {
            Slot::Current => self.value,
            Slot::BestA => self.high_a,
            Slot::BestB => self.high_b,
        }
    }

    /// Add points. A single point shows up at once (with its cue) and flushes
    /// anything still rolling; larger amounts only move the target.
    pub fn inc<A: AudioService>(&mut self, amount: u32, audio: &mut A) {
        match amount {
            0 => {}
            1 => {
                self.target += 1;
                self.value = self.target;
                audio.play(Cue::Score);
            }
            _ => self.target += amount,
        }
    }

    /// Still rolling toward the target
    pub fn is_animating(&self) -> bool {
        self.value < self.target
    }

    /// Roll one point on even frames
    pub fn tick<A: AudioService>(&mut self, now: Frame, audio: &mut A) {
        if self.value < self.target && now % 2 == 0 {
            self.value += 1;
            audio.play(Cue::Score);
        }
    }

    /// Raise the best for `slot` if the shown score beats it
    pub fn commit_best(&mut self, slot: Slot) {
        match slot {
            Slot::BestA => self.high_a = self.high_a.max(self.value),
            Slot::BestB => self.high_b = self.high_b.max(self.value),
            Slot::Current => {}
        }
    }

    /// Commit the best for `slot` and write the current score and that best
    pub fn save(&mut self, slot: Slot, store: &mut impl ScoreStore) {
        self.commit_best(slot);
        store.set(Slot::Current, self.value);
        store.set(slot, self.best(slot));
    }
}

impl Award for Score {
    fn award<A: AudioService>(&mut self, points: u32, audio: &mut A) {
        self.inc(points, audio);
    }

    fn shown(&self) -> u32 {
        self.value
    }
}
