//! Enemy lanes
//!
//! Birds and snapjaws walk along fixed paths of cells. Every lane update flips
//! a shared parity bit; an enemy only acts on updates whose parity matches the
//! one it was spawned with, so each enemy advances every other update and two
//! neighbours never step in lockstep.

use rand::Rng;

use super::avatar::PostureQuery;
use super::avatar::Posture::*;
use super::collision::bites_at;
use super::score::Award;
use crate::Frame;
use crate::audio::{AudioService, Cue};

/// Lost cue repeat applied on a bite
const BITE_REPEATS: u8 = 5;
const BITE_REPEAT_DELAY: u8 = 8;

/// Which enemy path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaneKind {
    Birds,
    Snapjaws,
}

impl LaneKind {
    /// Number of cells on the path
    pub const fn len(self) -> usize {
        match self {
            LaneKind::Birds => 8,
            LaneKind::Snapjaws => 13,
        }
    }

    /// Spawn chance is one in this many
    pub const fn spawn_odds(self) -> u32 {
        match self {
            LaneKind::Birds => 4,
            LaneKind::Snapjaws => 6,
        }
    }

    /// How many enemies may share the lane at a given displayed score
    pub fn capacity(self, shown_score: u32) -> usize {
        let extra = (shown_score / 200) as usize;
        match self {
            LaneKind::Birds => (1 + extra).min(4),
            LaneKind::Snapjaws => (2 + extra).min(7),
        }
    }

    /// Points for knocking an enemy out of cell `index` with the fruit
    pub fn kill_reward(self, index: usize) -> u32 {
        match (self, index) {
            (LaneKind::Birds, _) => 6,
            (LaneKind::Snapjaws, 2) => 3,
            (LaneKind::Snapjaws, 9) => 9,
            (LaneKind::Snapjaws, _) => 0,
        }
    }
}

/// One position on a lane
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cell {
    pub occupied: bool,
    /// Phase the occupant steps on
    pub parity: bool,
}

impl Cell {
    fn in_phase(self, parity: bool) -> bool {
        self.occupied && self.parity == parity
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lane {
    kind: LaneKind,
    cells: Vec<Cell>,
}

impl Lane {
    pub fn new(kind: LaneKind) -> Self {
        Self {
            kind,
            cells: vec![Cell::default(); kind.len()],
        }
    }

    pub fn kind(&self) -> LaneKind {
        self.kind
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn is_occupied(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(|c| c.occupied)
    }

    /// Number of enemies on the lane
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    pub fn clear(&mut self) {
        self.cells.fill(Cell::default());
    }

    fn vacate(&mut self, index: usize) {
        if let Some(cell) = self.cells.get_mut(index) {
            *cell = Cell::default();
        }
    }

    /// First in-phase enemy that lands on the avatar's posture
    fn biting_cell(&self, parity: bool, avatar: &impl PostureQuery) -> Option<usize> {
        let posture = avatar.posture();
        self.cells
            .iter()
            .enumerate()
            .find(|(i, c)| c.in_phase(parity) && bites_at(self.kind, *i, posture))
            .map(|(i, _)| i)
    }

    /// Step every in-phase enemy one cell forward. The last cell exits.
    /// Returns true when something moved.
    fn advance(&mut self, parity: bool) -> bool {
        let last = self.cells.len() - 1;
        if self.cells[last].in_phase(parity) {
            self.cells[last] = Cell { occupied: false, parity };
        }

        let mut moved = false;
        for i in (1..=last).rev() {
            let behind = self.cells[i - 1];
            if behind.in_phase(parity) {
                self.cells[i] = behind;
                self.cells[i - 1] = Cell { occupied: false, parity };
                moved = true;
            }
        }
        moved
    }

    /// Maybe drop a new enemy on cell 0. Cell 1 must be free or out of phase.
    fn try_spawn<R: Rng>(&mut self, parity: bool, shown_score: u32, rng: &mut R) -> bool {
        if self.population() >= self.kind.capacity(shown_score) {
            return false;
        }
        if !rng.random_ratio(1, self.kind.spawn_odds()) {
            return false;
        }
        if self.cells[0].occupied {
            return false;
        }
        let next = self.cells[1];
        if next.occupied && next.parity == parity {
            return false;
        }
        self.cells[0] = Cell {
            occupied: true,
            parity,
        };
        true
    }
}

/// Both enemy lanes plus the bite bookkeeping
#[derive(Debug, Clone)]
pub struct EnemyLanes {
    birds: Lane,
    snapjaws: Lane,
    parity: bool,
    /// A step happened this update (drives the tick cue)
    bip: bool,
    bitten: bool,
    bitten_at: Frame,
    /// Event timer of the last jump that earned a jump-over point
    rewarded_jump: Option<Frame>,
}

impl Default for EnemyLanes {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyLanes {
    pub fn new() -> Self {
        Self {
            birds: Lane::new(LaneKind::Birds),
            snapjaws: Lane::new(LaneKind::Snapjaws),
            parity: false,
            bip: false,
            bitten: false,
            bitten_at: 0,
            rewarded_jump: None,
        }
    }

    pub fn lane(&self, kind: LaneKind) -> &Lane {
        match kind {
            LaneKind::Birds => &self.birds,
            LaneKind::Snapjaws => &self.snapjaws,
        }
    }

    fn lane_mut(&mut self, kind: LaneKind) -> &mut Lane {
        match kind {
            LaneKind::Birds => &mut self.birds,
            LaneKind::Snapjaws => &mut self.snapjaws,
        }
    }

    pub fn parity(&self) -> bool {
        self.parity
    }

    pub fn has_bitten(&self) -> bool {
        self.bitten
    }

    pub fn bitten_at(&self) -> Frame {
        self.bitten_at
    }

    /// Bite handled, avatar back in play
    pub fn clear_bite(&mut self) {
        self.bitten = false;
    }

    /// Empty both lanes and forget any bite
    pub fn reset(&mut self) {
        self.birds.clear();
        self.snapjaws.clear();
        self.bitten = false;
        self.rewarded_jump = None;
    }

    /// Remove enemies that would pounce on a freshly respawned avatar
    pub fn clear_near_origin(&mut self) {
        self.birds.vacate(0);
        self.birds.vacate(1);
        let last = LaneKind::Snapjaws.len() - 1;
        self.snapjaws.vacate(last);
        self.snapjaws.vacate(last - 1);
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, kind: LaneKind, index: usize, parity: bool) {
        self.lane_mut(kind).cells[index] = Cell {
            occupied: true,
            parity,
        };
    }

    fn mark_bite<A: AudioService>(&mut self, now: Frame, audio: &mut A) {
        self.bitten = true;
        self.bitten_at = now;
        audio.repeat(Cue::Lost, BITE_REPEATS, BITE_REPEAT_DELAY, now);
    }

    /// Knock out the enemy at `index` (if any) and pay the fruit reward
    pub fn try_kill_at<W: Award, A: AudioService>(
        &mut self,
        kind: LaneKind,
        index: usize,
        score: &mut W,
        audio: &mut A,
    ) -> bool {
        let lane = self.lane_mut(kind);
        if !lane.is_occupied(index) {
            return false;
        }
        lane.vacate(index);
        score.award(kind.kill_reward(index), audio);
        true
    }

    /// Sideways move check: an enemy at `index` bites the avatar stepping into it
    pub fn is_occupied_and_biting<A: AudioService>(
        &mut self,
        kind: LaneKind,
        index: Option<usize>,
        now: Frame,
        audio: &mut A,
    ) -> bool {
        let Some(index) = index else { return false };
        if !self.lane(kind).is_occupied(index) {
            return false;
        }
        self.mark_bite(now, audio);
        true
    }

    /// One lane step: birds first, then snapjaws unless a bird just bit.
    pub fn update<P, W, R, A>(
        &mut self,
        now: Frame,
        playing: bool,
        avatar: &P,
        score: &mut W,
        rng: &mut R,
        audio: &mut A,
    ) where
        P: PostureQuery,
        W: Award,
        R: Rng,
        A: AudioService,
    {
        self.parity = !self.parity;
        self.bip = false;
        self.bitten = false;

        self.update_birds(now, playing, avatar, score, rng, audio);
        if !self.bitten {
            self.update_snapjaws(now, playing, avatar, score, rng, audio);
        }

        if playing && self.bip {
            audio.play(Cue::Tick);
        }
    }

    fn update_birds<P, W, R, A>(
        &mut self,
        now: Frame,
        playing: bool,
        avatar: &P,
        score: &mut W,
        rng: &mut R,
        audio: &mut A,
    ) where
        P: PostureQuery,
        W: Award,
        R: Rng,
        A: AudioService,
    {
        let parity = self.parity;
        if playing && self.birds.biting_cell(parity, avatar).is_some() {
            self.mark_bite(now, audio);
            return;
        }
        if self.birds.advance(parity) {
            self.bip = true;
        }
        if self.birds.try_spawn(parity, score.shown(), rng) {
            self.bip = true;
        }
    }

    fn update_snapjaws<P, W, R, A>(
        &mut self,
        now: Frame,
        playing: bool,
        avatar: &P,
        score: &mut W,
        rng: &mut R,
        audio: &mut A,
    ) where
        P: PostureQuery,
        W: Award,
        R: Rng,
        A: AudioService,
    {
        let parity = self.parity;
        let mut scoring = false;

        if playing {
            scoring = self.jumped_over(parity, avatar);
            if self.snapjaws.biting_cell(parity, avatar).is_some() {
                self.mark_bite(now, audio);
                return;
            }
            if scoring {
                self.rewarded_jump = Some(avatar.event_timer());
                score.award(1, audio);
            }
        }

        // The score cue already covers this step
        if self.snapjaws.advance(parity) {
            self.bip = !scoring;
        }
        if self.snapjaws.try_spawn(parity, score.shown(), rng) {
            self.bip = true;
        }
    }

    /// An in-phase snapjaw is passing under a fresh jump, paid once per jump
    fn jumped_over(&self, parity: bool, avatar: &impl PostureQuery) -> bool {
        if self.rewarded_jump == Some(avatar.event_timer()) {
            return false;
        }
        let now = (avatar.posture(), avatar.previous_posture());
        self.snapjaws
            .cells()
            .iter()
            .enumerate()
            .filter(|(_, c)| c.in_phase(parity))
            .any(|(i, _)| {
                matches!(
                    (i, now),
                    (10, (BottomJump2, Bottom2))
                        | (7, (BottomJump5, Bottom5))
                        | (2, (TopJump2, Top3))
                        | (1, (TopJump3, Top4))
                )
            })
    }
}
