//! The player's avatar
//!
//! Movement is table-driven: each direction maps the current posture to the
//! next one, or to nothing when the move is not allowed. Postures past
//! [`Posture::TopJump3`] are event postures (key grab, unlock, descent, fall)
//! and are only entered through the dedicated event methods.

use serde::{Deserialize, Serialize};

use crate::Frame;

/// Every position the avatar can be drawn in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Posture {
    Bottom1,
    Bottom2,
    Bottom3,
    Bottom4,
    Bottom5,
    Bottom6,
    BottomJump1,
    BottomJump2,
    BottomJump3,
    BottomJump4,
    BottomJump5,
    BottomJump6,
    Top1,
    Top2,
    Top3,
    Top4,
    TopJump1,
    TopJump2,
    TopJump3,
    GrabKey,
    Unlock,
    ArmUp,
    ArmDown,
    ComeDown,
    Fall1,
    Fall2,
}

/// Number of postures reachable with the direction buttons
pub const CONTROLLABLE_POSTURES: usize = 19;

impl Posture {
    pub const ALL: [Posture; 26] = [
        Posture::Bottom1,
        Posture::Bottom2,
        Posture::Bottom3,
        Posture::Bottom4,
        Posture::Bottom5,
        Posture::Bottom6,
        Posture::BottomJump1,
        Posture::BottomJump2,
        Posture::BottomJump3,
        Posture::BottomJump4,
        Posture::BottomJump5,
        Posture::BottomJump6,
        Posture::Top1,
        Posture::Top2,
        Posture::Top3,
        Posture::Top4,
        Posture::TopJump1,
        Posture::TopJump2,
        Posture::TopJump3,
        Posture::GrabKey,
        Posture::Unlock,
        Posture::ArmUp,
        Posture::ArmDown,
        Posture::ComeDown,
        Posture::Fall1,
        Posture::Fall2,
    ];

    /// Position in [`Posture::ALL`] (and in every per-posture table)
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// True for postures that have directional edges
    #[inline]
    pub fn is_controllable(self) -> bool {
        self.index() < CONTROLLABLE_POSTURES
    }

    /// The four postures a jump timeout brings back down
    #[inline]
    pub fn is_jump(self) -> bool {
        matches!(
            self,
            Posture::BottomJump2 | Posture::BottomJump5 | Posture::TopJump2 | Posture::TopJump3
        )
    }
}

/// Directional input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

use Posture::*;

const MOVE_LEFT: [Option<Posture>; CONTROLLABLE_POSTURES] = [
    None,              // Bottom1
    Some(Bottom1),     // Bottom2
    Some(Bottom2),     // Bottom3
    Some(Bottom3),     // Bottom4
    Some(Bottom4),     // Bottom5
    Some(Bottom5),     // Bottom6
    None,              // BottomJump1
    None,              // BottomJump2
    Some(BottomJump2), // BottomJump3
    Some(BottomJump3), // BottomJump4
    None,              // BottomJump5
    None,              // BottomJump6
    Some(Top2),        // Top1
    Some(Top3),        // Top2
    Some(Top4),        // Top3
    None,              // Top4
    None,              // TopJump1
    None,              // TopJump2
    None,              // TopJump3
];

const MOVE_RIGHT: [Option<Posture>; CONTROLLABLE_POSTURES] = [
    Some(Bottom2),     // Bottom1
    Some(Bottom3),     // Bottom2
    Some(Bottom4),     // Bottom3
    Some(Bottom5),     // Bottom4
    Some(Bottom6),     // Bottom5
    None,              // Bottom6
    Some(BottomJump2), // BottomJump1
    None,              // BottomJump2
    Some(BottomJump4), // BottomJump3
    Some(BottomJump5), // BottomJump4
    None,              // BottomJump5
    None,              // BottomJump6
    None,              // Top1
    Some(Top1),        // Top2
    Some(Top2),        // Top3
    Some(Top3),        // Top4
    None,              // TopJump1
    None,              // TopJump2
    None,              // TopJump3
];

const MOVE_UP: [Option<Posture>; CONTROLLABLE_POSTURES] = [
    Some(BottomJump1), // Bottom1
    Some(BottomJump2), // Bottom2
    Some(BottomJump3), // Bottom3
    Some(BottomJump4), // Bottom4
    Some(BottomJump5), // Bottom5
    Some(BottomJump6), // Bottom6
    None,              // BottomJump1
    None,              // BottomJump2
    None,              // BottomJump3
    None,              // BottomJump4
    None,              // BottomJump5
    Some(Top1),        // BottomJump6
    None,              // Top1
    Some(TopJump1),    // Top2
    Some(TopJump2),    // Top3
    Some(TopJump3),    // Top4
    None,              // TopJump1
    None,              // TopJump2
    None,              // TopJump3
];

const MOVE_DOWN: [Option<Posture>; CONTROLLABLE_POSTURES] = [
    None,              // Bottom1
    None,              // Bottom2
    None,              // Bottom3
    None,              // Bottom4
    None,              // Bottom5
    None,              // Bottom6
    Some(Bottom1),     // BottomJump1
    Some(Bottom2),     // BottomJump2
    Some(Bottom3),     // BottomJump3
    Some(Bottom4),     // BottomJump4
    Some(Bottom5),     // BottomJump5
    Some(Bottom6),     // BottomJump6
    Some(BottomJump6), // Top1
    None,              // Top2
    None,              // Top3
    None,              // Top4
    Some(Top2),        // TopJump1
    Some(Top3),        // TopJump2
    Some(Top4),        // TopJump3
];

/// Where `direction` leads from `from`, if anywhere
pub fn next_posture(direction: Direction, from: Posture) -> Option<Posture> {
    let table = match direction {
        Direction::Left => &MOVE_LEFT,
        Direction::Right => &MOVE_RIGHT,
        Direction::Up => &MOVE_UP,
        Direction::Down => &MOVE_DOWN,
    };
    table.get(from.index()).copied().flatten()
}

/// Cage unlocking step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ArmState {
    #[default]
    None,
    /// Brandishing the key
    Up,
    /// Key inserted
    Down,
}

/// Fall step after a missed key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FallState {
    #[default]
    None,
    Up,
    Down,
}

/// Read-only view of the avatar handed to the enemy lanes and the fruit
pub trait PostureQuery {
    fn posture(&self) -> Posture;
    fn previous_posture(&self) -> Posture;
    /// Frame of the last posture event (jump start, grab, unlock step...)
    fn event_timer(&self) -> Frame;
}

/// The avatar automaton
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Avatar {
    posture: Posture,
    previous: Posture,
    arm: ArmState,
    fall: FallState,
    /// Frame of the last return to the starting posture
    origin: Frame,
    /// Frame of the last posture event
    timer: Frame,
}

impl Default for Avatar {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Avatar {
    pub fn new(now: Frame) -> Self {
        Self {
            posture: Bottom1,
            previous: Bottom1,
            arm: ArmState::None,
            fall: FallState::None,
            origin: now,
            timer: now,
        }
    }

    /// Back to the bottom-left starting posture
    pub fn reset_to_origin(&mut self, now: Frame) {
        self.arm = ArmState::None;
        self.fall = FallState::None;
        self.previous = self.posture;
        self.posture = Bottom1;
        self.origin = now;
        self.timer = now;
    }

    /// Apply a directional move. Returns false (and changes nothing) when the
    /// table forbids it.
    pub fn move_in(&mut self, direction: Direction, now: Frame) -> bool {
        let Some(next) = next_posture(direction, self.posture) else {
            return false;
        };
        self.previous = self.posture;
        self.posture = next;
        if next.is_jump() {
            self.timer = now;
        }
        true
    }

    /// Leap for the key
    pub fn attempt_grab_key(&mut self, now: Frame) {
        self.force(GrabKey, now);
    }

    /// Enter an unlocking step (called with `Up`, then `Down`)
    pub fn begin_unlock(&mut self, arm: ArmState, now: Frame) {
        self.arm = arm;
        self.force(Unlock, now);
    }

    /// Slide back down after a successful unlock
    pub fn begin_descent(&mut self, now: Frame) {
        self.arm = ArmState::None;
        self.force(ComeDown, now);
    }

    /// Enter a fall step after a missed key
    pub fn begin_fall(&mut self, fall: FallState, now: Frame) {
        self.fall = fall;
        match fall {
            FallState::Up => self.force(Fall1, now),
            FallState::Down => self.force(Fall2, now),
            FallState::None => {}
        }
    }

    fn force(&mut self, posture: Posture, now: Frame) {
        self.previous = self.posture;
        self.posture = posture;
        self.timer = now;
    }

    pub fn origin_timestamp(&self) -> Frame {
        self.origin
    }

    pub fn arm_state(&self) -> ArmState {
        self.arm
    }

    pub fn fall_state(&self) -> FallState {
        self.fall
    }

    pub fn is_jumping(&self) -> bool {
        self.posture.is_jump()
    }

    pub fn is_grabbing(&self) -> bool {
        self.posture == GrabKey
    }

    pub fn is_unlocking(&self) -> bool {
        self.posture == Unlock
    }

    pub fn has_arm_up(&self) -> bool {
        self.arm == ArmState::Up
    }

    pub fn has_arm_down(&self) -> bool {
        self.arm == ArmState::Down
    }

    pub fn is_descending(&self) -> bool {
        self.posture == ComeDown
    }

    pub fn is_falling(&self) -> bool {
        self.fall != FallState::None
    }

    pub fn is_falling_up(&self) -> bool {
        self.fall == FallState::Up
    }

    pub fn is_falling_down(&self) -> bool {
        self.fall == FallState::Down
    }

    /// Unlocking, descending or falling: enemies and input leave it alone
    pub fn is_busy(&self) -> bool {
        self.is_unlocking() || self.is_descending() || self.is_falling()
    }
}

impl PostureQuery for Avatar {
    fn posture(&self) -> Posture {
        self.posture
    }

    fn previous_posture(&self) -> Posture {
        self.previous
    }

    fn event_timer(&self) -> Frame {
        self.timer
    }
}
