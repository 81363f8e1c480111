//! Avatar/enemy contact tables
//!
//! Two families of lookups:
//! - standing contact: which posture an enemy bites when it steps onto lane cell `i`
//! - moving contact: which lane cell the avatar would walk into with a sideways move

use super::avatar::{CONTROLLABLE_POSTURES, Direction, Posture};
use super::lanes::LaneKind;

use Posture::*;

/// Posture bitten by a snapjaw standing in cell `i`
const BITTEN_BY_SNAPJAW: [Option<Posture>; 13] = [
    None,          // 0
    Some(Top4),    // 1
    Some(Top3),    // 2
    Some(Top2),    // 3
    Some(Top1),    // 4
    None,          // 5
    Some(Bottom6), // 6
    Some(Bottom5), // 7
    Some(Bottom4), // 8
    Some(Bottom3), // 9
    Some(Bottom2), // 10
    Some(Bottom1), // 11
    None,          // 12
];

/// Posture bitten by a bird standing in cell `i`
const BITTEN_BY_BIRD: [Option<Posture>; 8] = [
    None,              // 0
    Some(BottomJump1), // 1
    Some(BottomJump2), // 2
    Some(BottomJump3), // 3
    Some(BottomJump4), // 4
    Some(BottomJump5), // 5
    Some(BottomJump6), // 6
    None,              // 7
];

const SNAPJAW_WHEN_MOVE_LEFT: [Option<usize>; CONTROLLABLE_POSTURES] = [
    None,     // Bottom1
    Some(11), // Bottom2
    Some(10), // Bottom3
    Some(9),  // Bottom4
    Some(8),  // Bottom5
    Some(7),  // Bottom6
    None,     // BottomJump1
    None,     // BottomJump2
    None,     // BottomJump3
    None,     // BottomJump4
    None,     // BottomJump5
    None,     // BottomJump6
    Some(4),  // Top1
    Some(3),  // Top2
    Some(2),  // Top3
    None,     // Top4
    None,     // TopJump1
    None,     // TopJump2
    None,     // TopJump3
];

const SNAPJAW_WHEN_MOVE_RIGHT: [Option<usize>; CONTROLLABLE_POSTURES] = [
    Some(11), // Bottom1
    Some(10), // Bottom2
    Some(9),  // Bottom3
    Some(8),  // Bottom4
    Some(7),  // Bottom5
    None,     // Bottom6
    None,     // BottomJump1
    None,     // BottomJump2
    None,     // BottomJump3
    None,     // BottomJump4
    None,     // BottomJump5
    None,     // BottomJump6
    None,     // Top1
    Some(4),  // Top2
    Some(3),  // Top3
    Some(2),  // Top4
    None,     // TopJump1
    None,     // TopJump2
    None,     // TopJump3
];

const BIRD_WHEN_MOVE_LEFT: [Option<usize>; CONTROLLABLE_POSTURES] = [
    None,    // Bottom1
    None,    // Bottom2
    None,    // Bottom3
    None,    // Bottom4
    None,    // Bottom5
    None,    // Bottom6
    None,    // BottomJump1
    Some(2), // BottomJump2
    Some(3), // BottomJump3
    Some(4), // BottomJump4
    Some(5), // BottomJump5
    Some(6), // BottomJump6
    None,    // Top1
    None,    // Top2
    None,    // Top3
    None,    // Top4
    None,    // TopJump1
    None,    // TopJump2
    None,    // TopJump3
];

const BIRD_WHEN_MOVE_RIGHT: [Option<usize>; CONTROLLABLE_POSTURES] = [
    None,    // Bottom1
    None,    // Bottom2
    None,    // Bottom3
    None,    // Bottom4
    None,    // Bottom5
    None,    // Bottom6
    Some(2), // BottomJump1
    Some(3), // BottomJump2
    Some(4), // BottomJump3
    Some(5), // BottomJump4
    Some(6), // BottomJump5
    None,    // BottomJump6
    None,    // Top1
    None,    // Top2
    None,    // Top3
    None,    // Top4
    None,    // TopJump1
    None,    // TopJump2
    None,    // TopJump3
];

/// Does an enemy of `kind` standing in cell `index` bite an avatar in `posture`?
pub fn bites_at(kind: LaneKind, index: usize, posture: Posture) -> bool {
    let table: &[Option<Posture>] = match kind {
        LaneKind::Birds => &BITTEN_BY_BIRD,
        LaneKind::Snapjaws => &BITTEN_BY_SNAPJAW,
    };
    table.get(index).copied().flatten() == Some(posture)
}

/// Lane cell of `kind` the avatar crosses when moving sideways from `from`.
/// Vertical moves never cross a lane.
pub fn cell_crossed(kind: LaneKind, from: Posture, direction: Direction) -> Option<usize> {
    let table = match (kind, direction) {
        (LaneKind::Birds, Direction::Left) => &BIRD_WHEN_MOVE_LEFT,
        (LaneKind::Birds, Direction::Right) => &BIRD_WHEN_MOVE_RIGHT,
        (LaneKind::Snapjaws, Direction::Left) => &SNAPJAW_WHEN_MOVE_LEFT,
        (LaneKind::Snapjaws, Direction::Right) => &SNAPJAW_WHEN_MOVE_RIGHT,
        (_, Direction::Up | Direction::Down) => return None,
    };
    table.get(from.index()).copied().flatten()
}
