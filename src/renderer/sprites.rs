//! Sprite table of the LCD segments
//!
//! Coordinates are shared by the spritesheet and the screen.

use super::Sprite;

const INK: u16 = 0x0000;
const BLUE: u16 = 0x1f00;
const GOLD: u16 = 0xe0fe;
const AMBER: u16 = 0x60fe;
const OCHRE: u16 = 0x40fc;
const GREEN: u16 = 0x3f8a;
const RED: u16 = 0x00f8;
const FRUIT: u16 = 0xe007;

/// Labels: GAME A, GAME B, MISS
pub static INFO: [Sprite; 3] = [
    Sprite::new(92, 3, 23, 5, INK),
    Sprite::new(92, 13, 23, 5, INK),
    Sprite::new(108, 23, 15, 5, INK),
];

/// Miss marks, one per lost life
pub static HEADS: [Sprite; 3] = [
    Sprite::new(126, 20, 9, 11, INK),
    Sprite::new(136, 20, 9, 11, INK),
    Sprite::new(146, 20, 9, 11, INK),
];

pub static MARIO: Sprite = Sprite::new(5, 49, 13, 19, BLUE);

/// Key swing frames
pub static KEYS: [Sprite; 4] = [
    Sprite::new(51, 11, 6, 20, GOLD),
    Sprite::new(58, 9, 5, 22, GOLD),
    Sprite::new(62, 11, 8, 17, AMBER),
    Sprite::new(65, 9, 13, 14, OCHRE),
];

pub static CAGE: [Sprite; 4] = [
    Sprite::new(18, 3, 12, 18, BLUE),
    Sprite::new(3, 3, 12, 18, BLUE),
    Sprite::new(3, 24, 12, 17, INK),
    Sprite::new(18, 24, 19, 17, BLUE),
];

/// Captive's face once every part is open
pub static SMILE: Sprite = Sprite::new(12, 15, 9, 8, INK);

/// Fruit at each stage of its drop
pub static FRUITS: [Sprite; 4] = [
    Sprite::new(83, 29, 9, 11, FRUIT),
    Sprite::new(83, 45, 7, 19, FRUIT),
    Sprite::new(82, 78, 9, 16, FRUIT),
    Sprite::new(81, 101, 9, 12, FRUIT),
];

/// Avatar, indexed by posture
pub static JUNIOR: [Sprite; 26] = [
    // Bottom floor
    Sprite::new(17, 102, 19, 21, INK),
    Sprite::new(42, 104, 18, 19, INK),
    Sprite::new(62, 103, 20, 20, INK),
    Sprite::new(87, 103, 19, 20, INK),
    Sprite::new(109, 104, 21, 19, INK),
    Sprite::new(130, 104, 18, 19, INK),
    // Bottom hangs and jumps
    Sprite::new(20, 84, 16, 19, GREEN),
    Sprite::new(42, 85, 19, 20, GREEN),
    Sprite::new(67, 84, 13, 19, INK),
    Sprite::new(91, 85, 13, 18, INK),
    Sprite::new(110, 83, 18, 21, INK),
    Sprite::new(132, 82, 18, 21, INK),
    // Top floor
    Sprite::new(131, 56, 19, 19, INK),
    Sprite::new(108, 56, 20, 19, INK),
    Sprite::new(88, 55, 19, 20, INK),
    Sprite::new(66, 53, 18, 21, INK),
    // Top hangs and jumps
    Sprite::new(113, 38, 13, 19, GREEN),
    Sprite::new(89, 35, 19, 21, GREEN),
    Sprite::new(67, 35, 20, 17, INK),
    // Key grab, unlock arm, falls
    Sprite::new(50, 30, 19, 29, GREEN),
    Sprite::new(37, 14, 12, 22, GREEN),
    Sprite::new(44, 2, 10, 18, INK),
    Sprite::new(32, 14, 7, 13, INK),
    Sprite::new(32, 37, 20, 27, INK),
    Sprite::new(11, 63, 24, 24, INK),
    Sprite::new(2, 90, 13, 26, INK),
];

/// Snapjaw lane cells
pub static CROCS: [Sprite; 13] = [
    Sprite::new(38, 66, 10, 10, RED),
    Sprite::new(57, 67, 8, 10, RED),
    Sprite::new(80, 66, 10, 9, RED),
    Sprite::new(103, 67, 9, 8, RED),
    Sprite::new(124, 66, 10, 9, RED),
    Sprite::new(148, 66, 8, 11, RED),
    Sprite::new(145, 106, 11, 18, RED),
    Sprite::new(123, 115, 10, 8, RED),
    Sprite::new(104, 114, 10, 9, RED),
    Sprite::new(81, 115, 10, 8, RED),
    Sprite::new(57, 114, 10, 9, RED),
    Sprite::new(35, 115, 10, 8, RED),
    Sprite::new(12, 116, 11, 7, RED),
];

/// Bird lane cells
pub static BIRDS: [Sprite; 8] = [
    Sprite::new(2, 74, 8, 12, RED),
    Sprite::new(13, 88, 11, 9, RED),
    Sprite::new(35, 88, 11, 9, RED),
    Sprite::new(58, 92, 11, 9, RED),
    Sprite::new(81, 91, 10, 10, RED),
    Sprite::new(104, 91, 10, 8, RED),
    Sprite::new(125, 88, 10, 9, RED),
    Sprite::new(147, 80, 11, 10, RED),
];
