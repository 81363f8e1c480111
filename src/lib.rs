//! Junior Watch - a single-screen LCD arcade climber
//!
//! Core modules:
//! - `sim`: Frame-synchronized simulation (avatar, enemy lanes, fruit, score, orchestrator)
//! - `audio`: Cue scheduling and synth back-ends
//! - `renderer`: Sliced framebuffer and sprite descriptors
//! - `platform`: Frame clock, input latching, browser binding
//! - `persistence`: Score slots (current, best A, best B)
//! - `settings`: User preferences

pub mod audio;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use audio::{AudioService, Buzzer, Cue};
pub use persistence::{MemoryStore, ScoreStore, Slot};
pub use settings::Settings;
pub use sim::{Game, GameMode, GameType, TickInput};

/// Frame counter value. Every timer in the simulation is a delta between two of these.
pub type Frame = u64;

/// Game configuration constants
pub mod consts {
    /// Nominal display rate (frames per second)
    pub const FRAME_RATE: u32 = 25;

    /// LCD dimensions in pixels
    pub const SCREEN_WIDTH: u32 = 160;
    pub const SCREEN_HEIGHT: u32 = 128;
    /// Height of one horizontal band rendered at a time
    pub const SLICE_HEIGHT: u32 = 8;
    /// Number of bands per frame
    pub const SLICE_COUNT: u32 = SCREEN_HEIGHT / SLICE_HEIGHT;

    /// Score counter digits
    pub const DIGIT_WIDTH: u32 = 5;
    pub const DIGIT_HEIGHT: u32 = 9;
    /// Gap between two digits
    pub const DIGIT_OFFSET: u32 = 2;
    /// Right edge anchor of the counter (x of the units digit)
    pub const DIGIT_RIGHT_X: u32 = 149;
    pub const DIGIT_TOP_Y: u32 = 6;
    /// Width of the digit strip (0-9 side by side)
    pub const DIGIT_SHEET_WIDTH: u32 = 10 * DIGIT_WIDTH;
}

/// True on frames inside the lit half of the blink cycle (half a second on, half off)
#[inline]
pub fn blink_on(frame: Frame) -> bool {
    let rate = consts::FRAME_RATE as Frame;
    frame % rate < rate / 2
}

/// Every `period` frames (`period` of zero is treated as one)
#[inline]
pub fn on_beat(frame: Frame, period: u32) -> bool {
    frame % Frame::from(period.max(1)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blink_cycle() {
        assert!(blink_on(0));
        assert!(blink_on(11));
        assert!(!blink_on(12));
        assert!(!blink_on(24));
        assert!(blink_on(25));
    }

    #[test]
    fn test_on_beat_guards_zero_period() {
        assert!(on_beat(7, 0));
        assert!(on_beat(12, 4));
        assert!(!on_beat(13, 4));
    }
}
