//! Platform abstraction layer
//!
//! Handles host differences for:
//! - Time (fixed-rate frame clock over a variable display refresh)
//! - Input (held keys latched into pressed-this-frame buttons)
//! - The browser binding (canvas pixels, LocalStorage, Web Audio)

use crate::Frame;
use crate::consts::FRAME_RATE;
use crate::sim::TickInput;

/// Microseconds per simulated frame
pub const FRAME_MICROS: u64 = 1_000_000 / FRAME_RATE as u64;
/// Most frames simulated for one display refresh (after a stall)
pub const MAX_CATCHUP: u32 = 4;

/// Turns host timestamps into whole simulation frames
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: u64,
    last_time: Option<f64>,
    frame: Frame,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames elapsed so far
    pub fn frame(&self) -> Frame {
        self.frame
    }

    /// Feed a host timestamp in milliseconds; returns the frames to simulate now
    pub fn advance(&mut self, time_ms: f64) -> u32 {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) * 1000.0).max(0.0) as u64,
            None => FRAME_MICROS,
        };
        self.last_time = Some(time_ms);

        self.accumulator = (self.accumulator + dt).min(FRAME_MICROS * u64::from(MAX_CATCHUP));
        let steps = self.accumulator / FRAME_MICROS;
        self.accumulator %= FRAME_MICROS;
        steps as u32
    }

    /// Next frame number to hand to the simulation
    pub fn next_frame(&mut self) -> Frame {
        self.frame += 1;
        self.frame
    }

    /// Forget the last timestamp (tab hidden, window blurred)
    pub fn suspend(&mut self) {
        self.last_time = None;
        self.accumulator = 0;
    }
}

/// Console buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Left,
    Right,
    Up,
    Down,
    Primary,
    Secondary,
    Menu,
}

impl Button {
    pub const ALL: [Button; 7] = [
        Button::Left,
        Button::Right,
        Button::Up,
        Button::Down,
        Button::Primary,
        Button::Secondary,
        Button::Menu,
    ];

    /// Keyboard mapping (DOM `KeyboardEvent.key` names)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Button::Left),
            "ArrowRight" | "d" | "D" => Some(Button::Right),
            "ArrowUp" | "w" | "W" => Some(Button::Up),
            "ArrowDown" | "s" | "S" => Some(Button::Down),
            " " | "Enter" | "j" | "J" => Some(Button::Primary),
            "k" | "K" | "m" | "M" => Some(Button::Secondary),
            "Escape" | "Tab" => Some(Button::Menu),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Edge detector: a held button counts as pressed on one frame only
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    held: u8,
    /// Down edges since the last latch (a quick tap survives its release)
    edges: u8,
}

impl InputLatch {
    pub fn press(&mut self, button: Button) {
        if self.held & button.bit() == 0 {
            self.edges |= button.bit();
        }
        self.held |= button.bit();
    }

    pub fn release(&mut self, button: Button) {
        self.held &= !button.bit();
    }

    /// Drop every held button (focus lost)
    pub fn release_all(&mut self) {
        self.held = 0;
        self.edges = 0;
    }

    pub fn is_held(&self, button: Button) -> bool {
        self.held & button.bit() != 0
    }

    /// Buttons that went down since the previous call
    pub fn latch(&mut self) -> TickInput {
        let pressed = std::mem::take(&mut self.edges);
        let on = |button: Button| pressed & button.bit() != 0;
        TickInput {
            left: on(Button::Left),
            right: on(Button::Right),
            up: on(Button::Up),
            down: on(Button::Down),
            primary: on(Button::Primary),
            secondary: on(Button::Secondary),
            menu: on(Button::Menu),
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_runs_at_frame_rate() {
        let mut clock = FrameClock::new();
        // First timestamp always yields one frame
        assert_eq!(clock.advance(0.0), 1);
        // 60 Hz refresh: 25 frames per 60 refreshes
        let steps: u32 = (1..=60).map(|i| clock.advance(i as f64 * 1000.0 / 60.0)).sum();
        assert!((24..=26).contains(&steps), "{steps}");
    }

    #[test]
    fn test_clock_caps_catch_up() {
        let mut clock = FrameClock::new();
        clock.advance(0.0);
        assert_eq!(clock.advance(5_000.0), MAX_CATCHUP);
        assert_eq!(clock.advance(5_001.0), 0);
    }

    #[test]
    fn test_clock_frames_are_monotonic() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.next_frame(), 1);
        assert_eq!(clock.next_frame(), 2);
        assert_eq!(clock.frame(), 2);
    }

    #[test]
    fn test_held_button_fires_once() {
        let mut latch = InputLatch::default();
        latch.press(Button::Primary);
        assert!(latch.latch().primary);
        assert!(!latch.latch().primary);
        assert!(latch.is_held(Button::Primary));

        latch.release(Button::Primary);
        latch.press(Button::Primary);
        assert!(latch.latch().primary);
    }

    #[test]
    fn test_quick_tap_is_not_lost() {
        let mut latch = InputLatch::default();
        latch.press(Button::Left);
        latch.release(Button::Left);
        let input = latch.latch();
        assert!(input.left);
        assert!(!input.right);
        assert!(!latch.latch().any());
    }

    #[test]
    fn test_key_mapping() {
        assert_eq!(Button::from_key("ArrowUp"), Some(Button::Up));
        assert_eq!(Button::from_key(" "), Some(Button::Primary));
        assert_eq!(Button::from_key("m"), Some(Button::Secondary));
        assert_eq!(Button::from_key("q"), None);
        assert_eq!(Button::ALL.len(), 7);
    }
}
