//! Browser binding
//!
//! The page owns the canvas and the animation loop; it feeds timestamps and
//! key events in and blits `pixels()` (RGB565) after every redraw.

use wasm_bindgen::prelude::*;

use super::{Button, FrameClock, InputLatch};
use crate::audio::{AudioService, Buzzer, WebSynth};
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::persistence::LocalStore;
use crate::renderer::{Colormaps, FrameImage, SheetRenderer, SlicedFramebuffer};
use crate::settings::Settings;
use crate::sim::Game;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"logger already initialised".into());
    }
    log::info!("Junior Watch (web) starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    game: Game<Buzzer<WebSynth>, LocalStore>,
    renderer: SheetRenderer,
    framebuffer: SlicedFramebuffer,
    image: FrameImage,
    clock: FrameClock,
    latch: InputLatch,
    settings: Settings,
    /// Muted because the page lost focus
    blur_muted: bool,
}

#[wasm_bindgen]
impl WebGame {
    /// Build the console from the four RGB565 colormaps
    #[wasm_bindgen(constructor)]
    pub fn new(
        stage: Vec<u16>,
        boot_stage: Vec<u16>,
        spritesheet: Vec<u16>,
        digits: Vec<u16>,
    ) -> Result<WebGame, JsValue> {
        let renderer = SheetRenderer::new(Colormaps {
            stage,
            boot_stage,
            spritesheet,
            digits,
        })
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let settings = Settings::load();
        let mut synth = WebSynth::new();
        synth.set_master_volume(settings.master_volume);
        synth.set_sfx_volume(settings.sfx_volume);
        let mut audio = Buzzer::new(synth);
        audio.set_muted(settings.muted);

        Ok(Self {
            game: Game::new(audio, LocalStore::load()),
            renderer,
            framebuffer: SlicedFramebuffer::new(),
            image: FrameImage::default(),
            clock: FrameClock::new(),
            latch: InputLatch::default(),
            settings,
            blur_muted: false,
        })
    }

    /// Animation frame callback. Returns true when the screen changed.
    pub fn frame(&mut self, time_ms: f64) -> bool {
        let steps = self.clock.advance(time_ms);
        for _ in 0..steps {
            let frame = self.clock.next_frame();
            let input = self.latch.latch();
            self.game.tick(frame, &input);
        }
        if steps == 0 {
            return false;
        }

        self.sync_mute();

        let game = &self.game;
        let renderer = &self.renderer;
        self.framebuffer.draw(
            |slice_y, buffer| game.draw_on_slice(slice_y, buffer, renderer),
            &mut self.image,
        );
        true
    }

    /// Returns true when the key is mapped (the page should swallow it)
    pub fn key_down(&mut self, key: &str) -> bool {
        match Button::from_key(key) {
            Some(button) => {
                self.latch.press(button);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(button) = Button::from_key(key) {
            self.latch.release(button);
        }
    }

    /// Page hidden or window blurred
    pub fn blur(&mut self) {
        self.latch.release_all();
        self.clock.suspend();
        if self.settings.mute_on_blur && !self.game.audio().is_muted() {
            self.game.audio_mut().set_muted(true);
            self.blur_muted = true;
        }
    }

    pub fn focus(&mut self) {
        if std::mem::take(&mut self.blur_muted) {
            self.game.audio_mut().set_muted(false);
        }
    }

    /// Last rendered frame, row-major RGB565
    pub fn pixels(&self) -> Vec<u16> {
        self.image.pixels().to_vec()
    }

    pub fn width(&self) -> u32 {
        SCREEN_WIDTH
    }

    pub fn height(&self) -> u32 {
        SCREEN_HEIGHT
    }

    pub fn set_master_volume(&mut self, volume: f32) {
        self.settings.master_volume = volume.clamp(0.0, 1.0);
        self.game
            .audio_mut()
            .synth_mut()
            .set_master_volume(self.settings.master_volume);
        self.save_settings();
    }

    pub fn set_sfx_volume(&mut self, volume: f32) {
        self.settings.sfx_volume = volume.clamp(0.0, 1.0);
        self.game
            .audio_mut()
            .synth_mut()
            .set_sfx_volume(self.settings.sfx_volume);
        self.save_settings();
    }
}

impl WebGame {
    /// Persist the in-game mute toggle (not a blur mute)
    fn sync_mute(&mut self) {
        if self.blur_muted {
            return;
        }
        let muted = self.game.audio().is_muted();
        if muted != self.settings.muted {
            self.settings.muted = muted;
            self.save_settings();
        }
    }

    fn save_settings(&self) {
        if let Err(e) = self.settings.save() {
            log::warn!("Failed to save settings: {}", e);
        }
    }
}
