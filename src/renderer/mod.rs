//! LCD rendering module
//!
//! The screen is drawn one horizontal band at a time into two alternating
//! band buffers (RGB565). The game decides which sprites are lit; a
//! [`SliceRenderer`] turns that into pixels:
//! - the stage is copied row for row from a full-screen colormap
//! - a sprite is a rectangle on the spritesheet plus the colour key that
//!   marks its own pixels there (sprites overlap on the sheet)
//! - counter digits are copied from a strip of ten glyphs

pub mod sprites;

use std::ops::Range;

use glam::UVec2;
use thiserror::Error;

use crate::consts::*;

/// Lit LCD segment colour
pub const INK: u16 = 0x0000;

/// Pixels in one band
pub const SLICE_PIXELS: usize = (SCREEN_WIDTH * SLICE_HEIGHT) as usize;
/// Pixels on the whole screen
pub const SCREEN_PIXELS: usize = (SCREEN_WIDTH * SCREEN_HEIGHT) as usize;

/// A rectangle on the spritesheet and the colour key of its pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    /// Top-left corner (same on the sheet and on screen)
    pub origin: UVec2,
    pub size: UVec2,
    /// Sheet colour that belongs to this sprite
    pub color: u16,
}

impl Sprite {
    pub const fn new(x: u32, y: u32, width: u32, height: u32, color: u16) -> Self {
        Self {
            origin: UVec2::new(x, y),
            size: UVec2::new(width, height),
            color,
        }
    }

    /// Screen rows of this sprite inside the band starting at `slice_y`
    pub fn rows_in_slice(&self, slice_y: u32) -> Option<Range<u32>> {
        rows_in_slice(self.origin.y, self.size.y, slice_y)
    }

    pub fn columns(&self) -> Range<u32> {
        self.origin.x..self.origin.x + self.size.x
    }
}

/// Intersection of rows `top..top + height` with the band at `slice_y`
fn rows_in_slice(top: u32, height: u32, slice_y: u32) -> Option<Range<u32>> {
    let start = top.max(slice_y);
    let end = (top + height).min(slice_y + SLICE_HEIGHT);
    (start < end).then_some(start..end)
}

/// Background variant
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// LCD warm-up (every segment lit)
    Boot,
    Play,
}

/// Pixel-level drawing into one band buffer
pub trait SliceRenderer {
    /// Overwrite the band with the stage background
    fn draw_stage(&self, stage: Stage, slice_y: u32, buffer: &mut [u16]);

    /// Ink the sprite's pixels that fall inside the band
    fn draw_sprite(&self, sprite: &Sprite, slice_y: u32, buffer: &mut [u16]);

    /// Draw counter digit `digit` at `position` places left of the units digit
    fn draw_digit(&self, digit: u8, position: u32, slice_y: u32, buffer: &mut [u16]);
}

/// Destination of finished bands (display transfer, canvas upload...)
pub trait SliceSink {
    fn send(&mut self, slice_y: u32, pixels: &[u16]);
}

/// Two band buffers used alternately: one is filled while the other is sent
#[derive(Debug, Clone)]
pub struct SlicedFramebuffer {
    buffers: [Vec<u16>; 2],
}

impl Default for SlicedFramebuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SlicedFramebuffer {
    pub fn new() -> Self {
        Self {
            buffers: [vec![0; SLICE_PIXELS], vec![0; SLICE_PIXELS]],
        }
    }

    /// Render every band top to bottom: `draw_slice(slice_y, buffer)` fills a
    /// band, then it goes to `sink`
    pub fn draw<F, K>(&mut self, mut draw_slice: F, sink: &mut K)
    where
        F: FnMut(u32, &mut [u16]),
        K: SliceSink + ?Sized,
    {
        for index in 0..SLICE_COUNT {
            let buffer = &mut self.buffers[(index % 2) as usize];
            let slice_y = index * SLICE_HEIGHT;
            draw_slice(slice_y, buffer);
            sink.send(slice_y, buffer);
        }
    }
}

/// Sink that assembles a full-screen image
#[derive(Debug, Clone)]
pub struct FrameImage {
    pixels: Vec<u16>,
}

impl Default for FrameImage {
    fn default() -> Self {
        Self {
            pixels: vec![0; SCREEN_PIXELS],
        }
    }
}

impl FrameImage {
    pub fn pixels(&self) -> &[u16] {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<u16> {
        self.pixels.get((y * SCREEN_WIDTH + x) as usize).copied()
    }
}

impl SliceSink for FrameImage {
    fn send(&mut self, slice_y: u32, pixels: &[u16]) {
        let start = (slice_y * SCREEN_WIDTH) as usize;
        let end = (start + pixels.len()).min(self.pixels.len());
        self.pixels[start..end].copy_from_slice(&pixels[..end - start]);
    }
}

/// Colormap with the wrong dimensions
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{name} colormap has {actual} pixels, expected {expected}")]
pub struct AssetError {
    pub name: &'static str,
    pub expected: usize,
    pub actual: usize,
}

fn check(name: &'static str, map: &[u16], expected: usize) -> Result<(), AssetError> {
    if map.len() == expected {
        Ok(())
    } else {
        Err(AssetError {
            name,
            expected,
            actual: map.len(),
        })
    }
}

/// Colormaps for the [`SheetRenderer`], all RGB565, row-major
#[derive(Debug, Clone, Default)]
pub struct Colormaps {
    /// Full-screen play background
    pub stage: Vec<u16>,
    /// Full-screen warm-up background
    pub boot_stage: Vec<u16>,
    /// Full-screen colour-keyed spritesheet
    pub spritesheet: Vec<u16>,
    /// `DIGIT_SHEET_WIDTH x DIGIT_HEIGHT` strip of digits 0-9
    pub digits: Vec<u16>,
}

/// Software [`SliceRenderer`] over in-memory colormaps
#[derive(Debug, Clone)]
pub struct SheetRenderer {
    maps: Colormaps,
}

impl SheetRenderer {
    pub fn new(maps: Colormaps) -> Result<Self, AssetError> {
        check("stage", &maps.stage, SCREEN_PIXELS)?;
        check("boot stage", &maps.boot_stage, SCREEN_PIXELS)?;
        check("spritesheet", &maps.spritesheet, SCREEN_PIXELS)?;
        check(
            "digits",
            &maps.digits,
            (DIGIT_SHEET_WIDTH * DIGIT_HEIGHT) as usize,
        )?;
        Ok(Self { maps })
    }
}

impl SliceRenderer for SheetRenderer {
    fn draw_stage(&self, stage: Stage, slice_y: u32, buffer: &mut [u16]) {
        let map = match stage {
            Stage::Boot => &self.maps.boot_stage,
            Stage::Play => &self.maps.stage,
        };
        let start = (slice_y * SCREEN_WIDTH) as usize;
        let len = buffer.len().min(map.len().saturating_sub(start));
        buffer[..len].copy_from_slice(&map[start..start + len]);
    }

    fn draw_sprite(&self, sprite: &Sprite, slice_y: u32, buffer: &mut [u16]) {
        let Some(rows) = sprite.rows_in_slice(slice_y) else {
            return;
        };
        for py in rows {
            let src = py * SCREEN_WIDTH;
            let dst = (py - slice_y) * SCREEN_WIDTH;
            for px in sprite.columns() {
                if self.maps.spritesheet.get((src + px) as usize) == Some(&sprite.color) {
                    if let Some(pixel) = buffer.get_mut((dst + px) as usize) {
                        *pixel = INK;
                    }
                }
            }
        }
    }

    fn draw_digit(&self, digit: u8, position: u32, slice_y: u32, buffer: &mut [u16]) {
        let Some(dx) = DIGIT_RIGHT_X.checked_sub(position * (DIGIT_WIDTH + DIGIT_OFFSET)) else {
            return;
        };
        let Some(rows) = rows_in_slice(DIGIT_TOP_Y, DIGIT_HEIGHT, slice_y) else {
            return;
        };
        let glyph_x = u32::from(digit.min(9)) * DIGIT_WIDTH;
        let width = DIGIT_WIDTH as usize;
        for py in rows {
            let src = ((py - DIGIT_TOP_Y) * DIGIT_SHEET_WIDTH + glyph_x) as usize;
            let dst = ((py - slice_y) * SCREEN_WIDTH + dx) as usize;
            if let (Some(from), Some(to)) = (
                self.maps.digits.get(src..src + width),
                buffer.get_mut(dst..dst + width),
            ) {
                to.copy_from_slice(from);
            }
        }
    }
}

/// Decimal digits of `value`, most significant first
pub fn counter_digits(value: u32) -> Vec<u8> {
    value
        .to_string()
        .bytes()
        .map(|b| b - b'0')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: u16 = 0x00f8;

    fn maps() -> Colormaps {
        let mut spritesheet = vec![0xffff; SCREEN_PIXELS];
        // 3x3 sprite at (10, 6), with one pixel keyed to another sprite
        for y in 6..9 {
            for x in 10..13 {
                spritesheet[(y * SCREEN_WIDTH + x) as usize] = KEY;
            }
        }
        spritesheet[(7 * SCREEN_WIDTH + 11) as usize] = 0x1f00;

        let digits = (0..DIGIT_SHEET_WIDTH * DIGIT_HEIGHT)
            .map(|i| ((i % DIGIT_SHEET_WIDTH) / DIGIT_WIDTH) as u16)
            .collect();

        Colormaps {
            stage: vec![0xffff; SCREEN_PIXELS],
            boot_stage: vec![0x0000; SCREEN_PIXELS],
            spritesheet,
            digits,
        }
    }

    #[test]
    fn test_rejects_wrong_sizes() {
        let mut bad = maps();
        bad.digits.pop();
        let err = SheetRenderer::new(bad).unwrap_err();
        assert_eq!(err.name, "digits");
    }

    #[test]
    fn test_sprite_band_intersection() {
        let sprite = Sprite::new(10, 6, 3, 3, KEY);
        assert_eq!(sprite.rows_in_slice(0), Some(6..8));
        assert_eq!(sprite.rows_in_slice(8), Some(8..9));
        assert_eq!(sprite.rows_in_slice(16), None);
    }

    #[test]
    fn test_sprite_is_colour_keyed() {
        let renderer = SheetRenderer::new(maps()).expect("maps");
        let sprite = Sprite::new(10, 6, 3, 3, KEY);
        let mut frame = FrameImage::default();
        SlicedFramebuffer::new().draw(
            |slice_y, buffer| {
                renderer.draw_stage(Stage::Play, slice_y, buffer);
                renderer.draw_sprite(&sprite, slice_y, buffer);
            },
            &mut frame,
        );
        assert_eq!(frame.pixel(10, 6), Some(INK));
        assert_eq!(frame.pixel(12, 8), Some(INK));
        // Pixel owned by another sprite stays clear
        assert_eq!(frame.pixel(11, 7), Some(0xffff));
        assert_eq!(frame.pixel(13, 6), Some(0xffff));
        assert_eq!(frame.pixel(10, 9), Some(0xffff));
    }

    #[test]
    fn test_digits_are_right_aligned() {
        let renderer = SheetRenderer::new(maps()).expect("maps");
        let mut frame = FrameImage::default();
        SlicedFramebuffer::new().draw(
            |slice_y, buffer| {
                renderer.draw_stage(Stage::Play, slice_y, buffer);
                for (i, digit) in [4u8, 2].iter().enumerate() {
                    renderer.draw_digit(*digit, 1 - i as u32, slice_y, buffer);
                }
            },
            &mut frame,
        );
        // Units digit starts at the right anchor, tens one glyph plus gap to the left
        assert_eq!(frame.pixel(DIGIT_RIGHT_X, DIGIT_TOP_Y), Some(2));
        assert_eq!(
            frame.pixel(DIGIT_RIGHT_X - DIGIT_WIDTH - DIGIT_OFFSET, DIGIT_TOP_Y + 8),
            Some(4)
        );
        assert_eq!(frame.pixel(DIGIT_RIGHT_X, DIGIT_TOP_Y + DIGIT_HEIGHT), Some(0xffff));
    }

    #[test]
    fn test_boot_stage_fills_every_band() {
        let renderer = SheetRenderer::new(maps()).expect("maps");
        let mut frame = FrameImage::default();
        frame.send(0, &[0xffff; SLICE_PIXELS]);
        SlicedFramebuffer::new().draw(
            |slice_y, buffer| renderer.draw_stage(Stage::Boot, slice_y, buffer),
            &mut frame,
        );
        assert!(frame.pixels().iter().all(|p| *p == 0x0000));
    }

    #[test]
    fn test_counter_digits() {
        assert_eq!(counter_digits(0), vec![0]);
        assert_eq!(counter_digits(907), vec![9, 0, 7]);
    }
}
