//! Draws the keyboard panel into a caller-owned pixel strip.

pub mod glyph;

use std::io;

use anyhow::{Result, bail};
use serde::Deserialize;

use crate::keyboard::PanelState;
use crate::layout::{Label, Layout, PanelGeometry, Rect};

pub use glyph::{FontRasterizer, Glyph, GlyphRasterizer};

/// Where a finished panel strip goes.
pub trait PanelDisplay {
    fn flush(&mut self, strip: &[u8]) -> io::Result<()>;
}

/// `0xRRGGBB` colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub background: u32,
    pub key: u32,
    pub highlight: u32,
    pub label: u32,
    pub label_highlight: u32,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: 0x444444,
            key: 0x000000,
            highlight: 0xffffff,
            label: 0xffffff,
            label_highlight: 0x000000,
        }
    }
}

/// 32 bits per pixel strip with a fixed stride in bytes.
#[derive(Debug, Clone)]
pub struct PanelBuffer {
    width: u32,
    height: u32,
    stride: usize,
    bytes: Vec<u8>,
}

impl PanelBuffer {
    pub fn new(width: u32, height: u32, stride: usize) -> Result<Self> {
        if stride < width as usize * 4 {
            bail!("line length {stride} is too short for {width} pixels");
        }
        Ok(Self {
            width,
            height,
            stride,
            bytes: vec![0; stride * height as usize],
        })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.stride + x as usize * 4
    }

    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        let at = self.offset(x, y);
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.bytes[at..at + 4]);
        u32::from_le_bytes(bytes)
    }

    fn put(&mut self, x: u32, y: u32, color: u32) {
        let at = self.offset(x, y);
        self.bytes[at..at + 4].copy_from_slice(&color.to_le_bytes());
    }

    pub fn fill_rect(&mut self, rect: Rect, color: u32) {
        for y in rect.y0..rect.y1.min(self.height) {
            for x in rect.x0..rect.x1.min(self.width) {
                self.put(x, y, color);
            }
        }
    }

    /// Blends `glyph` coverage from `bg` towards `fg`, with its top-left at
    /// `(x, y)`, drawing only inside `clip`.
    pub fn blend_glyph(&mut self, x: i32, y: i32, glyph: &Glyph, clip: Rect, bg: u32, fg: u32) {
        let clip = Rect {
            x1: clip.x1.min(self.width),
            y1: clip.y1.min(self.height),
            ..clip
        };
        for row in 0..glyph.height {
            for col in 0..glyph.width {
                let (px, py) = (x + col as i32, y + row as i32);
                if px < clip.x0 as i32 || py < clip.y0 as i32 {
                    continue;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= clip.x1 || py >= clip.y1 {
                    continue;
                }
                let alpha = glyph.coverage[row * glyph.width + col];
                if alpha != 0 {
                    self.put(px, py, blend(bg, fg, alpha));
                }
            }
        }
    }
}

fn blend(bg: u32, fg: u32, alpha: u8) -> u32 {
    let alpha = u32::from(alpha);
    let channel = |shift: u32| {
        let b = (bg >> shift) & 0xff;
        let f = (fg >> shift) & 0xff;
        ((b * (255 - alpha) + f * alpha) / 255) << shift
    };
    channel(16) | channel(8) | channel(0)
}

pub struct Renderer<R> {
    layout: Layout,
    geometry: PanelGeometry,
    palette: Palette,
    rasterizer: R,
}

impl<R: GlyphRasterizer> Renderer<R> {
    pub fn new(layout: Layout, geometry: PanelGeometry, palette: Palette, rasterizer: R) -> Self {
        Self {
            layout,
            geometry,
            palette,
            rasterizer,
        }
    }

    /// A strip sized for this renderer's panel.
    pub fn buffer(&self, stride: usize) -> Result<PanelBuffer> {
        PanelBuffer::new(self.geometry.width(), self.geometry.height(), stride)
    }

    pub fn draw(&mut self, state: &PanelState, buffer: &mut PanelBuffer) {
        let geometry = self.geometry;
        buffer.fill_rect(
            Rect {
                x0: 0,
                y0: 0,
                x1: geometry.width(),
                y1: geometry.height(),
            },
            self.palette.background,
        );
        let pressed = state.pressed_zone();
        for (zone, rect) in geometry.zones() {
            // one pixel of background between neighbours
            let key = Rect {
                x1: rect.x1.saturating_sub(1).max(rect.x0),
                y1: rect.y1 - 1,
                ..rect
            };
            let (fill, ink) = if pressed == Some(zone) {
                (self.palette.highlight, self.palette.label_highlight)
            } else {
                (self.palette.key, self.palette.label)
            };
            buffer.fill_rect(key, fill);
            match self.layout.glyph_for(zone, state.page) {
                Label::Glyph(ch) => self.draw_text(buffer, key, std::iter::once(ch), fill, ink),
                Label::Text(text) => self.draw_text(buffer, key, text.chars(), fill, ink),
            }
        }
    }

    fn draw_text(
        &mut self,
        buffer: &mut PanelBuffer,
        key: Rect,
        text: impl Iterator<Item = char>,
        fill: u32,
        ink: u32,
    ) {
        let baseline = (key.y0 + self.geometry.band_height() * 3 / 4) as i32;
        let mut pen = key.x0 as i32;
        for ch in text {
            let glyph = self.rasterizer.glyph(ch);
            buffer.blend_glyph(pen + glyph.left, baseline - glyph.top, glyph, key, fill, ink);
            pen += glyph.advance;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::PressState;
    use crate::layout::{LayoutPage, ZoneId};
    use crate::testing::BoxRasterizer;

    fn renderer() -> Renderer<BoxRasterizer> {
        let geometry = PanelGeometry::new(200, 20, 400).unwrap();
        Renderer::new(
            Layout::qwerty().unwrap(),
            geometry,
            Palette::default(),
            BoxRasterizer::new(),
        )
    }

    #[test]
    fn test_buffer_rejects_short_stride() {
        assert!(PanelBuffer::new(10, 2, 39).is_err());
        assert!(PanelBuffer::new(10, 2, 40).is_ok());
    }

    #[test]
    fn test_blend_endpoints() {
        assert_eq!(blend(0x000000, 0xffffff, 0), 0x000000);
        assert_eq!(blend(0x000000, 0xffffff, 255), 0xffffff);
        assert_eq!(blend(0xffffff, 0x000000, 255), 0x000000);
        let mid = blend(0x000000, 0xffffff, 128);
        assert_eq!(mid & 0xff, (mid >> 8) & 0xff);
        assert_eq!(mid & 0xff, (mid >> 16) & 0xff);
    }

    #[test]
    fn test_idle_panel_colors() {
        let mut renderer = renderer();
        let mut buffer = renderer.buffer(200 * 4).unwrap();
        renderer.draw(&PanelState::default(), &mut buffer);

        // gap pixel at the right edge of the first utility key
        let first = renderer.geometry.zones().next().unwrap().1;
        assert_eq!(buffer.pixel(first.x1 - 1, 5), 0x444444);
        // key body away from the label box
        assert_eq!(buffer.pixel(first.x1 - 3, 2), 0x000000);
        // left margin of the home row
        assert_eq!(buffer.pixel(2, 45), 0x444444);
    }

    #[test]
    fn test_pressed_zone_is_highlighted() {
        let mut renderer = renderer();
        let mut buffer = renderer.buffer(200 * 4).unwrap();
        let state = PanelState {
            press: PressState::Pressed(ZoneId::new(36).unwrap()),
            page: LayoutPage::default(),
        };
        renderer.draw(&state, &mut buffer);
        // space bar spans x 50..150 in the bottom band
        assert_eq!(buffer.pixel(100, 85), 0xffffff);
        assert_eq!(buffer.pixel(10, 25), 0x000000);
    }

    /// Labels are drawn with the ink colour at the baseline of the band.
    #[test]
    fn test_label_drawn_left_in_zone() {
        let mut renderer = renderer();
        let mut buffer = renderer.buffer(200 * 4).unwrap();
        renderer.draw(&PanelState::default(), &mut buffer);
        // zone 0 starts at x=0 in band 1 (y 20..40), baseline y=35
        assert_eq!(buffer.pixel(1, 33), 0xffffff);
        assert_eq!(renderer.rasterizer.requested('q'), 1);
    }

    #[test]
    fn test_symbol_page_changes_glyphs() {
        let mut renderer = renderer();
        let mut buffer = renderer.buffer(200 * 4).unwrap();
        let state = PanelState {
            press: PressState::Idle,
            page: LayoutPage::default().toggle_symbols(),
        };
        renderer.draw(&state, &mut buffer);
        assert_eq!(renderer.rasterizer.requested('1'), 1);
        assert_eq!(renderer.rasterizer.requested('q'), 0);
    }

    /// Panels so narrow that some keys round to zero width still draw.
    #[test]
    fn test_narrow_panel_draws() {
        let geometry = PanelGeometry::new(8, 10, 100).unwrap();
        let mut renderer = Renderer::new(
            Layout::qwerty().unwrap(),
            geometry,
            Palette::default(),
            BoxRasterizer::new(),
        );
        let mut buffer = renderer.buffer(8 * 4).unwrap();
        renderer.draw(&PanelState::default(), &mut buffer);
        // space bar covers x 2..6 of the bottom band
        assert_eq!(buffer.pixel(3, 41), 0x000000);
        assert_eq!(buffer.pixel(0, 15), 0x444444);
    }

    /// A wider stride leaves the padding bytes untouched.
    #[test]
    fn test_stride_padding_untouched() {
        let mut renderer = renderer();
        let mut buffer = renderer.buffer(200 * 4 + 16).unwrap();
        renderer.draw(&PanelState::default(), &mut buffer);
        let bytes = buffer.as_bytes();
        assert_eq!(bytes.len(), (200 * 4 + 16) * 100);
        assert!(bytes[800..816].iter().all(|b| *b == 0));
    }
}
