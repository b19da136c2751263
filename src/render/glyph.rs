use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use fontdue::{Font, FontSettings};

/// 8-bit coverage bitmap of one character plus its placement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Glyph {
    pub width: usize,
    pub height: usize,
    /// Offset of the bitmap from the pen position.
    pub left: i32,
    /// Distance from the baseline up to the first bitmap row.
    pub top: i32,
    pub advance: i32,
    /// Row-major, stride == width.
    pub coverage: Vec<u8>,
}

pub trait GlyphRasterizer {
    fn glyph(&mut self, ch: char) -> &Glyph;
}

/// Rasterizes from a TrueType/OpenType font at one fixed pixel size.
pub struct FontRasterizer {
    font: Font,
    px: f32,
    cache: HashMap<char, Glyph>,
}

impl FontRasterizer {
    pub fn load(path: &Path, px: u32) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("unable to read font file {}", path.display()))?;
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|e| anyhow!("unable to load font file {}: {e}", path.display()))?;
        tracing::info!(font = %path.display(), px, "font loaded");
        Ok(Self {
            font,
            px: px as f32,
            cache: HashMap::new(),
        })
    }

    fn rasterize(font: &Font, ch: char, px: f32) -> Glyph {
        let (metrics, coverage) = font.rasterize(ch, px);
        Glyph {
            width: metrics.width,
            height: metrics.height,
            left: metrics.xmin,
            top: metrics.ymin + metrics.height as i32,
            advance: metrics.advance_width.round() as i32,
            coverage,
        }
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn glyph(&mut self, ch: char) -> &Glyph {
        let font = &self.font;
        let px = self.px;
        self.cache
            .entry(ch)
            .or_insert_with(|| Self::rasterize(font, ch, px))
    }
}

impl std::fmt::Debug for FontRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontRasterizer")
            .field("px", &self.px)
            .field("cached", &self.cache.len())
            .finish()
    }
}
