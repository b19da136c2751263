//! Panel geometry shared by the renderer and the hit test.
//!
//! The panel is five bands of equal height at the bottom of the screen. Each
//! band is cut into spans whose edges are fractions of the panel width; the
//! same table drives drawing and touch lookup so the two can never disagree.

use anyhow::{Result, bail};

use super::ZoneId;

/// A horizontal run of a band, covering `[start, end)` in units of
/// `1/denominator` of the panel width. `zone` is `None` for dead margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub zone: Option<ZoneId>,
    pub start: u32,
    pub end: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub denominator: u32,
    pub spans: &'static [Span],
}

const fn key(zone: u8, start: u32, end: u32) -> Span {
    Span {
        zone: Some(ZoneId(zone)),
        start,
        end,
    }
}

const fn margin(start: u32, end: u32) -> Span {
    Span {
        zone: None,
        start,
        end,
    }
}

/// Bands from top to bottom: utility row, number/letter row, inset home row,
/// shift row, space row.
pub const BANDS: [Band; 5] = [
    Band {
        denominator: 7,
        spans: &[
            key(29, 0, 1),
            key(30, 1, 2),
            key(31, 2, 3),
            key(32, 3, 4),
            key(33, 4, 5),
            key(34, 5, 6),
            key(35, 6, 7),
        ],
    },
    Band {
        denominator: 20,
        spans: &[
            key(0, 0, 2),
            key(1, 2, 4),
            key(2, 4, 6),
            key(3, 6, 8),
            key(4, 8, 10),
            key(5, 10, 12),
            key(6, 12, 14),
            key(7, 14, 16),
            key(8, 16, 18),
            key(9, 18, 20),
        ],
    },
    Band {
        denominator: 20,
        spans: &[
            margin(0, 1),
            key(10, 1, 3),
            key(11, 3, 5),
            key(12, 5, 7),
            key(13, 7, 9),
            key(14, 9, 11),
            key(15, 11, 13),
            key(16, 13, 15),
            key(17, 15, 17),
            key(18, 17, 19),
            margin(19, 20),
        ],
    },
    Band {
        denominator: 20,
        spans: &[
            key(28, 0, 3),
            key(19, 3, 5),
            key(20, 5, 7),
            key(21, 7, 9),
            key(22, 9, 11),
            key(23, 11, 13),
            key(24, 13, 15),
            key(25, 15, 17),
            key(38, 17, 20),
        ],
    },
    Band {
        denominator: 20,
        spans: &[
            key(39, 0, 3),
            key(26, 3, 5),
            key(36, 5, 15),
            key(27, 15, 17),
            key(37, 17, 20),
        ],
    },
];

/// Pixel rectangle `[x0, x1) x [y0, y1)`, relative to the panel strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

/// Placement of the panel on the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelGeometry {
    width: u32,
    band_height: u32,
    screen_height: u32,
}

impl PanelGeometry {
    pub fn new(width: u32, band_height: u32, screen_height: u32) -> Result<Self> {
        if width == 0 || band_height == 0 {
            bail!("panel of {width}x{band_height} pixels per band is empty");
        }
        if band_height * BANDS.len() as u32 > screen_height {
            bail!(
                "panel of {} rows of {band_height}px does not fit a {screen_height}px screen",
                BANDS.len()
            );
        }
        Ok(Self {
            width,
            band_height,
            screen_height,
        })
    }

    /// Sizes the panel for a screen: one band is a tenth of a third of the
    /// height plus half of the width.
    pub fn for_screen(xres: u32, yres: u32) -> Result<Self> {
        Self::new(xres, (yres / 3 + xres / 2) / 10, yres)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn band_height(&self) -> u32 {
        self.band_height
    }

    pub fn height(&self) -> u32 {
        self.band_height * BANDS.len() as u32
    }

    pub fn screen_height(&self) -> u32 {
        self.screen_height
    }

    /// First screen row covered by the panel.
    pub fn top(&self) -> u32 {
        self.screen_height - self.height()
    }

    /// Pixel size glyphs are rasterized at.
    pub fn glyph_px(&self) -> u32 {
        self.band_height * 3 / 4
    }

    pub fn span_rect(&self, band: usize, span: &Span) -> Rect {
        let denominator = BANDS[band].denominator;
        let y0 = band as u32 * self.band_height;
        Rect {
            x0: span.start * self.width / denominator,
            y0,
            x1: span.end * self.width / denominator,
            y1: y0 + self.band_height,
        }
    }

    /// Every zone together with its pixel rectangle.
    pub fn zones(&self) -> impl Iterator<Item = (ZoneId, Rect)> + '_ {
        BANDS.iter().enumerate().flat_map(move |(band, b)| {
            b.spans.iter().filter_map(move |span| {
                let zone = span.zone?;
                Some((zone, self.span_rect(band, span)))
            })
        })
    }
}

/// Reported range of one absolute touch axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub minimum: i32,
    pub maximum: i32,
}

impl AxisRange {
    pub fn new(minimum: i32, maximum: i32) -> Result<Self> {
        if maximum <= minimum {
            bail!("axis range [{minimum}, {maximum}] is empty");
        }
        Ok(Self { minimum, maximum })
    }

    /// Maps `value` onto `0..units`, clamping values outside the range.
    pub fn scale(&self, value: i32, units: u32) -> u32 {
        let span = i64::from(self.maximum) - i64::from(self.minimum);
        let offset = (i64::from(value) - i64::from(self.minimum)).clamp(0, span - 1);
        (offset * i64::from(units) / span) as u32
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub x: AxisRange,
    pub y: AxisRange,
}
