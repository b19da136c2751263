//! Static keyboard layout: zones, pages, labels and the keycode tables.
//!
//! Every tappable region of the panel is a [`ZoneId`]. Zones `0..28` carry a
//! character whose label and keycode depend on the active [`LayoutPage`];
//! zones `28..40` are fixed function keys described by [`SpecialKey`].

pub mod geometry;
pub mod keymap;

use anyhow::{Result, bail};
use num_enum::{IntoPrimitive, TryFromPrimitive};

pub use geometry::{AxisRange, Axes, Band, PanelGeometry, Rect, Span, BANDS};
pub use keymap::Keymap;

/// Identifier of one tappable region, dense in `0..40`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZoneId(u8);

impl ZoneId {
    pub const COUNT: u8 = 40;
    /// Zones below this index are character keys.
    pub const CHAR_ZONES: u8 = 28;

    pub const fn new(index: u8) -> Option<Self> {
        if index < Self::COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    pub const fn special(key: SpecialKey) -> Self {
        Self(key as u8)
    }

    pub const fn index(self) -> u8 {
        self.0
    }

    pub fn role(self) -> ZoneRole {
        match SpecialKey::try_from(self.0) {
            Ok(key) => ZoneRole::Special(key),
            Err(_) => ZoneRole::Char(self.0 as usize),
        }
    }

    pub fn all() -> impl Iterator<Item = ZoneId> {
        (0..Self::COUNT).map(ZoneId)
    }
}

impl std::fmt::Display for ZoneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.role() {
            ZoneRole::Char(index) => write!(f, "zone {index}"),
            ZoneRole::Special(key) => write!(f, "zone {} ({key:?})", self.0),
        }
    }
}

/// What a zone does when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneRole {
    /// Index into the per-page character tables.
    Char(usize),
    Special(SpecialKey),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum SpecialKey {
    Shift = 28,
    Ctrl = 29,
    Esc = 30,
    Tab = 31,
    Up = 32,
    Down = 33,
    Left = 34,
    Right = 35,
    Space = 36,
    Enter = 37,
    Backspace = 38,
    PageToggle = 39,
}

impl SpecialKey {
    fn label(self, page: LayoutPage) -> &'static str {
        match self {
            SpecialKey::Shift => "shift",
            SpecialKey::Ctrl => "ctl",
            SpecialKey::Esc => "esc",
            SpecialKey::Tab => "tab",
            SpecialKey::Up => "up",
            SpecialKey::Down => "down",
            SpecialKey::Left => "left",
            SpecialKey::Right => "right",
            SpecialKey::Space => "",
            SpecialKey::Enter => "enter",
            SpecialKey::Backspace => "bksp",
            SpecialKey::PageToggle if page.symbols() => "abc",
            SpecialKey::PageToggle => "?123",
        }
    }
}

/// One of the four label/keycode pages.
///
/// Bit 0 is the shift level, bit 1 selects the symbol page. Both are sticky
/// toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LayoutPage(u8);

impl LayoutPage {
    const SHIFT: u8 = 0b01;
    const SYMBOLS: u8 = 0b10;

    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits < 4 { Some(Self(bits)) } else { None }
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn shifted(self) -> bool {
        self.0 & Self::SHIFT != 0
    }

    pub const fn symbols(self) -> bool {
        self.0 & Self::SYMBOLS != 0
    }

    #[must_use]
    pub const fn toggle_shift(self) -> Self {
        Self(self.0 ^ Self::SHIFT)
    }

    #[must_use]
    pub const fn toggle_symbols(self) -> Self {
        Self(self.0 ^ Self::SYMBOLS)
    }
}

/// Text drawn on a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Glyph(char),
    Text(&'static str),
}

const QWERTY_PAGES: [&str; 4] = [
    "qwertyuiopasdfghjklzxcvbnm/.",
    "QWERTYUIOPASDFGHJKLZXCVBNM?>",
    "1234567890-=[];'\\,./xcvbnm/.",
    "!@#$%^&*()_+{}:\"|<>?XCVBNM?>",
];

/// Labels for every page plus the keymap, checked for completeness on
/// construction.
#[derive(Debug, Clone)]
pub struct Layout {
    pages: [[char; ZoneId::CHAR_ZONES as usize]; 4],
    keymap: Keymap,
}

impl Layout {
    pub fn new(pages: [&str; 4], keymap: Keymap) -> Result<Self> {
        let mut glyphs = [[' '; ZoneId::CHAR_ZONES as usize]; 4];
        for (page, (text, row)) in pages.iter().zip(glyphs.iter_mut()).enumerate() {
            let count = text.chars().count();
            if count != row.len() {
                bail!(
                    "layout page {page} has {count} labels, expected {}",
                    row.len()
                );
            }
            for (slot, ch) in row.iter_mut().zip(text.chars()) {
                *slot = ch;
            }
        }
        keymap.validate()?;
        Ok(Self {
            pages: glyphs,
            keymap,
        })
    }

    /// The built-in US qwerty layout.
    pub fn qwerty() -> Result<Self> {
        Self::new(QWERTY_PAGES, Keymap::us())
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn glyph_for(&self, zone: ZoneId, page: LayoutPage) -> Label {
        match zone.role() {
            ZoneRole::Char(index) => Label::Glyph(self.pages[page.bits() as usize][index]),
            ZoneRole::Special(key) => Label::Text(key.label(page)),
        }
    }

    pub fn keycode_for(&self, zone: ZoneId, page: LayoutPage) -> Option<evdev_rs::enums::EV_KEY> {
        self.keymap.keycode_for(zone, page)
    }
}
