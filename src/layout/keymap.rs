use anyhow::{Result, bail};
use evdev_rs::enums::EV_KEY;

use super::{LayoutPage, SpecialKey, ZoneId, ZoneRole};

const CHARS: usize = ZoneId::CHAR_ZONES as usize;

const US_ALPHA: [EV_KEY; CHARS] = [
    EV_KEY::KEY_Q,
    EV_KEY::KEY_W,
    EV_KEY::KEY_E,
    EV_KEY::KEY_R,
    EV_KEY::KEY_T,
    EV_KEY::KEY_Y,
    EV_KEY::KEY_U,
    EV_KEY::KEY_I,
    EV_KEY::KEY_O,
    EV_KEY::KEY_P,
    EV_KEY::KEY_A,
    EV_KEY::KEY_S,
    EV_KEY::KEY_D,
    EV_KEY::KEY_F,
    EV_KEY::KEY_G,
    EV_KEY::KEY_H,
    EV_KEY::KEY_J,
    EV_KEY::KEY_K,
    EV_KEY::KEY_L,
    EV_KEY::KEY_Z,
    EV_KEY::KEY_X,
    EV_KEY::KEY_C,
    EV_KEY::KEY_V,
    EV_KEY::KEY_B,
    EV_KEY::KEY_N,
    EV_KEY::KEY_M,
    EV_KEY::KEY_SLASH,
    EV_KEY::KEY_DOT,
];

const US_SYMBOL: [EV_KEY; CHARS] = [
    EV_KEY::KEY_1,
    EV_KEY::KEY_2,
    EV_KEY::KEY_3,
    EV_KEY::KEY_4,
    EV_KEY::KEY_5,
    EV_KEY::KEY_6,
    EV_KEY::KEY_7,
    EV_KEY::KEY_8,
    EV_KEY::KEY_9,
    EV_KEY::KEY_0,
    EV_KEY::KEY_MINUS,
    EV_KEY::KEY_EQUAL,
    EV_KEY::KEY_LEFTBRACE,
    EV_KEY::KEY_RIGHTBRACE,
    EV_KEY::KEY_SEMICOLON,
    EV_KEY::KEY_APOSTROPHE,
    EV_KEY::KEY_BACKSLASH,
    EV_KEY::KEY_COMMA,
    EV_KEY::KEY_DOT,
    EV_KEY::KEY_SLASH,
    EV_KEY::KEY_X,
    EV_KEY::KEY_C,
    EV_KEY::KEY_V,
    EV_KEY::KEY_B,
    EV_KEY::KEY_N,
    EV_KEY::KEY_M,
    EV_KEY::KEY_SLASH,
    EV_KEY::KEY_DOT,
];

const US_SPECIAL: [(SpecialKey, EV_KEY); 11] = [
    (SpecialKey::Shift, EV_KEY::KEY_LEFTSHIFT),
    (SpecialKey::Ctrl, EV_KEY::KEY_LEFTCTRL),
    (SpecialKey::Esc, EV_KEY::KEY_ESC),
    (SpecialKey::Tab, EV_KEY::KEY_TAB),
    (SpecialKey::Up, EV_KEY::KEY_UP),
    (SpecialKey::Down, EV_KEY::KEY_DOWN),
    (SpecialKey::Left, EV_KEY::KEY_LEFT),
    (SpecialKey::Right, EV_KEY::KEY_RIGHT),
    (SpecialKey::Space, EV_KEY::KEY_SPACE),
    (SpecialKey::Enter, EV_KEY::KEY_ENTER),
    (SpecialKey::Backspace, EV_KEY::KEY_BACKSPACE),
];

/// Output keycodes: one table per page bit 1 for the character zones, and a
/// fixed table for the function keys.
#[derive(Debug, Clone)]
pub struct Keymap {
    alpha: [EV_KEY; CHARS],
    symbol: [EV_KEY; CHARS],
    special: Vec<(SpecialKey, EV_KEY)>,
}

impl Keymap {
    pub fn new(
        alpha: [EV_KEY; CHARS],
        symbol: [EV_KEY; CHARS],
        special: impl IntoIterator<Item = (SpecialKey, EV_KEY)>,
    ) -> Self {
        Self {
            alpha,
            symbol,
            special: special.into_iter().collect(),
        }
    }

    pub fn us() -> Self {
        Self::new(US_ALPHA, US_SYMBOL, US_SPECIAL)
    }

    /// Every special key except the page toggle must map to exactly one keycode.
    pub fn validate(&self) -> Result<()> {
        for zone in ZoneId::all() {
            let ZoneRole::Special(key) = zone.role() else {
                continue;
            };
            let count = self.special.iter().filter(|(k, _)| *k == key).count();
            match (key, count) {
                (SpecialKey::PageToggle, 0) => {}
                (SpecialKey::PageToggle, _) => bail!("{zone} must not carry a keycode"),
                (_, 1) => {}
                (_, 0) => bail!("{zone} has no keycode"),
                (_, n) => bail!("{zone} has {n} keycodes"),
            }
        }
        Ok(())
    }

    /// Keycode sent when `zone` is activated on `page`.
    ///
    /// `None` for the shift and ctrl modifiers and for the page toggle, which
    /// are handled by the synthesizer.
    pub fn keycode_for(&self, zone: ZoneId, page: LayoutPage) -> Option<EV_KEY> {
        match zone.role() {
            ZoneRole::Char(index) if page.symbols() => Some(self.symbol[index]),
            ZoneRole::Char(index) => Some(self.alpha[index]),
            ZoneRole::Special(SpecialKey::Shift | SpecialKey::Ctrl | SpecialKey::PageToggle) => {
                None
            }
            ZoneRole::Special(key) => self.special_key(key),
        }
    }

    /// Keycode of a modifier or function key, regardless of page.
    pub fn special_key(&self, key: SpecialKey) -> Option<EV_KEY> {
        self.special
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, code)| *code)
    }

    /// Every keycode the output device must be able to emit, without duplicates.
    pub fn all_keycodes(&self) -> Vec<EV_KEY> {
        let mut codes: Vec<EV_KEY> = Vec::new();
        let tables = self.alpha.iter().chain(self.symbol.iter());
        for code in tables.chain(self.special.iter().map(|(_, code)| code)) {
            if !codes.contains(code) {
                codes.push(*code);
            }
        }
        codes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_us_keymap_is_valid() {
        assert!(Keymap::us().validate().is_ok());
    }

    #[test]
    fn test_missing_special_key_is_rejected() {
        let keymap = Keymap::new(US_ALPHA, US_SYMBOL, US_SPECIAL.into_iter().skip(1));
        let err = keymap.validate().unwrap_err();
        assert!(err.to_string().contains("Shift"), "{err}");
    }

    #[test]
    fn test_duplicate_special_key_is_rejected() {
        let special = US_SPECIAL
            .into_iter()
            .chain([(SpecialKey::Esc, EV_KEY::KEY_ESC)]);
        assert!(Keymap::new(US_ALPHA, US_SYMBOL, special).validate().is_err());
    }

    #[test]
    fn test_page_toggle_keycode_is_rejected() {
        let special = US_SPECIAL
            .into_iter()
            .chain([(SpecialKey::PageToggle, EV_KEY::KEY_F1)]);
        assert!(Keymap::new(US_ALPHA, US_SYMBOL, special).validate().is_err());
    }

    #[test]
    fn test_all_keycodes_has_no_duplicates() {
        let codes = Keymap::us().all_keycodes();
        assert!(codes.contains(&EV_KEY::KEY_LEFTSHIFT));
        assert!(codes.contains(&EV_KEY::KEY_LEFTCTRL));
        assert!(codes.contains(&EV_KEY::KEY_APOSTROPHE));
        for (i, code) in codes.iter().enumerate() {
            assert!(!codes[i + 1..].contains(code), "{code:?} listed twice");
        }
    }

    #[test]
    fn test_special_keys_ignore_page() {
        let keymap = Keymap::us();
        let enter = ZoneId::special(SpecialKey::Enter);
        for bits in 0..4 {
            let page = LayoutPage::from_bits(bits).unwrap();
            assert_eq!(keymap.keycode_for(enter, page), Some(EV_KEY::KEY_ENTER));
        }
    }
}
