use evdev_rs::enums::EV_KEY;

use crate::event_model::OutputEvent;
use crate::layout::{Keymap, LayoutPage, SpecialKey, ZoneId, ZoneRole};

/// Turns activated zones into output events and page changes.
///
/// Shift is a latched modifier mirrored by bit 0 of the page. Ctrl is
/// one-shot: once pressed it is released together with the next key.
#[derive(Debug, Clone)]
pub struct Synthesizer {
    keymap: Keymap,
    ctrl_held: bool,
}

/// Result of one activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub events: Vec<OutputEvent>,
    pub page: LayoutPage,
}

impl Synthesizer {
    pub fn new(keymap: Keymap) -> Self {
        Self {
            keymap,
            ctrl_held: false,
        }
    }

    pub fn ctrl_held(&self) -> bool {
        self.ctrl_held
    }

    pub fn activate(&mut self, zone: ZoneId, page: LayoutPage) -> Activation {
        let mut events = Vec::new();
        let page = match zone.role() {
            ZoneRole::Special(SpecialKey::Shift) => {
                let page = page.toggle_shift();
                if let Some(shift) = self.keymap.special_key(SpecialKey::Shift) {
                    events.push(if page.shifted() {
                        OutputEvent::press(shift)
                    } else {
                        OutputEvent::release(shift)
                    });
                    events.push(OutputEvent::Sync);
                }
                page
            }
            ZoneRole::Special(SpecialKey::Ctrl) => {
                if let Some(ctrl) = self.keymap.special_key(SpecialKey::Ctrl) {
                    if !self.ctrl_held {
                        events.extend([OutputEvent::press(ctrl), OutputEvent::Sync]);
                        self.ctrl_held = true;
                    }
                }
                page
            }
            ZoneRole::Special(SpecialKey::PageToggle) => page.toggle_symbols(),
            _ => {
                if let Some(code) = self.keymap.keycode_for(zone, page) {
                    self.tap(code, &mut events);
                }
                page
            }
        };
        tracing::debug!(%zone, page = page.bits(), events = events.len(), "activation");
        Activation { events, page }
    }

    fn tap(&mut self, code: EV_KEY, events: &mut Vec<OutputEvent>) {
        events.push(OutputEvent::press(code));
        events.push(OutputEvent::release(code));
        if self.ctrl_held {
            if let Some(ctrl) = self.keymap.special_key(SpecialKey::Ctrl) {
                events.push(OutputEvent::release(ctrl));
            }
            self.ctrl_held = false;
        }
        events.push(OutputEvent::Sync);
    }
}
