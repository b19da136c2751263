//! In-memory stand-ins for the device seams.

use std::collections::{HashMap, VecDeque};
use std::io;

use evdev_rs::enums::{EV_ABS, EV_KEY, EV_SYN, EventCode};
use evdev_rs::{InputEvent, TimeVal};

use crate::event_model::OutputEvent;
use crate::keyboard::KeySink;
use crate::render::{Glyph, GlyphRasterizer, PanelDisplay};
use crate::touch::EventSource;

pub fn event(code: EventCode, value: i32) -> InputEvent {
    InputEvent::new(&TimeVal::new(0, 0), &code, value)
}

pub fn abs(axis: EV_ABS, value: i32) -> InputEvent {
    event(EventCode::EV_ABS(axis), value)
}

pub fn key(code: EV_KEY, value: i32) -> InputEvent {
    event(EventCode::EV_KEY(code), value)
}

pub fn sync() -> InputEvent {
    event(EventCode::EV_SYN(EV_SYN::SYN_REPORT), 0)
}

pub fn mt_report() -> InputEvent {
    event(EventCode::EV_SYN(EV_SYN::SYN_MT_REPORT), 0)
}

/// Replays a fixed event list, then reports end of file.
pub struct ScriptedSource {
    events: VecDeque<InputEvent>,
}

impl ScriptedSource {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for ScriptedSource {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        self.events
            .pop_front()
            .ok_or_else(|| io::Error::from(io::ErrorKind::UnexpectedEof))
    }
}

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<OutputEvent>,
    failing: Vec<usize>,
    attempts: usize,
}

impl RecordingSink {
    /// Fails the writes with the given zero-based attempt numbers.
    pub fn failing_at(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing: attempts.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl KeySink for RecordingSink {
    fn send(&mut self, event: &OutputEvent) -> io::Result<()> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.failing.contains(&attempt) {
            return Err(io::Error::other("write refused"));
        }
        self.events.push(*event);
        Ok(())
    }
}

/// Every character is a solid 4x6 box one pixel right of the pen.
pub struct BoxRasterizer {
    glyph: Glyph,
    requests: HashMap<char, usize>,
}

impl BoxRasterizer {
    pub fn new() -> Self {
        Self {
            glyph: Glyph {
                width: 4,
                height: 6,
                left: 1,
                top: 6,
                advance: 5,
                coverage: vec![255; 24],
            },
            requests: HashMap::new(),
        }
    }

    pub fn requested(&self, ch: char) -> usize {
        self.requests.get(&ch).copied().unwrap_or(0)
    }
}

impl GlyphRasterizer for BoxRasterizer {
    fn glyph(&mut self, ch: char) -> &Glyph {
        *self.requests.entry(ch).or_default() += 1;
        &self.glyph
    }
}

#[derive(Default)]
pub struct MemoryDisplay {
    pub frames: Vec<Vec<u8>>,
    failing: Vec<usize>,
    attempts: usize,
}

impl MemoryDisplay {
    /// Fails the flushes with the given zero-based attempt numbers.
    pub fn failing_at(attempts: impl IntoIterator<Item = usize>) -> Self {
        Self {
            failing: attempts.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl PanelDisplay for MemoryDisplay {
    fn flush(&mut self, strip: &[u8]) -> io::Result<()> {
        let attempt = self.attempts;
        self.attempts += 1;
        if self.failing.contains(&attempt) {
            return Err(io::Error::other("display gone"));
        }
        self.frames.push(strip.to_vec());
        Ok(())
    }
}
