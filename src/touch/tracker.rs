use std::io;

use evdev_rs::InputEvent;
use evdev_rs::enums::{EV_ABS, EV_KEY, EV_SYN, EventCode};

use super::EventSource;
use crate::event_model::TouchSample;

/// Folds raw multi-touch events into one [`TouchSample`] per `SYN_REPORT`.
///
/// Only one contact is followed. With slotted (type B) devices the first slot
/// to report a tracking id is kept until it lifts; with anonymous (type A)
/// devices the first contact record of each batch wins.
#[derive(Debug, Clone, Default)]
pub struct TouchTracker {
    sample: TouchSample,
    current_slot: i32,
    tracked_slot: Option<i32>,
    /// A position arrived since the last batch boundary.
    updated: bool,
    /// The first type A contact record of this batch is complete.
    record_closed: bool,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads events until the end of one batch and returns the sample it
    /// describes. Blocks on `source`.
    pub fn next_sample<S>(&mut self, source: &mut S) -> io::Result<TouchSample>
    where
        S: EventSource + ?Sized,
    {
        loop {
            let event = source.next_event()?;
            if let Some(sample) = self.feed(&event) {
                tracing::trace!(?sample, "touch batch");
                return Ok(sample);
            }
        }
    }

    /// Applies one raw event; returns the sample once the batch is complete.
    pub fn feed(&mut self, event: &InputEvent) -> Option<TouchSample> {
        match event.event_code {
            EventCode::EV_ABS(EV_ABS::ABS_MT_SLOT) => self.current_slot = event.value,
            EventCode::EV_ABS(EV_ABS::ABS_MT_TRACKING_ID) => self.tracking_id(event.value),
            EventCode::EV_ABS(EV_ABS::ABS_MT_POSITION_X) => {
                if self.accepts_position() {
                    self.sample.x = event.value;
                    self.touched();
                }
            }
            EventCode::EV_ABS(EV_ABS::ABS_MT_POSITION_Y) => {
                if self.accepts_position() {
                    self.sample.y = event.value;
                    self.touched();
                }
            }
            EventCode::EV_KEY(EV_KEY::BTN_TOUCH) if event.value == 0 => self.lifted(),
            EventCode::EV_SYN(EV_SYN::SYN_MT_REPORT) => {
                // a contact record without positions means the contact is gone
                if self.updated {
                    self.record_closed = true;
                } else if self.sample.down {
                    self.lifted();
                }
            }
            EventCode::EV_SYN(EV_SYN::SYN_REPORT) => {
                let sample = self.sample;
                self.sample.released = false;
                self.updated = false;
                self.record_closed = false;
                return Some(sample);
            }
            _ => {}
        }
        None
    }

    fn tracking_id(&mut self, id: i32) {
        match self.tracked_slot {
            Some(slot) if slot != self.current_slot => {}
            _ if id == -1 => self.lifted(),
            Some(_) => {}
            None => self.tracked_slot = Some(self.current_slot),
        }
    }

    fn accepts_position(&self) -> bool {
        !self.record_closed && self.tracked_slot.is_none_or(|slot| slot == self.current_slot)
    }

    fn touched(&mut self) {
        self.sample.down = true;
        self.updated = true;
    }

    fn lifted(&mut self) {
        if self.sample.down {
            self.sample.released = true;
        }
        self.sample.down = false;
        self.tracked_slot = None;
    }
}
