//! Raw touch events in, one logical sample per batch and a zone lookup out.

pub mod tracker;

use std::io;

use evdev_rs::InputEvent;

pub use hit_test::zone_for;
pub use tracker::TouchTracker;

/// A blocking stream of raw input events.
pub trait EventSource {
    fn next_event(&mut self) -> io::Result<InputEvent>;
}

impl<S: EventSource + ?Sized> EventSource for &mut S {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        (**self).next_event()
    }
}
