//! Press/release tracking and output key synthesis.

pub mod state;
pub mod synth;

use std::io;

use crate::event_model::OutputEvent;

pub use state::{PanelState, PressState};
pub use synth::{Activation, Synthesizer};

/// Destination of synthesized key events.
pub trait KeySink {
    fn send(&mut self, event: &OutputEvent) -> io::Result<()>;
}

impl<K: KeySink + ?Sized> KeySink for &mut K {
    fn send(&mut self, event: &OutputEvent) -> io::Result<()> {
        (**self).send(event)
    }
}

/// Writes `events` in order. A failed write drops that event only.
///
/// Returns how many events were written.
pub fn emit<K: KeySink + ?Sized>(sink: &mut K, events: &[OutputEvent]) -> usize {
    let mut written = 0;
    for event in events {
        match sink.send(event) {
            Ok(()) => written += 1,
            Err(e) => tracing::warn!(?event, "error sending output event: {e}"),
        }
    }
    written
}
