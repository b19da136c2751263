pub mod event;

pub use event::{KeyValue, OutputEvent, TouchSample};
