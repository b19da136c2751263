use evdev_rs::enums::EV_KEY;
use num_enum::IntoPrimitive;

/// The tracked contact as seen at the end of one synchronized input batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchSample {
    pub x: i32,
    pub y: i32,
    pub down: bool,
    /// The tracked contact ended somewhere in this batch, even if a new one
    /// went down after it.
    pub released: bool,
}

/// Key state written to the output device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive)]
#[repr(i32)]
pub enum KeyValue {
    Released = 0,
    Pressed = 1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputEvent {
    Key { code: EV_KEY, value: KeyValue },
    /// End of one report.
    Sync,
}

impl OutputEvent {
    pub fn press(code: EV_KEY) -> Self {
        Self::Key {
            code,
            value: KeyValue::Pressed,
        }
    }

    pub fn release(code: EV_KEY) -> Self {
        Self::Key {
            code,
            value: KeyValue::Released,
        }
    }
}
