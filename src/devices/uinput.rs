use std::io;

use anyhow::{Context, Result};
use evdev_rs::enums::{EV_KEY, EV_SYN, EventCode, EventType};
use evdev_rs::{DeviceWrapper, InputEvent, TimeVal, UInputDevice, UninitDevice};

use crate::event_model::OutputEvent;
use crate::keyboard::KeySink;

const BUS_USB: u16 = 0x03;

/// The uinput keyboard other programs receive our keys from.
pub struct VirtualKeyboard {
    device: UInputDevice,
}

impl VirtualKeyboard {
    /// Registers a keyboard named `name` able to emit `keys`.
    pub fn create(name: &str, keys: &[EV_KEY]) -> Result<Self> {
        let template = UninitDevice::new().context("error setting up uinput")?;
        template.set_name(name);
        template.set_bustype(BUS_USB);
        template.set_vendor_id(1);
        template.set_product_id(1);
        template.set_version(1);
        template
            .enable_event_type(&EventType::EV_KEY)
            .context("error enabling key events")?;
        template
            .enable_event_type(&EventType::EV_SYN)
            .context("error enabling sync events")?;
        for key in keys {
            template
                .enable_event_code(&EventCode::EV_KEY(*key), None)
                .with_context(|| format!("error enabling {key:?}"))?;
        }
        let device = UInputDevice::create_from_device(&template)
            .context("error creating uinput device")?;
        tracing::info!(
            name,
            keys = keys.len(),
            devnode = device.devnode().unwrap_or("unknown"),
            "virtual keyboard created"
        );
        Ok(Self { device })
    }
}

impl KeySink for VirtualKeyboard {
    fn send(&mut self, event: &OutputEvent) -> io::Result<()> {
        self.device.write_event(&to_input_event(event))
    }
}

fn to_input_event(event: &OutputEvent) -> InputEvent {
    let time = TimeVal::new(0, 0);
    match *event {
        OutputEvent::Key { code, value } => {
            InputEvent::new(&time, &EventCode::EV_KEY(code), value.into())
        }
        OutputEvent::Sync => InputEvent::new(&time, &EventCode::EV_SYN(EV_SYN::SYN_REPORT), 0),
    }
}
