use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use evdev_rs::enums::{EV_ABS, EventCode, EventType};
use evdev_rs::{Device, DeviceWrapper, InputEvent, ReadFlag, ReadStatus};

use crate::layout::{AxisRange, Axes};
use crate::touch::EventSource;

/// The touchscreen, read through libevdev.
pub struct TouchDevice {
    device: Device,
    path: PathBuf,
    /// The kernel dropped events; replaying the resync stream.
    resyncing: bool,
}

impl TouchDevice {
    pub fn open(path: &Path) -> Result<Self> {
        let device = Device::new_from_path(path)
            .with_context(|| format!("failed to open input device node {}", path.display()))?;
        Ok(Self::wrap(device, path))
    }

    /// Opens the first event node under `dir` that reports absolute axes.
    pub fn discover(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("listing input devices in {}", dir.display()))?;
        let mut nodes: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| is_event_node(path))
            .collect();
        // event2 before event10
        nodes.sort_by_key(|path| (path.as_os_str().len(), path.clone()));

        for path in nodes {
            match Device::new_from_path(&path) {
                Ok(device) if device.has_event_type(&EventType::EV_ABS) => {
                    return Ok(Self::wrap(device, &path));
                }
                Ok(_) => tracing::debug!(node = %path.display(), "no absolute axes, skipping"),
                Err(e) => tracing::debug!(node = %path.display(), "cannot open: {e}"),
            }
        }
        bail!("no absolute axes device found in {}", dir.display())
    }

    fn wrap(device: Device, path: &Path) -> Self {
        tracing::info!(
            node = %path.display(),
            name = device.name().unwrap_or("unknown"),
            "touch input device opened"
        );
        Self {
            device,
            path: path.to_path_buf(),
            resyncing: false,
        }
    }

    /// Ranges of the multi-touch position axes.
    pub fn axes(&self) -> Result<Axes> {
        Ok(Axes {
            x: self.axis(EV_ABS::ABS_MT_POSITION_X)?,
            y: self.axis(EV_ABS::ABS_MT_POSITION_Y)?,
        })
    }

    fn axis(&self, axis: EV_ABS) -> Result<AxisRange> {
        let info = self
            .device
            .abs_info(&EventCode::EV_ABS(axis))
            .with_context(|| format!("{} reports no {axis:?} axis", self.path.display()))?;
        AxisRange::new(info.minimum, info.maximum)
            .with_context(|| format!("getting touchscreen size of {}", self.path.display()))
    }
}

impl EventSource for TouchDevice {
    fn next_event(&mut self) -> io::Result<InputEvent> {
        if self.resyncing {
            match self.device.next_event(ReadFlag::SYNC) {
                Ok((_, event)) => return Ok(event),
                Err(e) if e.raw_os_error() == Some(libc::EAGAIN) => self.resyncing = false,
                Err(e) => return Err(e),
            }
        }
        let (status, event) = self
            .device
            .next_event(ReadFlag::NORMAL | ReadFlag::BLOCKING)?;
        if matches!(status, ReadStatus::Sync) {
            tracing::warn!(node = %self.path.display(), "input events dropped, resyncing");
            self.resyncing = true;
        }
        Ok(event)
    }
}

fn is_event_node(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("event"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_node_names() {
        assert!(is_event_node(Path::new("/dev/input/event3")));
        assert!(!is_event_node(Path::new("/dev/input/mice")));
        assert!(!is_event_node(Path::new("/dev/input/by-id")));
    }

    #[test]
    fn test_discover_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = TouchDevice::discover(dir.path()).err().unwrap();
        assert!(err.to_string().contains("no absolute axes device"));
    }

    /// Plain files named like event nodes are skipped, not fatal.
    #[test]
    fn test_discover_skips_unreadable_nodes() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("event0"), b"").unwrap();
        let err = TouchDevice::discover(dir.path()).err().unwrap();
        assert!(err.to_string().contains("no absolute axes device"));
    }

    #[test]
    fn test_open_missing_node() {
        let err = TouchDevice::open(Path::new("/nonexistent/event0")).err().unwrap();
        assert!(err.to_string().contains("/nonexistent/event0"));
    }
}
