// Shared fixtures: a scripted in-memory device source

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::io;
use std::os::unix::io::RawFd;

use inputinfo_core::input::codes::*;
use inputinfo_core::{DeviceCapabilities, DeviceRecord, DeviceSource, HotplugEvent, ProbeError};

/// Device source driven entirely by the test
#[derive(Default)]
pub struct FakeSource {
    present: BTreeMap<String, DeviceRecord>,
    unreadable: HashSet<String>,
    events: VecDeque<HotplugEvent>,
    listening: bool,
    pub fail_scan: bool,
    pub fail_listen: bool,
    pub fd: Option<RawFd>,
    pub scans: usize,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Device present before the monitor starts
    pub fn with_device(mut self, record: DeviceRecord) -> Self {
        self.present.insert(record.path.clone(), record);
        self
    }

    /// Device that is listed but whose attributes cannot be read
    pub fn with_unreadable(mut self, path: &str) -> Self {
        self.present
            .insert(path.to_string(), DeviceRecord::new(path, "ghost", DeviceCapabilities::new()));
        self.unreadable.insert(path.to_string());
        self
    }

    /// Attach a device and queue its add event
    pub fn plug(&mut self, record: DeviceRecord) {
        self.events.push_back(HotplugEvent::add(record.path.clone()));
        self.present.insert(record.path.clone(), record);
    }

    /// Detach a device and queue its remove event
    pub fn unplug(&mut self, path: &str) {
        self.present.remove(path);
        self.events.push_back(HotplugEvent::remove(path));
    }

    /// Detach a device without any notification
    pub fn vanish(&mut self, path: &str) {
        self.present.remove(path);
    }

    /// Queue a raw event without touching the device table
    pub fn queue(&mut self, event: HotplugEvent) {
        self.events.push_back(event);
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }
}

impl DeviceSource for FakeSource {
    fn scan(&mut self) -> io::Result<Vec<String>> {
        self.scans += 1;
        if self.fail_scan {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "no udev"));
        }
        Ok(self.present.keys().cloned().collect())
    }

    fn probe(&mut self, path: &str) -> Result<DeviceRecord, ProbeError> {
        if self.unreadable.contains(path) {
            return Err(ProbeError::MissingAttribute {
                path: path.to_string(),
                attribute: "capabilities/key",
            });
        }
        self.present
            .get(path)
            .cloned()
            .ok_or_else(|| ProbeError::NotFound(path.to_string()))
    }

    fn listen(&mut self) -> io::Result<()> {
        if self.fail_listen {
            return Err(io::Error::new(io::ErrorKind::Other, "netlink unavailable"));
        }
        self.listening = true;
        Ok(())
    }

    fn next_event(&mut self) -> Option<HotplugEvent> {
        if !self.listening {
            return None;
        }
        self.events.pop_front()
    }

    fn monitor_fd(&self) -> Option<RawFd> {
        if self.listening {
            self.fd
        } else {
            None
        }
    }
}

pub fn keyboard_record(path: &str) -> DeviceRecord {
    let mut keys = vec![KEY_ESC, KEY_Q, KEY_W, KEY_E, KEY_R, KEY_T, KEY_Y, KEY_A, KEY_Z, KEY_SPACE];
    keys.extend_from_slice(&[2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 14, 15, 28, 29, 42, 56]);
    let mut record = DeviceRecord::new(
        path,
        "AT Translated Set 2 keyboard",
        DeviceCapabilities::new().with_keys(&keys),
    );
    record.phys = Some("isa0060/serio0/input0".to_string());
    record
}

pub fn mouse_record(path: &str) -> DeviceRecord {
    let mut record = DeviceRecord::new(
        path,
        "Logitech USB Optical Mouse",
        DeviceCapabilities::new()
            .with_keys(&[BTN_LEFT, BTN_RIGHT, BTN_MIDDLE])
            .with_rel(&[REL_X, REL_Y, REL_WHEEL]),
    );
    record.vendor_id = Some(0x046d);
    record.product_id = Some(0xc077);
    record
}

pub fn touchscreen_record(path: &str) -> DeviceRecord {
    DeviceRecord::new(
        path,
        "ELAN Touchscreen",
        DeviceCapabilities::new()
            .with_keys(&[BTN_TOUCH])
            .with_abs(&[ABS_X, ABS_Y, ABS_MT_SLOT, ABS_MT_POSITION_X, ABS_MT_POSITION_Y]),
    )
}

pub fn power_button_record(path: &str) -> DeviceRecord {
    DeviceRecord::new(
        path,
        "Power Button",
        DeviceCapabilities::new().with_keys(&[KEY_POWER]),
    )
}
