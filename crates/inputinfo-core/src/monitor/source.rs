// Inputinfo Device Source
// Seam to the platform enumeration and hotplug subsystem

use std::io;
use std::os::unix::io::RawFd;

use crate::input::{BitmaskError, DeviceCapabilities};

/// Kind of hotplug notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotplugAction {
    Add,
    Remove,
}

/// One hotplug notification for a device path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HotplugEvent {
    pub action: HotplugAction,
    pub path: String,
}

impl HotplugEvent {
    pub fn add(path: impl Into<String>) -> Self {
        Self {
            action: HotplugAction::Add,
            path: path.into(),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            action: HotplugAction::Remove,
            path: path.into(),
        }
    }
}

/// Raw attributes read for one device path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceRecord {
    pub path: String,
    pub name: String,
    pub vendor_id: Option<u16>,
    pub product_id: Option<u16>,
    pub phys: Option<String>,
    pub capabilities: DeviceCapabilities,
}

impl DeviceRecord {
    pub fn new(
        path: impl Into<String>,
        name: impl Into<String>,
        capabilities: DeviceCapabilities,
    ) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            capabilities,
            ..Self::default()
        }
    }
}

/// Errors reading a single device; the device is skipped
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("Device not found: {0}")]
    NotFound(String),

    #[error("Missing attribute '{attribute}' on {path}")]
    MissingAttribute {
        path: String,
        attribute: &'static str,
    },

    #[error("Invalid attribute '{attribute}' on {path}: {source}")]
    InvalidAttribute {
        path: String,
        attribute: &'static str,
        #[source]
        source: BitmaskError,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Platform device enumeration and hotplug monitoring.
///
/// Implementations list present devices, read per-device attributes, and
/// expose a monitoring channel whose descriptor becomes readable when
/// hotplug events are pending.
pub trait DeviceSource {
    /// Paths of all currently present devices
    fn scan(&mut self) -> io::Result<Vec<String>>;

    /// Read the attributes of the device at `path`
    fn probe(&mut self, path: &str) -> Result<DeviceRecord, ProbeError>;

    /// Open the hotplug monitoring channel
    fn listen(&mut self) -> io::Result<()>;

    /// Next pending hotplug event, `None` once drained. Must not block.
    fn next_event(&mut self) -> Option<HotplugEvent>;

    /// Pollable descriptor of the monitoring channel, once listening
    fn monitor_fd(&self) -> Option<RawFd>;
}
