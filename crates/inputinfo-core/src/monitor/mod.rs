// Inputinfo Input Device Monitor
// Enumerates input devices, keeps the registry current across hotplug events

mod listener;
mod registry;
mod source;
#[cfg(feature = "udev")]
pub mod udev_source;

use std::collections::HashSet;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::mpsc::{self, Receiver};

use crate::input::{Classifier, DeviceFilter, InputDevice};
use crate::settings::Settings;

pub use listener::{DeviceEvent, DeviceListener};
pub use registry::{compare_paths, DeviceRegistry};
pub use source::{DeviceRecord, DeviceSource, HotplugAction, HotplugEvent, ProbeError};
#[cfg(feature = "udev")]
pub use udev_source::UdevSource;

use listener::ListenerSet;

/// Result type for monitor operations
pub type MonitorResult<T> = Result<T, MonitorError>;

/// Fatal monitor errors; the monitor cannot work without them succeeding
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Failed to enumerate devices: {0}")]
    Enumerate(#[source] io::Error),

    #[error("Failed to open hotplug monitor: {0}")]
    Listen(#[source] io::Error),
}

/// Input device monitor.
///
/// Owns the device source and the registry. `initialize()` enumerates the
/// present devices and opens the hotplug channel; afterwards the host event
/// loop calls `on_hotplug_event()` whenever `monitor_fd()` is readable.
pub struct InputInfoManager<S: DeviceSource> {
    source: S,
    registry: DeviceRegistry,
    classifier: Classifier,
    filter: DeviceFilter,
    listeners: ListenerSet,
    initialized: bool,
}

impl<S: DeviceSource> InputInfoManager<S> {
    /// Create a monitor with the default classifier and no filter
    pub fn new(source: S) -> Self {
        Self {
            source,
            registry: DeviceRegistry::new(),
            classifier: Classifier::default(),
            filter: DeviceFilter::default(),
            listeners: ListenerSet::default(),
            initialized: false,
        }
    }

    /// Create a monitor using the classifier and filter from `settings`
    pub fn with_settings(source: S, settings: &Settings) -> Self {
        Self::new(source)
            .with_classifier(settings.classifier.clone())
            .with_filter(settings.filter.clone())
    }

    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_filter(mut self, filter: DeviceFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Enumerate present devices and start listening for hotplug events.
    ///
    /// Calling this again after a successful start does nothing. On failure
    /// the registry is left empty and the monitor stays uninitialized.
    pub fn initialize(&mut self) -> MonitorResult<()> {
        if self.initialized {
            return Ok(());
        }

        let paths = match self.source.scan() {
            Ok(paths) => paths,
            Err(e) => {
                self.registry.clear();
                return Err(MonitorError::Enumerate(e));
            }
        };

        for path in &paths {
            if let Some(device) = self.build_device(path) {
                self.registry.insert(device);
            }
        }

        if let Err(e) = self.source.listen() {
            self.registry.clear();
            return Err(MonitorError::Listen(e));
        }

        self.initialized = true;
        let count = self.registry.len();
        log::info!("Input device monitor ready with {} device(s)", count);
        self.listeners.emit(&DeviceEvent::Ready { count });
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Snapshot of known devices in natural path order
    pub fn devices(&self) -> Vec<InputDevice> {
        self.registry.devices()
    }

    pub fn device(&self, path: &str) -> Option<InputDevice> {
        self.registry.get(path)
    }

    /// Read-only registry handle for other components or threads
    pub fn registry(&self) -> DeviceRegistry {
        self.registry.clone()
    }

    /// Descriptor to poll for readability, once initialized
    pub fn monitor_fd(&self) -> Option<RawFd> {
        if !self.initialized {
            return None;
        }
        self.source.monitor_fd()
    }

    /// Drain all pending hotplug events, applying them in delivery order.
    ///
    /// Returns the number of events consumed.
    pub fn on_hotplug_event(&mut self) -> usize {
        if !self.initialized {
            return 0;
        }

        let mut drained = 0;
        while let Some(event) = self.source.next_event() {
            drained += 1;
            match event.action {
                HotplugAction::Add => {
                    self.add_device(&event.path);
                }
                HotplugAction::Remove => {
                    self.remove_device(&event.path);
                }
            }
        }
        drained
    }

    /// Probe, classify and insert the device at `path`.
    ///
    /// Devices that cannot be read or are rejected by the filter are skipped.
    /// Returns whether an entry was inserted.
    pub fn add_device(&mut self, path: &str) -> bool {
        let Some(device) = self.build_device(path) else {
            return false;
        };

        log::info!("Input device added: {} '{}' [{}]", path, device.name, device.types);
        if self.registry.insert(device).is_some() {
            log::debug!("Replaced stale entry for {}", path);
        }
        self.listeners.emit(&DeviceEvent::Added(path.to_string()));
        true
    }

    /// Remove the device at `path`; unknown paths are ignored silently.
    ///
    /// Returns whether an entry was removed.
    pub fn remove_device(&mut self, path: &str) -> bool {
        if self.registry.remove(path).is_none() {
            log::debug!("Ignoring removal of unknown device {}", path);
            return false;
        }

        log::info!("Input device removed: {}", path);
        self.listeners.emit(&DeviceEvent::Removed(path.to_string()));
        true
    }

    /// Re-enumerate and reconcile the registry with the present devices.
    ///
    /// Entries whose path is gone are removed, new paths are added.
    pub fn rescan(&mut self) -> MonitorResult<()> {
        let present: HashSet<String> = self
            .source
            .scan()
            .map_err(MonitorError::Enumerate)?
            .into_iter()
            .collect();

        for path in self.registry.paths() {
            if !present.contains(&path) {
                self.remove_device(&path);
            }
        }

        let mut new_paths: Vec<&String> = present
            .iter()
            .filter(|path| !self.registry.contains(path))
            .collect();
        new_paths.sort_by(|a, b| compare_paths(a, b));
        for path in new_paths {
            self.add_device(path);
        }

        Ok(())
    }

    /// Register a listener for device notifications; returns its id
    pub fn add_listener(&mut self, listener: impl DeviceListener + 'static) -> u64 {
        self.listeners.add(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: u64) -> bool {
        self.listeners.remove(id)
    }

    /// Receive device notifications over a channel
    pub fn subscribe(&mut self) -> Receiver<DeviceEvent> {
        let (tx, rx) = mpsc::channel();
        self.listeners.add(Box::new(tx));
        rx
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    fn build_device(&mut self, path: &str) -> Option<InputDevice> {
        let record = match self.source.probe(path) {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping input device {}: {}", path, e);
                return None;
            }
        };

        let types = self.classifier.classify(&record.capabilities);
        let mut device = InputDevice::new(path, record.name)
            .with_types(types)
            .with_inventory(&record.capabilities);
        device.vendor_id = record.vendor_id;
        device.product_id = record.product_id;
        device.phys = record.phys;

        if !self.filter.matches(&device) {
            log::debug!("Input device {} '{}' excluded by filter", path, device.name);
            return None;
        }

        Some(device)
    }
}
