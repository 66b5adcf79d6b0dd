// Inputinfo Device Notifications
// Listener registry for device added/removed notifications

use std::sync::mpsc::Sender;

/// Notification emitted by the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceEvent {
    /// A device entered the registry
    Added(String),
    /// A device left the registry
    Removed(String),
    /// Initial enumeration finished with `count` devices
    Ready { count: usize },
}

impl DeviceEvent {
    /// Device path carried by added/removed notifications
    pub fn path(&self) -> Option<&str> {
        match self {
            DeviceEvent::Added(path) | DeviceEvent::Removed(path) => Some(path),
            DeviceEvent::Ready { .. } => None,
        }
    }
}

/// Trait for reacting to device notifications.
///
/// Returning `false` unregisters the listener.
pub trait DeviceListener {
    fn on_device_event(&mut self, event: &DeviceEvent) -> bool;
}

impl<F> DeviceListener for F
where
    F: FnMut(&DeviceEvent),
{
    fn on_device_event(&mut self, event: &DeviceEvent) -> bool {
        self(event);
        true
    }
}

impl DeviceListener for Sender<DeviceEvent> {
    fn on_device_event(&mut self, event: &DeviceEvent) -> bool {
        // Receiver dropped
        self.send(event.clone()).is_ok()
    }
}

/// Registered listeners, notified in registration order
#[derive(Default)]
pub(crate) struct ListenerSet {
    next_id: u64,
    listeners: Vec<(u64, Box<dyn DeviceListener>)>,
}

impl ListenerSet {
    pub(crate) fn add(&mut self, listener: Box<dyn DeviceListener>) -> u64 {
        let id = self.next_id;
        self.listeners.push((id, listener));
        self.next_id += 1;
        id
    }

    pub(crate) fn remove(&mut self, id: u64) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub(crate) fn emit(&mut self, event: &DeviceEvent) {
        self.listeners
            .retain_mut(|(_, listener)| listener.on_device_event(event));
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}
