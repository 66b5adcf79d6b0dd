// Inputinfo Device Registry
// Path-keyed device map shared between the monitor and its readers

use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::input::InputDevice;

/// Registry of known input devices, keyed by device path.
///
/// Cloning yields another handle to the same map, so readers on other
/// threads can query while the monitor mutates. Only the monitor can insert
/// or remove entries.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Arc<RwLock<HashMap<String, InputDevice>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all devices in natural path order
    pub fn devices(&self) -> Vec<InputDevice> {
        let mut devices: Vec<InputDevice> = self.devices.read().values().cloned().collect();
        devices.sort_by(|a, b| compare_paths(&a.path, &b.path));
        devices
    }

    /// Known device paths in natural order
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.devices.read().keys().cloned().collect();
        paths.sort_by(|a, b| compare_paths(a, b));
        paths
    }

    pub fn get(&self, path: &str) -> Option<InputDevice> {
        self.devices.read().get(path).cloned()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.devices.read().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }

    /// Insert a device, replacing any entry at the same path
    pub(crate) fn insert(&self, device: InputDevice) -> Option<InputDevice> {
        self.devices.write().insert(device.path.clone(), device)
    }

    pub(crate) fn remove(&self, path: &str) -> Option<InputDevice> {
        self.devices.write().remove(path)
    }

    pub(crate) fn clear(&self) {
        self.devices.write().clear();
    }
}

/// Order paths by their non-numeric stem, then by trailing number, so
/// "event9" sorts before "event10".
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    let (stem_a, num_a) = split_trailing_number(a);
    let (stem_b, num_b) = split_trailing_number(b);
    stem_a
        .cmp(stem_b)
        .then(num_a.cmp(&num_b))
        .then_with(|| a.cmp(b))
}

fn split_trailing_number(path: &str) -> (&str, Option<u64>) {
    let stem = path.trim_end_matches(|c: char| c.is_ascii_digit());
    let number = path[stem.len()..].parse().ok();
    (stem, number)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputTypes;

    #[test]
    fn test_insert_replaces_same_path() {
        let registry = DeviceRegistry::new();
        registry.insert(InputDevice::new("/dev/input/event3", "A").with_types(InputTypes::MOUSE));
        let old = registry
            .insert(InputDevice::new("/dev/input/event3", "B").with_types(InputTypes::KEYBOARD));

        assert_eq!(old.map(|d| d.name), Some("A".to_string()));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get("/dev/input/event3").map(|d| d.types),
            Some(InputTypes::KEYBOARD)
        );
    }

    #[test]
    fn test_natural_order() {
        let registry = DeviceRegistry::new();
        for path in ["/dev/input/event10", "/dev/input/event2", "/dev/input/event9"] {
            registry.insert(InputDevice::new(path, "dev"));
        }
        assert_eq!(
            registry.paths(),
            vec!["/dev/input/event2", "/dev/input/event9", "/dev/input/event10"]
        );
    }

    #[test]
    fn test_clone_shares_state() {
        let registry = DeviceRegistry::new();
        let reader = registry.clone();
        registry.insert(InputDevice::new("/dev/input/event0", "Power Button"));
        assert!(reader.contains("/dev/input/event0"));
        registry.remove("/dev/input/event0");
        assert!(reader.is_empty());
    }

    #[test]
    fn test_compare_paths_without_numbers() {
        assert_eq!(compare_paths("/dev/input/mice", "/dev/input/mice"), Ordering::Equal);
        assert_eq!(
            compare_paths("/dev/input/event1", "/dev/input/mice"),
            Ordering::Less
        );
    }
}
