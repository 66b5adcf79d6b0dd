// Inputinfo Input Layer - Device Filtering
// Decides which probed devices enter the registry

use super::device::{is_virtual_device, InputDevice};

/// Check if a device matches the given filter criteria.
///
/// 1. If `only` is non-empty, the device must be listed by path or name
/// 2. Otherwise virtual devices are excluded when `ignore_virtual` is set
///
/// # Arguments
/// * `device_name` - The device name
/// * `device_path` - The device path (e.g., "/dev/input/event0")
/// * `only` - List of device names/paths to keep (empty keeps everything)
/// * `ignore_virtual` - Whether virtual devices are dropped in the unfiltered case
/// * `is_virtual` - Whether the device is a virtual device (from is_virtual_device())
pub fn matches_device_filter(
    device_name: &str,
    device_path: &str,
    only: &[String],
    ignore_virtual: bool,
    is_virtual: bool,
) -> bool {
    if !only.is_empty() {
        return only
            .iter()
            .any(|wanted| device_path == wanted || device_name == wanted);
    }

    !(ignore_virtual && is_virtual)
}

/// Filter configuration applied by the monitor before inserting a device
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceFilter {
    /// Explicit device names or paths to keep
    pub only: Vec<String>,
    /// Drop devices whose name carries `virtual_prefix`
    pub ignore_virtual: bool,
    /// Marker identifying virtual devices by name
    pub virtual_prefix: String,
}

impl Default for DeviceFilter {
    fn default() -> Self {
        Self {
            only: Vec::new(),
            ignore_virtual: false,
            virtual_prefix: "(virtual)".to_string(),
        }
    }
}

impl DeviceFilter {
    pub fn matches(&self, device: &InputDevice) -> bool {
        let is_virtual = is_virtual_device(&device.name, &self.virtual_prefix);
        matches_device_filter(
            &device.name,
            &device.path,
            &self.only,
            self.ignore_virtual,
            is_virtual,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_by_path() {
        let only = vec!["/dev/input/event0".to_string()];
        assert!(matches_device_filter(
            "Logitech Keyboard",
            "/dev/input/event0",
            &only,
            false,
            false
        ));
    }

    #[test]
    fn test_matches_by_name() {
        let only = vec!["Logitech Keyboard".to_string()];
        assert!(matches_device_filter(
            "Logitech Keyboard",
            "/dev/input/event5",
            &only,
            false,
            false
        ));
    }

    #[test]
    fn test_no_match_when_filtered() {
        let only = vec!["Specific Device".to_string()];
        assert!(!matches_device_filter(
            "Other Device",
            "/dev/input/event1",
            &only,
            false,
            false
        ));
    }

    #[test]
    fn test_unfiltered_keeps_everything() {
        assert!(matches_device_filter("Generic Mouse", "/dev/input/event1", &[], false, false));
        assert!(matches_device_filter("Uinput (virtual)", "/dev/input/event2", &[], false, true));
    }

    #[test]
    fn test_ignore_virtual_device() {
        assert!(!matches_device_filter(
            "remapper (virtual) keyboard",
            "/dev/input/event2",
            &[],
            true,
            true
        ));
    }

    #[test]
    fn test_explicit_match_includes_virtual() {
        // Explicitly listed devices are kept even when virtual
        let only = vec!["remapper (virtual) keyboard".to_string()];
        assert!(matches_device_filter(
            "remapper (virtual) keyboard",
            "/dev/input/event2",
            &only,
            true,
            true
        ));
    }

    #[test]
    fn test_device_filter_struct() {
        let filter = DeviceFilter {
            ignore_virtual: true,
            ..DeviceFilter::default()
        };
        assert!(filter.matches(&InputDevice::new("/dev/input/event0", "AT Keyboard")));
        assert!(!filter.matches(&InputDevice::new("/dev/input/event9", "remapper (virtual)")));
    }
}
