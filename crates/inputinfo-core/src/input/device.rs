// Inputinfo Input Layer - Input Device
// Registry entry describing one classified input device

use super::capability::DeviceCapabilities;
use super::classify::{InputType, InputTypes};

/// One physical or virtual input device known to the monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputDevice {
    /// Device node path (e.g. "/dev/input/event3"), the registry key
    pub path: String,
    /// Device name reported by the kernel
    pub name: String,
    /// Capability tags assigned at classification time
    pub types: InputTypes,
    /// Vendor ID (USB VID)
    pub vendor_id: Option<u16>,
    /// Product ID (USB PID)
    pub product_id: Option<u16>,
    /// Physical path
    pub phys: Option<String>,
    /// Button codes (BTN_MISC and above)
    pub buttons: Vec<u16>,
    /// Switch codes
    pub switches: Vec<u16>,
    /// Relative axis codes
    pub relative_axes: Vec<u16>,
    /// Absolute axis codes
    pub absolute_axes: Vec<u16>,
}

impl InputDevice {
    /// Create a new device with no metadata
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            types: InputTypes::empty(),
            vendor_id: None,
            product_id: None,
            phys: None,
            buttons: Vec::new(),
            switches: Vec::new(),
            relative_axes: Vec::new(),
            absolute_axes: Vec::new(),
        }
    }

    /// Set capability tags
    pub fn with_types(mut self, types: InputTypes) -> Self {
        self.types = types;
        self
    }

    /// Set vendor ID
    pub fn with_vendor_id(mut self, vid: u16) -> Self {
        self.vendor_id = Some(vid);
        self
    }

    /// Set product ID
    pub fn with_product_id(mut self, pid: u16) -> Self {
        self.product_id = Some(pid);
        self
    }

    /// Set physical path
    pub fn with_phys(mut self, phys: impl Into<String>) -> Self {
        self.phys = Some(phys.into());
        self
    }

    /// Copy the button, switch and axis inventory out of a capability bundle
    pub fn with_inventory(mut self, caps: &DeviceCapabilities) -> Self {
        self.buttons = caps.buttons();
        self.switches = caps.switches.iter().collect();
        self.relative_axes = caps.rel.iter().collect();
        self.absolute_axes = caps.abs.iter().collect();
        self
    }

    pub fn has_type(&self, input_type: InputType) -> bool {
        self.types.has(input_type)
    }
}

/// Check if a device is a virtual device based on its name.
///
/// # Arguments
/// * `name` - The device name
/// * `prefix` - The virtual device marker (e.g., "(virtual)")
pub fn is_virtual_device(name: &str, prefix: &str) -> bool {
    !prefix.is_empty() && name.contains(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::codes::*;

    #[test]
    fn test_builder() {
        let device = InputDevice::new("/dev/input/event4", "Logitech USB Receiver")
            .with_types(InputTypes::MOUSE)
            .with_vendor_id(0x046d)
            .with_product_id(0xc52b)
            .with_phys("usb-0000:00:14.0-2/input0");

        assert_eq!(device.path, "/dev/input/event4");
        assert!(device.has_type(InputType::Mouse));
        assert!(!device.has_type(InputType::Keyboard));
        assert_eq!(device.vendor_id, Some(0x046d));
        assert_eq!(device.product_id, Some(0xc52b));
        assert_eq!(device.phys.as_deref(), Some("usb-0000:00:14.0-2/input0"));
    }

    #[test]
    fn test_inventory() {
        let caps = DeviceCapabilities::new()
            .with_keys(&[KEY_POWER, BTN_LEFT, BTN_RIGHT])
            .with_rel(&[REL_X, REL_Y])
            .with_switches(&[SW_LID]);
        let device = InputDevice::new("/dev/input/event1", "Combo").with_inventory(&caps);

        assert_eq!(device.buttons, vec![BTN_LEFT, BTN_RIGHT]);
        assert_eq!(device.relative_axes, vec![REL_X, REL_Y]);
        assert_eq!(device.switches, vec![SW_LID]);
        assert!(device.absolute_axes.is_empty());
    }

    #[test]
    fn test_is_virtual_device_with_prefix() {
        assert!(is_virtual_device("remapper (virtual) keyboard", "(virtual)"));
    }

    #[test]
    fn test_is_virtual_device_without_prefix() {
        assert!(!is_virtual_device("Logitech USB Keyboard", "(virtual)"));
        assert!(!is_virtual_device("Logitech USB Keyboard", ""));
    }
}
