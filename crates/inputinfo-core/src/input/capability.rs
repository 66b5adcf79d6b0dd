// Inputinfo Input Layer - Device Capabilities
// Capability bundle read from a device's sysfs attributes

use super::bitmask::Bitmask;
use super::codes::*;

/// Device capabilities extracted from the kernel capability bitmasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceCapabilities {
    /// Supported EV_KEY codes (keys and buttons)
    pub keys: Bitmask,
    /// Supported EV_REL axes
    pub rel: Bitmask,
    /// Supported EV_ABS axes
    pub abs: Bitmask,
    /// Supported EV_SW switches
    pub switches: Bitmask,
    /// INPUT_PROP_* device properties
    pub props: Bitmask,
}

impl DeviceCapabilities {
    /// Create an empty capability bundle
    pub fn new() -> Self {
        Self::default()
    }

    /// Set supported key codes
    pub fn with_keys(mut self, codes: &[u16]) -> Self {
        self.keys = Bitmask::from_codes(codes);
        self
    }

    /// Set supported relative axes
    pub fn with_rel(mut self, codes: &[u16]) -> Self {
        self.rel = Bitmask::from_codes(codes);
        self
    }

    /// Set supported absolute axes
    pub fn with_abs(mut self, codes: &[u16]) -> Self {
        self.abs = Bitmask::from_codes(codes);
        self
    }

    /// Set supported switches
    pub fn with_switches(mut self, codes: &[u16]) -> Self {
        self.switches = Bitmask::from_codes(codes);
        self
    }

    /// Set input properties
    pub fn with_props(mut self, codes: &[u16]) -> Self {
        self.props = Bitmask::from_codes(codes);
        self
    }

    /// Check if a specific key code is supported
    pub fn supports_key(&self, key_code: u16) -> bool {
        self.keys.contains(key_code)
    }

    pub fn has_rel_xy(&self) -> bool {
        self.rel.contains_all(&[REL_X, REL_Y])
    }

    pub fn has_abs_xy(&self) -> bool {
        self.abs.contains_all(&[ABS_X, ABS_Y])
    }

    /// Whether the device reports multitouch (type B slots or MT positions)
    pub fn has_multitouch(&self) -> bool {
        self.abs.contains(ABS_MT_SLOT)
            || self.abs.contains_all(&[ABS_MT_POSITION_X, ABS_MT_POSITION_Y])
    }

    pub fn has_prop(&self, prop: u16) -> bool {
        self.props.contains(prop)
    }

    /// Key codes below `BTN_MISC`
    pub fn keyboard_keys(&self) -> Vec<u16> {
        self.keys.iter().filter(|&code| code < BTN_MISC).collect()
    }

    /// Button codes (`BTN_MISC` and above)
    pub fn buttons(&self) -> Vec<u16> {
        self.keys.iter().filter(|&code| code >= BTN_MISC).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_capabilities_supports_key() {
        let caps = DeviceCapabilities::new().with_keys(&[16, 17, 18, 30, 57]);
        assert!(caps.supports_key(16)); // Q
        assert!(caps.supports_key(30)); // A
        assert!(!caps.supports_key(100)); // Not in list
    }

    #[test]
    fn test_split_keys_and_buttons() {
        let caps = DeviceCapabilities::new().with_keys(&[KEY_POWER, BTN_LEFT, BTN_RIGHT]);
        assert_eq!(caps.keyboard_keys(), vec![KEY_POWER]);
        assert_eq!(caps.buttons(), vec![BTN_LEFT, BTN_RIGHT]);
    }

    #[test]
    fn test_axes() {
        let caps = DeviceCapabilities::new()
            .with_rel(&[REL_X, REL_Y, REL_WHEEL])
            .with_abs(&[ABS_X]);
        assert!(caps.has_rel_xy());
        assert!(!caps.has_abs_xy());
        assert!(!caps.has_multitouch());
    }

    #[test]
    fn test_multitouch_by_slot_or_positions() {
        let slot = DeviceCapabilities::new().with_abs(&[ABS_X, ABS_Y, ABS_MT_SLOT]);
        assert!(slot.has_multitouch());

        let positions = DeviceCapabilities::new()
            .with_abs(&[ABS_X, ABS_Y, ABS_MT_POSITION_X, ABS_MT_POSITION_Y]);
        assert!(positions.has_multitouch());

        let half = DeviceCapabilities::new().with_abs(&[ABS_X, ABS_Y, ABS_MT_POSITION_X]);
        assert!(!half.has_multitouch());
    }
}
