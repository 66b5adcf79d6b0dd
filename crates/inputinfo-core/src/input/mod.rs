// Inputinfo Input Layer
// Device model, capability parsing and classification

pub mod bitmask;
mod capability;
pub mod classify;
pub mod codes;
mod device;
mod filter;

pub use bitmask::{Bitmask, BitmaskError};
pub use capability::DeviceCapabilities;
pub use classify::{is_keyboard, Classifier, InputType, InputTypes, DEFAULT_PRECEDENCE};
pub use device::{is_virtual_device, InputDevice};
pub use filter::{matches_device_filter, DeviceFilter};
