// Inputinfo Core Library
// Input device enumeration, classification and hotplug monitoring

pub mod event;
pub mod input;
pub mod monitor;
pub mod settings;

pub use event::{EventLoop, EventLoopError, EventLoopResult, PollOutcome};
pub use input::{
    is_keyboard, is_virtual_device, matches_device_filter, Bitmask, BitmaskError, Classifier,
    DeviceCapabilities, DeviceFilter, InputDevice, InputType, InputTypes,
};
pub use monitor::{
    DeviceEvent, DeviceListener, DeviceRecord, DeviceRegistry, DeviceSource, HotplugAction,
    HotplugEvent, InputInfoManager, MonitorError, MonitorResult, ProbeError,
};
#[cfg(feature = "udev")]
pub use monitor::UdevSource;
pub use settings::{MonitorSettings, Settings, SettingsError};
