// Inputinfo Settings Module
// Monitor, classification and filter settings loaded from TOML

use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::input::{Classifier, DeviceFilter, InputType};

/// Default devnode prefix of evdev nodes
pub const DEFAULT_DEVNODE_PREFIX: &str = "/dev/input/event";

/// Settings for inputinfo
///
/// These settings are loaded from a TOML file (default:
/// ~/.config/inputinfo/settings.toml). Every section and key is optional.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// Enumeration and event loop settings
    pub monitor: MonitorSettings,

    /// Classification rule order
    pub classifier: Classifier,

    /// Which devices enter the registry
    pub filter: DeviceFilter,

    /// Path to the settings file (for reload)
    source_path: Option<PathBuf>,
}

/// Enumeration subsystem and polling settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// udev subsystem to enumerate and monitor
    pub subsystem: String,
    /// Only device nodes starting with this prefix are tracked
    pub devnode_prefix: String,
    /// Poll timeout of the event loop (-1 blocks indefinitely)
    pub poll_timeout_ms: i32,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            subsystem: "input".to_string(),
            devnode_prefix: DEFAULT_DEVNODE_PREFIX.to_string(),
            poll_timeout_ms: 500,
        }
    }
}

/// Errors that can occur when loading settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(String),

    #[error("Invalid setting value: {0}")]
    InvalidValue(String),
}

/// TOML representation for deserializing settings
#[derive(Debug, Clone, serde::Deserialize, Default)]
struct SettingsToml {
    #[serde(default)]
    monitor: Option<MonitorToml>,

    #[serde(default)]
    classification: Option<ClassificationToml>,

    #[serde(default)]
    devices: Option<DevicesToml>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct MonitorToml {
    #[serde(default)]
    subsystem: Option<String>,
    #[serde(default)]
    devnode_prefix: Option<String>,
    #[serde(default)]
    poll_timeout_ms: Option<i64>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct ClassificationToml {
    #[serde(default)]
    precedence: Option<Vec<String>>,
}

#[derive(Debug, Clone, serde::Deserialize, Default)]
struct DevicesToml {
    #[serde(default)]
    only: Option<Vec<String>>,
    #[serde(default)]
    ignore_virtual: Option<bool>,
    #[serde(default)]
    virtual_prefix: Option<String>,
}

impl Settings {
    /// Create settings with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load settings from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(&path)?;
        let mut settings = Self::from_toml(&content)?;
        settings.source_path = Some(path.as_ref().to_path_buf());
        Ok(settings)
    }

    /// Load settings from TOML string
    pub fn from_toml(content: &str) -> Result<Self, SettingsError> {
        let toml_settings: SettingsToml =
            toml::from_str(content).map_err(|e| SettingsError::TomlParse(e.to_string()))?;

        let mut settings = Self::new();

        if let Some(monitor) = toml_settings.monitor {
            if let Some(subsystem) = monitor.subsystem {
                if subsystem.trim().is_empty() {
                    return Err(SettingsError::InvalidValue(
                        "monitor.subsystem must not be empty".to_string(),
                    ));
                }
                settings.monitor.subsystem = subsystem;
            }
            if let Some(prefix) = monitor.devnode_prefix {
                settings.monitor.devnode_prefix = prefix;
            }
            if let Some(timeout) = monitor.poll_timeout_ms {
                settings.monitor.poll_timeout_ms = parse_timeout(timeout)?;
            }
        }

        if let Some(classification) = toml_settings.classification {
            if let Some(precedence) = classification.precedence {
                settings.classifier = parse_precedence(&precedence)?;
            }
        }

        if let Some(devices) = toml_settings.devices {
            if let Some(only) = devices.only {
                settings.filter.only = only;
            }
            if let Some(ignore_virtual) = devices.ignore_virtual {
                settings.filter.ignore_virtual = ignore_virtual;
            }
            if let Some(prefix) = devices.virtual_prefix {
                settings.filter.virtual_prefix = prefix;
            }
        }

        Ok(settings)
    }

    /// Get the default settings path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("inputinfo").join("settings.toml"))
    }

    /// Load from default location (~/.config/inputinfo/settings.toml)
    pub fn load_default() -> Result<Self, SettingsError> {
        if let Some(path) = Self::default_path() {
            if path.exists() {
                return Self::from_file(path);
            }
        }
        // Return default settings if file doesn't exist
        Ok(Self::new())
    }

    /// Path the settings were loaded from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    /// Reload settings from the original file
    pub fn reload(&mut self) -> Result<(), SettingsError> {
        if let Some(ref path) = self.source_path {
            let new_settings = Self::from_file(path)?;
            *self = new_settings;
            Ok(())
        } else {
            Err(SettingsError::InvalidValue("No source path set".to_string()))
        }
    }
}

fn parse_timeout(value: i64) -> Result<i32, SettingsError> {
    if value < -1 || value > i64::from(i32::MAX) {
        return Err(SettingsError::InvalidValue(format!(
            "monitor.poll_timeout_ms out of range: {}",
            value
        )));
    }
    Ok(value as i32)
}

fn parse_precedence(names: &[String]) -> Result<Classifier, SettingsError> {
    if names.is_empty() {
        return Err(SettingsError::InvalidValue(
            "classification.precedence must list at least one type".to_string(),
        ));
    }

    let types = names
        .iter()
        .map(|name| {
            InputType::from_str(name.trim()).map_err(|_| {
                SettingsError::InvalidValue(format!("Unknown input type '{}'", name))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Classifier::with_precedence(types))
}

/// Create default settings content for a new installation
pub fn default_settings_content() -> &'static str {
    r#"# Inputinfo Settings
# Place this file at: ~/.config/inputinfo/settings.toml

[monitor]
# udev subsystem to enumerate and watch
subsystem = "input"
# Only device nodes with this prefix are tracked
devnode_prefix = "/dev/input/event"
# Event loop poll timeout in milliseconds (-1 = block)
poll_timeout_ms = 500

[classification]
# Rule order; earlier types win over mutually exclusive later ones
# (touchscreen/touchpad, keyboard/keys-only). Omitted types are never assigned.
precedence = ["touchscreen", "touchpad", "mouse", "keyboard", "keys-only", "joystick", "switch"]

[devices]
# Restrict the registry to these device names or paths
# only = ["/dev/input/event3", "AT Translated Set 2 keyboard"]
ignore_virtual = false
virtual_prefix = "(virtual)"
"#
}
