// Inputinfo Input Layer - Classification
// Maps a capability bundle to a set of input type tags

use std::fmt;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

use super::capability::DeviceCapabilities;
use super::codes::*;

/// Classification label describing what kind of input a device produces
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    serde::Serialize,
    serde::Deserialize,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum InputType {
    /// Full keyboard (letter row and space bar)
    Keyboard,
    /// Relative pointer with a left button
    Mouse,
    /// Absolute pointer driven indirectly (clickpads, trackpads)
    Touchpad,
    /// Absolute direct-touch surface
    Touchscreen,
    /// Joystick or gamepad buttons with absolute axes
    Joystick,
    /// A handful of keys that do not form a keyboard (power, volume, media)
    KeysOnly,
    /// Switches such as a lid or tablet-mode sensor
    Switch,
}

bitflags::bitflags! {
    /// Fixed-size set of [`InputType`] tags
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct InputTypes: u8 {
        const KEYBOARD = 1 << 0;
        const MOUSE = 1 << 1;
        const TOUCHPAD = 1 << 2;
        const TOUCHSCREEN = 1 << 3;
        const JOYSTICK = 1 << 4;
        const KEYS_ONLY = 1 << 5;
        const SWITCH = 1 << 6;
    }
}

impl InputType {
    /// The flag representing this tag in an [`InputTypes`] set
    pub fn flag(self) -> InputTypes {
        match self {
            InputType::Keyboard => InputTypes::KEYBOARD,
            InputType::Mouse => InputTypes::MOUSE,
            InputType::Touchpad => InputTypes::TOUCHPAD,
            InputType::Touchscreen => InputTypes::TOUCHSCREEN,
            InputType::Joystick => InputTypes::JOYSTICK,
            InputType::KeysOnly => InputTypes::KEYS_ONLY,
            InputType::Switch => InputTypes::SWITCH,
        }
    }

    /// Tags that cannot be assigned together with this one
    pub fn exclusive_with(self) -> InputTypes {
        match self {
            InputType::Touchscreen => InputTypes::TOUCHPAD,
            InputType::Touchpad => InputTypes::TOUCHSCREEN,
            InputType::Keyboard => InputTypes::KEYS_ONLY,
            InputType::KeysOnly => InputTypes::KEYBOARD,
            _ => InputTypes::empty(),
        }
    }

    /// Evaluate this tag's rule against a capability bundle
    pub fn matches(self, caps: &DeviceCapabilities) -> bool {
        match self {
            InputType::Touchscreen => is_touchscreen(caps),
            InputType::Touchpad => is_touchpad(caps),
            InputType::Mouse => caps.has_rel_xy() && caps.supports_key(BTN_LEFT),
            InputType::Keyboard => is_keyboard(caps),
            InputType::KeysOnly => caps.keys.any_in(KEY_ESC..=BTN_MISC - 1),
            InputType::Joystick => {
                caps.keys.any_in(BTN_JOYSTICK..=BTN_THUMBR) && !caps.abs.is_empty()
            }
            InputType::Switch => !caps.switches.is_empty(),
        }
    }
}

impl InputTypes {
    /// Tags contained in this set, in declaration order
    pub fn types(&self) -> Vec<InputType> {
        InputType::iter().filter(|t| self.contains(t.flag())).collect()
    }

    pub fn has(&self, input_type: InputType) -> bool {
        self.contains(input_type.flag())
    }
}

impl Default for InputTypes {
    fn default() -> Self {
        InputTypes::empty()
    }
}

impl From<InputType> for InputTypes {
    fn from(input_type: InputType) -> Self {
        input_type.flag()
    }
}

impl FromIterator<InputType> for InputTypes {
    fn from_iter<I: IntoIterator<Item = InputType>>(iter: I) -> Self {
        iter.into_iter()
            .fold(InputTypes::empty(), |acc, t| acc | t.flag())
    }
}

impl fmt::Display for InputTypes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "unknown");
        }
        let names: Vec<&'static str> = self.types().into_iter().map(Into::into).collect();
        write!(f, "{}", names.join(", "))
    }
}

// QWERTY row key codes: Q, W, E, R, T, Y
const QWERTY_CODES: &[u16] = &[KEY_Q, KEY_W, KEY_E, KEY_R, KEY_T, KEY_Y];

// Representative A-Z and SPACE codes for keyboard detection
const A_Z_SPACE_CODES: &[u16] = &[KEY_SPACE, KEY_A, KEY_Z];

/// Determine if a device is a keyboard based on its capabilities.
///
/// A device is considered a keyboard if all QWERTY row keys (Q, W, E, R, T, Y)
/// are present along with the representative A, Z and SPACE keys.
pub fn is_keyboard(caps: &DeviceCapabilities) -> bool {
    caps.keys.contains_all(QWERTY_CODES) && caps.keys.contains_all(A_Z_SPACE_CODES)
}

fn is_touchscreen(caps: &DeviceCapabilities) -> bool {
    if !caps.has_abs_xy() {
        return false;
    }
    if caps.has_prop(INPUT_PROP_DIRECT) {
        return true;
    }
    caps.has_multitouch()
        && !caps.has_prop(INPUT_PROP_POINTER)
        && !caps.has_prop(INPUT_PROP_BUTTONPAD)
}

fn is_touchpad(caps: &DeviceCapabilities) -> bool {
    if !caps.has_abs_xy() {
        return false;
    }
    caps.has_prop(INPUT_PROP_BUTTONPAD)
        || (caps.has_prop(INPUT_PROP_POINTER) && caps.supports_key(BTN_TOOL_FINGER))
}

/// Default rule order
pub const DEFAULT_PRECEDENCE: &[InputType] = &[
    InputType::Touchscreen,
    InputType::Touchpad,
    InputType::Mouse,
    InputType::Keyboard,
    InputType::KeysOnly,
    InputType::Joystick,
    InputType::Switch,
];

/// Rule-driven classifier.
///
/// Rules run in precedence order and every matching tag is recorded, except
/// that a tag is dropped when a mutually exclusive tag matched earlier
/// (touchscreen/touchpad, keyboard/keys-only). Tags missing from the
/// precedence list are never assigned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classifier {
    precedence: Vec<InputType>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self {
            precedence: DEFAULT_PRECEDENCE.to_vec(),
        }
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier with a custom rule order; repeated tags keep
    /// their first position.
    pub fn with_precedence(precedence: impl IntoIterator<Item = InputType>) -> Self {
        let mut ordered: Vec<InputType> = Vec::new();
        for input_type in precedence {
            if !ordered.contains(&input_type) {
                ordered.push(input_type);
            }
        }
        Self { precedence: ordered }
    }

    pub fn precedence(&self) -> &[InputType] {
        &self.precedence
    }

    pub fn classify(&self, caps: &DeviceCapabilities) -> InputTypes {
        let mut types = InputTypes::empty();
        for &input_type in &self.precedence {
            if input_type.matches(caps) && !types.intersects(input_type.exclusive_with()) {
                types |= input_type.flag();
            }
        }
        types
    }
}
