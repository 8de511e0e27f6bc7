//! Action codes: the abstract signed integer a control is bound to.
//!
//! The layout collaborator stores one `i32` per control (or per d-pad
//! direction).  The value space is partitioned as follows:
//!
//! | Raw value          | Meaning                                  |
//! |--------------------|------------------------------------------|
//! | `>= 0`             | keyboard, SDL scancode                   |
//! | `-1 ..= -3`        | mouse button (left, right, middle)       |
//! | `-4`, `-5`         | mouse wheel up / down                    |
//! | `-100`             | open the on-screen text input            |
//! | `-200 ..= -214`    | gamepad digital button                   |
//! | `-220`, `-221`     | gamepad analog trigger (left, right)     |
//!
//! Anything else decodes to [`ActionCode::Unmapped`] and is never
//! dispatched.  These boundaries are a contract with stored layouts and
//! must not change.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::Scancode;

/// Raw value of the "open text input" sentinel.
pub const TEXT_INPUT_CODE: i32 = -100;

const MOUSE_LEFT_CODE: i32 = -1;
const MOUSE_RIGHT_CODE: i32 = -2;
const MOUSE_MIDDLE_CODE: i32 = -3;
const WHEEL_UP_CODE: i32 = -4;
const WHEEL_DOWN_CODE: i32 = -5;
const GAMEPAD_FIRST_CODE: i32 = -200;
const GAMEPAD_LAST_CODE: i32 = -214;
const TRIGGER_LEFT_CODE: i32 = -220;
const TRIGGER_RIGHT_CODE: i32 = -221;

/// Error returned when a textual action name cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown action name: {0:?}")]
pub struct ActionParseError(pub String);

/// Mouse buttons addressable by an action code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// The raw action code for this button.
    pub fn code(self) -> i32 {
        match self {
            MouseButton::Left => MOUSE_LEFT_CODE,
            MouseButton::Right => MOUSE_RIGHT_CODE,
            MouseButton::Middle => MOUSE_MIDDLE_CODE,
        }
    }
}

/// Direction of a single wheel notch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelDirection {
    Up,
    Down,
}

impl WheelDirection {
    /// Vertical wheel delta sent to the injection bridge: `+1.0` up, `-1.0` down.
    pub fn delta(self) -> f32 {
        match self {
            WheelDirection::Up => 1.0,
            WheelDirection::Down => -1.0,
        }
    }
}

/// Digital gamepad buttons, in raw-code order starting at `-200`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    A,
    B,
    X,
    Y,
    Back,
    Guide,
    Start,
    LeftStick,
    RightStick,
    LeftShoulder,
    RightShoulder,
    DpadUp,
    DpadDown,
    DpadLeft,
    DpadRight,
}

const GAMEPAD_BUTTONS: [GamepadButton; 15] = [
    GamepadButton::A,
    GamepadButton::B,
    GamepadButton::X,
    GamepadButton::Y,
    GamepadButton::Back,
    GamepadButton::Guide,
    GamepadButton::Start,
    GamepadButton::LeftStick,
    GamepadButton::RightStick,
    GamepadButton::LeftShoulder,
    GamepadButton::RightShoulder,
    GamepadButton::DpadUp,
    GamepadButton::DpadDown,
    GamepadButton::DpadLeft,
    GamepadButton::DpadRight,
];

impl GamepadButton {
    /// The raw action code for this button (`-200` for A down to `-214`).
    pub fn code(self) -> i32 {
        GAMEPAD_FIRST_CODE - self as i32
    }

    fn from_code(code: i32) -> Option<Self> {
        if !(GAMEPAD_LAST_CODE..=GAMEPAD_FIRST_CODE).contains(&code) {
            return None;
        }
        GAMEPAD_BUTTONS
            .get((GAMEPAD_FIRST_CODE - code) as usize)
            .copied()
    }

    fn name(self) -> &'static str {
        match self {
            GamepadButton::A => "GamepadA",
            GamepadButton::B => "GamepadB",
            GamepadButton::X => "GamepadX",
            GamepadButton::Y => "GamepadY",
            GamepadButton::Back => "GamepadBack",
            GamepadButton::Guide => "GamepadGuide",
            GamepadButton::Start => "GamepadStart",
            GamepadButton::LeftStick => "GamepadLeftStick",
            GamepadButton::RightStick => "GamepadRightStick",
            GamepadButton::LeftShoulder => "GamepadLeftShoulder",
            GamepadButton::RightShoulder => "GamepadRightShoulder",
            GamepadButton::DpadUp => "GamepadDpadUp",
            GamepadButton::DpadDown => "GamepadDpadDown",
            GamepadButton::DpadLeft => "GamepadDpadLeft",
            GamepadButton::DpadRight => "GamepadDpadRight",
        }
    }
}

/// Analog gamepad triggers, driven as buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Left,
    Right,
}

impl Trigger {
    /// The raw action code for this trigger.
    pub fn code(self) -> i32 {
        match self {
            Trigger::Left => TRIGGER_LEFT_CODE,
            Trigger::Right => TRIGGER_RIGHT_CODE,
        }
    }
}

/// A decoded action code.
///
/// Serialized as its raw integer.  Deserialization accepts either the raw
/// integer or a name such as `"KeyW"`, `"MouseLeft"` or `"TriggerRight"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "ActionRepr", into = "ActionRepr")]
pub enum ActionCode {
    /// Keyboard key; the payload is the SDL scancode.
    Key(u32),
    /// Open the on-screen text input.  Never reaches the event mapper.
    TextInput,
    Mouse(MouseButton),
    /// Fires on press only.
    Wheel(WheelDirection),
    Gamepad(GamepadButton),
    Trigger(Trigger),
    /// A negative code outside every known range.
    Unmapped(i32),
}

impl ActionCode {
    /// Decodes a raw action code.  Never fails: unknown codes become
    /// [`ActionCode::Unmapped`].
    pub fn from_raw(code: i32) -> Self {
        match code {
            c if c >= 0 => ActionCode::Key(c as u32),
            TEXT_INPUT_CODE => ActionCode::TextInput,
            MOUSE_LEFT_CODE => ActionCode::Mouse(MouseButton::Left),
            MOUSE_RIGHT_CODE => ActionCode::Mouse(MouseButton::Right),
            MOUSE_MIDDLE_CODE => ActionCode::Mouse(MouseButton::Middle),
            WHEEL_UP_CODE => ActionCode::Wheel(WheelDirection::Up),
            WHEEL_DOWN_CODE => ActionCode::Wheel(WheelDirection::Down),
            TRIGGER_LEFT_CODE => ActionCode::Trigger(Trigger::Left),
            TRIGGER_RIGHT_CODE => ActionCode::Trigger(Trigger::Right),
            c => match GamepadButton::from_code(c) {
                Some(button) => ActionCode::Gamepad(button),
                None => ActionCode::Unmapped(c),
            },
        }
    }

    /// Encodes back to the raw integer stored by the layout collaborator.
    pub fn raw(self) -> i32 {
        match self {
            // Scancodes are small; anything that does not fit is clamped
            // rather than wrapped into the negative ranges.
            ActionCode::Key(code) => i32::try_from(code).unwrap_or(i32::MAX),
            ActionCode::TextInput => TEXT_INPUT_CODE,
            ActionCode::Mouse(button) => button.code(),
            ActionCode::Wheel(WheelDirection::Up) => WHEEL_UP_CODE,
            ActionCode::Wheel(WheelDirection::Down) => WHEEL_DOWN_CODE,
            ActionCode::Gamepad(button) => button.code(),
            ActionCode::Trigger(trigger) => trigger.code(),
            ActionCode::Unmapped(code) => code,
        }
    }

    /// Returns `true` for the text-input sentinel.
    pub fn is_text_input(self) -> bool {
        matches!(self, ActionCode::TextInput)
    }

    /// Returns `true` if the event mapper would emit something for this code.
    pub fn is_dispatchable(self) -> bool {
        !matches!(self, ActionCode::TextInput | ActionCode::Unmapped(_))
    }
}

impl From<i32> for ActionCode {
    fn from(code: i32) -> Self {
        ActionCode::from_raw(code)
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCode::Key(code) => match Scancode::from_code(*code) {
                Some(sc) => f.write_str(sc.name()),
                None => write!(f, "{code}"),
            },
            ActionCode::TextInput => f.write_str("TextInput"),
            ActionCode::Mouse(MouseButton::Left) => f.write_str("MouseLeft"),
            ActionCode::Mouse(MouseButton::Right) => f.write_str("MouseRight"),
            ActionCode::Mouse(MouseButton::Middle) => f.write_str("MouseMiddle"),
            ActionCode::Wheel(WheelDirection::Up) => f.write_str("WheelUp"),
            ActionCode::Wheel(WheelDirection::Down) => f.write_str("WheelDown"),
            ActionCode::Gamepad(button) => f.write_str(button.name()),
            ActionCode::Trigger(Trigger::Left) => f.write_str("TriggerLeft"),
            ActionCode::Trigger(Trigger::Right) => f.write_str("TriggerRight"),
            ActionCode::Unmapped(code) => write!(f, "{code}"),
        }
    }
}

impl FromStr for ActionCode {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<i32>() {
            return Ok(ActionCode::from_raw(raw));
        }
        let named = match s.to_ascii_lowercase().as_str() {
            "textinput" | "keyboard" => Some(ActionCode::TextInput),
            "mouseleft" => Some(ActionCode::Mouse(MouseButton::Left)),
            "mouseright" => Some(ActionCode::Mouse(MouseButton::Right)),
            "mousemiddle" => Some(ActionCode::Mouse(MouseButton::Middle)),
            "wheelup" => Some(ActionCode::Wheel(WheelDirection::Up)),
            "wheeldown" => Some(ActionCode::Wheel(WheelDirection::Down)),
            "triggerleft" => Some(ActionCode::Trigger(Trigger::Left)),
            "triggerright" => Some(ActionCode::Trigger(Trigger::Right)),
            _ => None,
        };
        if let Some(action) = named {
            return Ok(action);
        }
        if let Some(button) = GAMEPAD_BUTTONS
            .iter()
            .find(|b| b.name().eq_ignore_ascii_case(s))
        {
            return Ok(ActionCode::Gamepad(*button));
        }
        Scancode::from_name(s)
            .map(|sc| ActionCode::Key(sc.code()))
            .ok_or_else(|| ActionParseError(s.to_string()))
    }
}

/// Wire shape accepted by serde: raw integer or name.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ActionRepr {
    Code(i32),
    Name(String),
}

impl TryFrom<ActionRepr> for ActionCode {
    type Error = ActionParseError;

    fn try_from(repr: ActionRepr) -> Result<Self, Self::Error> {
        match repr {
            ActionRepr::Code(code) => Ok(ActionCode::from_raw(code)),
            ActionRepr::Name(name) => name.parse(),
        }
    }
}

impl From<ActionCode> for ActionRepr {
    fn from(action: ActionCode) -> Self {
        ActionRepr::Code(action.raw())
    }
}
