//! SDL keyboard scancodes.
//!
//! A keyboard action code (any non-negative action code) is an SDL scancode.
//! SDL scancodes are numerically identical to USB HID Usage IDs on the
//! Keyboard/Keypad page (0x07), so `Scancode::KeyA` is 4, `Scancode::Space`
//! is 44, and the left modifiers start at 224.
//!
//! # What is a scancode? (for beginners)
//!
//! A scancode names a **physical key position**, not a character.  The key
//! in the top-left letter position is `KeyQ` on a QWERTY board and still
//! `KeyQ` on an AZERTY board, even though it prints "A" there.  Games read
//! scancodes for movement bindings (WASD) precisely because they do not move
//! when the user switches keyboard layouts.
//!
//! # Unknown codes
//!
//! The injection bridge forwards any non-negative code as-is, including
//! codes that are not listed here.  This table only exists to give the
//! known keys a stable name for labels, logs and scenario files.

use serde::{Deserialize, Serialize};

/// SDL scancode (= USB HID Usage ID, page 0x07) for the keys a control can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Scancode {
    // Letters (4–29)
    KeyA = 4,
    KeyB = 5,
    KeyC = 6,
    KeyD = 7,
    KeyE = 8,
    KeyF = 9,
    KeyG = 10,
    KeyH = 11,
    KeyI = 12,
    KeyJ = 13,
    KeyK = 14,
    KeyL = 15,
    KeyM = 16,
    KeyN = 17,
    KeyO = 18,
    KeyP = 19,
    KeyQ = 20,
    KeyR = 21,
    KeyS = 22,
    KeyT = 23,
    KeyU = 24,
    KeyV = 25,
    KeyW = 26,
    KeyX = 27,
    KeyY = 28,
    KeyZ = 29,

    // Digits (30–39)
    Digit1 = 30,
    Digit2 = 31,
    Digit3 = 32,
    Digit4 = 33,
    Digit5 = 34,
    Digit6 = 35,
    Digit7 = 36,
    Digit8 = 37,
    Digit9 = 38,
    Digit0 = 39,

    // Editing and punctuation (40–56)
    Enter = 40,
    Escape = 41,
    Backspace = 42,
    Tab = 43,
    Space = 44,
    Minus = 45,
    Equal = 46,
    BracketLeft = 47,
    BracketRight = 48,
    Backslash = 49,
    Semicolon = 51,
    Quote = 52,
    Backquote = 53,
    Comma = 54,
    Period = 55,
    Slash = 56,
    CapsLock = 57,

    // Function keys (58–69)
    F1 = 58,
    F2 = 59,
    F3 = 60,
    F4 = 61,
    F5 = 62,
    F6 = 63,
    F7 = 64,
    F8 = 65,
    F9 = 66,
    F10 = 67,
    F11 = 68,
    F12 = 69,

    // Navigation (70–82)
    PrintScreen = 70,
    ScrollLock = 71,
    Pause = 72,
    Insert = 73,
    Home = 74,
    PageUp = 75,
    Delete = 76,
    End = 77,
    PageDown = 78,
    ArrowRight = 79,
    ArrowLeft = 80,
    ArrowDown = 81,
    ArrowUp = 82,

    // Keypad (83–99, 103)
    NumLock = 83,
    NumpadDivide = 84,
    NumpadMultiply = 85,
    NumpadSubtract = 86,
    NumpadAdd = 87,
    NumpadEnter = 88,
    Numpad1 = 89,
    Numpad2 = 90,
    Numpad3 = 91,
    Numpad4 = 92,
    Numpad5 = 93,
    Numpad6 = 94,
    Numpad7 = 95,
    Numpad8 = 96,
    Numpad9 = 97,
    Numpad0 = 98,
    NumpadDecimal = 99,
    NumpadEqual = 103,

    // Modifiers (224–231)
    ControlLeft = 224,
    ShiftLeft = 225,
    AltLeft = 226,
    MetaLeft = 227,
    ControlRight = 228,
    ShiftRight = 229,
    AltRight = 230,
    MetaRight = 231,
}

/// Every known scancode with its canonical name, in ascending code order.
const SCANCODE_NAMES: &[(Scancode, &str)] = &[
    (Scancode::KeyA, "KeyA"),
    (Scancode::KeyB, "KeyB"),
    (Scancode::KeyC, "KeyC"),
    (Scancode::KeyD, "KeyD"),
    (Scancode::KeyE, "KeyE"),
    (Scancode::KeyF, "KeyF"),
    (Scancode::KeyG, "KeyG"),
    (Scancode::KeyH, "KeyH"),
    (Scancode::KeyI, "KeyI"),
    (Scancode::KeyJ, "KeyJ"),
    (Scancode::KeyK, "KeyK"),
    (Scancode::KeyL, "KeyL"),
    (Scancode::KeyM, "KeyM"),
    (Scancode::KeyN, "KeyN"),
    (Scancode::KeyO, "KeyO"),
    (Scancode::KeyP, "KeyP"),
    (Scancode::KeyQ, "KeyQ"),
    (Scancode::KeyR, "KeyR"),
    (Scancode::KeyS, "KeyS"),
    (Scancode::KeyT, "KeyT"),
    (Scancode::KeyU, "KeyU"),
    (Scancode::KeyV, "KeyV"),
    (Scancode::KeyW, "KeyW"),
    (Scancode::KeyX, "KeyX"),
    (Scancode::KeyY, "KeyY"),
    (Scancode::KeyZ, "KeyZ"),
    (Scancode::Digit1, "Digit1"),
    (Scancode::Digit2, "Digit2"),
    (Scancode::Digit3, "Digit3"),
    (Scancode::Digit4, "Digit4"),
    (Scancode::Digit5, "Digit5"),
    (Scancode::Digit6, "Digit6"),
    (Scancode::Digit7, "Digit7"),
    (Scancode::Digit8, "Digit8"),
    (Scancode::Digit9, "Digit9"),
    (Scancode::Digit0, "Digit0"),
    (Scancode::Enter, "Enter"),
    (Scancode::Escape, "Escape"),
    (Scancode::Backspace, "Backspace"),
    (Scancode::Tab, "Tab"),
    (Scancode::Space, "Space"),
    (Scancode::Minus, "Minus"),
    (Scancode::Equal, "Equal"),
    (Scancode::BracketLeft, "BracketLeft"),
    (Scancode::BracketRight, "BracketRight"),
    (Scancode::Backslash, "Backslash"),
    (Scancode::Semicolon, "Semicolon"),
    (Scancode::Quote, "Quote"),
    (Scancode::Backquote, "Backquote"),
    (Scancode::Comma, "Comma"),
    (Scancode::Period, "Period"),
    (Scancode::Slash, "Slash"),
    (Scancode::CapsLock, "CapsLock"),
    (Scancode::F1, "F1"),
    (Scancode::F2, "F2"),
    (Scancode::F3, "F3"),
    (Scancode::F4, "F4"),
    (Scancode::F5, "F5"),
    (Scancode::F6, "F6"),
    (Scancode::F7, "F7"),
    (Scancode::F8, "F8"),
    (Scancode::F9, "F9"),
    (Scancode::F10, "F10"),
    (Scancode::F11, "F11"),
    (Scancode::F12, "F12"),
    (Scancode::PrintScreen, "PrintScreen"),
    (Scancode::ScrollLock, "ScrollLock"),
    (Scancode::Pause, "Pause"),
    (Scancode::Insert, "Insert"),
    (Scancode::Home, "Home"),
    (Scancode::PageUp, "PageUp"),
    (Scancode::Delete, "Delete"),
    (Scancode::End, "End"),
    (Scancode::PageDown, "PageDown"),
    (Scancode::ArrowRight, "ArrowRight"),
    (Scancode::ArrowLeft, "ArrowLeft"),
    (Scancode::ArrowDown, "ArrowDown"),
    (Scancode::ArrowUp, "ArrowUp"),
    (Scancode::NumLock, "NumLock"),
    (Scancode::NumpadDivide, "NumpadDivide"),
    (Scancode::NumpadMultiply, "NumpadMultiply"),
    (Scancode::NumpadSubtract, "NumpadSubtract"),
    (Scancode::NumpadAdd, "NumpadAdd"),
    (Scancode::NumpadEnter, "NumpadEnter"),
    (Scancode::Numpad1, "Numpad1"),
    (Scancode::Numpad2, "Numpad2"),
    (Scancode::Numpad3, "Numpad3"),
    (Scancode::Numpad4, "Numpad4"),
    (Scancode::Numpad5, "Numpad5"),
    (Scancode::Numpad6, "Numpad6"),
    (Scancode::Numpad7, "Numpad7"),
    (Scancode::Numpad8, "Numpad8"),
    (Scancode::Numpad9, "Numpad9"),
    (Scancode::Numpad0, "Numpad0"),
    (Scancode::NumpadDecimal, "NumpadDecimal"),
    (Scancode::NumpadEqual, "NumpadEqual"),
    (Scancode::ControlLeft, "ControlLeft"),
    (Scancode::ShiftLeft, "ShiftLeft"),
    (Scancode::AltLeft, "AltLeft"),
    (Scancode::MetaLeft, "MetaLeft"),
    (Scancode::ControlRight, "ControlRight"),
    (Scancode::ShiftRight, "ShiftRight"),
    (Scancode::AltRight, "AltRight"),
    (Scancode::MetaRight, "MetaRight"),
];

impl Scancode {
    /// Looks up a raw scancode value.
    ///
    /// Returns `None` for codes with no named key; such codes are still valid
    /// keyboard action codes and are forwarded unchanged.
    pub fn from_code(code: u32) -> Option<Self> {
        SCANCODE_NAMES
            .iter()
            .find(|(sc, _)| sc.code() == code)
            .map(|(sc, _)| *sc)
    }

    /// Looks up a key by its canonical name (e.g. `"KeyW"`, `"Space"`).
    ///
    /// Matching is case-insensitive so hand-written scenario files can say
    /// `"space"` or `"keyw"`.
    pub fn from_name(name: &str) -> Option<Self> {
        SCANCODE_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(sc, _)| *sc)
    }

    /// Returns the raw SDL scancode value.
    pub fn code(self) -> u32 {
        self as u16 as u32
    }

    /// Returns the canonical name of this key.
    pub fn name(self) -> &'static str {
        SCANCODE_NAMES
            .iter()
            .find(|(sc, _)| *sc == self)
            .map(|(_, n)| *n)
            .unwrap_or("Unknown")
    }

    /// Returns `true` if this is one of the eight modifier keys.
    pub fn is_modifier(self) -> bool {
        (Scancode::ControlLeft.code()..=Scancode::MetaRight.code()).contains(&self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_is_sorted_and_unique() {
        // Arrange / Act
        let codes: Vec<u32> = SCANCODE_NAMES.iter().map(|(sc, _)| sc.code()).collect();

        // Assert
        assert!(
            codes.windows(2).all(|w| w[0] < w[1]),
            "scancode table must be strictly ascending"
        );
    }

    #[test]
    fn test_well_known_codes_match_sdl_values() {
        assert_eq!(Scancode::KeyA.code(), 4);
        assert_eq!(Scancode::KeyW.code(), 26);
        assert_eq!(Scancode::Digit1.code(), 30);
        assert_eq!(Scancode::Enter.code(), 40);
        assert_eq!(Scancode::Space.code(), 44);
        assert_eq!(Scancode::ShiftLeft.code(), 225);
    }

    #[test]
    fn test_from_code_finds_named_keys() {
        assert_eq!(Scancode::from_code(30), Some(Scancode::Digit1));
        assert_eq!(Scancode::from_code(41), Some(Scancode::Escape));
        assert_eq!(Scancode::from_code(231), Some(Scancode::MetaRight));
    }

    #[test]
    fn test_from_code_returns_none_for_unassigned_values() {
        for unassigned in [0, 1, 2, 3, 50, 100, 200, 232, 4096] {
            assert_eq!(
                Scancode::from_code(unassigned),
                None,
                "{unassigned} should not map to a named key"
            );
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Scancode::from_name("KeyW"), Some(Scancode::KeyW));
        assert_eq!(Scancode::from_name("space"), Some(Scancode::Space));
        assert_eq!(Scancode::from_name("SHIFTLEFT"), Some(Scancode::ShiftLeft));
        assert_eq!(Scancode::from_name("NoSuchKey"), None);
    }

    #[test]
    fn test_name_and_from_name_agree_for_every_entry() {
        for &(sc, name) in SCANCODE_NAMES {
            assert_eq!(sc.name(), name);
            assert_eq!(Scancode::from_name(name), Some(sc));
        }
    }

    #[test]
    fn test_modifier_range() {
        assert!(Scancode::ControlLeft.is_modifier());
        assert!(Scancode::MetaRight.is_modifier());
        assert!(!Scancode::Space.is_modifier());
        assert!(!Scancode::NumpadEqual.is_modifier());
    }
}
