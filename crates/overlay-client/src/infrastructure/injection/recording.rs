//! In-memory recording bridge for tests.
//!
//! # Usage in tests
//!
//! ```ignore
//! let bridge = Arc::new(RecordingBridge::new());
//! let mapper = EventMapper::new(bridge.clone());
//!
//! mapper.dispatch(ActionCode::from_raw(30), true, Point::ZERO);
//!
//! assert_eq!(bridge.events(), vec![BridgeEvent::Key { scancode: 30, is_down: true }]);
//! ```
//!
//! # `should_fail` flag
//!
//! A bridge built with [`RecordingBridge::failing`] rejects every injection
//! call with [`InjectionError::Bridge`] and records nothing.  Haptics and
//! text-input calls cannot fail and are always recorded.

use std::sync::{Mutex, MutexGuard, PoisonError};

use overlay_core::{GamepadButton, MouseButton, Trigger};

use super::BridgeEvent;
use crate::application::event_mapper::{
    HapticFeedback, InjectionError, InputInjector, MousePosition, TextInputLauncher,
};

/// Records every collaborator call on a single shared timeline.
#[derive(Debug, Default)]
pub struct RecordingBridge {
    events: Mutex<Vec<BridgeEvent>>,
    /// When `true`, every injection call returns an error.
    pub should_fail: bool,
}

impl RecordingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// A bridge whose injection calls all fail.
    pub fn failing() -> Self {
        Self {
            events: Mutex::default(),
            should_fail: true,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<BridgeEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<BridgeEvent> {
        self.lock().clone()
    }

    /// Only the injected input, without haptics or text-input commands.
    pub fn input_events(&self) -> Vec<BridgeEvent> {
        self.lock()
            .iter()
            .filter(|e| !matches!(e, BridgeEvent::Vibrate { .. } | BridgeEvent::TextInputOpened))
            .copied()
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn inject(&self, event: BridgeEvent) -> Result<(), InjectionError> {
        if self.should_fail {
            return Err(InjectionError::Bridge("mock failure".into()));
        }
        self.lock().push(event);
        Ok(())
    }
}

impl InputInjector for RecordingBridge {
    fn send_key(&self, scancode: u32, is_down: bool) -> Result<(), InjectionError> {
        self.inject(BridgeEvent::Key { scancode, is_down })
    }

    fn send_mouse_button(
        &self,
        button: MouseButton,
        is_down: bool,
        position: MousePosition,
    ) -> Result<(), InjectionError> {
        self.inject(BridgeEvent::MouseButton {
            button,
            is_down,
            position,
        })
    }

    fn send_mouse_wheel(&self, delta_y: f32) -> Result<(), InjectionError> {
        self.inject(BridgeEvent::Wheel { delta_y })
    }

    fn send_gamepad_button(
        &self,
        button: GamepadButton,
        is_down: bool,
    ) -> Result<(), InjectionError> {
        self.inject(BridgeEvent::GamepadButton { button, is_down })
    }

    fn send_gamepad_trigger(&self, trigger: Trigger, value: f32) -> Result<(), InjectionError> {
        self.inject(BridgeEvent::Trigger { trigger, value })
    }

    fn send_relative_mouse_move(&self, dx: f32, dy: f32) -> Result<(), InjectionError> {
        self.inject(BridgeEvent::RelativeMove { dx, dy })
    }

    fn send_absolute_mouse_move(&self, x: f32, y: f32) -> Result<(), InjectionError> {
        self.inject(BridgeEvent::AbsoluteMove { x, y })
    }
}

impl HapticFeedback for RecordingBridge {
    fn vibrate(&self, duration_ms: u32, amplitude: u8) {
        self.lock().push(BridgeEvent::Vibrate {
            duration_ms,
            amplitude,
        });
    }
}

impl TextInputLauncher for RecordingBridge {
    fn open_text_input(&self) {
        self.lock().push(BridgeEvent::TextInputOpened);
    }
}
