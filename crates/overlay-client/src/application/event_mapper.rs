//! Event mapper: turns an [`ActionCode`] into a synthetic input primitive.
//!
//! The mapper sits at the application layer and delegates to an
//! [`InputInjector`] trait object for delivery.  Concrete injectors live in
//! the infrastructure layer.
//!
//! The mapper holds no state and never fails.  An injector error is logged
//! with `warn!` and dropped, so a misbehaving bridge can never leave a
//! control's state machine half-transitioned.

use std::sync::Arc;

use overlay_core::{ActionCode, GamepadButton, MouseButton, Point, Trigger};
use thiserror::Error;
use tracing::{trace, warn};

/// Analog trigger value reported on press.
pub const TRIGGER_PRESSED: f32 = 1.0;

/// Analog trigger value reported on release.
///
/// Release reports `-1.0`, not `0.0`, so a consumer can tell "released"
/// apart from "never touched".
pub const TRIGGER_RELEASED: f32 = -1.0;

/// Error type for injection bridge calls.
#[derive(Debug, Error)]
pub enum InjectionError {
    #[error("injection bridge error: {0}")]
    Bridge(String),
    #[error("injection bridge not attached")]
    NotAttached,
}

/// Where a mouse button event happens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MousePosition {
    /// At the current cursor, offset by `(dx, dy)`.
    Relative { dx: f32, dy: f32 },
    /// At an absolute surface position.
    Absolute { x: f32, y: f32 },
}

impl MousePosition {
    /// Relative position with no displacement.
    pub const HERE: MousePosition = MousePosition::Relative { dx: 0.0, dy: 0.0 };

    pub fn at(p: Point) -> Self {
        MousePosition::Absolute { x: p.x, y: p.y }
    }
}

/// Injection bridge: delivers synthetic input to the underlying application.
pub trait InputInjector: Send + Sync {
    /// Keyboard key; `scancode` is an SDL scancode.
    fn send_key(&self, scancode: u32, is_down: bool) -> Result<(), InjectionError>;

    fn send_mouse_button(
        &self,
        button: MouseButton,
        is_down: bool,
        position: MousePosition,
    ) -> Result<(), InjectionError>;

    /// Vertical wheel movement, positive is up.
    fn send_mouse_wheel(&self, delta_y: f32) -> Result<(), InjectionError>;

    fn send_gamepad_button(&self, button: GamepadButton, is_down: bool)
        -> Result<(), InjectionError>;

    fn send_gamepad_trigger(&self, trigger: Trigger, value: f32) -> Result<(), InjectionError>;

    fn send_relative_mouse_move(&self, dx: f32, dy: f32) -> Result<(), InjectionError>;

    fn send_absolute_mouse_move(&self, x: f32, y: f32) -> Result<(), InjectionError>;
}

/// Haptic feedback collaborator.  Fire-and-forget.
#[cfg_attr(test, mockall::automock)]
pub trait HapticFeedback: Send + Sync {
    fn vibrate(&self, duration_ms: u32, amplitude: u8);
}

/// Receiver of the "open text input" command.
#[cfg_attr(test, mockall::automock)]
pub trait TextInputLauncher: Send + Sync {
    fn open_text_input(&self);
}

/// The Event Mapper.
#[derive(Clone)]
pub struct EventMapper {
    injector: Arc<dyn InputInjector>,
}

impl EventMapper {
    pub fn new(injector: Arc<dyn InputInjector>) -> Self {
        Self { injector }
    }

    /// Dispatches `action` as a press (`is_down = true`) or a release.
    ///
    /// `anchor` is the absolute position used for mouse button actions,
    /// normally the center of the control that fired.
    ///
    /// Returns `true` if an event was handed to the injector.  Wheel
    /// releases, the text-input sentinel and unmapped codes return `false`.
    pub fn dispatch(&self, action: ActionCode, is_down: bool, anchor: Point) -> bool {
        let result = match action {
            ActionCode::Key(scancode) => self.injector.send_key(scancode, is_down),
            ActionCode::Mouse(button) => {
                self.injector
                    .send_mouse_button(button, is_down, MousePosition::at(anchor))
            }
            ActionCode::Wheel(direction) => {
                if !is_down {
                    return false;
                }
                self.injector.send_mouse_wheel(direction.delta())
            }
            ActionCode::Gamepad(button) => self.injector.send_gamepad_button(button, is_down),
            ActionCode::Trigger(trigger) => {
                let value = if is_down {
                    TRIGGER_PRESSED
                } else {
                    TRIGGER_RELEASED
                };
                self.injector.send_gamepad_trigger(trigger, value)
            }
            ActionCode::TextInput | ActionCode::Unmapped(_) => {
                trace!(%action, "action not dispatchable, skipped");
                return false;
            }
        };
        report(result, "action");
        true
    }

    /// Primary (left) mouse button, used by the touchpad.
    pub fn primary_button(&self, is_down: bool, position: MousePosition) {
        report(
            self.injector
                .send_mouse_button(MouseButton::Left, is_down, position),
            "primary button",
        );
    }

    /// Relative cursor movement, already scaled by the caller.
    pub fn relative_move(&self, delta: Point) {
        trace!(dx = delta.x, dy = delta.y, "relative move");
        report(
            self.injector.send_relative_mouse_move(delta.x, delta.y),
            "relative move",
        );
    }

    /// Absolute cursor movement in surface pixels.
    pub fn absolute_move(&self, target: Point) {
        trace!(x = target.x, y = target.y, "absolute move");
        report(
            self.injector.send_absolute_mouse_move(target.x, target.y),
            "absolute move",
        );
    }
}

fn report(result: Result<(), InjectionError>, what: &'static str) {
    if let Err(e) = result {
        warn!(error = %e, what, "injection failed; event dropped");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::injection::{BridgeEvent, RecordingBridge};

    fn mapper() -> (Arc<RecordingBridge>, EventMapper) {
        let bridge = Arc::new(RecordingBridge::new());
        let mapper = EventMapper::new(bridge.clone());
        (bridge, mapper)
    }

    #[test]
    fn test_keyboard_press_and_release() {
        // Arrange
        let (bridge, mapper) = mapper();

        // Act
        mapper.dispatch(ActionCode::from_raw(30), true, Point::ZERO);
        mapper.dispatch(ActionCode::from_raw(30), false, Point::ZERO);

        // Assert
        assert_eq!(
            bridge.events(),
            vec![
                BridgeEvent::Key { scancode: 30, is_down: true },
                BridgeEvent::Key { scancode: 30, is_down: false },
            ]
        );
    }

    #[test]
    fn test_mouse_button_uses_anchor_as_absolute_position() {
        let (bridge, mapper) = mapper();
        let anchor = Point::new(640.0, 360.0);

        mapper.dispatch(ActionCode::Mouse(MouseButton::Right), true, anchor);

        assert_eq!(
            bridge.events(),
            vec![BridgeEvent::MouseButton {
                button: MouseButton::Right,
                is_down: true,
                position: MousePosition::Absolute { x: 640.0, y: 360.0 },
            }]
        );
    }

    #[test]
    fn test_wheel_fires_on_press_only() {
        // Arrange
        let (bridge, mapper) = mapper();

        // Act
        let pressed = mapper.dispatch(ActionCode::from_raw(-4), true, Point::ZERO);
        let released = mapper.dispatch(ActionCode::from_raw(-4), false, Point::ZERO);
        mapper.dispatch(ActionCode::from_raw(-5), true, Point::ZERO);

        // Assert
        assert!(pressed);
        assert!(!released);
        assert_eq!(
            bridge.events(),
            vec![
                BridgeEvent::Wheel { delta_y: 1.0 },
                BridgeEvent::Wheel { delta_y: -1.0 },
            ]
        );
    }

    #[test]
    fn test_trigger_reports_one_then_minus_one() {
        let (bridge, mapper) = mapper();

        mapper.dispatch(ActionCode::Trigger(Trigger::Left), true, Point::ZERO);
        mapper.dispatch(ActionCode::Trigger(Trigger::Left), false, Point::ZERO);

        assert_eq!(
            bridge.events(),
            vec![
                BridgeEvent::Trigger { trigger: Trigger::Left, value: 1.0 },
                BridgeEvent::Trigger { trigger: Trigger::Left, value: -1.0 },
            ]
        );
    }

    #[test]
    fn test_gamepad_button_passes_through() {
        let (bridge, mapper) = mapper();

        mapper.dispatch(ActionCode::from_raw(-206), true, Point::ZERO);

        assert_eq!(
            bridge.events(),
            vec![BridgeEvent::GamepadButton { button: GamepadButton::Start, is_down: true }]
        );
    }

    #[test]
    fn test_text_input_and_unmapped_are_never_sent() {
        let (bridge, mapper) = mapper();

        assert!(!mapper.dispatch(ActionCode::TextInput, true, Point::ZERO));
        assert!(!mapper.dispatch(ActionCode::from_raw(-150), true, Point::ZERO));

        assert!(bridge.events().is_empty());
    }

    #[test]
    fn test_injector_failure_is_swallowed() {
        // Arrange
        let bridge = Arc::new(RecordingBridge::failing());
        let mapper = EventMapper::new(bridge.clone());

        // Act – must not panic or propagate
        let handed_over = mapper.dispatch(ActionCode::from_raw(4), true, Point::ZERO);
        mapper.relative_move(Point::new(1.0, 1.0));

        // Assert
        assert!(handed_over);
        assert!(bridge.events().is_empty());
    }
}
