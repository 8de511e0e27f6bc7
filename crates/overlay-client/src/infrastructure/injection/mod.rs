//! Injection bridge implementations.
//!
//! - [`RecordingBridge`] records every event in memory.  Tests assert on its
//!   timeline; it doubles as the haptics and text-input collaborator.
//! - [`TracingBridge`] logs every event through `tracing`.  The replay binary
//!   uses it in place of a real platform bridge.

pub mod logging;
pub mod recording;

use overlay_core::{GamepadButton, MouseButton, Trigger};

use crate::application::event_mapper::MousePosition;

pub use logging::TracingBridge;
pub use recording::RecordingBridge;

/// One call made on a collaborator port, in the order it happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BridgeEvent {
    Key {
        scancode: u32,
        is_down: bool,
    },
    MouseButton {
        button: MouseButton,
        is_down: bool,
        position: MousePosition,
    },
    Wheel {
        delta_y: f32,
    },
    GamepadButton {
        button: GamepadButton,
        is_down: bool,
    },
    Trigger {
        trigger: Trigger,
        value: f32,
    },
    RelativeMove {
        dx: f32,
        dy: f32,
    },
    AbsoluteMove {
        x: f32,
        y: f32,
    },
    Vibrate {
        duration_ms: u32,
        amplitude: u8,
    },
    TextInputOpened,
}
