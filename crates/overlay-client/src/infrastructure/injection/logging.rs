//! Bridge that logs every injected event instead of delivering it.
//!
//! Used by the replay binary so a scenario file can be checked without a
//! running application to inject into.

use std::sync::atomic::{AtomicU64, Ordering};

use overlay_core::{GamepadButton, MouseButton, Trigger};
use tracing::info;

use crate::application::event_mapper::{
    HapticFeedback, InjectionError, InputInjector, MousePosition, TextInputLauncher,
};

/// Logs each call at `info` level and counts them.
#[derive(Debug, Default)]
pub struct TracingBridge {
    injected: AtomicU64,
}

impl TracingBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of input events logged so far.
    pub fn injected(&self) -> u64 {
        self.injected.load(Ordering::Relaxed)
    }

    fn count(&self) -> Result<(), InjectionError> {
        self.injected.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

impl InputInjector for TracingBridge {
    fn send_key(&self, scancode: u32, is_down: bool) -> Result<(), InjectionError> {
        info!(scancode, is_down, "key");
        self.count()
    }

    fn send_mouse_button(
        &self,
        button: MouseButton,
        is_down: bool,
        position: MousePosition,
    ) -> Result<(), InjectionError> {
        info!(?button, is_down, ?position, "mouse button");
        self.count()
    }

    fn send_mouse_wheel(&self, delta_y: f32) -> Result<(), InjectionError> {
        info!(delta_y, "mouse wheel");
        self.count()
    }

    fn send_gamepad_button(
        &self,
        button: GamepadButton,
        is_down: bool,
    ) -> Result<(), InjectionError> {
        info!(?button, is_down, "gamepad button");
        self.count()
    }

    fn send_gamepad_trigger(&self, trigger: Trigger, value: f32) -> Result<(), InjectionError> {
        info!(?trigger, value, "gamepad trigger");
        self.count()
    }

    fn send_relative_mouse_move(&self, dx: f32, dy: f32) -> Result<(), InjectionError> {
        info!(dx, dy, "relative mouse move");
        self.count()
    }

    fn send_absolute_mouse_move(&self, x: f32, y: f32) -> Result<(), InjectionError> {
        info!(x, y, "absolute mouse move");
        self.count()
    }
}

impl HapticFeedback for TracingBridge {
    fn vibrate(&self, duration_ms: u32, amplitude: u8) {
        info!(duration_ms, amplitude, "vibrate");
    }
}

impl TextInputLauncher for TracingBridge {
    fn open_text_input(&self) {
        info!("open text input");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_injected_events_only() {
        let bridge = TracingBridge::new();

        bridge.send_key(4, true).unwrap();
        bridge.send_absolute_mouse_move(1.0, 1.0).unwrap();
        bridge.vibrate(50, 30);

        assert_eq!(bridge.injected(), 2);
    }
}
