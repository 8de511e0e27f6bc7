//! Button state machine.
//!
//! Two states, `Released` and `Pressed`, plus a persistent `toggled` bit for
//! toggle-mode buttons.
//!
//! ```text
//!   Released ──down(p)──▶ Pressed(p) ──up(p)──▶ Released
//! ```
//!
//! A second contact while pressed is ignored so it can be tested against
//! other controls.  A toggle button emits its new value on press and nothing
//! on release.

use std::sync::Arc;

use overlay_core::{ActionCode, ControlId, PointerId};
use tracing::debug;

use crate::application::control::{ControlServices, TouchContext, TouchResponse};

/// Mutable per-button state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonSession {
    pub is_pressed: bool,
    pub is_toggled: bool,
    pub owned_pointer: Option<PointerId>,
}

pub struct ButtonControl {
    id: ControlId,
    action: ActionCode,
    is_toggle: bool,
    pass_through: bool,
    session: ButtonSession,
    services: Arc<ControlServices>,
}

impl ButtonControl {
    pub fn new(
        id: ControlId,
        action: ActionCode,
        is_toggle: bool,
        pass_through: bool,
        services: Arc<ControlServices>,
    ) -> Self {
        Self {
            id,
            action,
            is_toggle,
            pass_through,
            session: ButtonSession::default(),
            services,
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn session(&self) -> ButtonSession {
        self.session
    }

    pub fn owned_pointer(&self) -> Option<PointerId> {
        self.session.owned_pointer
    }

    pub fn on_down(&mut self, pointer: PointerId, ctx: &TouchContext<'_>) -> TouchResponse {
        if self.session.owned_pointer.is_some() {
            return TouchResponse::Ignored;
        }
        if !self.services.take_pointer(pointer, self.id, self.pass_through) {
            return TouchResponse::Ignored;
        }
        self.session.owned_pointer = Some(pointer);
        self.session.is_pressed = true;
        self.services.pulse();

        if self.action.is_text_input() {
            debug!(control = %self.id, pointer, "opening text input");
            self.services.text_input.open_text_input();
        } else if self.is_toggle {
            self.session.is_toggled = !self.session.is_toggled;
            debug!(control = %self.id, pointer, toggled = self.session.is_toggled, "button toggled");
            self.services
                .mapper
                .dispatch(self.action, self.session.is_toggled, ctx.anchor());
        } else {
            debug!(control = %self.id, pointer, action = %self.action, "button pressed");
            self.services.mapper.dispatch(self.action, true, ctx.anchor());
        }
        debug_assert!(self.claim_is_consistent());
        TouchResponse::Consumed
    }

    /// A move on the owned pointer is consumed without changing state.
    pub fn on_move(&self, pointer: PointerId) -> TouchResponse {
        if self.session.owned_pointer == Some(pointer) {
            TouchResponse::Consumed
        } else {
            TouchResponse::Ignored
        }
    }

    pub fn on_up(&mut self, pointer: PointerId, ctx: &TouchContext<'_>) -> TouchResponse {
        if self.session.owned_pointer != Some(pointer) {
            return TouchResponse::Ignored;
        }
        self.release_claim(pointer);
        self.session.is_pressed = false;
        if !self.is_toggle && !self.action.is_text_input() {
            self.services.mapper.dispatch(self.action, false, ctx.anchor());
        }
        debug!(control = %self.id, pointer, "button released");
        debug_assert!(self.claim_is_consistent());
        TouchResponse::Consumed
    }

    /// Clears a toggled button and emits the matching release.
    pub fn reset_toggle(&mut self, ctx: &TouchContext<'_>) {
        if self.is_toggle && self.session.is_toggled {
            self.session.is_toggled = false;
            self.services.mapper.dispatch(self.action, false, ctx.anchor());
            debug!(control = %self.id, "toggle reset");
        }
    }

    /// Releases the claim and any held input.  The toggle bit is left alone.
    pub fn detach(&mut self, ctx: &TouchContext<'_>) {
        if let Some(pointer) = self.session.owned_pointer {
            self.release_claim(pointer);
            if self.session.is_pressed && !self.is_toggle && !self.action.is_text_input() {
                self.services.mapper.dispatch(self.action, false, ctx.anchor());
            }
        }
        self.session.is_pressed = false;
    }

    fn release_claim(&mut self, pointer: PointerId) {
        if !self.pass_through {
            self.services.arbiter.release_if_owner(pointer, self.id);
        }
        self.session.owned_pointer = None;
    }

    /// `owned_pointer` is set exactly when the arbiter records our claim.
    /// Pass-through buttons never claim.
    pub fn claim_is_consistent(&self) -> bool {
        match self.session.owned_pointer {
            Some(p) if !self.pass_through => self.services.arbiter.owner(p) == Some(self.id),
            _ => true,
        }
    }

    pub fn state_label(&self) -> &'static str {
        match (self.session.is_pressed, self.session.is_toggled) {
            (true, true) => "pressed+toggled",
            (true, false) => "pressed",
            (false, true) => "toggled",
            (false, false) => "released",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::event_mapper::{EventMapper, MockHapticFeedback, MockTextInputLauncher};
    use crate::application::control::HapticPulse;
    use crate::application::touchpad::TouchpadTuning;
    use crate::infrastructure::injection::{BridgeEvent, RecordingBridge};
    use overlay_core::{Density, PointerArbiter, Rect, SurfaceSize, TimerQueue};
    use uuid::Uuid;

    struct Fixture {
        bridge: Arc<RecordingBridge>,
        arbiter: Arc<PointerArbiter>,
        services: Arc<ControlServices>,
        timers: TimerQueue,
    }

    fn fixture() -> Fixture {
        let bridge = Arc::new(RecordingBridge::new());
        let arbiter = Arc::new(PointerArbiter::new());
        let services = Arc::new(ControlServices {
            arbiter: arbiter.clone(),
            mapper: EventMapper::new(bridge.clone()),
            haptics: bridge.clone(),
            text_input: bridge.clone(),
            haptic_pulse: None,
            density: Density::default(),
            tuning: TouchpadTuning::default(),
        });
        Fixture {
            bridge,
            arbiter,
            services,
            timers: TimerQueue::new(),
        }
    }

    fn ctx(timers: &mut TimerQueue) -> TouchContext<'_> {
        TouchContext {
            scheduler: timers,
            bounds: Rect::new(100.0, 100.0, 50.0, 50.0),
            surface: SurfaceSize::new(1000.0, 500.0),
        }
    }

    fn keys(bridge: &RecordingBridge) -> Vec<(u32, bool)> {
        bridge
            .events()
            .into_iter()
            .filter_map(|e| match e {
                BridgeEvent::Key { scancode, is_down } => Some((scancode, is_down)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_press_then_release_sends_key_down_up() {
        // Arrange
        let mut f = fixture();
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(30), false, false, f.services.clone());

        // Act
        let down = b.on_down(0, &ctx(&mut f.timers));
        let claimed_while_down = f.arbiter.is_claimed(0);
        let up = b.on_up(0, &ctx(&mut f.timers));

        // Assert
        assert_eq!(down, TouchResponse::Consumed);
        assert_eq!(up, TouchResponse::Consumed);
        assert!(claimed_while_down);
        assert!(!f.arbiter.is_claimed(0));
        assert_eq!(keys(&f.bridge), vec![(30, true), (30, false)]);
    }

    #[test]
    fn test_second_contact_while_pressed_is_ignored() {
        let mut f = fixture();
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(4), false, false, f.services.clone());
        b.on_down(0, &ctx(&mut f.timers));

        let second = b.on_down(1, &ctx(&mut f.timers));

        assert_eq!(second, TouchResponse::Ignored);
        assert!(!f.arbiter.is_claimed(1));
        assert_eq!(keys(&f.bridge), vec![(4, true)]);
    }

    #[test]
    fn test_up_for_unknown_pointer_is_ignored() {
        let mut f = fixture();
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(4), false, false, f.services.clone());
        b.on_down(0, &ctx(&mut f.timers));

        assert_eq!(b.on_up(9, &ctx(&mut f.timers)), TouchResponse::Ignored);
        assert!(b.session().is_pressed);
    }

    #[test]
    fn test_toggle_emits_on_press_only() {
        // Arrange
        let mut f = fixture();
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(225), true, false, f.services.clone());

        // Act – two full taps
        b.on_down(0, &ctx(&mut f.timers));
        b.on_up(0, &ctx(&mut f.timers));
        let toggled_after_first = b.session().is_toggled;
        b.on_down(0, &ctx(&mut f.timers));
        b.on_up(0, &ctx(&mut f.timers));

        // Assert
        assert!(toggled_after_first);
        assert!(!b.session().is_toggled);
        assert_eq!(keys(&f.bridge), vec![(225, true), (225, false)]);
    }

    #[test]
    fn test_reset_toggle_releases_held_toggle() {
        let mut f = fixture();
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(225), true, false, f.services.clone());
        b.on_down(0, &ctx(&mut f.timers));
        b.on_up(0, &ctx(&mut f.timers));

        b.reset_toggle(&ctx(&mut f.timers));
        b.reset_toggle(&ctx(&mut f.timers));

        assert!(!b.session().is_toggled);
        assert_eq!(keys(&f.bridge), vec![(225, true), (225, false)]);
    }

    #[test]
    fn test_pass_through_button_never_claims() {
        let mut f = fixture();
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(44), false, true, f.services.clone());

        let r = b.on_down(3, &ctx(&mut f.timers));

        assert_eq!(r, TouchResponse::Consumed);
        assert!(!f.arbiter.is_claimed(3));
        assert_eq!(b.owned_pointer(), Some(3));
    }

    #[test]
    fn test_pointer_claimed_elsewhere_is_refused() {
        let mut f = fixture();
        f.arbiter.claim(2, Uuid::new_v4());
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(44), false, false, f.services.clone());

        assert_eq!(b.on_down(2, &ctx(&mut f.timers)), TouchResponse::Ignored);
        assert!(b.owned_pointer().is_none());
        assert!(f.bridge.events().is_empty());
    }

    #[test]
    fn test_text_input_button_opens_text_input_and_sends_nothing() {
        // Arrange
        let mut launcher = MockTextInputLauncher::new();
        launcher.expect_open_text_input().times(1).return_const(());
        let mut f = fixture();
        let services = Arc::new(ControlServices {
            arbiter: f.arbiter.clone(),
            mapper: EventMapper::new(f.bridge.clone()),
            haptics: f.bridge.clone(),
            text_input: Arc::new(launcher),
            haptic_pulse: None,
            density: Density::default(),
            tuning: TouchpadTuning::default(),
        });
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::TextInput, false, false, services);

        // Act
        b.on_down(0, &ctx(&mut f.timers));
        b.on_up(0, &ctx(&mut f.timers));

        // Assert – the mock verifies the single call on drop
        assert!(f.bridge.events().is_empty());
        assert!(!f.arbiter.is_claimed(0));
    }

    #[test]
    fn test_press_triggers_haptic_pulse() {
        // Arrange
        let mut haptics = MockHapticFeedback::new();
        haptics
            .expect_vibrate()
            .withf(|duration, amplitude| *duration == 50 && *amplitude == 30)
            .times(1)
            .return_const(());
        let mut f = fixture();
        let services = Arc::new(ControlServices {
            arbiter: f.arbiter.clone(),
            mapper: EventMapper::new(f.bridge.clone()),
            haptics: Arc::new(haptics),
            text_input: f.bridge.clone(),
            haptic_pulse: Some(HapticPulse::default()),
            density: Density::default(),
            tuning: TouchpadTuning::default(),
        });
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(4), false, false, services);

        // Act
        b.on_down(0, &ctx(&mut f.timers));
        b.on_up(0, &ctx(&mut f.timers));
    }

    #[test]
    fn test_detach_releases_claim_and_held_key() {
        let mut f = fixture();
        let mut b = ButtonControl::new(Uuid::new_v4(), ActionCode::from_raw(7), false, false, f.services.clone());
        b.on_down(5, &ctx(&mut f.timers));

        b.detach(&ctx(&mut f.timers));

        assert!(!f.arbiter.is_claimed(5));
        assert!(b.owned_pointer().is_none());
        assert!(b.claim_is_consistent());
        assert_eq!(keys(&f.bridge), vec![(7, true), (7, false)]);
    }
}
