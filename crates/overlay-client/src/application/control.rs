//! Control configuration and the shared plumbing every control receives.
//!
//! # How a touch reaches a control (for beginners)
//!
//! The [`ControlSurface`](super::surface::ControlSurface) owns every control.
//! When a contact goes down it asks the controls, topmost first, whether the
//! point lies inside them and whether they accept the contact.  The first one
//! that answers [`TouchResponse::Consumed`] owns the contact until it lifts.
//!
//! Each call carries a [`TouchContext`]: the control's resolved bounds, the
//! surface size, and the timer queue.  Long-lived collaborators (the arbiter,
//! the event mapper, haptics) are handed over once at construction as an
//! `Arc<ControlServices>`.

use std::sync::Arc;

use overlay_core::{
    ActionCode, ControlGeometry, ControlId, Density, Point, PointerArbiter, PointerId, Rect,
    Scheduler, SurfaceSize, TimerHandle,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::button::ButtonControl;
use crate::application::dpad::DPadControl;
use crate::application::event_mapper::{EventMapper, HapticFeedback, TextInputLauncher};
use crate::application::touchpad::{TouchpadControl, TouchpadTuning};

/// Immutable per-control configuration supplied by the layout collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlConfig {
    #[serde(default = "Uuid::new_v4")]
    pub id: ControlId,
    #[serde(default)]
    pub name: String,
    pub geometry: ControlGeometry,
    /// A pass-through control never withholds its contacts from the
    /// underlying application.
    #[serde(default)]
    pub pass_through: bool,
    #[serde(flatten)]
    pub kind: ControlKind,
}

/// Behavior-specific configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ControlKind {
    Button {
        action: ActionCode,
        #[serde(default)]
        is_toggle: bool,
    },
    #[serde(rename = "dpad")]
    DPad {
        up: ActionCode,
        right: ActionCode,
        down: ActionCode,
        left: ActionCode,
    },
    Touchpad {
        #[serde(default = "default_double_tap_drag")]
        double_tap_drag: bool,
    },
}

fn default_double_tap_drag() -> bool {
    true
}

impl ControlKind {
    pub fn label(&self) -> &'static str {
        match self {
            ControlKind::Button { .. } => "button",
            ControlKind::DPad { .. } => "dpad",
            ControlKind::Touchpad { .. } => "touchpad",
        }
    }
}

/// Parameters of one haptic pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HapticPulse {
    pub duration_ms: u32,
    pub amplitude: u8,
}

impl Default for HapticPulse {
    fn default() -> Self {
        Self {
            duration_ms: 50,
            amplitude: 30,
        }
    }
}

/// Collaborators shared by every control on one input surface.
pub struct ControlServices {
    pub arbiter: Arc<PointerArbiter>,
    pub mapper: EventMapper,
    pub haptics: Arc<dyn HapticFeedback>,
    pub text_input: Arc<dyn TextInputLauncher>,
    /// `None` disables haptics.
    pub haptic_pulse: Option<HapticPulse>,
    pub density: Density,
    pub tuning: TouchpadTuning,
}

impl ControlServices {
    /// Fires one haptic pulse if haptics are enabled.
    pub fn pulse(&self) {
        if let Some(p) = self.haptic_pulse {
            self.haptics.vibrate(p.duration_ms, p.amplitude);
        }
    }

    /// Takes `pointer` for `control` on contact-down.
    ///
    /// A withholding control claims it; a pass-through control only checks
    /// that no other control holds it.  `false` means the contact belongs
    /// to someone else.
    pub fn take_pointer(&self, pointer: PointerId, control: ControlId, pass_through: bool) -> bool {
        if pass_through {
            self.arbiter
                .owner(pointer)
                .map_or(true, |owner| owner == control)
        } else {
            self.arbiter.claim(pointer, control)
        }
    }
}

/// Per-event context handed to a control by the surface.
pub struct TouchContext<'a> {
    pub scheduler: &'a mut dyn Scheduler,
    /// The control's bounds in surface pixels.
    pub bounds: Rect,
    pub surface: SurfaceSize,
}

impl TouchContext<'_> {
    /// Absolute center of the control, used as the mouse-button anchor.
    pub fn anchor(&self) -> Point {
        self.bounds.center()
    }
}

/// Whether a control took a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchResponse {
    Consumed,
    /// Not handled; the event may be tested against other controls or
    /// passed through to the application.
    Ignored,
}

impl TouchResponse {
    pub fn is_consumed(self) -> bool {
        self == TouchResponse::Consumed
    }
}

/// Diagnostic snapshot of one control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlStatus {
    pub id: ControlId,
    pub name: String,
    pub kind: &'static str,
    pub owned_pointer: Option<PointerId>,
    pub state: String,
}

/// One live control.
pub enum Control {
    Button(ButtonControl),
    DPad(DPadControl),
    Touchpad(TouchpadControl),
}

impl Control {
    /// Builds the live control described by `config`.
    pub fn from_config(config: &ControlConfig, services: Arc<ControlServices>) -> Self {
        match config.kind {
            ControlKind::Button { action, is_toggle } => Control::Button(ButtonControl::new(
                config.id,
                action,
                is_toggle,
                config.pass_through,
                services,
            )),
            ControlKind::DPad {
                up,
                right,
                down,
                left,
            } => Control::DPad(DPadControl::new(
                config.id,
                [up, right, down, left],
                config.pass_through,
                services,
            )),
            ControlKind::Touchpad { double_tap_drag } => Control::Touchpad(TouchpadControl::new(
                config.id,
                double_tap_drag,
                config.pass_through,
                services,
            )),
        }
    }

    pub fn id(&self) -> ControlId {
        match self {
            Control::Button(c) => c.id(),
            Control::DPad(c) => c.id(),
            Control::Touchpad(c) => c.id(),
        }
    }

    pub fn owned_pointer(&self) -> Option<PointerId> {
        match self {
            Control::Button(c) => c.owned_pointer(),
            Control::DPad(c) => c.owned_pointer(),
            Control::Touchpad(c) => c.owned_pointer(),
        }
    }

    /// `local` is the contact position relative to the control's top-left.
    pub fn on_down(
        &mut self,
        pointer: PointerId,
        local: Point,
        ctx: &mut TouchContext<'_>,
    ) -> TouchResponse {
        match self {
            Control::Button(c) => c.on_down(pointer, ctx),
            Control::DPad(c) => c.on_down(pointer, local, ctx),
            Control::Touchpad(c) => c.on_down(pointer, local, ctx),
        }
    }

    pub fn on_move(
        &mut self,
        pointer: PointerId,
        local: Point,
        ctx: &mut TouchContext<'_>,
    ) -> TouchResponse {
        match self {
            // Buttons keep their state while the finger slides.
            Control::Button(c) => c.on_move(pointer),
            Control::DPad(c) => c.on_move(pointer, local, ctx),
            Control::Touchpad(c) => c.on_move(pointer, local, ctx),
        }
    }

    /// Contact lifted or cancelled.
    pub fn on_up(&mut self, pointer: PointerId, ctx: &mut TouchContext<'_>) -> TouchResponse {
        match self {
            Control::Button(c) => c.on_up(pointer, ctx),
            Control::DPad(c) => c.on_up(pointer, ctx),
            Control::Touchpad(c) => c.on_up(pointer, ctx),
        }
    }

    /// Delivers an expired timer.  Only touchpads schedule timers.
    pub fn on_timer(&mut self, handle: TimerHandle, ctx: &mut TouchContext<'_>) {
        if let Control::Touchpad(c) = self {
            c.on_timer(handle, ctx);
        }
    }

    /// Releases everything the control holds before it is removed.
    pub fn detach(&mut self, ctx: &mut TouchContext<'_>) {
        match self {
            Control::Button(c) => c.detach(ctx),
            Control::DPad(c) => c.detach(ctx),
            Control::Touchpad(c) => c.detach(ctx),
        }
    }

    pub fn state_label(&self) -> String {
        match self {
            Control::Button(c) => c.state_label().to_string(),
            Control::DPad(c) => c.state_label(),
            Control::Touchpad(c) => c.state().to_string(),
        }
    }
}
