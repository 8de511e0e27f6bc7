//! Touchpad gesture classifier.
//!
//! Turns one press/move/release stream into mouse input, telling apart four
//! intents:
//!
//! | Gesture                 | Result                                     |
//! |-------------------------|--------------------------------------------|
//! | tap                     | left click, resolved after the idle window |
//! | press and hold, drag    | left button held while the cursor moves    |
//! | tap then press, drag    | left button held at an absolute position   |
//! | plain drag              | cursor moves, no button                    |
//!
//! # State machine
//!
//! ```text
//!            down                 move > threshold
//!   Idle ──────────▶ Pending ──────────────────────▶ Moving ──up──▶ Idle
//!                    │   │  ╲
//!        idle timer  │   │   ╲ up, then down before the idle timer
//!   (still pressed)  │   │    ╲
//!                    ▼   │     ▼
//!         PressMoving    │    DoubleClick ──up──▶ Idle
//!              │         │
//!          up  ▼         │ idle timer (released): up, down, +click timer
//!            Idle ◀──────┘
//! ```
//!
//! `Pending` outlives the contact that started it: after a quick release the
//! session keeps waiting for the idle timer so that a second press can still
//! be recognised as a double tap.
//!
//! # Timers (for beginners)
//!
//! Two single-shot timers live on the surface's [`TimerQueue`]:
//!
//! - **idle timer** (`idle_timeout`, 200 ms) – stored inside the `Pending`
//!   phase, so it cannot outlive the phase that owns it.  Every transition
//!   out of `Pending` cancels it.
//! - **click timer** (`click_timeout`, 50 ms) – releases the button of a
//!   resolved single click.
//!
//! When a timer fires, [`TouchpadControl::on_timer`] compares the fired
//! handle with the one the session holds and ignores anything stale.
//!
//! [`TimerQueue`]: overlay_core::TimerQueue

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use overlay_core::{ControlId, Point, PointerId, TimerHandle};
use tracing::{debug, trace};

use crate::application::control::{ControlServices, TouchContext, TouchResponse};
use crate::application::event_mapper::MousePosition;

/// Timing and distance constants of the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchpadTuning {
    /// Window after a press in which a second press is a double tap.
    pub idle_timeout: Duration,
    /// Delay between the down and the up of a resolved single click.
    pub click_timeout: Duration,
    /// Movement, in device-independent units, that turns a press into a drag.
    pub move_threshold_dp: f32,
    /// Cursor acceleration multiplier.
    pub move_ratio: f32,
}

impl Default for TouchpadTuning {
    fn default() -> Self {
        Self {
            idle_timeout: Duration::from_millis(200),
            click_timeout: Duration::from_millis(50),
            move_threshold_dp: 5.0,
            move_ratio: 2.0,
        }
    }
}

/// Public view of the gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Pending,
    DoubleClick,
    Moving,
    PressMoving,
}

impl fmt::Display for GestureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GestureState::Idle => "idle",
            GestureState::Pending => "pending",
            GestureState::DoubleClick => "double_click",
            GestureState::Moving => "moving",
            GestureState::PressMoving => "press_moving",
        })
    }
}

/// Gesture phase with the data only that phase may read.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Phase {
    Idle,
    Pending { idle_timer: TimerHandle },
    /// `target` is the last absolute cursor position sent.
    DoubleClick { target: Point },
    Moving,
    PressMoving,
}

/// The contact currently owned by the touchpad.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Contact {
    pointer: PointerId,
    initial: Point,
    last: Point,
}

pub struct TouchpadControl {
    id: ControlId,
    double_tap_drag: bool,
    pass_through: bool,
    phase: Phase,
    contact: Option<Contact>,
    click_timer: Option<TimerHandle>,
    services: Arc<ControlServices>,
}

impl TouchpadControl {
    pub fn new(
        id: ControlId,
        double_tap_drag: bool,
        pass_through: bool,
        services: Arc<ControlServices>,
    ) -> Self {
        Self {
            id,
            double_tap_drag,
            pass_through,
            phase: Phase::Idle,
            contact: None,
            click_timer: None,
            services,
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn owned_pointer(&self) -> Option<PointerId> {
        self.contact.map(|c| c.pointer)
    }

    pub fn state(&self) -> GestureState {
        match self.phase {
            Phase::Idle => GestureState::Idle,
            Phase::Pending { .. } => GestureState::Pending,
            Phase::DoubleClick { .. } => GestureState::DoubleClick,
            Phase::Moving => GestureState::Moving,
            Phase::PressMoving => GestureState::PressMoving,
        }
    }

    /// Returns `true` while a click's delayed button-up is outstanding.
    pub fn click_pending(&self) -> bool {
        self.click_timer.is_some()
    }

    fn tuning(&self) -> &TouchpadTuning {
        &self.services.tuning
    }

    fn threshold_px(&self) -> f32 {
        self.services
            .density
            .to_raw_units(self.tuning().move_threshold_dp)
    }

    fn set_phase(&mut self, next: Phase) {
        let from = self.state();
        self.phase = next;
        debug!(control = %self.id, %from, to = %self.state(), "touchpad transition");
    }

    // ── Touch events ─────────────────────────────────────────────────────────

    pub fn on_down(
        &mut self,
        pointer: PointerId,
        local: Point,
        ctx: &mut TouchContext<'_>,
    ) -> TouchResponse {
        if self.contact.is_some() {
            return TouchResponse::Ignored;
        }
        if !self.services.take_pointer(pointer, self.id, self.pass_through) {
            return TouchResponse::Ignored;
        }
        self.contact = Some(Contact {
            pointer,
            initial: local,
            last: local,
        });
        self.services.pulse();

        match self.phase {
            Phase::Pending { idle_timer } => {
                // Released earlier and pressed again inside the idle window.
                ctx.scheduler.cancel(idle_timer);
                if self.double_tap_drag {
                    let target = self.double_click_target(local, ctx);
                    self.set_phase(Phase::DoubleClick { target });
                    self.services
                        .mapper
                        .primary_button(true, MousePosition::at(target));
                } else {
                    self.resolve_click(ctx);
                    self.start_pending(ctx);
                }
            }
            Phase::Idle | Phase::DoubleClick { .. } | Phase::Moving | Phase::PressMoving => {
                self.start_pending(ctx);
            }
        }
        TouchResponse::Consumed
    }

    pub fn on_move(
        &mut self,
        pointer: PointerId,
        local: Point,
        ctx: &mut TouchContext<'_>,
    ) -> TouchResponse {
        let ratio = self.tuning().move_ratio;
        let Some(contact) = self.contact.as_mut().filter(|c| c.pointer == pointer) else {
            return TouchResponse::Ignored;
        };
        let delta = local - contact.last;
        contact.last = local;
        let travelled = local - contact.initial;

        match self.phase {
            Phase::Pending { idle_timer } => {
                if travelled.length() > self.threshold_px() {
                    ctx.scheduler.cancel(idle_timer);
                    self.set_phase(Phase::Moving);
                    // The move that crossed the threshold is not lost.
                    self.services.mapper.relative_move(travelled.scale(ratio));
                }
            }
            Phase::DoubleClick { .. } => {
                let target = self.double_click_target(local, ctx);
                self.phase = Phase::DoubleClick { target };
                self.services.mapper.absolute_move(target);
            }
            Phase::Moving | Phase::PressMoving => {
                self.services.mapper.relative_move(delta.scale(ratio));
            }
            Phase::Idle => {
                trace!(control = %self.id, pointer, "move while idle ignored");
            }
        }
        TouchResponse::Consumed
    }

    /// Contact lifted or cancelled.
    pub fn on_up(&mut self, pointer: PointerId, _ctx: &mut TouchContext<'_>) -> TouchResponse {
        if self.owned_pointer() != Some(pointer) {
            return TouchResponse::Ignored;
        }
        self.release_contact(pointer);

        match self.phase {
            // Deferred: the idle timer decides between click and double tap.
            Phase::Pending { .. } => {}
            Phase::DoubleClick { target } => {
                self.services
                    .mapper
                    .primary_button(false, MousePosition::at(target));
                self.set_phase(Phase::Idle);
            }
            Phase::PressMoving => {
                self.services
                    .mapper
                    .primary_button(false, MousePosition::HERE);
                self.set_phase(Phase::Idle);
            }
            Phase::Moving => self.set_phase(Phase::Idle),
            Phase::Idle => {}
        }
        TouchResponse::Consumed
    }

    // ── Timers ───────────────────────────────────────────────────────────────

    /// Delivers an expired timer.  Stale handles are ignored.
    pub fn on_timer(&mut self, handle: TimerHandle, ctx: &mut TouchContext<'_>) {
        if self.click_timer == Some(handle) {
            // Completes the click that scheduled it, whatever came since.
            self.click_timer = None;
            self.services
                .mapper
                .primary_button(false, MousePosition::HERE);
            return;
        }

        match self.phase {
            Phase::Pending { idle_timer } if idle_timer == handle => {
                if self.contact.is_some() {
                    self.set_phase(Phase::PressMoving);
                    self.services.pulse();
                    self.services
                        .mapper
                        .primary_button(true, MousePosition::HERE);
                } else {
                    self.resolve_click(ctx);
                    self.set_phase(Phase::Idle);
                }
            }
            _ => trace!(control = %self.id, ?handle, "stale timer ignored"),
        }
    }

    /// Cancels timers, releases the claim and lets go of a held button.
    pub fn detach(&mut self, ctx: &mut TouchContext<'_>) {
        if let Phase::Pending { idle_timer } = self.phase {
            ctx.scheduler.cancel(idle_timer);
        }
        let button_held = matches!(self.phase, Phase::DoubleClick { .. } | Phase::PressMoving);
        if let Some(click_timer) = self.click_timer.take() {
            ctx.scheduler.cancel(click_timer);
            self.services
                .mapper
                .primary_button(false, MousePosition::HERE);
        } else if button_held {
            self.services
                .mapper
                .primary_button(false, MousePosition::HERE);
        }
        if let Some(pointer) = self.owned_pointer() {
            self.release_contact(pointer);
        }
        self.set_phase(Phase::Idle);
    }

    // ── Helpers ──────────────────────────────────────────────────────────────

    fn start_pending(&mut self, ctx: &mut TouchContext<'_>) {
        let idle_timer = ctx
            .scheduler
            .schedule(self.id, self.tuning().idle_timeout);
        self.set_phase(Phase::Pending { idle_timer });
    }

    /// Emits `up`, `down` and schedules the delayed `up` of a single click.
    ///
    /// The leading `up` clears any button state a previous gesture left
    /// behind.  A still-outstanding click timer is replaced.
    fn resolve_click(&mut self, ctx: &mut TouchContext<'_>) {
        if let Some(previous) = self.click_timer.take() {
            ctx.scheduler.cancel(previous);
        }
        debug!(control = %self.id, "single click");
        let mapper = &self.services.mapper;
        mapper.primary_button(false, MousePosition::HERE);
        mapper.primary_button(true, MousePosition::HERE);
        let click_timeout = self.tuning().click_timeout;
        self.click_timer = Some(ctx.scheduler.schedule(self.id, click_timeout));
    }

    /// Absolute cursor target of the double-tap drag.
    ///
    /// The finger's offset from the touchpad's own center, scaled by the
    /// move ratio, applied to the center of the whole surface.
    fn double_click_target(&self, local: Point, ctx: &TouchContext<'_>) -> Point {
        let centered = local - ctx.bounds.local_center();
        ctx.surface.center() + centered.scale(self.tuning().move_ratio)
    }

    fn release_contact(&mut self, pointer: PointerId) {
        if !self.pass_through {
            self.services.arbiter.release_if_owner(pointer, self.id);
        }
        self.contact = None;
    }
}
