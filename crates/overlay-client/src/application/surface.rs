//! ControlSurface: owns every control of one input surface and routes touches.
//!
//! # Responsibilities
//!
//! - **Hit testing** – a contact-down is offered to the controls topmost
//!   first; the first one whose bounds contain the point and which consumes
//!   the event owns the contact.
//! - **Routing** – move/up/cancel events go to the owner recorded at down
//!   time, whatever the finger's current position.
//! - **Timers** – the surface owns the [`TimerQueue`] every control schedules
//!   on, and delivers expired timers to their owners in [`advance`].
//! - **Layout changes** – adding, removing or replacing controls detaches
//!   the affected sessions so no claim, timer or held input survives them.
//!
//! Everything runs on one thread.  The surface is not `Sync` and is driven by
//! [`crate::infrastructure::event_loop`].
//!
//! [`advance`]: ControlSurface::advance

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use overlay_core::{
    ControlId, Millis, Point, PointerArbiter, PointerId, Rect, SurfaceSize, TimerQueue,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::application::control::{
    Control, ControlConfig, ControlServices, ControlStatus, TouchContext, TouchResponse,
};

/// Error type for layout mutations on a [`ControlSurface`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    #[error("control {0} already exists on this surface")]
    DuplicateControl(ControlId),
    #[error("control {0} not found")]
    UnknownControl(ControlId),
    #[error("control {0} has degenerate geometry")]
    InvalidGeometry(ControlId),
}

/// Phase of a raw touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    Down,
    Move,
    Up,
    Cancel,
}

/// One raw touch event in surface pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchEvent {
    pub pointer: PointerId,
    pub phase: TouchPhase,
    #[serde(flatten)]
    pub position: Point,
    /// Event time on the surface clock.
    pub time_ms: Millis,
}

impl TouchEvent {
    pub fn new(pointer: PointerId, phase: TouchPhase, x: f32, y: f32, time_ms: Millis) -> Self {
        Self {
            pointer,
            phase,
            position: Point::new(x, y),
            time_ms,
        }
    }
}

struct Mounted {
    config: ControlConfig,
    bounds: Rect,
    control: Control,
}

/// All controls of one input surface, bottom to top.
pub struct ControlSurface {
    size: SurfaceSize,
    services: Arc<ControlServices>,
    timers: TimerQueue,
    controls: Vec<Mounted>,
    routes: HashMap<PointerId, ControlId>,
}

fn context(timers: &mut TimerQueue, bounds: Rect, surface: SurfaceSize) -> TouchContext<'_> {
    TouchContext {
        scheduler: timers,
        bounds,
        surface,
    }
}

impl ControlSurface {
    pub fn new(size: SurfaceSize, services: Arc<ControlServices>) -> Self {
        Self {
            size,
            services,
            timers: TimerQueue::new(),
            controls: Vec::new(),
            routes: HashMap::new(),
        }
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    pub fn arbiter(&self) -> &Arc<PointerArbiter> {
        &self.services.arbiter
    }

    /// Returns `true` if `pointer` must be withheld from the application.
    pub fn is_claimed(&self, pointer: PointerId) -> bool {
        self.services.arbiter.is_claimed(pointer)
    }

    /// Control currently routed `pointer`, claimed or pass-through.
    pub fn route_of(&self, pointer: PointerId) -> Option<ControlId> {
        self.routes.get(&pointer).copied()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    pub fn control(&self, id: ControlId) -> Option<&Control> {
        self.controls
            .iter()
            .find(|m| m.config.id == id)
            .map(|m| &m.control)
    }

    /// Earliest pending timer deadline, if any.
    pub fn next_deadline(&self) -> Option<Millis> {
        self.timers.next_deadline()
    }

    pub fn now(&self) -> Millis {
        overlay_core::Scheduler::now(&self.timers)
    }

    // ── Layout ───────────────────────────────────────────────────────────────

    /// Adds a control on top of every existing one.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::DuplicateControl`] if the id is taken,
    /// [`SurfaceError::InvalidGeometry`] if the geometry has no area.
    pub fn add_control(&mut self, config: ControlConfig) -> Result<(), SurfaceError> {
        if self.controls.iter().any(|m| m.config.id == config.id) {
            return Err(SurfaceError::DuplicateControl(config.id));
        }
        self.mount(config)
    }

    fn mount(&mut self, config: ControlConfig) -> Result<(), SurfaceError> {
        if !config.geometry.is_valid() {
            return Err(SurfaceError::InvalidGeometry(config.id));
        }
        let bounds = config.geometry.resolve(self.size);
        let control = Control::from_config(&config, Arc::clone(&self.services));
        debug!(control = %config.id, name = %config.name, kind = config.kind.label(), "control added");
        self.controls.push(Mounted {
            config,
            bounds,
            control,
        });
        Ok(())
    }

    /// Detaches and removes one control.
    ///
    /// # Errors
    ///
    /// [`SurfaceError::UnknownControl`] if no control has that id.
    pub fn remove_control(&mut self, id: ControlId) -> Result<ControlConfig, SurfaceError> {
        let index = self
            .controls
            .iter()
            .position(|m| m.config.id == id)
            .ok_or(SurfaceError::UnknownControl(id))?;
        let mut mounted = self.controls.remove(index);
        self.detach(&mut mounted);
        debug!(control = %id, "control removed");
        Ok(mounted.config)
    }

    /// Replaces the whole layout.  The new layout is validated before any
    /// existing control is touched.
    ///
    /// # Errors
    ///
    /// The first duplicate id or degenerate geometry found in `configs`.
    pub fn replace_layout(&mut self, configs: Vec<ControlConfig>) -> Result<(), SurfaceError> {
        let mut seen = HashSet::new();
        for config in &configs {
            if !seen.insert(config.id) {
                return Err(SurfaceError::DuplicateControl(config.id));
            }
            if !config.geometry.is_valid() {
                return Err(SurfaceError::InvalidGeometry(config.id));
            }
        }
        self.detach_all();
        for config in configs {
            self.mount(config)?;
        }
        info!(controls = self.controls.len(), "layout replaced");
        Ok(())
    }

    /// Applies a new surface size.  Counts as a layout change.
    pub fn resize(&mut self, size: SurfaceSize) {
        let configs: Vec<ControlConfig> = self.controls.iter().map(|m| m.config.clone()).collect();
        self.detach_all();
        self.size = size;
        for config in configs {
            let id = config.id;
            if let Err(e) = self.mount(config) {
                warn!(control = %id, error = %e, "control dropped on resize");
            }
        }
    }

    /// Releases every toggle button that is currently toggled on.
    pub fn reset_toggles(&mut self) {
        let size = self.size;
        for m in &mut self.controls {
            if let Control::Button(button) = &mut m.control {
                button.reset_toggle(&context(&mut self.timers, m.bounds, size));
            }
        }
    }

    /// Detaches every control and drops all claims.  The surface is empty afterwards.
    pub fn shutdown(&mut self) {
        self.detach_all();
        self.services.arbiter.clear_all();
        info!("control surface shut down");
    }

    fn detach_all(&mut self) {
        let mut controls = std::mem::take(&mut self.controls);
        for mounted in &mut controls {
            self.detach(mounted);
        }
    }

    fn detach(&mut self, mounted: &mut Mounted) {
        let id = mounted.config.id;
        mounted
            .control
            .detach(&mut context(&mut self.timers, mounted.bounds, self.size));
        self.timers.cancel_owned_by(id);
        self.routes.retain(|_, owner| *owner != id);
    }

    // ── Input ────────────────────────────────────────────────────────────────

    /// Handles one raw touch event.
    ///
    /// Timers due at or before the event's timestamp fire first, so the
    /// event sees the state they produce.
    pub fn handle_touch(&mut self, event: TouchEvent) -> TouchResponse {
        self.advance(event.time_ms);
        let size = self.size;
        let pointer = event.pointer;

        match event.phase {
            TouchPhase::Down => {
                if self.routes.contains_key(&pointer) {
                    trace!(pointer, "duplicate down for routed pointer ignored");
                    return TouchResponse::Ignored;
                }
                for m in self.controls.iter_mut().rev() {
                    if !m.bounds.contains(event.position) {
                        continue;
                    }
                    let local = m.bounds.to_local(event.position);
                    let mut ctx = context(&mut self.timers, m.bounds, size);
                    if m.control.on_down(pointer, local, &mut ctx).is_consumed() {
                        self.routes.insert(pointer, m.config.id);
                        return TouchResponse::Consumed;
                    }
                }
                TouchResponse::Ignored
            }
            TouchPhase::Move => {
                let Some(id) = self.routes.get(&pointer).copied() else {
                    return TouchResponse::Ignored;
                };
                match self.controls.iter_mut().find(|m| m.config.id == id) {
                    Some(m) => {
                        let local = m.bounds.to_local(event.position);
                        let mut ctx = context(&mut self.timers, m.bounds, size);
                        m.control.on_move(pointer, local, &mut ctx)
                    }
                    None => TouchResponse::Ignored,
                }
            }
            TouchPhase::Up | TouchPhase::Cancel => {
                let Some(id) = self.routes.remove(&pointer) else {
                    return TouchResponse::Ignored;
                };
                match self.controls.iter_mut().find(|m| m.config.id == id) {
                    Some(m) => {
                        let mut ctx = context(&mut self.timers, m.bounds, size);
                        m.control.on_up(pointer, &mut ctx)
                    }
                    None => TouchResponse::Ignored,
                }
            }
        }
    }

    /// Moves the clock to `now` and delivers every timer due by then.
    ///
    /// Returns the number of timers delivered.
    pub fn advance(&mut self, now: Millis) -> usize {
        let size = self.size;
        let mut delivered = 0;
        while let Some(expired) = self.timers.pop_expired(now) {
            delivered += 1;
            match self
                .controls
                .iter_mut()
                .find(|m| m.config.id == expired.owner)
            {
                Some(m) => {
                    let mut ctx = context(&mut self.timers, m.bounds, size);
                    m.control.on_timer(expired.handle, &mut ctx);
                }
                None => trace!(owner = %expired.owner, "timer for removed control dropped"),
            }
        }
        self.timers.advance_clock(now);
        delivered
    }

    // ── Diagnostics ──────────────────────────────────────────────────────────

    /// Status of every control, topmost first.
    pub fn status(&self) -> Vec<ControlStatus> {
        self.controls
            .iter()
            .rev()
            .map(|m| ControlStatus {
                id: m.config.id,
                name: m.config.name.clone(),
                kind: m.config.kind.label(),
                owned_pointer: m.control.owned_pointer(),
                state: m.control.state_label(),
            })
            .collect()
    }
}
