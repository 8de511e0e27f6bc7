//! Directional pad: four button segments sharing one contact.
//!
//! The control is split into a 3×3 grid.  The cell under the finger selects
//! which directions are held: edge cells hold one direction, corner cells
//! hold two (diagonals), the center cell holds none.  Sliding the finger
//! releases directions that are no longer selected and presses new ones, so
//! a roll from up to up-right to right never drops the key in between.

use std::sync::Arc;

use overlay_core::{ActionCode, ControlId, Point, PointerId, Rect};
use tracing::debug;

use crate::application::control::{ControlServices, TouchContext, TouchResponse};

const UP: usize = 0;
const RIGHT: usize = 1;
const DOWN: usize = 2;
const LEFT: usize = 3;

const DIRECTION_NAMES: [&str; 4] = ["up", "right", "down", "left"];

pub struct DPadControl {
    id: ControlId,
    /// Action per direction, in `[up, right, down, left]` order.
    actions: [ActionCode; 4],
    pass_through: bool,
    owned_pointer: Option<PointerId>,
    held: [bool; 4],
    services: Arc<ControlServices>,
}

impl DPadControl {
    pub fn new(
        id: ControlId,
        actions: [ActionCode; 4],
        pass_through: bool,
        services: Arc<ControlServices>,
    ) -> Self {
        Self {
            id,
            actions,
            pass_through,
            owned_pointer: None,
            held: [false; 4],
            services,
        }
    }

    pub fn id(&self) -> ControlId {
        self.id
    }

    pub fn owned_pointer(&self) -> Option<PointerId> {
        self.owned_pointer
    }

    /// Directions currently held, `[up, right, down, left]`.
    pub fn held(&self) -> [bool; 4] {
        self.held
    }

    pub fn on_down(
        &mut self,
        pointer: PointerId,
        local: Point,
        ctx: &TouchContext<'_>,
    ) -> TouchResponse {
        if self.owned_pointer.is_some() {
            return TouchResponse::Ignored;
        }
        if !self.services.take_pointer(pointer, self.id, self.pass_through) {
            return TouchResponse::Ignored;
        }
        self.owned_pointer = Some(pointer);
        self.services.pulse();
        self.apply(directions_at(local, ctx.bounds), ctx);
        TouchResponse::Consumed
    }

    pub fn on_move(
        &mut self,
        pointer: PointerId,
        local: Point,
        ctx: &TouchContext<'_>,
    ) -> TouchResponse {
        if self.owned_pointer != Some(pointer) {
            return TouchResponse::Ignored;
        }
        self.apply(directions_at(local, ctx.bounds), ctx);
        TouchResponse::Consumed
    }

    pub fn on_up(&mut self, pointer: PointerId, ctx: &TouchContext<'_>) -> TouchResponse {
        if self.owned_pointer != Some(pointer) {
            return TouchResponse::Ignored;
        }
        self.release_all(pointer, ctx);
        TouchResponse::Consumed
    }

    pub fn detach(&mut self, ctx: &TouchContext<'_>) {
        if let Some(pointer) = self.owned_pointer {
            self.release_all(pointer, ctx);
        }
    }

    fn release_all(&mut self, pointer: PointerId, ctx: &TouchContext<'_>) {
        self.apply([false; 4], ctx);
        if !self.pass_through {
            self.services.arbiter.release_if_owner(pointer, self.id);
        }
        self.owned_pointer = None;
    }

    /// Releases directions leaving the selection, then presses new ones.
    fn apply(&mut self, selected: [bool; 4], ctx: &TouchContext<'_>) {
        let anchor = ctx.anchor();
        for dir in 0..4 {
            if self.held[dir] && !selected[dir] {
                self.held[dir] = false;
                self.send(dir, false, anchor);
            }
        }
        for dir in 0..4 {
            if selected[dir] && !self.held[dir] {
                self.held[dir] = true;
                self.send(dir, true, anchor);
            }
        }
    }

    fn send(&self, dir: usize, is_down: bool, anchor: Point) {
        let action = self.actions[dir];
        if !action.is_dispatchable() {
            return;
        }
        debug!(control = %self.id, direction = DIRECTION_NAMES[dir], is_down, "dpad segment");
        self.services.mapper.dispatch(action, is_down, anchor);
    }

    pub fn state_label(&self) -> String {
        let held: Vec<&str> = (0..4)
            .filter(|d| self.held[*d])
            .map(|d| DIRECTION_NAMES[d])
            .collect();
        if held.is_empty() {
            "released".to_string()
        } else {
            held.join("+")
        }
    }
}

/// Maps a local position to the directions its 3×3 grid cell selects.
fn directions_at(local: Point, bounds: Rect) -> [bool; 4] {
    let cell = |v: f32, extent: f32| -> u8 {
        if extent <= 0.0 {
            return 1;
        }
        ((v / (extent / 3.0)).floor().clamp(0.0, 2.0)) as u8
    };
    let col = cell(local.x, bounds.width);
    let row = cell(local.y, bounds.height);

    let mut selected = [false; 4];
    selected[UP] = row == 0;
    selected[DOWN] = row == 2;
    selected[LEFT] = col == 0;
    selected[RIGHT] = col == 2;
    selected
}
