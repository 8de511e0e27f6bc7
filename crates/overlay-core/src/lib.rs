//! # overlay-core
//!
//! Shared library for the touch overlay: the action code vocabulary, the
//! pointer ownership arbiter, geometry helpers and the deterministic timer
//! queue that gesture classification runs on.
//!
//! It has zero dependencies on OS APIs, UI frameworks, or async runtimes.
//!
//! # Architecture overview (for beginners)
//!
//! An on-screen overlay draws virtual buttons, d-pads and touchpads over a
//! running application.  Each touch on the screen may belong to one of those
//! controls, or it may be meant for the application underneath.  The overlay
//! decides which, and translates the touches it keeps into keyboard, mouse
//! and gamepad input.
//!
//! This crate (`overlay-core`) is the shared foundation.  It defines:
//!
//! - **`action`** – The signed integer action codes a control is configured
//!   with, decoded into a typed [`ActionCode`].
//!
//! - **`domain`** – Pure logic: the [`PointerArbiter`] that records which
//!   contacts are claimed, the geometry types, and the [`TimerQueue`].
//!
//! - **`keymap`** – The SDL scancode table used to name and parse keyboard
//!   actions.
//!
//! The control state machines themselves live in `overlay-client`, which
//! builds on these types.

pub mod action;
pub mod domain;
pub mod keymap;

// Re-export the most-used types at the crate root so callers can write
// `overlay_core::PointerArbiter` instead of the full module path.
pub use action::{ActionCode, ActionParseError, GamepadButton, MouseButton, Trigger, WheelDirection};
pub use domain::arbiter::{ControlId, PointerArbiter, PointerClaim, PointerId};
pub use domain::geometry::{ControlGeometry, Density, Point, Rect, SurfaceSize};
pub use domain::timer::{ExpiredTimer, Millis, Scheduler, TimerHandle, TimerQueue};
pub use keymap::Scancode;
