//! overlay-client library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does overlay-client do? (for beginners)
//!
//! An overlay draws virtual controls on top of a running application.  This
//! crate decides what each touch on the screen means:
//!
//! 1. A contact goes down.  The [`ControlSurface`] offers it to the controls,
//!    topmost first.  The first control that accepts it owns it until it
//!    lifts.
//! 2. Unless the control is pass-through, it claims the contact in the
//!    shared `PointerArbiter`, so the native surface withholds it from the
//!    application underneath.
//! 3. The control's state machine (button, d-pad or touchpad) turns the
//!    press/move/release stream into actions.
//! 4. The `EventMapper` converts each action into a synthetic keyboard,
//!    mouse or gamepad event and hands it to the injection bridge.
//!
//! [`ControlSurface`]: application::surface::ControlSurface

/// Application layer: control state machines and the surface dispatcher.
pub mod application;

/// Infrastructure layer: injection bridges, config, scenarios, event loop.
pub mod infrastructure;

pub use application::control::{Control, ControlConfig, ControlKind, ControlServices, TouchResponse};
pub use application::event_mapper::{EventMapper, InjectionError, InputInjector, MousePosition};
pub use application::surface::{ControlSurface, SurfaceError, TouchEvent, TouchPhase};
pub use application::touchpad::{GestureState, TouchpadTuning};
