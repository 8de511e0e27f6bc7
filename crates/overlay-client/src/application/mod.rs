//! Application layer: the control state machines and the surface that hosts them.
//!
//! # What lives here?
//!
//! - **`event_mapper`** – Turns an action code into a keyboard, mouse or
//!   gamepad event and hands it to an `InputInjector` implementation that is
//!   injected at construction time.  Also defines the haptics and text-input
//!   collaborator ports.
//!
//! - **`button`** / **`dpad`** – Press, release and toggle logic for simple
//!   buttons and for the four segments of a directional pad.
//!
//! - **`touchpad`** – The gesture classifier that turns a touch stream into
//!   clicks, drags and double-tap drags.
//!
//! - **`control`** – Control configuration, the shared services every control
//!   receives, and the `Control` sum type.
//!
//! - **`surface`** – Hit testing, pointer routing, timer delivery and layout
//!   changes for one input surface.

pub mod button;
pub mod control;
pub mod dpad;
pub mod event_mapper;
pub mod surface;
pub mod touchpad;
