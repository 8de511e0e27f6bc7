//! Domain entities for the touch overlay.
//!
//! This module contains pure logic with no platform dependencies.
//!
//! # What lives here? (for beginners)
//!
//! The domain is the innermost layer.  It knows nothing about the native
//! touch surface, the input injection bridge, or the event loop that drives
//! everything.  It only defines the shared vocabulary the controls need:
//!
//! - **`arbiter`** – which touch contacts are claimed by a control and must be
//!   withheld from the underlying application.
//! - **`geometry`** – points, rectangles and the density factor used to turn
//!   device-independent thresholds into raw pixels.
//! - **`timer`** – the deterministic, cancellable timer queue that gesture
//!   classification schedules its timeouts on.
//!
//! Code in outer layers (the client's application and infrastructure modules)
//! depends on the domain, but the domain never depends on them.

/// Pointer ownership arbiter shared by all controls on one surface.
pub mod arbiter;

/// Coordinate spaces and conversions.
pub mod geometry;

/// Single-shot timers keyed by deadline.
pub mod timer;
