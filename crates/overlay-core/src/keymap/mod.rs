//! Key tables used to label and parse keyboard action codes.
//!
//! The canonical keyboard representation is the SDL scancode, which the
//! underlying application consumes directly.  Other code families (mouse,
//! gamepad) live in [`crate::action`] because they are encoded as negative
//! action codes rather than keys.

pub mod scancode;

pub use scancode::Scancode;
