//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads and writes the overlay's TOML settings and
//! falls back to defaults when the file does not exist yet.

pub mod config;
