//! Infrastructure layer: adapters around the application core.
//!
//! - `injection` – collaborator port implementations (recording, logging).
//! - `storage` – TOML configuration persistence.
//! - `scenario` – JSON touch-trace files for the replay binary.
//! - `event_loop` – the tokio task that drives a control surface.

pub mod event_loop;
pub mod injection;
pub mod scenario;
pub mod storage;
