//! overlay-replay: feeds a recorded touch trace through the control surface.
//!
//! Loads the overlay configuration (TOML) and a scenario (JSON: surface size,
//! controls, timestamped touches), then replays the touches in real time
//! through the same single-threaded event loop a live surface uses.  Every
//! injected event is logged instead of delivered.
//!
//! # Usage
//!
//! ```text
//! overlay-replay --scenario <FILE> [--config <FILE>]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable           | Description                          |
//! |--------------------|--------------------------------------|
//! | `OVERLAY_CONFIG`   | Path to the TOML configuration       |
//! | `OVERLAY_SCENARIO` | Path to the JSON scenario            |
//! | `RUST_LOG`         | Log filter, overrides `log_level`    |

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use overlay_client::application::control::ControlServices;
use overlay_client::application::event_mapper::EventMapper;
use overlay_client::infrastructure::event_loop;
use overlay_client::infrastructure::injection::TracingBridge;
use overlay_client::infrastructure::scenario::Scenario;
use overlay_client::infrastructure::storage::config;
use overlay_core::PointerArbiter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays a touch trace through the on-screen control surface.
#[derive(Debug, Parser)]
#[command(
    name = "overlay-replay",
    about = "Replay a recorded touch trace through the virtual control overlay",
    version
)]
struct Cli {
    /// JSON scenario with the surface size, controls and touch events.
    #[arg(long, env = "OVERLAY_SCENARIO")]
    scenario: PathBuf,

    /// TOML configuration.  Defaults are used if the file does not exist.
    #[arg(long, default_value = "overlay.toml", env = "OVERLAY_CONFIG")]
    config: PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let cfg = config::load_from(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Initialise structured logging.  RUST_LOG wins over the config file.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level)),
        )
        .init();

    let scenario = Scenario::load(&cli.scenario)
        .with_context(|| format!("loading scenario from {}", cli.scenario.display()))?;
    info!(
        controls = scenario.controls.len(),
        events = scenario.events.len(),
        "overlay-replay starting"
    );

    // ── Collaborators ─────────────────────────────────────────────────────────
    let bridge = Arc::new(TracingBridge::new());
    let services = Arc::new(ControlServices {
        arbiter: Arc::new(PointerArbiter::new()),
        mapper: EventMapper::new(bridge.clone()),
        haptics: bridge.clone(),
        text_input: bridge.clone(),
        haptic_pulse: cfg.haptic_pulse(),
        density: cfg.density(),
        tuning: cfg.tuning(),
    });
    let surface = scenario
        .build_surface(services)
        .context("building control surface")?;

    // Touches and timers must run on one thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("starting tokio runtime")?;

    let (mut surface, stats) = runtime.block_on(async move {
        let (tx, rx) = event_loop::channel();
        let epoch = tokio::time::Instant::now();
        let feeder = tokio::spawn(event_loop::replay(scenario.events, tx, epoch));
        let result = event_loop::run(surface, rx, epoch).await;
        let _ = feeder.await;
        result
    });

    for status in surface.status() {
        info!(
            control = %status.id,
            name = %status.name,
            kind = status.kind,
            state = %status.state,
            "final control state"
        );
    }
    surface.shutdown();

    info!(
        touches = stats.touches,
        consumed = stats.consumed,
        timers = stats.timers_fired,
        injected = bridge.injected(),
        "overlay-replay finished"
    );
    Ok(())
}
