//! Single-threaded driver for a [`ControlSurface`].
//!
//! # How the loop works (for beginners)
//!
//! A surface must see touch events and timer expiries on one thread, in
//! time order.  The driver is one tokio task that waits on two things at
//! once with `tokio::select!`:
//!
//! - the next [`SurfaceCommand`] from an `mpsc` channel (touches from the
//!   native input surface, layout changes, shutdown), and
//! - a `sleep_until` for the surface's earliest timer deadline.
//!
//! Whichever completes first is handled, then the loop recomputes the next
//! deadline.  Timers are never spawned as tasks, so cancelling one is just a
//! removal from the surface's queue.
//!
//! Surface time is milliseconds since `epoch`, the same clock touch events
//! are stamped with.
//!
//! When the channel closes the loop keeps running until every pending timer
//! has fired, so a tap at the very end of a trace still completes its click.

use std::time::Duration;

use overlay_core::{Millis, SurfaceSize};
use tokio::sync::mpsc;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

use crate::application::control::ControlConfig;
use crate::application::surface::{ControlSurface, TouchEvent};

/// Capacity of the command channel created by [`channel`].
pub const COMMAND_BUFFER: usize = 256;

/// Input accepted by the driver.
#[derive(Debug, Clone)]
pub enum SurfaceCommand {
    Touch(TouchEvent),
    ReplaceLayout(Vec<ControlConfig>),
    Resize(SurfaceSize),
    ResetToggles,
    /// Stops immediately, without waiting for pending timers.
    Shutdown,
}

/// Counters reported when the loop exits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    pub touches: usize,
    pub consumed: usize,
    pub timers_fired: usize,
}

pub fn channel() -> (mpsc::Sender<SurfaceCommand>, mpsc::Receiver<SurfaceCommand>) {
    mpsc::channel(COMMAND_BUFFER)
}

/// Milliseconds elapsed since `epoch`.
pub fn elapsed_ms(epoch: Instant) -> Millis {
    u64::try_from(epoch.elapsed().as_millis()).unwrap_or(Millis::MAX)
}

fn instant_at(epoch: Instant, ms: Millis) -> Instant {
    epoch + Duration::from_millis(ms)
}

/// Runs `surface` until shutdown, or until the channel closes and no timer
/// is left.  Returns the surface for inspection along with the counters.
pub async fn run(
    mut surface: ControlSurface,
    mut commands: mpsc::Receiver<SurfaceCommand>,
    epoch: Instant,
) -> (ControlSurface, LoopStats) {
    let mut stats = LoopStats::default();
    let mut open = true;
    info!("surface event loop started");

    loop {
        let deadline = surface.next_deadline();
        if !open && deadline.is_none() {
            break;
        }
        let wake_at = instant_at(epoch, deadline.unwrap_or_default());

        tokio::select! {
            command = commands.recv(), if open => match command {
                Some(SurfaceCommand::Touch(event)) => {
                    stats.touches += 1;
                    if surface.handle_touch(event).is_consumed() {
                        stats.consumed += 1;
                    }
                }
                Some(SurfaceCommand::ReplaceLayout(configs)) => {
                    surface.advance(elapsed_ms(epoch));
                    if let Err(e) = surface.replace_layout(configs) {
                        warn!(error = %e, "layout rejected; keeping current controls");
                    }
                }
                Some(SurfaceCommand::Resize(size)) => {
                    surface.advance(elapsed_ms(epoch));
                    surface.resize(size);
                }
                Some(SurfaceCommand::ResetToggles) => {
                    surface.advance(elapsed_ms(epoch));
                    surface.reset_toggles();
                }
                Some(SurfaceCommand::Shutdown) => {
                    debug!("shutdown requested");
                    break;
                }
                None => {
                    debug!(pending = deadline.is_some(), "command channel closed");
                    open = false;
                }
            },
            _ = sleep_until(wake_at), if deadline.is_some() => {
                if let Some(due) = deadline {
                    stats.timers_fired += surface.advance(due);
                }
            }
        }
    }

    info!(
        touches = stats.touches,
        consumed = stats.consumed,
        timers = stats.timers_fired,
        "surface event loop stopped"
    );
    (surface, stats)
}

/// Sends `events` at their recorded times, then closes the channel.
pub async fn replay(
    events: Vec<TouchEvent>,
    commands: mpsc::Sender<SurfaceCommand>,
    epoch: Instant,
) {
    for event in events {
        sleep_until(instant_at(epoch, event.time_ms)).await;
        if commands.send(SurfaceCommand::Touch(event)).await.is_err() {
            warn!("event loop gone; replay stopped early");
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::control::{ControlKind, ControlServices};
    use crate::application::event_mapper::EventMapper;
    use crate::application::surface::TouchPhase;
    use crate::application::touchpad::TouchpadTuning;
    use crate::infrastructure::injection::RecordingBridge;
    use overlay_core::{ActionCode, ControlGeometry, Density, PointerArbiter};
    use std::sync::Arc;
    use uuid::Uuid;

    fn surface_with_button(bridge: &Arc<RecordingBridge>) -> ControlSurface {
        let services = Arc::new(ControlServices {
            arbiter: Arc::new(PointerArbiter::new()),
            mapper: EventMapper::new(bridge.clone()),
            haptics: bridge.clone(),
            text_input: bridge.clone(),
            haptic_pulse: None,
            density: Density::default(),
            tuning: TouchpadTuning::default(),
        });
        let mut surface = ControlSurface::new(SurfaceSize::new(100.0, 100.0), services);
        surface
            .add_control(ControlConfig {
                id: Uuid::new_v4(),
                name: "a".into(),
                geometry: ControlGeometry::new(0.0, 0.0, 1.0, 1.0),
                pass_through: false,
                kind: ControlKind::Button {
                    action: ActionCode::Key(4),
                    is_toggle: false,
                },
            })
            .unwrap();
        surface
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_exits_when_channel_closes_and_no_timers() {
        // Arrange
        let bridge = Arc::new(RecordingBridge::new());
        let surface = surface_with_button(&bridge);
        let (tx, rx) = channel();
        let epoch = Instant::now();

        // Act
        tx.send(SurfaceCommand::Touch(TouchEvent::new(0, TouchPhase::Down, 5.0, 5.0, 0)))
            .await
            .unwrap();
        tx.send(SurfaceCommand::Touch(TouchEvent::new(0, TouchPhase::Up, 5.0, 5.0, 10)))
            .await
            .unwrap();
        drop(tx);
        let (_surface, stats) = run(surface, rx, epoch).await;

        // Assert
        assert_eq!(stats, LoopStats { touches: 2, consumed: 2, timers_fired: 0 });
        assert_eq!(bridge.events().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_immediately() {
        let bridge = Arc::new(RecordingBridge::new());
        let surface = surface_with_button(&bridge);
        let (tx, rx) = channel();

        tx.send(SurfaceCommand::Shutdown).await.unwrap();
        let (_surface, stats) = run(surface, rx, Instant::now()).await;

        assert_eq!(stats, LoopStats::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_layout_keeps_current_controls() {
        // Arrange
        let bridge = Arc::new(RecordingBridge::new());
        let surface = surface_with_button(&bridge);
        let (tx, rx) = channel();
        let bad = ControlConfig {
            id: Uuid::new_v4(),
            name: "flat".into(),
            geometry: ControlGeometry::new(0.0, 0.0, 0.0, 0.0),
            pass_through: false,
            kind: ControlKind::Touchpad { double_tap_drag: true },
        };

        // Act
        tx.send(SurfaceCommand::ReplaceLayout(vec![bad])).await.unwrap();
        drop(tx);
        let (surface, _) = run(surface, rx, Instant::now()).await;

        // Assert
        assert_eq!(surface.len(), 1);
    }
}
