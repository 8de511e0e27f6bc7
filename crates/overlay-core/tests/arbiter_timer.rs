//! Integration tests for the overlay-core public API.
//!
//! These tests drive the arbiter and the timer queue together the way a
//! control surface does: claims are taken on press, timers are scheduled
//! per owner, and tearing down an owner clears both.

use std::time::Duration;

use overlay_core::{ActionCode, PointerArbiter, Scheduler, TimerQueue};
use uuid::Uuid;

#[test]
fn test_two_controls_compete_for_one_pointer() {
    // Arrange
    let arbiter = PointerArbiter::new();
    let button = Uuid::new_v4();
    let touchpad = Uuid::new_v4();

    // Act – the button is dispatched first (topmost)
    let button_won = arbiter.claim(0, button);
    let touchpad_won = arbiter.claim(0, touchpad);

    // Assert
    assert!(button_won);
    assert!(!touchpad_won);
    assert_eq!(arbiter.owner(0), Some(button));

    // A second finger is independent.
    assert!(arbiter.claim(1, touchpad));
    assert_eq!(arbiter.claimed_count(), 2);
}

#[test]
fn test_teardown_of_one_owner_leaves_the_other_intact() {
    // Arrange
    let arbiter = PointerArbiter::new();
    let mut timers = TimerQueue::new();
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    arbiter.claim(0, a);
    arbiter.claim(1, b);
    timers.schedule(a, Duration::from_millis(200));
    let b_timer = timers.schedule(b, Duration::from_millis(200));

    // Act
    arbiter.release_if_owner(0, a);
    arbiter.release_if_owner(1, a);
    timers.cancel_owned_by(a);

    // Assert
    assert!(!arbiter.is_claimed(0));
    assert!(arbiter.is_claimed(1));
    assert!(timers.is_pending(b_timer));
    let fired = timers.pop_expired(200).expect("b's timer must still fire");
    assert_eq!(fired.owner, b);
    assert!(timers.is_empty());
}

#[test]
fn test_rescheduling_supersedes_old_handle() {
    // Arrange – a press schedules a timer, a second press replaces it
    let mut timers = TimerQueue::new();
    let owner = Uuid::new_v4();
    let first = timers.schedule(owner, Duration::from_millis(50));
    timers.advance_clock(30);

    // Act
    timers.cancel(first);
    let second = timers.schedule(owner, Duration::from_millis(50));

    // Assert – only the replacement fires, at 30 + 50
    assert_eq!(timers.pop_expired(50), None);
    let fired = timers.pop_expired(80).expect("replacement must fire");
    assert_eq!(fired.handle, second);
}

#[test]
fn test_action_codes_serialize_as_raw_integers() {
    let actions: Vec<ActionCode> = serde_json::from_str(r#"[44, "MouseRight", -221, "keyboard"]"#)
        .expect("mixed codes and names must parse");

    let json = serde_json::to_string(&actions).expect("serialize");

    assert_eq!(json, "[44,-2,-221,-100]");
}
