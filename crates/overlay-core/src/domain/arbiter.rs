//! Pointer ownership arbiter.
//!
//! Many controls share one physical touch surface.  When a control that is
//! *not* pass-through accepts a contact, it records a claim here; the native
//! input surface polls [`PointerArbiter::is_claimed`] and withholds claimed
//! contacts from the underlying application, so a finger on the virtual
//! "jump" button is not also seen by the game as a tap.
//!
//! # One arbiter per input surface
//!
//! The arbiter is created once per active input surface and handed to every
//! control as an `Arc<PointerArbiter>` at construction.  There is no global
//! instance: tearing down the surface drops the last `Arc` and every claim
//! with it.
//!
//! # Dispatch order, not locking
//!
//! All touch events run on one thread, so the `Mutex` below is never
//! contended.  Correctness comes from dispatch order: the control whose hit
//! test runs first gets the first chance to claim, and every later control
//! sees the id as taken.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

/// Identifier of one touch contact, stable from press to release.
pub type PointerId = u32;

/// Identifier of one on-screen control instance.
pub type ControlId = Uuid;

/// A record that `pointer` is owned by `control` and withheld from pass-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerClaim {
    pub pointer: PointerId,
    pub control: ControlId,
}

/// Registry of claimed contacts for one input surface.
#[derive(Debug, Default)]
pub struct PointerArbiter {
    claims: Mutex<HashMap<PointerId, ControlId>>,
}

impl PointerArbiter {
    /// Creates an arbiter with no claims.
    pub fn new() -> Self {
        Self::default()
    }

    fn claims(&self) -> MutexGuard<'_, HashMap<PointerId, ControlId>> {
        // A panic while holding the lock cannot leave the map half-updated,
        // so a poisoned lock is still safe to use.
        self.claims.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `pointer` for `control`.  First claimant wins.
    ///
    /// Returns `true` if `control` owns the pointer after the call (either
    /// newly or because it already did), `false` if another control holds it.
    pub fn claim(&self, pointer: PointerId, control: ControlId) -> bool {
        let mut claims = self.claims();
        match claims.get(&pointer) {
            Some(owner) => *owner == control,
            None => {
                claims.insert(pointer, control);
                debug!(pointer, %control, "pointer claimed");
                true
            }
        }
    }

    /// Releases `pointer` regardless of owner.  Releasing an unclaimed id is a no-op.
    pub fn release(&self, pointer: PointerId) {
        if let Some(control) = self.claims().remove(&pointer) {
            debug!(pointer, %control, "pointer released");
        }
    }

    /// Releases `pointer` only if `control` owns it.
    ///
    /// Returns `true` if a claim was removed.
    pub fn release_if_owner(&self, pointer: PointerId, control: ControlId) -> bool {
        let mut claims = self.claims();
        if claims.get(&pointer) == Some(&control) {
            claims.remove(&pointer);
            debug!(pointer, %control, "pointer released");
            true
        } else {
            false
        }
    }

    /// Returns `true` if `pointer` is currently withheld from pass-through.
    pub fn is_claimed(&self, pointer: PointerId) -> bool {
        self.claims().contains_key(&pointer)
    }

    /// Returns the control that currently owns `pointer`, if any.
    pub fn owner(&self, pointer: PointerId) -> Option<ControlId> {
        self.claims().get(&pointer).copied()
    }

    /// Returns the current claim on `pointer`, if any.
    pub fn claim_of(&self, pointer: PointerId) -> Option<PointerClaim> {
        self.owner(pointer).map(|control| PointerClaim { pointer, control })
    }

    /// Number of contacts currently withheld.
    pub fn claimed_count(&self) -> usize {
        self.claims().len()
    }

    /// Drops every claim.  Used when the input surface is torn down.
    pub fn clear_all(&self) {
        let mut claims = self.claims();
        if !claims.is_empty() {
            debug!(count = claims.len(), "clearing all pointer claims");
            claims.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claimant_wins() {
        // Arrange
        let arbiter = PointerArbiter::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        // Act
        let a_claimed = arbiter.claim(7, a);
        let b_claimed = arbiter.claim(7, b);

        // Assert
        assert!(a_claimed);
        assert!(!b_claimed);
        assert_eq!(arbiter.owner(7), Some(a));
    }

    #[test]
    fn test_claim_is_idempotent_for_the_owner() {
        let arbiter = PointerArbiter::new();
        let a = Uuid::new_v4();

        assert!(arbiter.claim(1, a));
        assert!(arbiter.claim(1, a));
        assert_eq!(arbiter.claimed_count(), 1);
    }

    #[test]
    fn test_release_unclaimed_is_noop() {
        let arbiter = PointerArbiter::new();

        arbiter.release(42);

        assert!(!arbiter.is_claimed(42));
        assert_eq!(arbiter.claimed_count(), 0);
    }

    #[test]
    fn test_release_clears_claim() {
        let arbiter = PointerArbiter::new();
        arbiter.claim(3, Uuid::new_v4());

        arbiter.release(3);

        assert!(!arbiter.is_claimed(3));
    }

    #[test]
    fn test_release_if_owner_ignores_other_controls() {
        // Arrange
        let arbiter = PointerArbiter::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        arbiter.claim(5, a);

        // Act
        let released_by_b = arbiter.release_if_owner(5, b);

        // Assert
        assert!(!released_by_b);
        assert_eq!(arbiter.owner(5), Some(a));
        assert!(arbiter.release_if_owner(5, a));
        assert!(!arbiter.is_claimed(5));
    }

    #[test]
    fn test_claims_are_per_pointer() {
        let arbiter = PointerArbiter::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        assert!(arbiter.claim(0, a));
        assert!(arbiter.claim(1, b));
        assert_eq!(arbiter.claim_of(1), Some(PointerClaim { pointer: 1, control: b }));
        assert_eq!(arbiter.claimed_count(), 2);
    }

    #[test]
    fn test_clear_all_drops_every_claim() {
        let arbiter = PointerArbiter::new();
        arbiter.claim(0, Uuid::new_v4());
        arbiter.claim(1, Uuid::new_v4());

        arbiter.clear_all();

        assert_eq!(arbiter.claimed_count(), 0);
        assert!(!arbiter.is_claimed(0));
    }
}
