//! Application lifecycle: prepare, init, load, start, unload.
//!
//! The `LifecycleTracker` records which phase the controller tree is in and
//! accumulates transitions that can be drained by the application loop. It is
//! the guard that keeps the one-shot phases (`prepare`, `init`) from running
//! twice and the repeatable ones (`load`, `unload`) alternating.

use crate::error::{Result, UiError};

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// The phase a controller tree is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Phase {
    /// Constructed, nothing has run yet.
    #[default]
    Unprepared,
    /// `prepare` has completed.
    Prepared,
    /// `init` has completed.
    Initialized,
    /// `load` has completed; the tree is mounted and live.
    Loaded,
    /// `start` has completed; the tree is loaded and modules are running.
    Started,
    /// `unload` has completed; `load` may run again.
    Unloaded,
}

impl Phase {
    /// Whether moving from `self` to `to` is a legal transition.
    pub fn can_advance_to(self, to: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, to),
            (Unprepared, Prepared)
                | (Prepared, Initialized)
                | (Initialized, Loaded)
                | (Loaded, Started)
                | (Loaded, Unloaded)
                | (Started, Unloaded)
                | (Unloaded, Loaded)
        )
    }

    /// Whether the tree is currently mounted.
    pub fn is_live(self) -> bool {
        matches!(self, Phase::Loaded | Phase::Started)
    }
}

// ---------------------------------------------------------------------------
// PhaseChange
// ---------------------------------------------------------------------------

/// A recorded transition between two phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: Phase,
    pub to: Phase,
}

// ---------------------------------------------------------------------------
// LifecycleTracker
// ---------------------------------------------------------------------------

/// Tracks the current phase and accumulates phase changes.
#[derive(Debug, Default)]
pub struct LifecycleTracker {
    phase: Phase,
    pending: Vec<PhaseChange>,
}

impl LifecycleTracker {
    /// Create a tracker in [`Phase::Unprepared`].
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Check that `to` may follow the current phase without moving.
    pub fn check(&self, to: Phase) -> Result<()> {
        if self.phase.can_advance_to(to) {
            Ok(())
        } else {
            Err(UiError::LifecycleOrder {
                from: self.phase,
                to,
            })
        }
    }

    /// Move to `to`, recording the change.
    ///
    /// Returns [`UiError::LifecycleOrder`] and leaves the phase untouched when
    /// the transition is not allowed.
    pub fn advance(&mut self, to: Phase) -> Result<()> {
        self.check(to)?;
        self.pending.push(PhaseChange {
            from: self.phase,
            to,
        });
        self.phase = to;
        Ok(())
    }

    /// Drain and return all pending phase changes.
    pub fn pending_changes(&mut self) -> Vec<PhaseChange> {
        std::mem::take(&mut self.pending)
    }

    /// Whether there are any pending phase changes.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tracker_is_unprepared() {
        let tracker = LifecycleTracker::new();
        assert_eq!(tracker.phase(), Phase::Unprepared);
        assert!(!tracker.has_pending());
    }

    #[test]
    fn boot_sequence_is_accepted() {
        let mut tracker = LifecycleTracker::new();
        for phase in [Phase::Prepared, Phase::Initialized, Phase::Loaded, Phase::Started] {
            tracker.advance(phase).unwrap();
        }
        assert_eq!(tracker.phase(), Phase::Started);
        assert_eq!(tracker.pending_changes().len(), 4);
        assert!(!tracker.has_pending());
    }

    #[test]
    fn load_before_init_is_rejected() {
        let mut tracker = LifecycleTracker::new();
        tracker.advance(Phase::Prepared).unwrap();
        let err = tracker.advance(Phase::Loaded).unwrap_err();
        assert_eq!(
            err,
            UiError::LifecycleOrder {
                from: Phase::Prepared,
                to: Phase::Loaded
            }
        );
        assert_eq!(tracker.phase(), Phase::Prepared);
    }

    #[test]
    fn prepare_twice_is_rejected() {
        let mut tracker = LifecycleTracker::new();
        tracker.advance(Phase::Prepared).unwrap();
        assert!(tracker.advance(Phase::Prepared).is_err());
    }

    #[test]
    fn load_and_unload_alternate() {
        let mut tracker = LifecycleTracker::new();
        tracker.advance(Phase::Prepared).unwrap();
        tracker.advance(Phase::Initialized).unwrap();
        tracker.advance(Phase::Loaded).unwrap();
        tracker.advance(Phase::Unloaded).unwrap();
        assert!(tracker.advance(Phase::Unloaded).is_err());
        tracker.advance(Phase::Loaded).unwrap();
        assert!(tracker.phase().is_live());
    }

    #[test]
    fn pending_changes_record_from_and_to() {
        let mut tracker = LifecycleTracker::new();
        tracker.advance(Phase::Prepared).unwrap();
        assert_eq!(
            tracker.pending_changes(),
            vec![PhaseChange {
                from: Phase::Unprepared,
                to: Phase::Prepared
            }]
        );
    }
}
