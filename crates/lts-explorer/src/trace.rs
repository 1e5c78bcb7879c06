// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Path of visited states from the initial state to the current one.

use lts_graph::{Snapshot, StateId, TransitionKind};
use tracing::{debug, warn};

/// Ordered history of visited states.
///
/// Once seeded, the history never shrinks below its initial state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceTracker {
    history: Vec<StateId>,
}

impl TraceTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restart the history at `initial`.
    pub fn reset(&mut self, initial: impl Into<StateId>) {
        self.history.clear();
        self.history.push(initial.into());
    }

    /// Forget everything (diagram without a current state).
    pub fn clear(&mut self) {
        self.history.clear();
    }

    /// Record a forward step into `to`.
    pub fn on_forward_transition(&mut self, to: impl Into<StateId>) {
        self.history.push(to.into());
    }

    /// Retract the last step, keeping at least the initial state.
    pub fn on_undo(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
        }
    }

    /// Advance the history for a non-initial snapshot.
    ///
    /// Relies on the model engine's contract: `lastTransition` is present on
    /// forward steps and absent on undo, unless `transitionKind` says otherwise.
    pub fn observe(&mut self, snapshot: &Snapshot) {
        match snapshot.step_kind() {
            TransitionKind::Step => match &snapshot.last_transition {
                Some(t) => self.on_forward_transition(t.to.clone()),
                None => warn!("step snapshot without lastTransition; trace unchanged"),
            },
            TransitionKind::Undo => self.on_undo(),
            TransitionKind::Reset => match snapshot.current_state() {
                Some(current) => self.reset(current.id.clone()),
                None => {
                    warn!("reset snapshot without a current state; trace cleared");
                    self.clear();
                }
            },
        }
        debug!(len = self.history.len(), "trace updated");
    }

    /// Visited states, initial first.
    pub fn history(&self) -> &[StateId] {
        &self.history
    }

    /// Number of recorded states.
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// True before the first reset.
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Most recent state.
    pub fn current(&self) -> Option<&StateId> {
        self.history.last()
    }

    /// `s0 -> s1 -> s2`
    pub fn to_text(&self) -> String {
        self.history.join(" -> ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn undo_never_drops_initial_state() {
        let mut t = TraceTracker::new();
        t.reset("s0");
        t.on_undo();
        t.on_undo();
        assert_eq!(t.history(), ["s0"]);
        t.on_forward_transition("s1");
        t.on_forward_transition("s2");
        t.on_undo();
        assert_eq!(t.history(), ["s0", "s1"]);
        assert_eq!(t.to_text(), "s0 -> s1");
    }

    #[test]
    fn undo_on_empty_tracker_is_noop() {
        let mut t = TraceTracker::new();
        t.on_undo();
        assert!(t.is_empty());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Forward(String),
        Undo,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            "[a-z][0-9]{0,2}".prop_map(Op::Forward),
            Just(Op::Undo),
        ]
    }

    proptest! {
        #[test]
        fn initial_state_survives_any_sequence(ops in prop::collection::vec(op(), 0..64)) {
            let mut t = TraceTracker::new();
            t.reset("init");
            for op in ops {
                match op {
                    Op::Forward(s) => t.on_forward_transition(s),
                    Op::Undo => t.on_undo(),
                }
                prop_assert!(t.len() >= 1);
                prop_assert_eq!(t.history()[0].as_str(), "init");
            }
        }
    }
}
