// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Canonical element identities derived from transitions.
//!
//! The model engine names the action node of transition `(from, to, lbl)` and
//! its two connector edges with the same functions used here, so the ids of the
//! elements to highlight can be computed from `lastTransition` alone.
//!
//! Components are joined with `_` and never escaped. Taps therefore resolve
//! through [`TransitionIndex`] instead of splitting ids back apart.

use crate::model::{ElementId, Snapshot, Transition};
use std::collections::HashMap;

/// Prefix of action-node ids.
pub const ACTION_PREFIX: &str = "event_";
/// Prefix of state → action edge ids.
pub const SOURCE_EDGE_PREFIX: &str = "s_to_a_";
/// Prefix of action → state edge ids.
pub const TARGET_EDGE_PREFIX: &str = "a_to_s_";
/// Prefix of direct state → state edge ids (empty label).
pub const DIRECT_PREFIX: &str = "direct_";

/// `event_<from>_<to>_<lbl>`
pub fn action_id(t: &Transition) -> ElementId {
    format!("{ACTION_PREFIX}{}_{}_{}", t.from, t.to, t.lbl)
}

/// `direct_<from>_<to>_`
pub fn direct_edge_id(t: &Transition) -> ElementId {
    format!("{DIRECT_PREFIX}{}_{}_", t.from, t.to)
}

/// Elements implicated in one transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionIdentity {
    /// Labelled transition: action node plus its two connectors.
    Action {
        /// The action node.
        action_id: ElementId,
        /// Edge from the source state into the action node.
        source_edge_id: ElementId,
        /// Edge from the action node into the target state.
        target_edge_id: ElementId,
    },
    /// Empty-label transition drawn as a single state → state edge.
    Direct {
        /// The direct edge.
        edge_id: ElementId,
    },
}

impl TransitionIdentity {
    /// Compute the identities for `t`.
    pub fn of(t: &Transition) -> Self {
        if t.is_direct() {
            return Self::Direct {
                edge_id: direct_edge_id(t),
            };
        }
        let action_id = action_id(t);
        Self::Action {
            source_edge_id: format!("{SOURCE_EDGE_PREFIX}{}_{action_id}", t.from),
            target_edge_id: format!("{TARGET_EDGE_PREFIX}{action_id}_{}", t.to),
            action_id,
        }
    }

    /// All ids, action node first.
    pub fn element_ids(&self) -> Vec<ElementId> {
        match self {
            Self::Action {
                action_id,
                source_edge_id,
                target_edge_id,
            } => vec![
                action_id.clone(),
                source_edge_id.clone(),
                target_edge_id.clone(),
            ],
            Self::Direct { edge_id } => vec![edge_id.clone()],
        }
    }
}

/// Ids to flash after `t` fired.
pub fn flash_set(t: &Transition) -> Vec<ElementId> {
    TransitionIdentity::of(t).element_ids()
}

/// Side-table from action-node id to the structured transition it fires.
///
/// Rebuilt from `panelData.enabled` on every load, so it always covers exactly
/// the actions a user may tap.
#[derive(Debug, Clone, Default)]
pub struct TransitionIndex {
    by_element: HashMap<ElementId, Transition>,
}

impl TransitionIndex {
    /// Index the enabled transitions of `snapshot`.
    pub fn build(snapshot: &Snapshot) -> Self {
        let by_element = snapshot
            .panel_data
            .enabled
            .iter()
            .map(|e| &e.transition)
            .filter(|t| !t.is_direct())
            .map(|t| (action_id(t), t.clone()))
            .collect();
        Self { by_element }
    }

    /// Transition fired by tapping `id`.
    pub fn resolve(&self, id: &str) -> Option<&Transition> {
        self.by_element.get(id)
    }

    /// Number of indexed actions.
    pub fn len(&self) -> usize {
        self.by_element.len()
    }

    /// True when no action is indexed.
    pub fn is_empty(&self) -> bool {
        self.by_element.is_empty()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use crate::model::{EnabledTransition, PanelData};
    use proptest::prelude::*;

    #[test]
    fn action_identity_matches_engine_naming() {
        let t = Transition::new("s0", "s1", "go");
        assert_eq!(
            TransitionIdentity::of(&t),
            TransitionIdentity::Action {
                action_id: "event_s0_s1_go".into(),
                source_edge_id: "s_to_a_s0_event_s0_s1_go".into(),
                target_edge_id: "a_to_s_event_s0_s1_go_s1".into(),
            }
        );
    }

    #[test]
    fn empty_label_uses_direct_edge() {
        let t = Transition::new("a", "b", "");
        assert_eq!(flash_set(&t), vec!["direct_a_b_".to_string()]);
    }

    #[test]
    fn index_resolves_labels_containing_separator() {
        let t = Transition::new("s_0", "s_1", "a_b");
        let snapshot = Snapshot {
            graph_elements: Vec::new(),
            panel_data: PanelData {
                can_undo: false,
                enabled: vec![EnabledTransition {
                    transition: t.clone(),
                    label: "a_b".into(),
                }],
                ..PanelData::default()
            },
            last_transition: None,
            transition_kind: None,
        };
        let index = TransitionIndex::build(&snapshot);
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve("event_s_0_s_1_a_b"), Some(&t));
        assert!(index.resolve("event_s0_s1_go").is_none());
    }

    proptest! {
        #[test]
        fn identity_is_deterministic(from in "[a-z0-9_]{1,8}", to in "[a-z0-9_]{1,8}", lbl in "[a-z0-9_]{0,8}") {
            let t = Transition::new(from, to, lbl);
            prop_assert_eq!(TransitionIdentity::of(&t), TransitionIdentity::of(&t.clone()));
            let ids = flash_set(&t);
            prop_assert_eq!(ids.len(), if t.is_direct() { 1 } else { 3 });
        }
    }
}
