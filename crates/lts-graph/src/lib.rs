// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot representation shared by the LTS explorer crates.
//! Pure data (elements, transitions, panel data) with deterministic element
//! identities and content fingerprints.

mod fingerprint;
mod identity;
mod model;

pub use fingerprint::{fingerprint, GraphFingerprint, LAYOUT_KEY_PREFIX};
pub use identity::{
    action_id, direct_edge_id, flash_set, TransitionIdentity, TransitionIndex, ACTION_PREFIX,
    DIRECT_PREFIX, SOURCE_EDGE_PREFIX, TARGET_EDGE_PREFIX,
};
pub use model::{
    classes, Element, ElementId, ElementKind, EnabledTransition, PanelData, Position, Snapshot,
    SnapshotError, StateId, Transition, TransitionKind,
};
