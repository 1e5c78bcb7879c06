// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot wire types produced by the model engine once per step.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use thiserror::Error;

/// Domain identifier of a state (as named by the model).
pub type StateId = String;
/// Identity of a node or edge within one diagram.
pub type ElementId = String;

/// Well-known semantic/style classes the explorer reacts to.
pub mod classes {
    /// Node representing a model state.
    pub const STATE_NODE: &str = "state-node";
    /// Node representing a firable action.
    pub const EVENT_NODE: &str = "event-node";
    /// The state the model currently sits in.
    pub const CURRENT_STATE: &str = "current-state";
    /// Action that can be fired right now.
    pub const ENABLED: &str = "enabled";
    /// Action that cannot be fired right now.
    pub const DISABLED: &str = "disabled";
    /// Transient emphasis on the elements of the last fired transition.
    pub const TRANSITION_FLASH: &str = "transition-flash";
}

/// 2D coordinate of a node on the diagram canvas.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Position {
    /// Construct a position.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point halfway between `self` and `other`.
    pub fn midpoint(self, other: Self) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }
}

/// Element classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum ElementKind {
    /// A model state.
    StateNode,
    /// An intermediate action node sitting between two states.
    EventNode,
    /// An edge connecting a state to an action (or a state to a state).
    ConnectorEdge,
}

/// A node or edge of the rendered diagram.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Element {
    /// Globally unique id within one diagram.
    pub id: ElementId,
    /// Node/edge classification.
    pub kind: ElementKind,
    /// Display text.
    #[serde(default)]
    pub label: String,
    /// Style and semantic tags.
    #[serde(default)]
    pub classes: BTreeSet<String>,
    /// Source element (edges only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ElementId>,
    /// Target element (edges only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<ElementId>,
    /// Preset coordinate (nodes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

impl Element {
    /// True for state and event nodes.
    pub fn is_node(&self) -> bool {
        self.kind != ElementKind::ConnectorEdge
    }

    /// True when the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// True for an action node the user may fire.
    pub fn is_enabled_action(&self) -> bool {
        self.kind == ElementKind::EventNode && self.has_class(classes::ENABLED)
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// A single labelled step between two states.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    /// Source state.
    pub from: StateId,
    /// Target state.
    pub to: StateId,
    /// Transition label; empty for direct state-to-state edges.
    #[serde(default)]
    pub lbl: String,
    /// Marks time-delay transitions.
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_delay: bool,
}

impl Transition {
    /// Construct a non-delay transition.
    pub fn new(from: impl Into<StateId>, to: impl Into<StateId>, lbl: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            lbl: lbl.into(),
            is_delay: false,
        }
    }

    /// True for direct edges that have no intermediate action node.
    pub fn is_direct(&self) -> bool {
        self.lbl.is_empty()
    }

    /// Wire payload sent back to the model engine.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Transition listed in the side panel, with its button text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnabledTransition {
    /// The transition itself.
    #[serde(flatten)]
    pub transition: Transition,
    /// Button text.
    #[serde(default)]
    pub label: String,
}

/// Side-panel contents for one snapshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PanelData {
    /// Whether the model can step back.
    pub can_undo: bool,
    /// Transitions that may fire from the current state.
    pub enabled: Vec<EnabledTransition>,
    /// Clock valuations.
    #[serde(default)]
    pub clocks: BTreeMap<String, f64>,
    /// Variable valuations.
    #[serde(default)]
    pub variables: BTreeMap<String, serde_json::Value>,
}

/// How the model reached the snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransitionKind {
    /// Forward step along `lastTransition`.
    Step,
    /// Step back.
    Undo,
    /// Full reset to the initial state.
    Reset,
}

/// Errors raised while decoding a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Payload was not JSON of the expected shape.
    #[error("malformed snapshot: {0}")]
    Parse(#[from] serde_json::Error),
    /// Two elements share an id.
    #[error("duplicate element id: {0}")]
    DuplicateId(ElementId),
    /// An edge lacks a source or target.
    #[error("edge {0} is missing an endpoint")]
    MissingEndpoint(ElementId),
    /// An edge points at a node that is not in the snapshot.
    #[error("edge {edge} references unknown node {node}")]
    DanglingEdge {
        /// Offending edge.
        edge: ElementId,
        /// Missing endpoint.
        node: ElementId,
    },
}

/// Complete description of the diagram and panel at one point in simulation time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Ordered element list.
    pub graph_elements: Vec<Element>,
    /// Side-panel data.
    pub panel_data: PanelData,
    /// Transition that produced this snapshot, absent on undo/reset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition: Option<Transition>,
    /// Explicit step classification; when absent it is inferred from `last_transition`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transition_kind: Option<TransitionKind>,
}

impl Snapshot {
    /// Decode and validate a snapshot payload.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check id uniqueness and edge endpoints.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut ids = HashSet::with_capacity(self.graph_elements.len());
        for el in &self.graph_elements {
            if !ids.insert(el.id.as_str()) {
                return Err(SnapshotError::DuplicateId(el.id.clone()));
            }
        }
        let nodes: HashSet<&str> = self
            .graph_elements
            .iter()
            .filter(|el| el.is_node())
            .map(|el| el.id.as_str())
            .collect();
        for edge in self.graph_elements.iter().filter(|el| !el.is_node()) {
            let (Some(src), Some(dst)) = (&edge.source, &edge.target) else {
                return Err(SnapshotError::MissingEndpoint(edge.id.clone()));
            };
            for node in [src, dst] {
                if !nodes.contains(node.as_str()) {
                    return Err(SnapshotError::DanglingEdge {
                        edge: edge.id.clone(),
                        node: node.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// The element tagged `current-state`, if any.
    pub fn current_state(&self) -> Option<&Element> {
        self.graph_elements
            .iter()
            .find(|el| el.has_class(classes::CURRENT_STATE))
    }

    /// Step classification: explicit `transitionKind` wins, otherwise a present
    /// `lastTransition` means a forward step and its absence means undo.
    pub fn step_kind(&self) -> TransitionKind {
        match (self.transition_kind, &self.last_transition) {
            (Some(kind), _) => kind,
            (None, Some(_)) => TransitionKind::Step,
            (None, None) => TransitionKind::Undo,
        }
    }

    /// Look up an element by id.
    pub fn element(&self, id: &str) -> Option<&Element> {
        self.graph_elements.iter().find(|el| el.id == id)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::expect_used)]

    use super::*;

    const MINIMAL: &str = r#"{
        "graphElements": [
            {"id": "s0", "kind": "state-node", "label": "s0", "classes": ["state-node", "current-state"]},
            {"id": "s1", "kind": "state-node", "label": "s1", "classes": ["state-node"]},
            {"id": "event_s0_s1_go", "kind": "event-node", "label": "go", "classes": ["event-node", "enabled"]},
            {"id": "s_to_a_s0_event_s0_s1_go", "kind": "connector-edge", "source": "s0", "target": "event_s0_s1_go"},
            {"id": "a_to_s_event_s0_s1_go_s1", "kind": "connector-edge", "source": "event_s0_s1_go", "target": "s1"}
        ],
        "panelData": {"canUndo": false, "enabled": [{"from": "s0", "to": "s1", "lbl": "go", "label": "go"}]}
    }"#;

    #[test]
    fn parses_minimal_snapshot() {
        let snap = Snapshot::from_json(MINIMAL).expect("parse");
        assert_eq!(snap.graph_elements.len(), 5);
        assert_eq!(snap.current_state().map(|el| el.id.as_str()), Some("s0"));
        assert!(snap.panel_data.clocks.is_empty());
        assert!(snap.last_transition.is_none());
        assert!(snap.element("event_s0_s1_go").unwrap().is_enabled_action());
    }

    #[test]
    fn rejects_missing_required_fields() {
        let err = Snapshot::from_json(r#"{"graphElements": []}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
        let err = Snapshot::from_json("not json").unwrap_err();
        assert!(matches!(err, SnapshotError::Parse(_)));
    }

    #[test]
    fn rejects_duplicate_ids() {
        let json = r#"{
            "graphElements": [
                {"id": "a", "kind": "state-node"},
                {"id": "a", "kind": "state-node"}
            ],
            "panelData": {"canUndo": false, "enabled": []}
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, SnapshotError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn rejects_dangling_edges() {
        let json = r#"{
            "graphElements": [
                {"id": "a", "kind": "state-node"},
                {"id": "e", "kind": "connector-edge", "source": "a", "target": "ghost"}
            ],
            "panelData": {"canUndo": false, "enabled": []}
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, SnapshotError::DanglingEdge { node, .. } if node == "ghost"));

        let json = r#"{
            "graphElements": [{"id": "e", "kind": "connector-edge", "source": "a"}],
            "panelData": {"canUndo": false, "enabled": []}
        }"#;
        let err = Snapshot::from_json(json).unwrap_err();
        assert!(matches!(err, SnapshotError::MissingEndpoint(_)));
    }

    #[test]
    fn step_kind_prefers_explicit_field() {
        let mut snap = Snapshot::from_json(MINIMAL).unwrap();
        assert_eq!(snap.step_kind(), TransitionKind::Undo);
        snap.last_transition = Some(Transition::new("s0", "s1", "go"));
        assert_eq!(snap.step_kind(), TransitionKind::Step);
        snap.last_transition = None;
        snap.transition_kind = Some(TransitionKind::Reset);
        assert_eq!(snap.step_kind(), TransitionKind::Reset);
    }

    #[test]
    fn transition_payload_omits_false_delay_flag() {
        let t = Transition::new("s0", "s1", "go");
        assert_eq!(t.to_json().unwrap(), r#"{"from":"s0","to":"s1","lbl":"go"}"#);
        let delay = Transition {
            is_delay: true,
            ..t
        };
        assert!(delay.to_json().unwrap().contains(r#""isDelay":true"#));
    }
}
