// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Snapshot fixtures for a four-state model.
//!
//! ```text
//! s0 --go--> s1 --back--> s0
//! s0 --wait--> s2 --> s0      (direct edge)
//! s0 --stop--> s3             (deadlock)
//! ```
#![allow(dead_code, clippy::unwrap_used)]

use lts_app_core::config::MemoryConfigStore;
use lts_app_core::layout_store::LayoutStore;
use lts_app_core::prefs::ExplorerPrefs;
use lts_explorer::{Explorer, RecordingEngine};
use lts_scene_port::MockSurface;
use serde_json::{json, Value};
use std::sync::Arc;

pub const CONTAINER: &str = "lts-diagram";

pub const TRANSITIONS: [(&str, &str, &str); 5] = [
    ("s0", "s1", "go"),
    ("s0", "s2", "wait"),
    ("s0", "s3", "stop"),
    ("s1", "s0", "back"),
    ("s2", "s0", ""),
];

pub type TestExplorer =
    Explorer<MockSurface, RecordingEngine, MemoryConfigStore, fn(&str) -> MockSurface>;

fn new_surface(_container: &str) -> MockSurface {
    MockSurface::new()
}

pub fn explorer(prefs: ExplorerPrefs) -> (TestExplorer, Arc<RecordingEngine>) {
    let engine = Arc::new(RecordingEngine::new());
    let explorer = Explorer::new(
        new_surface as fn(&str) -> MockSurface,
        Arc::clone(&engine),
        LayoutStore::new(MemoryConfigStore::new()),
        prefs,
    );
    (explorer, engine)
}

pub fn event_id(from: &str, to: &str, lbl: &str) -> String {
    format!("event_{from}_{to}_{lbl}")
}

/// Snapshot with `current` as the current state. Transitions leaving it are
/// enabled.
pub fn snapshot_value(current: &str, last: Option<(&str, &str, &str)>, can_undo: bool) -> Value {
    let mut elements = Vec::new();
    for s in ["s0", "s1", "s2", "s3"] {
        let mut classes = vec!["state-node"];
        if s == current {
            classes.push("current-state");
        }
        elements.push(json!({"id": s, "kind": "state-node", "label": s, "classes": classes}));
    }
    let mut enabled = Vec::new();
    for (from, to, lbl) in TRANSITIONS {
        let live = from == current;
        if live {
            enabled.push(json!({"from": from, "to": to, "lbl": lbl, "label": lbl}));
        }
        if lbl.is_empty() {
            elements.push(json!({
                "id": format!("direct_{from}_{to}_"),
                "kind": "connector-edge",
                "source": from,
                "target": to,
            }));
            continue;
        }
        let ev = event_id(from, to, lbl);
        elements.push(json!({
            "id": ev,
            "kind": "event-node",
            "label": lbl,
            "classes": ["event-node", if live { "enabled" } else { "disabled" }],
        }));
        elements.push(json!({
            "id": format!("s_to_a_{from}_{ev}"),
            "kind": "connector-edge",
            "source": from,
            "target": ev,
        }));
        elements.push(json!({
            "id": format!("a_to_s_{ev}_{to}"),
            "kind": "connector-edge",
            "source": ev,
            "target": to,
        }));
    }
    let mut snapshot = json!({
        "graphElements": elements,
        "panelData": {
            "canUndo": can_undo,
            "enabled": enabled,
            "clocks": {"x": 0.0},
            "variables": {"count": 0},
        },
    });
    if let Some((from, to, lbl)) = last {
        snapshot["lastTransition"] = json!({"from": from, "to": to, "lbl": lbl});
    }
    snapshot
}

pub fn snapshot(current: &str, last: Option<(&str, &str, &str)>, can_undo: bool) -> String {
    snapshot_value(current, last, can_undo).to_string()
}
