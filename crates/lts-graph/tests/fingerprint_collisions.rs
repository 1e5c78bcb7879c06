// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Fingerprints stay stable per graph and distinct across small graphs.
#![allow(clippy::panic)]

use lts_graph::{action_id, fingerprint, Element, ElementKind, Transition};
use std::collections::{BTreeSet, HashMap};

fn state(id: String, current: bool) -> Element {
    let mut classes: BTreeSet<String> = std::iter::once("state-node".to_string()).collect();
    if current {
        classes.insert("current-state".into());
    }
    Element {
        label: id.clone(),
        id,
        kind: ElementKind::StateNode,
        classes,
        source: None,
        target: None,
        position: None,
    }
}

fn edge(id: String, source: String, target: String) -> Element {
    Element {
        id,
        kind: ElementKind::ConnectorEdge,
        label: String::new(),
        classes: BTreeSet::new(),
        source: Some(source),
        target: Some(target),
        position: None,
    }
}

/// A chain of `n` states, each linked to the next by an action labelled `lbl`.
fn chain(n: usize, lbl: &str) -> Vec<Element> {
    let mut els: Vec<Element> = (0..n).map(|i| state(format!("s{i}"), i == 0)).collect();
    for i in 0..n.saturating_sub(1) {
        let t = Transition::new(format!("s{i}"), format!("s{}", i + 1), lbl);
        let act = action_id(&t);
        els.push(Element {
            id: act.clone(),
            kind: ElementKind::EventNode,
            label: lbl.into(),
            classes: std::iter::once("event-node".to_string()).collect(),
            source: None,
            target: None,
            position: None,
        });
        els.push(edge(format!("s_to_a_{}_{act}", t.from), t.from.clone(), act.clone()));
        els.push(edge(format!("a_to_s_{act}_{}", t.to), act, t.to.clone()));
    }
    els
}

#[test]
fn no_collisions_across_distinct_small_graphs() {
    let labels = ["go", "tick", "a", "b", "reset", "send", "recv", "tau", "x_y", "idle"];
    let mut seen: HashMap<String, (usize, &str)> = HashMap::new();
    let mut graphs = 0;
    for n in 1..=12 {
        for lbl in labels {
            let els = chain(n, lbl);
            let fp = fingerprint(&els);
            assert_eq!(fp, fingerprint(&els), "fingerprint must be repeatable");
            if n == 1 {
                // single-state graphs carry no label; only one distinct graph per n
                if seen.values().any(|&(k, _)| k == 1) {
                    continue;
                }
            }
            if let Some(prev) = seen.insert(fp.to_string(), (n, lbl)) {
                panic!("collision between {prev:?} and {:?}", (n, lbl));
            }
            graphs += 1;
        }
    }
    assert!(graphs >= 100, "only {graphs} graphs generated");
}

#[test]
fn class_changes_change_the_fingerprint() {
    let mut els = chain(3, "go");
    let before = fingerprint(&els);
    els[0].classes.remove("current-state");
    els[1].classes.insert("current-state".into());
    assert_ne!(before, fingerprint(&els));
}
