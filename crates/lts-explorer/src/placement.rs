// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Initial coordinates from the position oracle.

use crate::oracle::PositionOracle;
use lts_graph::{Element, ElementId, ElementKind, Position};
use std::collections::HashMap;
use tracing::{debug, warn};

/// What [`place_from_oracle`] did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    /// Nodes positioned straight from the oracle.
    pub direct: usize,
    /// Event nodes positioned at the midpoint of their endpoints.
    pub interpolated: usize,
    /// Nodes left without a coordinate.
    pub unplaced: Vec<ElementId>,
}

impl Placement {
    /// True when at least one node received a coordinate.
    pub fn any_placed(&self) -> bool {
        self.direct + self.interpolated > 0
    }
}

/// Assign oracle coordinates to `elements` in place.
///
/// State nodes are looked up by id and event nodes by label. An event node
/// the oracle does not know sits halfway between the nodes its connector
/// edges come from and go to.
pub fn place_from_oracle(elements: &mut [Element], oracle: &PositionOracle) -> Placement {
    let mut placement = Placement::default();
    for el in elements.iter_mut() {
        let found = match el.kind {
            ElementKind::StateNode => oracle.nodes.get(&el.id),
            ElementKind::EventNode => oracle.edge_labels.get(&el.label),
            ElementKind::ConnectorEdge => continue,
        };
        if let Some(pos) = found {
            el.position = Some(*pos);
            placement.direct += 1;
        }
    }

    let positions: HashMap<ElementId, Position> = elements
        .iter()
        .filter_map(|el| el.position.map(|p| (el.id.clone(), p)))
        .collect();
    let mut incoming: HashMap<&str, &str> = HashMap::new();
    let mut outgoing: HashMap<&str, &str> = HashMap::new();
    for el in elements.iter() {
        if let (ElementKind::ConnectorEdge, Some(src), Some(dst)) =
            (el.kind, el.source.as_deref(), el.target.as_deref())
        {
            incoming.entry(dst).or_insert(src);
            outgoing.entry(src).or_insert(dst);
        }
    }

    let mut midpoints = HashMap::new();
    let mut unplaced = Vec::new();
    for el in elements.iter() {
        if !el.is_node() || el.position.is_some() {
            continue;
        }
        let endpoints = (el.kind == ElementKind::EventNode)
            .then(|| {
                let from = positions.get(*incoming.get(el.id.as_str())?)?;
                let to = positions.get(*outgoing.get(el.id.as_str())?)?;
                Some(from.midpoint(*to))
            })
            .flatten();
        match endpoints {
            Some(mid) => {
                midpoints.insert(el.id.clone(), mid);
            }
            None => unplaced.push(el.id.clone()),
        }
    }
    for el in elements.iter_mut() {
        if let Some(mid) = midpoints.get(&el.id) {
            el.position = Some(*mid);
            placement.interpolated += 1;
        }
    }

    if !unplaced.is_empty() {
        warn!(count = unplaced.len(), ids = ?unplaced, "no oracle position for nodes");
    }
    placement.unplaced = unplaced;
    debug!(
        direct = placement.direct,
        interpolated = placement.interpolated,
        "oracle placement applied"
    );
    placement
}
