// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Position oracle: node and edge-label coordinates extracted from a
//! pre-rendered flowchart, delivered once through a readiness channel.

use lts_graph::Position;
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};

/// Prefix of node ids in a rendered flowchart (`flowchart-<name>-<n>`).
const FLOWCHART_PREFIX: &str = "flowchart";

/// Coordinates harvested from a pre-rendered diagram.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionOracle {
    /// State-node positions keyed by node name.
    pub nodes: BTreeMap<String, Position>,
    /// Edge-label positions keyed by label text.
    pub edge_labels: BTreeMap<String, Position>,
}

impl PositionOracle {
    /// True when nothing was harvested.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edge_labels.is_empty()
    }

    /// Build an oracle from raw rendered attributes.
    ///
    /// `nodes` yields `(dom_id, transform)` pairs, `labels` yields
    /// `(text, transform)` pairs. Entries whose id or transform cannot be
    /// interpreted are skipped.
    pub fn from_rendered<'a, N, L>(nodes: N, labels: L) -> Self
    where
        N: IntoIterator<Item = (&'a str, &'a str)>,
        L: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut oracle = Self::default();
        for (dom_id, transform) in nodes {
            let (Some(name), Some(pos)) = (flowchart_node_name(dom_id), parse_translate(transform))
            else {
                debug!(%dom_id, "skipping rendered node");
                continue;
            };
            oracle.nodes.insert(name.to_string(), pos);
        }
        for (text, transform) in labels {
            let text = text.trim();
            if text.is_empty() {
                continue;
            }
            if let Some(pos) = parse_translate(transform) {
                oracle.edge_labels.insert(text.to_string(), pos);
            }
        }
        oracle
    }
}

/// Parse `translate(x,y)` (whitespace tolerated) into a position.
pub fn parse_translate(transform: &str) -> Option<Position> {
    let start = transform.find("translate(")? + "translate(".len();
    let rest = &transform[start..];
    let args = &rest[..rest.find(')')?];
    let (x, y) = args.split_once(',')?;
    let x: f64 = x.trim().parse().ok()?;
    let y: f64 = y.trim().parse().ok()?;
    (x.is_finite() && y.is_finite()).then_some(Position::new(x, y))
}

fn flowchart_node_name(dom_id: &str) -> Option<&str> {
    let mut parts = dom_id.split('-');
    if parts.next()? != FLOWCHART_PREFIX {
        return None;
    }
    parts.next().filter(|name| !name.is_empty())
}

/// Publishing half of the readiness channel.
#[derive(Debug)]
pub struct OracleSender(oneshot::Sender<PositionOracle>);

/// Awaiting half of the readiness channel.
#[derive(Debug)]
pub struct OracleReceiver(oneshot::Receiver<PositionOracle>);

/// Create a readiness channel for one diagram's position oracle.
pub fn oracle_channel() -> (OracleSender, OracleReceiver) {
    let (tx, rx) = oneshot::channel();
    (OracleSender(tx), OracleReceiver(rx))
}

impl OracleSender {
    /// Publish the oracle. Returns false when nobody is waiting any more.
    pub fn publish(self, oracle: PositionOracle) -> bool {
        self.0.send(oracle).is_ok()
    }
}

/// Wait up to `budget` for the oracle.
///
/// Returns `None` immediately without a channel, and after logging when the
/// budget runs out or the publisher goes away.
pub async fn await_oracle(rx: Option<OracleReceiver>, budget: Duration) -> Option<PositionOracle> {
    let rx = rx?;
    match tokio::time::timeout(budget, rx.0).await {
        Ok(Ok(oracle)) => {
            debug!(
                nodes = oracle.nodes.len(),
                labels = oracle.edge_labels.len(),
                "position oracle ready"
            );
            Some(oracle)
        }
        Ok(Err(_)) => {
            warn!("position oracle dropped before publishing; using automatic layout");
            None
        }
        Err(_) => {
            warn!(budget_ms = budget.as_millis(), "position oracle not ready; using automatic layout");
            None
        }
    }
}
