// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Named layout algorithms and their tuning parameters.

use core::fmt;
use core::str::FromStr;
use thiserror::Error;

/// Layout algorithm.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LayoutKind {
    /// Keep the coordinates already assigned to each node.
    Preset,
    /// Hierarchical, rank-based layout.
    Dagre,
    /// Force-directed layout.
    Cose,
}

impl LayoutKind {
    /// Name used by persisted prefs and the layout selector.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Preset => "preset",
            Self::Dagre => "dagre",
            Self::Cose => "cose",
        }
    }
}

impl fmt::Display for LayoutKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognized layout name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown layout: {0}")]
pub struct UnknownLayout(pub String);

impl FromStr for LayoutKind {
    type Err = UnknownLayout;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preset" => Ok(Self::Preset),
            "dagre" => Ok(Self::Dagre),
            "cose" => Ok(Self::Cose),
            other => Err(UnknownLayout(other.to_string())),
        }
    }
}

/// Rank direction for hierarchical layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RankDir {
    /// Ranks flow left to right.
    LeftRight,
    /// Ranks flow top to bottom.
    TopBottom,
}

/// Layout request passed to a surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutSpec {
    /// Algorithm.
    pub kind: LayoutKind,
    /// Fit the viewport once the layout finishes.
    pub fit: bool,
    /// Viewport padding in pixels.
    pub padding: f64,
    /// Animate node movement (force-directed only).
    pub animate: bool,
    /// Hierarchical rank direction.
    pub rank_dir: RankDir,
    /// Global spacing multiplier.
    pub spacing_factor: f64,
    /// Minimum gap between nodes of one rank.
    pub node_sep: f64,
    /// Gap between ranks.
    pub rank_sep: f64,
    /// Gap between parallel edges.
    pub edge_sep: f64,
    /// Node repulsion strength (force-directed).
    pub node_repulsion: f64,
    /// Preferred edge length (force-directed).
    pub ideal_edge_length: f64,
    /// Gap between disconnected components (force-directed).
    pub component_spacing: f64,
}

impl LayoutSpec {
    /// Default tuning for `kind`.
    pub fn for_kind(kind: LayoutKind) -> Self {
        let base = Self {
            kind,
            fit: true,
            padding: 30.0,
            animate: false,
            rank_dir: RankDir::LeftRight,
            spacing_factor: 1.0,
            node_sep: 0.0,
            rank_sep: 0.0,
            edge_sep: 0.0,
            node_repulsion: 0.0,
            ideal_edge_length: 0.0,
            component_spacing: 0.0,
        };
        match kind {
            LayoutKind::Preset => base,
            LayoutKind::Dagre => Self {
                padding: 50.0,
                spacing_factor: 1.2,
                node_sep: 60.0,
                rank_sep: 70.0,
                edge_sep: 10.0,
                ..base
            },
            LayoutKind::Cose => Self {
                animate: true,
                node_repulsion: 9000.0,
                ideal_edge_length: 100.0,
                component_spacing: 100.0,
                ..base
            },
        }
    }
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self::for_kind(LayoutKind::Dagre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in [LayoutKind::Preset, LayoutKind::Dagre, LayoutKind::Cose] {
            assert_eq!(kind.as_str().parse::<LayoutKind>(), Ok(kind));
        }
        assert_eq!(
            "grid".parse::<LayoutKind>(),
            Err(UnknownLayout("grid".into()))
        );
    }

    #[test]
    fn dagre_defaults_flow_left_to_right() {
        let spec = LayoutSpec::default();
        assert_eq!(spec.kind, LayoutKind::Dagre);
        assert_eq!(spec.rank_dir, RankDir::LeftRight);
        assert!((spec.padding - 50.0).abs() < f64::EPSILON);
    }
}
